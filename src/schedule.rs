use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chain {
    Timer,
    Glitch,
    Hazard,
    Spawn,
}

impl Chain {
    fn index(self) -> usize {
        match self {
            Chain::Timer => 0,
            Chain::Glitch => 1,
            Chain::Hazard => 2,
            Chain::Spawn => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Chain(Chain, u64),
    ExpirePowerUp(u64),
    RestoreHazardInterval(Duration),
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    event: Event,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest entry first.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Entry>,
    epochs: [u64; 4],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn schedule_in(&mut self, delay: Duration, event: Event) {
        self.seq += 1;
        self.queue.push(Entry {
            due: self.now + delay,
            seq: self.seq,
            event,
        });
    }

    /// Starts a new run of `chain`, orphaning any firing still queued.
    pub fn launch(&mut self, chain: Chain, delay: Duration) {
        let epoch = self.bump(chain);
        self.schedule_in(delay, Event::Chain(chain, epoch));
    }

    pub fn continue_chain(&mut self, chain: Chain, delay: Duration) {
        let epoch = self.epochs[chain.index()];
        self.schedule_in(delay, Event::Chain(chain, epoch));
    }

    pub fn halt(&mut self, chain: Chain) {
        self.bump(chain);
    }

    pub fn is_live(&self, chain: Chain, epoch: u64) -> bool {
        self.epochs[chain.index()] == epoch
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        for chain in [Chain::Timer, Chain::Glitch, Chain::Hazard, Chain::Spawn] {
            self.bump(chain);
        }
    }

    pub fn pop_due(&mut self, until: Duration) -> Option<Event> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.event)
    }

    /// Removes every queued one-shot, returning each with the time it had left.
    pub fn take_one_shots(&mut self) -> Vec<(Duration, Event)> {
        let (chains, mut shots): (Vec<Entry>, Vec<Entry>) = self
            .queue
            .drain()
            .partition(|entry| matches!(entry.event, Event::Chain(..)));
        self.queue.extend(chains);
        shots.sort_by_key(|entry| (entry.due, entry.seq));
        shots
            .into_iter()
            .map(|entry| (entry.due.saturating_sub(self.now), entry.event))
            .collect()
    }

    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn bump(&mut self, chain: Chain) -> u64 {
        let epoch = &mut self.epochs[chain.index()];
        *epoch += 1;
        *epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, until: Duration) -> Vec<Event> {
        let mut out = Vec::new();
        while let Some(ev) = s.pop_due(until) {
            out.push(ev);
        }
        s.settle(until);
        out
    }

    #[test]
    fn fires_in_due_order_then_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule_in(Duration::from_millis(300), Event::ExpirePowerUp(3));
        s.schedule_in(Duration::from_millis(100), Event::ExpirePowerUp(1));
        s.schedule_in(Duration::from_millis(300), Event::ExpirePowerUp(4));
        s.schedule_in(Duration::from_millis(200), Event::ExpirePowerUp(2));

        let fired = drain(&mut s, Duration::from_millis(250));
        assert_eq!(fired, vec![Event::ExpirePowerUp(1), Event::ExpirePowerUp(2)]);
        assert_eq!(s.now(), Duration::from_millis(250));

        let fired = drain(&mut s, Duration::from_secs(1));
        assert_eq!(fired, vec![Event::ExpirePowerUp(3), Event::ExpirePowerUp(4)]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn relaunch_orphans_the_queued_firing() {
        let mut s = Scheduler::new();
        s.launch(Chain::Hazard, Duration::from_millis(500));
        s.launch(Chain::Hazard, Duration::from_millis(500));

        let fired = drain(&mut s, Duration::from_secs(1));
        let live: Vec<_> = fired
            .into_iter()
            .filter(|ev| matches!(ev, Event::Chain(c, e) if s.is_live(*c, *e)))
            .collect();
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn halt_and_clear_invalidate_chains() {
        let mut s = Scheduler::new();
        s.launch(Chain::Timer, Duration::from_secs(1));
        s.halt(Chain::Timer);
        let fired = drain(&mut s, Duration::from_secs(2));
        assert!(matches!(fired[..], [Event::Chain(Chain::Timer, e)] if !s.is_live(Chain::Timer, e)));

        s.launch(Chain::Glitch, Duration::from_secs(3));
        s.clear();
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn one_shots_come_out_with_their_remaining_delay() {
        let mut s = Scheduler::new();
        s.schedule_in(Duration::from_secs(5), Event::ExpirePowerUp(1));
        s.launch(Chain::Hazard, Duration::from_millis(500));
        let restore = Event::RestoreHazardInterval(Duration::from_millis(800));
        s.schedule_in(Duration::from_secs(2), restore);
        drain(&mut s, Duration::from_secs(1));

        let taken = s.take_one_shots();
        assert_eq!(
            taken,
            vec![
                (Duration::from_secs(1), restore),
                (Duration::from_secs(4), Event::ExpirePowerUp(1)),
            ]
        );
        assert_eq!(s.pending(), 0);

        s.launch(Chain::Glitch, Duration::from_secs(3));
        s.schedule_in(Duration::from_secs(1), Event::ExpirePowerUp(2));
        assert_eq!(s.take_one_shots().len(), 1);
        assert_eq!(s.pending(), 1);
    }
}
