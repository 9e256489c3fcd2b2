use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use glitch_maze::hud::{Hud, TimerBand};
use glitch_maze::{Config, Dir, Difficulty, Game, LevelSet, Phase, Pos, Tile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const HUD_ROWS: u16 = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Hazard,
    Goal,
    PowerUp,
    Wall,
    Glitch,
    Empty,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Start,
    Playing,
    Ended,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_bar: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_bar: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS,
        }
    }
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("enabling raw mode")?;
    stdout
        .execute(EnterAlternateScreen)
        .context("entering alternate screen")?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, config: &Config) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let levels = LevelSet::generate(&mut rng);
    info!(seed = ?config.seed, levels = levels.count(), "level set ready");
    let mut game = Game::new(levels, rng);

    let (grid_w, grid_h) = (game.current_maze().width(), game.current_maze().height());
    let mut renderer = Renderer::new(grid_w, grid_h);
    let mut screen = Screen::Start;
    let mut selected = config.difficulty();
    let frame_time = config.frame_time();
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                renderer.needs_full = true;
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                return Ok(());
            }
            match screen {
                Screen::Start => match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        game.start(selected);
                        screen = Screen::Playing;
                        renderer.needs_full = true;
                        last_tick = Instant::now();
                    }
                    KeyCode::Char(c) => {
                        if let Ok(difficulty) = c.to_string().parse::<Difficulty>() {
                            selected = difficulty;
                            renderer.needs_full = true;
                        }
                    }
                    _ => {}
                },
                Screen::Playing => match key.code {
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => game.move_player(Dir::Up),
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => game.move_player(Dir::Down),
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => game.move_player(Dir::Left),
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => game.move_player(Dir::Right),
                    KeyCode::Char('p') | KeyCode::Char('P') => game.toggle_pause(),
                    _ => {}
                },
                Screen::Ended => {
                    if key.code == KeyCode::Char('r') {
                        screen = Screen::Start;
                        renderer.needs_full = true;
                    }
                }
            }
        }

        let now = Instant::now();
        game.advance(now - last_tick);
        last_tick = now;

        if screen == Screen::Playing && game.phase() == Phase::Ended {
            screen = Screen::Ended;
            renderer.needs_full = true;
        }

        match screen {
            Screen::Playing => {
                if game.take_redraw() || renderer.needs_full {
                    render(stdout, &game, &mut renderer)?;
                }
            }
            Screen::Start if renderer.needs_full => {
                render_start(stdout, selected)?;
                renderer.needs_full = false;
            }
            Screen::Ended if renderer.needs_full => {
                render_end(stdout, &game)?;
                renderer.needs_full = false;
            }
            Screen::Start | Screen::Ended => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn render_start(stdout: &mut Stdout, selected: Difficulty) -> io::Result<()> {
    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Clear(ClearType::All))?;
    stdout.queue(SetForegroundColor(Color::Cyan))?;
    stdout.queue(Print("GLITCH MAZE"))?;
    stdout.queue(ResetColor)?;
    for (row, difficulty) in Difficulty::ALL.iter().enumerate() {
        let marker = if *difficulty == selected { ">" } else { " " };
        stdout.queue(MoveTo(0, 2 + row as u16))?;
        stdout.queue(Print(format!(
            "{} {}  {}",
            marker,
            row + 1,
            difficulty.label()
        )))?;
    }
    stdout.queue(MoveTo(0, 6))?;
    stdout.queue(Print("1/2/3 or e/m/h pick difficulty, Enter starts, q quits"))?;
    stdout.flush()
}

fn render_end(stdout: &mut Stdout, game: &Game) -> io::Result<()> {
    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Clear(ClearType::All))?;
    if let Some(outcome) = game.outcome() {
        let color = if outcome.kind.is_win() {
            Color::Green
        } else {
            Color::Red
        };
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(outcome.to_string()))?;
        stdout.queue(ResetColor)?;
    }
    stdout.queue(MoveTo(0, 2))?;
    stdout.queue(Print("r to play again, q to quit"))?;
    stdout.flush()
}

fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let maze = game.current_maze();
    let needed_h = maze.height() as u16 + HUD_ROWS;
    let needed_w = (maze.width() * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + HUD_ROWS;
    if renderer.needs_full || origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        stdout.queue(Clear(ClearType::All))?;
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = Hud::of(game);
    let status = format!(
        "Score: {}  Level {}/{}  Lives: {}  Time: {:>2}s  Difficulty: {}  {}",
        hud.score,
        hud.level,
        hud.levels,
        hud.lives,
        hud.timer,
        hud.difficulty,
        if hud.paused { "[paused, p resumes]" } else { "(p pause, q quit)" }
    );
    if renderer.needs_full || status != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - HUD_ROWS))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Print(&status))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = status;
    }

    let bar_w = needed_w as usize;
    let filled = (hud.timer_fraction * bar_w as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "·".repeat(bar_w - filled.min(bar_w)));
    if renderer.needs_full || bar != renderer.last_bar {
        let color = match hud.band {
            TimerBand::Critical => Color::Red,
            TimerBand::Warning => Color::Yellow,
            TimerBand::Calm => Color::Cyan,
        };
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(&bar))?;
        stdout.queue(ResetColor)?;
        renderer.last_bar = bar;
    }

    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let cell = cell_for(game, Pos { x, y });
            let idx = y * maze.width() + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, pos: Pos) -> Cell {
    if pos == game.player() {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Green,
        };
    }
    if pos == game.hazard() {
        return Cell {
            glyph: Glyph::Hazard,
            color: Color::Red,
        };
    }
    if game.power_ups().iter().any(|p| p.pos == pos) {
        return Cell {
            glyph: Glyph::PowerUp,
            color: Color::Yellow,
        };
    }
    if pos == game.goal() {
        return Cell {
            glyph: Glyph::Goal,
            color: Color::Magenta,
        };
    }
    match game.current_maze().tile(pos) {
        Tile::Wall if game.glitch_walls().contains(&pos) => Cell {
            glyph: Glyph::Glitch,
            color: Color::Magenta,
        },
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::DarkGrey,
        },
        Tile::Open => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Hazard => "🔴",
        Glyph::Goal => "🏁",
        Glyph::PowerUp => "⭐",
        Glyph::Wall => "██",
        Glyph::Glitch => "░░",
        Glyph::Empty => "  ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
