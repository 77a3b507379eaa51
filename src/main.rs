use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use sparkburst::render::canvas::PixelCanvas;
use sparkburst::render::terminal::TerminalPresenter;
use sparkburst::{BurstOptions, Celebration, CelebrationType, FileConfig, FrameQueue, Intensity};
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[cfg(feature = "audio")]
type Output = sparkburst::audio::rodio_output::RodioOutput;
#[cfg(not(feature = "audio"))]
type Output = sparkburst::NullOutput;

type Engine = Celebration<PixelCanvas, FrameQueue, Output>;

#[derive(Parser)]
#[command(name = "burst")]
#[command(about = "Celebration particle bursts in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Celebration type: confetti, sparkle, coins, hearts or stars
    #[arg(value_name = "TYPE")]
    kind: Option<String>,

    /// subtle, normal, epic or legendary
    #[arg(short, long)]
    intensity: Option<String>,

    /// Start a new burst every time one finishes
    #[arg(short = 'l', long = "loop")]
    looping: bool,

    /// Do not play the start cue
    #[arg(long)]
    no_sound: bool,

    /// TOML file with [burst] and [host] tables
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_name = "RRGGBB")]
    bg_color: Option<String>,

    /// Terminal pixels per logical unit
    #[arg(long)]
    scale: Option<f32>,

    /// Simulation ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for reproducible bursts
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(cli: &Cli) -> Result<()> {
    // stderr would draw over the alternate screen, so only log to a file.
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => FileConfig::default(),
    };

    if let Some(kind) = &cli.kind {
        config.burst.kind = kind.clone();
    }
    if let Some(intensity) = &cli.intensity {
        config.burst.intensity = intensity.clone();
    }
    if cli.looping {
        config.burst.looping = true;
    }
    if cli.no_sound {
        config.burst.sound_enabled = false;
    }
    if let Some(bg) = &cli.bg_color {
        config.host.bg_color = Some(bg.clone());
    }
    if let Some(scale) = cli.scale {
        config.host.scale = scale;
    }
    if let Some(fps) = cli.fps {
        config.host.fps = fps;
    }
    if cli.seed.is_some() {
        config.host.seed = cli.seed;
    }

    config.burst.validate().context("invalid burst options")?;
    config.host.validate().context("invalid host options")?;
    config.burst.active = true;
    Ok(config)
}

/// Logical surface size for a terminal, keeping the last row for status.
fn logical_size(cols: u16, rows: u16, scale: f32) -> (u32, u32) {
    let pixel_rows = rows.saturating_sub(1) as f32 * 2.0;
    ((cols as f32 / scale).round() as u32, (pixel_rows / scale).round() as u32)
}

fn cell_to_logical(column: u16, row: u16, scale: f32) -> (f32, f32) {
    ((column as f32 + 0.5) / scale, (row as f32 * 2.0 + 1.0) / scale)
}

fn reconfigure(engine: &mut Engine, edit: impl FnOnce(&mut BurstOptions)) {
    let mut options = engine.options().clone();
    edit(&mut options);
    engine.apply(options);
}

fn status_line(engine: &Engine) -> String {
    let options = engine.options();
    let stats = engine.stats();
    let flag = |on: bool| if on { "on" } else { "off" };
    format!(
        " {} | {} | loop {} | sound {} | {} live | {} bursts | space start  1-5 type  i intensity  l loop  s sound  x stop  q quit",
        CelebrationType::resolve(&options.kind),
        Intensity::resolve(&options.intensity),
        flag(options.looping),
        flag(options.sound_enabled),
        engine.particles().len(),
        stats.bursts_started,
    )
}

enum Action {
    Quit,
    Redraw,
    None,
}

fn handle_key(engine: &mut Engine, key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char(' ') => engine.start(),
        KeyCode::Char('x') => engine.stop(),
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            let kind = CelebrationType::ALL[index];
            engine.stop();
            reconfigure(engine, |o| {
                o.kind = kind.name().to_string();
                o.origin_x = None;
                o.origin_y = None;
            });
            engine.start();
        }
        KeyCode::Char('i') => {
            reconfigure(engine, |o| o.intensity = Intensity::resolve(&o.intensity).next().name().to_string());
        }
        KeyCode::Char('l') => reconfigure(engine, |o| o.looping = !o.looping),
        KeyCode::Char('s') => reconfigure(engine, |o| o.sound_enabled = !o.sound_enabled),
        _ => return Action::None,
    }
    Action::Redraw
}

fn run(engine: &mut Engine, out: &mut BufWriter<Stdout>, scale: f32, fps: u32) -> Result<()> {
    let mut presenter = TerminalPresenter::new();
    let fixed_dt = 1.0 / fps as f32;

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    let mut dirty = true;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) => match handle_key(engine, &key) {
                    Action::Quit => break,
                    Action::Redraw => dirty = true,
                    Action::None => {}
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let (x, y) = cell_to_logical(mouse.column, mouse.row, scale);
                    engine.stop();
                    engine.start_at(x, y);
                    dirty = true;
                }
                Event::Resize(cols, rows) => {
                    let (width, height) = logical_size(cols, rows, scale);
                    engine.resize(width, height);
                    execute!(out, Clear(ClearType::All))?;
                    dirty = true;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        if accumulator > fixed_dt * 3.0 {
            accumulator = fixed_dt * 3.0;
        }

        while accumulator >= fixed_dt {
            dirty |= engine.pump(fixed_dt);
            accumulator -= fixed_dt;
        }

        if dirty {
            let status = status_line(engine);
            if let Some(canvas) = engine.surface() {
                presenter.present(out, canvas, Some(&status))?;
            }
            dirty = false;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = load_config(&cli)?;

    let scale = config.host.scale;
    let background = config.host.background()?;
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let (width, height) = logical_size(cols, rows, scale);

    let rng = match config.host.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut engine: Engine = Celebration::new(FrameQueue::new(), Output::default())
        .with_surface(PixelCanvas::new(width, height, scale, background))
        .with_rng(rng);
    engine.on_complete(|| log::info!("celebration complete"));

    let mut out = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    engine.apply(config.burst);
    let result = run(&mut engine, &mut out, scale, config.host.fps);

    execute!(out, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    let stats = engine.stats();
    log::info!(
        "{} bursts, {} completed, {} particles",
        stats.bursts_started,
        stats.completions,
        stats.particles_spawned
    );
    result
}
