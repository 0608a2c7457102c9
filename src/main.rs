use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, Level};

use energy_maze::config::{Cli, PlaybackSettings};
use energy_maze::render::{render_text, Renderer, Scene};
use energy_maze::{Result, Session, StartOutcome};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(
        cli.maze_config(),
        cli.start_energy,
        cli.search.into(),
        rng,
    )?;

    if cli.headless {
        return run_headless(&mut session);
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut session, cli.playback());

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// The alternate screen owns the terminal, so interactive runs only log when
/// given a file.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.headless {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn run_headless(session: &mut Session<StdRng>) -> Result<()> {
    session.start()?;
    let route = session
        .path()
        .map(|path| path.coords().to_vec())
        .unwrap_or_default();
    let frame = render_text(&Scene {
        route: &route,
        ..Scene::from_session(session)
    });
    println!("{}", frame);

    let moves = session.play_out();
    println!(
        "{} after {} moves, energy left: {}",
        session.status(),
        moves,
        session.agent().energy
    );
    Ok(())
}

fn run(
    stdout: &mut Stdout,
    session: &mut Session<StdRng>,
    settings: PlaybackSettings,
) -> Result<()> {
    let mut renderer = Renderer::new(session.grid().size());
    session.start()?;
    let mut last_step = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        session.cancel();
                        return Ok(());
                    }
                    KeyCode::Char('s') | KeyCode::Char(' ') | KeyCode::Enter => {
                        if session.start()? == StartOutcome::Ignored {
                            debug!("start pressed during playback");
                        } else {
                            last_step = Instant::now();
                        }
                    }
                    _ => {}
                }
            }
        }

        if session.is_running() && last_step.elapsed() >= settings.step {
            last_step = Instant::now();
            session.advance();
        }
        renderer.render(stdout, &Scene::from_session(session))?;

        let elapsed = frame_start.elapsed();
        if elapsed < settings.frame {
            thread::sleep(settings.frame - elapsed);
        }
    }
}
