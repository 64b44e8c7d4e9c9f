use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use drone_shooter::assets::AssetCatalog;
use drone_shooter::audio::AudioBackend;
use drone_shooter::config::GameConfig;
use drone_shooter::display::TerminalSurface;
use drone_shooter::engine::{Engine, Phase, TickSignal};
use drone_shooter::input::{Control, KeyTracker};

type Screen = TerminalSurface<BufWriter<Stdout>>;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to the configured file; the terminal itself is busy drawing.
fn init_logging(config: &GameConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    let mut fallback_reason = None;
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => fallback_reason = Some(format!("{}: {}", path.display(), e)),
        }
    }
    let _ = builder.try_init();
    if let Some(reason) = fallback_reason {
        warn!("log file unavailable, logging to stderr ({})", reason);
    }
}

// ── Host commands ─────────────────────────────────────────────────────────────

/// What a key press asks of the host, beyond held-key gameplay input.
#[derive(Debug, PartialEq)]
enum Command {
    Start,
    TogglePause,
    Quit,
    Exit,
}

fn command_for(key: &KeyEvent, control: Option<Control>) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Exit),
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Start),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ if control == Some(Control::PauseToggle) => Some(Command::TogglePause),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drives the engine. Frames are scheduled only while `engine.frame` says
/// `Continue`; otherwise the loop blocks on the next key event.
fn run(
    screen: &mut Screen,
    rx: &mpsc::Receiver<Event>,
    engine: &mut Engine,
    assets: &mut AssetCatalog,
    audio: &mut AudioBackend,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let mut keys = KeyTracker::new();
    let frame_time = Duration::from_millis(engine.config().display.frame_ms);
    let mut signal = TickSignal::Stop;

    assets.poll();
    engine.redraw(screen, assets)?;

    loop {
        let frame_start = Instant::now();
        keys.next_frame();

        // Idle, paused or finished: wait for the next key instead of spinning.
        let mut events = Vec::new();
        if signal == TickSignal::Stop {
            match rx.recv_timeout(frame_time) {
                Ok(ev) => events.push(ev),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
        events.extend(rx.try_iter());

        let mut redraw = false;
        for ev in events {
            match ev {
                Event::Key(key) => {
                    let control = keys.handle(&key);
                    match command_for(&key, control) {
                        Some(Command::Exit) => return Ok(()),
                        Some(Command::Start) if engine.controls_visible() => {
                            keys.clear();
                            signal = engine.start(audio);
                        }
                        Some(Command::TogglePause) => {
                            signal = engine.toggle_pause(audio);
                            redraw = true;
                        }
                        Some(Command::Quit) => match engine.phase() {
                            Phase::Running | Phase::Paused => {
                                signal = engine.quit(audio);
                                redraw = true;
                            }
                            Phase::Idle | Phase::GameOver => return Ok(()),
                        },
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    screen.resize(cols, rows);
                    redraw = true;
                }
                _ => {}
            }
        }

        // Sprites may finish loading while nothing is scheduled.
        let was_settled = assets.is_settled();
        assets.poll();
        if !was_settled && assets.is_settled() {
            redraw = true;
        }

        if signal == TickSignal::Continue {
            signal = engine.frame(&keys, &mut rng, screen, assets, audio)?;
            audio.advance();
            if signal == TickSignal::Stop {
                info!("loop stopped in phase {:?}", engine.phase());
            }
            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        } else if redraw {
            engine.redraw(screen, assets)?;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load().context("loading configuration")?;
    init_logging(&config);
    info!("config: {:?}", config);

    let mut assets = AssetCatalog::load_in_background(config.assets_dir.join("images"));
    let mut audio = AudioBackend::open(&config.assets_dir.join("sounds"), config.display.bell);
    let mut engine = Engine::new(config.clone());

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut screen = TerminalSurface::new(BufWriter::new(stdout()), cols, rows, config.canvas);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    screen.writer().execute(terminal::EnterAlternateScreen)?;
    screen.writer().execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = screen
        .writer()
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut screen, &rx, &mut engine, &mut assets, &mut audio);

    // Always restore the terminal
    let out = screen.writer();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!("exiting with error: {:#}", e);
    }
    result
}
