use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use swipecade::app::App;
use swipecade::config::AppConfig;
use swipecade::event::{Event, EventHandler};
use swipecade::scores::{shared, FileStore, MemoryStore, SharedStore};
use swipecade::ui;

fn main() -> io::Result<()> {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    if let Err(e) = init_logging(&config.log_path) {
        eprintln!(
            "swipecade: cannot write log file {}: {e}; continuing without logs",
            config.log_path.display()
        );
    }
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "invalid configuration, using defaults");
    }
    tracing::info!(seed = ?config.seed, tick_rate_ms = config.tick_rate_ms, "swipecade starting");

    let mut app = App::new(&config, open_store(&config));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    // Lets the terminal tell auto-repeat apart from a fresh press.
    let key_kinds = matches!(supports_keyboard_enhancement(), Ok(true));
    if key_kinds {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::debug!(key_kinds, "keyboard enhancement");
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app, config.tick_rate_ms);

    // Restore terminal
    if key_kinds {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "main loop failed");
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate_ms: u64,
) -> io::Result<()> {
    let event_handler = EventHandler::new(tick_rate_ms);
    let started = Instant::now();
    let mut ticked_ms = 0u64;

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let event = event_handler.next()?;

        // Whole milliseconds only; the remainder carries into the next step.
        let total_ms = started.elapsed().as_millis() as u64;
        app.on_tick(total_ms - ticked_ms);
        ticked_ms = total_ms;

        match event {
            Event::Tick => {}
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// The terminal is in raw mode, so logs go to a file.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(config: &AppConfig) -> SharedStore {
    let path = config
        .scores_path
        .clone()
        .unwrap_or_else(FileStore::default_path);
    match FileStore::open(&path) {
        Ok(store) => shared(store),
        Err(e) => {
            tracing::warn!(error = %e, "score file unavailable, best scores will not persist");
            shared(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_path_is_reported() {
        let path = std::env::temp_dir()
            .join("swipecade-no-such-dir")
            .join("nested")
            .join("swipecade.log");
        assert!(init_logging(&path).is_err());
    }
}
