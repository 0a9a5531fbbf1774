use anyhow::Result;

use ticktally::app::App;
use ticktally::config::{self, Config};
use ticktally::logging;
use ticktally::tui::{self, Tui};

fn main() -> Result<()> {
    let config = Config::load()?;

    // Creates the history and logs directories too
    config::ensure_directories(&config)?;
    if !config::config_file_path().exists() {
        config.save()?;
    }

    // Initialize file logging BEFORE any tracing calls
    let (log_file_info, _guard) = logging::init_file_logging(config::logs_dir())?;

    // Clean up old logs (7-day retention)
    if let Ok(count) = logging::cleanup_old_logs(&config::logs_dir()) {
        if count > 0 {
            tracing::info!("Cleaned up {} old log files", count);
        }
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());

    let mut app = App::new(config);
    let mut tui = Tui::new()?;
    tui.enter()?;
    tracing::info!("ticktally started. Press 'Tab' to switch timers, 'q' to quit.");

    let result = tui::run(&mut app, &mut tui);

    // Exit TUI mode (also done in Drop, but explicit is clearer)
    tui.exit()?;

    result
}
