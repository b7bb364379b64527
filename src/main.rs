use clap::Parser;
use flexi_logger::{FileSpec, Logger, LoggerHandle};

use tuido::cli::Cli;
use tuido::io::state::state_dir;

fn main() {
    let cli = Cli::parse();

    // Keep the handle alive for the whole run; dropping it stops logging.
    let _logger = init_logging();

    if let Err(e) = tuido::tui::run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// File-based logging in the state dir; stderr belongs to the TUI.
/// Logging is best effort — the client runs fine without it.
fn init_logging() -> Option<LoggerHandle> {
    let dir = state_dir()?;
    std::fs::create_dir_all(&dir).ok()?;
    Logger::try_with_env_or_str("info")
        .ok()?
        .log_to_file(FileSpec::default().directory(&dir).basename("tuido"))
        .append()
        .start()
        .ok()
}
