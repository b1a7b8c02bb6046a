// cplayer - terminal music player
// Parses the command line, sets up logging and config, then hands over to the TUI

use anyhow::Result;
use clap::Parser;
use cplayer::{config::Config, playlist::PlaylistOrder, ui::App};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cplayer")]
#[command(about = "Command line music player")]
struct Args {
    /// Songs directory path
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Order applied to the songs when they are loaded
    #[arg(long, value_enum)]
    order: Option<PlaylistOrder>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable developer logging (keeps stderr attached)
    #[arg(long)]
    dev: bool,
}

fn init_logging(log_dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "cplayer.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(order) = args.order {
        config.playlist.order = order;
        config.playlist.sort_on_load = true;
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.development.log_dir, &config.development.level)?;
    info!("cplayer starting up");

    let music_directory = args.path.unwrap_or_else(|| config.music_directory.clone());
    if !music_directory.is_dir() {
        anyhow::bail!("Songs directory not found: {}", music_directory.display());
    }

    // Audio backends like to chat on stderr, which corrupts the TUI
    if !args.dev {
        debug!("Redirecting stderr to suppress audio backend noise");
        redirect_stderr_to_null()?;
    }

    let mut app = App::new(config, &music_directory)?;
    app.run().await?;

    info!("cplayer shutting down");
    Ok(())
}

#[cfg(unix)]
fn redirect_stderr_to_null() -> Result<()> {
    unsafe {
        let null_fd = libc::open(b"/dev/null\0".as_ptr() as *const libc::c_char, libc::O_WRONLY);
        if null_fd == -1 {
            return Err(anyhow::anyhow!("Failed to open /dev/null"));
        }

        if libc::dup2(null_fd, libc::STDERR_FILENO) == -1 {
            libc::close(null_fd);
            return Err(anyhow::anyhow!("Failed to redirect stderr"));
        }

        libc::close(null_fd);
    }

    Ok(())
}

#[cfg(not(unix))]
fn redirect_stderr_to_null() -> Result<()> {
    Ok(())
}
