//! Roomchat terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Landing page
//! roomchat
//!
//! # Allocate a room on the server and enter it
//! roomchat create
//!
//! # Join by code, or open a shared link
//! roomchat join a3f9c1
//! roomchat open "http://localhost:8000/room.html?room=a3f9c1"
//! ```

use std::{fs::File, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use roomchat_app::{App, Command, Runtime};
use roomchat_client::{ClientConfig, DEFAULT_SERVER, SystemEnv};
use roomchat_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Roomchat terminal client
#[derive(Parser, Debug)]
#[command(name = "roomchat")]
#[command(about = "Ephemeral two-party chat rooms in the terminal")]
#[command(version)]
struct Args {
    /// Room server base URL
    #[arg(short, long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. Logging is off without it, since the
    /// terminal is taken over by the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    start: Option<Start>,
}

/// Where to start.
#[derive(Subcommand, Debug)]
enum Start {
    /// Allocate a room on the server and enter it
    Create,
    /// Enter a room with a locally generated code
    New,
    /// Join a room by code
    Join {
        /// Room code
        code: String,
    },
    /// Open a room page link
    Open {
        /// Room page URL, e.g. http://localhost:8000/room.html?room=a3f9c1
        url: Url,
    },
}

impl From<Start> for Command {
    fn from(start: Start) -> Self {
        match start {
            Start::Create => Self::CreateRoom,
            Start::New => Self::CreateLocalRoom,
            Start::Join { code } => Self::JoinRoom(code),
            Start::Open { url } => Self::OpenRoom(url),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let file = Arc::new(File::create(path)?);
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_ansi(false))
            .with(filter)
            .init();
    }

    let config = ClientConfig::new(&args.server)?;
    tracing::info!(server = %config.server(), "roomchat starting");

    let mut app = App::new(config.page_base());
    let initial = match args.start {
        Some(start) => app.execute(start.into(), &SystemEnv::new()),
        None => Vec::new(),
    };

    let driver = TerminalDriver::new(config)?;
    Runtime::new(driver, app).run_with(initial).await?;

    Ok(())
}
