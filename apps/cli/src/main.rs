//! Pigmento CLI - drive the Pigmento session and API from a terminal.
//!
//! Provides the `pigmento` command. Session state lives in the configured
//! storage backend, so a sign-in survives between invocations.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pigmento_core::{BackendKind, Config, logging};

use commands::{AppContext, auth, color, onboard, push, status, upload};

/// Pigmento CLI - color of the day and photo scoring
#[derive(Parser, Debug)]
#[command(name = "pigmento", author, version, about = "Pigmento - match the color of the day")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Storage directory (overrides PIGMENTO_DATA_DIR)
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend (memory, secure)
    #[arg(short, long, global = true)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the session and which screen the app would open
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark onboarding as completed
    Onboard,

    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Store a placeholder session (dev mode only)
    DevSignIn,

    /// Create an account
    SignUp {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Forget the stored session
    SignOut,

    /// Show the color of the day
    Color,

    /// Upload a photo and print its score
    Upload {
        /// Path to an image file
        path: PathBuf,
    },

    /// Register a push-notification token for this device
    RegisterPush {
        /// Device push token
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::discover_and_load()?;
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }

    let level = args.log_level.or_else(|| config.log_level.clone()).unwrap_or_else(|| "info".to_string());
    logging::init_logging(&level);

    let app = AppContext::open(config).await?;

    let result = match args.command {
        Command::Status { json } => status::execute(&app, json),
        Command::Onboard => onboard::execute(&app),
        Command::SignIn { email, password } => auth::sign_in(&app, email, password).await,
        Command::DevSignIn => auth::dev_sign_in(&app),
        Command::SignUp { email, password, confirm_password } => {
            auth::sign_up(&app, email, password, confirm_password).await
        }
        Command::SignOut => auth::sign_out(&app),
        Command::Color => color::execute(&app).await,
        Command::Upload { path } => upload::execute(&app, &path).await,
        Command::RegisterPush { token } => push::execute(&app, &token).await,
    };

    app.session.flush().await;
    result
}
