//! POS console CLI - sign-in, navigation checks and field tools.
//!
//! # Usage
//!
//! ```bash
//! # Sign in against the back-office API
//! POS_PASSWORD='Abc123' pos-cli login -e cajero@tienda.ec
//!
//! # Where does a navigation land for the persisted session?
//! pos-cli navigate /app/admin
//!
//! # Check and clean field values
//! pos-cli validate national-id 1710034065
//! pos-cli format decimal '1234567.89'
//! ```
//!
//! # Commands
//!
//! - `login`, `logout`, `whoami` - Manage the persisted session
//! - `navigate`, `routes` - Run the route guard
//! - `validate`, `format` - Field validators and formatters
//!
//! Set `POS_LOG_FORMAT=json` for JSON log lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pos_console::{ConsoleConfig, ConsoleState};

mod commands;

use commands::fields::{Check, Format};

#[derive(Parser)]
#[command(name = "pos-cli")]
#[command(author, version, about = "POS console tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Sign out and forget the persisted session
    Logout,
    /// Show the persisted session
    Whoami,
    /// Run the route guard for a path
    Navigate {
        /// Requested path, e.g. /app/admin
        path: String,
    },
    /// List the route table
    Routes,
    /// Check a field value
    Validate {
        /// Field type
        #[arg(value_enum)]
        check: Check,

        /// Raw value
        value: String,
    },
    /// Clean a field value
    Format {
        /// Formatter
        #[arg(value_enum)]
        format: Format,

        /// Raw value
        value: String,

        /// Maximum length (letters and integer fields)
        #[arg(long)]
        max_length: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pos_console=info,pos_console_cli=info".into());

    let is_json = std::env::var("POS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { check, value } => commands::fields::validate(check, &value)?,
        Commands::Format {
            format,
            value,
            max_length,
        } => {
            commands::fields::format(format, max_length, &value);
        }
        command => {
            let state = ConsoleState::new(ConsoleConfig::from_env()?)?;
            match command {
                Commands::Login { email } => commands::session::login(&state, &email).await?,
                Commands::Logout => commands::session::logout(&state),
                Commands::Whoami => commands::session::whoami(&state),
                Commands::Navigate { path } => commands::navigate::navigate(&state, &path),
                Commands::Routes => commands::navigate::list_routes(&state),
                Commands::Validate { .. } | Commands::Format { .. } => {}
            }
        }
    }
    Ok(())
}
