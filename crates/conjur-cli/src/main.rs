//! conjur - launch commands with secrets from Conjur in their environment

use clap::{Parser, Subcommand};
use conjur_cli::commands;
use conjur_core::hostfactory::TokenDuration;
use conjur_core::EnvRequest;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "conjur")]
#[command(author, version, about = "Conjur secrets command line", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Client config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command with secrets from a mapping file in its environment
    Env {
        /// Only report whether each variable is readable
        #[arg(long)]
        check: bool,
        /// Variable mapping file
        #[arg(short = 'f', long = "file", value_name = "PATH")]
        file: Option<PathBuf>,
        /// Command to run, given after `--`
        #[arg(last = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// Manage host factories
    #[command(subcommand)]
    Hostfactory(HostfactoryCommands),
}

#[derive(Subcommand)]
enum HostfactoryCommands {
    /// Manage host factory tokens
    #[command(subcommand)]
    Tokens(TokensCommands),
    /// Create hosts with a host factory token
    #[command(subcommand)]
    Hosts(HostsCommands),
}

#[derive(Subcommand)]
enum TokensCommands {
    /// Create one or more tokens
    Create {
        /// Host factory id
        hostfactory: String,
        /// Token lifetime in minutes
        #[arg(long)]
        duration_minutes: Option<u32>,
        /// Token lifetime in hours
        #[arg(long)]
        duration_hours: Option<u32>,
        /// Token lifetime in days
        #[arg(long)]
        duration_days: Option<u32>,
        /// Number of tokens to create
        #[arg(short, long)]
        count: Option<u32>,
        /// Comma-separated CIDR restriction, or `all` to clear it
        #[arg(long)]
        cidr: Option<String>,
    },
    /// Revoke (delete) a token
    Revoke {
        /// Token to revoke
        token: String,
    },
}

#[derive(Subcommand)]
enum HostsCommands {
    /// Use a token to create a host
    Create {
        /// Host factory token
        token: String,
        /// Id of the new host
        host_id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout is reserved for command output
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ if cli.verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new("warn"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = cli.config.as_deref();
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Env {
            check,
            file,
            command,
        } => {
            // option errors must surface before any config or mapping I/O
            let request = EnvRequest::new(check, command, file)?;
            let store = commands::connect(config)?;
            commands::env(request, store.as_ref(), &mut stdout).await?;
        }
        Commands::Hostfactory(HostfactoryCommands::Tokens(TokensCommands::Create {
            hostfactory,
            duration_minutes,
            duration_hours,
            duration_days,
            count,
            cidr,
        })) => {
            let store = commands::connect(config)?;
            let duration = TokenDuration {
                minutes: duration_minutes,
                hours: duration_hours,
                days: duration_days,
            };
            commands::create_tokens(
                store.as_ref(),
                &hostfactory,
                duration,
                count,
                cidr.as_deref(),
                &mut stdout,
            )
            .await?;
        }
        Commands::Hostfactory(HostfactoryCommands::Tokens(TokensCommands::Revoke { token })) => {
            let store = commands::connect(config)?;
            commands::revoke_token(store.as_ref(), &token, &mut stdout).await?;
        }
        Commands::Hostfactory(HostfactoryCommands::Hosts(HostsCommands::Create {
            token,
            host_id,
        })) => {
            let store = commands::connect(config)?;
            commands::create_host(store.as_ref(), &token, &host_id, &mut stdout).await?;
        }
    }

    Ok(())
}
