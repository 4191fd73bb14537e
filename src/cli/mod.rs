//! CLI module for Homeline
//!
//! Provides commands:
//! - `serve`: run the webhook server
//! - `send`: run one message through the dispatcher and print the results
//! - `history`: print a session's turns
//! - `reset`: clear a session

use crate::server::{self, config::AppConfig};
use clap::{Parser, Subcommand};
use homeline_core::MEMORY_CLEARED;

/// Homeline SMS assistant CLI
#[derive(Parser, Debug)]
#[command(name = "homeline")]
#[command(about = "Webhook-driven SMS assistant for real estate teams")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the webhook server
    Serve,
    /// Dispatch one message as if it arrived by SMS
    Send {
        /// Sender phone number (session key)
        #[arg(long)]
        phone: String,
        /// Message text
        #[arg(long)]
        text: String,
    },
    /// Print the stored conversation for a phone number
    History {
        #[arg(long)]
        phone: String,
    },
    /// Clear the stored conversation for a phone number
    Reset {
        #[arg(long)]
        phone: String,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => server::run(config).await,
        Some(Commands::Send { phone, text }) => {
            let dispatcher = server::build_dispatcher(&config).await?;
            for line in dispatcher.execute(&phone, &text).await? {
                println!("{line}");
            }
            Ok(())
        }
        Some(Commands::History { phone }) => {
            let store = server::connect_store(&config).await?;
            for turn in store.read_all(&phone).await? {
                println!("{}: {}", turn.role, turn.text);
            }
            Ok(())
        }
        Some(Commands::Reset { phone }) => {
            let store = server::connect_store(&config).await?;
            store.clear(&phone).await?;
            println!("{MEMORY_CLEARED}");
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from([
            "homeline",
            "send",
            "--phone",
            "+15550001111",
            "--text",
            "Is it available?",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Send { phone, text }) => {
                assert_eq!(phone, "+15550001111");
                assert_eq!(text, "Is it available?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_history_requires_phone() {
        assert!(Cli::try_parse_from(["homeline", "history"]).is_err());
    }
}
