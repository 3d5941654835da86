use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kipubot")]
#[command(author, version, about = "Telegram bot that summarises MobilePay Excel exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Parse a local Excel export and print the summary the bot would send
    Parse {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Print every parsed record, not only the summary
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
