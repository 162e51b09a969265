use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "filelink")]
#[command(author, version, about = "Telegram bot that turns uploaded files into download and streaming links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run,

    /// Print user and file counts from the database and exit
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_command() {
        let cli = Cli::try_parse_from(["filelink"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_stats_json() {
        let cli = Cli::try_parse_from(["filelink", "stats", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Stats { json: true }));
    }
}
