use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use demanda_core::ChartGrouping;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate next-period consumption per department and tariff", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// JSON configuration file overriding the defaults
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest both periods and write the estimation table as CSV
    Estimate {
        /// Period A (2023) consumption file
        #[arg(value_hint = ValueHint::FilePath)]
        base: PathBuf,
        /// Period B (2024) consumption file
        #[arg(value_hint = ValueHint::FilePath)]
        recent: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Print a grouped summary to stderr
        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,
    },
    /// Report which configuration reads a file and what it contains
    Inspect {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    Total,
    Department,
    Tariff,
}

impl From<GroupBy> for ChartGrouping {
    fn from(g: GroupBy) -> Self {
        match g {
            GroupBy::Total => ChartGrouping::Total,
            GroupBy::Department => ChartGrouping::Department,
            GroupBy::Tariff => ChartGrouping::Tariff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::parse_from([
            "demanda", "--log-level", "debug", "estimate", "a.csv", "b.csv", "-o", "out.csv",
            "--group-by", "tariff",
        ]);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        match cli.command {
            Commands::Estimate { base, recent, output, group_by } => {
                assert_eq!(base, PathBuf::from("a.csv"));
                assert_eq!(recent, PathBuf::from("b.csv"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
                assert_eq!(group_by, Some(GroupBy::Tariff));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
