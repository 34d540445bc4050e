mod calc;
mod cmd;
mod data;
mod logging;
mod ui;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rangepick", about = "two-month date range picker")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default config.yaml and a sample range.json
    Init,
    /// Print one month grid
    Grid {
        /// Month to show as YYYY-MM (default: current month)
        month: Option<String>,
        /// First column of the grid, overriding config.yaml (e.g. Sun)
        #[arg(long)]
        week_start: Option<String>,
    },
    /// Show the saved range
    Range {
        /// Reset the saved range to empty
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Checked before the log file lands in the directory.
    let needs_init = dir_needs_init(&data_dir);

    // The picker owns the terminal, so it logs to a file in the data directory.
    if cli.command.is_none() {
        std::fs::create_dir_all(&data_dir)?;
        logging::init(cli.verbose, Some(&data_dir.join("rangepick.log")))?;
    } else {
        logging::init(cli.verbose, None)?;
    }

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && needs_init {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Grid { month, week_start }) => {
            cmd::grid::run(month.as_deref(), week_start.as_deref())
        }
        Some(Commands::Range { clear }) => cmd::range::run(clear),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file.txt"), "data").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_cli_parses_grid_subcommand() {
        let cli = Cli::try_parse_from([
            "rangepick",
            "-vv",
            "grid",
            "2024-03",
            "--week-start",
            "Sun",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Grid { month, week_start }) => {
                assert_eq!(month.as_deref(), Some("2024-03"));
                assert_eq!(week_start.as_deref(), Some("Sun"));
            }
            _ => panic!("expected grid subcommand"),
        }
    }

    #[test]
    fn test_cli_defaults_to_picker() {
        let cli = Cli::try_parse_from(["rangepick"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, PathBuf::from("./config"));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_range_clear_flag() {
        let cli = Cli::try_parse_from(["rangepick", "range", "--clear"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Range { clear: true })));
    }
}
