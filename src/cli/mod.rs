pub mod daemon_path;
pub mod process;
pub mod summary;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{kill_previous_servers, restart_server};
use summary::{ReportCommand, SummaryCommand, process_report_command, process_summary_command};
use tracing::level_filters::LevelFilter;

use crate::{
    cli::daemon_path::to_daemon_path,
    daemon::start_daemon,
    utils::{
        dir::create_application_default_path,
        logging::{CLI_PREFIX, enable_logging},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Focusmon", version, long_about = None)]
#[command(about = "Tracks window focus and derives daily focus summaries", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts a daemon for the application")]
    Init {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Display the daily summary for a date")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
    #[command(about = "Display one summary line per day over a date range")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(
        about = "Run a daemon directly in current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?,
        logging_level,
        args.log,
    )?;

    match args.commands {
        Commands::Init { dir } => {
            restart_server(dir)?;
            Ok(())
        }
        Commands::Stop {} => {
            let daemon_path = to_daemon_path(env::current_exe()?);
            kill_previous_servers(&daemon_path);
            Ok(())
        }
        Commands::Serve { dir } => {
            start_daemon(dir.map_or_else(create_application_default_path, Ok)?).await?;
            Ok(())
        }
        Commands::Summary { command } => process_summary_command(command).await,
        Commands::Report { command } => process_report_command(command).await,
    }
}
