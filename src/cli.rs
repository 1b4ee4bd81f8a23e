use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use clap::{Parser, Subcommand};

use crate::command::{execute, Action, Command, Outcome};
use crate::config::Config;
use crate::logging::enable_logging;
use crate::store::{self, TimerFile};

#[derive(Parser, Debug)]
#[command(name = "timers", version, long_about = None)]
#[command(about = "Named start/stop timers kept in a plain text file")]
struct Args {
    #[command(subcommand)]
    commands: Commands,

    #[arg(
        long,
        global = true,
        help = "File to store the timer information. Defaults to $TIMERS_FILE or $HOME/.timers"
    )]
    file: Option<PathBuf>,

    #[arg(long, global = true, help = "Skip lines that cannot be read instead of failing")]
    lenient: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Create a new timer and start it", visible_alias = "new")]
    Create { label: String },
    #[command(about = "Start a stopped timer")]
    Start { label: String },
    #[command(about = "Stop a running timer")]
    Stop { label: String },
    #[command(about = "Delete a timer and all of its history")]
    Delete { label: String },
    #[command(about = "List all timers, or the intervals of one timer")]
    List { label: Option<String> },
}

impl From<Commands> for Command {
    fn from(commands: Commands) -> Command {
        match commands {
            Commands::Create { label } => Command::new(Action::Create, Some(label)),
            Commands::Start { label } => Command::new(Action::Start, Some(label)),
            Commands::Stop { label } => Command::new(Action::Stop, Some(label)),
            Commands::Delete { label } => Command::new(Action::Delete, Some(label)),
            Commands::List { label } => Command::new(Action::List, label),
        }
    }
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();
    enable_logging(args.verbose);

    let config = Config::resolve(args.file, args.lenient)?;
    let command = Command::from(args.commands);
    let now = Utc::now().trunc_subsecs(0);

    if command.action == Action::List {
        let text = store::read_contents(&config.file)
            .with_context(|| format!("could not read {}", config.file.display()))?;
        if let Outcome::Report(report) = execute(&text, &command, config.strictness, now)? {
            print!("{report}");
        }
        return Ok(());
    }

    let mut file = TimerFile::open(&config.file)
        .with_context(|| format!("could not open {}", config.file.display()))?;
    let text = file.read_contents()?;

    if let Outcome::Updated { text, message } = execute(&text, &command, config.strictness, now)? {
        file.replace_contents(&text)
            .with_context(|| format!("could not save trackers to {}", file.path().display()))?;
        println!("{message}");
    }

    Ok(())
}
