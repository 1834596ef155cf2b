use clap::{Parser, Subcommand, ValueEnum};

use crate::app::Intent;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "sw")]
    Stopwatch,
    Timer,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Add a stopwatch or countdown timer
    Add {
        kind: KindArg,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        label: Vec<String>,
    },
    Remove { id: u64 },
    Start { id: u64 },
    Stop { id: u64 },
    Lap { id: u64 },
    Reset { id: u64 },
    /// Rename a timer; with no label the new one is asked for
    Rename {
        id: u64,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        label: Vec<String>,
    },
    /// Target in minutes for a stopwatch; omit to clear
    Target { id: u64, minutes: Option<u64> },
    /// Countdown length as HH:MM:SS
    Duration { id: u64, hms: String },
    Category {
        id: u64,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tag: Vec<String>,
    },
    #[command(alias = "ls")]
    List,
    Summary,
    #[command(alias = "?")]
    Help,
    #[command(alias = "exit")]
    Quit,
}

/// What a line of input asks the loop to do.
#[derive(Debug, PartialEq)]
pub enum Input {
    Intent(Intent),
    List,
    Summary,
    Help,
    Quit,
}

fn joined(words: Vec<String>) -> Option<String> {
    if words.is_empty() { None } else { Some(words.join(" ")) }
}

impl From<Command> for Input {
    fn from(cmd: Command) -> Self {
        let intent = match cmd {
            Command::Add { kind: KindArg::Stopwatch, label } => {
                Intent::AddStopwatch { label: joined(label) }
            }
            Command::Add { kind: KindArg::Timer, label } => {
                Intent::AddTimer { label: joined(label) }
            }
            Command::Remove { id } => Intent::Remove { id },
            Command::Start { id } => Intent::Start { id },
            Command::Stop { id } => Intent::Stop { id },
            Command::Lap { id } => Intent::Lap { id },
            Command::Reset { id } => Intent::Reset { id },
            Command::Rename { id, label } => match joined(label) {
                Some(label) => Intent::Relabel { id, label },
                None => Intent::RequestLabel { id },
            },
            Command::Target { id, minutes } => Intent::SetTarget { id, minutes },
            Command::Duration { id, hms } => Intent::SetDuration { id, input: hms },
            Command::Category { id, tag } => Intent::SetCategory { id, category: tag.join(" ") },
            Command::List => return Input::List,
            Command::Summary => return Input::Summary,
            Command::Help => return Input::Help,
            Command::Quit => return Input::Quit,
        };
        Input::Intent(intent)
    }
}

pub fn parse_line(line: &str) -> Result<Input, clap::Error> {
    let line = Line::try_parse_from(line.split_whitespace())?;
    Ok(line.command.into())
}
