//! Slash commands for the terminal interview.

use std::path::PathBuf;

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Exit,
    /// Extract the record and submit it.
    Finish,
    History,
    /// Record the name of an attached file.
    Attach(String),
    /// Write the transcript as JSON to a file.
    Export(PathBuf),
    /// A known command missing its argument; holds the usage line.
    Usage(&'static str),
    Unknown(String),
}

/// Parse user input as a slash command. `None` if it is not one.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/finish" | "/submit" => ChatCommand::Finish,
        "/history" => ChatCommand::History,
        "/attach" if arg.is_empty() => ChatCommand::Usage("/attach <file name>"),
        "/attach" => ChatCommand::Attach(arg.to_string()),
        "/export" if arg.is_empty() => ChatCommand::Usage("/export <path>"),
        "/export" => ChatCommand::Export(PathBuf::from(arg)),
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}           {}", style("/help").cyan(), "Show this help message");
    println!("  {}         {}", style("/finish").cyan(), "Submit the report (when enough has been shared)");
    println!("  {}  {}", style("/attach <name>").cyan(), "Note a file you want to attach");
    println!("  {}        {}", style("/history").cyan(), "Show the conversation so far");
    println!("  {}  {}", style("/export <path>").cyan(), "Save the conversation as JSON");
    println!("  {}           {}", style("/exit").cyan(), "End without submitting");
    println!();
}
