//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and switch the active speaker, change languages,
//! submit recordings, or manage the display.

use std::path::PathBuf;

use console::style;

use medibridge_types::language::{Language, Role};

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Empty the display log and the screen (the stored conversation stays).
    Clear,
    Exit,
    /// Make `Role` the active speaker for subsequent lines.
    Speaker(Role),
    /// Set one role's language, leaving the other unchanged.
    RoleLanguage { role: Role, language: Language },
    /// Set the doctor's and patient's languages at once.
    Languages { doctor: Language, patient: Language },
    /// Submit an audio file as a turn from the active speaker.
    Audio(PathBuf),
    /// Reprint the display log.
    History,
    /// Unknown command or bad arguments, with a message for the user.
    Invalid(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/doctor" | "/d" => ChatCommand::Speaker(Role::Doctor),
        "/patient" | "/p" => ChatCommand::Speaker(Role::Patient),
        "/history" => ChatCommand::History,
        "/lang" | "/languages" => parse_languages(arg),
        "/audio" => {
            if arg.is_empty() {
                ChatCommand::Invalid("/audio requires a file path".to_string())
            } else {
                ChatCommand::Audio(PathBuf::from(arg))
            }
        }
        other => ChatCommand::Invalid(format!("Unknown command: {other}")),
    };
    Some(command)
}

const LANG_USAGE: &str = "usage: /lang doctor|patient <code>, or /lang <doctor> <patient>";

/// `/lang doctor fr` sets one role; `/lang en hi` sets both.
fn parse_languages(arg: &str) -> ChatCommand {
    let words: Vec<&str> = arg.split_whitespace().collect();
    let [first, second] = words.as_slice() else {
        return ChatCommand::Invalid(LANG_USAGE.to_string());
    };

    let role = match first.to_lowercase().as_str() {
        "doctor" | "d" => Some(Role::Doctor),
        "patient" | "p" => Some(Role::Patient),
        _ => None,
    };
    if let Some(role) = role {
        return match second.parse::<Language>() {
            Ok(language) => ChatCommand::RoleLanguage { role, language },
            Err(e) => ChatCommand::Invalid(e),
        };
    }

    match (first.parse::<Language>(), second.parse::<Language>()) {
        (Ok(doctor), Ok(patient)) => ChatCommand::Languages { doctor, patient },
        (Err(e), _) | (_, Err(e)) => ChatCommand::Invalid(e),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}            {}", style("/doctor").cyan(), "Speak as the doctor");
    println!("  {}           {}", style("/patient").cyan(), "Speak as the patient");
    println!("  {} {}", style("/lang doctor <code>").cyan(), "Change one role's language");
    println!("  {}   {}", style("/lang <doc> <pat>").cyan(), "Change both languages");
    println!("  {}      {}", style("/audio <file>").cyan(), "Submit a recording as a turn");
    println!("  {}           {}", style("/history").cyan(), "Show this conversation");
    println!("  {}             {}", style("/clear").cyan(), "Clear the display (history is kept)");
    println!("  {}              {}", style("/help").cyan(), "Show this help message");
    println!("  {}              {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!("  {} {}", style("Languages:").dim(), style(codes.join(", ")).dim());
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
