//! Welcome banner and turn rendering for chat sessions.

use console::style;

use medibridge_types::conversation::DisplayEntry;
use medibridge_types::language::{LanguageConfig, Role};

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(conversation_id: &str, languages: &LanguageConfig, resumed: bool) {
    let heading = if resumed {
        "Resumed conversation"
    } else {
        "New conversation"
    };

    println!();
    println!("  {} {}", style("+").green().bold(), style("MediBridge").cyan().bold());
    println!("  {}", style(heading).dim());
    println!();
    println!(
        "  {}  {}",
        style("Conversation:").bold(),
        style(&conversation_id[..8.min(conversation_id.len())]).dim()
    );
    print_languages(languages);
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

pub fn print_languages(languages: &LanguageConfig) {
    println!(
        "  {}  doctor {} / patient {}",
        style("Languages:").bold(),
        style(languages.doctor).cyan(),
        style(languages.patient).cyan()
    );
}

/// Prompt text for the active speaker.
pub fn prompt_for(role: Role, languages: &LanguageConfig) -> String {
    let (label, code) = match role {
        Role::Doctor => (style("Doctor").green().bold(), languages.doctor),
        Role::Patient => (style("Patient").magenta().bold(), languages.patient),
    };
    format!("  {label} {} ", style(format!("[{code}] >")).dim())
}

/// Print one display entry: original on the first line, translation below.
pub fn print_entry(entry: &DisplayEntry) {
    let label = match entry.role {
        Role::Doctor => style(entry.role.to_string()).green().bold(),
        Role::Patient => style(entry.role.to_string()).magenta().bold(),
    };
    println!("  {label}: {}", entry.original);
    println!("  {} {}", style("->").dim(), style(&entry.translated).cyan());
    println!();
}
