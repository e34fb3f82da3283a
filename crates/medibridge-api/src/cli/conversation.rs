//! Conversation history CLI commands: list, messages, summarize.

use anyhow::{bail, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use medibridge_core::conversation::repository::ConversationStore;
use medibridge_types::language::Role;

use crate::state::AppState;

use super::chat::spinner;

/// Truncate on a char boundary for table cells.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// List stored conversations, newest first.
///
/// ```bash
/// medib conversations
/// medib conversations --json
/// ```
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.store.list_conversations().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("medib chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Summary").fg(Color::White),
    ]);

    for conversation in &conversations {
        let summary = if conversation.summary.is_empty() {
            "-".to_string()
        } else {
            preview(&conversation.summary, 40)
        };
        table.add_row(vec![
            Cell::new(conversation.id.to_string()).fg(Color::Cyan),
            Cell::new(conversation.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(summary),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation(s). Resume with: {}",
        conversations.len(),
        style("medib chat --resume <id>").yellow()
    );
    println!();
    Ok(())
}

/// Print a conversation's messages in store order.
pub async fn show_messages(state: &AppState, id: &Uuid, json: bool) -> Result<()> {
    let messages = state.store.load_messages(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  {} No messages in conversation {id}.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Original").fg(Color::White),
        Cell::new("Translated").fg(Color::White),
    ]);

    for message in &messages {
        let role_color = match message.role {
            Role::Doctor => Color::Green,
            Role::Patient => Color::Magenta,
        };
        table.add_row(vec![
            Cell::new(message.seq),
            Cell::new(message.timestamp.format("%H:%M:%S").to_string()),
            Cell::new(message.role.to_string()).fg(role_color),
            Cell::new(format!("[{}] {}", message.input_language, message.original_text)),
            Cell::new(format!("[{}] {}", message.output_language, message.translated_text)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Generate a clinical summary with the locally hosted model.
pub async fn summarize(state: &AppState, id: &Uuid, json: bool, quiet: bool) -> Result<()> {
    let Some(summarizer) = &state.summarizer else {
        bail!(
            "Summarization is disabled. Enable it in {} with:\n\n  [summarization]\n  enabled = true",
            state.data_dir.join("config.toml").display()
        );
    };

    let progress = (!json && !quiet).then(|| spinner("summarizing..."));
    let result = summarizer.summarize(id).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    let summary = result?;

    if json {
        let out = serde_json::json!({ "conversation_id": id, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Clinical summary").bold());
    println!();
    for line in summary.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("Headache", 40), "Headache");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "मुझे सिर में बहुत तेज़ दर्द हो रहा है";
        let out = preview(text, 10);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 10);
    }
}
