//! Main chat loop orchestration.
//!
//! Opens (or resumes) the conversation, prints the banner, then reads lines
//! until Ctrl+D or `/exit`. Each non-command line is a turn from the active
//! speaker. A failed turn is reported and nothing is shown for it; the user
//! can simply submit it again.

use anyhow::{anyhow, Context};
use console::style;
use tracing::info;
use uuid::Uuid;

use medibridge_core::conversation::session::ConversationSession;
use medibridge_core::turn::TurnOutcome;
use medibridge_types::conversation::{DisplayEntry, TurnInput};
use medibridge_types::error::StoreError;
use medibridge_types::language::{LanguageConfig, Role};

use crate::state::AppState;

use super::banner::{print_entry, print_languages, print_welcome_banner, prompt_for};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::spinner;

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    resume: Option<Uuid>,
    languages: LanguageConfig,
) -> anyhow::Result<()> {
    let mut session = state
        .open_session(resume, Some(languages))
        .await
        .map_err(|e| match (e, resume) {
            (StoreError::NotFound, Some(id)) => anyhow!("Conversation {id} not found"),
            (e, _) => anyhow::Error::new(e).context("Could not start the conversation"),
        })?;

    let conversation_id = session.conversation_id().to_string();
    print_welcome_banner(&conversation_id, &session.languages(), resume.is_some());
    for entry in session.display_log() {
        print_entry(entry);
    }

    let mut role = Role::Doctor;
    let (mut chat_input, _writer) = ChatInput::new(prompt_for(role, &session.languages()))
        .context("Failed to initialize input")?;
    let mut turns = 0usize;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Press Ctrl+D to exit, or keep going.").dim());
                continue;
            }
            InputEvent::Line(text) if text.is_empty() => continue,
            InputEvent::Line(text) => text,
        };

        let Some(command) = commands::parse(&text) else {
            if submit_turn(state, &mut session, role, TurnInput::Text(text)).await {
                turns += 1;
            }
            continue;
        };

        match command {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Exit => break,
            ChatCommand::Clear => {
                session.clear();
                chat_input.clear();
            }
            ChatCommand::History => {
                println!();
                if session.display_log().is_empty() {
                    println!("  {}", style("Nothing to show yet.").dim());
                    println!();
                }
                for entry in session.display_log() {
                    print_entry(entry);
                }
            }
            ChatCommand::Speaker(next) => {
                role = next;
                chat_input.update_prompt(&prompt_for(role, &session.languages()));
            }
            ChatCommand::RoleLanguage { role: target, language } => {
                let mut languages = session.languages();
                match target {
                    Role::Doctor => languages.doctor = language,
                    Role::Patient => languages.patient = language,
                }
                session.set_languages(languages);
                chat_input.update_prompt(&prompt_for(role, &languages));
                println!();
                print_languages(&languages);
                println!();
            }
            ChatCommand::Languages { doctor, patient } => {
                let languages = LanguageConfig { doctor, patient };
                session.set_languages(languages);
                chat_input.update_prompt(&prompt_for(role, &languages));
                println!();
                print_languages(&languages);
                println!();
            }
            ChatCommand::Audio(path) => match tokio::fs::read(&path).await {
                Ok(audio) if audio.is_empty() => {
                    eprintln!("  {} {} is empty", style("!").yellow().bold(), path.display());
                }
                Ok(audio) => {
                    if submit_turn(state, &mut session, role, TurnInput::Audio(audio)).await {
                        turns += 1;
                    }
                }
                Err(e) => {
                    eprintln!(
                        "  {} Could not read {}: {e}",
                        style("!").red().bold(),
                        path.display()
                    );
                }
            },
            ChatCommand::Invalid(message) => {
                println!(
                    "  {} {message}. Type /help for available commands.",
                    style("?").yellow().bold()
                );
            }
        }
    }

    println!("\n  {}", style("Session ended.").dim());
    println!(
        "  {} {}",
        style("Resume with:").dim(),
        style(format!("medib chat --resume {conversation_id}")).yellow()
    );
    info!(conversation_id = %conversation_id, turns, "Chat session ended");
    Ok(())
}

/// Process one turn and render its outcome. Returns whether a message was
/// persisted.
async fn submit_turn(
    state: &AppState,
    session: &mut ConversationSession,
    role: Role,
    input: TurnInput,
) -> bool {
    let progress = spinner(match input {
        TurnInput::Text(_) => "translating...",
        TurnInput::Audio(_) => "transcribing...",
    });
    let result = state
        .turn_processor
        .process_turn(session, role, input)
        .await;
    progress.finish_and_clear();

    match result {
        Ok(TurnOutcome::Completed(message)) => {
            print_entry(&DisplayEntry::from(&message));
            true
        }
        Ok(TurnOutcome::DuplicateAudio) => {
            println!(
                "  {} {}",
                style("=").dim(),
                style("This recording was already processed.").dim()
            );
            false
        }
        Err(e) => {
            eprintln!("  {} Turn not saved: {e}", style("!").red().bold());
            false
        }
    }
}
