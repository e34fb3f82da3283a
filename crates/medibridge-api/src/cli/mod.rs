//! CLI command definitions for the `medib` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod conversation;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

use medibridge_types::language::Language;

/// Doctor-patient translation chat with clinical summaries.
#[derive(Parser)]
#[command(name = "medib", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive translated conversation.
    Chat {
        /// Resume a stored conversation by ID.
        #[arg(long)]
        resume: Option<Uuid>,

        /// Doctor's language (en, fr, de, es, hi, zh-CN).
        #[arg(long)]
        doctor_lang: Option<Language>,

        /// Patient's language (en, fr, de, es, hi, zh-CN).
        #[arg(long)]
        patient_lang: Option<Language>,
    },

    /// List stored conversations, newest first.
    #[command(alias = "ls")]
    Conversations,

    /// Show the messages of a stored conversation.
    Messages {
        /// Conversation ID.
        id: Uuid,
    },

    /// Generate a clinical summary of a stored conversation.
    ///
    /// Requires `[summarization] enabled = true` in config.toml.
    Summarize {
        /// Conversation ID.
        id: Uuid,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
