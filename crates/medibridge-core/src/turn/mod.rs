//! Turn processing: language resolution, transcription, translation and
//! persistence of a single speaker turn.

pub mod processor;

pub use processor::{resolve_languages, TurnOutcome, TurnProcessor, TurnTimeouts};
