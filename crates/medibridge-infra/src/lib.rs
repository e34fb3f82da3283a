//! Infrastructure layer for MediBridge.
//!
//! Implementations of the ports defined in `medibridge-core`: the SQLite
//! conversation store, HTTP engine clients, SHA-256 audio fingerprints, and
//! the `config.toml` loader.

pub mod config;
pub mod crypto;
pub mod engine;
pub mod sqlite;
