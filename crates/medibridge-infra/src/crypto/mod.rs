//! Hashing for MediBridge.
//!
//! - `hash`: SHA-256 fingerprints of audio recordings

pub mod hash;
