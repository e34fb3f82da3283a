//! SHA-256 fingerprints for recognising repeated audio submissions.
//!
//! Implements the `AudioFingerprinter` trait from `medibridge-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use medibridge_core::service::fingerprint::AudioFingerprinter;

/// SHA-256 implementation of `AudioFingerprinter`.
///
/// Produces the lowercase hex digest of the raw recording bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprinter;

impl Sha256Fingerprinter {
    pub fn new() -> Self {
        Self
    }
}

impl AudioFingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, audio: &[u8]) -> String {
        format!("{:x}", Sha256::digest(audio))
    }
}
