//! AudioFingerprinter trait for recognising a recording that was already
//! processed.
//!
//! Defined in medibridge-core so the turn processor can fingerprint audio
//! without coupling to a hashing algorithm. The `Sha256Fingerprinter`
//! adapter lives in medibridge-infra.

/// Content-derived fingerprint of raw audio bytes.
///
/// Equal bytes must always produce equal fingerprints.
pub trait AudioFingerprinter: Send + Sync {
    /// Compute a hex-encoded fingerprint of the given recording.
    fn fingerprint(&self, audio: &[u8]) -> String;
}
