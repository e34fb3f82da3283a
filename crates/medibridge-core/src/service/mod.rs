//! Service-level ports shared by the turn processor.

pub mod fingerprint;
