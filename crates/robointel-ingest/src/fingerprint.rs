//! Content fingerprinting for duplicate detection.
//!
//! The fingerprint is a SHA-256 digest of normalized text (trimmed,
//! lowercased), so trivial formatting differences do not defeat
//! deduplication. Two documents with identical normalized text always
//! produce the same fingerprint; the store uses it as a uniqueness key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use robointel_store::Store;

/// Whether a fingerprint is already known, and which document owns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DedupStatus {
    pub is_duplicate: bool,
    pub existing_id: Option<i64>,
}

/// Compute the content fingerprint of a raw text.
pub fn fingerprint(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check whether a document with this fingerprint already exists.
///
/// Read-only; the caller decides whether to skip insertion or log a
/// duplicate event. A store failure propagates — it never silently
/// reports "not a duplicate".
pub fn check_duplicate(store: &Store, digest: &str) -> robointel_core::Result<DedupStatus> {
    let existing = store.find_document_by_hash(digest)?;
    Ok(DedupStatus {
        is_duplicate: existing.is_some(),
        existing_id: existing.map(|doc| doc.id),
    })
}
