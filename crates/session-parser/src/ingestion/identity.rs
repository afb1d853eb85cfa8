//! Content-derived record identifiers

use sha2::{Digest, Sha256};

use crate::types::{ExamKind, RecordFields};

/// Prefix naming the digest algorithm
pub const ID_ALGORITHM: &str = "sha256";

/// Derive a record id from its sheet and key fields.
///
/// Re-parsing unchanged input yields the same id. Two records that agree on
/// every key field share an id.
pub fn record_id(sheet: &str, fields: &RecordFields, kind: ExamKind) -> String {
    let key = [
        sheet,
        fields.date.as_deref().unwrap_or(""),
        fields.group.as_deref().unwrap_or(""),
        fields.subject.as_deref().unwrap_or(""),
        kind.as_str(),
        fields.teacher.as_deref().unwrap_or(""),
        fields.room.as_deref().unwrap_or(""),
    ]
    .join("|");

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{}:{}", ID_ALGORITHM, hex::encode(hasher.finalize()))
}
