//! Best-effort product mention resolution.
//!
//! Matching generated prose back to a catalog record by name substring
//! is inherently approximate: paraphrased names are missed, and a reply
//! mentioning several products resolves to whichever record comes
//! first in catalog order. Callers treat the result as a hint for card
//! augmentation, never as ground truth.

use crate::models::ProductRecord;

/// First record (in store order) whose name appears, case-insensitively,
/// as a substring of the reply text.
pub fn resolve_mention<'a>(records: &'a [ProductRecord], reply: &str) -> Option<&'a ProductRecord> {
    let reply = reply.to_lowercase();
    records
        .iter()
        .find(|record| !record.name.is_empty() && reply.contains(&record.name.to_lowercase()))
}
