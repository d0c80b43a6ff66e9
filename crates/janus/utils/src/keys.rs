//! Bookkeeping of the onetime keys published by each party.

use serde::{Deserialize, Serialize};

/// The onetime key a party published, if any.
///
/// `K` is the key material itself, only its presence matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnetimeKeyEntry<K> {
    pub party_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onetime_key: Option<K>,
}

impl<K> OnetimeKeyEntry<K> {
    pub fn new(party_name: impl Into<String>, onetime_key: Option<K>) -> Self {
        Self { party_name: party_name.into(), onetime_key }
    }

    pub fn has_key(&self) -> bool {
        self.onetime_key.is_some()
    }
}

/// Returns `false` as soon as an entry without a onetime key is found.
///
/// Empty slots (`None`) are skipped: only an entry that exists but lacks its key fails the check.
/// An empty key map has all its keys.
pub fn has_all_keys<K>(entries: &[Option<OnetimeKeyEntry<K>>]) -> bool {
    entries.iter().flatten().all(OnetimeKeyEntry::has_key)
}

/// Names of the parties whose entry is present but has no onetime key, in order.
pub fn parties_missing_keys<K>(entries: &[Option<OnetimeKeyEntry<K>>]) -> Vec<&str> {
    entries
        .iter()
        .flatten()
        .filter(|entry| !entry.has_key())
        .map(|entry| entry.party_name.as_str())
        .collect()
}
