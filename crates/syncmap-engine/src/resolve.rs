//! Pairing of old client names with their expected new counterparts.

use std::collections::BTreeMap;

use syncmap_model::{ASYNC_CLIENT_SUFFIX, SYNC_CLIENT_SUFFIX};

/// Name of the new client expected to replace `old_client`.
///
/// Two-tier resolution: an explicit override wins verbatim, otherwise the
/// first occurrence of `AsyncClient` is rewritten to `Client`. This never
/// fails; a resolved name with no methods in the new library is reported
/// downstream as a missing client, not here.
#[must_use]
pub fn resolve_sync_client(old_client: &str, overrides: &BTreeMap<String, String>) -> String {
    if let Some(mapped) = overrides.get(old_client) {
        return mapped.clone();
    }
    old_client.replacen(ASYNC_CLIENT_SUFFIX, SYNC_CLIENT_SUFFIX, 1)
}
