//! Structural method matching between one old client and its resolved
//! counterpart.

use std::collections::BTreeMap;

use syncmap_model::{
    ClientMapping, ClientMethods, LibraryMapping, MethodMatches, MethodSignature,
};

use crate::resolve::resolve_sync_client;

/// Result of building a fresh mapping for one library pair.
#[derive(Clone, Debug, Default)]
pub struct MappingOutcome {
    pub mapping: LibraryMapping,
    /// Old clients for which the resolved new client had no methods, in
    /// discovery order.
    pub missing_clients: Vec<String>,
}

/// Match every old method against a pool of new methods.
///
/// A new method qualifies when its name and full positional parameter list
/// (type and name) equal the old method's; all qualifying candidates are
/// kept so ambiguous duplicates in the new API stay visible. An empty match
/// list is the representable "unmapped method" outcome, not an error.
///
/// The output is keyed by method name alone, so a second overload of a name
/// overwrites the first. Downstream consumers of the persisted schema depend
/// on this shape.
#[must_use]
pub fn match_methods(
    old_methods: &[MethodSignature],
    new_methods: &[MethodSignature],
) -> ClientMapping {
    let mut mapping = ClientMapping::default();
    for old_method in old_methods {
        let matches: Vec<String> = new_methods
            .iter()
            .filter(|candidate| *candidate == old_method)
            .map(|candidate| candidate.display().to_string())
            .collect();
        mapping.methods.insert(
            old_method.name().to_string(),
            MethodMatches {
                parameters: old_method.parameters().to_vec(),
                matches,
            },
        );
    }
    mapping
}

/// Build a fresh mapping for one library pair.
///
/// Every old client is paired via [`resolve_sync_client`] and matched
/// against the new library's methods. An empty `new_clients` map is the
/// extraction-only mode: every old client is reported missing and every
/// method maps to nothing.
#[must_use]
pub fn build_mapping(
    old_library: &str,
    old_clients: &ClientMethods,
    new_clients: &ClientMethods,
    overrides: &BTreeMap<String, String>,
) -> MappingOutcome {
    let mut outcome = MappingOutcome {
        mapping: LibraryMapping {
            old_library: old_library.to_string(),
            ..LibraryMapping::default()
        },
        missing_clients: Vec::new(),
    };

    for (old_client, old_methods) in old_clients {
        let new_client = resolve_sync_client(old_client, overrides);
        let new_methods = new_clients
            .get(&new_client)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if new_methods.is_empty() {
            tracing::debug!(%old_client, %new_client, "no matching client in new library");
            outcome.missing_clients.push(old_client.clone());
        }

        outcome
            .mapping
            .clients
            .insert(old_client.clone(), match_methods(old_methods, new_methods));
    }

    outcome
}
