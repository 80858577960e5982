//! Folding a freshly computed mapping into previously persisted state.

use std::collections::btree_map::Entry;

use syncmap_model::LibraryMapping;

/// Merge `fresh` into `existing` in place.
///
/// Clients and methods unknown to `existing` are inserted wholesale. For a
/// method present on both sides only `matches` is combined: a set union
/// that keeps existing entries first and drops duplicates, so hand-curated
/// matches in the persisted file survive automated re-runs (an empty fresh
/// list unions harmlessly). The existing record's `parameters` are left
/// untouched. `fresh.old_library` always overwrites the merged document's
/// identifier.
pub fn merge_mappings(existing: &mut LibraryMapping, fresh: LibraryMapping) {
    existing.old_library = fresh.old_library;

    for (client_name, fresh_client) in fresh.clients {
        match existing.clients.entry(client_name) {
            Entry::Vacant(slot) => {
                slot.insert(fresh_client);
            }
            Entry::Occupied(mut slot) => {
                let existing_client = slot.get_mut();
                for (method_name, fresh_method) in fresh_client.methods {
                    match existing_client.methods.entry(method_name) {
                        Entry::Vacant(slot) => {
                            slot.insert(fresh_method);
                        }
                        Entry::Occupied(mut slot) => {
                            let matches = &mut slot.get_mut().matches;
                            for candidate in fresh_method.matches {
                                if !matches.contains(&candidate) {
                                    matches.push(candidate);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
