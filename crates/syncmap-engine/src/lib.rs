//! Signature matching and mapping merge.
//!
//! Everything here is pure logic over already-parsed declaration
//! collections: pairing old clients with new ones, matching methods
//! structurally, and folding a freshly computed mapping into persisted
//! state. No I/O happens in this crate, which keeps every decision rule
//! testable in isolation.

mod matcher;
mod merge;
mod resolve;

pub use matcher::{build_mapping, match_methods, MappingOutcome};
pub use merge::merge_mappings;
pub use resolve::resolve_sync_client;
