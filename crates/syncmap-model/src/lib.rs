//! Value types for client method signatures and the persisted mapping
//! document.
//!
//! The document schema is consumed by migration tooling downstream, so field
//! names and key ordering are load-bearing: maps are `BTreeMap`s to keep
//! persisted output stable across runs.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

mod store;

pub use store::{load_mapping, mapping_file_name, save_mapping, StoreError};

/// Simple-name suffix that marks a type as an old-style asynchronous client.
pub const ASYNC_CLIENT_SUFFIX: &str = "AsyncClient";

/// Replacement substring used when deriving a synchronous client name.
pub const SYNC_CLIENT_SUFFIX: &str = "Client";

/// A single formal parameter, recorded exactly as written in source.
///
/// Types are compared as text, not resolved: `String` and
/// `java.lang.String` are different parameters on purpose.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

impl Parameter {
    #[must_use]
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// A method's name and ordered parameter list.
///
/// Identity (equality and hashing) covers the name and parameters only. The
/// display rendering is derived at construction and used for output, never
/// for comparison.
#[derive(Clone, Debug, Eq)]
pub struct MethodSignature {
    name: String,
    parameters: Vec<Parameter>,
    display: String,
}

impl MethodSignature {
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        let name = name.into();
        let rendered = parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let display = format!("{name}({rendered})");
        Self {
            name,
            parameters,
            display,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Human-readable `name(type1 name1, type2 name2, ...)` rendering.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }
}

impl Hash for MethodSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.parameters.hash(state);
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Declared methods per client, keyed by fully-qualified type name.
///
/// One of these is accumulated per library version scanned.
pub type ClientMethods = BTreeMap<String, Vec<MethodSignature>>;

/// Per-method record in the persisted document: the old method's parameter
/// list (disambiguating overloads for human readers) and the display
/// signatures of new-library methods judged equivalent.
///
/// `matches` carries set semantics: no duplicates, first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMatches {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub matches: Vec<String>,
}

/// All mapped methods of one old client, keyed by method name alone.
///
/// Keying by name means overloads collide: a later overload overwrites an
/// earlier one. Downstream consumers depend on this schema, so the collision
/// is preserved rather than corrected here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMapping {
    #[serde(default)]
    pub methods: BTreeMap<String, MethodMatches>,
}

/// Root persisted document: one per configured old library.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryMapping {
    #[serde(rename = "oldLibrary", default)]
    pub old_library: String,
    #[serde(default)]
    pub clients: BTreeMap<String, ClientMapping>,
}
