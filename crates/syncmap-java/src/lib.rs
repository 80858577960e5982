//! Java declaration scanning for client classification.
//!
//! A thin tree-sitter frontend that pulls class/interface declarations and
//! their method signatures out of `.java` sources. We only need declaration
//! shapes, so an error-tolerant concrete syntax tree is plenty; whatever a
//! broken file still declares is collected best-effort.

use syncmap_model::{ClientMethods, MethodSignature, Parameter, ASYNC_CLIENT_SUFFIX};
use tree_sitter::{Node, Parser};

/// Which side of the migration a scanned type belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientRole {
    /// Legacy asynchronous clients, identified by the `AsyncClient` suffix.
    Async,
    /// Replacement synchronous clients: everything else.
    Sync,
}

impl ClientRole {
    /// Role of a type, judged purely by its simple name.
    #[must_use]
    pub fn of_simple_name(name: &str) -> Self {
        if name.ends_with(ASYNC_CLIENT_SUFFIX) {
            ClientRole::Async
        } else {
            ClientRole::Sync
        }
    }

    #[must_use]
    pub fn accepts(self, simple_name: &str) -> bool {
        Self::of_simple_name(simple_name) == self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to load Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,
}

/// Reusable Java source scanner.
///
/// Collects every class/interface declaration matching a [`ClientRole`] into
/// a caller-owned [`ClientMethods`] accumulator, keyed by fully-qualified
/// name. The accumulator is scoped to one library scan and owned by the
/// caller; the scanner itself keeps no state between files beyond the parser.
pub struct JavaScanner {
    parser: Parser,
}

impl JavaScanner {
    pub fn new() -> Result<Self, ScanError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::language())?;
        Ok(Self { parser })
    }

    /// Scan one compilation unit, adding matching types to `out`.
    ///
    /// Fully-qualified names are `package.Outer.Inner` when a package
    /// declaration is present, the enclosing-type chain alone otherwise.
    /// All declared methods of a matching type are collected; constructors
    /// are not methods and are skipped.
    pub fn scan(
        &mut self,
        source: &str,
        role: ClientRole,
        out: &mut ClientMethods,
    ) -> Result<(), ScanError> {
        let tree = self.parser.parse(source, None).ok_or(ScanError::NoTree)?;
        let root = tree.root_node();

        let package = package_name(root, source);
        let mut scope: Vec<String> = Vec::new();
        collect_types(root, source, role, package.as_deref(), &mut scope, out);
        Ok(())
    }
}

fn package_name(root: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "package_declaration" {
            continue;
        }
        let mut inner = child.walk();
        for part in child.named_children(&mut inner) {
            if matches!(part.kind(), "identifier" | "scoped_identifier") {
                return Some(node_text(part, source));
            }
        }
    }
    None
}

fn collect_types(
    node: Node<'_>,
    source: &str,
    role: ClientRole,
    package: Option<&str>,
    scope: &mut Vec<String>,
    out: &mut ClientMethods,
) {
    if matches!(node.kind(), "class_declaration" | "interface_declaration") {
        if let Some(name_node) = node.child_by_field_name("name") {
            let simple_name = node_text(name_node, source);

            if role.accepts(&simple_name) {
                let qualified = qualified_name(package, scope, &simple_name);
                let methods = declared_methods(node, source);
                out.insert(qualified, methods);
            }

            scope.push(simple_name);
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_types(child, source, role, package, scope, out);
            }
            scope.pop();
            return;
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_types(child, source, role, package, scope, out);
    }
}

fn qualified_name(package: Option<&str>, scope: &[String], simple_name: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(package) = package {
        parts.push(package);
    }
    parts.extend(scope.iter().map(String::as_str));
    parts.push(simple_name);
    parts.join(".")
}

fn declared_methods(type_node: Node<'_>, source: &str) -> Vec<MethodSignature> {
    let mut methods = Vec::new();
    let Some(body) = type_node.child_by_field_name("body") else {
        return methods;
    };

    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() != "method_declaration" {
            continue;
        }
        let Some(name_node) = member.child_by_field_name("name") else {
            continue;
        };
        let name = node_text(name_node, source);
        let parameters = member
            .child_by_field_name("parameters")
            .map(|params| method_parameters(params, source))
            .unwrap_or_default();
        methods.push(MethodSignature::new(name, parameters));
    }
    methods
}

fn method_parameters(params_node: Node<'_>, source: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.named_children(&mut cursor) {
        match child.kind() {
            "formal_parameter" => {
                let Some(ty) = child.child_by_field_name("type") else {
                    continue;
                };
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                parameters.push(Parameter::new(
                    node_text(ty, source),
                    node_text(name, source),
                ));
            }
            "spread_parameter" => {
                if let Some(parameter) = spread_parameter(child, source) {
                    parameters.push(parameter);
                }
            }
            // Annotations, receiver parameters (`this`), comments.
            _ => {}
        }
    }
    parameters
}

// `spread_parameter` carries no fields in the grammar: the element type is
// the named child preceding `...` and the name lives in a trailing
// `variable_declarator`. Recorded with the element type, without `...`.
fn spread_parameter(node: Node<'_>, source: &str) -> Option<Parameter> {
    let mut ty = None;
    let mut name = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "modifiers" => {}
            "variable_declarator" => {
                name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source));
            }
            _ if ty.is_none() => ty = Some(node_text(child, source)),
            _ => {}
        }
    }
    Some(Parameter::new(ty?, name?))
}

// Type nodes can span lines in source; collapse interior whitespace so the
// recorded text is comparable across both libraries.
fn node_text(node: Node<'_>, source: &str) -> String {
    let raw = node.utf8_text(source.as_bytes()).unwrap_or_default();
    let mut text = String::with_capacity(raw.len());
    let mut pending_space = false;
    for part in raw.split_whitespace() {
        if pending_space {
            text.push(' ');
        }
        text.push_str(part);
        pending_space = true;
    }
    text
}
