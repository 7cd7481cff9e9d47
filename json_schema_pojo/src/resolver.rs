//! Schema resolution and the run-scoped node cache.
//!
//! Every location is identified by a [`CanonicalUri`]. The store hands out one
//! [`SchemaId`] per URI, and `$ref` nodes resolve to their target's id, so a
//! reference and its target are indistinguishable downstream.

use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::json_pointer;
use crate::schema::{CanonicalUri, Keywords, SchemaId, SchemaNode, SchemaShape};

/// A lexical child after `$ref` resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub id: SchemaId,
    /// The child location held a `$ref`; `id` is the target.
    pub via_reference: bool,
}

/// Documents and schema nodes loaded during one generation run.
///
/// Not shared between runs: create a new store or call [`SchemaStore::clear`].
#[derive(Debug, Default)]
pub struct SchemaStore {
    documents: HashMap<String, Value>,
    nodes: Vec<SchemaNode>,
    index: HashMap<CanonicalUri, SchemaId>,
}

impl SchemaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached document and node.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.nodes.clear();
        self.index.clear();
    }

    /// Number of distinct schema nodes materialized so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Makes a document available under `uri` without touching the file system.
    pub fn register_document(&mut self, uri: impl Into<String>, content: Value) {
        self.documents.insert(uri.into(), content);
    }

    #[must_use]
    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Resolves the root of a schema file.
    ///
    /// # Errors
    ///
    /// Returns `SchemaResolution` if the file cannot be read or parsed.
    pub fn load_file(&mut self, path: &Path) -> Result<SchemaId> {
        let uri: String = file_uri(path)?;
        self.resolve(&CanonicalUri::document_root(uri))
    }

    /// Returns the node for a canonical URI, loading its document on first use.
    ///
    /// # Errors
    ///
    /// Returns `SchemaResolution` for unreadable documents, missing pointer
    /// targets, non-schema targets and `$ref` loops, and
    /// `UnsupportedSchemaConstruct` for nodes no rule can classify.
    pub fn resolve(&mut self, uri: &CanonicalUri) -> Result<SchemaId> {
        self.resolve_guarded(uri, &mut Vec::new())
    }

    /// Resolves a location below `parent` by pointer segments, following `$ref`.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaStore::resolve`].
    pub fn child(&mut self, parent: SchemaId, segments: &[&str]) -> Result<Resolved> {
        let parent_node: &SchemaNode = self.node(parent);
        let uri: CanonicalUri = parent_node.uri.join(segments);
        if let Some(&id) = self.index.get(&uri) {
            return Ok(self.resolved(id, &uri));
        }
        let content: Value = segments
            .iter()
            .try_fold(&parent_node.content, |value, segment| {
                json_pointer::step(value, segment)
            })
            .cloned()
            .ok_or_else(|| GenerationError::resolution(&uri, "path not present"))?;
        let id: SchemaId = self.materialize(uri.clone(), Some(parent), content, &mut Vec::new())?;
        Ok(self.resolved(id, &uri))
    }

    /// Resolves a reference string relative to the document of `from`.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaStore::resolve`].
    pub fn resolve_reference(&mut self, from: SchemaId, reference: &str) -> Result<SchemaId> {
        let target: CanonicalUri = reference_uri(&self.node(from).uri.document, reference)?;
        self.resolve(&target)
    }

    /// Registers a node built from content that exists in no document, such as
    /// the merge of an `allOf`. Idempotent per URI.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedSchemaConstruct` if the content cannot be classified.
    pub fn synthesize(&mut self, uri: CanonicalUri, parent: SchemaId, content: Value) -> Result<SchemaId> {
        if let Some(&id) = self.index.get(&uri) {
            return Ok(id);
        }
        self.materialize(uri, Some(parent), content, &mut Vec::new())
    }

    fn resolved(&self, id: SchemaId, requested: &CanonicalUri) -> Resolved {
        Resolved {
            id,
            via_reference: self.node(id).uri != *requested,
        }
    }

    fn resolve_guarded(&mut self, uri: &CanonicalUri, chain: &mut Vec<CanonicalUri>) -> Result<SchemaId> {
        if let Some(&id) = self.index.get(uri) {
            return Ok(id);
        }
        if chain.contains(uri) {
            return Err(GenerationError::resolution(uri, "circular $ref chain"));
        }
        let document: &Value = self.document(&uri.document)?;
        let content: Value = json_pointer::lookup(document, &uri.pointer)
            .cloned()
            .ok_or_else(|| GenerationError::resolution(uri, "pointer does not exist in document"))?;
        self.materialize(uri.clone(), None, content, chain)
    }

    fn materialize(
        &mut self,
        uri: CanonicalUri,
        parent: Option<SchemaId>,
        content: Value,
        chain: &mut Vec<CanonicalUri>,
    ) -> Result<SchemaId> {
        let keywords: Keywords = match &content {
            Value::Object(_) => serde_json::from_value(content.clone())
                .map_err(|e| GenerationError::unsupported(&uri, e.to_string()))?,
            Value::Bool(true) => Keywords::default(),
            Value::Bool(false) => {
                return Err(GenerationError::unsupported(&uri, "schema `false` matches nothing"));
            }
            _ => return Err(GenerationError::resolution(&uri, "target is not a schema")),
        };

        if let Some(reference) = &keywords.reference {
            let target: CanonicalUri = reference_uri(&uri.document, reference)?;
            debug!(from = %uri, to = %target, "following $ref");
            chain.push(uri.clone());
            let id: SchemaId = self.resolve_guarded(&target, chain)?;
            chain.pop();
            self.index.insert(uri, id);
            return Ok(id);
        }

        let shape: SchemaShape =
            SchemaShape::classify(&keywords).map_err(|reason| GenerationError::unsupported(&uri, reason))?;
        let id: SchemaId = SchemaId(self.nodes.len());
        self.index.insert(uri.clone(), id);
        self.nodes.push(SchemaNode {
            id,
            uri,
            parent,
            content,
            keywords,
            shape,
        });
        Ok(id)
    }

    fn document(&mut self, uri: &str) -> Result<&Value> {
        match self.documents.entry(uri.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let value: Value = fetch(uri)?;
                debug!(%uri, "loaded schema document");
                Ok(entry.insert(value))
            }
        }
    }
}

fn fetch(uri: &str) -> Result<Value> {
    let Some(path) = uri.strip_prefix("file://") else {
        return Err(GenerationError::resolution(
            uri,
            "unsupported scheme (only file: documents are read; register others in memory)",
        ));
    };
    let path: String = json_pointer::percent_decode(path);
    let text: String = std::fs::read_to_string(&path)
        .map_err(|e| GenerationError::resolution(uri, format!("cannot read document: {e}")))?;
    serde_json::from_str(&text).map_err(|e| GenerationError::resolution(uri, format!("invalid JSON: {e}")))
}

/// The `file:` URI of a path, made absolute without touching symlinks.
///
/// # Errors
///
/// Returns `SchemaResolution` if the current directory cannot be determined.
pub fn file_uri(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)
        .map_err(|e| GenerationError::resolution(path.display(), e.to_string()))?;
    let text: String = absolute.to_string_lossy().replace('\\', "/");
    let rooted: String = if text.starts_with('/') {
        text
    } else {
        format!("/{text}")
    };
    Ok(normalize_dot_segments(&format!("file://{rooted}")))
}

/// Turns a `$ref` value into a canonical URI relative to `base_document`.
///
/// # Errors
///
/// Returns `SchemaResolution` for fragments that are not JSON pointers.
pub fn reference_uri(base_document: &str, reference: &str) -> Result<CanonicalUri> {
    let (document_part, fragment): (&str, Option<&str>) = match reference.split_once('#') {
        Some((document, fragment)) => (document, Some(fragment)),
        None => (reference, None),
    };
    let document: String = if document_part.is_empty() {
        base_document.to_string()
    } else {
        join_uri(base_document, document_part)
    };
    let pointer: String = fragment.map(json_pointer::percent_decode).unwrap_or_default();
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(GenerationError::resolution(
            reference,
            "only JSON pointer fragments are supported",
        ));
    }
    Ok(CanonicalUri { document, pointer })
}

/// Rewrites every `$ref` below `value` to an absolute URI, so the subschema can
/// be moved into another document without changing what it points at.
///
/// # Errors
///
/// Returns `SchemaResolution` for malformed references.
pub fn absolutize_refs(value: &mut Value, base_document: &str) -> Result<()> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get_mut("$ref") {
                *reference = reference_uri(base_document, reference)?.to_string();
            }
            for (key, child) in map.iter_mut() {
                if matches!(key.as_str(), "enum" | "const" | "default" | "examples") {
                    continue;
                }
                absolutize_refs(child, base_document)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                absolutize_refs(item, base_document)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Whether `reference` starts with a URI scheme such as `file:` or `mem:`.
#[must_use]
pub fn has_scheme(reference: &str) -> bool {
    reference.split_once(':').is_some_and(|(scheme, _)| {
        scheme.len() > 1
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Resolves `relative` against the directory of `base`.
fn join_uri(base: &str, relative: &str) -> String {
    if has_scheme(relative) {
        return normalize_dot_segments(relative);
    }
    let (prefix, _) = split_authority(base);
    if relative.starts_with('/') {
        return normalize_dot_segments(&format!("{prefix}{relative}"));
    }
    let directory: &str = base.rsplit_once('/').map_or("", |(directory, _)| directory);
    normalize_dot_segments(&format!("{directory}/{relative}"))
}

/// Splits `scheme://authority` from the path.
fn split_authority(uri: &str) -> (&str, &str) {
    let Some(scheme_end) = uri.find("://") else {
        return ("", uri);
    };
    let after: usize = scheme_end + 3;
    let path_start: usize = uri[after..].find('/').map_or(uri.len(), |i| after + i);
    uri.split_at(path_start)
}

fn normalize_dot_segments(uri: &str) -> String {
    let (prefix, path) = split_authority(uri);
    let mut out: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last_index: usize = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {}
            ".." => {
                if out.len() > 1 {
                    out.pop();
                }
            }
            "" if i != 0 && i != last_index => {}
            other => out.push(other),
        }
    }
    format!("{prefix}{}", out.join("/"))
}
