//! Discriminator metadata and the binding pass that links subtype families.
//!
//! Metadata is parsed while the parent is built (so referenced children are
//! generated through the ordinary dispatch path) and bound once the whole
//! graph exists, because `className` children may be declared anywhere.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::model::{Inclusion, PolymorphicBinding, TypeGraph, TypeId, TypeKind, TypeRef};
use crate::schema::CanonicalUri;
use crate::settings::DiscriminatorId;

/// A declared child, before generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTarget {
    Reference(String),
    ClassName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDecl {
    pub target: ChildTarget,
    pub tag: Option<String>,
}

/// Parsed `discriminator` (or `deserializationClassProperty`) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorDecl {
    pub inclusion: Inclusion,
    pub identification: DiscriminatorId,
    pub property_name: String,
    pub children: Vec<ChildDecl>,
}

/// A declared child after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildType {
    Resolved(TypeRef),
    Named(String),
}

/// A discriminator waiting for the graph to be complete.
#[derive(Debug, Clone)]
pub struct PendingBinding {
    pub parent: TypeId,
    pub uri: CanonicalUri,
    pub decl: DiscriminatorDecl,
    pub children: Vec<(ChildType, Option<String>)>,
}

impl DiscriminatorDecl {
    /// Accepts a bare property name or an object with `propertyName`,
    /// `include`, `use`, `children` and `mapping`.
    pub fn parse(uri: &CanonicalUri, metadata: &Value, default_id: DiscriminatorId) -> Result<Self> {
        match metadata {
            Value::String(property_name) => Ok(Self {
                inclusion: Inclusion::default(),
                identification: default_id,
                property_name: property_name.clone(),
                children: Vec::new(),
            }),
            Value::Object(map) => Self::parse_object(uri, map, default_id),
            _ => Err(GenerationError::binding(
                uri,
                "discriminator must be a property name or an object",
            )),
        }
    }

    fn parse_object(uri: &CanonicalUri, map: &Map<String, Value>, default_id: DiscriminatorId) -> Result<Self> {
        let property_name: Option<String> = optional_string(uri, map, "propertyName")?;
        let include: Option<String> = optional_string(uri, map, "include")?;
        let inclusion: Inclusion = match include.as_deref() {
            None | Some("property") => Inclusion::Property,
            Some("externalProperty") => Inclusion::ExternalProperty,
            Some(other) => {
                return Err(GenerationError::binding(uri, format!("unknown include mode `{other}`")));
            }
        };
        let identification: DiscriminatorId = match optional_string(uri, map, "use")?.as_deref() {
            None => default_id,
            Some("name") => DiscriminatorId::LogicalName,
            Some("class") => DiscriminatorId::ClassName,
            Some(other) => {
                return Err(GenerationError::binding(uri, format!("unknown use mode `{other}`")));
            }
        };
        let property_name: String = match (property_name, include) {
            (Some(name), _) => name,
            (None, Some(_)) => {
                return Err(GenerationError::binding(
                    uri,
                    "`propertyName` is required when `include` is set",
                ));
            }
            (None, None) => default_property_name(identification).to_string(),
        };

        let mut children: Vec<ChildDecl> = Vec::new();
        if let Some(declared) = map.get("children") {
            let Value::Array(entries) = declared else {
                return Err(GenerationError::binding(uri, "`children` must be an array"));
            };
            for entry in entries {
                children.push(parse_child(uri, entry)?);
            }
        }
        if let Some(mapping) = map.get("mapping") {
            let Value::Object(entries) = mapping else {
                return Err(GenerationError::binding(uri, "`mapping` must be an object"));
            };
            for (tag, target) in entries {
                let Value::String(reference) = target else {
                    return Err(GenerationError::binding(
                        uri,
                        format!("mapping for `{tag}` must be a reference string"),
                    ));
                };
                children.push(ChildDecl {
                    target: ChildTarget::Reference(reference.clone()),
                    tag: Some(tag.clone()),
                });
            }
        }

        Ok(Self {
            inclusion,
            identification,
            property_name,
            children,
        })
    }
}

const fn default_property_name(identification: DiscriminatorId) -> &'static str {
    match identification {
        DiscriminatorId::LogicalName => "@type",
        DiscriminatorId::ClassName => "@class",
    }
}

fn optional_string(uri: &CanonicalUri, map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(GenerationError::binding(uri, format!("`{key}` must be a string"))),
    }
}

fn parse_child(uri: &CanonicalUri, entry: &Value) -> Result<ChildDecl> {
    let Value::Object(map) = entry else {
        return Err(GenerationError::binding(uri, "each child must be an object"));
    };
    let tag: Option<String> = optional_string(uri, map, "value")?;
    let target: ChildTarget = match (
        optional_string(uri, map, "$ref")?,
        optional_string(uri, map, "className")?,
    ) {
        (Some(reference), None) => ChildTarget::Reference(reference),
        (None, Some(class_name)) => ChildTarget::ClassName(class_name),
        _ => {
            return Err(GenerationError::binding(
                uri,
                "each child needs exactly one of `$ref` and `className`",
            ));
        }
    };
    Ok(ChildDecl { target, tag })
}

/// Links every pending discriminator to its subtypes.
///
/// Without declared children, the parent's existing subtypes are used: the
/// branches of a `oneOf`/`anyOf` marker and the classes that extend it.
pub fn bind_all(graph: &mut TypeGraph, pending: &[PendingBinding]) -> Result<()> {
    for binding in pending {
        bind(graph, binding)?;
    }
    Ok(())
}

fn bind(graph: &mut TypeGraph, pending: &PendingBinding) -> Result<()> {
    let parent: TypeId = pending.parent;
    let uri: &CanonicalUri = &pending.uri;
    let mut declared: Vec<(TypeId, Option<String>)> = Vec::with_capacity(pending.children.len());
    for (child, tag) in &pending.children {
        let id: TypeId = match child {
            ChildType::Resolved(TypeRef::Generated(id)) => *id,
            ChildType::Resolved(_) => {
                return Err(GenerationError::binding(uri, "child does not describe a generated type"));
            }
            ChildType::Named(name) => graph
                .find(name)
                .ok_or_else(|| GenerationError::binding(uri, format!("unknown child class `{name}`")))?,
        };
        declared.push((id, tag.clone()));
    }
    if declared.is_empty() {
        declared = implicit_children(graph, parent).into_iter().map(|id| (id, None)).collect();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut children: Vec<(TypeId, String)> = Vec::with_capacity(declared.len());
    for (id, tag) in declared {
        if id == parent {
            debug!(%uri, "discriminator lists its own type; skipped");
            continue;
        }
        let tag: String = tag.unwrap_or_else(|| match pending.decl.identification {
            DiscriminatorId::LogicalName => graph.get(id).name.clone(),
            DiscriminatorId::ClassName => graph.qualified_name(id),
        });
        if !seen.insert(tag.clone()) {
            return Err(GenerationError::binding(uri, format!("duplicate discriminator value `{tag}`")));
        }
        link(graph, parent, id, uri)?;
        children.push((id, tag));
    }

    debug!(%uri, children = children.len(), "bound discriminator");
    graph.get_mut(parent).binding = Some(PolymorphicBinding {
        inclusion: pending.decl.inclusion,
        identification: pending.decl.identification,
        property_name: pending.decl.property_name.clone(),
        children,
    });
    Ok(())
}

fn implicit_children(graph: &TypeGraph, parent: TypeId) -> Vec<TypeId> {
    let mut children: Vec<TypeId> = graph.get(parent).subtypes.clone();
    for ty in graph.iter() {
        if ty.supertype == Some(TypeRef::Generated(parent)) && !children.contains(&ty.id) {
            children.push(ty.id);
        }
    }
    children
}

/// Makes `child` a Java subtype of `parent` unless it already is one.
fn link(graph: &mut TypeGraph, parent: TypeId, child: TypeId, uri: &CanonicalUri) -> Result<()> {
    let parent_kind: TypeKind = graph.get(parent).kind;
    let child_type = graph.get_mut(child);
    if child_type.kind == TypeKind::Enum && parent_kind == TypeKind::Class {
        return Err(GenerationError::binding(uri, format!("enum `{}` cannot extend a class", child_type.name)));
    }
    match parent_kind {
        TypeKind::Interface => {
            if !child_type.interfaces.contains(&parent) {
                child_type.interfaces.push(parent);
            }
        }
        TypeKind::Class => match child_type.supertype {
            None => child_type.supertype = Some(TypeRef::Generated(parent)),
            Some(TypeRef::Generated(existing)) if existing == parent => {}
            Some(_) => {
                return Err(GenerationError::binding(
                    uri,
                    format!("`{}` already extends another type", child_type.name),
                ));
            }
        },
        TypeKind::Enum => {
            return Err(GenerationError::binding(uri, "an enum cannot carry a discriminator"));
        }
    }
    let subtypes: &mut Vec<TypeId> = &mut graph.get_mut(parent).subtypes;
    if !subtypes.contains(&child) {
        subtypes.push(child);
    }
    Ok(())
}
