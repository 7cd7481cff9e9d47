//! Type graph construction: run state, type registration and object members.
//!
//! The shape rules live in `dispatch`; this module owns what they share.

use serde_json::Value;
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::model::{
    Bound, Constraints, GeneratedType, Property, TypeGraph, TypeId, TypeKind, TypeRef,
};
use crate::naming::{Claim, NameAllocator, NameRegistry};
use crate::polymorphism::{ChildTarget, ChildType, DiscriminatorDecl, PendingBinding};
use crate::resolver::SchemaStore;
use crate::schema::{CanonicalUri, ExclusiveBound, Keywords, SchemaId};
use crate::settings::GenerationSettings;

/// Where a newly generated type is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Its own compilation unit in the target package.
    TopLevel,
    /// Inside the given type.
    Nested(TypeId),
}

/// The name a schema occurs under, and where a type for it would go.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub name: &'a str,
    pub placement: Placement,
}

impl<'a> Request<'a> {
    pub const fn top_level(name: &'a str) -> Self {
        Self {
            name,
            placement: Placement::TopLevel,
        }
    }
}

/// Result of registering a type for a schema location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created(TypeId),
    /// The location already has a type; nothing was added.
    Existing(TypeId),
}

/// Mutable state of one generation run.
#[derive(Debug)]
pub struct GraphBuilder {
    pub settings: GenerationSettings,
    pub store: SchemaStore,
    pub graph: TypeGraph,
    pub registry: NameRegistry,
    pub pending: Vec<PendingBinding>,
    /// `allOf` nodes whose members are being merged.
    pub merging: Vec<SchemaId>,
}

impl GraphBuilder {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            store: SchemaStore::new(),
            graph: TypeGraph::default(),
            registry: NameRegistry::default(),
            pending: Vec::new(),
            merging: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.store.clear();
        self.graph.clear();
        self.registry.clear();
        self.pending.clear();
        self.merging.clear();
    }

    /// Generates whatever the schema at `uri` describes, as a top-level type.
    pub fn generate(&mut self, uri: &CanonicalUri) -> Result<TypeRef> {
        let id: SchemaId = self.store.resolve(uri)?;
        let name: String = reference_name(&self.store.node(id).uri);
        self.dispatch(&Request::top_level(&name), id)
    }

    pub fn names(&self) -> NameAllocator<'_> {
        NameAllocator::new(&self.settings)
    }

    /// Creates the type for `node`, or reports the one that already holds its name.
    pub fn register_type(
        &mut self,
        request: &Request<'_>,
        node: SchemaId,
        kind: TypeKind,
    ) -> Result<Registration> {
        let schema = self.store.node(node);
        let uri: CanonicalUri = schema.uri.clone();
        let keywords: &Keywords = &schema.keywords;

        let (package, name, enclosing): (String, String, Option<TypeId>) =
            if let Some(java_type) = &keywords.java_type {
                match java_type.rsplit_once('.') {
                    Some((package, simple)) => (package.to_string(), simple.to_string(), None),
                    None => (self.settings.target_package.clone(), java_type.clone(), None),
                }
            } else {
                let raw: &str = keywords
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|title| self.settings.use_title_as_class_name && !title.is_empty())
                    .unwrap_or(request.name);
                let name: String = self.names().type_name(raw);
                match request.placement {
                    Placement::TopLevel => (self.settings.target_package.clone(), name, None),
                    Placement::Nested(owner) => {
                        (self.graph.get(owner).package.clone(), name, Some(owner))
                    }
                }
            };
        let title: Option<String> = keywords.title.clone();
        let description: Option<String> = keywords.description.clone();

        let qualified: String = match enclosing {
            Some(owner) => format!("{}.{name}", self.graph.qualified_name(owner)),
            None if package.is_empty() => name.clone(),
            None => format!("{package}.{name}"),
        };
        if let Claim::Taken(existing) = self.registry.claim(&qualified, &uri)? {
            return Ok(Registration::Existing(existing));
        }
        if let Some(owner) = enclosing {
            self.check_enclosing_names(owner, &name, &uri)?;
        }

        debug!(%uri, %qualified, ?kind, "registering type");
        let record_uri: CanonicalUri = uri.clone();
        let id: TypeId = self.graph.insert(|id| {
            let mut generated: GeneratedType = GeneratedType::new(id, kind, package, name, uri);
            generated.enclosing = enclosing;
            generated.title = title;
            generated.description = description;
            generated
        });
        self.registry.record(qualified, id, record_uri);
        Ok(Registration::Created(id))
    }

    /// A nested type may not share a simple name with any type enclosing it.
    fn check_enclosing_names(&self, owner: TypeId, name: &str, uri: &CanonicalUri) -> Result<()> {
        let mut current: Option<TypeId> = Some(owner);
        while let Some(id) = current {
            let enclosing: &GeneratedType = self.graph.get(id);
            if enclosing.name == name {
                return Err(GenerationError::NameConflict {
                    name: self.graph.qualified_name(id),
                    existing: enclosing.uri.to_string(),
                    requested: uri.to_string(),
                });
            }
            current = enclosing.enclosing;
        }
        Ok(())
    }

    /// Fills a registered class from its node: supertype, properties,
    /// extension map and discriminator.
    pub fn populate_object(&mut self, id: TypeId, node: SchemaId, raw_name: &str) -> Result<()> {
        let keywords: Keywords = self.store.node(node).keywords.clone();
        if keywords.extends.is_some() {
            self.attach_supertype(id, node, raw_name)?;
        }
        let required: &[String] = keywords.required_keys();
        if let Some(properties) = &keywords.properties {
            for key in properties.keys() {
                self.add_property(id, node, key, required)?;
            }
        }
        self.attach_additional_properties(id, node, raw_name, keywords.additional_properties.as_ref())?;
        if let Some(metadata) = keywords.discriminator_metadata() {
            self.declare_discriminator(id, node, metadata)?;
        }
        Ok(())
    }

    fn attach_supertype(&mut self, id: TypeId, node: SchemaId, raw_name: &str) -> Result<()> {
        let parent = self.store.child(node, &["extends"])?;
        let raw: String = if parent.via_reference {
            reference_name(&self.store.node(parent.id).uri)
        } else {
            format!("{raw_name}Parent")
        };
        let supertype: TypeRef = self.dispatch(&Request::top_level(&raw), parent.id)?;
        let uri: &CanonicalUri = &self.store.node(node).uri;
        match &supertype {
            TypeRef::Generated(parent_id) if self.graph.get(*parent_id).kind == TypeKind::Class => {
                if self.inherits_from(*parent_id, id) {
                    return Err(GenerationError::unsupported(uri, "circular `extends`"));
                }
            }
            TypeRef::Library(_) => {}
            _ => {
                return Err(GenerationError::unsupported(
                    uri,
                    "`extends` must describe an object type",
                ));
            }
        }
        self.graph.get_mut(id).supertype = Some(supertype);
        Ok(())
    }

    /// Whether `candidate` is `ancestor` or has it on its superclass chain.
    pub fn inherits_from(&self, candidate: TypeId, ancestor: TypeId) -> bool {
        let mut current: Option<TypeId> = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = match &self.graph.get(id).supertype {
                Some(TypeRef::Generated(parent)) => Some(*parent),
                _ => None,
            };
        }
        false
    }

    fn add_property(&mut self, id: TypeId, node: SchemaId, key: &str, required: &[String]) -> Result<()> {
        let resolved = self.store.child(node, &["properties", key])?;
        let target = self.store.node(resolved.id);
        let (raw_type_name, placement): (String, Placement) = if resolved.via_reference {
            (reference_name(&target.uri), Placement::TopLevel)
        } else {
            (key.to_string(), Placement::Nested(id))
        };
        let field_source: String = target.keywords.java_name.clone().unwrap_or_else(|| key.to_string());
        let is_required: bool = required.iter().any(|r| r == key) || target.keywords.required_flag();
        let title: Option<String> = target.keywords.title.clone();
        let description: Option<String> = target.keywords.description.clone();
        let constraints: Constraints = constraints_of(&target.keywords);
        let default: Option<Value> = target.keywords.default.clone();

        let type_ref: TypeRef = self.dispatch(
            &Request {
                name: &raw_type_name,
                placement,
            },
            resolved.id,
        )?;
        let name: String = self.names().property_name(&field_source);

        let owner: &mut GeneratedType = self.graph.get_mut(id);
        if let Some(existing) = owner.properties.iter().find(|p| p.name == name) {
            return Err(GenerationError::NameConflict {
                name: format!("{}.{name}", owner.name),
                existing: existing.json_key.clone(),
                requested: key.to_string(),
            });
        }
        owner.properties.push(Property {
            json_key: key.to_string(),
            name,
            type_ref,
            required: is_required,
            title,
            description,
            constraints,
            default,
        });
        Ok(())
    }

    fn attach_additional_properties(
        &mut self,
        id: TypeId,
        node: SchemaId,
        raw_name: &str,
        value: Option<&Value>,
    ) -> Result<()> {
        if !self.settings.additional_properties_enabled() {
            return Ok(());
        }
        let value_type: TypeRef = match value {
            Some(Value::Bool(false)) => return Ok(()),
            None | Some(Value::Bool(true)) => TypeRef::Any,
            Some(Value::Object(schema)) if schema.is_empty() => TypeRef::Any,
            Some(_) => {
                let resolved = self.store.child(node, &["additionalProperties"])?;
                let (raw, placement): (String, Placement) = if resolved.via_reference {
                    (reference_name(&self.store.node(resolved.id).uri), Placement::TopLevel)
                } else {
                    (format!("{raw_name}Property"), Placement::Nested(id))
                };
                self.dispatch(&Request { name: &raw, placement }, resolved.id)?
            }
        };
        self.graph.get_mut(id).additional_properties = Some(value_type);
        Ok(())
    }

    /// Parses discriminator metadata and generates the declared children;
    /// linking waits until the graph is complete.
    pub fn declare_discriminator(&mut self, id: TypeId, node: SchemaId, metadata: &Value) -> Result<()> {
        let uri: CanonicalUri = self.store.node(node).uri.clone();
        let decl: DiscriminatorDecl =
            DiscriminatorDecl::parse(&uri, metadata, self.settings.default_discriminator_id)?;
        let mut children: Vec<(ChildType, Option<String>)> = Vec::with_capacity(decl.children.len());
        for child in &decl.children {
            let target: ChildType = match &child.target {
                ChildTarget::Reference(reference) => {
                    let child_node: SchemaId = self.store.resolve_reference(node, reference)?;
                    let raw: String = reference_name(&self.store.node(child_node).uri);
                    ChildType::Resolved(self.dispatch(&Request::top_level(&raw), child_node)?)
                }
                ChildTarget::ClassName(name) => ChildType::Named(name.clone()),
            };
            children.push((target, child.tag.clone()));
        }
        debug!(%uri, children = children.len(), "discriminator declared");
        self.pending.push(PendingBinding {
            parent: id,
            uri,
            decl,
            children,
        });
        Ok(())
    }
}

/// Name for a schema reached by reference or loaded as a document: the
/// `definitions`/`$defs` key, the last pointer segment, or the file stem.
pub fn reference_name(uri: &CanonicalUri) -> String {
    match uri.tail() {
        (_, None) => uri.document_stem(),
        (Some(parent), Some(last)) if last.chars().all(|c| c.is_ascii_digit()) => {
            format!("{parent}{last}")
        }
        (_, Some(last)) => last,
    }
}

/// Constraint facts of a property schema.
pub fn constraints_of(keywords: &Keywords) -> Constraints {
    Constraints {
        minimum: bound(keywords.minimum.as_ref(), keywords.exclusive_minimum.as_ref()),
        maximum: bound(keywords.maximum.as_ref(), keywords.exclusive_maximum.as_ref()),
        min_size: keywords.min_items.or(keywords.min_length),
        max_size: keywords.max_items.or(keywords.max_length),
        pattern: keywords.pattern.clone(),
    }
}

/// A numeric `exclusiveMinimum`/`exclusiveMaximum` replaces the inclusive bound.
fn bound(inclusive: Option<&serde_json::Number>, exclusive: Option<&ExclusiveBound>) -> Option<Bound> {
    match exclusive {
        Some(ExclusiveBound::Value(value)) => Some(Bound {
            value: value.clone(),
            exclusive: true,
        }),
        Some(ExclusiveBound::Flag(flag)) => inclusive.map(|value| Bound {
            value: value.clone(),
            exclusive: *flag,
        }),
        None => inclusive.map(|value| Bound {
            value: value.clone(),
            exclusive: false,
        }),
    }
}
