//! Decoration of the finished type graph.
//!
//! Each family is a pure function from a type to the directives it wants
//! attached. Families never see each other's output, so any combination can
//! be enabled.

use std::collections::BTreeMap;

use crate::model::{GeneratedType, Inclusion, TypeGraph, TypeId, TypeKind};
use crate::settings::{AnnotationStyle, DiscriminatorId, GenerationSettings};

/// What a directive is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectiveTarget {
    Type(TypeId),
    /// Property by index in declaration order.
    Property(TypeId, usize),
    /// Enum constant by index.
    Constant(TypeId, usize),
    ExtensionMap(TypeId),
}

/// One unit of decoration metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// JSON member name, in the vocabulary of the given library.
    WireName { style: AnnotationStyle, name: String },
    /// Gson: the field takes part in (de)serialization.
    Expose,
    /// Jackson: serialize properties in schema order.
    PropertyOrder(Vec<String>),
    /// Jackson: omit null members.
    IncludeNonNull,
    /// Jackson: unknown members go through the extension map.
    AnyProperties,
    /// Jackson: enums (de)serialize through their literal value.
    EnumValue,
    TypeInfo {
        identification: DiscriminatorId,
        inclusion: Inclusion,
        property: String,
    },
    /// Subtypes, with tags when identified by logical name.
    SubTypes(Vec<(TypeId, Option<String>)>),
    TypeName(String),
    DecimalMin { value: String, inclusive: bool },
    DecimalMax { value: String, inclusive: bool },
    Size { min: Option<u64>, max: Option<u64> },
    Pattern(String),
    NotNull,
    /// Validate the nested object as well.
    Valid,
    Doc(String),
    /// Documents that the property is required.
    RequiredDoc,
}

type Family = fn(&TypeGraph, &GeneratedType, &GenerationSettings) -> Vec<(DirectiveTarget, Directive)>;

struct FamilyEntry {
    enabled: fn(&GenerationSettings) -> bool,
    decorate: Family,
}

const FAMILIES: [FamilyEntry; 4] = [
    FamilyEntry {
        enabled: |settings| settings.annotation_style != AnnotationStyle::None,
        decorate: binding_family,
    },
    FamilyEntry {
        enabled: |settings| settings.include_type_info && settings.annotation_style.supports_type_info(),
        decorate: type_info_family,
    },
    FamilyEntry {
        enabled: |settings| settings.include_jsr303_annotations,
        decorate: validation_family,
    },
    FamilyEntry {
        enabled: |settings| settings.include_documentation,
        decorate: documentation_family,
    },
];

/// Directives of every enabled family, by target.
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    directives: BTreeMap<DirectiveTarget, Vec<Directive>>,
}

impl Decorations {
    /// Directives attached to `target`, in family order.
    #[must_use]
    pub fn on(&self, target: DirectiveTarget) -> &[Directive] {
        self.directives.get(&target).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has(&self, target: DirectiveTarget, directive: &Directive) -> bool {
        self.on(target).contains(directive)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Runs every enabled family over every type.
#[must_use]
pub fn decorate(graph: &TypeGraph, settings: &GenerationSettings) -> Decorations {
    let mut directives: BTreeMap<DirectiveTarget, Vec<Directive>> = BTreeMap::new();
    for family in FAMILIES.iter().filter(|family| (family.enabled)(settings)) {
        for ty in graph.iter() {
            for (target, directive) in (family.decorate)(graph, ty, settings) {
                directives.entry(target).or_default().push(directive);
            }
        }
    }
    Decorations { directives }
}

fn trimmed(text: Option<&String>) -> Option<String> {
    text.map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn literal_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn binding_family(
    _graph: &TypeGraph,
    ty: &GeneratedType,
    settings: &GenerationSettings,
) -> Vec<(DirectiveTarget, Directive)> {
    let style: AnnotationStyle = settings.annotation_style;
    let mut out: Vec<(DirectiveTarget, Directive)> = Vec::new();
    let jackson: bool = style == AnnotationStyle::Jackson2;
    match ty.kind {
        TypeKind::Class if jackson => {
            out.push((DirectiveTarget::Type(ty.id), Directive::IncludeNonNull));
            if !ty.properties.is_empty() {
                let keys: Vec<String> = ty.properties.iter().map(|p| p.json_key.clone()).collect();
                out.push((DirectiveTarget::Type(ty.id), Directive::PropertyOrder(keys)));
            }
            if ty.additional_properties.is_some() {
                out.push((DirectiveTarget::ExtensionMap(ty.id), Directive::AnyProperties));
            }
        }
        TypeKind::Enum if jackson => {
            out.push((DirectiveTarget::Type(ty.id), Directive::EnumValue));
        }
        TypeKind::Enum => {
            for (index, constant) in ty.constants.iter().enumerate() {
                let literal: String = literal_text(&constant.value);
                if literal != constant.name {
                    out.push((
                        DirectiveTarget::Constant(ty.id, index),
                        Directive::WireName { style, name: literal },
                    ));
                }
            }
        }
        _ => {}
    }
    for (index, property) in ty.properties.iter().enumerate() {
        let target: DirectiveTarget = DirectiveTarget::Property(ty.id, index);
        if property.name != property.json_key {
            out.push((
                target,
                Directive::WireName {
                    style,
                    name: property.json_key.clone(),
                },
            ));
        }
        if style == AnnotationStyle::Gson {
            out.push((target, Directive::Expose));
        }
    }
    out
}

fn type_info_family(
    graph: &TypeGraph,
    ty: &GeneratedType,
    _settings: &GenerationSettings,
) -> Vec<(DirectiveTarget, Directive)> {
    let mut out: Vec<(DirectiveTarget, Directive)> = Vec::new();
    let target: DirectiveTarget = DirectiveTarget::Type(ty.id);
    if let Some(binding) = &ty.binding {
        out.push((
            target,
            Directive::TypeInfo {
                identification: binding.identification,
                inclusion: binding.inclusion,
                property: binding.property_name.clone(),
            },
        ));
        let logical: bool = binding.identification == DiscriminatorId::LogicalName;
        let subtypes: Vec<(TypeId, Option<String>)> = binding
            .children
            .iter()
            .map(|(child, tag)| (*child, logical.then(|| tag.clone())))
            .collect();
        out.push((target, Directive::SubTypes(subtypes)));
    }
    let tag: Option<&String> = graph
        .iter()
        .filter_map(|parent| parent.binding.as_ref())
        .filter(|binding| binding.identification == DiscriminatorId::LogicalName)
        .find_map(|binding| {
            binding
                .children
                .iter()
                .find(|(child, _)| *child == ty.id)
                .map(|(_, tag)| tag)
        });
    if let Some(tag) = tag {
        out.push((target, Directive::TypeName(tag.clone())));
    }
    out
}

fn validation_family(
    graph: &TypeGraph,
    ty: &GeneratedType,
    _settings: &GenerationSettings,
) -> Vec<(DirectiveTarget, Directive)> {
    let mut out: Vec<(DirectiveTarget, Directive)> = Vec::new();
    for (index, property) in ty.properties.iter().enumerate() {
        let target: DirectiveTarget = DirectiveTarget::Property(ty.id, index);
        let constraints = &property.constraints;
        if let Some(minimum) = &constraints.minimum {
            out.push((
                target,
                Directive::DecimalMin {
                    value: minimum.value.to_string(),
                    inclusive: !minimum.exclusive,
                },
            ));
        }
        if let Some(maximum) = &constraints.maximum {
            out.push((
                target,
                Directive::DecimalMax {
                    value: maximum.value.to_string(),
                    inclusive: !maximum.exclusive,
                },
            ));
        }
        if constraints.min_size.is_some() || constraints.max_size.is_some() {
            out.push((
                target,
                Directive::Size {
                    min: constraints.min_size,
                    max: constraints.max_size,
                },
            ));
        }
        if let Some(pattern) = &constraints.pattern {
            out.push((target, Directive::Pattern(pattern.clone())));
        }
        if property.required {
            out.push((target, Directive::NotNull));
        }
        let cascades: bool = property
            .type_ref
            .generated()
            .is_some_and(|id| graph.get(id).kind != TypeKind::Enum);
        if cascades {
            out.push((target, Directive::Valid));
        }
    }
    out
}

fn documentation_family(
    _graph: &TypeGraph,
    ty: &GeneratedType,
    _settings: &GenerationSettings,
) -> Vec<(DirectiveTarget, Directive)> {
    let mut out: Vec<(DirectiveTarget, Directive)> = Vec::new();
    let type_target: DirectiveTarget = DirectiveTarget::Type(ty.id);
    for text in [trimmed(ty.title.as_ref()), trimmed(ty.description.as_ref())]
        .into_iter()
        .flatten()
    {
        out.push((type_target, Directive::Doc(text)));
    }
    for (index, property) in ty.properties.iter().enumerate() {
        let target: DirectiveTarget = DirectiveTarget::Property(ty.id, index);
        for text in [trimmed(property.title.as_ref()), trimmed(property.description.as_ref())]
            .into_iter()
            .flatten()
        {
            out.push((target, Directive::Doc(text)));
        }
        if property.required {
            out.push((target, Directive::RequiredDoc));
        }
    }
    out
}
