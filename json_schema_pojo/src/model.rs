//! The generated type graph.
//!
//! Types are appended while the dispatcher walks the schemas and are frozen once
//! polymorphic bindings are in place. Property types refer to generated types by
//! [`TypeId`], so a property can point at a type that is still being populated.

use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::schema::CanonicalUri;
use crate::settings::DiscriminatorId;

/// Index of a generated type in its [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Enum,
    /// Marker supertype of `oneOf`/`anyOf` branches.
    Interface,
}

/// Boxable Java scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
}

/// Declared type of a property, array element or extension-map value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Unconstrained value (`java.lang.Object`).
    Any,
    String,
    Scalar { scalar: Scalar, primitive: bool },
    /// A type that is referenced but never generated, by fully-qualified name.
    Library(String),
    Generated(TypeId),
    List(Box<TypeRef>),
    Set(Box<TypeRef>),
}

impl TypeRef {
    /// The generated type this reference names, looking through collections.
    #[must_use]
    pub fn generated(&self) -> Option<TypeId> {
        match self {
            Self::Generated(id) => Some(*id),
            Self::List(element) | Self::Set(element) => element.generated(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }
}

/// A numeric bound as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub value: Number,
    pub exclusive: bool,
}

/// Raw constraint facts kept for the annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
    /// `minItems`, or `minLength` for strings.
    pub min_size: Option<u64>,
    /// `maxItems`, or `maxLength` for strings.
    pub max_size: Option<u64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Member name in JSON.
    pub json_key: String,
    /// Allocated Java field name.
    pub name: String,
    pub type_ref: TypeRef,
    pub required: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub constraints: Constraints,
    /// Schema `default`; rendered as the field initializer.
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    pub value: Value,
}

/// How the discriminator tag travels with the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inclusion {
    /// Sibling member of the object's own properties.
    #[default]
    Property,
    /// Supplied by the enclosing object, next to the polymorphic value.
    ExternalProperty,
}

/// Discriminator contract of a polymorphic parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphicBinding {
    pub inclusion: Inclusion,
    pub identification: DiscriminatorId,
    pub property_name: String,
    /// Subtypes with their tag values, in declaration order.
    pub children: Vec<(TypeId, String)>,
}

#[derive(Debug, Clone)]
pub struct GeneratedType {
    pub id: TypeId,
    pub kind: TypeKind,
    pub package: String,
    /// Simple name.
    pub name: String,
    /// Enclosing type for nested declarations.
    pub enclosing: Option<TypeId>,
    pub uri: CanonicalUri,
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<Property>,
    pub constants: Vec<EnumConstant>,
    /// Java type of enum literal values.
    pub enum_value_type: TypeRef,
    pub supertype: Option<TypeRef>,
    pub interfaces: Vec<TypeId>,
    pub subtypes: Vec<TypeId>,
    /// Value type of the extension map, if one is generated.
    pub additional_properties: Option<TypeRef>,
    pub binding: Option<PolymorphicBinding>,
    pub nested: Vec<TypeId>,
}

impl GeneratedType {
    #[must_use]
    pub fn new(id: TypeId, kind: TypeKind, package: String, name: String, uri: CanonicalUri) -> Self {
        Self {
            id,
            kind,
            package,
            name,
            enclosing: None,
            uri,
            title: None,
            description: None,
            properties: Vec::new(),
            constants: Vec::new(),
            enum_value_type: TypeRef::String,
            supertype: None,
            interfaces: Vec::new(),
            subtypes: Vec::new(),
            additional_properties: None,
            binding: None,
            nested: Vec::new(),
        }
    }

    /// Property by allocated field name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// All types of one run, in creation order.
#[derive(Debug, Default)]
pub struct TypeGraph {
    types: Vec<GeneratedType>,
    by_uri: HashMap<CanonicalUri, TypeId>,
}

impl TypeGraph {
    /// Adds a type built by `make` and indexes it under its schema URI.
    pub fn insert(&mut self, make: impl FnOnce(TypeId) -> GeneratedType) -> TypeId {
        let id: TypeId = TypeId(self.types.len());
        let generated: GeneratedType = make(id);
        self.by_uri.insert(generated.uri.clone(), id);
        if let Some(owner) = generated.enclosing {
            self.types[owner.0].nested.push(id);
        }
        self.types.push(generated);
        id
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &GeneratedType {
        &self.types[id.0]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut GeneratedType {
        &mut self.types[id.0]
    }

    /// The type generated for a schema location, if any.
    #[must_use]
    pub fn type_for_uri(&self, uri: &CanonicalUri) -> Option<TypeId> {
        self.by_uri.get(uri).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedType> {
        self.types.iter()
    }

    /// Types that get their own compilation unit.
    pub fn top_level(&self) -> impl Iterator<Item = &GeneratedType> {
        self.types.iter().filter(|t| t.enclosing.is_none())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn clear(&mut self) {
        self.types.clear();
        self.by_uri.clear();
    }

    /// Outermost enclosing type (the type itself when top-level).
    #[must_use]
    pub fn outermost(&self, id: TypeId) -> TypeId {
        let mut current: TypeId = id;
        while let Some(owner) = self.get(current).enclosing {
            current = owner;
        }
        current
    }

    /// Name relative to the package: `Outer.Inner` for nested types.
    #[must_use]
    pub fn binary_name(&self, id: TypeId) -> String {
        let ty: &GeneratedType = self.get(id);
        match ty.enclosing {
            Some(owner) => format!("{}.{}", self.binary_name(owner), ty.name),
            None => ty.name.clone(),
        }
    }

    /// Fully-qualified Java name.
    #[must_use]
    pub fn qualified_name(&self, id: TypeId) -> String {
        let ty: &GeneratedType = self.get(id);
        if ty.package.is_empty() {
            self.binary_name(id)
        } else {
            format!("{}.{}", ty.package, self.binary_name(id))
        }
    }

    /// Looks a type up by fully-qualified name, falling back to a unique
    /// package-relative name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TypeId> {
        if let Some(ty) = self.types.iter().find(|t| self.qualified_name(t.id) == name) {
            return Some(ty.id);
        }
        let mut relative = self.types.iter().filter(|t| self.binary_name(t.id) == name);
        match (relative.next(), relative.next()) {
            (Some(only), None) => Some(only.id),
            _ => None,
        }
    }
}
