//! Rule dispatch: one rule per schema shape, chosen from a fixed table.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::builder::{GraphBuilder, Placement, Registration, Request, reference_name};
use crate::error::{GenerationError, Result};
use crate::model::{EnumConstant, Scalar, TypeId, TypeKind, TypeRef};
use crate::naming::{constant_name, singularize};
use crate::resolver::{Resolved, absolutize_refs};
use crate::schema::{Keywords, Primitive, SchemaId, SchemaShape};

type Rule = fn(&mut GraphBuilder, &Request<'_>, SchemaId) -> Result<TypeRef>;

fn rule_for(shape: SchemaShape) -> Rule {
    match shape {
        SchemaShape::AllOf => GraphBuilder::all_of_rule,
        SchemaShape::Union => GraphBuilder::union_rule,
        SchemaShape::Enum => GraphBuilder::enum_rule,
        SchemaShape::Object => GraphBuilder::object_rule,
        SchemaShape::Array => GraphBuilder::array_rule,
        SchemaShape::Primitive(Primitive::String) => GraphBuilder::string_rule,
        SchemaShape::Primitive(Primitive::Integer) => GraphBuilder::integer_rule,
        SchemaShape::Primitive(Primitive::Number) => GraphBuilder::number_rule,
        SchemaShape::Primitive(Primitive::Boolean) => GraphBuilder::boolean_rule,
        SchemaShape::Primitive(Primitive::Null) | SchemaShape::Any => GraphBuilder::any_rule,
    }
}

const INT_RANGE: std::ops::RangeInclusive<f64> = -2_147_483_648.0..=2_147_483_647.0;

/// Library types for string formats; unknown formats stay `String`.
fn format_type(format: &str) -> Option<TypeRef> {
    let fqn: &str = match format {
        "date-time" => "java.util.Date",
        "uri" => "java.net.URI",
        "uuid" => "java.util.UUID",
        "regex" => "java.util.regex.Pattern",
        "utc-millisec" => {
            return Some(TypeRef::Scalar {
                scalar: Scalar::Long,
                primitive: true,
            });
        }
        _ => return None,
    };
    Some(TypeRef::Library(fqn.to_string()))
}

/// Schema value as enum literal text.
fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `target` takes every member of `source`: objects merge recursively, arrays
/// gain the items they lack, anything else is replaced.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for item in source {
                if !target.contains(&item) {
                    target.push(item);
                }
            }
        }
        (target, source) => *target = source,
    }
}

impl GraphBuilder {
    /// Type reference for `node` under `request`, generating types as needed.
    pub fn dispatch(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let schema = self.store.node(node);
        if let Some(id) = self.graph.type_for_uri(&schema.uri) {
            return Ok(TypeRef::Generated(id));
        }
        if let Some(existing) = &schema.keywords.existing_java_type {
            return Ok(TypeRef::Library(existing.clone()));
        }
        let shape: SchemaShape = schema.shape;
        if let Some(java_type) = &schema.keywords.java_type
            && matches!(shape, SchemaShape::Primitive(_) | SchemaShape::Array | SchemaShape::Any)
        {
            return Ok(TypeRef::Library(java_type.clone()));
        }
        debug!(uri = %schema.uri, ?shape, name = request.name, "dispatching");
        rule_for(shape)(self, request, node)
    }

    fn object_rule(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let id: TypeId = match self.register_type(request, node, TypeKind::Class)? {
            Registration::Existing(id) => return Ok(TypeRef::Generated(id)),
            Registration::Created(id) => id,
        };
        self.populate_object(id, node, request.name)?;
        Ok(TypeRef::Generated(id))
    }

    fn array_rule(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let schema = self.store.node(node);
        let unique: bool = schema.keywords.unique_items == Some(true);
        let element: TypeRef = match &schema.keywords.items {
            None => TypeRef::Any,
            Some(Value::Array(_)) => {
                warn!(uri = %schema.uri, "tuple-form `items` is not supported; elements are untyped");
                TypeRef::Any
            }
            Some(_) => {
                let items: Resolved = self.store.child(node, &["items"])?;
                let (raw, placement): (String, Placement) = if items.via_reference {
                    (reference_name(&self.store.node(items.id).uri), Placement::TopLevel)
                } else {
                    (singularize(request.name), request.placement)
                };
                self.dispatch(&Request { name: &raw, placement }, items.id)?
            }
        };
        Ok(if unique {
            TypeRef::Set(Box::new(element))
        } else {
            TypeRef::List(Box::new(element))
        })
    }

    fn enum_rule(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let id: TypeId = match self.register_type(request, node, TypeKind::Enum)? {
            Registration::Existing(id) => return Ok(TypeRef::Generated(id)),
            Registration::Created(id) => id,
        };
        let schema = self.store.node(node);
        let keywords: &Keywords = &schema.keywords;
        let custom_names: &[String] = keywords.java_enum_names.as_deref().unwrap_or_default();
        let wide_literals: bool = keywords
            .enum_
            .iter()
            .flatten()
            .filter_map(Value::as_f64)
            .any(|value| !INT_RANGE.contains(&value));
        let value_type: TypeRef = match keywords.type_.as_ref().and_then(|t| t.effective()) {
            Some("integer") if self.settings.use_long_integers || wide_literals => TypeRef::Scalar {
                scalar: Scalar::Long,
                primitive: false,
            },
            Some("integer") => TypeRef::Scalar {
                scalar: Scalar::Integer,
                primitive: false,
            },
            Some("number") => TypeRef::Scalar {
                scalar: Scalar::Double,
                primitive: false,
            },
            Some("boolean") => TypeRef::Scalar {
                scalar: Scalar::Boolean,
                primitive: false,
            },
            _ => TypeRef::String,
        };

        let mut constants: Vec<EnumConstant> = Vec::new();
        let literals = keywords.enum_.iter().flatten().filter(|value| !value.is_null());
        for (index, value) in literals.enumerate() {
            let name: String = custom_names
                .get(index)
                .filter(|custom| !custom.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| constant_name(&literal_text(value)));
            if let Some(existing) = constants.iter().find(|c| c.name == name) {
                return Err(GenerationError::unsupported(
                    &schema.uri,
                    format!(
                        "enum literals {} and {value} both map to constant `{name}`",
                        existing.value
                    ),
                ));
            }
            constants.push(EnumConstant {
                name,
                value: value.clone(),
            });
        }

        let generated = self.graph.get_mut(id);
        generated.constants = constants;
        generated.enum_value_type = value_type;
        Ok(TypeRef::Generated(id))
    }

    fn string_rule(&mut self, _request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let keywords: &Keywords = &self.store.node(node).keywords;
        Ok(keywords
            .format
            .as_deref()
            .and_then(format_type)
            .unwrap_or(TypeRef::String))
    }

    fn integer_rule(&mut self, _request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let keywords: &Keywords = &self.store.node(node).keywords;
        let out_of_int_range = |bound: Option<&serde_json::Number>| {
            bound
                .and_then(serde_json::Number::as_f64)
                .is_some_and(|value| !INT_RANGE.contains(&value))
        };
        let wide: bool = self.settings.use_long_integers
            || out_of_int_range(keywords.minimum.as_ref())
            || out_of_int_range(keywords.maximum.as_ref());
        Ok(TypeRef::Scalar {
            scalar: if wide { Scalar::Long } else { Scalar::Integer },
            primitive: self.settings.use_primitives,
        })
    }

    fn number_rule(&mut self, _request: &Request<'_>, _node: SchemaId) -> Result<TypeRef> {
        if self.settings.use_big_decimals {
            return Ok(TypeRef::Library("java.math.BigDecimal".to_string()));
        }
        Ok(TypeRef::Scalar {
            scalar: if self.settings.use_double_numbers {
                Scalar::Double
            } else {
                Scalar::Float
            },
            primitive: self.settings.use_primitives,
        })
    }

    fn boolean_rule(&mut self, _request: &Request<'_>, _node: SchemaId) -> Result<TypeRef> {
        Ok(TypeRef::Scalar {
            scalar: Scalar::Boolean,
            primitive: self.settings.use_primitives,
        })
    }

    fn any_rule(&mut self, _request: &Request<'_>, _node: SchemaId) -> Result<TypeRef> {
        Ok(TypeRef::Any)
    }

    /// Merges the members into one synthetic schema and dispatches that.
    fn all_of_rule(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let merged: SchemaId = self.merge_all_of(node)?;
        self.dispatch(request, merged)
    }

    /// Synthesizes the merged node for an `allOf`.
    ///
    /// A referenced member that carries a discriminator is not merged: it
    /// becomes the `extends` of the result, so the merged type joins that
    /// parent's family instead of declaring a family of its own.
    fn merge_all_of(&mut self, node: SchemaId) -> Result<SchemaId> {
        let schema = self.store.node(node);
        let uri = schema.uri.clone();
        if self.merging.contains(&node) {
            return Err(GenerationError::unsupported(&uri, "`allOf` includes itself"));
        }
        let member_count: usize = schema.keywords.all_of.as_ref().map_or(0, Vec::len);
        let mut own: Value = schema.content.clone();
        let mut supertype: Option<String> = None;
        if let Value::Object(map) = &mut own {
            map.remove("allOf");
            if map.contains_key("extends") {
                supertype = Some(String::new());
            }
        }

        self.merging.push(node);
        let mut merged: Value = Value::Object(Map::new());
        for index in 0..member_count {
            let member: Resolved = self.store.child(node, &["allOf", &index.to_string()])?;
            if member.via_reference {
                let target = self.store.node(member.id);
                if supertype.is_none() && target.keywords.discriminator_metadata().is_some() {
                    supertype = Some(target.uri.to_string());
                    continue;
                }
            }
            let member_id: SchemaId = if self.store.node(member.id).shape == SchemaShape::AllOf {
                self.merge_all_of(member.id)?
            } else {
                member.id
            };
            let member_node = self.store.node(member_id);
            let mut content: Value = member_node.content.clone();
            absolutize_refs(&mut content, &member_node.uri.document)?;
            if member.via_reference
                && let Value::Object(map) = &mut content
            {
                map.remove("discriminator");
                map.remove("deserializationClassProperty");
            }
            deep_merge(&mut merged, content);
        }
        self.merging.pop();

        if let Some(parent) = supertype.filter(|parent| !parent.is_empty())
            && let Value::Object(map) = &mut merged
        {
            map.insert("extends".to_string(), json!({ "$ref": parent }));
        }
        absolutize_refs(&mut own, &uri.document)?;
        deep_merge(&mut merged, own);
        self.store.synthesize(uri.join(&["allOf"]), node, merged)
    }

    /// The shape a node generates as: an `allOf` counts as its merged result.
    fn effective_shape(&mut self, node: SchemaId) -> Result<SchemaShape> {
        let shape: SchemaShape = self.store.node(node).shape;
        if shape != SchemaShape::AllOf {
            return Ok(shape);
        }
        let merged: SchemaId = self.merge_all_of(node)?;
        Ok(self.store.node(merged).shape)
    }

    /// `oneOf`/`anyOf`.
    ///
    /// Object branches get a common marker supertype: an interface, or a class
    /// when the node declares properties of its own. Other unions collapse to
    /// the branches' common type, or to an untyped value.
    fn union_rule(&mut self, request: &Request<'_>, node: SchemaId) -> Result<TypeRef> {
        let keywords: Keywords = self.store.node(node).keywords.clone();
        let (keyword, count): (&str, usize) = match (&keywords.one_of, &keywords.any_of) {
            (Some(branches), _) => ("oneOf", branches.len()),
            (None, Some(branches)) => ("anyOf", branches.len()),
            (None, None) => ("oneOf", 0),
        };
        let mut branches: Vec<Resolved> = Vec::with_capacity(count);
        for index in 0..count {
            let branch: Resolved = self.store.child(node, &[keyword, &index.to_string()])?;
            if self.store.node(branch.id).shape != SchemaShape::Primitive(Primitive::Null) {
                branches.push(branch);
            }
        }

        let mut all_class_like: bool = !branches.is_empty();
        for branch in &branches {
            all_class_like &= self.effective_shape(branch.id)? == SchemaShape::Object;
        }
        let has_own_members: bool = keywords.has_object_keywords();
        let has_discriminator: bool = keywords.discriminator_metadata().is_some();

        if let [only] = branches.as_slice()
            && !has_own_members
            && !has_discriminator
        {
            let only: Resolved = *only;
            return self.dispatch_branch(request, only, request.name.to_string());
        }
        if !all_class_like {
            return self.collapse_branches(request, &branches);
        }

        let kind: TypeKind = if has_own_members {
            TypeKind::Class
        } else {
            TypeKind::Interface
        };
        let marker: TypeId = match self.register_type(request, node, kind)? {
            Registration::Existing(id) => return Ok(TypeRef::Generated(id)),
            Registration::Created(id) => id,
        };
        if kind == TypeKind::Class {
            self.populate_object(marker, node, request.name)?;
        } else if let Some(metadata) = keywords.discriminator_metadata() {
            self.declare_discriminator(marker, node, metadata)?;
        }

        for (index, branch) in branches.into_iter().enumerate() {
            let branch_ref: TypeRef =
                self.dispatch_branch(request, branch, format!("{}Option{index}", request.name))?;
            if let TypeRef::Generated(child) = branch_ref {
                self.link_branch(marker, kind, child);
            }
        }
        Ok(TypeRef::Generated(marker))
    }

    fn dispatch_branch(&mut self, request: &Request<'_>, branch: Resolved, inline_name: String) -> Result<TypeRef> {
        let (raw, placement): (String, Placement) = if branch.via_reference {
            (reference_name(&self.store.node(branch.id).uri), Placement::TopLevel)
        } else {
            (inline_name, request.placement)
        };
        self.dispatch(&Request { name: &raw, placement }, branch.id)
    }

    /// Generates every branch; the union is their shared type if they agree.
    fn collapse_branches(&mut self, request: &Request<'_>, branches: &[Resolved]) -> Result<TypeRef> {
        let mut common: Option<TypeRef> = None;
        let mut agree: bool = true;
        for (index, branch) in branches.iter().enumerate() {
            let branch_ref: TypeRef =
                self.dispatch_branch(request, *branch, format!("{}Option{index}", request.name))?;
            match &common {
                None => common = Some(branch_ref),
                Some(existing) => agree &= *existing == branch_ref,
            }
        }
        Ok(match common {
            Some(shared) if agree => shared,
            _ => TypeRef::Any,
        })
    }

    fn link_branch(&mut self, marker: TypeId, kind: TypeKind, child: TypeId) {
        if child == marker {
            return;
        }
        let linked: bool = match kind {
            TypeKind::Interface => {
                let interfaces: &mut Vec<TypeId> = &mut self.graph.get_mut(child).interfaces;
                if !interfaces.contains(&marker) {
                    interfaces.push(marker);
                }
                true
            }
            _ => {
                if self.inherits_from(marker, child) {
                    false
                } else {
                    let generated = self.graph.get_mut(child);
                    match generated.supertype {
                        None => {
                            generated.supertype = Some(TypeRef::Generated(marker));
                            true
                        }
                        Some(TypeRef::Generated(existing)) => existing == marker,
                        Some(_) => false,
                    }
                }
            }
        };
        let subtypes: &mut Vec<TypeId> = &mut self.graph.get_mut(marker).subtypes;
        if linked && !subtypes.contains(&child) {
            subtypes.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalUri;
    use crate::settings::GenerationSettings;
    use serde_json::json;

    fn build(schema: Value, settings: GenerationSettings) -> Result<(GraphBuilder, TypeRef)> {
        let mut builder = GraphBuilder::new(settings);
        builder.store.register_document("mem:///root.json", schema);
        let root = builder.generate(&CanonicalUri::document_root("mem:///root.json"))?;
        Ok((builder, root))
    }

    fn generated(type_ref: &TypeRef) -> TypeId {
        type_ref.generated().expect("a generated type")
    }

    #[test]
    fn deep_merge_rules() {
        let mut target = json!({ "required": ["a"], "properties": { "a": { "type": "string" } }, "title": "x" });
        deep_merge(
            &mut target,
            json!({ "required": ["a", "b"], "properties": { "b": { "type": "integer" } }, "title": "y" }),
        );
        assert_eq!(
            target,
            json!({
                "required": ["a", "b"],
                "properties": { "a": { "type": "string" }, "b": { "type": "integer" } },
                "title": "y"
            })
        );
    }

    #[test]
    fn primitive_mapping() {
        let (builder, root) = build(
            json!({ "type": "object", "properties": {
                "s": { "type": "string" },
                "when": { "type": "string", "format": "date-time" },
                "i": { "type": "integer" },
                "big": { "type": "integer", "maximum": 9_000_000_000_u64 },
                "n": { "type": "number" },
                "b": { "type": "boolean" },
                "x": {}
            } }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let ty = builder.graph.get(generated(&root));
        let types: Vec<&TypeRef> = ty.properties.iter().map(|p| &p.type_ref).collect();
        assert_eq!(
            types,
            vec![
                &TypeRef::String,
                &TypeRef::Library("java.util.Date".to_string()),
                &TypeRef::Scalar { scalar: Scalar::Integer, primitive: false },
                &TypeRef::Scalar { scalar: Scalar::Long, primitive: false },
                &TypeRef::Scalar { scalar: Scalar::Double, primitive: false },
                &TypeRef::Scalar { scalar: Scalar::Boolean, primitive: false },
                &TypeRef::Any,
            ]
        );
    }

    #[test]
    fn arrays_name_items_in_the_singular() {
        let (builder, root) = build(
            json!({ "type": "object", "properties": {
                "tags": { "type": "array", "uniqueItems": true, "items": { "type": "object" } }
            } }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let root_type = builder.graph.get(generated(&root));
        let TypeRef::Set(element) = &root_type.properties[0].type_ref else {
            panic!("expected a set");
        };
        let tag = builder.graph.get(generated(element));
        assert_eq!(tag.name, "Tag");
        assert_eq!(tag.enclosing, Some(root_type.id));
    }

    #[test]
    fn enum_constants_and_collisions() {
        let (builder, root) = build(
            json!({ "enum": ["in progress", "done", null, "1st"] }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let names: Vec<&str> = builder
            .graph
            .get(generated(&root))
            .constants
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["IN_PROGRESS", "DONE", "_1ST"]);

        let err = build(json!({ "enum": ["a-b", "a_b"] }), GenerationSettings::default())
            .expect_err("constants collide");
        assert!(matches!(err, GenerationError::UnsupportedSchemaConstruct { .. }));
    }

    #[test]
    fn all_of_merges_members() {
        let (builder, root) = build(
            json!({
                "definitions": { "named": { "properties": { "name": { "type": "string" } }, "required": ["name"] } },
                "allOf": [
                    { "$ref": "#/definitions/named" },
                    { "properties": { "age": { "type": "integer" } } }
                ]
            }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let ty = builder.graph.get(generated(&root));
        assert_eq!(ty.name, "Root");
        let keys: Vec<&str> = ty.properties.iter().map(|p| p.json_key.as_str()).collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert!(ty.properties[0].required);
    }

    #[test]
    fn object_union_gets_a_marker_interface() {
        let (builder, root) = build(
            json!({
                "oneOf": [
                    { "type": "object", "properties": { "a": { "type": "string" } } },
                    { "type": "object", "properties": { "b": { "type": "string" } } },
                    { "type": "null" }
                ]
            }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let marker = builder.graph.get(generated(&root));
        assert_eq!(marker.kind, TypeKind::Interface);
        let names: Vec<&str> = marker
            .subtypes
            .iter()
            .map(|id| builder.graph.get(*id).name.as_str())
            .collect();
        assert_eq!(names, vec!["RootOption0", "RootOption1"]);
        for subtype in &marker.subtypes {
            assert_eq!(builder.graph.get(*subtype).interfaces, vec![marker.id]);
        }
    }

    #[test]
    fn scalar_union_collapses() {
        let (_, nullable) = build(json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] }), GenerationSettings::default())
            .expect("generates");
        assert_eq!(nullable, TypeRef::String);
        let (_, mixed) = build(json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] }), GenerationSettings::default())
            .expect("generates");
        assert_eq!(mixed, TypeRef::Any);
    }

    #[test]
    fn integer_enums_widen_for_large_literals() {
        let (builder, root) = build(
            json!({ "type": "integer", "enum": [1, 3_000_000_000_i64] }),
            GenerationSettings::default(),
        )
        .expect("generates");
        assert_eq!(
            builder.graph.get(generated(&root)).enum_value_type,
            TypeRef::Scalar { scalar: Scalar::Long, primitive: false }
        );
        let (builder, root) = build(json!({ "type": "integer", "enum": [1, 2] }), GenerationSettings::default())
            .expect("generates");
        assert_eq!(
            builder.graph.get(generated(&root)).enum_value_type,
            TypeRef::Scalar { scalar: Scalar::Integer, primitive: false }
        );
    }

    #[test]
    fn union_of_scalar_all_ofs_collapses() {
        let (builder, root) = build(
            json!({ "oneOf": [
                { "allOf": [{ "type": "string" }, { "minLength": 1 }] },
                { "allOf": [{ "type": "integer" }] }
            ] }),
            GenerationSettings::default(),
        )
        .expect("generates");
        assert_eq!(root, TypeRef::Any);
        assert!(builder.graph.is_empty());

        let (_, text) = build(
            json!({ "anyOf": [{ "allOf": [{ "type": "string" }] }, { "type": "string" }] }),
            GenerationSettings::default(),
        )
        .expect("generates");
        assert_eq!(text, TypeRef::String);
    }

    #[test]
    fn object_all_of_branches_keep_the_marker_interface() {
        let (builder, root) = build(
            json!({ "oneOf": [
                { "allOf": [{ "type": "object", "properties": { "a": { "type": "string" } } }] },
                { "type": "object", "properties": { "b": { "type": "string" } } }
            ] }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let marker = builder.graph.get(generated(&root));
        assert_eq!(marker.kind, TypeKind::Interface);
        assert_eq!(marker.subtypes.len(), 2);
    }

    #[test]
    fn all_of_with_a_discriminated_parent_extends_it() {
        let (builder, root) = build(
            json!({
                "definitions": {
                    "pet": {
                        "type": "object",
                        "discriminator": { "propertyName": "type", "mapping": { "cat": "#/definitions/cat" } },
                        "properties": { "type": { "type": "string" } }
                    },
                    "cat": { "allOf": [
                        { "$ref": "#/definitions/pet" },
                        { "properties": { "lives": { "type": "integer" } } }
                    ] }
                },
                "type": "object",
                "properties": { "cat": { "$ref": "#/definitions/cat" } }
            }),
            GenerationSettings::default(),
        )
        .expect("generates");
        let owner = builder.graph.get(generated(&root));
        let cat = builder.graph.get(generated(&owner.properties[0].type_ref));
        let keys: Vec<&str> = cat.properties.iter().map(|p| p.json_key.as_str()).collect();
        assert_eq!(keys, vec!["lives"]);
        let Some(TypeRef::Generated(pet)) = cat.supertype else {
            panic!("cat should extend pet");
        };
        assert_eq!(builder.graph.get(pet).name, "Pet");
        assert_eq!(builder.pending.len(), 1);
        assert_eq!(builder.pending[0].parent, pet);
    }

    #[test]
    fn nested_type_named_like_its_owner_conflicts() {
        let err = build(
            json!({ "type": "object", "properties": { "root": { "type": "object" } } }),
            GenerationSettings::default(),
        )
        .expect_err("Root.Root is not a legal Java declaration");
        assert!(matches!(err, GenerationError::NameConflict { .. }));
    }
}
