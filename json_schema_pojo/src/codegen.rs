//! Java source emission.
//!
//! Rendering reads the frozen graph and its decorations and never changes
//! either. Derived members (`toString`, `hashCode`, `equals`, fluent setters)
//! depend on the property list only.

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::annotate::{Decorations, Directive, DirectiveTarget};
use crate::model::{GeneratedType, Inclusion, Scalar, TypeGraph, TypeId, TypeKind, TypeRef};
use crate::naming::{capitalize, is_keyword};
use crate::settings::{AnnotationStyle, DiscriminatorId, GenerationSettings};

const JACKSON: &str = "com.fasterxml.jackson.annotation";

/// One `.java` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub qualified_name: String,
    pub contents: String,
}

/// Renders every top-level type, ordered by path.
#[must_use]
pub fn render_units(
    graph: &TypeGraph,
    decorations: &Decorations,
    settings: &GenerationSettings,
) -> Vec<SourceUnit> {
    let mut units: Vec<SourceUnit> = graph
        .top_level()
        .map(|ty| render_unit(graph, decorations, settings, ty))
        .collect();
    units.sort_by(|a, b| a.path.cmp(&b.path));
    units
}

fn render_unit(
    graph: &TypeGraph,
    decorations: &Decorations,
    settings: &GenerationSettings,
    ty: &GeneratedType,
) -> SourceUnit {
    let mut writer: UnitWriter<'_> = UnitWriter {
        graph,
        decorations,
        settings,
        package: &ty.package,
        imports: BTreeSet::new(),
        out: String::new(),
    };
    writer.render_type(ty.id, 0);

    let mut contents: String = String::new();
    if !ty.package.is_empty() {
        contents.push_str(&format!("package {};\n\n", ty.package));
    }
    if !writer.imports.is_empty() {
        for import in &writer.imports {
            contents.push_str(&format!("import {import};\n"));
        }
        contents.push('\n');
    }
    contents.push_str(&writer.out);

    let mut path: PathBuf = ty.package.split('.').filter(|s| !s.is_empty()).collect();
    path.push(format!("{}.java", ty.name));
    SourceUnit {
        path,
        qualified_name: graph.qualified_name(ty.id),
        contents,
    }
}

/// Escapes text for a Java string literal.
fn escape(text: &str) -> String {
    let mut escaped: String = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

const fn scalar_name(scalar: Scalar, primitive: bool) -> &'static str {
    match (scalar, primitive) {
        (Scalar::Integer, true) => "int",
        (Scalar::Integer, false) => "Integer",
        (Scalar::Long, true) => "long",
        (Scalar::Long, false) => "Long",
        (Scalar::Float, true) => "float",
        (Scalar::Float, false) => "Float",
        (Scalar::Double, true) => "double",
        (Scalar::Double, false) => "Double",
        (Scalar::Boolean, true) => "boolean",
        (Scalar::Boolean, false) => "Boolean",
    }
}

/// Capitalized field name for accessor names; drops the `_` added to keywords.
fn accessor_suffix(field: &str) -> String {
    match field.strip_prefix('_') {
        Some(rest) if is_keyword(rest) => capitalize(rest),
        _ => capitalize(field),
    }
}

fn getter_name(field: &str, type_ref: &TypeRef) -> String {
    let prefix: &str = match type_ref {
        TypeRef::Scalar {
            scalar: Scalar::Boolean,
            primitive: true,
        } => "is",
        _ => "get",
    };
    let name: String = format!("{prefix}{}", accessor_suffix(field));
    if name == "getClass" {
        "getClass_".to_string()
    } else {
        name
    }
}

fn enum_literal(value: &Value, value_type: &TypeRef) -> String {
    match (value_type, value) {
        (TypeRef::Scalar { scalar: Scalar::Long, .. }, Value::Number(n)) => format!("{n}L"),
        (TypeRef::Scalar { scalar: Scalar::Double, .. }, Value::Number(n)) => format!("{n}D"),
        (TypeRef::Scalar { .. }, Value::Number(_) | Value::Bool(_)) => value.to_string(),
        (_, Value::String(text)) => format!("\"{}\"", escape(text)),
        (_, other) => format!("\"{}\"", escape(&other.to_string())),
    }
}

fn scalar_literal(scalar: Scalar, value: &Value) -> Option<String> {
    match (scalar, value) {
        (Scalar::Boolean, Value::Bool(flag)) => Some(flag.to_string()),
        (Scalar::Integer, Value::Number(n)) => n
            .as_i64()
            .filter(|v| i32::try_from(*v).is_ok())
            .map(|v| v.to_string()),
        (Scalar::Long, Value::Number(n)) => n.as_i64().map(|v| format!("{v}L")),
        (Scalar::Double, Value::Number(n)) => Some(format!("{n}D")),
        (Scalar::Float, Value::Number(n)) => Some(format!("{n}F")),
        _ => None,
    }
}

/// Whether `value` can be passed to an enum's `fromValue`.
const fn fits_enum(value: &Value, value_type: &TypeRef) -> bool {
    matches!(
        (value_type, value),
        (TypeRef::String, Value::String(_)) | (TypeRef::Scalar { .. }, Value::Number(_) | Value::Bool(_))
    )
}

struct UnitWriter<'g> {
    graph: &'g TypeGraph,
    decorations: &'g Decorations,
    settings: &'g GenerationSettings,
    package: &'g str,
    imports: BTreeSet<String>,
    out: String,
}

impl UnitWriter<'_> {
    fn line(&mut self, indent: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..indent {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Emits a blank line, the annotations, then a method with `body`.
    fn method(&mut self, indent: usize, annotations: &[&str], signature: &str, body: &[String]) {
        self.line(0, "");
        for annotation in annotations {
            self.line(indent, annotation);
        }
        self.line(indent, &format!("{signature} {{"));
        for statement in body {
            self.line(indent + 1, statement);
        }
        self.line(indent, "}");
    }

    fn import(&mut self, fqn: &str) {
        self.imports.insert(fqn.to_string());
    }

    fn jackson(&mut self, simple: &str) -> String {
        self.import(&format!("{JACKSON}.{simple}"));
        format!("@{simple}")
    }

    fn validation(&mut self, simple: &str) -> String {
        let base: &str = if self.settings.use_jakarta_validation {
            "jakarta"
        } else {
            "javax"
        };
        let package: &str = if simple == "Valid" {
            "validation"
        } else {
            "validation.constraints"
        };
        self.import(&format!("{base}.{package}.{simple}"));
        format!("@{simple}")
    }

    fn type_name(&mut self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Any => "Object".to_string(),
            TypeRef::String => "String".to_string(),
            TypeRef::Scalar { scalar, primitive } => scalar_name(*scalar, *primitive).to_string(),
            TypeRef::Library(fqn) => self.library(fqn),
            TypeRef::Generated(id) => self.generated(*id),
            TypeRef::List(element) => {
                self.import("java.util.List");
                format!("List<{}>", self.boxed(element))
            }
            TypeRef::Set(element) => {
                self.import("java.util.Set");
                format!("Set<{}>", self.boxed(element))
            }
        }
    }

    fn boxed(&mut self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Scalar { scalar, .. } => scalar_name(*scalar, false).to_string(),
            other => self.type_name(other),
        }
    }

    fn library(&mut self, fqn: &str) -> String {
        if fqn.contains('<') {
            return fqn.to_string();
        }
        let Some((package, simple)) = fqn.rsplit_once('.') else {
            return fqn.to_string();
        };
        if package != "java.lang" && package != self.package {
            self.import(fqn);
        }
        simple.to_string()
    }

    fn generated(&mut self, id: TypeId) -> String {
        let graph: &TypeGraph = self.graph;
        let outer: &GeneratedType = graph.get(graph.outermost(id));
        if !outer.package.is_empty() && outer.package != self.package {
            self.import(&graph.qualified_name(outer.id));
        }
        graph.binary_name(id)
    }

    fn initializer(&mut self, type_ref: &TypeRef) -> String {
        if !self.settings.initialize_collections {
            return String::new();
        }
        let (implementation, element): (&str, &TypeRef) = match type_ref {
            TypeRef::List(element) => ("ArrayList", element),
            TypeRef::Set(element) => ("LinkedHashSet", element),
            _ => return String::new(),
        };
        self.import(&format!("java.util.{implementation}"));
        format!(" = new {implementation}<{}>()", self.boxed(element))
    }

    /// Field initializer for a schema `default`, if the value fits the type.
    fn default_initializer(&mut self, type_ref: &TypeRef, value: &Value) -> Option<String> {
        if value.is_null() {
            return (!matches!(type_ref, TypeRef::Scalar { primitive: true, .. })).then(|| " = null".to_string());
        }
        let (implementation, element): (&str, &TypeRef) = match type_ref {
            TypeRef::List(element) => ("ArrayList", element),
            TypeRef::Set(element) => ("LinkedHashSet", element),
            other => return self.default_literal(other, value).map(|literal| format!(" = {literal}")),
        };
        let items: &Vec<Value> = value.as_array()?;
        let literals: Vec<String> = items
            .iter()
            .filter_map(|item| self.default_literal(element, item))
            .collect();
        if literals.is_empty() {
            return None;
        }
        self.import(&format!("java.util.{implementation}"));
        self.import("java.util.Arrays");
        Some(format!(
            " = new {implementation}<{}>(Arrays.asList({}))",
            self.boxed(element),
            literals.join(", ")
        ))
    }

    fn default_literal(&mut self, type_ref: &TypeRef, value: &Value) -> Option<String> {
        match (type_ref, value) {
            (TypeRef::String, Value::String(text)) => Some(format!("\"{}\"", escape(text))),
            (TypeRef::String, Value::Number(_) | Value::Bool(_)) => Some(format!("\"{value}\"")),
            (TypeRef::Scalar { scalar, .. }, _) => scalar_literal(*scalar, value),
            (TypeRef::Library(fqn), Value::String(_) | Value::Number(_)) => {
                let text: String = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                let argument: String = match fqn.as_str() {
                    "java.util.Date" => format!("{}L", text.parse::<i64>().ok()?),
                    "java.math.BigDecimal" | "java.math.BigInteger" | "java.net.URI" | "java.util.UUID" => {
                        format!("\"{}\"", escape(&text))
                    }
                    _ => return None,
                };
                let simple: String = self.library(fqn);
                Some(match fqn.as_str() {
                    "java.net.URI" => format!("{simple}.create({argument})"),
                    "java.util.UUID" => format!("{simple}.fromString({argument})"),
                    _ => format!("new {simple}({argument})"),
                })
            }
            (TypeRef::Generated(id), _) => {
                let graph: &TypeGraph = self.graph;
                let target: &GeneratedType = graph.get(*id);
                match target.kind {
                    TypeKind::Enum if fits_enum(value, &target.enum_value_type) => Some(format!(
                        "{}.fromValue({})",
                        self.generated(*id),
                        enum_literal(value, &target.enum_value_type)
                    )),
                    TypeKind::Class if value.is_object() => Some(format!("new {}()", self.generated(*id))),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn annotation(&mut self, directive: &Directive) -> Option<String> {
        let rendered: String = match directive {
            Directive::WireName { style, name } => match style {
                AnnotationStyle::Jackson2 => format!("{}(\"{}\")", self.jackson("JsonProperty"), escape(name)),
                AnnotationStyle::Gson => {
                    self.import("com.google.gson.annotations.SerializedName");
                    format!("@SerializedName(\"{}\")", escape(name))
                }
                AnnotationStyle::Moshi => {
                    self.import("com.squareup.moshi.Json");
                    format!("@Json(name = \"{}\")", escape(name))
                }
                AnnotationStyle::None => return None,
            },
            Directive::Expose => {
                self.import("com.google.gson.annotations.Expose");
                "@Expose".to_string()
            }
            Directive::PropertyOrder(keys) => {
                let quoted: Vec<String> = keys.iter().map(|k| format!("\"{}\"", escape(k))).collect();
                format!("{}({{ {} }})", self.jackson("JsonPropertyOrder"), quoted.join(", "))
            }
            Directive::IncludeNonNull => format!("{}(JsonInclude.Include.NON_NULL)", self.jackson("JsonInclude")),
            Directive::TypeInfo {
                identification,
                inclusion,
                property,
            } => {
                let id: &str = match identification {
                    DiscriminatorId::LogicalName => "NAME",
                    DiscriminatorId::ClassName => "CLASS",
                };
                let include: &str = match inclusion {
                    Inclusion::Property => "PROPERTY",
                    Inclusion::ExternalProperty => "EXTERNAL_PROPERTY",
                };
                format!(
                    "{}(use = JsonTypeInfo.Id.{id}, include = JsonTypeInfo.As.{include}, property = \"{}\")",
                    self.jackson("JsonTypeInfo"),
                    escape(property)
                )
            }
            Directive::SubTypes(children) => {
                let annotation: String = self.jackson("JsonSubTypes");
                let mut entries: Vec<String> = Vec::with_capacity(children.len());
                for (child, tag) in children {
                    let name: String = self.generated(*child);
                    entries.push(match tag {
                        Some(tag) => format!("@JsonSubTypes.Type(value = {name}.class, name = \"{}\")", escape(tag)),
                        None => format!("@JsonSubTypes.Type({name}.class)"),
                    });
                }
                format!("{annotation}({{ {} }})", entries.join(", "))
            }
            Directive::TypeName(tag) => format!("{}(\"{}\")", self.jackson("JsonTypeName"), escape(tag)),
            Directive::DecimalMin { value, inclusive } => {
                let annotation: String = self.validation("DecimalMin");
                decimal_bound(&annotation, value, *inclusive)
            }
            Directive::DecimalMax { value, inclusive } => {
                let annotation: String = self.validation("DecimalMax");
                decimal_bound(&annotation, value, *inclusive)
            }
            Directive::Size { min, max } => {
                let arguments: Vec<String> = [min.map(|m| format!("min = {m}")), max.map(|m| format!("max = {m}"))]
                    .into_iter()
                    .flatten()
                    .collect();
                format!("{}({})", self.validation("Size"), arguments.join(", "))
            }
            Directive::Pattern(pattern) => {
                format!("{}(regexp = \"{}\")", self.validation("Pattern"), escape(pattern))
            }
            Directive::NotNull => self.validation("NotNull"),
            Directive::Valid => self.validation("Valid"),
            Directive::AnyProperties | Directive::EnumValue | Directive::Doc(_) | Directive::RequiredDoc => {
                return None;
            }
        };
        Some(rendered)
    }

    fn annotations(&mut self, indent: usize, directives: &[Directive]) {
        for directive in directives {
            if let Some(annotation) = self.annotation(directive) {
                self.line(indent, &annotation);
            }
        }
    }

    fn javadoc(&mut self, indent: usize, directives: &[Directive]) {
        let paragraphs: Vec<&String> = directives
            .iter()
            .filter_map(|d| match d {
                Directive::Doc(text) => Some(text),
                _ => None,
            })
            .collect();
        let required: bool = directives.contains(&Directive::RequiredDoc);
        if paragraphs.is_empty() && !required {
            return;
        }
        self.line(indent, "/**");
        for (i, paragraph) in paragraphs.iter().enumerate() {
            if i > 0 {
                self.line(indent, " * <p>");
            }
            for text in paragraph.lines() {
                let text: String = text.trim_end().replace("*/", "*&#47;");
                self.line(indent, &format!(" * {text}"));
            }
        }
        if required {
            self.line(indent, " * (Required)");
        }
        self.line(indent, " */");
    }

    fn render_type(&mut self, id: TypeId, indent: usize) {
        match self.graph.get(id).kind {
            TypeKind::Class => self.render_class(id, indent),
            TypeKind::Enum => self.render_enum(id, indent),
            TypeKind::Interface => self.render_interface(id, indent),
        }
    }

    fn render_interface(&mut self, id: TypeId, indent: usize) {
        let graph: &TypeGraph = self.graph;
        let decorations: &Decorations = self.decorations;
        let ty: &GeneratedType = graph.get(id);
        let directives: &[Directive] = decorations.on(DirectiveTarget::Type(id));
        self.javadoc(indent, directives);
        self.annotations(indent, directives);
        self.line(indent, &format!("public interface {} {{", ty.name));
        for nested in &ty.nested {
            self.line(0, "");
            self.render_type(*nested, indent + 1);
        }
        self.line(indent, "}");
    }

    fn render_class(&mut self, id: TypeId, indent: usize) {
        let graph: &TypeGraph = self.graph;
        let decorations: &Decorations = self.decorations;
        let ty: &GeneratedType = graph.get(id);
        let directives: &[Directive] = decorations.on(DirectiveTarget::Type(id));
        self.javadoc(indent, directives);
        self.annotations(indent, directives);

        let mut header: String = if ty.enclosing.is_some() {
            format!("public static class {}", ty.name)
        } else {
            format!("public class {}", ty.name)
        };
        if let Some(supertype) = &ty.supertype {
            header.push_str(&format!(" extends {}", self.type_name(supertype)));
        }
        if !ty.interfaces.is_empty() {
            let names: Vec<String> = ty.interfaces.iter().map(|i| self.generated(*i)).collect();
            header.push_str(&format!(" implements {}", names.join(", ")));
        }
        self.line(indent, &format!("{header} {{"));
        self.line(0, "");

        let members: usize = indent + 1;
        for (index, property) in ty.properties.iter().enumerate() {
            let property_directives: &[Directive] = decorations.on(DirectiveTarget::Property(id, index));
            self.javadoc(members, property_directives);
            self.annotations(members, property_directives);
            let type_name: String = self.type_name(&property.type_ref);
            let initializer: String = match property
                .default
                .as_ref()
                .and_then(|value| self.default_initializer(&property.type_ref, value))
            {
                Some(initializer) => initializer,
                None => self.initializer(&property.type_ref),
            };
            self.line(members, &format!("private {type_name} {}{initializer};", property.name));
        }
        let extension: Option<String> = ty.additional_properties.as_ref().map(|value_type| {
            self.import("java.util.Map");
            format!("Map<String, {}>", self.boxed(value_type))
        });
        let any_properties: bool = decorations.has(DirectiveTarget::ExtensionMap(id), &Directive::AnyProperties);
        if let Some(map_type) = &extension {
            self.import("java.util.LinkedHashMap");
            if any_properties {
                let ignore: String = self.jackson("JsonIgnore");
                self.line(members, &ignore);
            }
            let implementation: String = map_type.replacen("Map", "LinkedHashMap", 1);
            self.line(
                members,
                &format!("private {map_type} additionalProperties = new {implementation}();"),
            );
        }

        for property in &ty.properties {
            self.render_accessors(members, ty, &property.name, &property.type_ref);
        }
        if let Some(map_type) = &extension {
            self.render_extension_accessors(members, ty, map_type, any_properties);
        }
        self.render_derived_members(members, ty);

        for nested in &ty.nested {
            self.line(0, "");
            self.render_type(*nested, members);
        }
        self.line(indent, "}");
    }

    fn render_accessors(&mut self, indent: usize, ty: &GeneratedType, field: &str, type_ref: &TypeRef) {
        let type_name: String = self.type_name(type_ref);
        let suffix: String = accessor_suffix(field);
        self.method(
            indent,
            &[],
            &format!("public {type_name} {}()", getter_name(field, type_ref)),
            &[format!("return {field};")],
        );
        self.method(
            indent,
            &[],
            &format!("public void set{suffix}({type_name} {field})"),
            &[format!("this.{field} = {field};")],
        );
        if self.settings.generate_builders {
            self.method(
                indent,
                &[],
                &format!("public {} with{suffix}({type_name} {field})", ty.name),
                &[format!("this.{field} = {field};"), "return this;".to_string()],
            );
        }
    }

    fn render_extension_accessors(&mut self, indent: usize, ty: &GeneratedType, map_type: &str, any_properties: bool) {
        let value_type: &str = map_type
            .strip_prefix("Map<String, ")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or("Object");
        let getter_annotation: Vec<String> = if any_properties {
            vec![self.jackson("JsonAnyGetter")]
        } else {
            Vec::new()
        };
        let setter_annotation: Vec<String> = if any_properties {
            vec![self.jackson("JsonAnySetter")]
        } else {
            Vec::new()
        };
        self.method(
            indent,
            &getter_annotation.iter().map(String::as_str).collect::<Vec<&str>>(),
            &format!("public {map_type} getAdditionalProperties()"),
            &["return this.additionalProperties;".to_string()],
        );
        self.method(
            indent,
            &setter_annotation.iter().map(String::as_str).collect::<Vec<&str>>(),
            &format!("public void setAdditionalProperty(String name, {value_type} value)"),
            &["this.additionalProperties.put(name, value);".to_string()],
        );
        if self.settings.generate_builders {
            self.method(
                indent,
                &[],
                &format!("public {} withAdditionalProperty(String name, {value_type} value)", ty.name),
                &[
                    "this.additionalProperties.put(name, value);".to_string(),
                    "return this;".to_string(),
                ],
            );
        }
    }

    /// `toString`, `hashCode` and `equals` over the fields, the extension map
    /// and a generated superclass.
    fn render_derived_members(&mut self, indent: usize, ty: &GeneratedType) {
        let inherits: bool = matches!(
            &ty.supertype,
            Some(TypeRef::Generated(parent)) if self.graph.get(*parent).kind == TypeKind::Class
        );
        let mut fields: Vec<&str> = ty.properties.iter().map(|p| p.name.as_str()).collect();
        if ty.additional_properties.is_some() {
            fields.push("additionalProperties");
        }

        if self.settings.include_to_string {
            let mut parts: Vec<(&str, String)> = Vec::new();
            if inherits {
                parts.push(("super", "super.toString()".to_string()));
            }
            parts.extend(fields.iter().map(|f| (*f, format!("this.{f}"))));
            let rendered: Vec<String> = parts
                .iter()
                .enumerate()
                .map(|(i, (label, expression))| {
                    let separator: &str = if i == 0 { "" } else { ", " };
                    format!(" + \"{separator}{label}=\" + {expression}")
                })
                .collect();
            self.method(
                indent,
                &["@Override"],
                "public String toString()",
                &[format!("return \"{}{{\"{} + \"}}\";", ty.name, rendered.concat())],
            );
        }

        if self.settings.include_hashcode_and_equals {
            self.import("java.util.Objects");
            let mut hashed: Vec<String> = Vec::new();
            if inherits {
                hashed.push("super.hashCode()".to_string());
            }
            hashed.extend(fields.iter().map(|f| format!("this.{f}")));
            self.method(
                indent,
                &["@Override"],
                "public int hashCode()",
                &[format!("return Objects.hash({});", hashed.join(", "))],
            );

            let mut conditions: Vec<String> = Vec::new();
            if inherits {
                conditions.push("super.equals(rhs)".to_string());
            }
            conditions.extend(fields.iter().map(|f| format!("Objects.equals(this.{f}, rhs.{f})")));
            let mut body: Vec<String> = vec![
                "if (other == this) {".to_string(),
                "    return true;".to_string(),
                "}".to_string(),
                format!("if (!(other instanceof {})) {{", ty.name),
                "    return false;".to_string(),
                "}".to_string(),
            ];
            if conditions.is_empty() {
                body.push("return true;".to_string());
            } else {
                body.push(format!("{name} rhs = (({name}) other);", name = ty.name));
                body.push(format!("return {};", conditions.join(" && ")));
            }
            self.method(indent, &["@Override"], "public boolean equals(Object other)", &body);
        }
    }

    fn render_enum(&mut self, id: TypeId, indent: usize) {
        let graph: &TypeGraph = self.graph;
        let decorations: &Decorations = self.decorations;
        let ty: &GeneratedType = graph.get(id);
        let directives: &[Directive] = decorations.on(DirectiveTarget::Type(id));
        self.javadoc(indent, directives);
        self.annotations(indent, directives);
        self.line(indent, &format!("public enum {} {{", ty.name));
        self.line(0, "");

        let members: usize = indent + 1;
        let name: &str = &ty.name;
        let value_type: String = self.boxed(&ty.enum_value_type);
        if ty.constants.is_empty() {
            self.line(members, ";");
        }
        for (index, constant) in ty.constants.iter().enumerate() {
            self.annotations(members, decorations.on(DirectiveTarget::Constant(id, index)));
            let terminator: &str = if index + 1 == ty.constants.len() { ";" } else { "," };
            self.line(
                members,
                &format!("{}({}){terminator}", constant.name, enum_literal(&constant.value, &ty.enum_value_type)),
            );
        }
        self.import("java.util.Map");
        self.import("java.util.HashMap");
        self.line(members, &format!("private final {value_type} value;"));
        self.line(
            members,
            &format!("private static final Map<{value_type}, {name}> CONSTANTS = new HashMap<{value_type}, {name}>();"),
        );
        self.line(0, "");
        self.line(members, "static {");
        self.line(members + 1, &format!("for ({name} c: values()) {{"));
        self.line(members + 2, "CONSTANTS.put(c.value, c);");
        self.line(members + 1, "}");
        self.line(members, "}");

        self.method(
            members,
            &[],
            &format!("{name}({value_type} value)"),
            &["this.value = value;".to_string()],
        );
        self.method(
            members,
            &["@Override"],
            "public String toString()",
            &["return String.valueOf(this.value);".to_string()],
        );
        let jackson: bool = decorations.has(DirectiveTarget::Type(id), &Directive::EnumValue);
        let value_annotation: Vec<String> = if jackson {
            vec![self.jackson("JsonValue")]
        } else {
            Vec::new()
        };
        self.method(
            members,
            &value_annotation.iter().map(String::as_str).collect::<Vec<&str>>(),
            &format!("public {value_type} value()"),
            &["return this.value;".to_string()],
        );
        let creator_annotation: Vec<String> = if jackson {
            vec![self.jackson("JsonCreator")]
        } else {
            Vec::new()
        };
        self.method(
            members,
            &creator_annotation.iter().map(String::as_str).collect::<Vec<&str>>(),
            &format!("public static {name} fromValue({value_type} value)"),
            &[
                format!("{name} constant = CONSTANTS.get(value);"),
                "if (constant == null) {".to_string(),
                "    throw new IllegalArgumentException(String.valueOf(value));".to_string(),
                "}".to_string(),
                "return constant;".to_string(),
            ],
        );

        for nested in &ty.nested {
            self.line(0, "");
            self.render_type(*nested, members);
        }
        self.line(indent, "}");
    }
}

fn decimal_bound(annotation: &str, value: &str, inclusive: bool) -> String {
    if inclusive {
        format!("{annotation}(\"{value}\")")
    } else {
        format!("{annotation}(value = \"{value}\", inclusive = false)")
    }
}
