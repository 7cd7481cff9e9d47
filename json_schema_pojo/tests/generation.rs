//! End-to-end generation runs.

use json_schema_pojo::model::{TypeKind, TypeRef};
use json_schema_pojo::{
    AnnotationStyle, ConstraintViolation, GeneratedModel, GenerationError, GenerationRun,
    GenerationSettings,
};
use serde_json::json;
use std::path::PathBuf;

fn settings() -> GenerationSettings {
    GenerationSettings {
        target_package: "com.example".to_string(),
        ..GenerationSettings::default()
    }
}

fn generate(name: &str, schema: &str, settings: GenerationSettings) -> GeneratedModel {
    let mut run = GenerationRun::new(&settings);
    run.add_schema_str(name, schema).expect("schema should generate");
    run.finish().expect("run should finish")
}

fn unit(model: &GeneratedModel, qualified_name: &str) -> String {
    model
        .units()
        .into_iter()
        .find(|unit| unit.qualified_name == qualified_name)
        .unwrap_or_else(|| panic!("no unit for {qualified_name}"))
        .contents
}

const PERSON: &str = r##"{
    "type": "object",
    "required": ["code"],
    "properties": {
        "code": { "type": "string", "pattern": "[A-Z]{3}" },
        "age": { "type": "integer", "minimum": 0, "maximum": 150 },
        "tags": { "type": "array", "items": { "type": "string" }, "minItems": 1, "maxItems": 3 },
        "address": {
            "type": "object",
            "properties": { "zip": { "type": "string", "minLength": 5 } }
        },
        "status": { "enum": ["active", "on hold"] },
        "home": { "$ref": "#/definitions/place" },
        "work": { "$ref": "#/definitions/place" }
    },
    "definitions": {
        "place": { "type": "object", "properties": { "city": { "type": "string" } } }
    }
}"##;

#[test]
fn generation_is_deterministic() {
    let first = generate("person.json", PERSON, settings()).units();
    let second = generate("person.json", PERSON, settings()).units();
    assert_eq!(first, second);
    let paths: Vec<PathBuf> = first.iter().map(|unit| unit.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("com/example/Person.java"),
            PathBuf::from("com/example/Place.java"),
        ]
    );
}

#[test]
fn adding_a_document_twice_reuses_its_types() {
    let mut run = GenerationRun::new(&settings());
    let first = run.add_schema_str("person.json", PERSON).expect("first");
    let second = run.add_schema_str("person.json", PERSON).expect("second");
    assert_eq!(first, second);
    let model = run.finish().expect("finish");
    assert_eq!(model.units().len(), 2);
}

#[test]
fn one_schema_location_is_one_type() {
    let model = generate("person.json", PERSON, settings());
    let graph = model.graph();
    let person = graph.get(graph.find("com.example.Person").expect("Person"));
    let home = &person.property("home").expect("home").type_ref;
    let work = &person.property("work").expect("work").type_ref;
    assert_eq!(home, work);
    assert_eq!(graph.iter().filter(|ty| ty.name == "Place").count(), 1);
}

#[test]
fn inline_schemas_become_nested_types() {
    let model = generate("person.json", PERSON, settings());
    let graph = model.graph();
    let address = graph.find("Person.Address").expect("nested class");
    assert_eq!(graph.qualified_name(address), "com.example.Person.Address");
    let status = graph.find("Person.Status").expect("nested enum");
    assert_eq!(graph.get(status).kind, TypeKind::Enum);

    let person = unit(&model, "com.example.Person");
    assert!(person.contains("    private Person.Address address;\n"));
    assert!(person.contains("    public static class Address {\n"));
    assert!(person.contains("    public enum Status {\n"));
    assert!(person.contains("        ON_HOLD(\"on hold\");\n"));
    assert!(person.contains("    private Place home;\n"));
}

#[test]
fn self_reference_terminates() {
    let schema = r##"{ "type": "object", "properties": { "children": { "type": "array", "items": { "$ref": "#" } } } }"##;
    let model = generate("node.json", schema, settings());
    assert_eq!(model.graph().len(), 1);
    let node = unit(&model, "com.example.Node");
    assert!(node.contains("    private List<Node> children = new ArrayList<Node>();\n"));
}

#[test]
fn reference_loops_are_reported() {
    let schema = r##"{ "properties": { "a": { "$ref": "#/definitions/x" } },
        "definitions": { "x": { "$ref": "#/definitions/y" }, "y": { "$ref": "#/definitions/x" } } }"##;
    let mut run = GenerationRun::new(&settings());
    let err = run.add_schema_str("loop.json", schema).expect_err("loop");
    assert!(matches!(err, GenerationError::SchemaResolution { .. }));
}

#[test]
fn distinct_schemas_may_not_share_a_name() {
    let a = r##"{ "properties": { "x": { "$ref": "#/definitions/item" } }, "definitions": { "item": { "type": "object" } } }"##;
    let b = r##"{ "properties": { "y": { "$ref": "#/definitions/item" } }, "definitions": { "item": { "type": "object", "title": "other" } } }"##;
    let mut run = GenerationRun::new(&settings());
    run.add_schema_str("a.json", a).expect("first document");
    let err = run.add_schema_str("b.json", b).expect_err("conflict");
    assert!(matches!(err, GenerationError::NameConflict { ref name, .. } if name == "com.example.Item"));
}

#[test]
fn unknown_type_keyword_is_unsupported() {
    let mut run = GenerationRun::new(&settings());
    let err = run
        .add_schema_str("odd.json", r#"{ "type": "decimal" }"#)
        .expect_err("unsupported");
    assert!(matches!(err, GenerationError::UnsupportedSchemaConstruct { .. }));
}

#[test]
fn discriminator_links_children() {
    let schema = r##"{
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "discriminator": {
            "propertyName": "type",
            "children": [
                { "$ref": "#/definitions/dog", "value": "dog" },
                { "$ref": "#/definitions/cat" }
            ]
        },
        "definitions": {
            "dog": { "type": "object", "properties": { "barks": { "type": "boolean" } } },
            "cat": { "type": "object" }
        }
    }"##;
    let model = generate("pet.json", schema, settings());
    let pet = unit(&model, "com.example.Pet");
    assert!(pet.contains(
        "@JsonTypeInfo(use = JsonTypeInfo.Id.NAME, include = JsonTypeInfo.As.PROPERTY, property = \"type\")\n"
    ));
    assert!(pet.contains(
        "@JsonSubTypes({ @JsonSubTypes.Type(value = Dog.class, name = \"dog\"), @JsonSubTypes.Type(value = Cat.class, name = \"Cat\") })\n"
    ));
    let dog = unit(&model, "com.example.Dog");
    assert!(dog.contains("@JsonTypeName(\"dog\")\npublic class Dog extends Pet {\n"));
    assert!(dog.contains("return Objects.hash(super.hashCode(), this.barks, this.additionalProperties);"));
    let cat = unit(&model, "com.example.Cat");
    assert!(cat.contains("public class Cat extends Pet {\n"));
}

#[test]
fn duplicate_discriminator_values_fail_the_run() {
    let schema = r##"{
        "type": "object",
        "discriminator": {
            "propertyName": "kind",
            "children": [
                { "$ref": "#/definitions/a", "value": "same" },
                { "$ref": "#/definitions/b", "value": "same" }
            ]
        },
        "definitions": { "a": { "type": "object" }, "b": { "type": "object" } }
    }"##;
    let mut run = GenerationRun::new(&settings());
    run.add_schema_str("shape.json", schema).expect("graph builds");
    let err = run.finish().expect_err("duplicate tag");
    assert!(matches!(err, GenerationError::AnnotationBinding { .. }));
}

#[test]
fn object_union_gets_a_marker_interface() {
    let schema = r##"{
        "oneOf": [ { "$ref": "#/definitions/card" }, { "$ref": "#/definitions/cash" } ],
        "definitions": {
            "card": { "type": "object", "properties": { "number": { "type": "string" } } },
            "cash": { "type": "object", "properties": { "amount": { "type": "number" } } }
        }
    }"##;
    let model = generate("payment.json", schema, settings());
    assert!(unit(&model, "com.example.Payment").contains("public interface Payment {\n"));
    assert!(unit(&model, "com.example.Card").contains("public class Card implements Payment {\n"));
    assert!(unit(&model, "com.example.Cash").contains("public class Cash implements Payment {\n"));
}

#[test]
fn bounds_are_checked_against_instances() {
    let model = generate(
        "person.json",
        PERSON,
        GenerationSettings {
            include_jsr303_annotations: true,
            ..settings()
        },
    );
    let person = unit(&model, "com.example.Person");
    assert!(person.contains("    @DecimalMin(\"0\")\n    @DecimalMax(\"150\")\n    private Integer age;\n"));
    assert!(person.contains("    @Size(min = 1, max = 3)\n"));
    assert!(person.contains("    @Pattern(regexp = \"[A-Z]{3}\")\n    @NotNull\n    private String code;\n"));
    assert!(person.contains("    @Valid\n    private Person.Address address;\n"));

    let valid = json!({ "code": "ABC", "age": 30, "tags": ["a"] });
    assert_eq!(model.check_instance("Person", &valid), Some(Vec::new()));

    let invalid = json!({ "code": "ab1", "age": 200, "tags": [], "address": { "zip": "123" } });
    let paths: Vec<String> = model
        .check_instance("com.example.Person", &invalid)
        .expect("type exists")
        .into_iter()
        .map(|violation| violation.path)
        .collect();
    assert_eq!(paths, vec!["code", "age", "tags", "address.zip"]);

    let missing = model.check_instance("Person", &json!({ "age": 0 })).expect("type exists");
    assert_eq!(
        missing,
        vec![ConstraintViolation {
            path: "code".to_string(),
            message: "must not be null".to_string(),
        }]
    );
    assert!(model.check_instance("Nobody", &valid).is_none());
}

#[test]
fn gson_style_has_no_extension_map() {
    let model = generate(
        "person.json",
        PERSON,
        GenerationSettings {
            annotation_style: AnnotationStyle::Gson,
            ..settings()
        },
    );
    let person = unit(&model, "com.example.Person");
    assert!(!person.contains("additionalProperties"));
    assert!(person.contains("        @SerializedName(\"active\")\n        ACTIVE(\"active\"),\n"));
    assert!(person.contains("    @Expose\n    private String code;\n"));
}

#[test]
fn cross_document_references_resolve_relative_to_the_referrer() {
    let dir = tempfile::tempdir().expect("temp dir");
    let schemas = dir.path().join("schemas");
    std::fs::create_dir_all(schemas.join("common")).expect("schema dirs");
    std::fs::write(
        schemas.join("order.json"),
        r#"{ "type": "object", "properties": { "shipTo": { "$ref": "common/address.json" } } }"#,
    )
    .expect("write order");
    std::fs::write(
        schemas.join("common").join("address.json"),
        r#"{ "type": "object", "properties": { "street": { "type": "string" } } }"#,
    )
    .expect("write address");

    let target = dir.path().join("out");
    let written = json_schema_pojo::generate_from_paths(&[schemas.join("order.json")], &target, &settings())
        .expect("generation should succeed");
    assert_eq!(
        written,
        vec![
            target.join("com/example/Address.java"),
            target.join("com/example/Order.java"),
        ]
    );
    let order = std::fs::read_to_string(target.join("com/example/Order.java")).expect("read order");
    assert!(order.contains("    private Address shipTo;\n"));
}

#[test]
fn missing_document_is_a_resolution_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut run = GenerationRun::new(&settings());
    let err = run
        .add_document(dir.path().join("absent.json"))
        .expect_err("missing file");
    assert!(matches!(err, GenerationError::SchemaResolution { .. }));
}

#[test]
fn reset_forgets_previous_documents() {
    let mut run = GenerationRun::new(&settings());
    run.add_schema_str("person.json", PERSON).expect("generate");
    run.reset();
    let root = run
        .add_schema_str("other.json", r#"{ "type": "object" }"#)
        .expect("generate");
    let model = run.finish().expect("finish");
    assert_eq!(model.units().len(), 1);
    assert!(matches!(root, TypeRef::Generated(_)));
}

#[test]
fn a_single_definition_can_be_generated_by_uri() {
    let mut run = GenerationRun::new(&settings());
    let uri = run
        .register_schema_str(
            "defs.json",
            r#"{ "definitions": { "money": { "type": "object", "properties": { "cents": { "type": "integer" } } } } }"#,
        )
        .expect("register");
    assert_eq!(uri, "mem:///defs.json");
    run.add_uri("mem:///defs.json#/definitions/money").expect("generate");
    let model = run.finish().expect("finish");
    let names: Vec<String> = model.units().into_iter().map(|unit| unit.qualified_name).collect();
    assert_eq!(names, vec!["com.example.Money"]);
}

#[test]
fn all_of_children_join_their_discriminated_parent() {
    let schema = r##"{
        "type": "object",
        "properties": { "pets": { "type": "array", "items": { "$ref": "#/definitions/pet" } } },
        "definitions": {
            "pet": {
                "type": "object",
                "properties": { "type": { "type": "string" } },
                "discriminator": {
                    "propertyName": "type",
                    "mapping": { "cat": "#/definitions/cat", "dog": "#/definitions/dog" }
                }
            },
            "cat": { "allOf": [
                { "$ref": "#/definitions/pet" },
                { "properties": { "lives": { "type": "integer" } } }
            ] },
            "dog": { "allOf": [
                { "$ref": "#/definitions/pet" },
                { "properties": { "barks": { "type": "boolean" } } }
            ] }
        }
    }"##;
    let model = generate("owner.json", schema, settings());
    let pet = unit(&model, "com.example.Pet");
    assert!(pet.contains("@JsonSubTypes.Type(value = Cat.class, name = \"cat\")"));
    assert!(pet.contains("@JsonSubTypes.Type(value = Dog.class, name = \"dog\")"));
    let cat = unit(&model, "com.example.Cat");
    assert!(cat.contains("public class Cat extends Pet {\n"));
    assert!(cat.contains("    private Integer lives;\n"));
    assert!(!cat.contains("private String type;"));
    assert!(unit(&model, "com.example.Dog").contains("public class Dog extends Pet {\n"));
}

#[test]
fn all_of_is_merged_before_one_of() {
    let schema = r##"{
        "allOf": [ { "properties": { "id": { "type": "string" } } } ],
        "oneOf": [ { "$ref": "#/definitions/card" }, { "$ref": "#/definitions/cash" } ],
        "definitions": {
            "card": { "type": "object", "properties": { "number": { "type": "string" } } },
            "cash": { "type": "object", "properties": { "amount": { "type": "number" } } }
        }
    }"##;
    let model = generate("payment.json", schema, settings());
    let payment = unit(&model, "com.example.Payment");
    assert!(payment.contains("public class Payment {\n"));
    assert!(payment.contains("    private String id;\n"));
    assert!(unit(&model, "com.example.Card").contains("public class Card extends Payment {\n"));
    assert!(unit(&model, "com.example.Cash").contains("public class Cash extends Payment {\n"));
}

#[test]
fn exclusive_bounds_are_checked_against_instances() {
    let schema = r##"{
        "type": "object",
        "properties": {
            "score": { "type": "number", "minimum": 0, "exclusiveMinimum": true, "exclusiveMaximum": 10 }
        }
    }"##;
    let model = generate(
        "grade.json",
        schema,
        GenerationSettings {
            include_jsr303_annotations: true,
            ..settings()
        },
    );
    let grade = unit(&model, "com.example.Grade");
    assert!(grade.contains("    @DecimalMin(value = \"0\", inclusive = false)\n"));
    assert!(grade.contains("    @DecimalMax(value = \"10\", inclusive = false)\n"));

    let violations = |score: serde_json::Value| -> Vec<String> {
        model
            .check_instance("Grade", &json!({ "score": score }))
            .expect("type exists")
            .into_iter()
            .map(|violation| violation.message)
            .collect()
    };
    assert_eq!(violations(json!(0)), vec!["must be greater than 0"]);
    assert_eq!(violations(json!(10)), vec!["must be less than 10"]);
    assert!(violations(json!(0.1)).is_empty());
    assert!(violations(json!(9.9)).is_empty());
}

#[test]
fn two_types_referring_to_each_other_terminate() {
    let schema = r##"{
        "type": "object",
        "properties": { "start": { "$ref": "#/definitions/a" } },
        "definitions": {
            "a": { "type": "object", "properties": { "next": { "$ref": "#/definitions/b" } } },
            "b": { "type": "object", "properties": { "back": { "$ref": "#/definitions/a" } } }
        }
    }"##;
    let model = generate("chain.json", schema, settings());
    assert_eq!(model.graph().len(), 3);
    assert!(unit(&model, "com.example.A").contains("    private B next;\n"));
    assert!(unit(&model, "com.example.B").contains("    private A back;\n"));
}

#[test]
fn declared_discriminator_values_are_bound_pairwise() {
    let schema = r##"{
        "type": "object",
        "discriminator": {
            "propertyName": "type",
            "children": [
                { "$ref": "#/definitions/dog", "value": "canine" },
                { "$ref": "#/definitions/cat", "value": "feline" }
            ]
        },
        "definitions": {
            "dog": { "type": "object", "properties": { "barks": { "type": "boolean" } } },
            "cat": { "type": "object", "properties": { "lives": { "type": "integer" } } }
        }
    }"##;
    let model = generate("animal.json", schema, settings());
    let graph = model.graph();
    let animal = graph.find("com.example.Animal").expect("parent exists");
    let binding = graph.get(animal).binding.clone().expect("parent is bound");
    let pairs: Vec<(String, String)> = binding
        .children
        .iter()
        .map(|(id, tag)| (graph.get(*id).name.clone(), tag.clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Dog".to_string(), "canine".to_string()),
            ("Cat".to_string(), "feline".to_string()),
        ]
    );
    let dog = graph.get(graph.find("com.example.Dog").expect("dog exists"));
    assert!(dog.property("barks").is_some());
    assert!(dog.property("lives").is_none());
    let cat = graph.get(graph.find("com.example.Cat").expect("cat exists"));
    assert!(cat.property("lives").is_some());
}

#[test]
fn draft3_required_flag_is_checked() {
    let schema = r##"{
        "type": "object",
        "properties": {
            "id": { "type": "string", "required": true },
            "note": { "type": "string", "required": false }
        }
    }"##;
    let model = generate(
        "ticket.json",
        schema,
        GenerationSettings {
            include_jsr303_annotations: true,
            ..settings()
        },
    );
    assert!(unit(&model, "com.example.Ticket").contains("    @NotNull\n    private String id;\n"));
    let missing = model.check_instance("Ticket", &json!({ "note": "x" })).expect("type exists");
    assert_eq!(
        missing,
        vec![ConstraintViolation {
            path: "id".to_string(),
            message: "must not be null".to_string(),
        }]
    );
    assert_eq!(model.check_instance("Ticket", &json!({ "id": "T-1" })), Some(Vec::new()));
}

#[test]
fn schema_defaults_initialize_fields() {
    let schema = r##"{
        "type": "object",
        "properties": {
            "name": { "type": "string", "default": "anon" },
            "retries": { "type": "integer", "default": 3 },
            "mode": { "enum": ["fast", "slow"], "default": "slow" },
            "tags": { "type": "array", "items": { "type": "string" }, "default": ["a"] },
            "limits": { "type": "object", "properties": { "max": { "type": "integer" } }, "default": {} },
            "owner": { "type": "string", "default": null }
        }
    }"##;
    let model = generate("config.json", schema, settings());
    let config = unit(&model, "com.example.Config");
    for line in [
        "    private String name = \"anon\";\n",
        "    private Integer retries = 3;\n",
        "    private Config.Mode mode = Config.Mode.fromValue(\"slow\");\n",
        "    private List<String> tags = new ArrayList<String>(Arrays.asList(\"a\"));\n",
        "    private Config.Limits limits = new Config.Limits();\n",
        "    private String owner = null;\n",
        "import java.util.Arrays;\n",
    ] {
        assert!(config.contains(line), "missing `{line}` in\n{config}");
    }
}

#[test]
fn a_bare_path_is_generated_as_a_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let defs = dir.path().join("defs.json");
    std::fs::write(
        &defs,
        r#"{ "definitions": { "money": { "type": "object", "properties": { "cents": { "type": "integer" } } } } }"#,
    )
    .expect("write defs");
    let mut run = GenerationRun::new(&settings());
    run.add_uri(&format!("{}#/definitions/money", defs.display()))
        .expect("generate");
    let model = run.finish().expect("finish");
    let money = model.graph().find("com.example.Money").expect("money exists");
    assert!(model.graph().get(money).uri.document.starts_with("file:///"));
}
