//! End-to-end tests driving the refactor registry the way a caller would:
//! parse, resolve, query availability, apply, render.

use rejig_core::{
    parse, LexicalResolver, RefactorContext, RefactorRegistry, RejigError, TextSize,
};

fn offset_of(source: &str, needle: &str) -> TextSize {
    TextSize::from(source.find(needle).expect("cursor needle") as u32)
}

fn available(source: &str, cursor: &str) -> Vec<(String, Vec<String>)> {
    let parsed = parse(source);
    assert!(parsed.ok(), "test source must parse: {:?}", parsed.errors);
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), source, offset_of(source, cursor), &resolver);
    RefactorRegistry::new()
        .available(&cx)
        .into_iter()
        .map(|r| {
            (
                r.name.to_string(),
                r.actions.iter().map(|a| a.id.to_string()).collect(),
            )
        })
        .collect()
}

fn apply(source: &str, cursor: &str, refactor: &str, action: &str) -> Result<String, RejigError> {
    let parsed = parse(source);
    assert!(parsed.ok(), "test source must parse: {:?}", parsed.errors);
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), source, offset_of(source, cursor), &resolver);
    let edits = RefactorRegistry::new().apply(&cx, refactor, action)?;
    edits.edits.render(source)
}

#[test]
fn inline_variable_preserves_precedence() {
    let source = "const v = a + b;\nconst y = v * 2;\n";
    let result = apply(source, "v *", "inline-variable", "inline-all").unwrap();
    assert_eq!(result, "const y = (a + b) * 2;\n");
}

#[test]
fn inline_variable_is_idempotent() {
    // After inlining, the substituted site offers nothing to inline.
    let source = "const v = a + b;\nconst y = v * 2;\n";
    let result = apply(source, "v *", "inline-variable", "inline-all").unwrap();
    let again = available(&result, "a + b");
    assert!(again.iter().all(|(name, _)| name != "inline-variable"));
}

#[test]
fn inline_function_renames_captured_parameter() {
    let source = "function f(x) { return x + 1; }\n{\n    const x = 5;\n    f(x * 2);\n}\n";
    let result = apply(source, "f(x * 2", "inline-function", "inline-all").unwrap();
    assert_eq!(
        result,
        "{\n    const x = 5;\n    const x_1 = x * 2;\n    x_1 + 1;\n}\n"
    );
}

#[test]
fn inline_function_zero_usages_boundary() {
    let source = "function f() { return 1; }\nother();\n";
    let actions = available(source, "f()");
    let inline_fn = actions
        .iter()
        .find(|(name, _)| name == "inline-function")
        .expect("inline-function should be offered");
    assert_eq!(inline_fn.1, vec!["inline-all"]);

    let result = apply(source, "f()", "inline-function", "inline-all").unwrap();
    assert_eq!(result, "other();\n");

    assert!(matches!(
        apply(source, "f()", "inline-function", "inline-here"),
        Err(RejigError::InvalidAction { .. })
    ));
}

#[test]
fn concatenation_availability_matrix() {
    let concat = "const s = \"a\" + b + \"c\";\n";
    assert_eq!(
        available(concat, "\"a\""),
        vec![("convert-string".to_string(), vec!["to-template".to_string()])]
    );

    let template = "const s = `a${b}c`;\n";
    assert_eq!(
        available(template, "a$"),
        vec![(
            "convert-string".to_string(),
            vec!["to-concatenation".to_string()]
        )]
    );
}

#[test]
fn non_additive_chain_offers_nothing() {
    assert!(available("const s = \"a\" + b - c;\n", "\"a\"").is_empty());
}

#[test]
fn template_merge_produces_exact_segments() {
    let source = "const s = \"Mr \" + name + \" is \" + age + \" years old\";\n";
    let result = apply(source, "Mr", "convert-string", "to-template").unwrap();
    assert_eq!(result, "const s = `Mr ${name} is ${age} years old`;\n");
}

#[test]
fn conversion_round_trips_identifier_chains() {
    // Literals and identifiers only: converting to a template and back must
    // reproduce the original chain.
    let source = "const s = \"a\" + b + \"c\";\n";
    let templated = apply(source, "\"a\"", "convert-string", "to-template").unwrap();
    assert_eq!(templated, "const s = `a${b}c`;\n");
    let back = apply(&templated, "a$", "convert-string", "to-concatenation").unwrap();
    assert_eq!(back, source);
}

#[test]
fn available_actions_serialize_for_external_callers() {
    let source = "const v = 1;\nuse(v);\n";
    let parsed = parse(source);
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), source, offset_of(source, "v)"), &resolver);
    let available = RefactorRegistry::new().available(&cx);
    let json = serde_json::to_value(&available).unwrap();
    assert_eq!(json[0]["name"], "inline-variable");
    assert_eq!(json[0]["actions"][0]["id"], "inline-all");
    assert!(json[0]["actions"][0]["description"].is_string());
}

#[test]
fn edits_carry_the_originating_file() {
    let source = "const v = 1;\nuse(v);\n";
    let parsed = parse(source);
    let resolver = LexicalResolver::analyze(&parsed.root);
    let cx = RefactorContext::new(parsed.root.clone(), source, offset_of(source, "v)"), &resolver)
        .with_file("app.js");
    let edits = RefactorRegistry::new()
        .apply(&cx, "inline-variable", "inline-all")
        .unwrap();
    assert_eq!(edits.file.as_deref(), Some(std::path::Path::new("app.js")));
}
