//! End-to-end extraction through the public API with the bundled rules.

use std::collections::HashSet;

use rstest::{fixture, rstest};
use tagchunk::{EngineConfig, Extraction, Extractor, Tag};

const SAMPLE: &str = include_str!("fixtures/sample.rs");

#[fixture]
fn extractor() -> Extractor {
    Extractor::with_builtin_rules(EngineConfig::default())
}

fn outline(extraction: &Extraction) -> Vec<(Tag, &str, usize)> {
    extraction
        .chunks()
        .iter()
        .map(|chunk| (chunk.kind(), chunk.name(), chunk.depth))
        .collect()
}

#[rstest]
fn sample_outline_is_nested_in_source_order(extractor: Extractor) {
    let extraction = extractor.extract_source("rust", SAMPLE).expect("extract");

    assert!(extraction.diagnostics().is_empty(), "{:?}", extraction.diagnostics());
    assert_eq!(
        outline(&extraction),
        vec![
            (Tag::Module, "shapes", 0),
            (Tag::Class, "Point", 1),
            (Tag::Class, "Point", 1),
            (Tag::Method, "origin", 2),
            (Tag::Function, "main", 0),
        ]
    );
    assert_eq!(extraction.roots().count(), 2);
    assert_eq!(extraction.max_depth(), 2);
}

#[rstest]
fn doc_comments_attach_to_the_following_definition(extractor: Extractor) {
    let extraction = extractor.extract_source("rust", SAMPLE).expect("extract");

    let documented: Vec<_> = extraction
        .chunks()
        .iter()
        .filter_map(|chunk| chunk.documentation().map(|doc| (chunk.name(), doc)))
        .collect();
    assert_eq!(
        documented,
        vec![
            ("Point", "/// A point on the plane."),
            ("origin", "/// Makes the origin."),
        ]
    );
    assert!(
        extraction
            .chunks()
            .iter()
            .all(|chunk| chunk.kind() != Tag::Documentation)
    );
}

#[rstest]
#[case::rust_derive(
    "rust",
    "/// A point.\n#[derive(Debug)]\npub struct Point {\n    x: i32,\n}\n",
    "Point",
    "/// A point.",
    &["#[derive(Debug)]"]
)]
#[case::typescript_export(
    "typescript",
    "/** Shapes. */\nexport class Point {}\n",
    "Point",
    "/** Shapes. */",
    &[]
)]
#[case::python_decorator(
    "python",
    "# Helper.\n@cache\ndef f():\n    pass\n",
    "f",
    "# Helper.",
    &["@cache"]
)]
fn documentation_reaches_past_attributes_and_keywords(
    extractor: Extractor,
    #[case] language: &str,
    #[case] source: &str,
    #[case] name: &str,
    #[case] documentation: &str,
    #[case] leading: &[&str],
) {
    let extraction = extractor.extract_source(language, source).expect("extract");

    assert_eq!(extraction.chunks().len(), 1, "{:?}", extraction.chunks());
    let chunk = extraction.chunks().first().expect("one chunk");
    assert_eq!(chunk.name(), name);
    assert_eq!(chunk.documentation(), Some(documentation));
    assert_eq!(chunk.leading_trivia(), leading);
}

#[rstest]
fn identifiers_are_unique_and_stable(extractor: Extractor) {
    let first = extractor.extract_source("rust", SAMPLE).expect("extract");
    let second = extractor.extract_source("rust", SAMPLE).expect("extract");

    assert_eq!(first, second);
    let ids: HashSet<_> = first.chunks().iter().map(|chunk| chunk.id().as_str()).collect();
    assert_eq!(ids.len(), first.chunks().len());
    assert!(
        ids.iter()
            .all(|id| id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit()))
    );
}

#[rstest]
fn parent_links_agree_with_child_lists(extractor: Extractor) {
    let extraction = extractor.extract_source("rust", SAMPLE).expect("extract");

    for chunk in extraction.chunks() {
        for child in extraction.children_of(chunk.id()) {
            assert_eq!(child.parent(), Some(chunk.id()));
            assert!(chunk.span().strictly_contains(child.span()));
        }
        if let Some(parent) = chunk.parent() {
            let owner = extraction.get(parent).expect("parent is present");
            assert!(owner.children().contains(chunk.id()));
        }
    }
}

#[rstest]
fn editing_a_sibling_body_keeps_nested_identifiers() {
    let extractor = Extractor::with_builtin_rules(EngineConfig::default());
    let edited = SAMPLE.replace(
        "let _ = shapes::Point::origin();",
        "let point = shapes::Point::origin();\n    drop(point);",
    );

    let before = extractor.extract_source("rust", SAMPLE).expect("extract");
    let after = extractor.extract_source("rust", &edited).expect("extract");

    let ids = |extraction: &Extraction| -> Vec<String> {
        extraction
            .chunks()
            .iter()
            .filter(|chunk| chunk.name() != "main")
            .map(|chunk| chunk.id().to_string())
            .collect()
    };
    assert_eq!(ids(&before), ids(&after));
}

#[test]
fn text_is_included_only_on_request() {
    let plain = Extractor::with_builtin_rules(EngineConfig::default())
        .extract_source("rust", SAMPLE)
        .expect("extract");
    assert!(plain.chunks().iter().all(|chunk| chunk.text.is_none()));

    let with_text = Extractor::with_builtin_rules(EngineConfig::default().with_include_text(true))
        .extract_source("rust", SAMPLE)
        .expect("extract");
    let main = with_text
        .chunks()
        .iter()
        .find(|chunk| chunk.name() == "main")
        .expect("main chunk");
    assert_eq!(
        main.text.as_deref(),
        Some("fn main() {\n    let _ = shapes::Point::origin();\n}")
    );
}

#[test]
fn unsupported_languages_yield_empty_extractions() {
    let extraction = Extractor::with_builtin_rules(EngineConfig::default())
        .extract_source("cobol", "IDENTIFICATION DIVISION.")
        .expect("extract");

    assert!(extraction.is_empty());
    assert!(extraction.diagnostics().is_empty());
}
