//! Tests for overlap resolution, nesting, naming and documentation.

use rstest::rstest;
use tagchunk_core::{DiagnosticCode, EngineConfig, Tag};
use tagchunk_syntax::MemoryTree;

use super::support::{
    ELIXIR_RULES, ELIXIR_SOURCE, IMPL_RULES, RawNode, elixir_module, extract_memory, extractor,
    impl_block, rules,
};
use crate::{CancellationToken, ChunkTree, build, filter_matches, match_tree};

fn build_tree<'s>(
    tree: &'s MemoryTree,
    definitions: &str,
    config: &EngineConfig,
) -> (ChunkTree<'s>, Vec<tagchunk_core::Diagnostic>) {
    let set = rules("test", definitions);
    let mut output = match_tree(tree.root(), &set, config, &CancellationToken::new())
        .expect("not cancelled");
    let mut diagnostics = output.diagnostics;
    filter_matches(&mut output.matches, &set, tree.source(), &mut diagnostics);
    let chunks = build(&output.matches, &set, tree.source(), config, &mut diagnostics);
    (chunks, diagnostics)
}

fn summary(tree: &ChunkTree<'_>) -> Vec<(Tag, String, Option<usize>)> {
    tree.chunks()
        .iter()
        .map(|chunk| (chunk.tag(), chunk.name().to_owned(), chunk.parent()))
        .collect()
}

#[rstest]
fn wrapper_chunks_contain_the_definitions_they_wrap() {
    let tree = elixir_module();
    assert_eq!(tree.source(), ELIXIR_SOURCE);
    let (chunks, diagnostics) = build_tree(&tree, ELIXIR_RULES, &EngineConfig::default());

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        summary(&chunks),
        [
            (Tag::Module, String::from("Shop"), None),
            (Tag::Function, String::from("add"), Some(0)),
        ]
    );
    assert_eq!(chunks.roots(), [0]);
    assert_eq!(chunks.get(0).map(|chunk| chunk.children().to_vec()), Some(vec![1]));
}

#[rstest]
fn leading_documentation_folds_into_the_next_sibling() {
    let tree = elixir_module();
    let (chunks, _) = build_tree(&tree, ELIXIR_RULES, &EngineConfig::default());
    let function = chunks.get(1).expect("function chunk");
    assert_eq!(function.documentation(), Some("@doc \"Adds\""));
    assert!(chunks.chunks().iter().all(|chunk| chunk.tag() != Tag::Documentation));
}

#[rstest]
fn documentation_stays_standalone_when_attachment_is_disabled() {
    let tree = elixir_module();
    let config = EngineConfig::default().with_attach_documentation(false);
    let (chunks, _) = build_tree(&tree, ELIXIR_RULES, &config);
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(kinds, [Tag::Module, Tag::Documentation, Tag::Function]);
    assert!(chunks.chunks().iter().all(|chunk| chunk.documentation().is_none()));
}

#[rstest]
fn documentation_attaches_across_untagged_code() {
    // `@doc "Adds"` then an untagged token before the definition.
    let tree = MemoryTree::build("source", |b| {
        b.node("unary_operator", |b| {
            b.token("@");
            b.node("call", |b| {
                b.field_leaf("target", "identifier", "doc").text(" ");
                b.node("arguments", |b| {
                    b.leaf("string", "\"Adds\"");
                });
            });
        });
        b.text("\n").token(";").text("\n");
        b.node("call", |b| {
            b.field_leaf("target", "identifier", "def").text(" ");
            b.node("arguments", |b| {
                b.node("call", |b| {
                    b.field_leaf("target", "identifier", "add");
                });
            });
        });
    });
    let (chunks, _) = build_tree(&tree, ELIXIR_RULES, &EngineConfig::default());
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(kinds, [Tag::Function]);
    let function = chunks.get(0).expect("function");
    assert_eq!(function.documentation(), Some("@doc \"Adds\""));
    assert_eq!(function.leading_trivia(), [";"]);
}

#[rstest]
fn a_documentation_chunk_with_children_breaks_the_run() {
    let tree = MemoryTree::build("source", |b| {
        b.leaf("comment", "# orphan").text("\n");
        b.node("doc_block", |b| {
            b.token("@doc").text(" ");
            b.node("function", |b| {
                b.token("def").text(" ");
                b.field_leaf("name", "identifier", "inner");
            });
        });
        b.text("\n");
        b.node("function", |b| {
            b.token("def").text(" ");
            b.field_leaf("name", "identifier", "outer");
        });
    });
    let definitions = "
        (comment) @definition.documentation
        (doc_block) @definition.documentation
        (function name: (identifier) @name) @definition.function
    ";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(
        kinds,
        [Tag::Documentation, Tag::Documentation, Tag::Function, Tag::Function]
    );
    assert!(chunks.chunks().iter().all(|chunk| chunk.documentation().is_none()));
}

#[rstest]
fn decorators_between_documentation_and_definition_become_leading_trivia() {
    let tree = MemoryTree::build("module", |b| {
        b.leaf("comment", "# Helper.").text("\n");
        b.node("decorated_definition", |b| {
            b.leaf("decorator", "@cache").text("\n");
            b.node("function", |b| {
                b.token("def").text(" ");
                b.field_leaf("name", "identifier", "f");
            });
        });
        b.text("  ").leaf("comment", "# hot path").text("\n");
    });
    let definitions = "
        ((comment) @definition.documentation @_text (#match? @_text \"^# [A-Z]\"))
        (function name: (identifier) @name) @definition.function
    ";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    assert_eq!(chunks.len(), 1);
    let function = chunks.get(0).expect("function");
    assert_eq!(function.documentation(), Some("# Helper."));
    assert_eq!(function.leading_trivia(), ["@cache"]);
    assert_eq!(function.trailing_trivia(), ["# hot path"]);
}

#[rstest]
fn a_parent_header_is_not_trivia_of_its_first_child() {
    let tree = impl_block();
    let (chunks, _) = build_tree(&tree, IMPL_RULES, &EngineConfig::default());
    assert_eq!(chunks.len(), 3);
    assert!(
        chunks
            .chunks()
            .iter()
            .all(|chunk| chunk.leading_trivia().is_empty() && chunk.trailing_trivia().is_empty())
    );
}

#[rstest]
fn consecutive_documentation_chunks_are_joined() {
    let tree = MemoryTree::build("source", |b| {
        b.leaf("comment", "# first  ").text("\n");
        b.leaf("comment", "# second").text("\n");
        b.node("function", |b| {
            b.token("def").text(" ");
            b.field_leaf("name", "identifier", "run");
        });
    });
    let definitions = "
        (comment) @definition.documentation
        (function name: (identifier) @name) @definition.function
    ";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    assert_eq!(chunks.len(), 1);
    let function = chunks.get(0).expect("function");
    assert_eq!(function.documentation(), Some("# first\n# second"));
}

#[rstest]
fn trailing_documentation_stays_standalone() {
    let tree = MemoryTree::build("source", |b| {
        b.node("function", |b| {
            b.token("def").text(" ");
            b.field_leaf("name", "identifier", "run");
        });
        b.text("\n").leaf("comment", "# the end");
    });
    let definitions = "
        (comment) @definition.documentation
        (function name: (identifier) @name) @definition.function
    ";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(kinds, [Tag::Function, Tag::Documentation]);
}

#[rstest]
fn the_more_specific_tag_wins_on_identical_spans() {
    let tree = impl_block();
    let (chunks, _) = build_tree(&tree, IMPL_RULES, &EngineConfig::default());
    assert_eq!(
        summary(&chunks),
        [
            (Tag::Class, String::from("Counter"), None),
            (Tag::Method, String::from("get"), Some(0)),
            (Tag::Method, String::from("reset"), Some(0)),
        ]
    );
}

#[rstest]
fn generic_rules_lose_to_specific_rules_regardless_of_tag() {
    let tree = elixir_module();
    let definitions = format!(
        "((call target: (identifier) @name) @module (#set! generic))\n{ELIXIR_RULES}"
    );
    let (chunks, _) = build_tree(&tree, &definitions, &EngineConfig::default());
    let kinds: Vec<(Tag, &str)> = chunks
        .chunks()
        .iter()
        .map(|chunk| (chunk.tag(), chunk.name()))
        .collect();
    // The generic fallback still claims calls nothing else tags.
    assert_eq!(
        kinds,
        [
            (Tag::Module, "Shop"),
            (Tag::Documentation, "doc"),
            (Tag::Module, "doc"),
            (Tag::Function, "add"),
            (Tag::Module, "add"),
        ]
    );
}

#[rstest]
fn equal_specificity_falls_back_to_rule_order() {
    let tree = impl_block();
    let definitions = "
        (function_item name: (identifier) @name) @definition.type
        (function_item name: (identifier) @name) @definition.function
    ";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(kinds, [Tag::Type, Tag::Type]);
}

#[rstest]
fn equal_rules_fall_back_to_capture_order() {
    let tree = impl_block();
    let definitions = "(function_item name: (identifier) @name) @definition.type @definition.function";
    let (chunks, _) = build_tree(&tree, definitions, &EngineConfig::default());
    let kinds: Vec<Tag> = chunks.chunks().iter().map(|chunk| chunk.tag()).collect();
    assert_eq!(kinds, [Tag::Type, Tag::Type]);
}

#[rstest]
fn names_fall_back_to_identifier_shaped_captures() {
    let tree = impl_block();
    let (chunks, _) = build_tree(
        &tree,
        "(function_item (identifier) @_id) @definition.function",
        &EngineConfig::default(),
    );
    let names: Vec<&str> = chunks.chunks().iter().map(|chunk| chunk.name()).collect();
    assert_eq!(names, ["get", "reset"]);
}

#[rstest]
fn names_are_synthesised_when_nothing_identifies_the_chunk() {
    let tree = impl_block();
    let (chunks, _) = build_tree(&tree, "(block) @definition.function", &EngineConfig::default());
    let names: Vec<&str> = chunks.chunks().iter().map(|chunk| chunk.name()).collect();
    assert_eq!(names, ["function@2", "function@3"]);
}

#[rstest]
#[case(4, "Coun")]
#[case(0, "class@1")]
fn names_are_truncated_to_the_configured_length(#[case] limit: usize, #[case] expected: &str) {
    let tree = impl_block();
    let config = EngineConfig::default().with_max_name_bytes(limit);
    let (chunks, _) = build_tree(
        &tree,
        "(impl_item type: (type_identifier) @name) @definition.class",
        &config,
    );
    assert_eq!(chunks.get(0).map(|chunk| chunk.name()), Some(expected));
}

#[rstest]
fn truncation_respects_character_boundaries() {
    let tree = MemoryTree::build("source", |b| {
        b.node("function", |b| {
            b.token("def").text(" ");
            b.field_leaf("name", "identifier", "héllo");
        });
    });
    let config = EngineConfig::default().with_max_name_bytes(2);
    let (chunks, _) = build_tree(
        &tree,
        "(function name: (identifier) @name) @definition.function",
        &config,
    );
    assert_eq!(chunks.get(0).map(|chunk| chunk.name()), Some("h"));
}

#[rstest]
fn empty_captures_are_dropped_with_a_diagnostic() {
    let tree = MemoryTree::build("source", |b| {
        b.node("function", |b| {
            b.token("def").text(" ");
            b.field_leaf("name", "identifier", "run");
            b.node("body", |_| {});
        });
    });
    let (chunks, diagnostics) = build_tree(
        &tree,
        "(function (body) @definition.function)",
        &EngineConfig::default(),
    );
    assert!(chunks.is_empty());
    let codes: Vec<DiagnosticCode> = diagnostics.iter().map(|diag| diag.code()).collect();
    assert_eq!(codes, [DiagnosticCode::EmptySpan]);
}

fn build_raw(root: RawNode<'_>, source: &str) -> (Vec<(Tag, usize, usize)>, Vec<DiagnosticCode>) {
    let set = rules("raw", "(item) @definition.function");
    let config = EngineConfig::default();
    let output = match_tree(root, &set, &config, &CancellationToken::new()).expect("not cancelled");
    let mut diagnostics = output.diagnostics;
    let chunks = build(&output.matches, &set, source, &config, &mut diagnostics);
    (
        chunks
            .chunks()
            .iter()
            .map(|chunk| (chunk.tag(), chunk.span().start_byte, chunk.span().end_byte))
            .collect(),
        diagnostics.iter().map(|diag| diag.code()).collect(),
    )
}

#[rstest]
fn inverted_and_out_of_bounds_spans_are_dropped() {
    let children = [
        RawNode::leaf("item", 0, 4),
        RawNode::leaf("item", 8, 6),
        RawNode::leaf("item", 10, 99),
    ];
    let root = RawNode {
        kind: "root",
        start: 0,
        end: 12,
        children: &children,
    };
    let (chunks, codes) = build_raw(root, "abcd efgh ij");
    assert_eq!(chunks, [(Tag::Function, 0, 4)]);
    assert_eq!(
        codes,
        [DiagnosticCode::InvertedSpan, DiagnosticCode::SpanOutOfBounds]
    );
}

#[rstest]
fn crossing_spans_are_dropped() {
    let children = [RawNode::leaf("item", 0, 6), RawNode::leaf("item", 4, 10)];
    let root = RawNode {
        kind: "root",
        start: 0,
        end: 12,
        children: &children,
    };
    let (chunks, codes) = build_raw(root, "abcd efgh ij");
    assert_eq!(chunks, [(Tag::Function, 0, 6)]);
    assert_eq!(codes, [DiagnosticCode::CrossingSpan]);
}

#[rstest]
fn spans_splitting_a_character_are_out_of_bounds() {
    let children = [RawNode::leaf("item", 1, 3)];
    let root = RawNode {
        kind: "root",
        start: 0,
        end: 3,
        children: &children,
    };
    let (chunks, codes) = build_raw(root, "éa");
    assert!(chunks.is_empty());
    assert_eq!(codes, [DiagnosticCode::SpanOutOfBounds]);
}

#[rstest]
fn siblings_are_disjoint_and_children_are_contained() {
    let tree = elixir_module();
    let definitions = format!("((call) @definition.function (#set! generic))\n{ELIXIR_RULES}");
    let extraction = extractor("elixir", &definitions, EngineConfig::default().with_attach_documentation(false))
        .extract("elixir", tree.root(), tree.source())
        .expect("not cancelled");

    for chunk in extraction.chunks() {
        let children: Vec<_> = extraction.children_of(chunk.id()).collect();
        for child in &children {
            assert!(chunk.span.contains(&child.span));
        }
        for pair in children.windows(2) {
            if let [left, right] = pair {
                assert!(left.span.end_byte <= right.span.start_byte);
            }
        }
    }
    assert!(
        extraction
            .chunks()
            .iter()
            .all(|chunk| chunk.span.end_byte <= tree.source().len())
    );
}

#[rstest]
fn the_same_input_builds_the_same_tree() {
    let tree = elixir_module();
    let first = extract_memory(&tree, "elixir", ELIXIR_RULES);
    let second = extract_memory(&tree, "elixir", ELIXIR_RULES);
    assert_eq!(first, second);
}
