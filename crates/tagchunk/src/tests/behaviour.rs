//! Behaviour-driven tests for chunk extraction.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tagchunk_core::{Chunk, EngineConfig, Tag};
use tagchunk_syntax::MemoryTree;

use super::support::{ELIXIR_RULES, elixir_module};
use crate::{Extraction, Extractor, RuleRegistry};

#[derive(Default)]
struct TestWorld {
    tree: Option<MemoryTree>,
    definitions: Vec<(String, String)>,
    source: Option<String>,
    extraction: Option<Extraction>,
}

impl TestWorld {
    fn extraction(&self) -> &Extraction {
        self.extraction.as_ref().expect("extraction should have run")
    }

    fn chunk(&self, name: &str) -> &Chunk {
        self.extraction()
            .chunks()
            .iter()
            .find(|chunk| chunk.name() == name)
            .unwrap_or_else(|| panic!("no chunk named '{name}'"))
    }
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

/// Strips surrounding double quotes and unescapes `\n`.
fn unquote(s: &str) -> String {
    s.trim_matches('"').replace("\\n", "\n")
}

#[given("the Elixir-style module fixture")]
fn given_module_fixture(world: &mut TestWorld) {
    world.tree = Some(elixir_module());
}

#[given("the Elixir-style rules")]
fn given_elixir_rules(world: &mut TestWorld) {
    world
        .definitions
        .push((String::from("elixir"), ELIXIR_RULES.to_owned()));
}

#[given("a generic fallback rule tagging calls as {tag}")]
fn given_generic_fallback(world: &mut TestWorld, tag: String) {
    let parsed: Tag = unquote(&tag).parse().expect("known tag");
    let rule = format!(
        "((call target: (identifier) @_kw) @{} (#any-of? @_kw \"def\" \"defp\") (#set! generic))",
        parsed.capture_name()
    );
    world.definitions.push((String::from("elixir"), rule));
}

#[given("broken rules for {language}")]
fn given_broken_rules(world: &mut TestWorld, language: String) {
    world
        .definitions
        .push((unquote(&language), String::from("(call target:")));
}

#[given("the source {source}")]
fn given_source(world: &mut TestWorld, source: String) {
    world.source = Some(unquote(&source));
}

#[when("chunks are extracted for {language}")]
fn when_extracted(world: &mut TestWorld, language: String) {
    let registry = RuleRegistry::from_definitions(world.definitions.clone());
    let extractor = Extractor::new(registry, EngineConfig::default());
    let tree = world.tree.as_ref().expect("tree should be set");
    world.extraction = Some(
        extractor
            .extract(&unquote(&language), tree.root(), tree.source())
            .expect("not cancelled"),
    );
}

#[when("the source is extracted as {language}")]
fn when_source_extracted(world: &mut TestWorld, language: String) {
    let extractor = Extractor::with_builtin_rules(EngineConfig::default());
    let source = world.source.as_deref().expect("source should be set");
    world.extraction = Some(
        extractor
            .extract_source(&unquote(&language), source)
            .expect("not cancelled"),
    );
}

#[then("{count} chunks are produced")]
fn then_chunk_count(world: &mut TestWorld, count: usize) {
    assert_eq!(world.extraction().chunks().len(), count);
}

#[then("chunk {child} is a child of {parent}")]
fn then_child_of(world: &mut TestWorld, child: String, parent: String) {
    let parent_chunk = world.chunk(&unquote(&parent));
    let child_chunk = world.chunk(&unquote(&child));
    assert_eq!(child_chunk.parent(), Some(parent_chunk.id()));
    assert!(parent_chunk.children().contains(child_chunk.id()));
}

#[then("chunk {name} has kind {kind}")]
fn then_kind(world: &mut TestWorld, name: String, kind: String) {
    let expected: Tag = unquote(&kind).parse().expect("known tag");
    assert_eq!(world.chunk(&unquote(&name)).kind(), expected);
}

#[then("chunk {name} has documentation starting with {prefix}")]
fn then_documentation(world: &mut TestWorld, name: String, prefix: String) {
    let documentation = world
        .chunk(&unquote(&name))
        .documentation()
        .expect("documentation should be attached");
    assert!(documentation.starts_with(&unquote(&prefix)), "{documentation}");
}

#[then("no documentation chunk remains")]
fn then_no_documentation(world: &mut TestWorld) {
    assert!(
        world
            .extraction()
            .chunks()
            .iter()
            .all(|chunk| !chunk.kind().is_documentation())
    );
}

#[then("no diagnostics are recorded")]
fn then_no_diagnostics(world: &mut TestWorld) {
    assert!(world.extraction().diagnostics().is_empty());
}

#[scenario(path = "tests/features/tagchunk.feature")]
fn tagchunk_behaviour(world: TestWorld) {
    let _ = world;
}
