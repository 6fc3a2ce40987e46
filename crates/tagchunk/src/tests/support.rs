//! Shared fixtures: small trees, rule text, and a node type that can
//! describe spans no real parser would produce.

use std::ops::Range;

use tagchunk_core::{EngineConfig, LineCol};
use tagchunk_syntax::{ChildNode, MemoryTree, SyntaxNode};

use crate::{Extraction, Extractor, LanguageRuleSet, RuleRegistry, load};

/// Rules for an Elixir-like language where definitions are macro calls.
pub(super) const ELIXIR_RULES: &str = r#"
((call
  target: (identifier) @_kw
  (arguments (alias) @name)) @module
  (#eq? @_kw "defmodule"))

((call
  target: (identifier) @_kw
  (arguments
    (call target: (identifier) @name))) @definition.function
  (#any-of? @_kw "def" "defp"))

((unary_operator
  (call target: (identifier) @_attr)) @definition.documentation
  (#eq? @_attr "doc"))
"#;

/// `defmodule Shop do @doc "Adds" def add(a, b) do end end`, laid out over
/// five lines.
pub(super) fn elixir_module() -> MemoryTree {
    MemoryTree::build("source", |b| {
        b.node("call", |b| {
            b.field_leaf("target", "identifier", "defmodule").text(" ");
            b.node("arguments", |b| {
                b.leaf("alias", "Shop");
            });
            b.text(" ");
            b.node("do_block", |b| {
                b.token("do").text("\n  ");
                b.node("unary_operator", |b| {
                    b.token("@");
                    b.node("call", |b| {
                        b.field_leaf("target", "identifier", "doc").text(" ");
                        b.node("arguments", |b| {
                            b.leaf("string", "\"Adds\"");
                        });
                    });
                });
                b.text("\n  ");
                def_add(b);
                b.text("\n").token("end");
            });
        });
        b.text("\n");
    })
}

/// `def add(a, b) do\n  end`
fn def_add(b: &mut tagchunk_syntax::MemoryTreeBuilder) {
    b.node("call", |b| {
        b.field_leaf("target", "identifier", "def").text(" ");
        b.node("arguments", |b| {
            b.node("call", |b| {
                b.field_leaf("target", "identifier", "add");
                b.node("arguments", |b| {
                    b.token("(")
                        .leaf("identifier", "a")
                        .token(",")
                        .text(" ")
                        .leaf("identifier", "b")
                        .token(")");
                });
            });
        });
        b.text(" ");
        b.node("do_block", |b| {
            b.token("do").text("\n  ").token("end");
        });
    });
}

pub(super) const ELIXIR_SOURCE: &str =
    "defmodule Shop do\n  @doc \"Adds\"\n  def add(a, b) do\n  end\nend\n";

/// A Rust-like `impl` block holding two methods.
pub(super) fn impl_block() -> MemoryTree {
    MemoryTree::build("source_file", |b| {
        b.node("impl_item", |b| {
            b.token("impl").text(" ");
            b.field_leaf("type", "type_identifier", "Counter").text(" ");
            b.field_node("body", "declaration_list", |b| {
                b.token("{").text("\n    ");
                method(b, "get");
                b.text("\n    ");
                method(b, "reset");
                b.text("\n").token("}");
            });
        });
        b.text("\n");
    })
}

fn method(b: &mut tagchunk_syntax::MemoryTreeBuilder, name: &str) {
    b.node("function_item", |b| {
        b.token("fn").text(" ");
        b.field_leaf("name", "identifier", name);
        b.field_node("parameters", "parameters", |b| {
            b.token("(").token(")");
        });
        b.text(" ");
        b.field_node("body", "block", |b| {
            b.token("{").token("}");
        });
    });
}

pub(super) const IMPL_RULES: &str = r"
(impl_item
  type: (type_identifier) @name) @definition.class

(function_item
  name: (identifier) @name) @definition.function

(impl_item
  body: (declaration_list
    (function_item
      name: (identifier) @name) @definition.method))
";

pub(super) fn rules(language: &str, definitions: &str) -> LanguageRuleSet {
    load(language, definitions).expect("rules should load")
}

pub(super) fn extractor(language: &str, definitions: &str, config: EngineConfig) -> Extractor {
    let mut registry = RuleRegistry::new();
    registry.insert(rules(language, definitions));
    Extractor::new(registry, config)
}

pub(super) fn extract_memory(tree: &MemoryTree, language: &str, definitions: &str) -> Extraction {
    extractor(language, definitions, EngineConfig::default())
        .extract(language, tree.root(), tree.source())
        .expect("extraction should not be cancelled")
}

/// A hand-built node whose byte range is taken at face value.
#[derive(Debug, Clone, Copy)]
pub(super) struct RawNode<'t> {
    pub(super) kind: &'t str,
    pub(super) start: usize,
    pub(super) end: usize,
    pub(super) children: &'t [RawNode<'t>],
}

impl<'t> RawNode<'t> {
    pub(super) const fn leaf(kind: &'t str, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            children: &[],
        }
    }
}

impl<'t> SyntaxNode<'t> for RawNode<'t> {
    fn kind(&self) -> &'t str {
        self.kind
    }

    fn is_named(&self) -> bool {
        true
    }

    fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    fn start_position(&self) -> LineCol {
        LineCol::new(0, u32::try_from(self.start).unwrap_or(u32::MAX))
    }

    fn end_position(&self) -> LineCol {
        LineCol::new(0, u32::try_from(self.end).unwrap_or(u32::MAX))
    }

    fn children(&self) -> Vec<ChildNode<'t, Self>> {
        self.children
            .iter()
            .map(|&node| ChildNode { field: None, node })
            .collect()
    }
}
