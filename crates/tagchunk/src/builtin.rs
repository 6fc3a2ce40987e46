//! Rule sets bundled with the crate.
//!
//! The bundled rules cover the grammars the Tree-sitter adapter ships with.
//! They are parsed once, on first use, and shared by every extractor built
//! with [`crate::Extractor::with_builtin_rules`].

use std::sync::Arc;

use once_cell::sync::Lazy;
use tagchunk_syntax::SupportedLanguage;

use crate::registry::RuleRegistry;

const RUST_RULES: &str = include_str!("../queries/rust.scm");
const PYTHON_RULES: &str = include_str!("../queries/python.scm");
const TYPESCRIPT_RULES: &str = include_str!("../queries/typescript.scm");

static BUILTIN: Lazy<Arc<RuleRegistry>> = Lazy::new(|| {
    Arc::new(RuleRegistry::from_definitions(
        SupportedLanguage::all()
            .iter()
            .map(|&language| (language.as_str(), definitions(language))),
    ))
});

/// Returns the bundled rule text for `language`.
#[must_use]
pub const fn definitions(language: SupportedLanguage) -> &'static str {
    match language {
        SupportedLanguage::Rust => RUST_RULES,
        SupportedLanguage::Python => PYTHON_RULES,
        SupportedLanguage::TypeScript => TYPESCRIPT_RULES,
    }
}

/// Returns the shared registry of bundled rules.
#[must_use]
pub fn registry() -> Arc<RuleRegistry> {
    Arc::clone(&BUILTIN)
}
