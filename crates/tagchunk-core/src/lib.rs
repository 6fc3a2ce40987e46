//! Core data model, diagnostics, and configuration for the tagchunk
//! extraction engine.
//!
//! This crate provides the canonical type definitions shared by every stage
//! of the chunk pipeline: source spans, the fixed tag taxonomy, normalised
//! chunks and their stable identifiers, per-file diagnostics, and engine
//! configuration. It is re-exported by the `tagchunk` facade crate.
//!
//! # Core types
//!
//! - [`Span`] and [`LineCol`]: byte and line/column source positions
//! - [`Tag`]: the fixed chunk taxonomy
//! - [`Chunk`] and [`ChunkId`]: the externally visible chunk shape
//! - [`Diagnostic`] and [`DiagnosticCode`]: non-fatal per-file problems
//! - [`EngineConfig`]: limits and output switches

mod chunk;
mod config;
mod diagnostic;
mod span;
mod tag;

pub use chunk::{Chunk, ChunkId};
pub use config::EngineConfig;
pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use span::{LineCol, Span};
pub use tag::{Tag, UnknownTag};

#[cfg(test)]
mod tests;
