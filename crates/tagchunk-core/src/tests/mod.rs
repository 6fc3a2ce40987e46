//! Unit tests for `tagchunk_core` types.

mod span_tests;
