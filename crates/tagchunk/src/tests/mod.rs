//! Unit and behaviour tests for the extraction engine.

mod support;

mod builder_tests;

mod behaviour;
