//! Unit and behaviour tests for `tagchunk_syntax`.
