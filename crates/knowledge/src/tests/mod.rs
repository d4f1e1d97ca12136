//! Cross-module tests for the document store.
