//! Property-based tests for the expression engine.
