//! examples of usage of RustedExprTree
/// Symbolic operations examples: parsing, evaluation, derivatives, simplification, composition, tasks
pub mod symbolic_examples;
