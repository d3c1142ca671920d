//! Common utilities for the Lapis stylesheet compiler.
//!
//! This crate provides shared infrastructure used by the compiler crates:
//! - **Warning System** - deduplicated warnings routed through `tracing`
//! - **Source Positions** - line/column locations carried on tokens and AST nodes

pub mod position;
pub mod warning;

pub use position::SourcePosition;
