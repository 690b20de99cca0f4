//! Front-end normalization for a small compiler toolchain.
//!
//! Syntax trees from two front ends (C via pycparser, and a register DSL)
//! are projected into one uniform IR with a shared type algebra.

pub mod ast;
pub mod diagnostic;
pub mod driver;
pub mod ir;
pub mod semantic;
pub mod source;
pub mod types;
