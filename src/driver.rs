//! Compiler driver module
//!
//! Loads a syntax tree, runs the selected front end's projection and writes
//! the requested IR outputs.

pub mod artifact;
pub mod cli;
pub mod compiler;

pub use cli::{Cli, CompileConfig, FrontEndKind, InputSource};
pub use compiler::{CompilerDriver, DriverError, PipelineError};
