//! CLI parsing and configuration module
//!
//! This module handles command-line argument parsing using clap and
//! provides configuration structures for the compiler driver.

use clap::{Parser as CliParser, ValueEnum};
use std::path::PathBuf;

/// Which front end produced the input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FrontEndKind {
    /// pycparser `c_json` syntax tree
    #[default]
    C,
    /// register-DSL syntax tree
    Reg,
}

/// CLI interface using clap
#[derive(CliParser, Debug)]
#[clap(name = "irfront", about = "Projects front-end syntax trees into a uniform IR")]
pub struct Cli {
    /// Input syntax tree (JSON)
    #[clap(value_parser, required = true)]
    pub input_file: PathBuf,

    /// Front end that produced the input
    #[clap(long, value_enum, default_value_t = FrontEndKind::C)]
    pub front_end: FrontEndKind,

    /// Print the IR as an indented tree
    #[clap(long)]
    pub dump_ir: bool,

    /// Print the IR as JSON
    #[clap(long)]
    pub emit_json: bool,

    /// Write output to FILE instead of stdout
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose diagnostic output
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum InputSource {
    Path(PathBuf),
    /// In-memory JSON, used by tests
    Buffer(String),
}

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input: InputSource,
    pub front_end: FrontEndKind,
    pub output_path: Option<PathBuf>,
    pub dump_ir: bool,
    pub emit_json: bool,
    pub verbose: bool,
}

impl CompileConfig {
    /// Create a new CompileConfig from JSON text
    pub fn from_json(json: impl Into<String>, front_end: FrontEndKind) -> Self {
        CompileConfig {
            input: InputSource::Buffer(json.into()),
            front_end,
            output_path: None,
            dump_ir: false,
            emit_json: false,
            verbose: false,
        }
    }
}

impl Cli {
    /// Convert CLI arguments into configuration
    pub fn into_config(self) -> CompileConfig {
        CompileConfig {
            input: InputSource::Path(self.input_file),
            front_end: self.front_end,
            output_path: self.output,
            dump_ir: self.dump_ir,
            emit_json: self.emit_json,
            verbose: self.verbose,
        }
    }
}
