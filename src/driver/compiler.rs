//! Pipeline orchestration: load, project, emit.

use std::io::IsTerminal;

use log::{debug, info};

use crate::ast::json::{load_c_json, load_c_json_file, LoadError};
use crate::ast::reg::load_reg_json;
use crate::diagnostic::{Diagnostic, ErrorFormatter};
use crate::ir::dumper::IrDumper;
use crate::semantic::{project_unit, CFrontEnd, RegFrontEnd};

use super::artifact::{CompilePhase, LoadedSyntax, ProjectionArtifact};
use super::cli::{CompileConfig, FrontEndKind, InputSource};

/// Main compiler driver
pub struct CompilerDriver {
    config: CompileConfig,
    diagnostics: Vec<Diagnostic>,
}

impl CompilerDriver {
    /// Create a new compiler driver from CLI arguments
    pub fn new(cli: super::cli::Cli) -> Self {
        Self::from_config(cli.into_config())
    }

    /// Create a new compiler driver from configuration
    pub fn from_config(config: CompileConfig) -> Self {
        CompilerDriver {
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn run_pipeline(&mut self, stop_after: CompilePhase) -> Result<ProjectionArtifact, PipelineError> {
        let mut out = ProjectionArtifact::default();

        let syntax = self.run_loader()?;
        if stop_after == CompilePhase::Load {
            out.syntax = Some(syntax);
            return Ok(out);
        }

        let output = match &syntax {
            LoadedSyntax::C(root) => project_unit(&CFrontEnd, root),
            LoadedSyntax::Reg(program) => project_unit(&RegFrontEnd, program),
        };
        self.diagnostics.extend(output.diagnostics.iter().cloned());
        match output.root {
            Some(ir) => {
                out.ir = Some(ir);
                out.diagnostics = output.diagnostics;
                Ok(out)
            }
            None => Err(PipelineError::Fatal(output.diagnostics)),
        }
    }

    fn run_loader(&self) -> Result<LoadedSyntax, PipelineError> {
        let text = match &self.config.input {
            InputSource::Path(path) => {
                debug!("loading {}", path.display());
                if self.config.front_end == FrontEndKind::C {
                    return Ok(LoadedSyntax::C(load_c_json_file(path)?));
                }
                std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?
            }
            InputSource::Buffer(text) => text.clone(),
        };
        let syntax = match self.config.front_end {
            FrontEndKind::C => LoadedSyntax::C(load_c_json(&text)?),
            FrontEndKind::Reg => LoadedSyntax::Reg(load_reg_json(&text)?),
        };
        Ok(syntax)
    }

    /// Run the pipeline, print diagnostics and write the requested outputs
    pub fn run(&mut self) -> Result<(), DriverError> {
        let formatter = ErrorFormatter {
            use_colors: std::io::stderr().is_terminal(),
        };
        let artifact = match self.run_pipeline(CompilePhase::Project) {
            Ok(artifact) => artifact,
            Err(PipelineError::Fatal(diagnostics)) => {
                formatter.print_diagnostics(&diagnostics);
                return Err(DriverError::CompilationFailed(diagnostics.len()));
            }
            Err(e) => return Err(e.into()),
        };
        let Some(ir) = artifact.ir else {
            return Ok(());
        };

        let mut rendered = Vec::new();
        if self.config.dump_ir {
            rendered.push(IrDumper::dump(&ir));
        }
        if self.config.emit_json {
            rendered.push(serde_json::to_string_pretty(&ir)?);
        }
        if rendered.is_empty() {
            info!("projection succeeded; no output requested");
            return Ok(());
        }
        let mut text = rendered.join("\n");
        text.push('\n');

        match &self.config.output_path {
            Some(path) => std::fs::write(path, text)
                .map_err(|e| DriverError::IoError(format!("Failed to write {}: {}", path.display(), e)))?,
            None => print!("{}", text),
        }
        Ok(())
    }
}

/// Failure of the load/project pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("projection failed with {} fatal diagnostic(s)", .0.len())]
    Fatal(Vec<Diagnostic>),
}

/// Error types for the compiler driver
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("failed to serialize IR: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Compilation failed with {0} fatal diagnostic(s)")]
    CompilationFailed(usize),
}
