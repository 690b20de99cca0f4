use crate::ast::reg::RegProgram;
use crate::ast::SyntaxNode;
use crate::diagnostic::Diagnostic;
use crate::ir::Node;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CompilePhase {
    Load,
    #[default]
    Project,
}

/// A loaded syntax tree of either front end.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedSyntax {
    C(SyntaxNode),
    Reg(RegProgram),
}

/// outputs for a single unit
#[derive(Debug, Default)]
pub struct ProjectionArtifact {
    pub syntax: Option<LoadedSyntax>,
    pub ir: Option<Node>,
    pub diagnostics: Vec<Diagnostic>,
}
