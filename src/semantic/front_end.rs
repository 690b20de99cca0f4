//! Front-end abstraction over the projection engine.
//!
//! Each front end supplies its own syntax tree and root projection; the IR,
//! type algebra and diagnostic engine are shared.

use log::debug;

use crate::ast::reg::RegProgram;
use crate::ast::SyntaxNode;
use crate::diagnostic::{Diagnostic, DiagnosticEngine};
use crate::ir::{Node, NodeKind};
use crate::semantic::{Failed, LowerCtx};

pub trait FrontEnd {
    type Syntax;

    fn name(&self) -> &'static str;

    /// Project a whole unit into one program node.
    fn project_root(&self, ctx: &mut LowerCtx<'_>, root: &Self::Syntax) -> Result<Node, Failed>;
}

/// pycparser-shaped C syntax trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct CFrontEnd;

impl FrontEnd for CFrontEnd {
    type Syntax = SyntaxNode;

    fn name(&self) -> &'static str {
        "c"
    }

    fn project_root(&self, ctx: &mut LowerCtx<'_>, root: &SyntaxNode) -> Result<Node, Failed> {
        let node = ctx.lower_expr(root, 0)?;
        match node.kind {
            NodeKind::Program(_) => Ok(node),
            _ => {
                let location = node.location.clone();
                Ok(Node::new(NodeKind::Program(vec![node]), location))
            }
        }
    }
}

/// Register-DSL syntax trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegFrontEnd;

impl FrontEnd for RegFrontEnd {
    type Syntax = RegProgram;

    fn name(&self) -> &'static str {
        "reg"
    }

    fn project_root(&self, ctx: &mut LowerCtx<'_>, root: &RegProgram) -> Result<Node, Failed> {
        ctx.lower_reg_program(root)
    }
}

/// Result of projecting one unit.
#[derive(Debug)]
pub struct ProjectionOutput {
    /// `None` whenever any fatal diagnostic was recorded.
    pub root: Option<Node>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProjectionOutput {
    pub fn has_errors(&self) -> bool {
        self.root.is_none()
    }
}

/// Project one unit with a fresh diagnostic engine. The unit fails as a
/// whole if anything fatal was recorded anywhere in the pass.
pub fn project_unit<F: FrontEnd>(front_end: &F, root: &F::Syntax) -> ProjectionOutput {
    let mut diag = DiagnosticEngine::new();
    let result = {
        let mut ctx = LowerCtx::new(&mut diag);
        front_end.project_root(&mut ctx, root)
    };
    debug!(
        "{} front end finished with {} diagnostic(s)",
        front_end.name(),
        diag.len()
    );
    let root = match result {
        Ok(node) if !diag.has_errors() => Some(node),
        _ => None,
    };
    ProjectionOutput {
        root,
        diagnostics: diag.into_diagnostics(),
    }
}
