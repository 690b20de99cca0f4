//! Projection context, kind dispatch and statement lowering.
//!
//! [`LowerCtx::project`] is the single entry point for a syntax node: it
//! matches every [`SyntaxKind`] exhaustively and hands the node to the
//! lowering routine for its group. Expressions, declarations, aggregates and
//! initializers live in their own modules as further `impl LowerCtx` blocks.

use log::debug;

use crate::ast::{SyntaxKind, SyntaxNode};
use crate::diagnostic::{DiagnosticEngine, ProjectionError};
use crate::ir::{ForStmt, Node, NodeKind, SwitchArm};
use crate::source::SourceLocation;
use crate::semantic::{Failed, Projected, Projection};
use crate::types::TypeBuilder;

/// Context for one projection pass
pub struct LowerCtx<'d> {
    diag: &'d mut DiagnosticEngine,
}

impl<'d> LowerCtx<'d> {
    pub fn new(diag: &'d mut DiagnosticEngine) -> Self {
        LowerCtx { diag }
    }

    /// Record a fatal diagnostic; the returned token is propagated by the caller.
    pub(crate) fn report_error(&mut self, error: ProjectionError) -> Failed {
        self.diag.report_error(error);
        Failed
    }

    pub(crate) fn malformed(&mut self, expected: &'static str, context: &'static str, location: SourceLocation) -> Failed {
        self.report_error(ProjectionError::MalformedTree {
            expected,
            context,
            location,
        })
    }

    /// Project every item, keep going past failures, and fail afterwards if any did.
    pub(crate) fn lower_all<'n, T, I, F>(&mut self, items: I, mut lower: F) -> Result<Vec<T>, Failed>
    where
        I: IntoIterator<Item = &'n SyntaxNode>,
        F: FnMut(&mut Self, &'n SyntaxNode) -> Result<T, Failed>,
    {
        let mut out = Vec::new();
        let mut failed = false;
        for item in items {
            match lower(self, item) {
                Ok(value) => out.push(value),
                Err(Failed) => failed = true,
            }
        }
        if failed {
            Err(Failed)
        } else {
            Ok(out)
        }
    }

    /// Project one syntax node.
    pub fn project(&mut self, node: &SyntaxNode, scope: u32) -> Projection {
        let loc = node.location();
        match &node.kind {
            // --- Top Level ---
            SyntaxKind::FileAST { ext } => {
                debug!("projecting translation unit with {} external declarations", ext.len());
                let items = self.lower_items(ext, scope)?;
                Ok(Projected::Node(Node::new(NodeKind::Program(items), loc)))
            }

            // --- Declarations & Definitions ---
            SyntaxKind::Decl { .. } => self.lower_decl(node, scope),
            SyntaxKind::DeclList { decls } => Ok(Projected::List(self.lower_items(decls, scope)?)),
            SyntaxKind::Typedef { name, quals, ty, .. } => self.lower_typedef(name, quals, ty, scope, loc),
            SyntaxKind::FuncDef {
                decl,
                param_decls,
                body,
            } => self.lower_function_def(decl, param_decls.as_deref(), body, scope, loc),
            SyntaxKind::FuncDecl { args, ty } => {
                Ok(Projected::Signature(self.lower_signature(args.as_deref(), ty, scope, loc)?))
            }
            SyntaxKind::ParamList { params } => Ok(Projected::Params(self.lower_params(params, scope)?)),

            // --- Declarators & type specifiers ---
            SyntaxKind::TypeDecl { quals, ty, .. } => self.lower_type_decl(quals, ty, scope, loc),
            SyntaxKind::PtrDecl { quals, ty } => self.lower_ptr_decl(quals, ty, scope, loc),
            SyntaxKind::ArrayDecl { ty, dim, .. } => self.lower_array_decl(ty, dim.as_deref(), scope, loc),
            SyntaxKind::Typename { quals, ty, .. } => self.lower_typename(quals, ty, scope, loc),
            SyntaxKind::IdentifierType { names } => {
                if names.is_empty() {
                    return Err(self.malformed("type name", "identifier type", loc));
                }
                Ok(Projected::Type(TypeBuilder::new(names.join(" "))))
            }
            SyntaxKind::Struct { name, decls } => self.lower_struct(name.as_deref(), decls.as_deref(), scope, loc),
            SyntaxKind::Enum { name, values } => self.lower_enum(name.as_deref(), values.as_deref(), scope, loc),
            SyntaxKind::EnumeratorList { enumerators } => self.lower_enumerator_list(enumerators, scope, loc),
            SyntaxKind::Enumerator { name, value } => self.lower_enumerator(name, value.as_deref(), loc),

            // --- Expressions ---
            SyntaxKind::ArrayRef { .. }
            | SyntaxKind::Assignment { .. }
            | SyntaxKind::BinaryOp { .. }
            | SyntaxKind::UnaryOp { .. }
            | SyntaxKind::TernaryOp { .. }
            | SyntaxKind::Cast { .. }
            | SyntaxKind::FuncCall { .. }
            | SyntaxKind::StructRef { .. }
            | SyntaxKind::ExprList { .. }
            | SyntaxKind::ID { .. }
            | SyntaxKind::Raw { .. } => Ok(Projected::Node(self.lower_expression(node, scope)?)),
            SyntaxKind::Constant { ty, value } => Ok(Projected::Node(self.lower_constant(ty, value, loc)?)),
            SyntaxKind::InitList { exprs } => Ok(Projected::Initializer(self.lower_init_list(exprs, scope, loc)?)),

            // --- Statements ---
            SyntaxKind::Compound { .. }
            | SyntaxKind::If { .. }
            | SyntaxKind::While { .. }
            | SyntaxKind::DoWhile { .. }
            | SyntaxKind::For { .. }
            | SyntaxKind::Switch { .. }
            | SyntaxKind::Return { .. }
            | SyntaxKind::Break
            | SyntaxKind::Continue
            | SyntaxKind::Goto { .. }
            | SyntaxKind::Label { .. }
            | SyntaxKind::EmptyStatement => Ok(Projected::Node(self.lower_statement(node, scope)?)),
            SyntaxKind::Case { expr, stmts } => {
                let value = self.lower_expr(expr, scope);
                let body = self.lower_items(stmts, scope + 1);
                Ok(Projected::Arm(SwitchArm {
                    value: Some(value?),
                    body: body?,
                }))
            }
            SyntaxKind::Default { stmts } => Ok(Projected::Arm(SwitchArm {
                value: None,
                body: self.lower_items(stmts, scope + 1)?,
            })),

            // --- Known gaps ---
            SyntaxKind::Union { .. }
            | SyntaxKind::NamedInitializer { .. }
            | SyntaxKind::CompoundLiteral { .. }
            | SyntaxKind::EllipsisParam
            | SyntaxKind::Pragma { .. }
            | SyntaxKind::StaticAssert { .. }
            | SyntaxKind::Alignas { .. } => Err(self.report_error(ProjectionError::not_yet_implemented(
                node.kind.name(),
                loc,
            ))),
            SyntaxKind::Unlisted { kind } => Err(self.report_error(ProjectionError::NotListed {
                kind: kind.clone(),
                location: loc,
            })),
        }
    }

    /// Project a node that must produce an IR node.
    pub(crate) fn lower_expr(&mut self, node: &SyntaxNode, scope: u32) -> Result<Node, Failed> {
        match self.project(node, scope)? {
            Projected::Node(n) => Ok(n),
            other => {
                debug!("expected a node, got {}", other.category());
                Err(self.malformed("expression", "expression position", node.location()))
            }
        }
    }

    pub(crate) fn lower_opt_expr(&mut self, node: Option<&SyntaxNode>, scope: u32) -> Result<Option<Node>, Failed> {
        node.map(|n| self.lower_expr(n, scope)).transpose()
    }

    /// Project a node in single-statement position (`if` branch, loop body, label).
    pub(crate) fn lower_stmt(&mut self, node: &SyntaxNode, scope: u32) -> Result<Node, Failed> {
        let loc = node.location();
        match self.project(node, scope)? {
            Projected::Node(n) => Ok(n),
            Projected::Definition(def) => Ok(def.into_node()),
            Projected::List(items) => Ok(Node::new(NodeKind::Block(items), loc)),
            Projected::Absent => Ok(Node::new(NodeKind::Block(Vec::new()), loc)),
            _ => Err(self.malformed("statement", "statement position", loc)),
        }
    }

    /// Project a sequence of block items or external declarations, flattening
    /// declaration lists and dropping items that produce nothing.
    pub(crate) fn lower_items(&mut self, items: &[SyntaxNode], scope: u32) -> Result<Vec<Node>, Failed> {
        let groups = self.lower_all(items, |ctx, item| {
            let loc = item.location();
            match ctx.project(item, scope)? {
                Projected::Node(n) => Ok(vec![n]),
                Projected::List(ns) => Ok(ns),
                Projected::Definition(def) => Ok(vec![def.into_node()]),
                Projected::Absent => Ok(Vec::new()),
                _ => Err(ctx.malformed("statement or declaration", "item list", loc)),
            }
        })?;
        Ok(groups.into_iter().flatten().collect())
    }

    pub(crate) fn lower_statement(&mut self, node: &SyntaxNode, scope: u32) -> Result<Node, Failed> {
        let loc = node.location();
        let kind = match &node.kind {
            SyntaxKind::Compound { block_items } => {
                let items = match block_items {
                    Some(items) => self.lower_items(items, scope + 1)?,
                    None => Vec::new(),
                };
                NodeKind::Block(items)
            }
            SyntaxKind::If { cond, iftrue, iffalse } => {
                let cond = self.lower_expr(cond, scope);
                let then = self.lower_stmt(iftrue, scope);
                match iffalse {
                    None => NodeKind::If {
                        cond: Box::new(cond?),
                        then: Box::new(then?),
                    },
                    Some(iffalse) => {
                        let otherwise = self.lower_stmt(iffalse, scope);
                        NodeKind::IfElse {
                            cond: Box::new(cond?),
                            then: Box::new(then?),
                            otherwise: Box::new(otherwise?),
                        }
                    }
                }
            }
            SyntaxKind::While { cond, stmt } => {
                let cond = self.lower_expr(cond, scope);
                let body = self.lower_stmt(stmt, scope);
                NodeKind::While {
                    cond: Box::new(cond?),
                    body: Box::new(body?),
                }
            }
            SyntaxKind::DoWhile { cond, stmt } => {
                let body = self.lower_stmt(stmt, scope);
                let cond = self.lower_expr(cond, scope);
                NodeKind::DoWhile {
                    body: Box::new(body?),
                    cond: Box::new(cond?),
                }
            }
            SyntaxKind::For { init, cond, next, stmt } => {
                let init = self.lower_for_init(init.as_deref(), scope);
                let cond = self.lower_opt_expr(cond.as_deref(), scope);
                let next = self.lower_opt_expr(next.as_deref(), scope);
                let body = self.lower_stmt(stmt, scope);
                NodeKind::For(ForStmt {
                    init: init?,
                    cond: cond?.map(Box::new),
                    next: next?.map(Box::new),
                    body: Box::new(body?),
                })
            }
            SyntaxKind::Switch { cond, stmt } => {
                let cond = self.lower_expr(cond, scope);
                let arms = self.lower_switch_body(stmt, scope);
                NodeKind::Switch {
                    cond: Box::new(cond?),
                    arms: arms?,
                }
            }
            SyntaxKind::Return { expr } => NodeKind::Return(self.lower_opt_expr(expr.as_deref(), scope)?.map(Box::new)),
            SyntaxKind::Break => NodeKind::Break,
            SyntaxKind::Continue => NodeKind::Continue,
            SyntaxKind::Goto { name } => NodeKind::Goto(name.clone()),
            SyntaxKind::Label { name, stmt } => NodeKind::Label {
                name: name.clone(),
                stmt: Box::new(self.lower_stmt(stmt, scope)?),
            },
            SyntaxKind::EmptyStatement => NodeKind::Block(Vec::new()),
            _ => return Err(self.malformed("statement", "statement lowering", loc)),
        };
        Ok(Node::new(kind, loc))
    }

    fn lower_for_init(&mut self, init: Option<&SyntaxNode>, scope: u32) -> Result<Vec<Node>, Failed> {
        let Some(init) = init else {
            return Ok(Vec::new());
        };
        let loc = init.location();
        match self.project(init, scope)? {
            Projected::Node(n) => Ok(vec![n]),
            Projected::List(ns) => Ok(ns),
            Projected::Absent => Ok(Vec::new()),
            _ => Err(self.malformed("expression or declaration", "for-loop initializer", loc)),
        }
    }

    /// Arms of a switch, in source order. The body is either a compound
    /// statement whose items are arms or a single `case`/`default`.
    fn lower_switch_body(&mut self, body: &SyntaxNode, scope: u32) -> Result<Vec<SwitchArm>, Failed> {
        let items: &[SyntaxNode] = match &body.kind {
            SyntaxKind::Compound { block_items } => block_items.as_deref().unwrap_or(&[]),
            _ => std::slice::from_ref(body),
        };
        debug!("projecting switch with {} arm candidates", items.len());
        self.lower_all(items, |ctx, item| match &item.kind {
            SyntaxKind::Case { .. } | SyntaxKind::Default { .. } => match ctx.project(item, scope + 1)? {
                Projected::Arm(arm) => Ok(arm),
                _ => Err(ctx.malformed("switch arm", "switch body", item.location())),
            },
            _ => Err(ctx.report_error(ProjectionError::not_yet_implemented(
                "statement outside a case arm",
                item.location(),
            ))),
        })
    }
}
