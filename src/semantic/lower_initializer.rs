//! Constants and declaration initializers.

use log::debug;

use crate::ast::literal_parsing::{decode_char_constant, decode_string_constant};
use crate::ast::SyntaxNode;
use crate::diagnostic::ProjectionError;
use crate::ir::{Initializer, Node, NodeKind};
use crate::semantic::struct_lowering::is_integer_constant_type;
use crate::semantic::{Failed, LowerCtx, Projected};
use crate::source::SourceLocation;

impl<'d> LowerCtx<'d> {
    /// Integer and float spellings pass through unchanged; character
    /// constants become their codepoint; strings lose their quotes.
    pub(crate) fn lower_constant(&mut self, ty: &str, value: &str, loc: SourceLocation) -> Result<Node, Failed> {
        let kind = if ty == "char" {
            decode_char_constant(value).map(|cp| NodeKind::Int(cp.to_string()))
        } else if ty == "string" {
            decode_string_constant(value).map(NodeKind::Str)
        } else if ty.contains("float") || ty.contains("double") {
            Some(NodeKind::Float(value.to_string()))
        } else if is_integer_constant_type(ty) {
            Some(NodeKind::Int(value.to_string()))
        } else {
            None
        };
        match kind {
            Some(kind) => Ok(Node::new(kind, loc)),
            None => Err(self.report_error(ProjectionError::UnsupportedConstant {
                ty: ty.to_string(),
                value: value.to_string(),
                location: loc,
            })),
        }
    }

    /// Initializer of a declaration. A string literal is expanded into its
    /// codepoints followed by a terminating zero.
    pub(crate) fn lower_initializer(&mut self, node: &SyntaxNode, scope: u32) -> Result<Initializer, Failed> {
        let loc = node.location();
        match self.project(node, scope)? {
            Projected::Initializer(init) => Ok(init),
            Projected::Node(Node {
                kind: NodeKind::Str(text),
                location,
            }) => {
                debug!("expanding string initializer of {} char(s)", text.chars().count());
                let items = text
                    .chars()
                    .map(|c| c as u32)
                    .chain(std::iter::once(0))
                    .map(|cp| Initializer::Expr(Box::new(Node::int(cp, location.clone()))))
                    .collect();
                Ok(Initializer::List(items))
            }
            Projected::Node(n) => Ok(Initializer::Expr(Box::new(n))),
            _ => Err(self.malformed("initializer", "declaration", loc)),
        }
    }

    /// Brace-enclosed list. Nested strings stay string nodes.
    pub(crate) fn lower_init_list(&mut self, exprs: &[SyntaxNode], scope: u32, loc: SourceLocation) -> Result<Initializer, Failed> {
        let items = self.lower_all(exprs, |ctx, e| match ctx.project(e, scope)? {
            Projected::Initializer(init) => Ok(init),
            Projected::Node(n) => Ok(Initializer::Expr(Box::new(n))),
            _ => Err(ctx.malformed("initializer", "initializer list", loc.clone())),
        })?;
        Ok(Initializer::List(items))
    }
}
