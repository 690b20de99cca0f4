use log::debug;

use crate::ast::literal_parsing::{decode_string_constant, parse_c11_integer_literal};
use crate::ast::{SyntaxKind, SyntaxNode};
use crate::diagnostic::ProjectionError;
use crate::ir::{BinaryOp, Node, NodeKind, SizeofArg, UnaryOp};
use crate::semantic::{Failed, LowerCtx};

impl<'d> LowerCtx<'d> {
    pub(crate) fn lower_expression(&mut self, node: &SyntaxNode, scope: u32) -> Result<Node, Failed> {
        let loc = node.location();
        let kind = match &node.kind {
            SyntaxKind::ID { name } => NodeKind::Symbol(name.clone()),
            SyntaxKind::BinaryOp { op, left, right } => {
                let Some(bin_op) = BinaryOp::from_symbol(op) else {
                    return Err(self.report_error(ProjectionError::UnsupportedOperator {
                        family: "binary",
                        op: op.clone(),
                        location: loc,
                    }));
                };
                let lhs = self.lower_expr(left, scope);
                let rhs = self.lower_expr(right, scope);
                return Ok(Node::binary(bin_op, lhs?, rhs?, loc));
            }
            SyntaxKind::UnaryOp { op, expr } => return self.lower_unary_op(op, expr, scope, node),
            SyntaxKind::Assignment { op, lvalue, rvalue } => {
                return self.lower_assignment(op, lvalue, rvalue, scope, node);
            }
            SyntaxKind::TernaryOp { cond, iftrue, iffalse } => {
                let cond = self.lower_expr(cond, scope);
                let then = self.lower_expr(iftrue, scope);
                let otherwise = self.lower_expr(iffalse, scope);
                NodeKind::Ternary {
                    cond: Box::new(cond?),
                    then: Box::new(then?),
                    otherwise: Box::new(otherwise?),
                }
            }
            SyntaxKind::Cast { to_type, expr } => {
                let ty = self.lower_type(to_type, scope);
                let expr = self.lower_expr(expr, scope);
                NodeKind::Cast {
                    ty: ty?.finish(None),
                    expr: Box::new(expr?),
                }
            }
            SyntaxKind::ArrayRef { name, subscript } => {
                // a[i] => *(a + i)
                let base = self.lower_expr(name, scope);
                let index = self.lower_expr(subscript, scope);
                let sum = Node::binary(BinaryOp::Add, base?, index?, loc.clone());
                NodeKind::Indirect(Box::new(sum))
            }
            SyntaxKind::FuncCall { name, args } => {
                let SyntaxKind::ID { name: callee } = &name.kind else {
                    return Err(self.report_error(ProjectionError::not_yet_implemented("indirect call", loc)));
                };
                let args = match args.as_deref() {
                    None => Vec::new(),
                    Some(SyntaxNode {
                        kind: SyntaxKind::ExprList { exprs },
                        ..
                    }) => self.lower_all(exprs, |ctx, e| ctx.lower_expr(e, scope))?,
                    Some(single) => vec![self.lower_expr(single, scope)?],
                };
                debug!("call to '{}' with {} argument(s)", callee, args.len());
                NodeKind::Call {
                    callee: callee.clone(),
                    args,
                }
            }
            SyntaxKind::StructRef { name, marker, field } => {
                return self.lower_field_access(name, marker, field, scope, node);
            }
            SyntaxKind::ExprList { exprs } => NodeKind::Sequence(self.lower_all(exprs, |ctx, e| ctx.lower_expr(e, scope))?),
            SyntaxKind::Raw { ty, opc, arg, exprs } => {
                let ty = self.lower_type(ty, scope);
                let immediate = self.raw_immediate(arg);
                let args = self.lower_all(exprs, |ctx, e| ctx.lower_expr(e, scope));
                NodeKind::Raw {
                    ty: ty?.finish(None),
                    opcode: decode_string_constant(opc).unwrap_or_else(|| opc.clone()),
                    immediate: immediate?,
                    args: args?,
                }
            }
            _ => return Err(self.malformed("expression", "expression lowering", loc)),
        };
        Ok(Node::new(kind, loc))
    }

    fn lower_unary_op(&mut self, op: &str, operand: &SyntaxNode, scope: u32, node: &SyntaxNode) -> Result<Node, Failed> {
        let loc = node.location();
        let kind = match op {
            "+" => return self.lower_expr(operand, scope),
            "*" => NodeKind::Indirect(Box::new(self.lower_expr(operand, scope)?)),
            "&" => NodeKind::Address(Box::new(self.lower_expr(operand, scope)?)),
            "sizeof" => match &operand.kind {
                SyntaxKind::Typename { .. } => NodeKind::SizeOf(SizeofArg::Type(self.lower_type(operand, scope)?.finish(None))),
                _ => NodeKind::SizeOf(SizeofArg::Expr(Box::new(self.lower_expr(operand, scope)?))),
            },
            _ => {
                let unary_op = match op {
                    "-" => UnaryOp::Minus,
                    "!" => UnaryOp::LogicNot,
                    "~" => UnaryOp::BitNot,
                    "++" => UnaryOp::PreIncrement,
                    "--" => UnaryOp::PreDecrement,
                    "p++" => UnaryOp::PostIncrement,
                    "p--" => UnaryOp::PostDecrement,
                    _ => {
                        return Err(self.report_error(ProjectionError::UnsupportedOperator {
                            family: "unary",
                            op: op.to_string(),
                            location: loc,
                        }))
                    }
                };
                return Ok(Node::unary(unary_op, self.lower_expr(operand, scope)?, loc));
            }
        };
        Ok(Node::new(kind, loc))
    }

    /// `x op= y` becomes `x = x op y`; the target is projected once and cloned
    /// into the operand position.
    fn lower_assignment(
        &mut self,
        op: &str,
        lvalue: &SyntaxNode,
        rvalue: &SyntaxNode,
        scope: u32,
        node: &SyntaxNode,
    ) -> Result<Node, Failed> {
        let loc = node.location();
        let compound = if op == "=" {
            None
        } else {
            match BinaryOp::from_compound_assignment(op) {
                Some(bin_op) => Some(bin_op),
                None => {
                    return Err(self.report_error(ProjectionError::UnsupportedAssignment {
                        op: op.to_string(),
                        location: loc,
                    }))
                }
            }
        };
        let target = self.lower_expr(lvalue, scope);
        let value = self.lower_expr(rvalue, scope);
        let (target, value) = (target?, value?);
        let value = match compound {
            Some(bin_op) => Node::binary(bin_op, target.clone(), value, loc.clone()),
            None => value,
        };
        Ok(Node::assign(target, value, loc))
    }

    /// `s.f` => `*(&s).f` and `p->f` => `*(p).f`: both notations share one
    /// indirection shape and differ only in the address-of around the base.
    fn lower_field_access(
        &mut self,
        base: &SyntaxNode,
        marker: &str,
        field: &SyntaxNode,
        scope: u32,
        node: &SyntaxNode,
    ) -> Result<Node, Failed> {
        let loc = node.location();
        if marker != "." && marker != "->" {
            return Err(self.report_error(ProjectionError::UnsupportedFieldAccess {
                marker: marker.to_string(),
                location: loc,
            }));
        }
        let SyntaxKind::ID { name: field_name } = &field.kind else {
            return Err(self.malformed("field name", "field access", field.location()));
        };
        let base = self.lower_expr(base, scope)?;
        let base = if marker == "." {
            Node::new(NodeKind::Address(Box::new(base)), loc.clone())
        } else {
            base
        };
        let access = Node::new(
            NodeKind::FieldAccess {
                base: Box::new(base),
                field: field_name.clone(),
            },
            loc.clone(),
        );
        Ok(Node::new(NodeKind::Indirect(Box::new(access)), loc))
    }

    fn raw_immediate(&mut self, arg: &SyntaxNode) -> Result<i64, Failed> {
        match &arg.kind {
            SyntaxKind::Constant { value, .. } => match parse_c11_integer_literal(value) {
                Ok((v, _)) => Ok(v as i64),
                Err(()) => Err(self.malformed("integer immediate", "raw instruction", arg.location())),
            },
            _ => Err(self.malformed("integer immediate", "raw instruction", arg.location())),
        }
    }
}
