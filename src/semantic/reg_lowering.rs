//! Register-DSL adapter: projects [`RegProgram`] trees into the shared IR.
//!
//! The DSL tree carries no positions, so every node gets the sentinel
//! location. Its grammar already separates globals from locals, so no scope
//! depth is threaded here.

use log::debug;

use crate::ast::reg::{RegBinaryMath, RegBinaryOp, RegDefinition, RegExpr, RegParam, RegProgram, RegStmt, RegType, RegUnaryMath};
use crate::ir::{BinaryOp, ForStmt, Function, Initializer, MathIntrinsic, Node, NodeKind, Param, Signature, UnaryOp, VarDecl};
use crate::semantic::{Failed, LowerCtx};
use crate::source::SourceLocation;
use crate::types::{Type, TypeBuilder};

fn here() -> SourceLocation {
    SourceLocation::sentinel()
}

fn reg_type(ty: RegType, name: Option<&str>) -> Type {
    TypeBuilder::new(ty.base_name()).finish(name.map(str::to_string))
}

/// Zero literal used for a declaration without an initializer.
fn zero_of(ty: RegType) -> Node {
    let kind = match ty {
        RegType::Int => NodeKind::Int("0".to_string()),
        RegType::Float => NodeKind::Float("0.0".to_string()),
        RegType::Uint => NodeKind::UInt("0".to_string()),
    };
    Node::new(kind, here())
}

impl RegBinaryOp {
    fn to_ir(self) -> BinaryOp {
        match self {
            RegBinaryOp::Add => BinaryOp::Add,
            RegBinaryOp::Sub => BinaryOp::Sub,
            RegBinaryOp::Mul => BinaryOp::Mul,
            RegBinaryOp::Div => BinaryOp::Div,
            RegBinaryOp::Less => BinaryOp::Less,
            RegBinaryOp::LessEqual => BinaryOp::LessEqual,
            RegBinaryOp::Greater => BinaryOp::Greater,
            RegBinaryOp::GreaterEqual => BinaryOp::GreaterEqual,
            RegBinaryOp::Equal => BinaryOp::Equal,
            RegBinaryOp::NotEqual => BinaryOp::NotEqual,
        }
    }
}

impl From<RegUnaryMath> for MathIntrinsic {
    fn from(func: RegUnaryMath) -> Self {
        match func {
            RegUnaryMath::Sin => MathIntrinsic::Sin,
            RegUnaryMath::Cos => MathIntrinsic::Cos,
            RegUnaryMath::Tan => MathIntrinsic::Tan,
            RegUnaryMath::Asin => MathIntrinsic::Asin,
            RegUnaryMath::Acos => MathIntrinsic::Acos,
            RegUnaryMath::Atan => MathIntrinsic::Atan,
        }
    }
}

impl From<RegBinaryMath> for MathIntrinsic {
    fn from(func: RegBinaryMath) -> Self {
        match func {
            RegBinaryMath::Atan2 => MathIntrinsic::Atan2,
            RegBinaryMath::Pow => MathIntrinsic::Pow,
            RegBinaryMath::Root => MathIntrinsic::Root,
            RegBinaryMath::Log => MathIntrinsic::Log,
        }
    }
}

impl<'d> LowerCtx<'d> {
    pub(crate) fn lower_reg_program(&mut self, program: &RegProgram) -> Result<Node, Failed> {
        debug!("projecting register program with {} definition(s)", program.definitions.len());
        let items = program.definitions.iter().map(|d| self.lower_reg_definition(d)).collect();
        Ok(Node::new(NodeKind::Program(items), here()))
    }

    fn lower_reg_definition(&mut self, def: &RegDefinition) -> Node {
        match def {
            RegDefinition::GlobalVar { name, ty, init } => Node::new(NodeKind::GlobalVar(self.lower_reg_var(name, *ty, init.as_ref())), here()),
            RegDefinition::Function {
                name,
                return_type,
                params,
                body,
            } => {
                let signature = Signature {
                    name: name.clone(),
                    return_type: reg_type(*return_type, None),
                    params: params.iter().map(lower_reg_param).collect(),
                };
                let body = body.iter().map(|s| self.lower_reg_stmt(s)).collect();
                debug!("register function '{}'", name);
                Node::new(NodeKind::Function(Function::declaration(signature).with_body(body)), here())
            }
        }
    }

    fn lower_reg_var(&mut self, name: &str, ty: RegType, init: Option<&RegExpr>) -> VarDecl {
        let value = match init {
            Some(expr) => self.lower_reg_expr(expr),
            None => zero_of(ty),
        };
        VarDecl {
            name: name.to_string(),
            ty: reg_type(ty, Some(name)),
            init: Some(Initializer::Expr(Box::new(value))),
        }
    }

    fn lower_reg_stmt(&mut self, stmt: &RegStmt) -> Node {
        let kind = match stmt {
            RegStmt::Expr { expr } => return self.lower_reg_expr(expr),
            RegStmt::Block { body } => NodeKind::Block(body.iter().map(|s| self.lower_reg_stmt(s)).collect()),
            RegStmt::LocalVar { name, ty, init } => NodeKind::LocalVar(self.lower_reg_var(name, *ty, init.as_ref())),
            RegStmt::Return { value } => NodeKind::Return(value.as_ref().map(|v| Box::new(self.lower_reg_expr(v)))),
            RegStmt::If { cond, then, otherwise } => {
                let cond = Box::new(self.lower_reg_expr(cond));
                let then = Box::new(self.lower_reg_stmt(then));
                match otherwise {
                    None => NodeKind::If { cond, then },
                    Some(otherwise) => NodeKind::IfElse {
                        cond,
                        then,
                        otherwise: Box::new(self.lower_reg_stmt(otherwise)),
                    },
                }
            }
            RegStmt::While { cond, body } => NodeKind::While {
                cond: Box::new(self.lower_reg_expr(cond)),
                body: Box::new(self.lower_reg_stmt(body)),
            },
            RegStmt::For { init, cond, next, body } => NodeKind::For(ForStmt {
                init: vec![self.lower_reg_expr(init)],
                cond: Some(Box::new(self.lower_reg_expr(cond))),
                next: Some(Box::new(self.lower_reg_expr(next))),
                body: Box::new(self.lower_reg_stmt(body)),
            }),
        };
        Node::new(kind, here())
    }

    fn lower_reg_expr(&mut self, expr: &RegExpr) -> Node {
        let kind = match expr {
            RegExpr::Symbol { name } => NodeKind::Symbol(name.clone()),
            RegExpr::NumberI { value } => NodeKind::Int(value.clone()),
            RegExpr::NumberF { value } => NodeKind::Float(value.clone()),
            RegExpr::NumberU { value } => NodeKind::UInt(value.clone()),
            RegExpr::Str { value } => NodeKind::Str(value.clone()),
            RegExpr::Assign { target, value } => {
                let target = Node::new(NodeKind::Symbol(target.clone()), here());
                return Node::assign(target, self.lower_reg_expr(value), here());
            }
            RegExpr::Not { operand } => return Node::unary(UnaryOp::LogicNot, self.lower_reg_expr(operand), here()),
            RegExpr::Increment { operand } => {
                return Node::unary(UnaryOp::PreIncrement, self.lower_reg_expr(operand), here());
            }
            RegExpr::Decrement { operand } => {
                return Node::unary(UnaryOp::PreDecrement, self.lower_reg_expr(operand), here());
            }
            RegExpr::Binary { op, lhs, rhs } => {
                let lhs = self.lower_reg_expr(lhs);
                let rhs = self.lower_reg_expr(rhs);
                return Node::binary(op.to_ir(), lhs, rhs, here());
            }
            RegExpr::Ternary { cond, then, otherwise } => NodeKind::Ternary {
                cond: Box::new(self.lower_reg_expr(cond)),
                then: Box::new(self.lower_reg_expr(then)),
                otherwise: Box::new(self.lower_reg_expr(otherwise)),
            },
            RegExpr::Call { callee, args } => NodeKind::Call {
                callee: callee.clone(),
                args: args.iter().map(|a| self.lower_reg_expr(a)).collect(),
            },
            RegExpr::Input { name } => NodeKind::Input(name.clone()),
            RegExpr::Output { name, value } => NodeKind::Output {
                name: name.clone(),
                value: Box::new(self.lower_reg_expr(value)),
            },
            RegExpr::ReadReg { register } => NodeKind::ReadReg(Box::new(self.lower_reg_expr(register))),
            RegExpr::WriteReg { register, value } => NodeKind::WriteReg {
                register: Box::new(self.lower_reg_expr(register)),
                value: Box::new(self.lower_reg_expr(value)),
            },
            RegExpr::UnaryMath { func, arg } => NodeKind::Math {
                func: (*func).into(),
                args: vec![self.lower_reg_expr(arg)],
            },
            RegExpr::BinaryMath { func, lhs, rhs } => NodeKind::Math {
                func: (*func).into(),
                args: vec![self.lower_reg_expr(lhs), self.lower_reg_expr(rhs)],
            },
        };
        Node::new(kind, here())
    }
}

fn lower_reg_param(param: &RegParam) -> Param {
    Param {
        name: Some(param.name.clone()),
        ty: reg_type(param.ty, Some(&param.name)),
    }
}
