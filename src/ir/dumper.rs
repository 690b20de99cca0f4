//! IR Dumper module
//!
//! Renders an IR tree as indented text, one node per line.

use crate::ir::{Function, Initializer, Node, NodeKind, SizeofArg};
use crate::types::{MemberValue, Type};

/// Dumper for IR trees
pub struct IrDumper {
    lines: Vec<String>,
    depth: usize,
}

impl IrDumper {
    /// Dump a node and all its children.
    pub fn dump(node: &Node) -> String {
        let mut dumper = IrDumper {
            lines: Vec::new(),
            depth: 0,
        };
        dumper.node(node);
        dumper.lines.join("\n")
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), text.as_ref()));
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn children(&mut self, nodes: &[Node]) {
        self.nested(|d| nodes.iter().for_each(|n| d.node(n)));
    }

    fn section(&mut self, label: &str, nodes: &[&Node]) {
        self.nested(|d| {
            d.line(label);
            d.nested(|d| nodes.iter().for_each(|n| d.node(n)));
        });
    }

    fn initializer(&mut self, init: &Initializer) {
        match init {
            Initializer::Expr(node) => self.node(node),
            Initializer::List(items) => {
                self.line("InitList");
                self.nested(|d| items.iter().for_each(|i| d.initializer(i)));
            }
        }
    }

    fn members(&mut self, ty: &Type) {
        self.nested(|d| {
            for member in ty.members() {
                let name = member.name.as_deref().unwrap_or("<anon>");
                match &member.value {
                    MemberValue::Field(field_ty) => d.line(format!("Field {}: {}", name, field_ty)),
                    MemberValue::Enumerator(value) => d.line(format!("Enumerator {} = {}", name, value)),
                }
            }
        });
    }

    fn function(&mut self, func: &Function) {
        let sig = &func.signature;
        let params = sig
            .params
            .iter()
            .map(|p| match &p.name {
                Some(name) => format!("{} {}", p.ty, name),
                None => p.ty.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        match &func.body {
            None => self.line(format!("FunctionDecl {}({}) -> {}", sig.name, params, sig.return_type)),
            Some(body) => {
                self.line(format!("Function {}({}) -> {}", sig.name, params, sig.return_type));
                self.children(body);
            }
        }
    }

    fn node(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Program(items) => {
                self.line("Program");
                self.children(items);
            }
            NodeKind::GlobalVar(var) | NodeKind::LocalVar(var) => {
                let label = if matches!(node.kind, NodeKind::GlobalVar(_)) {
                    "GlobalVar"
                } else {
                    "LocalVar"
                };
                self.line(format!("{} {}: {}", label, var.name, var.ty));
                if let Some(init) = &var.init {
                    self.nested(|d| d.initializer(init));
                }
            }
            NodeKind::Function(func) => self.function(func),
            NodeKind::StructDef { tag, ty } => {
                self.line(format!("StructDef {}", tag.as_deref().unwrap_or("<anon>")));
                self.members(ty);
            }
            NodeKind::EnumDef { tag, ty } => {
                self.line(format!("EnumDef {}", tag.as_deref().unwrap_or("<anon>")));
                self.members(ty);
            }
            NodeKind::Typedef { name, ty } => self.line(format!("Typedef {}: {}", name, ty)),
            NodeKind::Block(items) => {
                self.line("Block");
                self.children(items);
            }
            NodeKind::If { cond, then } => {
                self.line("If");
                self.nested(|d| {
                    d.node(cond);
                    d.node(then);
                });
            }
            NodeKind::IfElse { cond, then, otherwise } | NodeKind::Ternary { cond, then, otherwise } => {
                let label = if matches!(node.kind, NodeKind::IfElse { .. }) {
                    "IfElse"
                } else {
                    "Ternary"
                };
                self.line(label);
                self.nested(|d| {
                    d.node(cond);
                    d.node(then);
                    d.node(otherwise);
                });
            }
            NodeKind::While { cond, body } => {
                self.line("While");
                self.nested(|d| {
                    d.node(cond);
                    d.node(body);
                });
            }
            NodeKind::DoWhile { body, cond } => {
                self.line("DoWhile");
                self.nested(|d| {
                    d.node(body);
                    d.node(cond);
                });
            }
            NodeKind::For(stmt) => {
                self.line("For");
                self.section("init", &stmt.init.iter().collect::<Vec<_>>());
                self.section("cond", &stmt.cond.iter().map(|n| n.as_ref()).collect::<Vec<_>>());
                self.section("next", &stmt.next.iter().map(|n| n.as_ref()).collect::<Vec<_>>());
                self.section("body", &[stmt.body.as_ref()]);
            }
            NodeKind::Switch { cond, arms } => {
                self.line("Switch");
                self.nested(|d| {
                    d.node(cond);
                    for arm in arms {
                        match &arm.value {
                            Some(value) => {
                                d.line("Case");
                                d.nested(|d| d.node(value));
                            }
                            None => d.line("Default"),
                        }
                        d.children(&arm.body);
                    }
                });
            }
            NodeKind::Break => self.line("Break"),
            NodeKind::Continue => self.line("Continue"),
            NodeKind::Return(value) => {
                self.line("Return");
                if let Some(value) = value {
                    self.nested(|d| d.node(value));
                }
            }
            NodeKind::Goto(label) => self.line(format!("Goto {}", label)),
            NodeKind::Label { name, stmt } => {
                self.line(format!("Label {}", name));
                self.nested(|d| d.node(stmt));
            }
            NodeKind::Assign { target, value } => {
                self.line("Assign");
                self.nested(|d| {
                    d.node(target);
                    d.node(value);
                });
            }
            NodeKind::Binary { op, lhs, rhs } => {
                self.line(format!("{:?}", op));
                self.nested(|d| {
                    d.node(lhs);
                    d.node(rhs);
                });
            }
            NodeKind::Unary { op, operand } => {
                self.line(format!("{:?}", op));
                self.nested(|d| d.node(operand));
            }
            NodeKind::Address(operand) => {
                self.line("Address");
                self.nested(|d| d.node(operand));
            }
            NodeKind::Indirect(operand) => {
                self.line("Indirect");
                self.nested(|d| d.node(operand));
            }
            NodeKind::SizeOf(arg) => match arg {
                SizeofArg::Expr(expr) => {
                    self.line("SizeOf");
                    self.nested(|d| d.node(expr));
                }
                SizeofArg::Type(ty) => self.line(format!("SizeOf {}", ty)),
            },
            NodeKind::Call { callee, args } => {
                self.line(format!("Call {}", callee));
                self.children(args);
            }
            NodeKind::FieldAccess { base, field } => {
                self.line(format!("FieldAccess .{}", field));
                self.nested(|d| d.node(base));
            }
            NodeKind::Cast { ty, expr } => {
                self.line(format!("Cast {}", ty));
                self.nested(|d| d.node(expr));
            }
            NodeKind::Sequence(items) => {
                self.line("Sequence");
                self.children(items);
            }
            NodeKind::Input(name) => self.line(format!("Input {}", name)),
            NodeKind::Output { name, value } => {
                self.line(format!("Output {}", name));
                self.nested(|d| d.node(value));
            }
            NodeKind::ReadReg(register) => {
                self.line("ReadReg");
                self.nested(|d| d.node(register));
            }
            NodeKind::WriteReg { register, value } => {
                self.line("WriteReg");
                self.nested(|d| {
                    d.node(register);
                    d.node(value);
                });
            }
            NodeKind::Math { func, args } => {
                self.line(format!("{:?}", func));
                self.children(args);
            }
            NodeKind::Raw {
                ty,
                opcode,
                immediate,
                args,
            } => {
                self.line(format!("Raw {} #{}: {}", opcode, immediate, ty));
                self.children(args);
            }
            NodeKind::Int(text) => self.line(format!("Int {}", text)),
            NodeKind::UInt(text) => self.line(format!("UInt {}", text)),
            NodeKind::Float(text) => self.line(format!("Float {}", text)),
            NodeKind::Str(text) => self.line(format!("Str {:?}", text)),
            NodeKind::Symbol(name) => self.line(format!("Symbol {}", name)),
        }
    }
}
