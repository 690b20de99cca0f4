//! Uniform intermediate representation produced by the projection engine.
//!
//! The IR is a strictly owned tree: every child is held by exactly one parent
//! (`Box`/`Vec`), so no node can be shared between two parents. Nodes are
//! pure data; the rules that decide which node to build live in
//! [`crate::semantic`].

use serde::Serialize;

use crate::source::SourceLocation;
use crate::types::Type;

pub mod dumper;

/// One IR node together with the location it was projected from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    // --- Top Level ---
    Program(Vec<Node>),

    // --- Declarations ---
    GlobalVar(VarDecl),
    LocalVar(VarDecl),
    Function(Function),
    StructDef { tag: Option<String>, ty: Type },
    EnumDef { tag: Option<String>, ty: Type },
    Typedef { name: String, ty: Type },

    // --- Statements ---
    Block(Vec<Node>),
    If { cond: Box<Node>, then: Box<Node> },
    IfElse { cond: Box<Node>, then: Box<Node>, otherwise: Box<Node> },
    While { cond: Box<Node>, body: Box<Node> },
    DoWhile { body: Box<Node>, cond: Box<Node> },
    For(ForStmt),
    Switch { cond: Box<Node>, arms: Vec<SwitchArm> },
    Break,
    Continue,
    Return(Option<Box<Node>>),
    Goto(String),
    Label { name: String, stmt: Box<Node> },

    // --- Expressions ---
    Assign { target: Box<Node>, value: Box<Node> },
    Binary { op: BinaryOp, lhs: Box<Node>, rhs: Box<Node> },
    Unary { op: UnaryOp, operand: Box<Node> },
    Address(Box<Node>),
    Indirect(Box<Node>),
    SizeOf(SizeofArg),
    Ternary { cond: Box<Node>, then: Box<Node>, otherwise: Box<Node> },
    Call { callee: String, args: Vec<Node> },
    FieldAccess { base: Box<Node>, field: String },
    Cast { ty: Type, expr: Box<Node> },
    Sequence(Vec<Node>), // comma expression

    // --- Register / environment intrinsics ---
    Input(String),
    Output { name: String, value: Box<Node> },
    ReadReg(Box<Node>),
    WriteReg { register: Box<Node>, value: Box<Node> },
    Math { func: MathIntrinsic, args: Vec<Node> },
    /// Inline machine instruction with an immediate and operand list.
    Raw {
        ty: Type,
        opcode: String,
        immediate: i64,
        args: Vec<Node>,
    },

    // --- Literals (textual value carried through) ---
    Int(String),
    UInt(String),
    Float(String),
    Str(String),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub init: Option<Initializer>,
}

/// A function declaration or definition.
///
/// The signature is projected first; a definition attaches its body
/// afterwards through [`Function::with_body`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub signature: Signature,
    pub body: Option<Vec<Node>>,
}

impl Function {
    pub fn declaration(signature: Signature) -> Self {
        Function { signature, body: None }
    }

    pub fn with_body(self, body: Vec<Node>) -> Self {
        Function {
            signature: self.signature,
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: Option<String>,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStmt {
    /// Empty, one expression, or the declarations of a `for (int i = ...;`.
    pub init: Vec<Node>,
    pub cond: Option<Box<Node>>,
    pub next: Option<Box<Node>>,
    pub body: Box<Node>,
}

/// One `case`/`default` arm; fall-through is implied by arm order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchArm {
    /// `None` for `default`.
    pub value: Option<Node>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Initializer {
    Expr(Box<Node>),
    List(Vec<Initializer>),
}

impl Initializer {
    /// Elements of a flat list of expressions, e.g. an expanded string.
    pub fn as_flat_list(&self) -> Option<Vec<&Node>> {
        match self {
            Initializer::Expr(_) => None,
            Initializer::List(items) => items
                .iter()
                .map(|i| match i {
                    Initializer::Expr(node) => Some(node.as_ref()),
                    Initializer::List(_) => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SizeofArg {
    Expr(Box<Node>),
    Type(Type),
}

// Binary Operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    LogicAnd,
    LogicOr,
}

impl BinaryOp {
    pub fn from_symbol(op: &str) -> Option<Self> {
        let op = match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "<<" => BinaryOp::LShift,
            ">>" => BinaryOp::RShift,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterEqual,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "&&" => BinaryOp::LogicAnd,
            "||" => BinaryOp::LogicOr,
            _ => return None,
        };
        Some(op)
    }

    /// Operator applied by a compound assignment (`+=` -> `Add`).
    pub fn from_compound_assignment(op: &str) -> Option<Self> {
        let op = match op {
            "+=" => BinaryOp::Add,
            "-=" => BinaryOp::Sub,
            "*=" => BinaryOp::Mul,
            "/=" => BinaryOp::Div,
            "%=" => BinaryOp::Mod,
            "<<=" => BinaryOp::LShift,
            ">>=" => BinaryOp::RShift,
            "&=" => BinaryOp::BitAnd,
            "|=" => BinaryOp::BitOr,
            "^=" => BinaryOp::BitXor,
            _ => return None,
        };
        Some(op)
    }
}

// Unary Operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Minus,
    LogicNot,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MathIntrinsic {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Pow,
    Root,
    Log,
}

impl MathIntrinsic {
    pub fn arity(self) -> usize {
        match self {
            MathIntrinsic::Atan2 | MathIntrinsic::Pow | MathIntrinsic::Root | MathIntrinsic::Log => 2,
            _ => 1,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Node { kind, location }
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node, location: SourceLocation) -> Self {
        Node::new(
            NodeKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            location,
        )
    }

    pub fn unary(op: UnaryOp, operand: Node, location: SourceLocation) -> Self {
        Node::new(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    pub fn assign(target: Node, value: Node, location: SourceLocation) -> Self {
        Node::new(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            location,
        )
    }

    pub fn int(value: impl ToString, location: SourceLocation) -> Self {
        Node::new(NodeKind::Int(value.to_string()), location)
    }

    /// Value of an integer literal node (decimal, octal or hex, suffix allowed).
    pub fn int_value(&self) -> Option<i64> {
        match &self.kind {
            NodeKind::Int(text) | NodeKind::UInt(text) => crate::ast::literal_parsing::parse_c11_integer_literal(text)
                .ok()
                .map(|(v, _)| v as i64),
            _ => None,
        }
    }
}
