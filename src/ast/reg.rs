//! Syntax tree of the register DSL front end.
//!
//! The DSL has three scalar types, C-like statements and a fixed set of
//! environment and math intrinsics. Intrinsic arity is encoded in the variant
//! shape, so a two-argument intrinsic cannot be built with one argument.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegType {
    Int,
    Float,
    Uint,
}

impl RegType {
    pub fn base_name(self) -> &'static str {
        match self {
            RegType::Int => "int",
            RegType::Float => "float",
            RegType::Uint => "uint",
        }
    }
}

/// Whole translation unit: an ordered list of external definitions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegProgram {
    pub definitions: Vec<RegDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegDefinition {
    GlobalVar {
        name: String,
        #[serde(rename = "type")]
        ty: RegType,
        init: Option<RegExpr>,
    },
    Function {
        name: String,
        return_type: RegType,
        #[serde(default)]
        params: Vec<RegParam>,
        body: Vec<RegStmt>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RegType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegStmt {
    Expr {
        expr: RegExpr,
    },
    Block {
        body: Vec<RegStmt>,
    },
    LocalVar {
        name: String,
        #[serde(rename = "type")]
        ty: RegType,
        init: Option<RegExpr>,
    },
    Return {
        value: Option<RegExpr>,
    },
    If {
        cond: RegExpr,
        then: Box<RegStmt>,
        otherwise: Option<Box<RegStmt>>,
    },
    While {
        cond: RegExpr,
        body: Box<RegStmt>,
    },
    For {
        init: RegExpr,
        cond: RegExpr,
        next: RegExpr,
        body: Box<RegStmt>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RegBinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegUnaryMath {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegBinaryMath {
    Atan2,
    Pow,
    Root,
    Log,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegExpr {
    Symbol {
        name: String,
    },
    NumberI {
        value: String,
    },
    NumberF {
        value: String,
    },
    NumberU {
        value: String,
    },
    Str {
        value: String,
    },
    /// `name = value`; the grammar only allows a plain symbol on the left.
    Assign {
        target: String,
        value: Box<RegExpr>,
    },
    Not {
        operand: Box<RegExpr>,
    },
    Binary {
        op: RegBinaryOp,
        lhs: Box<RegExpr>,
        rhs: Box<RegExpr>,
    },
    Increment {
        operand: Box<RegExpr>,
    },
    Decrement {
        operand: Box<RegExpr>,
    },
    Ternary {
        cond: Box<RegExpr>,
        then: Box<RegExpr>,
        otherwise: Box<RegExpr>,
    },
    Call {
        callee: String,
        #[serde(default)]
        args: Vec<RegExpr>,
    },
    Input {
        name: String,
    },
    Output {
        name: String,
        value: Box<RegExpr>,
    },
    ReadReg {
        register: Box<RegExpr>,
    },
    WriteReg {
        register: Box<RegExpr>,
        value: Box<RegExpr>,
    },
    UnaryMath {
        func: RegUnaryMath,
        arg: Box<RegExpr>,
    },
    BinaryMath {
        func: RegBinaryMath,
        lhs: Box<RegExpr>,
        rhs: Box<RegExpr>,
    },
}

pub fn load_reg_json(text: &str) -> Result<RegProgram, super::json::LoadError> {
    Ok(serde_json::from_str(text)?)
}
