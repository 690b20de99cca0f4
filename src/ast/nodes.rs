//! Syntax-tree node definitions for the C front end.
//!
//! The tree is produced by an external grammar (pycparser's `c_ast` taxonomy)
//! and is assumed well-formed. The kind set is closed: every kind the
//! projection engine knows about is a variant here, and anything else the
//! front end emits arrives as [`SyntaxKind::Unlisted`].

use serde::{Deserialize, Deserializer};
use thin_vec::ThinVec;

use crate::source::SourceLocation;

/// A syntax-tree node with its optional position.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub coord: Option<SourceLocation>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, coord: Option<SourceLocation>) -> Self {
        SyntaxNode { kind, coord }
    }

    /// Location of this node, or the sentinel when it has no position.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::from_coord(self.coord.as_ref())
    }
}

type Child = Box<SyntaxNode>;
type Children = ThinVec<SyntaxNode>;

/// pycparser writes an empty child list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The core enum defining every syntax-tree kind of the C front end.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_nodetype")]
pub enum SyntaxKind {
    // --- Declarators & type specifiers ---
    ArrayDecl {
        #[serde(rename = "type")]
        ty: Child,
        dim: Option<Child>,
        #[serde(default)]
        dim_quals: Vec<String>,
    },
    PtrDecl {
        #[serde(default)]
        quals: Vec<String>,
        #[serde(rename = "type")]
        ty: Child,
    },
    FuncDecl {
        args: Option<Child>,
        #[serde(rename = "type")]
        ty: Child,
    },
    TypeDecl {
        declname: Option<String>,
        #[serde(default)]
        quals: Vec<String>,
        #[serde(rename = "type")]
        ty: Child,
    },
    Typename {
        name: Option<String>,
        #[serde(default)]
        quals: Vec<String>,
        #[serde(rename = "type")]
        ty: Child,
    },
    IdentifierType {
        names: Vec<String>,
    },
    Struct {
        name: Option<String>,
        decls: Option<Children>,
    },
    Union {
        name: Option<String>,
        decls: Option<Children>,
    },
    Enum {
        name: Option<String>,
        values: Option<Child>,
    },
    Enumerator {
        name: String,
        value: Option<Child>,
    },
    EnumeratorList {
        #[serde(default, deserialize_with = "null_as_empty")]
        enumerators: Children,
    },
    ParamList {
        #[serde(default, deserialize_with = "null_as_empty")]
        params: Children,
    },
    EllipsisParam,

    // --- Declarations & Definitions ---
    Decl {
        name: Option<String>,
        #[serde(default)]
        quals: Vec<String>,
        #[serde(default)]
        storage: Vec<String>,
        #[serde(default)]
        funcspec: Vec<String>,
        #[serde(rename = "type")]
        ty: Child,
        init: Option<Child>,
        bitsize: Option<Child>,
    },
    DeclList {
        #[serde(default, deserialize_with = "null_as_empty")]
        decls: Children,
    },
    Typedef {
        name: String,
        #[serde(default)]
        quals: Vec<String>,
        #[serde(default)]
        storage: Vec<String>,
        #[serde(rename = "type")]
        ty: Child,
    },
    FuncDef {
        decl: Child,
        param_decls: Option<Children>,
        body: Child,
    },
    StaticAssert {
        cond: Child,
        message: Option<Child>,
    },
    Alignas {
        alignment: Child,
    },

    // --- Expressions ---
    ArrayRef {
        name: Child,
        subscript: Child,
    },
    Assignment {
        op: String,
        lvalue: Child,
        rvalue: Child,
    },
    BinaryOp {
        op: String,
        left: Child,
        right: Child,
    },
    UnaryOp {
        op: String,
        expr: Child,
    },
    TernaryOp {
        cond: Child,
        iftrue: Child,
        iffalse: Child,
    },
    Cast {
        to_type: Child,
        expr: Child,
    },
    FuncCall {
        name: Child,
        args: Option<Child>,
    },
    StructRef {
        name: Child,
        #[serde(rename = "type")]
        marker: String,
        field: Child,
    },
    ExprList {
        #[serde(default, deserialize_with = "null_as_empty")]
        exprs: Children,
    },
    InitList {
        #[serde(default, deserialize_with = "null_as_empty")]
        exprs: Children,
    },
    NamedInitializer {
        #[serde(default, deserialize_with = "null_as_empty")]
        name: Children,
        expr: Child,
    },
    CompoundLiteral {
        #[serde(rename = "type")]
        ty: Child,
        init: Child,
    },
    Constant {
        #[serde(rename = "type")]
        ty: String,
        value: String,
    },
    ID {
        name: String,
    },
    /// Inline machine instruction: `__raw(type, "opc", imm, operands...)`.
    Raw {
        #[serde(rename = "type")]
        ty: Child,
        opc: String,
        arg: Child,
        #[serde(default, deserialize_with = "null_as_empty")]
        exprs: Children,
    },

    // --- Statements ---
    Compound {
        block_items: Option<Children>,
    },
    If {
        cond: Child,
        iftrue: Child,
        iffalse: Option<Child>,
    },
    While {
        cond: Child,
        stmt: Child,
    },
    DoWhile {
        cond: Child,
        stmt: Child,
    },
    For {
        init: Option<Child>,
        cond: Option<Child>,
        next: Option<Child>,
        stmt: Child,
    },
    Switch {
        cond: Child,
        stmt: Child,
    },
    Case {
        expr: Child,
        #[serde(default, deserialize_with = "null_as_empty")]
        stmts: Children,
    },
    Default {
        #[serde(default, deserialize_with = "null_as_empty")]
        stmts: Children,
    },
    Return {
        expr: Option<Child>,
    },
    Break,
    Continue,
    Goto {
        name: String,
    },
    Label {
        name: String,
        stmt: Child,
    },
    EmptyStatement,
    Pragma {
        string: String,
    },

    // --- Top Level ---
    FileAST {
        #[serde(default, deserialize_with = "null_as_empty")]
        ext: Children,
    },

    /// A kind outside the taxonomy above, carried by name.
    #[serde(skip)]
    Unlisted { kind: String },
}

impl SyntaxKind {
    /// Tags accepted by the derived deserializer.
    pub const KNOWN_KINDS: &'static [&'static str] = &[
        "ArrayDecl",
        "PtrDecl",
        "FuncDecl",
        "TypeDecl",
        "Typename",
        "IdentifierType",
        "Struct",
        "Union",
        "Enum",
        "Enumerator",
        "EnumeratorList",
        "ParamList",
        "EllipsisParam",
        "Decl",
        "DeclList",
        "Typedef",
        "FuncDef",
        "StaticAssert",
        "Alignas",
        "ArrayRef",
        "Assignment",
        "BinaryOp",
        "UnaryOp",
        "TernaryOp",
        "Cast",
        "FuncCall",
        "StructRef",
        "ExprList",
        "InitList",
        "NamedInitializer",
        "CompoundLiteral",
        "Constant",
        "ID",
        "Raw",
        "Compound",
        "If",
        "While",
        "DoWhile",
        "For",
        "Switch",
        "Case",
        "Default",
        "Return",
        "Break",
        "Continue",
        "Goto",
        "Label",
        "EmptyStatement",
        "Pragma",
        "FileAST",
    ];

    /// The pycparser class name of this kind.
    pub fn name(&self) -> &str {
        match self {
            SyntaxKind::ArrayDecl { .. } => "ArrayDecl",
            SyntaxKind::PtrDecl { .. } => "PtrDecl",
            SyntaxKind::FuncDecl { .. } => "FuncDecl",
            SyntaxKind::TypeDecl { .. } => "TypeDecl",
            SyntaxKind::Typename { .. } => "Typename",
            SyntaxKind::IdentifierType { .. } => "IdentifierType",
            SyntaxKind::Struct { .. } => "Struct",
            SyntaxKind::Union { .. } => "Union",
            SyntaxKind::Enum { .. } => "Enum",
            SyntaxKind::Enumerator { .. } => "Enumerator",
            SyntaxKind::EnumeratorList { .. } => "EnumeratorList",
            SyntaxKind::ParamList { .. } => "ParamList",
            SyntaxKind::EllipsisParam => "EllipsisParam",
            SyntaxKind::Decl { .. } => "Decl",
            SyntaxKind::DeclList { .. } => "DeclList",
            SyntaxKind::Typedef { .. } => "Typedef",
            SyntaxKind::FuncDef { .. } => "FuncDef",
            SyntaxKind::StaticAssert { .. } => "StaticAssert",
            SyntaxKind::Alignas { .. } => "Alignas",
            SyntaxKind::ArrayRef { .. } => "ArrayRef",
            SyntaxKind::Assignment { .. } => "Assignment",
            SyntaxKind::BinaryOp { .. } => "BinaryOp",
            SyntaxKind::UnaryOp { .. } => "UnaryOp",
            SyntaxKind::TernaryOp { .. } => "TernaryOp",
            SyntaxKind::Cast { .. } => "Cast",
            SyntaxKind::FuncCall { .. } => "FuncCall",
            SyntaxKind::StructRef { .. } => "StructRef",
            SyntaxKind::ExprList { .. } => "ExprList",
            SyntaxKind::InitList { .. } => "InitList",
            SyntaxKind::NamedInitializer { .. } => "NamedInitializer",
            SyntaxKind::CompoundLiteral { .. } => "CompoundLiteral",
            SyntaxKind::Constant { .. } => "Constant",
            SyntaxKind::ID { .. } => "ID",
            SyntaxKind::Raw { .. } => "Raw",
            SyntaxKind::Compound { .. } => "Compound",
            SyntaxKind::If { .. } => "If",
            SyntaxKind::While { .. } => "While",
            SyntaxKind::DoWhile { .. } => "DoWhile",
            SyntaxKind::For { .. } => "For",
            SyntaxKind::Switch { .. } => "Switch",
            SyntaxKind::Case { .. } => "Case",
            SyntaxKind::Default { .. } => "Default",
            SyntaxKind::Return { .. } => "Return",
            SyntaxKind::Break => "Break",
            SyntaxKind::Continue => "Continue",
            SyntaxKind::Goto { .. } => "Goto",
            SyntaxKind::Label { .. } => "Label",
            SyntaxKind::EmptyStatement => "EmptyStatement",
            SyntaxKind::Pragma { .. } => "Pragma",
            SyntaxKind::FileAST { .. } => "FileAST",
            SyntaxKind::Unlisted { kind } => kind,
        }
    }
}
