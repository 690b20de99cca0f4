//! Declared-type algebra.
//!
//! C declarators read inside-out: the innermost type is built first and every
//! enclosing layer (pointer, array, qualifier) decorates it as projection
//! unwinds. Decoration happens on a [`TypeBuilder`], threaded by value through
//! the layers; [`TypeBuilder::finish`] is the single finalization step that
//! produces an immutable [`Type`].

use std::fmt;

use bitflags::bitflags;
use log::trace;
use serde::Serialize;

use crate::ir::{Node, NodeKind};

bitflags! {
    /// Type qualifiers (using bitflags for efficient storage)
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default)]
    pub struct TypeQualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
        const ATOMIC = 1 << 3; // C11 _Atomic
    }
}

impl TypeQualifiers {
    /// Map one qualifier keyword as spelled in the parse tree.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(TypeQualifiers::CONST),
            "volatile" => Some(TypeQualifiers::VOLATILE),
            "restrict" | "__restrict" => Some(TypeQualifiers::RESTRICT),
            "_Atomic" => Some(TypeQualifiers::ATOMIC),
            _ => None,
        }
    }

    /// Union of several keywords; the first unknown keyword is returned as the error.
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, String> {
        keywords.iter().try_fold(TypeQualifiers::empty(), |acc, kw| {
            TypeQualifiers::from_keyword(kw.as_ref())
                .map(|q| acc | q)
                .ok_or_else(|| kw.as_ref().to_string())
        })
    }

    pub fn keywords(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.contains(TypeQualifiers::CONST) {
            out.push("const");
        }
        if self.contains(TypeQualifiers::VOLATILE) {
            out.push("volatile");
        }
        if self.contains(TypeQualifiers::RESTRICT) {
            out.push("restrict");
        }
        if self.contains(TypeQualifiers::ATOMIC) {
            out.push("_Atomic");
        }
        out
    }
}

/// Marks a type as a reference to a named aggregate or enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StructuralHint {
    Struct,
    Enum,
}

impl StructuralHint {
    pub fn as_str(self) -> &'static str {
        match self {
            StructuralHint::Struct => "struct",
            StructuralHint::Enum => "enum",
        }
    }
}

/// Array bound attached by an array declarator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayBound {
    /// `None` for an incomplete array (`a[]`).
    pub length: Option<Box<Node>>,
    /// Pointer levels applied before the bound; they belong to the element type.
    pub element_pointer_depth: u32,
}

/// Which decoration was applied last, i.e. the outermost type constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Pointer,
    Array,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemberValue {
    Field(Type),
    Enumerator(i64),
}

/// One entry of an aggregate or enumeration, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub name: Option<String>,
    pub value: MemberValue,
}

impl Member {
    pub fn field(name: Option<String>, ty: Type) -> Self {
        Member {
            name,
            value: MemberValue::Field(ty),
        }
    }

    pub fn enumerator(name: impl Into<String>, value: i64) -> Self {
        Member {
            name: Some(name.into()),
            value: MemberValue::Enumerator(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("array length already set on '{base}'")]
    ArrayLengthAlreadySet { base: String },
}

/// A type under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBuilder {
    base: String,
    qualifiers: TypeQualifiers,
    pointer_depth: u32,
    array: Option<ArrayBound>,
    members: Vec<Member>,
    hint: Option<StructuralHint>,
}

impl TypeBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        TypeBuilder {
            base: base.into(),
            qualifiers: TypeQualifiers::empty(),
            pointer_depth: 0,
            array: None,
            members: Vec::new(),
            hint: None,
        }
    }

    /// A bodiless `struct Tag` / `enum Tag` reference.
    pub fn forward_reference(tag: impl Into<String>, hint: StructuralHint) -> Self {
        TypeBuilder::new(tag).set_structural_hint(hint)
    }

    pub fn add_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.qualifiers |= qualifiers;
        self
    }

    pub fn add_pointer_level(mut self, n: u32) -> Self {
        trace!("pointer level +{} on '{}'", n, self.base);
        self.pointer_depth += n;
        self
    }

    /// Attach the array bound. A second bound on the same type is rejected.
    pub fn set_array_length(mut self, length: Option<Node>) -> Result<Self, TypeError> {
        if self.array.is_some() {
            return Err(TypeError::ArrayLengthAlreadySet { base: self.base });
        }
        trace!("array bound on '{}' after {} pointer level(s)", self.base, self.pointer_depth);
        self.array = Some(ArrayBound {
            length: length.map(Box::new),
            element_pointer_depth: self.pointer_depth,
        });
        Ok(self)
    }

    pub fn set_structural_hint(mut self, hint: StructuralHint) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn add_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Attach the declared name (if any) and freeze the type.
    pub fn finish(self, name: Option<String>) -> Type {
        Type {
            base: self.base,
            qualifiers: self.qualifiers,
            pointer_depth: self.pointer_depth,
            array: self.array,
            members: self.members,
            name,
            hint: self.hint,
        }
    }
}

/// A finalized declared type. Only qualifiers may still be merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    base: String,
    qualifiers: TypeQualifiers,
    pointer_depth: u32,
    array: Option<ArrayBound>,
    members: Vec<Member>,
    name: Option<String>,
    hint: Option<StructuralHint>,
}

impl Type {
    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn qualifiers(&self) -> TypeQualifiers {
        self.qualifiers
    }

    pub fn pointer_depth(&self) -> u32 {
        self.pointer_depth
    }

    pub fn array(&self) -> Option<&ArrayBound> {
        self.array.as_ref()
    }

    pub fn array_length(&self) -> Option<&Node> {
        self.array.as_ref().and_then(|a| a.length.as_deref())
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn hint(&self) -> Option<StructuralHint> {
        self.hint
    }

    pub fn is_forward_reference(&self) -> bool {
        self.hint.is_some() && self.members.is_empty()
    }

    /// The decoration applied last while unwinding the declarator.
    pub fn outermost(&self) -> Option<Decoration> {
        match &self.array {
            Some(bound) if self.pointer_depth > bound.element_pointer_depth => Some(Decoration::Pointer),
            Some(_) => Some(Decoration::Array),
            None if self.pointer_depth > 0 => Some(Decoration::Pointer),
            None => None,
        }
    }

    /// Value of a named enumerator, if this is an enumeration type.
    pub fn enumerator(&self, name: &str) -> Option<i64> {
        self.members.iter().find_map(|m| match (&m.name, &m.value) {
            (Some(n), MemberValue::Enumerator(v)) if n == name => Some(*v),
            _ => None,
        })
    }

    /// Merge further qualifiers into an already finalized type (typedef binding).
    pub fn requalified(mut self, qualifiers: TypeQualifiers) -> Type {
        self.qualifiers |= qualifiers;
        self
    }
}

fn fmt_bound(f: &mut fmt::Formatter<'_>, bound: &ArrayBound) -> fmt::Result {
    match bound.length.as_deref().map(|n| &n.kind) {
        None => write!(f, "[]"),
        Some(NodeKind::Int(text)) => write!(f, "[{}]", text),
        Some(NodeKind::Symbol(name)) => write!(f, "[{}]", name),
        Some(_) => write!(f, "[expr]"),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kw in self.qualifiers.keywords() {
            write!(f, "{} ", kw)?;
        }
        match self.hint {
            Some(hint) => write!(f, "{} {}", hint.as_str(), self.base)?,
            None => write!(f, "{}", self.base)?,
        }
        match &self.array {
            None => {
                for _ in 0..self.pointer_depth {
                    write!(f, "*")?;
                }
            }
            Some(bound) => {
                for _ in 0..bound.element_pointer_depth {
                    write!(f, "*")?;
                }
                let outer = self.pointer_depth - bound.element_pointer_depth;
                if outer > 0 {
                    write!(f, " (")?;
                    for _ in 0..outer {
                        write!(f, "*")?;
                    }
                    write!(f, ")")?;
                }
                fmt_bound(f, bound)?;
            }
        }
        Ok(())
    }
}
