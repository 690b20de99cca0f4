//! Projection of front-end syntax trees into the uniform IR.
//!
//! The engine walks a tree once, depth-first and left to right, threading a
//! scope depth whose only use is the global/local split (zero vs nonzero).
//! Every projection returns a [`Projection`]:
//!
//! - `Ok(Projected::..)` carries whatever the construct produces: an IR node,
//!   a raw list, a type under construction, a function signature, a switch arm,
//!   or [`Projected::Absent`] when the construct legitimately yields nothing.
//! - `Err(Failed)` means a diagnostic has already been recorded and the
//!   enclosing construct must give up without recording another one.
//!
//! Containers with independent children project all of them before
//! propagating a failure, so one pass surfaces every independent diagnostic.

pub mod front_end;
pub mod lower;
pub mod lower_declaration;
pub mod lower_expression;
pub mod lower_initializer;
pub mod reg_lowering;
pub mod struct_lowering;

pub use front_end::{project_unit, CFrontEnd, FrontEnd, ProjectionOutput, RegFrontEnd};
pub use lower::LowerCtx;

use crate::ir::{Initializer, Node, NodeKind, Param, Signature, SwitchArm};
use crate::source::SourceLocation;
use crate::types::{StructuralHint, TypeBuilder};

/// Proof that a diagnostic was recorded for the failing construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

pub type Projection = Result<Projected, Failed>;

/// Result of projecting one syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Projected {
    Node(Node),
    /// Several nodes with no shape of their own (declaration lists).
    List(Vec<Node>),
    Type(TypeBuilder),
    Definition(Definition),
    Signature(Signature),
    Params(Vec<Param>),
    Arm(SwitchArm),
    Enumerator { name: String, value: Option<i64> },
    Initializer(Initializer),
    Absent,
}

impl Projected {
    pub fn category(&self) -> &'static str {
        match self {
            Projected::Node(_) => "node",
            Projected::List(_) => "list",
            Projected::Type(_) => "type",
            Projected::Definition(_) => "definition",
            Projected::Signature(_) => "signature",
            Projected::Params(_) => "parameter list",
            Projected::Arm(_) => "switch arm",
            Projected::Enumerator { .. } => "enumerator",
            Projected::Initializer(_) => "initializer",
            Projected::Absent => "nothing",
        }
    }
}

/// An aggregate or enumeration with a body.
///
/// Kept apart from a finished node so a declarator or typedef can take the
/// type out of it instead of wrapping the definition again.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub hint: StructuralHint,
    pub tag: Option<String>,
    pub ty: TypeBuilder,
    pub location: SourceLocation,
}

impl Definition {
    pub fn into_node(self) -> Node {
        let ty = self.ty.finish(None);
        let kind = match self.hint {
            StructuralHint::Struct => NodeKind::StructDef { tag: self.tag, ty },
            StructuralHint::Enum => NodeKind::EnumDef { tag: self.tag, ty },
        };
        Node::new(kind, self.location)
    }
}
