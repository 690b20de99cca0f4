use log::debug;

use crate::ast::literal_parsing::{decode_char_constant, parse_c11_integer_literal};
use crate::ast::{SyntaxKind, SyntaxNode};
use crate::diagnostic::ProjectionError;
use crate::semantic::{Definition, Failed, LowerCtx, Projected, Projection};
use crate::source::SourceLocation;
use crate::types::{Member, StructuralHint, TypeBuilder};

impl<'d> LowerCtx<'d> {
    /// A struct without a member list is a forward reference; with one it is
    /// a definition whose type lists the fields in declaration order.
    pub(crate) fn lower_struct(
        &mut self,
        tag: Option<&str>,
        decls: Option<&[SyntaxNode]>,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let Some(decls) = decls else {
            let Some(tag) = tag else {
                return Err(self.malformed("struct tag", "struct reference", loc));
            };
            return Ok(Projected::Type(TypeBuilder::forward_reference(tag, StructuralHint::Struct)));
        };

        debug!("struct '{}' with {} member declaration(s)", tag.unwrap_or("<anon>"), decls.len());
        let members = self.lower_all(decls, |ctx, decl| ctx.lower_struct_member(decl, scope))?;
        let ty = members.into_iter().fold(TypeBuilder::new("struct"), TypeBuilder::add_member);
        Ok(Projected::Definition(Definition {
            hint: StructuralHint::Struct,
            tag: tag.map(str::to_string),
            ty,
            location: loc,
        }))
    }

    fn lower_struct_member(&mut self, decl: &SyntaxNode, scope: u32) -> Result<Member, Failed> {
        let loc = decl.location();
        let SyntaxKind::Decl {
            name,
            quals,
            ty,
            bitsize,
            ..
        } = &decl.kind
        else {
            return Err(self.malformed("member declaration", "struct body", loc));
        };
        if bitsize.is_some() {
            return Err(self.report_error(ProjectionError::not_yet_implemented("bit-field", loc)));
        }
        let qualifiers = self.lower_qualifiers(quals, &loc);
        let builder = self.lower_type(ty, scope);
        let field_ty = builder?.add_qualifiers(qualifiers?).finish(name.clone());
        Ok(Member::field(name.clone(), field_ty))
    }

    pub(crate) fn lower_enum(
        &mut self,
        tag: Option<&str>,
        values: Option<&SyntaxNode>,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let Some(values) = values else {
            let Some(tag) = tag else {
                return Err(self.malformed("enum tag", "enum reference", loc));
            };
            return Ok(Projected::Type(TypeBuilder::forward_reference(tag, StructuralHint::Enum)));
        };

        let ty = match self.project(values, scope)? {
            Projected::Type(builder) => builder,
            _ => return Err(self.malformed("enumerator list", "enum definition", values.location())),
        };
        Ok(Projected::Definition(Definition {
            hint: StructuralHint::Enum,
            tag: tag.map(str::to_string),
            ty,
            location: loc,
        }))
    }

    /// Implicit values continue from the previous one, starting at 0; an
    /// explicit value restarts the counter from itself.
    pub(crate) fn lower_enumerator_list(
        &mut self,
        enumerators: &[SyntaxNode],
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let entries = self.lower_all(enumerators, |ctx, e| match ctx.project(e, scope)? {
            Projected::Enumerator { name, value } => Ok((name, value)),
            _ => Err(ctx.malformed("enumerator", "enumerator list", loc.clone())),
        })?;

        let mut next = 0i64;
        let mut ty = TypeBuilder::new("enum");
        for (name, value) in entries {
            let value = value.unwrap_or(next);
            next = value.wrapping_add(1);
            ty = ty.add_member(Member::enumerator(name, value));
        }
        Ok(Projected::Type(ty))
    }

    pub(crate) fn lower_enumerator(&mut self, name: &str, value: Option<&SyntaxNode>, loc: SourceLocation) -> Projection {
        let value = match value {
            None => None,
            Some(expr) => match enumerator_value(expr) {
                Some(v) => Some(v),
                None => return Err(self.report_error(ProjectionError::EnumNotInteger { location: loc })),
            },
        };
        Ok(Projected::Enumerator {
            name: name.to_string(),
            value,
        })
    }
}

/// Integer or character constant, optionally under a unary sign.
fn enumerator_value(expr: &SyntaxNode) -> Option<i64> {
    match &expr.kind {
        SyntaxKind::Constant { ty, value } if ty == "char" => decode_char_constant(value).map(i64::from),
        SyntaxKind::Constant { ty, value } if is_integer_constant_type(ty) => {
            parse_c11_integer_literal(value).ok().map(|(v, _)| v as i64)
        }
        SyntaxKind::UnaryOp { op, expr } if op == "-" => enumerator_value(expr).map(i64::wrapping_neg),
        SyntaxKind::UnaryOp { op, expr } if op == "+" => enumerator_value(expr),
        _ => None,
    }
}

/// `int`, `unsigned long int`, ... as spelled by the parser's constant type.
pub(crate) fn is_integer_constant_type(ty: &str) -> bool {
    let mut words = ty.split_whitespace().peekable();
    words.peek().is_some() && words.all(|w| matches!(w, "int" | "long" | "short" | "unsigned" | "signed"))
}
