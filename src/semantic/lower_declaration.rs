//! Declarations, declarators, function signatures and typedefs.
//!
//! Declarators are projected inside-out: the innermost specifier seeds a
//! [`TypeBuilder`], each enclosing pointer or array layer decorates it while
//! recursion unwinds, and the declaration that owns the chain attaches the
//! name last through [`TypeBuilder::finish`].

use log::debug;

use crate::ast::utils::{extract_identifier, is_bare_void};
use crate::ast::{SyntaxKind, SyntaxNode};
use crate::diagnostic::ProjectionError;
use crate::ir::{Function, Node, NodeKind, Param, Signature, VarDecl};
use crate::semantic::{Failed, LowerCtx, Projected, Projection};
use crate::source::SourceLocation;
use crate::types::{TypeBuilder, TypeQualifiers};

impl<'d> LowerCtx<'d> {
    pub(crate) fn lower_qualifiers(&mut self, quals: &[String], loc: &SourceLocation) -> Result<TypeQualifiers, Failed> {
        TypeQualifiers::from_keywords(quals).map_err(|qualifier| {
            self.report_error(ProjectionError::UnsupportedQualifier {
                qualifier,
                location: loc.clone(),
            })
        })
    }

    /// Project a declarator or specifier that must yield a type.
    pub(crate) fn lower_type(&mut self, node: &SyntaxNode, scope: u32) -> Result<TypeBuilder, Failed> {
        let loc = node.location();
        match self.project(node, scope)? {
            Projected::Type(builder) => Ok(builder),
            Projected::Definition(def) => Ok(def.ty),
            Projected::Signature(_) => Err(self.report_error(ProjectionError::not_yet_implemented("function type", loc))),
            _ => Err(self.malformed("type", "declarator", loc)),
        }
    }

    pub(crate) fn lower_decl(&mut self, node: &SyntaxNode, scope: u32) -> Projection {
        let loc = node.location();
        let SyntaxKind::Decl {
            name,
            quals,
            ty,
            init,
            bitsize,
            ..
        } = &node.kind
        else {
            return Err(self.malformed("declaration", "declaration lowering", loc));
        };
        if bitsize.is_some() {
            return Err(self.report_error(ProjectionError::not_yet_implemented("bit-field", loc)));
        }

        match &ty.kind {
            SyntaxKind::TypeDecl { .. } | SyntaxKind::PtrDecl { .. } | SyntaxKind::ArrayDecl { .. } => {
                let Some(var_name) = name.as_deref().or_else(|| extract_identifier(ty)) else {
                    return Err(self.malformed("declared name", "variable declaration", loc));
                };
                let qualifiers = self.lower_qualifiers(quals, &loc);
                let builder = self.lower_type(ty, scope);
                let init = init.as_deref().map(|i| self.lower_initializer(i, scope)).transpose();
                let (qualifiers, builder, init) = (qualifiers?, builder?, init?);

                let var = VarDecl {
                    name: var_name.to_string(),
                    ty: builder.add_qualifiers(qualifiers).finish(Some(var_name.to_string())),
                    init,
                };
                let kind = if scope == 0 {
                    debug!("global variable '{}': {}", var.name, var.ty);
                    NodeKind::GlobalVar(var)
                } else {
                    debug!("local variable '{}': {}", var.name, var.ty);
                    NodeKind::LocalVar(var)
                };
                Ok(Projected::Node(Node::new(kind, loc)))
            }
            SyntaxKind::FuncDecl { args, ty: ret } => {
                let signature = self.lower_signature(args.as_deref(), ret, scope, ty.location())?;
                debug!("function declaration '{}'", signature.name);
                Ok(Projected::Node(Node::new(
                    NodeKind::Function(Function::declaration(signature)),
                    loc,
                )))
            }
            _ => match self.project(ty, scope)? {
                // `struct S;` declares nothing
                Projected::Type(builder) if builder.members().is_empty() => Ok(Projected::Absent),
                Projected::Definition(def) => Ok(Projected::Node(def.into_node())),
                other => Ok(other),
            },
        }
    }

    pub(crate) fn lower_function_def(
        &mut self,
        decl: &SyntaxNode,
        param_decls: Option<&[SyntaxNode]>,
        body: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        if param_decls.is_some_and(|p| !p.is_empty()) {
            return Err(self.report_error(ProjectionError::not_yet_implemented(
                "K&R parameter declarations",
                loc,
            )));
        }
        let head = self.project(decl, scope);
        let body = self.lower_statement(body, scope);
        let (head, body) = (head?, body?);

        let function = match head {
            Projected::Node(Node {
                kind: NodeKind::Function(function),
                ..
            }) => function,
            _ => return Err(self.malformed("function declaration", "function definition", loc)),
        };
        let items = match body.kind {
            NodeKind::Block(items) => items,
            _ => return Err(self.malformed("compound statement", "function definition", loc)),
        };
        debug!("function '{}' with {} body item(s)", function.signature.name, items.len());
        Ok(Projected::Node(Node::new(NodeKind::Function(function.with_body(items)), loc)))
    }

    pub(crate) fn lower_signature(
        &mut self,
        args: Option<&SyntaxNode>,
        ret: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Result<Signature, Failed> {
        let Some(name) = extract_identifier(ret) else {
            return Err(self.malformed("function name", "function declarator", loc));
        };
        let return_type = self.lower_type(ret, scope);
        let params = match args {
            None => Ok(Vec::new()),
            Some(args) => match self.project(args, scope) {
                Ok(Projected::Params(params)) => Ok(params),
                Ok(_) => Err(self.malformed("parameter list", "function declarator", args.location())),
                Err(Failed) => Err(Failed),
            },
        };
        Ok(Signature {
            name: name.to_string(),
            return_type: return_type?.finish(None),
            params: params?,
        })
    }

    pub(crate) fn lower_params(&mut self, params: &[SyntaxNode], scope: u32) -> Result<Vec<Param>, Failed> {
        // f(void) takes nothing
        if let [only] = params {
            if is_bare_void(only) {
                return Ok(Vec::new());
            }
        }
        self.lower_all(params, |ctx, param| {
            let loc = param.location();
            match &param.kind {
                SyntaxKind::Decl {
                    name, quals, ty, ..
                } => {
                    let qualifiers = ctx.lower_qualifiers(quals, &loc);
                    let builder = ctx.lower_param_type(ty, scope);
                    let name = name.clone();
                    Ok(Param {
                        ty: builder?.add_qualifiers(qualifiers?).finish(name.clone()),
                        name,
                    })
                }
                SyntaxKind::Typename { quals, ty, .. } => {
                    let qualifiers = ctx.lower_qualifiers(quals, &loc);
                    let builder = ctx.lower_param_type(ty, scope);
                    Ok(Param {
                        name: None,
                        ty: builder?.add_qualifiers(qualifiers?).finish(None),
                    })
                }
                _ => {
                    ctx.project(param, scope)?;
                    Err(ctx.malformed("parameter declaration", "parameter list", loc))
                }
            }
        })
    }

    fn lower_param_type(&mut self, ty: &SyntaxNode, scope: u32) -> Result<TypeBuilder, Failed> {
        if let SyntaxKind::FuncDecl { .. } = ty.kind {
            return Err(self.report_error(ProjectionError::not_yet_implemented(
                "function parameter",
                ty.location(),
            )));
        }
        self.lower_type(ty, scope)
    }

    pub(crate) fn lower_type_decl(
        &mut self,
        quals: &[String],
        inner: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let qualifiers = self.lower_qualifiers(quals, &loc);
        let builder = self.lower_type(inner, scope);
        Ok(Projected::Type(builder?.add_qualifiers(qualifiers?)))
    }

    pub(crate) fn lower_ptr_decl(
        &mut self,
        quals: &[String],
        inner: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        if let SyntaxKind::FuncDecl { .. } = inner.kind {
            return Err(self.report_error(ProjectionError::not_yet_implemented("function pointer", loc)));
        }
        let qualifiers = self.lower_qualifiers(quals, &loc);
        let builder = self.lower_type(inner, scope);
        Ok(Projected::Type(builder?.add_qualifiers(qualifiers?).add_pointer_level(1)))
    }

    /// Array qualifiers (`int a[static const 3]`) are accepted but not applied.
    pub(crate) fn lower_array_decl(
        &mut self,
        inner: &SyntaxNode,
        dim: Option<&SyntaxNode>,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let builder = self.lower_type(inner, scope);
        let length = self.lower_opt_expr(dim, scope);
        let (builder, length) = (builder?, length?);
        match builder.set_array_length(length) {
            Ok(builder) => Ok(Projected::Type(builder)),
            Err(e) => {
                debug!("{}", e);
                Err(self.report_error(ProjectionError::not_yet_implemented(
                    "multi-dimensional array",
                    loc,
                )))
            }
        }
    }

    pub(crate) fn lower_typename(
        &mut self,
        quals: &[String],
        inner: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        let qualifiers = self.lower_qualifiers(quals, &loc);
        let builder = self.lower_type(inner, scope);
        Ok(Projected::Type(builder?.add_qualifiers(qualifiers?)))
    }

    /// `typedef struct {..} Name;` binds `Name` to the aggregate's type
    /// rather than to a wrapped definition.
    pub(crate) fn lower_typedef(
        &mut self,
        name: &str,
        quals: &[String],
        inner: &SyntaxNode,
        scope: u32,
        loc: SourceLocation,
    ) -> Projection {
        if let SyntaxKind::FuncDecl { .. } = inner.kind {
            return Err(self.report_error(ProjectionError::not_yet_implemented("function typedef", loc)));
        }
        let qualifiers = self.lower_qualifiers(quals, &loc);
        let builder = self.lower_type(inner, scope);
        let ty = builder?.finish(Some(name.to_string())).requalified(qualifiers?);
        debug!("typedef '{}' = {}", name, ty);
        Ok(Projected::Node(Node::new(
            NodeKind::Typedef {
                name: name.to_string(),
                ty,
            },
            loc,
        )))
    }
}
