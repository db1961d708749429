//! The high-level intermediate representation produced by the
//! [parser](crate::compiler::parser) and consumed by the
//! [typechecker](crate::compiler::typechecker) and
//! [codegen](crate::compiler::codegen)

use crate::compiler::common::token::{Token, TokenKind};
use std::fmt;

/// The root of the tree, a single translation unit
#[derive(Debug, PartialEq, Clone)]
pub struct SourceFile {
    pub package: Token,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Declaration>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ImportDecl {
    pub alias: Option<Token>,
    pub path: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Declaration {
    Function(FunctionDecl),
    Var(VarDecl),
    Type(TypeDecl),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Param {
    pub name: Token,
    pub type_expr: TypeExpr,
}

/// A `var` declaration, possibly grouped: `var ( x int; y string )`
#[derive(Debug, PartialEq, Clone)]
pub struct VarDecl {
    pub specs: Vec<VarSpec>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarSpec {
    pub names: Vec<Token>,
    pub type_expr: Option<TypeExpr>,
    pub init: Option<Vec<ExprKind>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TypeDecl {
    pub name: Token,
    pub type_expr: TypeExpr,
}

/// The syntactic form of a type as written in the source,
/// resolved to an actual type by the typechecker
#[derive(Debug, PartialEq, Clone)]
pub enum TypeExpr {
    Simple(Token),
    Struct { token: Token, fields: Vec<Param> },
    Array { token: Token, size: Token, elem: Box<TypeExpr> },
    Slice { token: Token, elem: Box<TypeExpr> },
}
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Simple(token) => match &token.kind {
                TokenKind::Ident(name) => write!(f, "{}", name),
                kind => write!(f, "{}", kind.to_string().trim_matches('\'')),
            },
            TypeExpr::Struct { fields, .. } => {
                let fields = fields
                    .iter()
                    .map(|field| format!("{} {}", field.name.unwrap_string(), field.type_expr))
                    .collect::<Vec<String>>()
                    .join("; ");
                write!(f, "struct {{ {} }}", fields)
            }
            TypeExpr::Array { size, elem, .. } => match &size.kind {
                TokenKind::Number(n) => write!(f, "[{}]{}", n, elem),
                _ => write!(f, "[?]{}", elem),
            },
            TypeExpr::Slice { elem, .. } => write!(f, "[]{}", elem),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Declaration(Declaration),
    Expr(ExprKind),
    ShortVarDecl {
        names: Vec<Token>,
        token: Token,
        values: Vec<ExprKind>,
    },
    Assign {
        targets: Vec<ExprKind>,
        token: Token,
        values: Vec<ExprKind>,
    },
    IncDec {
        expr: ExprKind,
        token: Token,
    },
    Block(Vec<Stmt>),
    If(Token, ExprKind, Box<Stmt>, Option<Box<Stmt>>),
    For(
        Token,
        Option<Box<Stmt>>,
        Option<ExprKind>,
        Option<Box<Stmt>>,
        Box<Stmt>,
    ),
    Switch(Token, ExprKind, Vec<CaseClause>),
    Break(Token),
    Continue(Token),
    Return(Token, Option<ExprKind>),
}

/// A single `case`/`default` arm of a switch, `value` is [None] for `default`
#[derive(Debug, PartialEq, Clone)]
pub struct CaseClause {
    pub token: Token,
    pub value: Option<ExprKind>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprKind {
    Binary {
        left: Box<ExprKind>,
        token: Token,
        right: Box<ExprKind>,
    },
    Comparison {
        left: Box<ExprKind>,
        token: Token,
        right: Box<ExprKind>,
    },
    Logical {
        left: Box<ExprKind>,
        token: Token,
        right: Box<ExprKind>,
    },
    Unary {
        token: Token,
        right: Box<ExprKind>,
    },
    Grouping {
        expr: Box<ExprKind>,
    },
    Call {
        left_paren: Token,
        callee: Box<ExprKind>,
        args: Vec<ExprKind>,
    },
    Selector {
        token: Token,
        expr: Box<ExprKind>,
        field: Token,
    },
    Index {
        token: Token,
        expr: Box<ExprKind>,
        index: Box<ExprKind>,
    },
    Slice {
        token: Token,
        expr: Box<ExprKind>,
        low: Option<Box<ExprKind>>,
        high: Option<Box<ExprKind>>,
    },
    TypeAssert {
        token: Token,
        expr: Box<ExprKind>,
        type_expr: TypeExpr,
    },
    CompositeLit {
        name: Token,
        token: Token,
        elems: Vec<ExprKind>,
    },
    Number(Token),
    Float(Token),
    String(Token),
    Bool(Token),
    Ident(Token),
}

pub trait PrintIndent {
    fn print_indent(&self, indent_level: usize) -> String;
}
impl PrintIndent for ExprKind {
    fn print_indent(&self, indent_level: usize) -> String {
        match self {
            ExprKind::Binary { left, token, right } => format!(
                "Binary: {}\n{}\n{}",
                token.kind,
                indent_fmt(left.as_ref(), indent_level + 1),
                indent_fmt(right.as_ref(), indent_level + 1)
            ),
            ExprKind::Comparison { left, token, right } => format!(
                "Comparison: {}\n{}\n{}",
                token.kind,
                indent_fmt(left.as_ref(), indent_level + 1),
                indent_fmt(right.as_ref(), indent_level + 1)
            ),
            ExprKind::Logical { left, token, right } => format!(
                "Logical: {}\n{}\n{}",
                token.kind,
                indent_fmt(left.as_ref(), indent_level + 1),
                indent_fmt(right.as_ref(), indent_level + 1)
            ),
            ExprKind::Unary { token, right } => format!(
                "Unary: {}\n{}",
                token.kind,
                indent_fmt(right.as_ref(), indent_level + 1)
            ),
            ExprKind::Grouping { expr } => {
                format!("Grouping:\n{}", indent_fmt(expr.as_ref(), indent_level + 1))
            }
            ExprKind::Call { callee, args, .. } => {
                let mut args: String = args
                    .iter()
                    .map(|arg| indent_fmt(arg, indent_level + 1))
                    .collect::<Vec<_>>()
                    .join("\n");
                if !args.is_empty() {
                    args.insert(0, '\n');
                }
                format!("Call:\n{}{}", indent_fmt(callee.as_ref(), indent_level + 1), args)
            }
            ExprKind::Selector { expr, field, .. } => format!(
                "Selector: '{}'\n{}",
                field.unwrap_string(),
                indent_fmt(expr.as_ref(), indent_level + 1)
            ),
            ExprKind::Index { expr, index, .. } => format!(
                "Index:\n{}\n{}",
                indent_fmt(expr.as_ref(), indent_level + 1),
                indent_fmt(index.as_ref(), indent_level + 1)
            ),
            ExprKind::Slice { expr, low, high, .. } => format!(
                "Slice:\n{}{}{}",
                indent_fmt(expr.as_ref(), indent_level + 1),
                display_option(low.as_ref().map(|e| e.as_ref()), indent_level + 1, true),
                display_option(high.as_ref().map(|e| e.as_ref()), indent_level + 1, true),
            ),
            ExprKind::TypeAssert { expr, type_expr, .. } => format!(
                "TypeAssert: '{}'\n{}",
                type_expr,
                indent_fmt(expr.as_ref(), indent_level + 1)
            ),
            ExprKind::CompositeLit { name, elems, .. } => {
                let mut elems: String = elems
                    .iter()
                    .map(|elem| indent_fmt(elem, indent_level + 1))
                    .collect::<Vec<_>>()
                    .join("\n");
                if !elems.is_empty() {
                    elems.insert(0, '\n');
                }
                format!("CompositeLit: '{}'{}", name.unwrap_string(), elems)
            }
            ExprKind::Number(token) => match token.kind {
                TokenKind::Number(n) => format!("Number: {}", n),
                _ => unreachable!("number literal always holds number token"),
            },
            ExprKind::Float(token) => match token.kind {
                TokenKind::FloatNum(n) => format!("Float: {}", n),
                _ => unreachable!("float literal always holds float token"),
            },
            ExprKind::String(token) => format!("String: '{}'", token.unwrap_string()),
            ExprKind::Bool(token) => {
                format!("Bool: {}", token.kind == TokenKind::True)
            }
            ExprKind::Ident(token) => format!("Ident: '{}'", token.unwrap_string()),
        }
    }
}
impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", indent_fmt(self, 0))
    }
}

impl PrintIndent for Stmt {
    fn print_indent(&self, indent_level: usize) -> String {
        match self {
            Stmt::Declaration(decl) => decl.print_indent(indent_level),
            Stmt::Expr(expr) => format!("Expr:\n{}", indent_fmt(expr, indent_level + 1)),
            Stmt::ShortVarDecl { names, values, .. } => {
                let names = names
                    .iter()
                    .map(|name| format!("'{}'", name.unwrap_string()))
                    .collect::<Vec<String>>()
                    .join(", ");
                let values = values
                    .iter()
                    .map(|value| indent_fmt(value, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("ShortVarDecl: {}\n{}", names, values)
            }
            Stmt::Assign { targets, values, .. } => {
                let targets = targets
                    .iter()
                    .map(|target| indent_fmt(target, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                let values = values
                    .iter()
                    .map(|value| indent_fmt(value, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("Assignment:\n{}\n{}", targets, values)
            }
            Stmt::IncDec { expr, token } => format!(
                "IncDec: {}\n{}",
                token.kind,
                indent_fmt(expr, indent_level + 1)
            ),
            Stmt::Block(body) => {
                let body = body
                    .iter()
                    .map(|s| indent_fmt(s, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("Block:\n{}", body)
            }
            Stmt::If(_, cond, then, else_branch) => format!(
                "If:\n{}\n{}{}",
                indent_fmt(cond, indent_level + 1),
                indent_fmt(then.as_ref(), indent_level + 1),
                else_branch
                    .as_ref()
                    .map(|e| format!("\n{}", indent_fmt(e.as_ref(), indent_level + 1)))
                    .unwrap_or_default()
            ),
            Stmt::For(_, init, cond, post, body) => format!(
                "For:\n{}{}{}{}",
                display_option(init.as_ref().map(|t| t.as_ref()), indent_level + 1, true),
                display_option(cond.as_ref(), indent_level + 1, true),
                display_option(post.as_ref().map(|t| t.as_ref()), indent_level + 1, true),
                indent_fmt(body.as_ref(), indent_level + 1)
            ),
            Stmt::Switch(_, cond, cases) => {
                let cases = cases
                    .iter()
                    .map(|case| indent_fmt(case, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("Switch:\n{}\n{}", indent_fmt(cond, indent_level + 1), cases)
            }
            Stmt::Break(_) => "Break".to_string(),
            Stmt::Continue(_) => "Continue".to_string(),
            Stmt::Return(_, expr) => {
                let mut expr = display_option(expr.as_ref(), indent_level + 1, false);
                if !expr.is_empty() {
                    expr.insert_str(0, ":\n");
                }
                format!("Return{}", expr)
            }
        }
    }
}
impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", indent_fmt(self, 0))
    }
}

impl PrintIndent for CaseClause {
    fn print_indent(&self, indent_level: usize) -> String {
        let body = self
            .body
            .iter()
            .map(|s| indent_fmt(s, indent_level + 1))
            .collect::<Vec<String>>()
            .join("\n");
        match &self.value {
            Some(value) => format!(
                "Case:\n{}\n{}",
                indent_fmt(value, indent_level + 1),
                body
            ),
            None => format!("Default:\n{}", body),
        }
    }
}

impl PrintIndent for Declaration {
    fn print_indent(&self, indent_level: usize) -> String {
        match self {
            Declaration::Function(func) => {
                let params = func
                    .params
                    .iter()
                    .map(|param| format!("{} {}", param.name.unwrap_string(), param.type_expr))
                    .collect::<Vec<String>>()
                    .join(", ");
                let body = func
                    .body
                    .iter()
                    .map(|s| indent_fmt(s, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!(
                    "Func: '{}' ({}){}\n{}",
                    func.name.unwrap_string(),
                    params,
                    func.return_type
                        .as_ref()
                        .map(|ty| format!(" {}", ty))
                        .unwrap_or_default(),
                    body
                )
            }
            Declaration::Var(var) => {
                let specs = var
                    .specs
                    .iter()
                    .map(|spec| indent_fmt(spec, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("VarDecl:\n{}", specs)
            }
            Declaration::Type(type_decl) => format!(
                "TypeDecl: '{}' = {}",
                type_decl.name.unwrap_string(),
                type_decl.type_expr
            ),
        }
    }
}

impl PrintIndent for VarSpec {
    fn print_indent(&self, indent_level: usize) -> String {
        let names = self
            .names
            .iter()
            .map(|name| format!("'{}'", name.unwrap_string()))
            .collect::<Vec<String>>()
            .join(", ");
        let ty = self
            .type_expr
            .as_ref()
            .map(|ty| format!(" {}", ty))
            .unwrap_or_default();
        let init = match &self.init {
            Some(values) => {
                let values = values
                    .iter()
                    .map(|value| indent_fmt(value, indent_level + 1))
                    .collect::<Vec<String>>()
                    .join("\n");
                format!("\n{}", values)
            }
            None => "".to_string(),
        };
        format!("VarSpec: {}{}{}", names, ty, init)
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package: '{}'", self.package.unwrap_string())?;
        for import in &self.imports {
            writeln!(f, "Import: \"{}\"", import.path.unwrap_string())?;
        }
        for decl in &self.decls {
            writeln!(f, "{}", indent_fmt(decl, 0))?;
        }
        Ok(())
    }
}

fn display_option<T: PrintIndent>(
    object: Option<&T>,
    indent_level: usize,
    newline: bool,
) -> String {
    if let Some(object) = object {
        indent_fmt(object, indent_level) + if newline { "\n" } else { "" }
    } else {
        "".to_string()
    }
}

pub fn indent_fmt<T: PrintIndent>(object: &T, indent_level: usize) -> String {
    let indent = "-".repeat(indent_level);

    format!("{}{}", indent, object.print_indent(indent_level))
}
