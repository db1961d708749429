//! Checks the [parse-tree](crate::compiler::parser::hir) for semantic errors
//! and collects [warnings](Warning) for constructs which are accepted but
//! skipped during code generation.<br>
//! Aborts at the first hard error.

use crate::compiler::common::{environment::*, error::*, token::*, types::*};
use crate::compiler::parser::hir::*;
use std::collections::HashMap;

pub struct TypeChecker {
    /// Symbol-table for declared variables and functions
    env: Environment,

    /// User-declared type names, resolved nominally
    types: HashMap<String, Type>,

    warnings: Vec<Warning>,

    loop_depth: usize,
    switch_depth: usize,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            env: Environment::new(),
            types: HashMap::new(),
            warnings: Vec::new(),
            loop_depth: 0,
            switch_depth: 0,
        }
    }
    pub fn check(mut self, source_file: &SourceFile) -> Result<Vec<Warning>, Error> {
        for decl in &source_file.decls {
            self.declaration(decl)?;
        }
        Ok(self.warnings)
    }

    fn declaration(&mut self, decl: &Declaration) -> Result<(), Error> {
        match decl {
            Declaration::Function(func) => self.function_declaration(func),
            Declaration::Var(var) => {
                for spec in &var.specs {
                    self.var_spec(spec)?;
                }
                Ok(())
            }
            Declaration::Type(type_decl) => {
                let name = type_decl.name.unwrap_string();
                if self.types.contains_key(&name) {
                    return Err(Error::new(&type_decl.name, ErrorKind::Redefinition(name)));
                }
                let ty = self.resolve_type(&type_decl.type_expr)?;
                self.types.insert(name, ty);
                Ok(())
            }
        }
    }

    // the function name is visible inside its own body, allowing recursion
    fn function_declaration(&mut self, func: &FunctionDecl) -> Result<(), Error> {
        self.env.declare_symbol(&func.name, Type::Function)?;

        if let Some(return_type) = &func.return_type {
            self.resolve_type(return_type)?;
        }

        self.env.enter();
        for param in &func.params {
            let ty = self.resolve_type(&param.type_expr)?;
            self.env.declare_symbol(&param.name, ty)?;
        }
        for stmt in &func.body {
            self.statement(stmt)?;
        }
        self.env.exit();
        Ok(())
    }

    fn var_spec(&mut self, spec: &VarSpec) -> Result<(), Error> {
        match (&spec.type_expr, &spec.init) {
            (None, None) => {
                for name in &spec.names {
                    self.warn(name, WarningKind::UntypedVar(name.unwrap_string()));
                }
                Ok(())
            }
            (Some(type_expr), None) => {
                let ty = self.resolve_type(type_expr)?;
                for name in &spec.names {
                    self.env.declare_symbol(name, ty.clone())?;
                }
                Ok(())
            }
            (type_expr, Some(values)) => {
                if spec.names.len() != values.len() {
                    return Err(Error::new(
                        &spec.names[0],
                        ErrorKind::Regular("mismatched number of names and values in var declaration"),
                    ));
                }
                let declared = match type_expr {
                    Some(type_expr) => Some(self.resolve_type(type_expr)?),
                    None => None,
                };
                for (name, value) in spec.names.iter().zip(values) {
                    let value_ty = self.expr_type(value)?;
                    let ty = match &declared {
                        Some(declared) if *declared != value_ty => {
                            return Err(Error::new(
                                name,
                                ErrorKind::TypeMismatch(declared.clone(), value_ty),
                            ));
                        }
                        Some(declared) => declared.clone(),
                        None => value_ty,
                    };
                    self.env.declare_symbol(name, ty)?;
                }
                Ok(())
            }
        }
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Declaration(decl) => self.declaration(decl),
            Stmt::Expr(expr) => {
                self.expr_type(expr)?;
                Ok(())
            }
            Stmt::ShortVarDecl { names, token, values } => {
                if names.len() != 1 || values.len() != 1 {
                    self.warn(token, WarningKind::MultiShortVarDecl);
                    return Ok(());
                }
                let ty = self.expr_type(&values[0])?;
                self.env.declare_symbol(&names[0], ty)
            }
            Stmt::Assign { targets, token, values } => {
                if targets.len() != 1 || values.len() != 1 {
                    self.warn(token, WarningKind::MultiAssign);
                    return Ok(());
                }
                let target_ty = match &targets[0] {
                    ExprKind::Ident(name) => self.env.get_symbol(name)?.ty.clone(),
                    expr @ (ExprKind::Selector { .. } | ExprKind::Index { .. }) => {
                        self.expr_type(expr)?
                    }
                    _ => return Err(Error::new(token, ErrorKind::InvalidAssignTarget("'='"))),
                };
                let value_ty = self.expr_type(&values[0])?;
                if target_ty != value_ty {
                    return Err(Error::new(token, ErrorKind::TypeMismatch(target_ty, value_ty)));
                }
                Ok(())
            }
            Stmt::IncDec { expr, token } => {
                let ty = self.expr_type(expr)?;
                if ty != Type::Int {
                    return Err(Error::new(token, ErrorKind::InvalidIncrementType(ty)));
                }
                Ok(())
            }
            Stmt::Block(body) => {
                self.env.enter();
                for stmt in body {
                    self.statement(stmt)?;
                }
                self.env.exit();
                Ok(())
            }
            Stmt::If(token, cond, then, else_branch) => {
                let cond_ty = self.expr_type(cond)?;
                if cond_ty != Type::Bool {
                    self.warn(token, WarningKind::NonBoolCondition(cond_ty));
                }
                self.statement(then)?;
                if let Some(else_branch) = else_branch {
                    self.statement(else_branch)?;
                }
                Ok(())
            }
            Stmt::For(token, init, cond, post, body) => {
                // the clause introduces its own scope wrapping the body
                self.env.enter();
                if let Some(init) = init {
                    self.statement(init)?;
                }
                if let Some(cond) = cond {
                    let cond_ty = self.expr_type(cond)?;
                    if cond_ty != Type::Bool {
                        self.warn(token, WarningKind::NonBoolCondition(cond_ty));
                    }
                }
                if let Some(post) = post {
                    self.statement(post)?;
                }
                self.loop_depth += 1;
                self.statement(body)?;
                self.loop_depth -= 1;
                self.env.exit();
                Ok(())
            }
            Stmt::Switch(_, cond, cases) => {
                let cond_ty = self.expr_type(cond)?;
                self.switch_depth += 1;
                for case in cases {
                    if let Some(value) = &case.value {
                        let value_ty = self.expr_type(value)?;
                        if value_ty != cond_ty {
                            return Err(Error::new(
                                &case.token,
                                ErrorKind::TypeMismatch(cond_ty.clone(), value_ty),
                            ));
                        }
                    }
                    self.env.enter();
                    for stmt in &case.body {
                        self.statement(stmt)?;
                    }
                    self.env.exit();
                }
                self.switch_depth -= 1;
                Ok(())
            }
            Stmt::Break(token) => {
                if self.loop_depth + self.switch_depth == 0 {
                    return Err(Error::new(token, ErrorKind::Regular("'break' outside loop or switch")));
                }
                Ok(())
            }
            Stmt::Continue(token) => {
                if self.loop_depth == 0 {
                    return Err(Error::new(token, ErrorKind::Regular("'continue' outside loop")));
                }
                Ok(())
            }
            Stmt::Return(_, expr) => {
                if let Some(expr) = expr {
                    self.expr_type(expr)?;
                }
                Ok(())
            }
        }
    }

    fn expr_type(&mut self, expr: &ExprKind) -> Result<Type, Error> {
        match expr {
            ExprKind::Number(_) => Ok(Type::Int),
            ExprKind::Float(_) => Ok(Type::Float64),
            ExprKind::String(_) => Ok(Type::String),
            ExprKind::Bool(_) => Ok(Type::Bool),
            ExprKind::Ident(name) => Ok(self.env.get_symbol(name)?.ty.clone()),
            ExprKind::Grouping { expr } => self.expr_type(expr),

            ExprKind::Unary { token, right } => {
                let right_ty = self.expr_type(right)?;
                if right_ty != Type::Int {
                    return Err(Error::new(
                        token,
                        ErrorKind::InvalidUnary(token.kind.clone(), right_ty),
                    ));
                }
                Ok(Type::Int)
            }
            // arithmetic, comparisons and logical operators all work on
            // ints and produce an int
            ExprKind::Binary { left, token, right }
            | ExprKind::Comparison { left, token, right }
            | ExprKind::Logical { left, token, right } => {
                let left_ty = self.expr_type(left)?;
                let right_ty = self.expr_type(right)?;
                if left_ty != Type::Int || right_ty != Type::Int {
                    return Err(Error::new(
                        token,
                        ErrorKind::InvalidBinary(token.kind.clone(), left_ty, right_ty),
                    ));
                }
                Ok(Type::Int)
            }

            ExprKind::Call { left_paren, callee, args } => {
                for arg in args {
                    self.expr_type(arg)?;
                }
                match callee.as_ref() {
                    ExprKind::Ident(name) => {
                        let name_str = name.unwrap_string();
                        match self.env.get(&name_str) {
                            Some(symbol) if symbol.ty == Type::Function => Ok(Type::Int),
                            Some(symbol) => Err(Error::new(
                                name,
                                ErrorKind::NotFunction(name_str, symbol.ty.clone()),
                            )),
                            None => Err(Error::new(name, ErrorKind::UndeclaredFunction(name_str))),
                        }
                    }
                    ExprKind::Selector { expr, field, .. } => {
                        let field_str = field.unwrap_string();
                        if let ExprKind::Ident(package) = expr.as_ref() {
                            if package.unwrap_string() == "fmt"
                                && matches!(field_str.as_str(), "Println" | "Print" | "Printf")
                            {
                                return Ok(Type::Void);
                            }
                            return Err(Error::new(
                                field,
                                ErrorKind::UndeclaredFunction(format!(
                                    "{}.{}",
                                    package.unwrap_string(),
                                    field_str
                                )),
                            ));
                        }
                        Err(Error::new(field, ErrorKind::UndeclaredFunction(field_str)))
                    }
                    _ => Err(Error::new(
                        left_paren,
                        ErrorKind::Regular("can only call named functions"),
                    )),
                }
            }

            // field accesses are opaque, their value is treated as an int
            ExprKind::Selector { expr, .. } => {
                self.expr_type(expr)?;
                Ok(Type::Int)
            }
            ExprKind::Index { token, expr, index } => {
                let inner = self.expr_type(expr)?;
                let index_ty = self.expr_type(index)?;
                if index_ty != Type::Int {
                    return Err(Error::new(token, ErrorKind::NotIndexable(index_ty)));
                }
                match inner {
                    Type::Array(elem, _) | Type::Slice(elem) => Ok(*elem),
                    _ => Ok(Type::Int),
                }
            }
            ExprKind::Slice { token, expr, low, high } => {
                let inner = self.expr_type(expr)?;
                for bound in [low, high].into_iter().flatten() {
                    let bound_ty = self.expr_type(bound)?;
                    if bound_ty != Type::Int {
                        return Err(Error::new(token, ErrorKind::NotIndexable(bound_ty)));
                    }
                }
                match inner {
                    Type::Array(elem, _) | Type::Slice(elem) => Ok(Type::Slice(elem)),
                    _ => Ok(Type::Int),
                }
            }
            ExprKind::TypeAssert { expr, type_expr, .. } => {
                self.expr_type(expr)?;
                self.resolve_type(type_expr)
            }
            ExprKind::CompositeLit { name, elems, .. } => {
                for elem in elems {
                    self.expr_type(elem)?;
                }
                let name_str = name.unwrap_string();
                if self.types.contains_key(&name_str) {
                    Ok(Type::Named(name_str))
                } else {
                    Err(Error::new(name, ErrorKind::UndeclaredSymbol(name_str)))
                }
            }
        }
    }

    fn resolve_type(&self, type_expr: &TypeExpr) -> Result<Type, Error> {
        match type_expr {
            TypeExpr::Simple(token) => match &token.kind {
                TokenKind::IntType => Ok(Type::Int),
                TokenKind::Float64Type => Ok(Type::Float64),
                TokenKind::BoolType => Ok(Type::Bool),
                TokenKind::StringType => Ok(Type::String),
                TokenKind::Ident(name) => {
                    if self.types.contains_key(name) {
                        Ok(Type::Named(name.clone()))
                    } else {
                        Err(Error::new(token, ErrorKind::UndeclaredSymbol(name.clone())))
                    }
                }
                kind => Err(Error::new(token, ErrorKind::NotType(kind.clone()))),
            },
            TypeExpr::Struct { fields, .. } => {
                let fields = fields
                    .iter()
                    .map(|field| {
                        Ok((field.name.unwrap_string(), self.resolve_type(&field.type_expr)?))
                    })
                    .collect::<Result<Vec<(String, Type)>, Error>>()?;
                Ok(Type::Struct(fields))
            }
            TypeExpr::Array { size, elem, .. } => {
                let len = match size.kind {
                    TokenKind::Number(n) => n as usize,
                    _ => unreachable!("array length is always a number token"),
                };
                Ok(Type::Array(Box::new(self.resolve_type(elem)?), len))
            }
            TypeExpr::Slice { elem, .. } => {
                Ok(Type::Slice(Box::new(self.resolve_type(elem)?)))
            }
        }
    }

    fn warn(&mut self, location: &impl Location, kind: WarningKind) {
        self.warnings.push(Warning::new(location, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::Parser;
    use crate::compiler::scanner::Scanner;
    use std::path::Path;

    fn setup(input: &str) -> Result<Vec<Warning>, Error> {
        let tokens = Scanner::new(Path::new(""), input)
            .scan_token()
            .expect("valid tokens in typechecker tests");
        let source_file = Parser::new(tokens)
            .parse()
            .expect("valid syntax in typechecker tests");
        TypeChecker::new().check(&source_file)
    }
    fn setup_body(body: &str) -> Result<Vec<Warning>, Error> {
        setup(&format!("package main\nfunc main() {{\n{}\n}}", body))
    }
    fn setup_err(body: &str) -> ErrorKind {
        match setup_body(body) {
            Err(err) => err.kind,
            Ok(_) => unreachable!("want to test errors"),
        }
    }
    fn setup_warnings(body: &str) -> Vec<WarningKind> {
        match setup_body(body) {
            Ok(warnings) => warnings.into_iter().map(|w| w.kind).collect(),
            Err(_) => unreachable!("want to test warnings"),
        }
    }

    #[test]
    fn mismatched_var_initializer() {
        assert_eq!(
            setup_err("var y string = 5"),
            ErrorKind::TypeMismatch(Type::String, Type::Int)
        );
    }
    #[test]
    fn matching_var_initializer() {
        assert!(setup_body("var y string = \"hello\"\nvar n int = 3").is_ok());
    }
    #[test]
    fn int_arithmetic_is_ok() {
        assert!(setup_body("x := 1 + 2 * 3").is_ok());
    }
    #[test]
    fn float_arithmetic_is_rejected() {
        assert!(matches!(
            setup_err("x := 1.0 + 2.0"),
            ErrorKind::InvalidBinary(TokenKind::Plus, Type::Float64, Type::Float64)
        ));
    }
    #[test]
    fn string_comparison_is_rejected() {
        assert!(matches!(
            setup_err("x := \"a\" < \"b\""),
            ErrorKind::InvalidBinary(TokenKind::Less, Type::String, Type::String)
        ));
    }
    #[test]
    fn undeclared_symbol() {
        assert_eq!(setup_err("x = 1"), ErrorKind::UndeclaredSymbol("x".to_string()));
    }
    #[test]
    fn redeclaration_in_same_scope() {
        assert_eq!(
            setup_err("x := 1\nx := 2"),
            ErrorKind::Redefinition("x".to_string())
        );
    }
    #[test]
    fn shadowing_in_inner_block() {
        assert!(setup_body("x := 1\n{\nx := \"shadow\"\n}\nx = 2").is_ok());
    }
    #[test]
    fn inner_declaration_does_not_leak() {
        assert_eq!(
            setup_err("{\nn := 1\n}\nn = 2"),
            ErrorKind::UndeclaredSymbol("n".to_string())
        );
    }
    #[test]
    fn assignment_type_mismatch() {
        assert_eq!(
            setup_err("x := 1\nx = \"oops\""),
            ErrorKind::TypeMismatch(Type::Int, Type::String)
        );
    }
    #[test]
    fn call_to_undeclared_function() {
        assert_eq!(
            setup_err("unknown()"),
            ErrorKind::UndeclaredFunction("unknown".to_string())
        );
    }
    #[test]
    fn call_to_variable() {
        assert_eq!(
            setup_err("x := 1\nx()"),
            ErrorKind::NotFunction("x".to_string(), Type::Int)
        );
    }
    #[test]
    fn calls_between_functions() {
        let result = setup(
            r#"package main
func add(a int, b int) int {
    return a + b
}
func main() {
    x := add(1, 2)
    x = add(x, x)
}"#,
        );
        assert!(result.is_ok());
    }
    #[test]
    fn recursion_is_allowed() {
        let result = setup(
            r#"package main
func count(n int) int {
    if n < 1 {
        return 0
    }
    return count(n - 1)
}
func main() {}"#,
        );
        assert!(result.is_ok());
    }
    #[test]
    fn fmt_builtins_are_known() {
        assert!(setup_body("fmt.Println(\"hi\", 1)\nfmt.Print(2)\nfmt.Printf(\"%d\", 3)").is_ok());
    }
    #[test]
    fn other_package_calls_are_rejected() {
        assert_eq!(
            setup_err("os.Exit(1)"),
            ErrorKind::UndeclaredFunction("os.Exit".to_string())
        );
    }
    #[test]
    fn increment_requires_int() {
        assert!(setup_body("x := 1\nx++").is_ok());
        assert_eq!(
            setup_err("s := \"a\"\ns++"),
            ErrorKind::InvalidIncrementType(Type::String)
        );
    }
    #[test]
    fn break_outside_loop() {
        assert!(matches!(setup_err("break"), ErrorKind::Regular(_)));
        assert!(setup_body("for { break }").is_ok());
    }
    #[test]
    fn untyped_var_warns_and_skips() {
        let warnings = setup_warnings("var x\ny := 1\ny = y");
        assert_eq!(warnings, vec![WarningKind::UntypedVar("x".to_string())]);

        // the skipped declaration leaves the name undeclared
        assert_eq!(
            setup_err("var x\nif x { }"),
            ErrorKind::UndeclaredSymbol("x".to_string())
        );
    }
    #[test]
    fn multi_short_var_decl_warns_and_skips() {
        let warnings = setup_warnings("a, b := 1, 2");
        assert_eq!(warnings, vec![WarningKind::MultiShortVarDecl]);
    }
    #[test]
    fn multi_assign_warns_and_skips() {
        let warnings = setup_warnings("a := 1\nb := 2\na, b = b, a");
        assert_eq!(warnings, vec![WarningKind::MultiAssign]);
    }
    #[test]
    fn comparison_condition_warns_but_compiles() {
        let warnings = setup_warnings("x := 1\nif x < 5 { x = x + 1 }");
        assert_eq!(warnings, vec![WarningKind::NonBoolCondition(Type::Int)]);
    }
    #[test]
    fn bool_condition_has_no_warning() {
        assert!(setup_warnings("b := true\nif b { }").is_empty());
    }
    #[test]
    fn switch_case_type_mismatch() {
        assert_eq!(
            setup_err("x := 1\nswitch x { case \"a\": x = 2 }"),
            ErrorKind::TypeMismatch(Type::Int, Type::String)
        );
    }
    #[test]
    fn index_bound_must_be_int() {
        assert_eq!(
            setup_err("var xs [3]int\nx := xs[\"no\"]"),
            ErrorKind::NotIndexable(Type::String)
        );
    }
    #[test]
    fn struct_type_declaration_and_literal() {
        let result = setup(
            r#"package main
type Point struct {
    x int
    y int
}
func main() {
    p := Point{1, 2}
    n := p.x + 1
    n = n
}"#,
        );
        assert!(result.is_ok());
    }
    #[test]
    fn composite_literal_of_unknown_type() {
        assert_eq!(
            setup_err("p := Unknown{1}"),
            ErrorKind::UndeclaredSymbol("Unknown".to_string())
        );
    }
}
