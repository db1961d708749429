//! Recursive descent parser building the [parse-tree](hir) for a single
//! source file.<br>
//! Stops at the first syntax error, there is no recovery or synchronization.

pub mod double_peek;
pub mod hir;

use crate::compiler::common::{error::*, token::*};
use crate::compiler::parser::double_peek::*;
use crate::compiler::parser::hir::*;

// helper macros that allow comparing enums without specifying their fields: TokenKind::Ident(_)
macro_rules! match_next {
    ($parser:expr, $expected:pat) => {{
        let matched = match $parser.tokens.peek("") {
            Ok(token) => matches!(token.kind, $expected),
            Err(_) => false,
        };
        if matched {
            $parser.tokens.next()
        } else {
            None
        }
    }};
}
macro_rules! consume {
    ($parser:expr,$expected:pat,$msg:expr) => {{
        let token = $parser.tokens.peek($msg)?;
        if matches!(token.kind, $expected) {
            Ok($parser.tokens.next().unwrap())
        } else {
            Err(Error::new(token, ErrorKind::Regular($msg)))
        }
    }};
}
macro_rules! check {
    ($parser:expr,$expected:pat) => {
        if let Ok(token) = $parser.tokens.peek("") {
            matches!(token.kind, $expected)
        } else {
            false
        }
    };
}

pub struct Parser {
    tokens: DoublePeek<Token>,

    // composite literals are not allowed directly in `if`/`for`/`switch`
    // headers, otherwise the block-open brace would be swallowed
    composite_ok: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: DoublePeek::new(tokens),
            composite_ok: true,
        }
    }
    pub fn parse(mut self) -> Result<SourceFile, Error> {
        let package = self.package_clause()?;
        let imports = self.import_decls()?;

        let mut decls = Vec::new();
        while let Ok(token) = self.tokens.peek("") {
            match token.kind {
                TokenKind::Func => {
                    self.tokens.next();
                    decls.push(Declaration::Function(self.function_declaration()?));
                }
                TokenKind::Var => {
                    self.tokens.next();
                    decls.push(Declaration::Var(self.var_declaration()?));
                }
                TokenKind::Type => {
                    self.tokens.next();
                    decls.push(Declaration::Type(self.type_declaration()?));
                }
                _ => {
                    return Err(Error::new(
                        token,
                        ErrorKind::Regular("expected 'func', 'var' or 'type' declaration"),
                    ))
                }
            }
        }

        Ok(SourceFile { package, imports, decls })
    }

    fn package_clause(&mut self) -> Result<Token, Error> {
        consume!(self, TokenKind::Package, "expected 'package' clause at start of file")?;
        let name = consume!(self, TokenKind::Ident(_), "expected package name")?;
        // the only place a stray semicolon is tolerated
        match_next!(self, TokenKind::Semicolon);
        Ok(name)
    }

    fn import_decls(&mut self) -> Result<Vec<ImportDecl>, Error> {
        let mut imports = Vec::new();
        while match_next!(self, TokenKind::Import).is_some() {
            if match_next!(self, TokenKind::LeftParen).is_some() {
                while !check!(self, TokenKind::RightParen) {
                    imports.push(self.import_spec()?);
                    while match_next!(self, TokenKind::Semicolon).is_some() {}
                }
                consume!(self, TokenKind::RightParen, "expected ')' closing import group")?;
            } else {
                imports.push(self.import_spec()?);
            }
        }
        Ok(imports)
    }
    fn import_spec(&mut self) -> Result<ImportDecl, Error> {
        let alias = match_next!(self, TokenKind::Ident(_));
        let path = consume!(self, TokenKind::String(_), "expected import path string")?;
        Ok(ImportDecl { alias, path })
    }

    fn function_declaration(&mut self) -> Result<FunctionDecl, Error> {
        let name = consume!(self, TokenKind::Ident(_), "expected function name after 'func'")?;
        consume!(self, TokenKind::LeftParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        while !check!(self, TokenKind::RightParen) {
            let name = consume!(self, TokenKind::Ident(_), "expected parameter name")?;
            let type_expr = self.type_expression()?;
            params.push(Param { name, type_expr });

            if match_next!(self, TokenKind::Comma).is_none() {
                break;
            }
        }
        consume!(self, TokenKind::RightParen, "expected ')' after parameter list")?;

        let return_type = if !check!(self, TokenKind::LeftBrace) {
            Some(self.type_expression()?)
        } else {
            None
        };
        let body = self.block()?;

        Ok(FunctionDecl { name, params, return_type, body })
    }

    fn var_declaration(&mut self) -> Result<VarDecl, Error> {
        if match_next!(self, TokenKind::LeftParen).is_some() {
            let mut specs = Vec::new();
            while !check!(self, TokenKind::RightParen) {
                specs.push(self.var_spec()?);
                while match_next!(self, TokenKind::Semicolon).is_some() {}
            }
            consume!(self, TokenKind::RightParen, "expected ')' closing var group")?;
            Ok(VarDecl { specs })
        } else {
            Ok(VarDecl { specs: vec![self.var_spec()?] })
        }
    }
    fn var_spec(&mut self) -> Result<VarSpec, Error> {
        let mut names = vec![consume!(self, TokenKind::Ident(_), "expected identifier after 'var'")?];
        while match_next!(self, TokenKind::Comma).is_some() {
            names.push(consume!(self, TokenKind::Ident(_), "expected identifier after ','")?);
        }

        let type_expr = match self.tokens.peek("") {
            Ok(token) if token.kind.is_type_start() => {
                // `var x` followed by `y := 2` on the next line, the
                // identifier then starts a new statement instead of naming
                // a type
                let next_statement = matches!(token.kind, TokenKind::Ident(_))
                    && matches!(
                        self.tokens.double_peek("").map(|t| &t.kind),
                        Ok(TokenKind::ColonEqual)
                    );
                if next_statement {
                    None
                } else {
                    Some(self.type_expression()?)
                }
            }
            _ => None,
        };

        let init = if match_next!(self, TokenKind::Equal).is_some() {
            Some(self.expression_list()?)
        } else {
            None
        };

        Ok(VarSpec { names, type_expr, init })
    }

    fn type_declaration(&mut self) -> Result<TypeDecl, Error> {
        let name = consume!(self, TokenKind::Ident(_), "expected type name after 'type'")?;
        let type_expr = self.type_expression()?;
        Ok(TypeDecl { name, type_expr })
    }

    fn type_expression(&mut self) -> Result<TypeExpr, Error> {
        let token = self.tokens.peek("expected type")?.clone();
        match token.kind {
            TokenKind::IntType
            | TokenKind::Float64Type
            | TokenKind::BoolType
            | TokenKind::StringType
            | TokenKind::Ident(_) => {
                self.tokens.next();
                Ok(TypeExpr::Simple(token))
            }
            TokenKind::Struct => {
                self.tokens.next();
                consume!(self, TokenKind::LeftBrace, "expected '{' after 'struct'")?;
                let mut fields = Vec::new();
                while !check!(self, TokenKind::RightBrace) {
                    let name = consume!(self, TokenKind::Ident(_), "expected field name")?;
                    let type_expr = self.type_expression()?;
                    fields.push(Param { name, type_expr });
                    while match_next!(self, TokenKind::Semicolon).is_some() {}
                }
                consume!(self, TokenKind::RightBrace, "expected '}' closing struct type")?;
                Ok(TypeExpr::Struct { token, fields })
            }
            TokenKind::LeftBracket => {
                self.tokens.next();
                if match_next!(self, TokenKind::RightBracket).is_some() {
                    let elem = Box::new(self.type_expression()?);
                    Ok(TypeExpr::Slice { token, elem })
                } else {
                    let size = consume!(self, TokenKind::Number(_), "expected array length")?;
                    consume!(self, TokenKind::RightBracket, "expected ']' after array length")?;
                    let elem = Box::new(self.type_expression()?);
                    Ok(TypeExpr::Array { token, size, elem })
                }
            }
            _ => Err(Error::new(&token, ErrorKind::NotType(token.kind.clone()))),
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, Error> {
        consume!(self, TokenKind::LeftBrace, "expected '{'")?;
        let mut body = Vec::new();
        while !check!(self, TokenKind::RightBrace) {
            if self.tokens.peek("expected '}' closing block").is_err() {
                break;
            }
            body.push(self.statement()?);
        }
        consume!(self, TokenKind::RightBrace, "expected '}' closing block")?;
        Ok(body)
    }

    fn statement(&mut self) -> Result<Stmt, Error> {
        let token = self.tokens.peek("expected statement")?.clone();
        match token.kind {
            TokenKind::Var => {
                self.tokens.next();
                Ok(Stmt::Declaration(Declaration::Var(self.var_declaration()?)))
            }
            TokenKind::Type => {
                self.tokens.next();
                Ok(Stmt::Declaration(Declaration::Type(self.type_declaration()?)))
            }
            TokenKind::If => {
                self.tokens.next();
                self.if_statement(token)
            }
            TokenKind::For => {
                self.tokens.next();
                self.for_statement(token)
            }
            TokenKind::Switch => {
                self.tokens.next();
                self.switch_statement(token)
            }
            TokenKind::Return => {
                self.tokens.next();
                let expr = if check!(self, TokenKind::RightBrace) {
                    None
                } else {
                    Some(self.expression()?)
                };
                Ok(Stmt::Return(token, expr))
            }
            TokenKind::Break => {
                self.tokens.next();
                Ok(Stmt::Break(token))
            }
            TokenKind::Continue => {
                self.tokens.next();
                Ok(Stmt::Continue(token))
            }
            TokenKind::LeftBrace => Ok(Stmt::Block(self.block()?)),
            _ => self.simple_statement(),
        }
    }

    /// A statement without any nested blocks, also used in `for` clauses
    fn simple_statement(&mut self) -> Result<Stmt, Error> {
        let mut targets = self.expression_list()?;

        if let Some(token) = match_next!(self, TokenKind::ColonEqual) {
            let names = targets
                .into_iter()
                .map(|expr| match expr {
                    ExprKind::Ident(name) => Ok(name),
                    _ => Err(Error::new(&token, ErrorKind::InvalidAssignTarget(":="))),
                })
                .collect::<Result<Vec<Token>, Error>>()?;
            let values = self.expression_list()?;
            Ok(Stmt::ShortVarDecl { names, token, values })
        } else if let Some(token) = match_next!(self, TokenKind::Equal) {
            let values = self.expression_list()?;
            Ok(Stmt::Assign { targets, token, values })
        } else if let Some(token) = match_next!(self, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            if targets.len() != 1 {
                return Err(Error::new(&token, ErrorKind::InvalidAssignTarget("'++'/'--'")));
            }
            Ok(Stmt::IncDec { expr: targets.remove(0), token })
        } else if targets.len() == 1 {
            Ok(Stmt::Expr(targets.remove(0)))
        } else {
            let token = self.tokens.peek("expected ':=' or '=' after expression list")?;
            Err(Error::new(
                token,
                ErrorKind::Regular("expected ':=' or '=' after expression list"),
            ))
        }
    }

    fn if_statement(&mut self, token: Token) -> Result<Stmt, Error> {
        let cond = self.condition()?;
        let then = Box::new(Stmt::Block(self.block()?));

        let else_branch = if match_next!(self, TokenKind::Else).is_some() {
            if let Some(if_token) = match_next!(self, TokenKind::If) {
                // dangling else binds to the closest if
                Some(Box::new(self.if_statement(if_token)?))
            } else {
                Some(Box::new(Stmt::Block(self.block()?)))
            }
        } else {
            None
        };

        Ok(Stmt::If(token, cond, then, else_branch))
    }

    fn for_statement(&mut self, token: Token) -> Result<Stmt, Error> {
        // `for {}` loops forever
        if check!(self, TokenKind::LeftBrace) {
            let body = Box::new(Stmt::Block(self.block()?));
            return Ok(Stmt::For(token, None, None, None, body));
        }

        let outer = std::mem::replace(&mut self.composite_ok, false);
        let (init, cond, post) = if match_next!(self, TokenKind::Semicolon).is_some() {
            self.for_clause_tail(None)?
        } else {
            let first = self.simple_statement()?;
            if check!(self, TokenKind::LeftBrace) {
                match first {
                    Stmt::Expr(cond) => (None, Some(cond), None),
                    _ => {
                        return Err(Error::new(
                            &token,
                            ErrorKind::Regular("expected ';' after for init statement"),
                        ))
                    }
                }
            } else {
                consume!(self, TokenKind::Semicolon, "expected ';' after for init statement")?;
                self.for_clause_tail(Some(Box::new(first)))?
            }
        };
        self.composite_ok = outer;

        let body = Box::new(Stmt::Block(self.block()?));
        Ok(Stmt::For(token, init, cond, post, body))
    }
    #[allow(clippy::type_complexity)]
    fn for_clause_tail(
        &mut self,
        init: Option<Box<Stmt>>,
    ) -> Result<(Option<Box<Stmt>>, Option<ExprKind>, Option<Box<Stmt>>), Error> {
        let cond = if check!(self, TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        consume!(self, TokenKind::Semicolon, "expected ';' after for condition")?;

        let post = if check!(self, TokenKind::LeftBrace) {
            None
        } else {
            Some(Box::new(self.simple_statement()?))
        };
        Ok((init, cond, post))
    }

    fn switch_statement(&mut self, token: Token) -> Result<Stmt, Error> {
        let cond = self.condition()?;
        consume!(self, TokenKind::LeftBrace, "expected '{' after switch condition")?;

        let mut cases = Vec::new();
        loop {
            if let Some(case_token) = match_next!(self, TokenKind::Case) {
                let value = self.expression()?;
                consume!(self, TokenKind::Colon, "expected ':' after case value")?;
                cases.push(CaseClause {
                    token: case_token,
                    value: Some(value),
                    body: self.case_body()?,
                });
            } else if let Some(default_token) = match_next!(self, TokenKind::Default) {
                consume!(self, TokenKind::Colon, "expected ':' after 'default'")?;
                cases.push(CaseClause {
                    token: default_token,
                    value: None,
                    body: self.case_body()?,
                });
            } else {
                break;
            }
        }
        consume!(self, TokenKind::RightBrace, "expected '}' closing switch")?;

        Ok(Stmt::Switch(token, cond, cases))
    }
    fn case_body(&mut self) -> Result<Vec<Stmt>, Error> {
        let mut body = Vec::new();
        while !check!(
            self,
            TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
        ) {
            if self.tokens.peek("expected '}' closing switch").is_err() {
                break;
            }
            body.push(self.statement()?);
        }
        Ok(body)
    }

    // a block-statement header, composite literals are disallowed so the
    // opening brace of the block is not consumed by the expression
    fn condition(&mut self) -> Result<ExprKind, Error> {
        let outer = std::mem::replace(&mut self.composite_ok, false);
        let cond = self.expression();
        self.composite_ok = outer;
        cond
    }
    // inside parentheses and brackets composite literals are unambiguous again
    fn nested_expression(&mut self) -> Result<ExprKind, Error> {
        let outer = std::mem::replace(&mut self.composite_ok, true);
        let expr = self.expression();
        self.composite_ok = outer;
        expr
    }

    fn expression_list(&mut self) -> Result<Vec<ExprKind>, Error> {
        let mut list = vec![self.expression()?];
        while match_next!(self, TokenKind::Comma).is_some() {
            list.push(self.expression()?);
        }
        Ok(list)
    }

    fn expression(&mut self) -> Result<ExprKind, Error> {
        self.or()
    }
    fn or(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.and()?;
        while let Some(token) = match_next!(self, TokenKind::PipePipe) {
            let right = self.and()?;
            left = ExprKind::Logical {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn and(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.equality()?;
        while let Some(token) = match_next!(self, TokenKind::AmpAmp) {
            let right = self.equality()?;
            left = ExprKind::Logical {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn equality(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.comparison()?;
        while let Some(token) = match_next!(self, TokenKind::EqualEqual | TokenKind::BangEqual) {
            let right = self.comparison()?;
            left = ExprKind::Comparison {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn comparison(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.term()?;
        while let Some(token) = match_next!(
            self,
            TokenKind::Greater | TokenKind::GreaterEqual | TokenKind::Less | TokenKind::LessEqual
        ) {
            let right = self.term()?;
            left = ExprKind::Comparison {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn term(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.factor()?;
        while let Some(token) = match_next!(self, TokenKind::Plus | TokenKind::Minus) {
            let right = self.factor()?;
            left = ExprKind::Binary {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn factor(&mut self) -> Result<ExprKind, Error> {
        let mut left = self.unary()?;
        while let Some(token) = match_next!(self, TokenKind::Star | TokenKind::Slash) {
            let right = self.unary()?;
            left = ExprKind::Binary {
                left: Box::new(left),
                token,
                right: Box::new(right),
            };
        }
        Ok(left)
    }
    fn unary(&mut self) -> Result<ExprKind, Error> {
        if let Some(token) = match_next!(self, TokenKind::Bang | TokenKind::Minus) {
            let right = self.unary()?;
            return Ok(ExprKind::Unary { token, right: Box::new(right) });
        }
        self.postfix()
    }
    fn postfix(&mut self) -> Result<ExprKind, Error> {
        let mut expr = self.primary()?;

        loop {
            if let Some(token) = match_next!(self, TokenKind::Dot) {
                if match_next!(self, TokenKind::LeftParen).is_some() {
                    let type_expr = self.type_expression()?;
                    consume!(self, TokenKind::RightParen, "expected ')' closing type assertion")?;
                    expr = ExprKind::TypeAssert {
                        token,
                        expr: Box::new(expr),
                        type_expr,
                    };
                } else {
                    let field = consume!(self, TokenKind::Ident(_), "expected field name after '.'")?;
                    expr = ExprKind::Selector {
                        token,
                        expr: Box::new(expr),
                        field,
                    };
                }
            } else if let Some(token) = match_next!(self, TokenKind::LeftBracket) {
                expr = self.index_or_slice(token, expr)?;
            } else if let Some(left_paren) = match_next!(self, TokenKind::LeftParen) {
                let mut args = Vec::new();
                while !check!(self, TokenKind::RightParen) {
                    args.push(self.nested_expression()?);
                    if match_next!(self, TokenKind::Comma).is_none() {
                        break;
                    }
                }
                consume!(self, TokenKind::RightParen, "expected ')' after arguments")?;
                expr = ExprKind::Call {
                    left_paren,
                    callee: Box::new(expr),
                    args,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }
    fn index_or_slice(&mut self, token: Token, expr: ExprKind) -> Result<ExprKind, Error> {
        if match_next!(self, TokenKind::Colon).is_some() {
            let high = if check!(self, TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(self.nested_expression()?))
            };
            consume!(self, TokenKind::RightBracket, "expected ']' closing slice expression")?;
            return Ok(ExprKind::Slice {
                token,
                expr: Box::new(expr),
                low: None,
                high,
            });
        }

        let first = self.nested_expression()?;
        if match_next!(self, TokenKind::Colon).is_some() {
            let high = if check!(self, TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(self.nested_expression()?))
            };
            consume!(self, TokenKind::RightBracket, "expected ']' closing slice expression")?;
            Ok(ExprKind::Slice {
                token,
                expr: Box::new(expr),
                low: Some(Box::new(first)),
                high,
            })
        } else {
            consume!(self, TokenKind::RightBracket, "expected ']' closing index expression")?;
            Ok(ExprKind::Index {
                token,
                expr: Box::new(expr),
                index: Box::new(first),
            })
        }
    }
    fn primary(&mut self) -> Result<ExprKind, Error> {
        if let Some(token) = match_next!(self, TokenKind::Number(_)) {
            return Ok(ExprKind::Number(token));
        }
        if let Some(token) = match_next!(self, TokenKind::FloatNum(_)) {
            return Ok(ExprKind::Float(token));
        }
        if let Some(token) = match_next!(self, TokenKind::String(_)) {
            return Ok(ExprKind::String(token));
        }
        if let Some(token) = match_next!(self, TokenKind::True | TokenKind::False) {
            return Ok(ExprKind::Bool(token));
        }
        if let Some(name) = match_next!(self, TokenKind::Ident(_)) {
            if self.composite_ok && check!(self, TokenKind::LeftBrace) {
                let token = self.tokens.next().unwrap();
                let mut elems = Vec::new();
                while !check!(self, TokenKind::RightBrace) {
                    elems.push(self.nested_expression()?);
                    if match_next!(self, TokenKind::Comma).is_none() {
                        break;
                    }
                }
                consume!(self, TokenKind::RightBrace, "expected '}' closing composite literal")?;
                return Ok(ExprKind::CompositeLit { name, token, elems });
            }
            return Ok(ExprKind::Ident(name));
        }
        if match_next!(self, TokenKind::LeftParen).is_some() {
            let expr = self.nested_expression()?;
            consume!(self, TokenKind::RightParen, "expected ')' closing grouping")?;
            return Ok(ExprKind::Grouping { expr: Box::new(expr) });
        }

        let token = self.tokens.peek("expected expression")?;
        Err(Error::new(token, ErrorKind::ExpectedExpression(token.kind.clone())))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::compiler::scanner::Scanner;
    use std::path::Path;

    pub fn setup(input: &str) -> Parser {
        let tokens = Scanner::new(Path::new(""), input)
            .scan_token()
            .expect("valid tokens in parser tests");
        Parser::new(tokens)
    }
    fn setup_expr(input: &str) -> String {
        setup(input).expression().unwrap().to_string()
    }
    fn setup_stmt(input: &str) -> String {
        setup(input).statement().unwrap().to_string()
    }
    fn setup_err(input: &str) -> ErrorKind {
        match setup(input).parse() {
            Err(err) => err.kind,
            Ok(_) => unreachable!("want to test errors"),
        }
    }

    #[test]
    fn creates_ast_for_expression() {
        let actual = setup_expr("32 + 1 * 2");
        let expected = "Binary: '+'\n\
            -Number: 32\n\
            -Binary: '*'\n\
            --Number: 1\n\
            --Number: 2";

        assert_eq!(actual, expected);
    }
    #[test]
    fn nested_groupings() {
        let actual = setup_expr("(3 / (6 - 7) * 2) + 1");
        let expected = "Binary: '+'\n\
            -Grouping:\n\
            --Binary: '*'\n\
            ---Binary: '/'\n\
            ----Number: 3\n\
            ----Grouping:\n\
            -----Binary: '-'\n\
            ------Number: 6\n\
            ------Number: 7\n\
            ---Number: 2\n\
            -Number: 1";

        assert_eq!(actual, expected);
    }
    #[test]
    fn comparison_binds_tighter_than_logical() {
        let actual = setup_expr("1 < 2 && x > 4 || y");
        let expected = "Logical: '||'\n\
            -Logical: '&&'\n\
            --Comparison: '<'\n\
            ---Number: 1\n\
            ---Number: 2\n\
            --Comparison: '>'\n\
            ---Ident: 'x'\n\
            ---Number: 4\n\
            -Ident: 'y'";

        assert_eq!(actual, expected);
    }
    #[test]
    fn unary_before_postfix() {
        let actual = setup_expr("!p.x");
        let expected = "Unary: '!'\n\
            -Selector: 'x'\n\
            --Ident: 'p'";

        assert_eq!(actual, expected);
    }
    #[test]
    fn call_through_selector() {
        let actual = setup_expr("fmt.Println(\"hi\", x)");
        let expected = "Call:\n\
            -Selector: 'Println'\n\
            --Ident: 'fmt'\n\
            -String: 'hi'\n\
            -Ident: 'x'";

        assert_eq!(actual, expected);
    }
    #[test]
    fn index_and_slice_expressions() {
        let actual = setup_expr("xs[1]");
        let expected = "Index:\n\
            -Ident: 'xs'\n\
            -Number: 1";
        assert_eq!(actual, expected);

        let expr = setup("xs[1:n]").expression().unwrap();
        assert!(matches!(expr, ExprKind::Slice { low: Some(_), high: Some(_), .. }));

        let expr = setup("xs[:n]").expression().unwrap();
        assert!(matches!(expr, ExprKind::Slice { low: None, high: Some(_), .. }));
    }
    #[test]
    fn composite_literal() {
        let actual = setup_expr("Point{1, 2}");
        let expected = "CompositeLit: 'Point'\n\
            -Number: 1\n\
            -Number: 2";

        assert_eq!(actual, expected);
    }
    #[test]
    fn type_assertion() {
        let expr = setup("v.(int)").expression().unwrap();
        assert!(matches!(expr, ExprKind::TypeAssert { .. }));
    }

    #[test]
    fn short_var_decl_statement() {
        let actual = setup_stmt("x := 1");
        let expected = "ShortVarDecl: 'x'\n\
            -Number: 1";

        assert_eq!(actual, expected);
    }
    #[test]
    fn if_statement_with_comparison() {
        let actual = setup_stmt("if x < 5 { x = x + 1 }");
        let expected = "If:\n\
            -Comparison: '<'\n\
            --Ident: 'x'\n\
            --Number: 5\n\
            -Block:\n\
            --Assignment:\n\
            ---Ident: 'x'\n\
            ---Binary: '+'\n\
            ----Ident: 'x'\n\
            ----Number: 1";

        assert_eq!(actual, expected);
    }
    #[test]
    fn no_composite_literal_in_condition() {
        // `x` is the whole condition, `{` opens the block
        let actual = setup_stmt("if x { y = 1 }");
        let expected = "If:\n\
            -Ident: 'x'\n\
            -Block:\n\
            --Assignment:\n\
            ---Ident: 'y'\n\
            ---Number: 1";

        assert_eq!(actual, expected);
    }
    #[test]
    fn dangling_else_binds_to_closest_if() {
        let stmt = setup("if a { x = 1 } else if b { x = 2 } else { x = 3 }")
            .statement()
            .unwrap();

        // outer if has an else-branch which is itself an if with an else
        match stmt {
            Stmt::If(_, _, _, Some(else_branch)) => {
                assert!(matches!(*else_branch, Stmt::If(_, _, _, Some(_))));
            }
            _ => panic!("expected if with else-branch"),
        }
    }
    #[test]
    fn for_with_full_clause() {
        let actual = setup_stmt("for i := 0; i < 3; i++ { fmt.Println(i) }");
        let expected = "For:\n\
            -ShortVarDecl: 'i'\n\
            --Number: 0\n\
            -Comparison: '<'\n\
            --Ident: 'i'\n\
            --Number: 3\n\
            -IncDec: '++'\n\
            --Ident: 'i'\n\
            -Block:\n\
            --Expr:\n\
            ---Call:\n\
            ----Selector: 'Println'\n\
            -----Ident: 'fmt'\n\
            ----Ident: 'i'";

        assert_eq!(actual, expected);
    }
    #[test]
    fn for_condition_only_and_infinite() {
        let stmt = setup("for x < 5 { x++ }").statement().unwrap();
        assert!(matches!(stmt, Stmt::For(_, None, Some(_), None, _)));

        let stmt = setup("for { x++ }").statement().unwrap();
        assert!(matches!(stmt, Stmt::For(_, None, None, None, _)));
    }
    #[test]
    fn switch_with_default() {
        let stmt = setup("switch x { case 1: a = 1\n case 2: a = 2\n default: a = 3 }")
            .statement()
            .unwrap();

        match stmt {
            Stmt::Switch(_, _, cases) => {
                assert_eq!(cases.len(), 3);
                assert!(cases[0].value.is_some());
                assert!(cases[1].value.is_some());
                assert!(cases[2].value.is_none());
            }
            _ => panic!("expected switch statement"),
        }
    }

    #[test]
    fn parses_source_file_shape() {
        let file = setup(
            r#"package main

import "fmt"

var answer int = 42

func main() {
    fmt.Println(answer)
}"#,
        )
        .parse()
        .unwrap();

        assert_eq!(file.package.unwrap_string(), "main");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].path.unwrap_string(), "fmt");
        assert_eq!(file.decls.len(), 2);
        assert!(matches!(file.decls[0], Declaration::Var(_)));
        assert!(matches!(file.decls[1], Declaration::Function(_)));
    }
    #[test]
    fn parses_type_and_grouped_var_declarations() {
        let file = setup(
            r#"package main

type Point struct {
    x int
    y int
}

var (
    a int
    b string = "hey"
)

func main() {
    p := Point{1, 2}
    fmt.Println(p.x)
}"#,
        )
        .parse()
        .unwrap();

        assert!(matches!(file.decls[0], Declaration::Type(_)));
        match &file.decls[1] {
            Declaration::Var(var) => assert_eq!(var.specs.len(), 2),
            _ => panic!("expected grouped var declaration"),
        }
    }

    #[test]
    fn missing_package_clause() {
        assert_eq!(
            setup_err("func main() {}"),
            ErrorKind::Regular("expected 'package' clause at start of file")
        );
    }
    #[test]
    fn short_decl_target_must_be_identifier() {
        assert_eq!(
            setup_err("package main\nfunc main() { x[0] := 2 }"),
            ErrorKind::InvalidAssignTarget(":=")
        );
    }
    #[test]
    fn stops_at_first_syntax_error() {
        let actual = setup_err("package main\nfunc main() { x = + }\nfunc broken( {}");
        assert!(matches!(actual, ErrorKind::ExpectedExpression(_)));
    }
}
