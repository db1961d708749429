//! Translates the typechecked [parse-tree](crate::compiler::parser::hir) into
//! [three-address-code](tac), which the [c] and [nasm] backends render into
//! compilable output.<br>
//! Every counter lives on the generator instance, so a fresh [TacGen] always
//! numbers its temporaries, labels and string-data from zero.

pub mod c;
pub mod nasm;
pub mod tac;

use crate::compiler::common::token::TokenKind;
use crate::compiler::parser::hir::*;
use crate::compiler::codegen::tac::*;

pub struct TacGen {
    code: Vec<Tac>,

    temp_count: usize,
    label_count: usize,
    string_count: usize,

    // jump targets of the innermost enclosing loop/switch
    break_labels: Vec<String>,
    continue_labels: Vec<String>,
}

impl TacGen {
    pub fn new() -> Self {
        TacGen {
            code: Vec::new(),
            temp_count: 0,
            label_count: 0,
            string_count: 0,
            break_labels: Vec::new(),
            continue_labels: Vec::new(),
        }
    }

    /// Input is expected to have passed the typechecker, constructs the
    /// typechecker only warned about are silently skipped here.
    pub fn translate(mut self, source_file: &SourceFile) -> Vec<Tac> {
        for decl in &source_file.decls {
            if let Declaration::Function(func) = decl {
                self.function(func);
            }
        }
        self.code
    }

    fn function(&mut self, func: &FunctionDecl) {
        let name = func.name.unwrap_string();
        self.code.push(Tac::FuncBegin(name.clone()));
        for stmt in &func.body {
            self.statement(stmt);
        }
        self.code.push(Tac::FuncEnd(name));
    }

    fn statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(Declaration::Var(var)) => {
                for spec in &var.specs {
                    if let Some(values) = &spec.init {
                        for (name, value) in spec.names.iter().zip(values) {
                            let src = self.expression(value);
                            self.code.push(Tac::Copy { dest: name.unwrap_string(), src });
                        }
                    }
                }
            }
            Stmt::Declaration(_) => (),
            Stmt::Expr(expr) => {
                self.expression(expr);
            }
            Stmt::ShortVarDecl { names, values, .. } => {
                if let ([name], [value]) = (names.as_slice(), values.as_slice()) {
                    let src = self.expression(value);
                    self.code.push(Tac::Copy { dest: name.unwrap_string(), src });
                }
            }
            Stmt::Assign { targets, values, .. } => {
                if let ([target], [value]) = (targets.as_slice(), values.as_slice()) {
                    let dest = self.operand_name(target);
                    let src = self.expression(value);
                    self.code.push(Tac::Copy { dest, src });
                }
            }
            Stmt::IncDec { expr, token } => {
                let name = self.operand_name(expr);
                let op = match token.kind {
                    TokenKind::PlusPlus => BinOp::Add,
                    _ => BinOp::Sub,
                };
                self.code.push(Tac::Binary {
                    dest: name.clone(),
                    left: name,
                    op,
                    right: "1".to_string(),
                });
            }
            Stmt::Block(body) => {
                for stmt in body {
                    self.statement(stmt);
                }
            }
            Stmt::If(_, cond, then, else_branch) => self.if_statement(cond, then, else_branch),
            Stmt::For(_, init, cond, post, body) => self.for_statement(init, cond, post, body),
            Stmt::Switch(_, cond, cases) => self.switch_statement(cond, cases),
            Stmt::Break(_) => {
                let target = self.break_labels.last().expect("checked by typechecker").clone();
                self.code.push(Tac::Goto(target));
            }
            Stmt::Continue(_) => {
                let target = self.continue_labels.last().expect("checked by typechecker").clone();
                self.code.push(Tac::Goto(target));
            }
            Stmt::Return(_, expr) => {
                let value = expr.as_ref().map(|expr| self.expression(expr));
                self.code.push(Tac::Return(value));
            }
        }
    }

    // both branch-labels are always emitted, even without an else-branch
    fn if_statement(&mut self, cond: &ExprKind, then: &Stmt, else_branch: &Option<Box<Stmt>>) {
        let cond = self.expression(cond);
        let else_label = self.label();
        let end_label = self.label();

        self.code.push(Tac::IfFalse { cond, target: else_label.clone() });
        self.statement(then);
        self.code.push(Tac::Goto(end_label.clone()));
        self.code.push(Tac::Label(else_label));
        if let Some(else_branch) = else_branch {
            self.statement(else_branch);
        }
        self.code.push(Tac::Label(end_label));
    }

    // the condition is tested at the bottom, entry jumps to it first:
    //   init; GOTO cond; body: ...; post; cond: t; IF_TRUE t GOTO body; end:
    fn for_statement(
        &mut self,
        init: &Option<Box<Stmt>>,
        cond: &Option<ExprKind>,
        post: &Option<Box<Stmt>>,
        body: &Stmt,
    ) {
        if let Some(init) = init {
            self.statement(init);
        }

        if cond.is_none() && post.is_none() && init.is_none() {
            // `for {}`, a plain backedge
            let top_label = self.label();
            let end_label = self.label();
            self.code.push(Tac::Label(top_label.clone()));

            self.break_labels.push(end_label.clone());
            self.continue_labels.push(top_label.clone());
            self.statement(body);
            self.break_labels.pop();
            self.continue_labels.pop();

            self.code.push(Tac::Goto(top_label));
            self.code.push(Tac::Label(end_label));
            return;
        }

        let cond_label = self.label();
        let body_label = self.label();
        // `continue` runs the post-statement before re-testing the condition
        let post_label = post.as_ref().map(|_| self.label());
        let end_label = self.label();

        self.code.push(Tac::Goto(cond_label.clone()));
        self.code.push(Tac::Label(body_label.clone()));

        self.break_labels.push(end_label.clone());
        self.continue_labels
            .push(post_label.clone().unwrap_or_else(|| cond_label.clone()));
        self.statement(body);
        self.break_labels.pop();
        self.continue_labels.pop();

        if let (Some(post), Some(post_label)) = (post, &post_label) {
            self.code.push(Tac::Label(post_label.clone()));
            self.statement(post);
        }
        self.code.push(Tac::Label(cond_label));
        match cond {
            Some(cond) => {
                let cond = self.expression(cond);
                self.code.push(Tac::IfTrue { cond, target: body_label });
            }
            None => self.code.push(Tac::Goto(body_label)),
        }
        self.code.push(Tac::Label(end_label));
    }

    // lowered as a chain of equality tests, there is no fallthrough
    fn switch_statement(&mut self, cond: &ExprKind, cases: &[CaseClause]) {
        let cond = self.expression(cond);
        let end_label = self.label();

        let mut case_labels = Vec::new();
        let mut default_label = None;
        for case in cases {
            let label = self.label();
            match &case.value {
                Some(value) => {
                    let value = self.expression(value);
                    let temp = self.temp();
                    self.code.push(Tac::Binary {
                        dest: temp.clone(),
                        left: cond.clone(),
                        op: BinOp::Eq,
                        right: value,
                    });
                    self.code.push(Tac::IfTrue { cond: temp, target: label.clone() });
                }
                None => default_label = Some(label.clone()),
            }
            case_labels.push(label);
        }
        self.code
            .push(Tac::Goto(default_label.unwrap_or_else(|| end_label.clone())));

        self.break_labels.push(end_label.clone());
        for (case, label) in cases.iter().zip(case_labels) {
            self.code.push(Tac::Label(label));
            for stmt in &case.body {
                self.statement(stmt);
            }
            self.code.push(Tac::Goto(end_label.clone()));
        }
        self.break_labels.pop();

        self.code.push(Tac::Label(end_label));
    }

    /// Emits the instructions computing `expr` and returns the operand
    /// holding its value. Every subexpression gets a fresh temporary,
    /// temporaries are never reassigned.
    fn expression(&mut self, expr: &ExprKind) -> String {
        match expr {
            ExprKind::Number(token) => match token.kind {
                TokenKind::Number(n) => n.to_string(),
                _ => unreachable!("number literal always holds number token"),
            },
            ExprKind::Float(token) => match token.kind {
                TokenKind::FloatNum(n) => n.to_string(),
                _ => unreachable!("float literal always holds float token"),
            },
            ExprKind::Bool(token) => match token.kind {
                TokenKind::True => "1".to_string(),
                _ => "0".to_string(),
            },
            ExprKind::String(token) => {
                let label = self.string_label();
                self.code.push(Tac::Data {
                    label: label.clone(),
                    value: token.unwrap_string(),
                });
                label
            }
            ExprKind::Ident(name) => name.unwrap_string(),
            ExprKind::Grouping { expr } => self.expression(expr),

            ExprKind::Unary { token, right } => {
                let right = self.expression(right);
                let dest = self.temp();
                let instruction = match token.kind {
                    // -x is 0 SUB x, !x is x EQ 0
                    TokenKind::Minus => Tac::Binary {
                        dest: dest.clone(),
                        left: "0".to_string(),
                        op: BinOp::Sub,
                        right,
                    },
                    _ => Tac::Binary {
                        dest: dest.clone(),
                        left: right,
                        op: BinOp::Eq,
                        right: "0".to_string(),
                    },
                };
                self.code.push(instruction);
                dest
            }
            ExprKind::Binary { left, token, right }
            | ExprKind::Comparison { left, token, right } => {
                let left = self.expression(left);
                let right = self.expression(right);
                let dest = self.temp();
                self.code.push(Tac::Binary {
                    dest: dest.clone(),
                    left,
                    op: BinOp::from_token(&token.kind),
                    right,
                });
                dest
            }
            // both operands are 0/1 ints, && multiplies and || adds
            ExprKind::Logical { left, token, right } => {
                let left = self.expression(left);
                let right = self.expression(right);
                let dest = self.temp();
                let op = match token.kind {
                    TokenKind::AmpAmp => BinOp::Mul,
                    _ => BinOp::Add,
                };
                self.code.push(Tac::Binary { dest: dest.clone(), left, op, right });
                dest
            }

            ExprKind::Call { callee, args, .. } => {
                let args = args.iter().map(|arg| self.expression(arg)).collect();
                match callee.as_ref() {
                    ExprKind::Selector { expr, field, .. } => {
                        // only the fmt builtins reach this point, they
                        // produce no value
                        let package = match expr.as_ref() {
                            ExprKind::Ident(name) => name.unwrap_string(),
                            _ => unreachable!("checked by typechecker"),
                        };
                        self.code.push(Tac::Call {
                            dest: None,
                            name: format!("{}.{}", package, field.unwrap_string()),
                            args,
                        });
                        "0".to_string()
                    }
                    ExprKind::Ident(name) => {
                        let dest = self.temp();
                        self.code.push(Tac::Call {
                            dest: Some(dest.clone()),
                            name: name.unwrap_string(),
                            args,
                        });
                        dest
                    }
                    _ => unreachable!("checked by typechecker"),
                }
            }

            ExprKind::Selector { .. } | ExprKind::Index { .. } | ExprKind::Slice { .. } => {
                self.operand_name(expr)
            }
            ExprKind::TypeAssert { expr, .. } => self.expression(expr),
            // aggregate values have no scalar representation, a zeroed
            // temporary stands in after the elements are evaluated
            ExprKind::CompositeLit { elems, .. } => {
                for elem in elems {
                    self.expression(elem);
                }
                let dest = self.temp();
                self.code.push(Tac::Copy { dest: dest.clone(), src: "0".to_string() });
                dest
            }
        }
    }

    // renders a place-expression as a plain operand name
    fn operand_name(&mut self, expr: &ExprKind) -> String {
        match expr {
            ExprKind::Ident(name) => name.unwrap_string(),
            ExprKind::Selector { expr, field, .. } => {
                format!("{}.{}", self.operand_name(expr), field.unwrap_string())
            }
            ExprKind::Index { expr, index, .. } => {
                let index = self.expression(index);
                format!("{}[{}]", self.operand_name(expr), index)
            }
            ExprKind::Slice { expr, low, high, .. } => {
                let low = low.as_ref().map(|e| self.expression(e)).unwrap_or_default();
                let high = high.as_ref().map(|e| self.expression(e)).unwrap_or_default();
                format!("{}[{}:{}]", self.operand_name(expr), low, high)
            }
            expr => self.expression(expr),
        }
    }

    fn temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_count);
        self.temp_count += 1;
        temp
    }
    fn label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }
    fn string_label(&mut self) -> String {
        let label = format!("str{}", self.string_count);
        self.string_count += 1;
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::Parser;
    use crate::compiler::scanner::Scanner;
    use crate::compiler::typechecker::TypeChecker;
    use std::path::Path;

    fn setup(input: &str) -> Vec<String> {
        let tokens = Scanner::new(Path::new(""), input)
            .scan_token()
            .expect("valid tokens in codegen tests");
        let source_file = Parser::new(tokens).parse().expect("valid syntax in codegen tests");
        TypeChecker::new()
            .check(&source_file)
            .expect("valid semantics in codegen tests");

        TacGen::new()
            .translate(&source_file)
            .iter()
            .map(|instruction| instruction.to_string())
            .collect()
    }
    fn setup_body(body: &str) -> Vec<String> {
        setup(&format!("package main\nfunc main() {{\n{}\n}}", body))
    }

    #[test]
    fn lowers_if_with_both_labels() {
        let actual = setup_body("x := 1\nif x < 5 { x = x + 1 }");
        let expected = vec![
            "FUNC main:",
            "x = 1",
            "t0 = x LT 5",
            "IF_FALSE t0 GOTO L0",
            "t1 = x ADD 1",
            "x = t1",
            "GOTO L1",
            "LABEL L0:",
            "LABEL L1:",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn lowers_if_else() {
        let actual = setup_body("x := 1\nif x < 5 { x = 2 } else { x = 3 }");
        let expected = vec![
            "FUNC main:",
            "x = 1",
            "t0 = x LT 5",
            "IF_FALSE t0 GOTO L0",
            "x = 2",
            "GOTO L1",
            "LABEL L0:",
            "x = 3",
            "LABEL L1:",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn lowers_for_with_bottom_tested_condition() {
        let actual = setup_body("for i := 0; i < 3; i++ { fmt.Println(i) }");
        let expected = vec![
            "FUNC main:",
            "i = 0",
            "GOTO L0",
            "LABEL L1:",
            "CALL fmt.Println i",
            "LABEL L2:",
            "i = i ADD 1",
            "LABEL L0:",
            "t0 = i LT 3",
            "IF_TRUE t0 GOTO L1",
            "LABEL L3:",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn lowers_infinite_for_as_backedge() {
        let actual = setup_body("for { break }");
        let expected = vec![
            "FUNC main:",
            "LABEL L0:",
            "GOTO L1",
            "GOTO L0",
            "LABEL L1:",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn lowers_switch_as_equality_chain() {
        let actual = setup_body("x := 2\nswitch x {\ncase 1:\nx = 10\ndefault:\nx = 20\n}");
        let expected = vec![
            "FUNC main:",
            "x = 2",
            "t0 = x EQ 1",
            "IF_TRUE t0 GOTO L1",
            "GOTO L2",
            "LABEL L1:",
            "x = 10",
            "GOTO L0",
            "LABEL L2:",
            "x = 20",
            "GOTO L0",
            "LABEL L0:",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn string_literals_become_data() {
        let actual = setup_body("fmt.Println(\"hi\")\nfmt.Println(\"hi\")");
        // identical literals are not deduplicated
        let expected = vec![
            "FUNC main:",
            "DATA str0 = \"hi\"",
            "CALL fmt.Println str0",
            "DATA str1 = \"hi\"",
            "CALL fmt.Println str1",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn calls_with_result_and_function_pairs() {
        let actual = setup(
            r#"package main
func add(a int, b int) int {
    return a + b
}
func main() {
    x := add(1, 2)
    fmt.Println(x)
}"#,
        );
        let expected = vec![
            "FUNC add:",
            "t0 = a ADD b",
            "RETURN t0",
            "END_FUNC add",
            "FUNC main:",
            "t1 = CALL add 1 2",
            "x = t1",
            "CALL fmt.Println x",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn temporaries_are_written_once() {
        let code = setup_body("a := 1\nb := 2\nc := a * b + a - b / a");
        let mut dests = Vec::new();
        for line in code {
            if let Some((dest, _)) = line.split_once(" = ") {
                if dest.starts_with('t') {
                    assert!(!dests.contains(&dest.to_string()), "temp {} reassigned", dest);
                    dests.push(dest.to_string());
                }
            }
        }
        assert_eq!(dests, vec!["t0", "t1", "t2", "t3"]);
    }
    #[test]
    fn skips_statements_the_typechecker_warned_about() {
        let actual = setup_body("a := 1\nb := 2\na, b = b, a");
        let expected = vec!["FUNC main:", "a = 1", "b = 2", "END_FUNC main"];
        assert_eq!(actual, expected);
    }
    #[test]
    fn unary_lowering() {
        let actual = setup_body("x := -3\ny := !x\ny = y");
        let expected = vec![
            "FUNC main:",
            "t0 = 0 SUB 3",
            "x = t0",
            "t1 = x EQ 0",
            "y = t1",
            "y = y",
            "END_FUNC main",
        ];
        assert_eq!(actual, expected);
    }
}
