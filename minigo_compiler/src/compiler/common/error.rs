//! The errors and warnings emitted throughout all of minigo

use crate::compiler::common::{token::*, types::*};
use std::path::PathBuf;

/// The high-level error type, which is used by both lib.rs and main.rs
#[derive(Debug)]
pub enum MinigoError {
    /// Error produced by [compiler](crate::compiler) (scanning/parsing/typechecking etc)
    Comp(Error),
    /// Error when doing system operations (invoking cc/nasm etc)
    Sys(String),
    /// Error in passing cli-arguments (passing invalid argument)
    Cli(Vec<String>),
}
impl MinigoError {
    pub fn print(self, no_color: bool) {
        match self {
            MinigoError::Comp(error) => {
                error.print_error(no_color);
            }
            MinigoError::Cli(errors) => {
                for e in &errors {
                    eprintln!("minigo: <command-line>: {}", e);
                }
            }
            MinigoError::Sys(error) => {
                eprintln!("minigo: {}", error);
            }
        }
    }
}
impl From<Error> for MinigoError {
    fn from(compiler_error: Error) -> MinigoError {
        MinigoError::Comp(compiler_error)
    }
}

/// All error-types in [minigo_compiler](crate). A stage stops at its first error,
/// so every variant aborts the whole compilation run.
#[derive(Debug, PartialEq, Clone)]
pub enum ErrorKind {
    // scan errors
    UnexpectedChar(char),
    UnterminatedString,
    UnterminatedComment,
    InvalidNumber(String),
    Eof(&'static str),

    // parsing errors
    ExpectedExpression(TokenKind),
    NotType(TokenKind),
    InvalidAssignTarget(&'static str),

    // typechecker errors
    Redefinition(String),
    UndeclaredSymbol(String),
    UndeclaredFunction(String),
    NotFunction(String, Type),
    TypeMismatch(Type, Type),
    InvalidBinary(TokenKind, Type, Type),
    InvalidUnary(TokenKind, Type),
    InvalidIncrementType(Type),
    NotIndexable(Type),

    Regular(&'static str), // generic error message when message only used once
}

impl ErrorKind {
    /// The error message being emitted by an error
    pub fn message(&self) -> String {
        match self {
            ErrorKind::UnexpectedChar(c) => format!("unexpected character: {:?}", c),
            ErrorKind::UnterminatedString => "unterminated string".to_string(),
            ErrorKind::UnterminatedComment => "unterminated block comment".to_string(),
            ErrorKind::InvalidNumber(lit) => {
                format!("cannot parse number literal '{}'", lit)
            }
            ErrorKind::Eof(s) => format!("{}, found end of file", s),

            ErrorKind::ExpectedExpression(token) => format!("expected expression, found: {}", token),
            ErrorKind::NotType(token) => format!("expected type, found {}", token),
            ErrorKind::InvalidAssignTarget(s) => {
                format!("left side of {} must be an identifier", s)
            }

            ErrorKind::Redefinition(name) => format!("redefinition of symbol '{}'", name),
            ErrorKind::UndeclaredSymbol(name) => format!("undeclared symbol '{}'", name),
            ErrorKind::UndeclaredFunction(name) => format!("call to undeclared function '{}'", name),
            ErrorKind::NotFunction(name, ty) => {
                format!("'{}' is not a function, declared as '{}'", name, ty)
            }
            ErrorKind::TypeMismatch(left, right) => {
                format!("mismatched types: expected '{}', found '{}'", left, right)
            }
            ErrorKind::InvalidBinary(token, left, right) => {
                format!(
                    "invalid binary expression: '{}' {} '{}', both operands must be 'int'",
                    left, token, right
                )
            }
            ErrorKind::InvalidUnary(token, ty) => {
                format!("invalid unary expression: {} '{}', operand must be 'int'", token, ty)
            }
            ErrorKind::InvalidIncrementType(ty) => {
                format!("cannot increment value of type '{}'", ty)
            }
            ErrorKind::NotIndexable(ty) => format!("index expression must be 'int', found '{}'", ty),

            ErrorKind::Regular(s) => s.to_string(),
        }
    }
}

/// Main error used throughout [minigo_compiler](crate)
#[derive(Debug, PartialEq, Clone)]
pub struct Error {
    pub line_index: i32,
    pub line_string: String,
    pub column: i32,
    pub filename: PathBuf,
    pub kind: ErrorKind,
}
impl Error {
    pub fn new(object: &impl Location, kind: ErrorKind) -> Self {
        Error {
            line_index: object.line_index(),
            line_string: object.line_string(),
            column: object.column(),
            filename: object.filename(),
            kind,
        }
    }
    /// HACK: should never be used because in theory there is always a last token
    pub fn eof(expected: &'static str) -> Self {
        Error {
            line_index: -1,
            line_string: String::from(""),
            filename: PathBuf::from("current file"),
            column: -1,
            kind: ErrorKind::Eof(expected),
        }
    }
    /// Prints the error to `stderr` using all of its location information.<br>
    /// If `no_color` is specified then only prints without any highlighting and color codes.
    pub fn print_error(&self, no_color: bool) {
        eprintln!(
            "{}: {}",
            color_text("error", Color::Red, true, no_color),
            color_text(&self.kind.message(), Color::White, true, no_color),
        );
        print_location(self, no_color);
    }
}
impl Location for Error {
    fn line_index(&self) -> i32 {
        self.line_index
    }
    fn column(&self) -> i32 {
        self.column
    }
    fn line_string(&self) -> String {
        self.line_string.clone()
    }
    fn filename(&self) -> PathBuf {
        self.filename.clone()
    }
}

/// The warnings emitted by the typechecker for constructs which are accepted
/// but ignored, printed in the same caret style as errors.
#[derive(Debug, PartialEq, Clone)]
pub enum WarningKind {
    UntypedVar(String),
    MultiShortVarDecl,
    MultiAssign,
    NonBoolCondition(Type),
}
impl WarningKind {
    pub fn message(&self) -> String {
        match self {
            WarningKind::UntypedVar(name) => {
                format!(
                    "variable '{}' declared without type or initializer, declaration is skipped",
                    name
                )
            }
            WarningKind::MultiShortVarDecl => {
                "':=' with multiple names is not supported, declaration is skipped".to_string()
            }
            WarningKind::MultiAssign => {
                "assignment to multiple targets is not supported, statement is skipped".to_string()
            }
            WarningKind::NonBoolCondition(ty) => {
                format!("condition is of type '{}', not 'bool'", ty)
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Warning {
    pub line_index: i32,
    pub line_string: String,
    pub column: i32,
    pub filename: PathBuf,
    pub kind: WarningKind,
}
impl Warning {
    pub fn new(object: &impl Location, kind: WarningKind) -> Self {
        Warning {
            line_index: object.line_index(),
            line_string: object.line_string(),
            column: object.column(),
            filename: object.filename(),
            kind,
        }
    }
    pub fn print_warning(&self, no_color: bool) {
        eprintln!(
            "{}: {}",
            color_text("warning", Color::Yellow, true, no_color),
            color_text(&self.kind.message(), Color::White, true, no_color),
        );
        print_location(self, no_color);
    }
}
impl Location for Warning {
    fn line_index(&self) -> i32 {
        self.line_index
    }
    fn column(&self) -> i32 {
        self.column
    }
    fn line_string(&self) -> String {
        self.line_string.clone()
    }
    fn filename(&self) -> PathBuf {
        self.filename.clone()
    }
}

fn print_location(object: &impl Location, no_color: bool) {
    let line_index = object.line_index();
    if line_index == -1 {
        return;
    }

    eprintln!(
        "{}  {} in {}:{}:{}",
        color_text("|", Color::Blue, false, no_color),
        color_text("-->", Color::Blue, false, no_color),
        color_text(&object.filename().display().to_string(), Color::White, false, no_color),
        line_index,
        object.column(),
    );

    let line_length = line_index.to_string().len();

    eprintln!("{}", color_text("|", Color::Blue, false, no_color));
    eprintln!(
        "{} {}",
        color_text(&line_index.to_string(), Color::Blue, true, no_color),
        object.line_string()
    );
    eprint!("{}", color_text("|", Color::Blue, false, no_color));
    for _ in 1..object.column() as usize + line_length {
        eprint!(" ");
    }
    eprintln!("{}", color_text("^", Color::Red, true, no_color));
}

/// Trait which can be implemented by different error-tokens which are all locatable
pub trait Location {
    fn line_index(&self) -> i32;
    fn column(&self) -> i32;
    fn line_string(&self) -> String;
    fn filename(&self) -> PathBuf;
}
enum Color {
    Red,
    Blue,
    White,
    Yellow,
}
impl Color {
    fn code(&self) -> usize {
        match self {
            Color::Red => 31,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::White => 37,
        }
    }
}
fn color_text(text: &str, color: Color, bold: bool, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!(
            "\x1b[{};{}m{}\x1b[0m",
            color.code(),
            if bold { "1" } else { "" },
            text
        )
    }
}
