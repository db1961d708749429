use crate::compiler::common::error::Location;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Semicolon,
    Colon,

    // One or two character tokens.
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Star,
    Slash,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    AmpAmp,
    PipePipe,
    ColonEqual,

    // Literals.
    Ident(String),
    String(String),
    Number(i64),
    FloatNum(f64),
    True,
    False,

    // Keywords.
    Package,
    Import,
    Func,
    Var,
    Type,
    Struct,
    If,
    Else,
    For,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,

    // Builtin type names.
    IntType,
    Float64Type,
    BoolType,
    StringType,
}
impl TokenKind {
    pub fn is_type_start(&self) -> bool {
        matches!(
            self,
            TokenKind::IntType
                | TokenKind::Float64Type
                | TokenKind::BoolType
                | TokenKind::StringType
                | TokenKind::Ident(..)
                | TokenKind::Struct
                | TokenKind::LeftBracket
        )
    }
}
impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenKind::LeftParen => "'('",
                TokenKind::RightParen => "')'",
                TokenKind::LeftBrace => "'{'",
                TokenKind::RightBrace => "'}'",
                TokenKind::LeftBracket => "'['",
                TokenKind::RightBracket => "']'",
                TokenKind::Comma => "','",
                TokenKind::Dot => "'.'",
                TokenKind::Semicolon => "';'",
                TokenKind::Colon => "':'",
                TokenKind::Plus => "'+'",
                TokenKind::PlusPlus => "'++'",
                TokenKind::Minus => "'-'",
                TokenKind::MinusMinus => "'--'",
                TokenKind::Star => "'*'",
                TokenKind::Slash => "'/'",
                TokenKind::Bang => "'!'",
                TokenKind::BangEqual => "'!='",
                TokenKind::Equal => "'='",
                TokenKind::EqualEqual => "'=='",
                TokenKind::Greater => "'>'",
                TokenKind::GreaterEqual => "'>='",
                TokenKind::Less => "'<'",
                TokenKind::LessEqual => "'<='",
                TokenKind::AmpAmp => "'&&'",
                TokenKind::PipePipe => "'||'",
                TokenKind::ColonEqual => "':='",
                TokenKind::Ident(..) => "identifier",
                TokenKind::String(_) => "string",
                TokenKind::Number(..) => "number",
                TokenKind::FloatNum(..) => "number",
                TokenKind::True => "'true'",
                TokenKind::False => "'false'",
                TokenKind::Package => "'package'",
                TokenKind::Import => "'import'",
                TokenKind::Func => "'func'",
                TokenKind::Var => "'var'",
                TokenKind::Type => "'type'",
                TokenKind::Struct => "'struct'",
                TokenKind::If => "'if'",
                TokenKind::Else => "'else'",
                TokenKind::For => "'for'",
                TokenKind::Switch => "'switch'",
                TokenKind::Case => "'case'",
                TokenKind::Default => "'default'",
                TokenKind::Break => "'break'",
                TokenKind::Continue => "'continue'",
                TokenKind::Return => "'return'",
                TokenKind::IntType => "'int'",
                TokenKind::Float64Type => "'float64'",
                TokenKind::BoolType => "'bool'",
                TokenKind::StringType => "'string'",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line_index: i32,
    pub column: i32,
    pub line_string: String,
    pub filename: PathBuf,
}
impl Token {
    pub fn new(
        kind: TokenKind,
        line_index: i32,
        column: i32,
        line_string: String,
        filename: PathBuf,
    ) -> Self {
        Token {
            kind,
            line_index,
            column,
            line_string,
            filename,
        }
    }
    pub fn default(kind: TokenKind) -> Self {
        Token {
            kind,
            line_index: -1,
            line_string: "".to_string(),
            filename: PathBuf::new(),
            column: -1,
        }
    }
    pub fn unwrap_string(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) => s.clone(),
            TokenKind::String(s) => s.clone(),
            _ => panic!("cant unwrap string on {} token", self.kind),
        }
    }
}
impl PartialEq for Token {
    fn eq(&self, other: &Token) -> bool {
        self.line_index == other.line_index
            && self.column == other.column
            && self.filename == other.filename
            && std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }
}

impl Location for Token {
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
