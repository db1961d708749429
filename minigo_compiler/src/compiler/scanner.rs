//! Converts the raw source text into [tokens](Token).
//! A scanner is constructed fresh per pass over the immutable source, so
//! re-lexing identical input always yields an identical token sequence.

use crate::compiler::common::{error::*, token::*};
use std::collections::HashMap;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

pub struct Scanner<'a> {
    // Source used for iterating
    source: Peekable<Chars<'a>>,

    // The raw source lines, used to attach the offending line to diagnostics
    raw_source: Vec<&'a str>,

    filename: &'a Path,
    line: i32,
    column: i32,

    // Reserved keywords which cannot be an identifier
    keywords: HashMap<&'a str, TokenKind>,
}
impl<'a> Scanner<'a> {
    pub fn new(filename: &'a Path, source: &'a str) -> Self {
        Scanner {
            source: source.chars().peekable(),
            raw_source: source.split('\n').collect(),
            filename,
            line: 1,
            column: 1,
            keywords: HashMap::from([
                ("package", TokenKind::Package),
                ("import", TokenKind::Import),
                ("func", TokenKind::Func),
                ("var", TokenKind::Var),
                ("type", TokenKind::Type),
                ("struct", TokenKind::Struct),
                ("if", TokenKind::If),
                ("else", TokenKind::Else),
                ("for", TokenKind::For),
                ("switch", TokenKind::Switch),
                ("case", TokenKind::Case),
                ("default", TokenKind::Default),
                ("break", TokenKind::Break),
                ("continue", TokenKind::Continue),
                ("return", TokenKind::Return),
                ("true", TokenKind::True),
                ("false", TokenKind::False),
                ("int", TokenKind::IntType),
                ("float64", TokenKind::Float64Type),
                ("bool", TokenKind::BoolType),
                ("string", TokenKind::StringType),
            ]),
        }
    }

    pub fn scan_token(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens: Vec<Token> = Vec::new();

        while let Some(c) = self.next_char() {
            let start_column = self.column - 1;
            match c {
                '(' => tokens.push(self.token(TokenKind::LeftParen, start_column)),
                ')' => tokens.push(self.token(TokenKind::RightParen, start_column)),
                '{' => tokens.push(self.token(TokenKind::LeftBrace, start_column)),
                '}' => tokens.push(self.token(TokenKind::RightBrace, start_column)),
                '[' => tokens.push(self.token(TokenKind::LeftBracket, start_column)),
                ']' => tokens.push(self.token(TokenKind::RightBracket, start_column)),
                ',' => tokens.push(self.token(TokenKind::Comma, start_column)),
                '.' => tokens.push(self.token(TokenKind::Dot, start_column)),
                ';' => tokens.push(self.token(TokenKind::Semicolon, start_column)),

                '+' => {
                    let kind = self.match_next('+', TokenKind::PlusPlus, TokenKind::Plus);
                    tokens.push(self.token(kind, start_column));
                }
                '-' => {
                    let kind = self.match_next('-', TokenKind::MinusMinus, TokenKind::Minus);
                    tokens.push(self.token(kind, start_column));
                }
                '*' => tokens.push(self.token(TokenKind::Star, start_column)),
                '!' => {
                    let kind = self.match_next('=', TokenKind::BangEqual, TokenKind::Bang);
                    tokens.push(self.token(kind, start_column));
                }
                '=' => {
                    let kind = self.match_next('=', TokenKind::EqualEqual, TokenKind::Equal);
                    tokens.push(self.token(kind, start_column));
                }
                '<' => {
                    let kind = self.match_next('=', TokenKind::LessEqual, TokenKind::Less);
                    tokens.push(self.token(kind, start_column));
                }
                '>' => {
                    let kind = self.match_next('=', TokenKind::GreaterEqual, TokenKind::Greater);
                    tokens.push(self.token(kind, start_column));
                }
                ':' => {
                    let kind = self.match_next('=', TokenKind::ColonEqual, TokenKind::Colon);
                    tokens.push(self.token(kind, start_column));
                }
                '&' => {
                    if self.matches('&') {
                        tokens.push(self.token(TokenKind::AmpAmp, start_column));
                    } else {
                        return Err(self.error(ErrorKind::UnexpectedChar('&'), start_column));
                    }
                }
                '|' => {
                    if self.matches('|') {
                        tokens.push(self.token(TokenKind::PipePipe, start_column));
                    } else {
                        return Err(self.error(ErrorKind::UnexpectedChar('|'), start_column));
                    }
                }

                '/' => {
                    if self.matches('/') {
                        self.line_comment();
                    } else if self.matches('*') {
                        self.block_comment(start_column)?;
                    } else {
                        tokens.push(self.token(TokenKind::Slash, start_column));
                    }
                }
                ' ' | '\r' | '\t' | '\n' => (),

                '"' => {
                    let string = self.string(start_column)?;
                    tokens.push(self.token(TokenKind::String(string), start_column));
                }

                _ => {
                    if c.is_ascii_digit() {
                        let kind = self.number(c, start_column)?;
                        tokens.push(self.token(kind, start_column));
                    } else if c.is_alphabetic() || c == '_' {
                        let mut value = String::new();
                        value.push(c);
                        while let Some(v) = self
                            .source
                            .next_if(|c| c.is_alphanumeric() || *c == '_')
                        {
                            self.column += 1;
                            value.push(v);
                        }
                        if let Some(kw) = self.keywords.get(value.as_str()) {
                            tokens.push(self.token(kw.clone(), start_column));
                        } else {
                            tokens.push(self.token(TokenKind::Ident(value), start_column));
                        }
                    } else {
                        return Err(self.error(ErrorKind::UnexpectedChar(c), start_column));
                    }
                }
            }
        }

        Ok(tokens)
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.source.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn matches(&mut self, expected: char) -> bool {
        match self.source.peek() {
            Some(c) if *c == expected => {
                self.next_char();
                true
            }
            _ => false,
        }
    }
    fn match_next(&mut self, expected: char, if_match: TokenKind, if_not: TokenKind) -> TokenKind {
        match self.matches(expected) {
            true => if_match,
            false => if_not,
        }
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.source.peek() {
            if *c == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn block_comment(&mut self, start_column: i32) -> Result<(), Error> {
        let (start_line, start_line_string) = (self.line, self.line_string());

        while let Some(c) = self.next_char() {
            if c == '*' && self.matches('/') {
                return Ok(());
            }
        }
        Err(Error {
            line_index: start_line,
            line_string: start_line_string,
            column: start_column,
            filename: self.filename.into(),
            kind: ErrorKind::UnterminatedComment,
        })
    }

    // strings cannot span lines, an unclosed quote fails the whole pass
    fn string(&mut self, start_column: i32) -> Result<String, Error> {
        let mut result = String::new();

        while let Some(c) = self.source.peek() {
            match c {
                '"' => {
                    self.next_char();
                    return Ok(result);
                }
                '\n' => break,
                '\\' => {
                    self.next_char();
                    result.push('\\');
                    if let Some(escaped) = self.next_char() {
                        result.push(escaped);
                    }
                }
                _ => {
                    let c = self.next_char().expect("just peeked");
                    result.push(c);
                }
            }
        }
        Err(self.error(ErrorKind::UnterminatedString, start_column))
    }

    fn number(&mut self, first: char, start_column: i32) -> Result<TokenKind, Error> {
        let mut num = String::new();
        num.push(first);

        while let Some(digit) = self.source.next_if(|c| c.is_ascii_digit()) {
            self.column += 1;
            num.push(digit);
        }

        // a dot only belongs to the literal when a digit follows, `1.foo` stays
        // a number followed by a selector
        let mut lookahead = self.source.clone();
        lookahead.next();
        if self.source.peek() == Some(&'.') && lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
            num.push('.');
            while let Some(digit) = self.source.next_if(|c| c.is_ascii_digit()) {
                self.column += 1;
                num.push(digit);
            }
            return num
                .parse::<f64>()
                .map(TokenKind::FloatNum)
                .map_err(|_| self.error(ErrorKind::InvalidNumber(num.clone()), start_column));
        }

        num.parse::<i64>()
            .map(TokenKind::Number)
            .map_err(|_| self.error(ErrorKind::InvalidNumber(num.clone()), start_column))
    }

    fn line_string(&self) -> String {
        self.raw_source
            .get(self.line as usize - 1)
            .unwrap_or(&"")
            .to_string()
    }
    fn token(&self, kind: TokenKind, start_column: i32) -> Token {
        Token::new(kind, self.line, start_column, self.line_string(), self.filename.into())
    }
    fn error(&self, kind: ErrorKind, start_column: i32) -> Error {
        Error {
            line_index: self.line,
            line_string: self.line_string(),
            column: start_column,
            filename: self.filename.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn setup_generic(input: &str) -> Vec<Token> {
        match Scanner::new(Path::new(""), input).scan_token() {
            Ok(tokens) => tokens,
            Err(_) => unreachable!("want to test successful scan"),
        }
    }
    fn setup_generic_err(input: &str) -> Error {
        match Scanner::new(Path::new(""), input).scan_token() {
            Err(err) => err,
            Ok(_) => unreachable!("want to test errors"),
        }
    }
    fn test_token(token: TokenKind, line_index: i32, column: i32, line_string: &str) -> Token {
        Token {
            kind: token,
            line_index,
            column,
            line_string: line_string.to_string(),
            filename: PathBuf::new(),
        }
    }

    // helper functions when other token-information isn't necessary
    fn setup(input: &str) -> Vec<TokenKind> {
        setup_generic(input).into_iter().map(|e| e.kind).collect()
    }
    fn setup_err(input: &str) -> ErrorKind {
        setup_generic_err(input).kind
    }

    #[test]
    fn basic_single_and_double_tokens() {
        let actual = setup_generic("!= = > == \n\n    ;");
        let expected = vec![
            test_token(TokenKind::BangEqual, 1, 1, "!= = > == "),
            test_token(TokenKind::Equal, 1, 4, "!= = > == "),
            test_token(TokenKind::Greater, 1, 6, "!= = > == "),
            test_token(TokenKind::EqualEqual, 1, 8, "!= = > == "),
            test_token(TokenKind::Semicolon, 3, 5, "    ;"),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn relexing_is_idempotent() {
        let input = "x := 1\nif x < 5 { x = x + 1 }";
        let first = setup_generic(input);
        let second = setup_generic(input);
        assert_eq!(first, second);
    }
    #[test]
    fn ignores_comments() {
        let actual = setup("// this is a    comment\n\n!this");
        let expected = vec![TokenKind::Bang, TokenKind::Ident("this".to_string())];
        assert_eq!(actual, expected);
    }
    #[test]
    fn ignores_block_comments() {
        let actual = setup("a /* stretches\nover lines */ b");
        let expected = vec![
            TokenKind::Ident("a".to_string()),
            TokenKind::Ident("b".to_string()),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn errors_on_unterminated_block_comment() {
        assert_eq!(setup_err("a /* no end"), ErrorKind::UnterminatedComment);
    }
    #[test]
    fn token_basic_math_expression() {
        let actual = setup("3 + 1 / 4");
        let expected = vec![
            TokenKind::Number(3),
            TokenKind::Plus,
            TokenKind::Number(1),
            TokenKind::Slash,
            TokenKind::Number(4),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn float_literals() {
        let actual = setup("1.5 + 2");
        let expected = vec![
            TokenKind::FloatNum(1.5),
            TokenKind::Plus,
            TokenKind::Number(2),
        ];
        assert_eq!(actual, expected);

        // dot without trailing digit belongs to a selector, not the number
        let actual = setup("1.x");
        let expected = vec![
            TokenKind::Number(1),
            TokenKind::Dot,
            TokenKind::Ident("x".to_string()),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn matches_keywords_and_strings() {
        let actual = setup("var some string = \"this is a string\"");
        let expected = vec![
            TokenKind::Var,
            TokenKind::Ident("some".to_string()),
            TokenKind::StringType,
            TokenKind::Equal,
            TokenKind::String("this is a string".to_string()),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn multichar_go_operators() {
        let actual = setup("x := 1\ni++\nj--\na && b || c");
        let expected = vec![
            TokenKind::Ident("x".to_string()),
            TokenKind::ColonEqual,
            TokenKind::Number(1),
            TokenKind::Ident("i".to_string()),
            TokenKind::PlusPlus,
            TokenKind::Ident("j".to_string()),
            TokenKind::MinusMinus,
            TokenKind::Ident("a".to_string()),
            TokenKind::AmpAmp,
            TokenKind::Ident("b".to_string()),
            TokenKind::PipePipe,
            TokenKind::Ident("c".to_string()),
        ];
        assert_eq!(actual, expected);
    }
    #[test]
    fn errors_on_unterminated_string() {
        assert_eq!(setup_err("var some = \"this is a string"), ErrorKind::UnterminatedString);
    }
    #[test]
    fn stops_at_first_invalid_char() {
        let actual = setup_generic_err("var c = 0$\n\n%");
        let expected = Error {
            line_index: 1,
            column: 10,
            filename: PathBuf::from(""),
            line_string: "var c = 0$".to_string(),
            kind: ErrorKind::UnexpectedChar('$'),
        };
        assert_eq!(actual, expected);
    }
    #[test]
    fn single_amp_is_invalid() {
        assert_eq!(setup_err("a & b"), ErrorKind::UnexpectedChar('&'));
    }
    #[test]
    fn scans_full_function() {
        let actual = setup("package main\nfunc main() {\n  x := 1\n  if x < 5 { x = x + 1 }\n}\n");
        let expected = vec![
            TokenKind::Package,
            TokenKind::Ident("main".to_string()),
            TokenKind::Func,
            TokenKind::Ident("main".to_string()),
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::Ident("x".to_string()),
            TokenKind::ColonEqual,
            TokenKind::Number(1),
            TokenKind::If,
            TokenKind::Ident("x".to_string()),
            TokenKind::Less,
            TokenKind::Number(5),
            TokenKind::LeftBrace,
            TokenKind::Ident("x".to_string()),
            TokenKind::Equal,
            TokenKind::Ident("x".to_string()),
            TokenKind::Plus,
            TokenKind::Number(1),
            TokenKind::RightBrace,
            TokenKind::RightBrace,
        ];
        assert_eq!(actual, expected);
    }
}
