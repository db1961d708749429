//! The three-address-code instructions emitted by [codegen](super) and
//! rendered into their textual form by the [Display] impls

use crate::compiler::common::token::TokenKind;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Le,
    Lt,
    Ge,
    Gt,
    Eq,
    Ne,
}
impl BinOp {
    pub fn from_token(kind: &TokenKind) -> BinOp {
        match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::LessEqual => BinOp::Le,
            TokenKind::Less => BinOp::Lt,
            TokenKind::GreaterEqual => BinOp::Ge,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::EqualEqual => BinOp::Eq,
            TokenKind::BangEqual => BinOp::Ne,
            kind => unreachable!("operator {} is rejected by the parser", kind),
        }
    }
}
impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinOp::Add => "ADD",
                BinOp::Sub => "SUB",
                BinOp::Mul => "MUL",
                BinOp::Div => "DIV",
                BinOp::Le => "LE",
                BinOp::Lt => "LT",
                BinOp::Ge => "GE",
                BinOp::Gt => "GT",
                BinOp::Eq => "EQ",
                BinOp::Ne => "NE",
            }
        )
    }
}

/// A single instruction, operands are plain names: declared variables,
/// generated temporaries, numeric literals or string-data labels
#[derive(Debug, Clone, PartialEq)]
pub enum Tac {
    FuncBegin(String),
    FuncEnd(String),
    Label(String),
    Goto(String),
    IfFalse { cond: String, target: String },
    IfTrue { cond: String, target: String },
    Copy { dest: String, src: String },
    Binary { dest: String, left: String, op: BinOp, right: String },
    Call { dest: Option<String>, name: String, args: Vec<String> },
    Return(Option<String>),
    Data { label: String, value: String },
}

impl Display for Tac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tac::FuncBegin(name) => write!(f, "FUNC {}:", name),
            Tac::FuncEnd(name) => write!(f, "END_FUNC {}", name),
            Tac::Label(label) => write!(f, "LABEL {}:", label),
            Tac::Goto(label) => write!(f, "GOTO {}", label),
            Tac::IfFalse { cond, target } => write!(f, "IF_FALSE {} GOTO {}", cond, target),
            Tac::IfTrue { cond, target } => write!(f, "IF_TRUE {} GOTO {}", cond, target),
            Tac::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Tac::Binary { dest, left, op, right } => {
                write!(f, "{} = {} {} {}", dest, left, op, right)
            }
            Tac::Call { dest, name, args } => {
                if let Some(dest) = dest {
                    write!(f, "{} = CALL {}", dest, name)?;
                } else {
                    write!(f, "CALL {}", name)?;
                }
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Tac::Return(value) => match value {
                Some(value) => write!(f, "RETURN {}", value),
                None => write!(f, "RETURN"),
            },
            Tac::Data { label, value } => write!(f, "DATA {} = \"{}\"", label, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_instruction_text() {
        assert_eq!(Tac::FuncBegin("main".to_string()).to_string(), "FUNC main:");
        assert_eq!(Tac::FuncEnd("main".to_string()).to_string(), "END_FUNC main");
        assert_eq!(Tac::Label("L0".to_string()).to_string(), "LABEL L0:");
        assert_eq!(Tac::Goto("L1".to_string()).to_string(), "GOTO L1");
        assert_eq!(
            Tac::IfFalse { cond: "t0".to_string(), target: "L0".to_string() }.to_string(),
            "IF_FALSE t0 GOTO L0"
        );
        assert_eq!(
            Tac::Binary {
                dest: "t1".to_string(),
                left: "x".to_string(),
                op: BinOp::Add,
                right: "1".to_string(),
            }
            .to_string(),
            "t1 = x ADD 1"
        );
        assert_eq!(
            Tac::Copy { dest: "x".to_string(), src: "t1".to_string() }.to_string(),
            "x = t1"
        );
        assert_eq!(
            Tac::Call {
                dest: Some("t0".to_string()),
                name: "add".to_string(),
                args: vec!["1".to_string(), "2".to_string()],
            }
            .to_string(),
            "t0 = CALL add 1 2"
        );
        assert_eq!(
            Tac::Call {
                dest: None,
                name: "fmt.Println".to_string(),
                args: vec!["str0".to_string()],
            }
            .to_string(),
            "CALL fmt.Println str0"
        );
        assert_eq!(Tac::Return(None).to_string(), "RETURN");
        assert_eq!(Tac::Return(Some("t0".to_string())).to_string(), "RETURN t0");
        assert_eq!(
            Tac::Data { label: "str0".to_string(), value: "hi".to_string() }.to_string(),
            "DATA str0 = \"hi\""
        );
    }

    #[test]
    fn maps_operator_tokens() {
        assert_eq!(BinOp::from_token(&TokenKind::Plus), BinOp::Add);
        assert_eq!(BinOp::from_token(&TokenKind::Slash), BinOp::Div);
        assert_eq!(BinOp::from_token(&TokenKind::LessEqual), BinOp::Le);
        assert_eq!(BinOp::from_token(&TokenKind::BangEqual), BinOp::Ne);
    }
}
