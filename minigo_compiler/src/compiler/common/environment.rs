//! The symbol-table used to store information about declared identifiers

use crate::compiler::common::{error::*, token::*, types::*};
use std::collections::HashMap;

/// The information stored for an identifier in the symbol-table
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    /// Type of identifier given in declaration
    pub ty: Type,

    /// The declaring token, used to point diagnostics at the declaration
    pub token: Token,
}

type Scope = HashMap<String, Symbol>;

/// A stack of scopes which are popped when a block is exited.
/// Declarations always go into the innermost scope, lookups walk
/// from innermost to outermost.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}
impl Environment {
    pub fn new() -> Self {
        Environment { scopes: vec![Scope::new()] }
    }
    pub fn is_global(&self) -> bool {
        self.scopes.len() == 1
    }
    pub fn enter(&mut self) {
        self.scopes.push(Scope::new());
    }
    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    // checks if element is in current scope
    pub fn get_current(&self, expected: &str) -> Option<&Symbol> {
        self.scopes.last().expect("always have a global scope").get(expected)
    }

    pub fn declare_symbol(&mut self, name: &Token, ty: Type) -> Result<(), Error> {
        if self.get_current(&name.unwrap_string()).is_some() {
            return Err(Error::new(name, ErrorKind::Redefinition(name.unwrap_string())));
        }

        self.scopes
            .last_mut()
            .expect("always have a global scope")
            .insert(name.unwrap_string(), Symbol { ty, token: name.clone() });
        Ok(())
    }

    pub fn get_symbol(&self, name: &Token) -> Result<&Symbol, Error> {
        self.get(&name.unwrap_string())
            .ok_or_else(|| Error::new(name, ErrorKind::UndeclaredSymbol(name.unwrap_string())))
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::default(TokenKind::Ident(name.to_string()))
    }

    #[test]
    fn builds_symbol_table() {
        // func main() {
        //     var s string
        //     {
        //         var n int
        //     }
        //     var n float64
        // }

        let mut env = Environment::new();

        env.declare_symbol(&ident("main"), Type::Function).unwrap();
        env.enter();
        assert!(env.get_current("main").is_none());
        assert!(env.get("main").is_some());

        env.declare_symbol(&ident("s"), Type::String).unwrap();
        assert!(env.get_current("s").is_some());

        env.enter();
        env.declare_symbol(&ident("n"), Type::Int).unwrap();
        assert!(env.get_current("n").is_some());
        assert!(env.get_current("s").is_none());
        assert!(env.get("s").is_some());
        env.exit();

        // inner binding must not leak out
        assert!(env.get("n").is_none());

        env.declare_symbol(&ident("n"), Type::Float64).unwrap();
        assert!(matches!(env.get("n"), Some(Symbol { ty: Type::Float64, .. })));

        env.exit();
        assert!(env.get("s").is_none());
        assert!(env.get("main").is_some());
    }

    #[test]
    fn shadowing_resolves_innermost() {
        let mut env = Environment::new();

        env.declare_symbol(&ident("x"), Type::Int).unwrap();
        env.enter();
        env.declare_symbol(&ident("x"), Type::String).unwrap();
        assert!(matches!(env.get("x"), Some(Symbol { ty: Type::String, .. })));
        env.exit();
        assert!(matches!(env.get("x"), Some(Symbol { ty: Type::Int, .. })));
    }

    #[test]
    fn rejects_redeclaration_in_same_scope() {
        let mut env = Environment::new();

        env.declare_symbol(&ident("x"), Type::Int).unwrap();
        let err = env.declare_symbol(&ident("x"), Type::Int).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition("x".to_string()));

        // same name in a nested scope is fine
        env.enter();
        assert!(env.declare_symbol(&ident("x"), Type::Int).is_ok());
        env.exit();
    }

    #[test]
    fn lookup_fails_when_absent_in_all_scopes() {
        let mut env = Environment::new();
        env.enter();

        let err = env.get_symbol(&ident("nope")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndeclaredSymbol("nope".to_string()));
    }
}
