pub mod compiler;

use compiler::{
    codegen::{c, nasm, TacGen},
    common::error::*,
    parser::Parser,
    scanner::Scanner,
    typechecker::TypeChecker,
};

use std::path::Path;

/// The output form [compile] produces from the intermediate representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backend {
    /// The textual three-address-code listing itself
    Tac,
    /// A C translation unit for the system C compiler
    C,
    /// x86-64 NASM assembly
    Nasm,
}

pub fn compile(
    filename: &Path,
    source: &str,
    dump_ast: bool,
    backend: Backend,
) -> Result<(String, Vec<Warning>), Error> {
    // Scan input
    let tokens = Scanner::new(filename, source).scan_token()?;

    // Parse tokens and return Abstract Syntax Tree
    let source_file = Parser::new(tokens).parse()?;

    if dump_ast {
        eprintln!("{}", source_file);
    }

    // Check for semantic errors, collecting warnings for skipped constructs
    let warnings = TypeChecker::new().check(&source_file)?;

    // Turn AST into IR
    let code = TacGen::new().translate(&source_file);

    let output = match backend {
        Backend::Tac => {
            let mut listing = code
                .iter()
                .map(|instruction| instruction.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            listing.push('\n');
            listing
        }
        Backend::C => c::emit(&code),
        Backend::Nasm => nasm::emit(&code),
    };

    Ok((output, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_source_to_tac_listing() {
        let source = "package main\nfunc main() {\nx := 1\nif x < 5 { x = x + 1 }\n}";
        let (output, warnings) = compile(Path::new("main.go"), source, false, Backend::Tac).unwrap();

        let expected = "FUNC main:\n\
            x = 1\n\
            t0 = x LT 5\n\
            IF_FALSE t0 GOTO L0\n\
            t1 = x ADD 1\n\
            x = t1\n\
            GOTO L1\n\
            LABEL L0:\n\
            LABEL L1:\n\
            END_FUNC main\n";
        assert_eq!(output, expected);
        assert_eq!(warnings.len(), 1);
    }
    #[test]
    fn recompiling_is_deterministic() {
        let source = "package main\nfunc main() {\nfmt.Println(\"twice\")\n}";
        let first = compile(Path::new("main.go"), source, false, Backend::Tac).unwrap();
        let second = compile(Path::new("main.go"), source, false, Backend::Tac).unwrap();
        assert_eq!(first.0, second.0);
    }
    #[test]
    fn scan_errors_abort_compilation() {
        let source = "package main\nfunc main() {\ns := \"unterminated\n}";
        let err = compile(Path::new("main.go"), source, false, Backend::Tac).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
    }
}
