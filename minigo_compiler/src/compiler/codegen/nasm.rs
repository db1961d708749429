//! Renders [three-address-code](super::tac) into x86-64 NASM assembly using
//! the System V calling convention.<br>
//! Every name gets a qword slot in `.bss`, values move through `rax`/`rcx`,
//! printing goes through libc `printf`.

use crate::compiler::codegen::tac::{BinOp, Tac};

const ARG_REGISTERS: [&str; 5] = ["rsi", "rdx", "rcx", "r8", "r9"];

pub fn emit(code: &[Tac]) -> String {
    let data_labels: Vec<&str> = code
        .iter()
        .filter_map(|instruction| match instruction {
            Tac::Data { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();

    let mut out = String::from("section .data\n");
    for instruction in code {
        if let Tac::Data { label, value } = instruction {
            // backquotes make NASM honor the C-style escapes in the literal
            out.push_str(&format!("{}: db `{}`, 0\n", label, value));
        }
    }
    out.push_str("fmt_int: db \"%ld\", 0\n");
    out.push_str("fmt_int_sp: db \"%ld \", 0\n");
    out.push_str("fmt_str: db \"%s\", 0\n");
    out.push_str("fmt_str_sp: db \"%s \", 0\n");
    out.push_str("fmt_nl: db 10, 0\n");

    out.push_str("\nsection .bss\n");
    let mut slots: Vec<&str> = Vec::new();
    for instruction in code {
        for operand in operands(instruction) {
            if is_name(operand) && !data_labels.contains(&operand) && !slots.contains(&operand) {
                slots.push(operand);
            }
        }
    }
    for slot in &slots {
        out.push_str(&format!("{}: resq 1\n", slot));
    }

    out.push_str("\nsection .text\n");
    out.push_str("global main\n");
    out.push_str("extern printf\n\n");

    for instruction in code {
        match instruction {
            Tac::FuncBegin(name) => {
                out.push_str(&format!("{}:\n", name));
                out.push_str("    push rbp\n");
                out.push_str("    mov rbp, rsp\n");
            }
            Tac::FuncEnd(_) => {
                out.push_str("    xor eax, eax\n");
                out.push_str("    pop rbp\n");
                out.push_str("    ret\n\n");
            }
            Tac::Label(label) => out.push_str(&format!("{}:\n", label)),
            Tac::Goto(label) => out.push_str(&format!("    jmp {}\n", label)),
            Tac::IfFalse { cond, target } => {
                load(&mut out, "rax", cond, &data_labels);
                out.push_str("    test rax, rax\n");
                out.push_str(&format!("    je {}\n", target));
            }
            Tac::IfTrue { cond, target } => {
                load(&mut out, "rax", cond, &data_labels);
                out.push_str("    test rax, rax\n");
                out.push_str(&format!("    jne {}\n", target));
            }
            Tac::Copy { dest, src } => {
                load(&mut out, "rax", src, &data_labels);
                out.push_str(&format!("    mov [rel {}], rax\n", dest));
            }
            Tac::Binary { dest, left, op, right } => {
                load(&mut out, "rax", left, &data_labels);
                load(&mut out, "rcx", right, &data_labels);
                match op {
                    BinOp::Add => out.push_str("    add rax, rcx\n"),
                    BinOp::Sub => out.push_str("    sub rax, rcx\n"),
                    BinOp::Mul => out.push_str("    imul rax, rcx\n"),
                    BinOp::Div => {
                        out.push_str("    cqo\n");
                        out.push_str("    idiv rcx\n");
                    }
                    op => {
                        out.push_str("    cmp rax, rcx\n");
                        out.push_str(&format!("    {} al\n", set_instruction(op)));
                        out.push_str("    movzx rax, al\n");
                    }
                }
                out.push_str(&format!("    mov [rel {}], rax\n", dest));
            }
            Tac::Call { dest, name, args } => emit_call(&mut out, dest, name, args, &data_labels),
            Tac::Return(value) => {
                match value {
                    Some(value) => load(&mut out, "rax", value, &data_labels),
                    None => out.push_str("    xor eax, eax\n"),
                }
                out.push_str("    pop rbp\n");
                out.push_str("    ret\n");
            }
            Tac::Data { .. } => (),
        }
    }

    out
}

fn emit_call(
    out: &mut String,
    dest: &Option<String>,
    name: &str,
    args: &[String],
    data_labels: &[&str],
) {
    match name {
        "fmt.Println" | "fmt.Print" => {
            for (index, arg) in args.iter().enumerate() {
                let last = index + 1 == args.len();
                load(out, "rsi", arg, data_labels);
                let format = match (data_labels.contains(&arg.as_str()), last) {
                    (true, true) => "fmt_str",
                    (true, false) => "fmt_str_sp",
                    (false, true) => "fmt_int",
                    (false, false) => "fmt_int_sp",
                };
                out.push_str(&format!("    lea rdi, [rel {}]\n", format));
                out.push_str("    xor eax, eax\n");
                out.push_str("    call printf\n");
            }
            if name == "fmt.Println" {
                out.push_str("    lea rdi, [rel fmt_nl]\n");
                out.push_str("    xor eax, eax\n");
                out.push_str("    call printf\n");
            }
        }
        "fmt.Printf" => {
            if let Some(format) = args.first() {
                for (arg, register) in args[1..].iter().zip(ARG_REGISTERS) {
                    load(out, register, arg, data_labels);
                }
                out.push_str(&format!("    lea rdi, [rel {}]\n", format));
                out.push_str("    xor eax, eax\n");
                out.push_str("    call printf\n");
            }
        }
        _ => {
            out.push_str(&format!("    call {}\n", name));
            if let Some(dest) = dest {
                out.push_str(&format!("    mov [rel {}], rax\n", dest));
            }
        }
    }
}

// numeric literals become immediates, data labels an address, names a load
fn load(out: &mut String, register: &str, operand: &str, data_labels: &[&str]) {
    if operand.parse::<i64>().is_ok() {
        out.push_str(&format!("    mov {}, {}\n", register, operand));
    } else if let Ok(float) = operand.parse::<f64>() {
        out.push_str(&format!("    mov {}, {}\n", register, float as i64));
    } else if data_labels.contains(&operand) {
        out.push_str(&format!("    lea {}, [rel {}]\n", register, operand));
    } else {
        out.push_str(&format!("    mov {}, [rel {}]\n", register, operand));
    }
}

fn set_instruction(op: &BinOp) -> &'static str {
    match op {
        BinOp::Le => "setle",
        BinOp::Lt => "setl",
        BinOp::Ge => "setge",
        BinOp::Gt => "setg",
        BinOp::Eq => "sete",
        BinOp::Ne => "setne",
        _ => unreachable!("arithmetic ops have no set-instruction"),
    }
}

fn operands(instruction: &Tac) -> Vec<&str> {
    match instruction {
        Tac::Copy { dest, src } => vec![dest, src],
        Tac::Binary { dest, left, right, .. } => vec![dest, left, right],
        Tac::IfFalse { cond, .. } | Tac::IfTrue { cond, .. } => vec![cond],
        Tac::Call { dest, args, .. } => {
            let mut operands: Vec<&str> = dest.iter().map(String::as_str).collect();
            operands.extend(args.iter().map(String::as_str));
            operands
        }
        Tac::Return(Some(value)) => vec![value],
        _ => Vec::new(),
    }
}

fn is_name(operand: &str) -> bool {
    operand
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && operand.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::codegen::TacGen;
    use crate::compiler::parser::Parser;
    use crate::compiler::scanner::Scanner;
    use crate::compiler::typechecker::TypeChecker;
    use std::path::Path;

    fn setup(input: &str) -> String {
        let tokens = Scanner::new(Path::new(""), input)
            .scan_token()
            .expect("valid tokens in emitter tests");
        let source_file = Parser::new(tokens).parse().expect("valid syntax in emitter tests");
        TypeChecker::new()
            .check(&source_file)
            .expect("valid semantics in emitter tests");
        emit(&TacGen::new().translate(&source_file))
    }
    fn setup_body(body: &str) -> String {
        setup(&format!("package main\nfunc main() {{\n{}\n}}", body))
    }

    #[test]
    fn reserves_a_slot_per_name() {
        let output = setup_body("x := 1\ny := x + 2");
        assert!(output.contains("section .bss\n"));
        assert!(output.contains("x: resq 1"));
        assert!(output.contains("y: resq 1"));
        assert!(output.contains("t0: resq 1"));
        assert_eq!(output.matches("x: resq 1").count(), 1);
    }
    #[test]
    fn comparisons_use_setcc() {
        let output = setup_body("x := 1\nif x < 5 { x = 2 }");
        assert!(output.contains("    cmp rax, rcx\n"));
        assert!(output.contains("    setl al\n"));
        assert!(output.contains("    movzx rax, al\n"));
        assert!(output.contains("    test rax, rax\n"));
        assert!(output.contains("    je L0\n"));
    }
    #[test]
    fn string_data_and_printf() {
        let output = setup_body("fmt.Println(\"hi\", 1)");
        assert!(output.contains("str0: db `hi`, 0"));
        assert!(output.contains("    lea rdi, [rel fmt_str_sp]\n"));
        assert!(output.contains("    lea rdi, [rel fmt_int]\n"));
        assert!(output.contains("    lea rdi, [rel fmt_nl]\n"));
        assert!(output.contains("extern printf\n"));
    }
    #[test]
    fn functions_get_prologue_and_epilogue() {
        let output = setup(
            r#"package main
func add(a int, b int) int {
    return a + b
}
func main() {
    x := add(1, 2)
    x = x
}"#,
        );
        assert!(output.contains("global main\n"));
        assert!(output.contains("add:\n    push rbp\n    mov rbp, rsp\n"));
        assert!(output.contains("main:\n    push rbp\n    mov rbp, rsp\n"));
        assert!(output.contains("    call add\n"));
        assert!(output.contains("    mov [rel t1], rax\n"));
        assert!(output.contains("    pop rbp\n    ret\n"));
    }
}
