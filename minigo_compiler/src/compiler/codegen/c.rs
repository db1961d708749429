//! Renders [three-address-code](super::tac) into a single C translation unit
//! which is handed to the system C compiler.<br>
//! Every operand lives in a `long`, string-data becomes `static` pointers and
//! the branch instructions map directly onto `goto`.

use crate::compiler::codegen::tac::{BinOp, Tac};

pub fn emit(code: &[Tac]) -> String {
    let data_labels: Vec<&str> = code
        .iter()
        .filter_map(|instruction| match instruction {
            Tac::Data { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();

    let mut out = String::from("#include <stdio.h>\n\n");

    for instruction in code {
        if let Tac::Data { label, value } = instruction {
            out.push_str(&format!("static const char *{} = \"{}\";\n", label, value));
        }
    }
    if !data_labels.is_empty() {
        out.push('\n');
    }

    for instruction in code {
        if let Tac::FuncBegin(name) = instruction {
            if name != "main" {
                out.push_str(&format!("long {}();\n", name));
            }
        }
    }
    out.push('\n');

    let mut index = 0;
    while index < code.len() {
        if let Tac::FuncBegin(name) = &code[index] {
            let end = code[index + 1..]
                .iter()
                .position(|instruction| matches!(instruction, Tac::FuncEnd(_)))
                .map(|position| index + 1 + position)
                .unwrap_or(code.len());
            emit_function(&mut out, name, &code[index + 1..end], &data_labels);
            index = end + 1;
        } else {
            index += 1;
        }
    }

    out
}

fn emit_function(out: &mut String, name: &str, body: &[Tac], data_labels: &[&str]) {
    if name == "main" {
        out.push_str("int main() {\n");
    } else {
        out.push_str(&format!("long {}() {{\n", name));
    }

    // every name the function touches becomes a zeroed local
    let mut locals: Vec<&str> = Vec::new();
    for instruction in body {
        for operand in operands(instruction) {
            if is_name(operand) && !data_labels.contains(&operand) && !locals.contains(&operand) {
                locals.push(operand);
            }
        }
    }
    for local in &locals {
        out.push_str(&format!("    long {} = 0;\n", local));
    }
    if !locals.is_empty() {
        out.push('\n');
    }

    for instruction in body {
        match instruction {
            Tac::Label(label) => out.push_str(&format!("{}:;\n", label)),
            Tac::Goto(label) => out.push_str(&format!("    goto {};\n", label)),
            Tac::IfFalse { cond, target } => {
                out.push_str(&format!("    if (!({})) goto {};\n", cond, target))
            }
            Tac::IfTrue { cond, target } => {
                out.push_str(&format!("    if ({}) goto {};\n", cond, target))
            }
            Tac::Copy { dest, src } => {
                out.push_str(&format!("    {} = {};\n", dest, operand(src, data_labels)))
            }
            Tac::Binary { dest, left, op, right } => out.push_str(&format!(
                "    {} = {} {} {};\n",
                dest,
                operand(left, data_labels),
                c_op(op),
                operand(right, data_labels)
            )),
            Tac::Call { dest, name, args } => emit_call(out, dest, name, args, data_labels),
            Tac::Return(value) => match value {
                Some(value) => {
                    out.push_str(&format!("    return {};\n", operand(value, data_labels)))
                }
                None => out.push_str("    return 0;\n"),
            },
            Tac::Data { .. } | Tac::FuncBegin(_) | Tac::FuncEnd(_) => (),
        }
    }

    out.push_str("    return 0;\n}\n\n");
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
            let format = args
                .iter()
                .map(|arg| if data_labels.contains(&arg.as_str()) { "%s" } else { "%ld" })
                .collect::<Vec<&str>>()
                .join(" ");
            let newline = if name == "fmt.Println" { "\\n" } else { "" };
            let mut call = format!("    printf(\"{}{}\"", format, newline);
            for arg in args {
                call.push_str(&format!(", {}", arg));
            }
            out.push_str(&format!("{});\n", call));
        }
        "fmt.Printf" => {
            // the first argument is the format string itself
            let mut call = String::from("    printf(");
            call.push_str(args.first().map(String::as_str).unwrap_or("\"\""));
            for arg in &args[1.min(args.len())..] {
                call.push_str(&format!(", {}", operand(arg, data_labels)));
            }
            out.push_str(&format!("{});\n", call));
        }
        _ => {
            let args = args
                .iter()
                .map(|arg| operand(arg, data_labels))
                .collect::<Vec<String>>()
                .join(", ");
            match dest {
                Some(dest) => out.push_str(&format!("    {} = {}({});\n", dest, name, args)),
                None => out.push_str(&format!("    {}({});\n", name, args)),
            }
        }
    }
}

// string-data used as a plain value is cast, a `long` holds the pointer
fn operand(operand: &str, data_labels: &[&str]) -> String {
    if data_labels.contains(&operand) {
        format!("(long){}", operand)
    } else {
        operand.to_string()
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

fn c_op(op: &BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Le => "<=",
        BinOp::Lt => "<",
        BinOp::Ge => ">=",
        BinOp::Gt => ">",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
    }
}
