mod cli_options;
mod temp_file;

use cli_options::CliOptions;
use minigo_compiler::compiler::common::error::MinigoError;
use minigo_compiler::{compile, Backend};
use temp_file::{OutFile, TempFile};

use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    let cli_options = match CliOptions::parse() {
        Ok(cli_options) => cli_options,
        Err(err) => {
            err.print(false);
            std::process::exit(1);
        }
    };
    let no_color = cli_options.no_color;

    if let Err(err) = run(cli_options) {
        err.print(no_color);
        std::process::exit(1);
    }
}

fn run(cli_options: CliOptions) -> Result<(), MinigoError> {
    let source = fs::read_to_string(&cli_options.file_path).map_err(|err| {
        MinigoError::Sys(format!(
            "could not find {}: {}",
            cli_options.file_path.display(),
            err
        ))
    })?;

    let backend = if cli_options.dump_tac {
        Backend::Tac
    } else if cli_options.emit_asm {
        Backend::Nasm
    } else {
        Backend::C
    };

    let (output, warnings) = compile(&cli_options.file_path, &source, cli_options.dump_ast, backend)?;

    for warning in &warnings {
        warning.print_warning(cli_options.no_color);
    }

    if cli_options.dump_tac {
        print!("{}", output);
        return Ok(());
    }

    if cli_options.compile_only {
        let extension = if cli_options.emit_asm { "asm" } else { "c" };
        let out_file = match &cli_options.output_path {
            Some(path) => OutFile::Regular(path.clone()),
            None => OutFile::Regular(cli_options.file_path.with_extension(extension)),
        };
        return write_output(out_file.get(), &output);
    }

    let exe_file = match &cli_options.output_path {
        Some(path) => path.clone(),
        None => cli_options.file_path.with_extension(""),
    };

    if cli_options.emit_asm {
        let asm_file = OutFile::Temp(TempFile::new("asm"));
        write_output(asm_file.get(), &output)?;

        let obj_file = OutFile::Temp(TempFile::new("o"));
        run_command(
            Command::new("nasm")
                .arg("-felf64")
                .arg(asm_file.get())
                .arg("-o")
                .arg(obj_file.get()),
            "nasm",
        )?;
        run_command(
            Command::new("cc").arg(obj_file.get()).arg("-o").arg(&exe_file),
            "cc",
        )
    } else {
        let c_file = OutFile::Temp(TempFile::new("c"));
        write_output(c_file.get(), &output)?;

        run_command(
            Command::new("cc").arg(c_file.get()).arg("-o").arg(&exe_file),
            "cc",
        )
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), MinigoError> {
    fs::write(path, contents).map_err(|err| {
        MinigoError::Sys(format!("could not write to '{}': {}", path.display(), err))
    })
}

fn run_command(command: &mut Command, name: &str) -> Result<(), MinigoError> {
    let output = command
        .output()
        .map_err(|err| MinigoError::Sys(format!("could not invoke '{}': {}", name, err)))?;

    if !output.status.success() {
        return Err(MinigoError::Sys(format!(
            "'{}' failed: {}",
            name,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
