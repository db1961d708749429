use minigo_compiler::compiler::common::error::MinigoError;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

const USAGE: &str = "\
usage: minigo [-o <file>] [-S] [--emit-asm] [--dump-ast] [--dump-tac]
              [--no-color] [-h | --help] [-v] <file>";

const HELP: &str = "usage: minigo [options] <file>
options:
    -o | --output <file>  Specifies the output-file to write to
    -S | --compile-only   Stops evaluation after emitting the backend source file (.c or .asm)
         --emit-asm       Emits NASM assembly and assembles it instead of going through C
         --dump-ast       Displays the AST produced by the parser while also compiling program as usual
         --dump-tac       Prints the three-address-code listing instead of compiling
         --no-color       Errors are printed without color
    -h                    Prints usage information
    --help                Prints elaborate help information
    -v | --version        Prints version information

file:
    The Go source file to be read";

fn sys_info(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(0);
}

pub struct CliOptions {
    // required argument specifying file to compile
    pub file_path: PathBuf,

    // optional argument specifying output-file to write to
    pub output_path: Option<PathBuf>,

    // stops evaluation after emitting the backend source file
    pub compile_only: bool,

    // uses the assembly backend instead of emitting C
    pub emit_asm: bool,

    // displays AST while also compiling program as usual
    pub dump_ast: bool,

    // prints the three-address-code listing instead of compiling
    pub dump_tac: bool,

    // errors are printed without color
    pub no_color: bool,
}
impl CliOptions {
    fn new() -> CliOptions {
        CliOptions {
            file_path: PathBuf::new(),
            output_path: None,
            compile_only: false,
            emit_asm: false,
            dump_ast: false,
            dump_tac: false,
            no_color: false,
        }
    }
    pub fn parse() -> Result<CliOptions, MinigoError> {
        let mut cli_options = CliOptions::new();
        let mut args = std::env::args().collect::<Vec<String>>().into_iter().skip(1);

        while let Some(arg) = args.next() {
            if arg.starts_with('-') {
                match arg.as_str() {
                    "-o" | "--output" => {
                        if let Some(file) = args.next() {
                            cli_options.output_path = Some(PathBuf::from(file));
                        } else {
                            return Err(MinigoError::Cli(vec![format!(
                                "expected file following '{}' option",
                                arg
                            )]));
                        }
                    }
                    "-S" | "--compile-only" => cli_options.compile_only = true,
                    "--emit-asm" => cli_options.emit_asm = true,
                    "--dump-ast" => cli_options.dump_ast = true,
                    "--dump-tac" => cli_options.dump_tac = true,
                    "--no-color" => cli_options.no_color = true,
                    "-h" => sys_info(USAGE),
                    "--help" => sys_info(HELP),
                    "-v" | "--version" => sys_info(VERSION),
                    _ => return Err(MinigoError::Cli(vec![format!("illegal option '{}'", arg)])),
                }
            } else {
                cli_options.file_path = PathBuf::from(arg);
            }
        }

        if cli_options.file_path.to_string_lossy().is_empty() {
            Err(MinigoError::Cli(vec!["no input files given".to_string()]))
        } else if let Some(Some("go")) = cli_options.file_path.extension().map(|s| s.to_str()) {
            Ok(cli_options)
        } else {
            Err(MinigoError::Cli(vec![format!(
                "file '{}' is not a valid Go source file",
                cli_options.file_path.display()
            )]))
        }
    }
}
