use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// x86-64 assembly
    Asm,
    /// The token stream, one token per line
    Tokens,
    /// The parsed syntax tree
    Ast,
    /// Canonically formatted source
    Fmt,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input source file
    input: PathBuf,
    /// Output path. Defaults to the input path with a `.s` extension for assembly,
    /// and to stdout for every other kind of output.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// What to produce.
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    emit: Emit,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let (output, diagnostics) = match args.emit {
        Emit::Asm => {
            let compilation = slangc::compile(&source);
            (compilation.assembly, compilation.diagnostics)
        }
        Emit::Tokens => {
            let dump = parser::tokenize(&source)
                .iter()
                .map(|token| {
                    format!(
                        "{}:{} {:?} {:?}\n",
                        token.span.line, token.span.column, token.kind, token.lexeme
                    )
                })
                .collect();
            (Some(dump), Vec::new())
        }
        Emit::Ast | Emit::Fmt => {
            let (program, diagnostics) = parser::parse(&source);
            let text = if args.emit == Emit::Ast {
                format!("{:#?}\n", program)
            } else {
                program.to_string()
            };
            (diagnostics.is_empty().then_some(text), diagnostics)
        }
    };

    for diagnostic in &diagnostics {
        eprintln!("{}:{}", args.input.display(), diagnostic);
    }
    let Some(output) = output.filter(|_| diagnostics.is_empty()) else {
        return Ok(ExitCode::FAILURE);
    };

    match output_path(&args) {
        Some(path) => fs::write(&path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }
    Ok(ExitCode::SUCCESS)
}

fn output_path(args: &Args) -> Option<PathBuf> {
    match (&args.output, args.emit) {
        (Some(path), _) => Some(path.clone()),
        (None, Emit::Asm) => Some(default_asm_path(&args.input)),
        (None, _) => None,
    }
}

fn default_asm_path(input: &Path) -> PathBuf {
    input.with_extension("s")
}
