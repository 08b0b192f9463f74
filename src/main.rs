//! Kuchinawa CLI - typed Go AST to Python translator

use anyhow::{Context, Result};
use clap::Parser;
use kuchinawa::{translate_with_diagnostics, Bundle};
use std::path::PathBuf;

/// Kuchinawa - translate a typed AST bundle to Python source
#[derive(Parser, Debug)]
#[command(name = "kcn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate a typed Go AST bundle to Python", long_about = None)]
struct Cli {
    /// Input JSON bundle (typed files + type info) from a frontend
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output Python file (default: <INPUT>.py)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Dump the translated DST syntax tree and exit
    #[arg(long)]
    dump_ast: bool,

    /// Check only (don't generate output)
    #[arg(short, long)]
    check: bool,

    /// Emit JSON diagnostics to stderr (on failure only)
    #[arg(long)]
    diag_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let bundle: Bundle = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a valid bundle", cli.input.display()))?;

    if cli.dump_ast {
        let module = match kuchinawa::translate(&bundle.files, &bundle.info) {
            Ok(module) => module,
            Err(err) => {
                let diags = kuchinawa::diagnostics::from_error(&err, Some(&cli.input));
                print!("{}", diags.to_text());
                if cli.diag_json {
                    eprintln!("{}", diags.to_json());
                }
                std::process::exit(1);
            }
        };
        println!("=== Translated module ===");
        println!("{module:#?}");
        return Ok(());
    }

    let python = match translate_with_diagnostics(&bundle.files, &bundle.info, Some(&cli.input)) {
        Ok(text) => text,
        Err(diags) => {
            print!("{}", diags.to_text());
            if cli.diag_json {
                eprintln!("{}", diags.to_json());
            }
            std::process::exit(1);
        }
    };

    if cli.check {
        println!("✅ Translation successful!");
        return Ok(());
    }

    let output_path = cli.output.unwrap_or_else(|| {
        let mut p = cli.input.clone();
        p.set_extension("py");
        // If input has a path, use just the filename in current dir
        if let Some(filename) = p.file_name() {
            PathBuf::from(filename)
        } else {
            p
        }
    });

    std::fs::write(&output_path, &python)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    println!("✅ Translated to: {output_path:?}");

    Ok(())
}
