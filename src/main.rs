use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use lolparse::{interpreter, lexer, parser};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        if arg.starts_with('-') {
            bail!("Unknown option '{arg}'");
        }
        input_path = Some(arg);
        if args.next().is_some() {
            bail!("Only one input file is supported");
        }
        break;
    }

    let (source, file) = if let Some(path) = input_path {
        let source = fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?;
        (source, path)
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        (buffer, "<stdin>".to_string())
    };

    let tokens = lexer::tokenize(&source, &file)?;
    let program = parser::parse_tokens(tokens)?;
    let output = interpreter::run(&program)?;
    if !output.is_empty() {
        print!("{output}");
    }
    Ok(())
}
