use std::{
    cell::RefCell,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
    rc::Rc,
};

use clap::Parser;

use tinybasic::RunError;

/// Runs a line-oriented BASIC-like script.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file to run.
    file: PathBuf,

    /// Print the token stream instead of running the program.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program instead of running it.
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,
}

// sysexits(3)
const EX_OK: u8 = 0;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

fn main() -> ExitCode {
    let args = Cli::parse();
    ExitCode::from(run_cli(&args, Rc::new(RefCell::new(std::io::stdout()))))
}

/// Reads a script, terminating its last line so a trailing label or
/// statement is always followed by a line break.
fn read_source(path: &Path) -> std::io::Result<String> {
    let mut source = std::fs::read_to_string(path)?;
    source.push('\n');
    Ok(source)
}

fn run_cli(args: &Cli, stdout: Rc<RefCell<dyn Write>>) -> u8 {
    let source = match read_source(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.file.display(), e);
            return EX_NOINPUT;
        }
    };

    if args.tokens {
        return tokens_command(&source, stdout);
    }

    if args.ast {
        return ast_command(&source, stdout);
    }

    match tinybasic::run(&source, stdout) {
        Ok(()) => EX_OK,
        Err(e @ RunError::Parse(_)) => {
            eprintln!("{e}");
            EX_DATAERR
        }
        Err(e @ RunError::Execution(_)) => {
            eprintln!("{e}");
            EX_SOFTWARE
        }
    }
}

fn tokens_command(source: &str, stdout: Rc<RefCell<dyn Write>>) -> u8 {
    let mut out = stdout.borrow_mut();
    for token in tinybasic::tokenizer::tokens(source) {
        if let Err(e) = writeln!(out, "{}", token) {
            eprintln!("{e}");
            return EX_IOERR;
        }
    }
    EX_OK
}

fn ast_command(source: &str, stdout: Rc<RefCell<dyn Write>>) -> u8 {
    let tokens = tinybasic::tokenizer::tokens(source);
    match tinybasic::parser::program(&tokens) {
        Ok(program) => match write!(stdout.borrow_mut(), "{program}") {
            Ok(()) => EX_OK,
            Err(e) => {
                eprintln!("{e}");
                EX_IOERR
            }
        },
        Err(e) => {
            eprintln!("{e}");
            EX_DATAERR
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Script {
        path: PathBuf,
    }

    impl Script {
        fn new(name: &str, source: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "tinybasic-{}-{}.bas",
                std::process::id(),
                name
            ));
            std::fs::write(&path, source).expect("Should write script");
            Self { path }
        }
    }

    impl Drop for Script {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn cli(args: &[&str], path: &Path) -> (u8, String) {
        let path = path.to_str().expect("Temp path should be UTF-8");
        let args = Cli::try_parse_from(
            std::iter::once("tinybasic")
                .chain(args.iter().copied())
                .chain(std::iter::once(path)),
        )
        .expect("Arguments should parse");
        let output = Rc::new(RefCell::new(Vec::<u8>::new()));
        let code = run_cli(&args, output.clone());
        let output = String::from_utf8(output.take()).expect("Output should be valid UTF-8");
        (code, output)
    }

    #[test]
    fn test_read_source_appends_line_break() {
        let script = Script::new("read", "print 1");
        assert_eq!(read_source(&script.path).unwrap(), "print 1\n");
    }

    #[test]
    fn test_last_line_without_line_break_runs() {
        let script = Script::new("last-line", "x = 2\nprint x * 3");
        assert_eq!(cli(&[], &script.path), (EX_OK, "6.0\n".to_string()));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "tinybasic-{}-does-not-exist.bas",
            std::process::id()
        ));
        assert_eq!(cli(&[], &path), (EX_NOINPUT, String::new()));
    }

    #[test]
    fn test_tokens_listing() {
        let script = Script::new("tokens", "x = 1");
        let (code, output) = cli(&["--tokens"], &script.path);
        assert_eq!(code, EX_OK);
        assert_eq!(
            output,
            "word         x\n=            =\nnumber       1\nline break\n"
        );
    }

    #[test]
    fn test_ast_listing() {
        let script = Script::new("ast", "x = 0\ntop\nx = x + 1\nif x < 3 then top");
        let (code, output) = cli(&["--ast"], &script.path);
        assert_eq!(code, EX_OK);
        assert_eq!(output, "x = 0\ntop\nx = (x + 1)\nif (x < 3) then top\n");
    }

    #[test]
    fn test_parse_error_exit_code() {
        let script = Script::new("parse-error", "print 1\nif x top\n");
        let (code, output) = cli(&[], &script.path);
        assert_eq!(code, EX_DATAERR);
        assert_eq!(output, "");
        assert_eq!(cli(&["--ast"], &script.path).0, EX_DATAERR);
    }

    #[test]
    fn test_runtime_error_exit_code() {
        let script = Script::new("runtime-error", "print 1\nprint 1 + \"abc\"\nprint 2\n");
        assert_eq!(cli(&[], &script.path), (EX_SOFTWARE, "1.0\n".to_string()));
    }

    #[test]
    fn test_tokens_and_ast_conflict() {
        assert!(Cli::try_parse_from(["tinybasic", "--tokens", "--ast", "x.bas"]).is_err());
    }
}
