//! Command line front end for `validecor`.
//!
//! Signatures are JSON documents (see [`validators::SignatureDecl`]). `check`
//! resolves one call against a target signature (and optionally a source
//! signature) and prints the call the wrapped function would receive.
//! `describe` prints a signature with the `repr` of every annotation entry.
//!
//! ## Architectural Layer
//!
//! **Composition root.** This crate wires the library crates to files, flags,
//! and the tracing subscriber. It holds no validation rules of its own.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use validecor::{validecor, ArgMap, ArgSpec, CallArgs, ValidecorError, Value};
use validators::{load_signature, Registry};

#[derive(Parser, Debug)]
#[command(name = "validecor")]
#[command(version, about = "Resolve and validate calls against declared signatures")]
pub struct Cli {
    /// Log output format. Filtering follows `RUST_LOG`.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a call and print the arguments the target receives
    Check {
        /// Target signature (the decorated callable)
        #[arg(long, value_name = "FILE")]
        signature: PathBuf,

        /// Source signature the caller uses, if it differs from the target
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Positional arguments as a JSON array
        #[arg(long, default_value = "[]")]
        args: String,

        /// Keyword arguments as a JSON object
        #[arg(long, default_value = "{}")]
        kwargs: String,
    },

    /// Print a signature and its annotations
    Describe {
        /// Signature to describe
        #[arg(long, value_name = "FILE")]
        signature: PathBuf,
    },
}

/// Result of a command that ran to completion.
#[derive(Debug)]
pub enum Outcome {
    /// Text for stdout.
    Output(String),
    /// The call was refused; the error goes to stderr.
    Rejected(ValidecorError),
}

/// Executes `command`. Unreadable files, malformed documents and bad flag
/// values are errors; a refused call is an [`Outcome::Rejected`].
pub fn run(command: &Command, registry: &Registry) -> Result<Outcome> {
    match command {
        Command::Check { signature, source, args, kwargs } => {
            let target = read_signature(signature, registry)?;
            let mut decor = validecor(target)?;
            if let Some(path) = source {
                decor = decor.with_source(read_signature(path, registry)?)?;
            }
            let call = parse_call(args, kwargs)?;
            info!(
                function = decor.target().name(),
                source = decor.source().map(ArgSpec::name),
                "resolving call"
            );
            match decor.resolve(&call) {
                Ok(resolved) => Ok(Outcome::Output(serde_json::to_string(&resolved)?)),
                Err(err) => Ok(Outcome::Rejected(err)),
            }
        }
        Command::Describe { signature } => {
            let spec = read_signature(signature, registry)?;
            Ok(Outcome::Output(describe(&spec)))
        }
    }
}

fn read_signature(path: &Path, registry: &Registry) -> Result<ArgSpec> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read signature {}", path.display()))?;
    load_signature(&text, registry)
        .with_context(|| format!("failed to load signature {}", path.display()))
}

fn parse_call(args: &str, kwargs: &str) -> Result<CallArgs> {
    let positional: Vec<Value> =
        serde_json::from_str(args).context("--args must be a JSON array")?;
    let keyword: ArgMap =
        serde_json::from_str(kwargs).context("--kwargs must be a JSON object")?;
    Ok(CallArgs { positional, keyword })
}

/// Renders a signature followed by one line per annotation.
pub fn describe(spec: &ArgSpec) -> String {
    let mut out = spec.to_string();
    for (name, annotation) in spec.annotations() {
        let metadata: Vec<String> = annotation.metadata.iter().map(ToString::to_string).collect();
        // Writing to a String cannot fail.
        let _ = write!(out, "\n  {name}: {} [{}]", annotation.arg_type, metadata.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use validecor::ErrorType;

    const TRANSFER: &str = r#"{
        "name": "transfer",
        "params": [{"name": "amount"}, {"name": "note", "default": ""}],
        "kwonly": [{"name": "currency", "default": "EUR"}],
        "annotations": [
            {"param": "amount", "type": "int",
             "metadata": [{"is_typable": null}, {"between": [0, 1000]}]}
        ]
    }"#;

    fn file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn check(signature: &NamedTempFile, args: &str, kwargs: &str) -> Outcome {
        let command = Command::Check {
            signature: signature.path().to_path_buf(),
            source: None,
            args: args.into(),
            kwargs: kwargs.into(),
        };
        run(&command, &Registry::with_builtins()).unwrap()
    }

    #[test]
    fn check_prints_resolved_call() {
        let sig = file(TRANSFER);
        match check(&sig, r#"["250"]"#, "{}") {
            Outcome::Output(text) => {
                let value: Value = serde_json::from_str(&text).unwrap();
                assert_eq!(
                    value,
                    serde_json::json!({"args": [250, ""], "kwargs": {"currency": "EUR"}})
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    #[case(r#"["5000"]"#, "{}", ErrorType::ArgVal)]
    #[case("[]", "{}", ErrorType::ArgMiss)]
    #[case("[1]", r#"{"fee": 2}"#, ErrorType::ArgCount)]
    fn check_reports_rejections(#[case] args: &str, #[case] kwargs: &str, #[case] expected: ErrorType) {
        let sig = file(TRANSFER);
        match check(&sig, args, kwargs) {
            Outcome::Rejected(err) => assert_eq!(err.error_type(), expected),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn check_with_source_signature_maps_arguments() {
        let target = file(
            r#"{"name": "greet", "params": [{"name": "who"}],
                "annotations": [{"param": "who", "type": "str",
                                 "metadata": [{"map": ["request", "user", {"call": "upper"}]}]}]}"#,
        );
        let source = file(r#"{"name": "handle", "params": [{"name": "request"}]}"#);
        let command = Command::Check {
            signature: target.path().to_path_buf(),
            source: Some(source.path().to_path_buf()),
            args: r#"[{"user": "ada"}]"#.into(),
            kwargs: "{}".into(),
        };
        match run(&command, &Registry::with_builtins()).unwrap() {
            Outcome::Output(text) => assert_eq!(text, r#"{"args":["ADA"],"kwargs":{}}"#),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_flags_and_files_are_errors() {
        let sig = file(TRANSFER);
        let command = Command::Check {
            signature: sig.path().to_path_buf(),
            source: None,
            args: "{}".into(),
            kwargs: "{}".into(),
        };
        let err = run(&command, &Registry::with_builtins()).unwrap_err();
        assert!(err.to_string().contains("--args"), "{err}");

        let command = Command::Describe { signature: PathBuf::from("/nonexistent/sig.json") };
        assert!(run(&command, &Registry::with_builtins()).is_err());
    }

    #[test]
    fn describe_lists_annotations() {
        let sig = file(TRANSFER);
        let command = Command::Describe { signature: sig.path().to_path_buf() };
        match run(&command, &Registry::with_builtins()).unwrap() {
            Outcome::Output(text) => assert_eq!(
                text,
                "transfer(amount, note=\"\", *, currency=\"EUR\")\n  amount: int [IsTypable(), Between(0,1000)]"
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parses_global_log_format() {
        let cli = Cli::try_parse_from([
            "validecor",
            "describe",
            "--signature",
            "sig.json",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Describe { .. }));
    }
}
