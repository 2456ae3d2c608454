use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_spec_core::{CommandSpec, ParserInput, normalize_spec, parse, validate_spec};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "cmdspec")]
#[command(about = "Inspect and exercise declarative command specifications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a spec file and print the normalized output as JSON.
    Parse(ParseArgs),
    /// Print the token rules derived from a spec file's flags as JSON.
    Normalize(NormalizeArgs),
    /// Validate one or more spec files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Spec file (YAML or JSON).
    #[arg(long)]
    spec: PathBuf,
    /// Reject positional values beyond the declared arguments.
    #[arg(long)]
    strict: bool,
    /// Treat `--` inside the tokens as an ordinary value.
    #[arg(long)]
    no_double_dash: bool,
    /// Tokens to parse, given after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// Spec file (YAML or JSON).
    #[arg(long)]
    spec: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Spec files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Normalize(args) => run_normalize(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_spec(path: &Path) -> Result<CommandSpec, String> {
    CommandSpec::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize output: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let spec = load_spec(&args.spec)?;
    let input = ParserInput {
        strict: Some(args.strict),
        double_dash: Some(!args.no_double_dash),
        context: Some(format!("cmdspec parse {}", args.spec.display())),
        ..Default::default()
    };
    debug!(command = %spec.name, tokens = args.tokens.len(), "parsing tokens");

    let output = parse(&spec, &args.tokens, Some(&input)).map_err(|err| err.to_string())?;
    print_json(&output)
}

fn run_normalize(args: NormalizeArgs) -> Result<(), String> {
    let spec = load_spec(&args.spec)?;
    print_json(&normalize_spec(&spec.flags))
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = Vec::new();

    for path in &args.inputs {
        let spec = match load_spec(path) {
            Ok(spec) => spec,
            Err(err) => {
                failures.push(err);
                continue;
            }
        };
        for err in validate_spec(&spec) {
            failures.push(format!("{}: {err}", path.display()));
        }
    }

    if !failures.is_empty() {
        return Err(failures.join("\n"));
    }

    println!("Validated {} spec file(s).", args.inputs.len());
    Ok(())
}
