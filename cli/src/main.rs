use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use id_context_core::{Context, ContextDef};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "id-context")]
#[command(about = "Identifier schema checking, parsing, and validation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one or more schema definition files for construction errors.
    Check(CheckArgs),
    /// Print the component table of a schema definition.
    Inspect(InspectArgs),
    /// Split raw identifiers into their components without validating them.
    Parse(ParseArgs),
    /// Extract and validate raw identifiers against a schema.
    Validate(ValidateArgs),
    /// Join component values into a raw identifier string.
    Format(FormatArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema definition files (JSON or YAML).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Schema definition file.
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema definition file.
    #[arg(long)]
    schema: PathBuf,
    /// Raw identifiers; read from stdin (one per line) when omitted.
    identifiers: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema definition file.
    #[arg(long)]
    schema: PathBuf,
    /// Raw identifiers; read from stdin (one per line) when omitted.
    identifiers: Vec<String>,
}

#[derive(Debug, Args)]
struct FormatArgs {
    /// Schema definition file.
    #[arg(long)]
    schema: PathBuf,
    /// Component values, in schema order.
    #[arg(required = true)]
    components: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Format(args) => run_format(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    for path in &args.inputs {
        let def = load_definition(path)?;
        def.build()
            .map_err(|err| format!("Schema '{}' is invalid: {err}", path.display()))?;
    }
    println!("Checked {} schema file(s).", args.inputs.len());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let def = load_definition(&args.schema)?;
    let context = build_context(&args.schema, &def)?;

    #[derive(serde::Serialize)]
    struct ComponentRow<'a> {
        index: usize,
        name: &'a str,
        cardinality: &'static str,
        pattern: &'a str,
    }

    let rows: Vec<ComponentRow> = context
        .components()
        .iter()
        .enumerate()
        .map(|(index, component)| ComponentRow {
            index,
            name: component.name(),
            cardinality: cardinality_label(
                context.is_component_required(component.name()),
                context.is_component_unbounded_hierarchical(component.name()),
            ),
            pattern: component.pattern(),
        })
        .collect();

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|err| format!("Failed to serialize output: {err}"))?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&rows)
                .map_err(|err| format!("Failed to serialize output: {err}"))?;
            println!("{yaml}");
        }
        CliOutputFormat::Table => {
            println!("Context: {}", context.name());
            if let Some(separator) = context.separator() {
                let kind = if separator.is_literal() {
                    "literal"
                } else {
                    "pattern"
                };
                println!("Separator: {} ({kind})", separator.source());
            }
            for row in &rows {
                println!(
                    "  [{}] {} ({}) pattern: {}",
                    row.index, row.name, row.cardinality, row.pattern
                );
            }
        }
    }
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let def = load_definition(&args.schema)?;
    let context = build_context(&args.schema, &def)?;
    let identifiers = gather_identifiers(args.identifiers)?;

    #[derive(serde::Serialize)]
    struct ParsedIdentifier<'a> {
        identifier: &'a str,
        components: Vec<&'a str>,
    }

    let mut parsed = Vec::new();
    for identifier in &identifiers {
        let components = context
            .extract_components(identifier)
            .map_err(|err| format!("Failed to parse '{identifier}': {err}"))?;
        parsed.push(ParsedIdentifier {
            identifier: identifier.as_str(),
            components,
        });
    }

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&parsed)
                .map_err(|err| format!("Failed to serialize output: {err}"))?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&parsed)
                .map_err(|err| format!("Failed to serialize output: {err}"))?;
            println!("{yaml}");
        }
        CliOutputFormat::Table => {
            for entry in &parsed {
                println!("{}: {}", entry.identifier, entry.components.join(" | "));
            }
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let def = load_definition(&args.schema)?;
    let context = build_context(&args.schema, &def)?;
    let identifiers = gather_identifiers(args.identifiers)?;

    let mut failures = 0usize;
    for identifier in &identifiers {
        let outcome = context
            .extract_components(identifier)
            .and_then(|tokens| context.validate(&tokens));
        match outcome {
            Ok(()) => println!("ok: {identifier}"),
            Err(err) => {
                failures += 1;
                println!("invalid: {identifier} ({err})");
            }
        }
    }

    println!(
        "Validated {} identifier(s), {} failure(s).",
        identifiers.len(),
        failures
    );
    if failures > 0 {
        return Err(format!("{failures} identifier(s) failed validation"));
    }
    Ok(())
}

fn run_format(args: FormatArgs) -> Result<(), String> {
    let def = load_definition(&args.schema)?;
    let context = build_context(&args.schema, &def)?;
    let raw = context
        .format_components(&args.components)
        .map_err(|err| format!("Failed to format components: {err}"))?;
    println!("{raw}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loads a schema definition, choosing the format by file extension
/// (`.yaml`/`.yml` for YAML, JSON otherwise).
fn load_definition(path: &Path) -> Result<ContextDef, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display())),
        _ => serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display())),
    }
}

fn build_context(path: &Path, def: &ContextDef) -> Result<Context, String> {
    def.build()
        .map_err(|err| format!("Schema '{}' is invalid: {err}", path.display()))
}

/// Returns the given identifiers, or non-empty stdin lines when none were
/// passed on the command line.
fn gather_identifiers(identifiers: Vec<String>) -> Result<Vec<String>, String> {
    if !identifiers.is_empty() {
        return Ok(identifiers);
    }
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}

fn cardinality_label(required: bool, unbounded: bool) -> &'static str {
    match (required, unbounded) {
        (_, true) => "required, unbounded",
        (true, false) => "required",
        (false, false) => "optional",
    }
}

#[cfg(test)]
mod tests {
    use super::cardinality_label;

    #[test]
    fn test_cardinality_label() {
        assert_eq!(cardinality_label(true, false), "required");
        assert_eq!(cardinality_label(false, false), "optional");
        assert_eq!(cardinality_label(true, true), "required, unbounded");
    }
}
