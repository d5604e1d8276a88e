//! `normalize-zodgen` command-line driver.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use normalize_zodgen::{GenerateOptions, ZodgenConfig, generate, generate_declarations};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum InputFormat {
    /// TypeScript declarations
    #[default]
    Typescript,
    /// Declarations in the JSON IR
    Json,
}

/// Generate Zod validators from TypeScript type declarations
#[derive(Parser, Debug)]
#[command(name = "normalize-zodgen", version)]
struct Args {
    /// Input file (`-` for stdin)
    input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Binding name of the schema library
    #[arg(long)]
    alias: Option<String>,

    /// Config file (defaults to zodgen.toml in the current directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input format
    #[arg(long, value_enum, default_value_t)]
    format: InputFormat,

    /// Fail on the first unsupported declaration instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Emit bindings without `export`
    #[arg(long)]
    no_export: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("normalize_zodgen=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let options = options(&args)?;
    let source = read_input(&args.input)?;

    let output = match args.format {
        InputFormat::Typescript => generate(&source, &options),
        InputFormat::Json => normalize_zodgen::input::json::parse_declarations(&source)
            .and_then(|declarations| generate_declarations(&declarations, &options)),
    }
    .with_context(|| format!("failed to generate schemas for {}", args.input.display()))?;

    for skipped in &output.skipped {
        eprintln!("skipped {}: {}", skipped.name, skipped.error);
    }

    match &args.output {
        Some(path) => std::fs::write(path, &output.code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(output.code.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

/// Config file values, overridden by flags.
fn options(args: &Args) -> Result<GenerateOptions> {
    let config = match &args.config {
        Some(path) => ZodgenConfig::load_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            ZodgenConfig::load(&cwd)?
        }
    };

    let mut options = config.generate;
    if let Some(alias) = &args.alias {
        options.schema_library_alias = Some(alias.clone());
    }
    if args.strict {
        options.skip_unsupported = false;
    }
    if args.no_export {
        options.export = false;
    }
    Ok(options)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
