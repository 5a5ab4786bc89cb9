use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cpu32_asm::listing::{render_json, render_listing, write_hex};
use cpu32_asm::{assemble_source, Alu32Encoder, AsmConfig, ErrorMode, OverflowPolicy};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble cpu32 source into one 0xXXXXXXXX word per line"
)]
struct Opts {
    /// Assembly source, one instruction per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Hex text output
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    /// JSON config ({"overflow": "wrap"|"reject", "errors": "fail-fast"|"collect"})
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Fail on immediates that do not fit 18 bits instead of wrapping
    #[arg(long)]
    reject_overflow: bool,
    /// Report every bad line instead of stopping at the first
    #[arg(long)]
    keep_going: bool,
    /// Do not print the listing
    #[arg(short, long)]
    quiet: bool,
    /// Listing format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let mut cfg = match &opts.config {
        Some(path) => AsmConfig::load(path)?,
        None => AsmConfig::default(),
    };
    if opts.reject_overflow {
        cfg.overflow = OverflowPolicy::Reject;
    }
    if opts.keep_going {
        cfg.errors = ErrorMode::Collect;
    }

    let text = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let enc = Alu32Encoder::with_config(&cfg);
    let program = match assemble_source(&text, &enc, cfg.errors) {
        Ok(p) => p,
        Err(e) => {
            for le in &e.errors {
                eprintln!("{}:{le}", opts.input.display());
            }
            bail!("{e}; nothing written to {}", opts.output.display());
        }
    };

    write_hex(&opts.output, &program)?;
    tracing::info!(count = program.len(), output = %opts.output.display(), "assembled");

    if !opts.quiet {
        match opts.format {
            OutputFormat::Text => {
                println!("Wrote {} instructions to {}\n", program.len(), opts.output.display());
                print!("{}", render_listing(&program));
            }
            OutputFormat::Json => println!("{}", render_json(&program)?),
        }
    }

    Ok(())
}
