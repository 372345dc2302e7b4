//! EDI Ingest CLI - tokenize, validate and summarize X12-style EDI files
//!
//! # Commands
//!
//! ```bash
//! edi-ingest summary order.edi          # Fixed-format summary
//! edi-ingest inspect order.edi          # Segment-by-segment report
//! edi-ingest parse order.edi -o out.json # Full parsed document as JSON
//! edi-ingest validate *.edi             # Exit 1 if any file has errors
//! edi-ingest segments                   # Show the segment dictionary
//! edi-ingest serve                      # Start HTTP server (port 3000)
//! ```

use clap::{Args, Parser, Subcommand};
use edi_ingest::{
    api::logs::init_logging,
    config::{is_supported_extension, IngestConfig},
    parse_bytes_with_encoding, parse_file, report, summarize, DelimiterSet, ParseOptions,
    ParsedDocument, SegmentDictionary, ValidationProfile,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "edi-ingest")]
#[command(about = "Tokenize, validate and classify X12-style EDI files", long_about = None)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that parses a file.
#[derive(Args, Clone)]
struct ParseArgs {
    /// Enable strict envelope checks (trailers, order, counts, control numbers)
    #[arg(long)]
    strict: bool,

    /// Separator characters (default from EDI_SEPARATORS, else "~*|")
    #[arg(short, long)]
    separators: Option<String>,

    /// Input encoding (auto-detect if not specified)
    #[arg(short, long)]
    encoding: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an EDI file and output the document as JSON
    Parse {
        /// Input EDI file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ParseArgs,
    },

    /// Print the summary of an EDI file
    Summary {
        /// Input EDI file
        input: PathBuf,

        #[command(flatten)]
        args: ParseArgs,
    },

    /// Print a segment-by-segment report with diagnostics
    Inspect {
        /// Input EDI file
        input: PathBuf,

        #[command(flatten)]
        args: ParseArgs,
    },

    /// Validate one or more EDI files (exit code 1 on any error)
    Validate {
        /// Input EDI files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        args: ParseArgs,
    },

    /// Show the segment dictionary
    Segments,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default from EDI_PORT, else 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable strict envelope checks
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match IngestConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Serve { .. }, false) => config.log_level.as_str(),
        _ => "warn",
    };
    init_logging(level, config.log_format);

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            args,
        } => cmd_parse(&config, &input, output.as_deref(), &args),

        Commands::Summary { input, args } => cmd_summary(&config, &input, &args),

        Commands::Inspect { input, args } => cmd_inspect(&config, &input, &args),

        Commands::Validate { inputs, args } => cmd_validate(&config, &inputs, &args),

        Commands::Segments => cmd_segments(),

        Commands::Serve { port, strict } => cmd_serve(config, port, strict).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_options(
    config: &IngestConfig,
    args: &ParseArgs,
) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let mut options = config.parse_options();

    if let Some(ref seps) = args.separators {
        options = options.with_separators(seps.parse::<DelimiterSet>()?);
    }
    if args.strict {
        options = options.with_profile(ValidationProfile::Strict);
    }

    Ok(options)
}

fn load_document(
    config: &IngestConfig,
    input: &Path,
    args: &ParseArgs,
) -> Result<ParsedDocument, Box<dyn std::error::Error>> {
    let options = parse_options(config, args)?;

    let name = input.display().to_string();
    if !is_supported_extension(&name) {
        eprintln!("⚠️  {} does not have an .edi, .x12 or .txt extension", name);
    }

    let doc = match args.encoding {
        Some(ref encoding) => {
            let bytes = fs::read(input)?;
            let file_name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or(name);
            parse_bytes_with_encoding(&bytes, encoding, &file_name, &options)?
        }
        None => parse_file(input, &options)?,
    };

    Ok(doc)
}

fn cmd_parse(
    config: &IngestConfig,
    input: &Path,
    output: Option<&Path>,
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing EDI: {}", input.display());

    let doc = load_document(config, input, args)?;
    eprintln!("   Transaction: {}", doc.transaction_type);
    eprintln!("   Segments: {}", doc.segments.len());
    eprintln!(
        "{} Status: {} ({} errors, {} warnings)",
        if doc.is_valid() { "✅" } else { "❌" },
        doc.status,
        doc.error_count(),
        doc.warning_count()
    );

    let json = serde_json::to_string_pretty(&doc)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_summary(
    config: &IngestConfig,
    input: &Path,
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(config, input, args)?;
    println!("{}", summarize(&doc));
    Ok(())
}

fn cmd_inspect(
    config: &IngestConfig,
    input: &Path,
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(config, input, args)?;
    print!("{}", report(&doc));
    Ok(())
}

fn cmd_validate(
    config: &IngestConfig,
    inputs: &[PathBuf],
    args: &ParseArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut valid = 0;
    let mut invalid = 0;

    for input in inputs {
        let doc = load_document(config, input, args)?;

        if doc.is_valid() {
            valid += 1;
            println!("✅ {} - {} ({} warnings)", doc.file_name, doc.transaction_type, doc.warning_count());
        } else {
            invalid += 1;
            println!("❌ {} - {} ({} errors)", doc.file_name, doc.transaction_type, doc.error_count());
            for d in doc.diagnostics.iter().filter(|d| d.severity.is_blocking()).take(5) {
                println!("   - {}", d);
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_segments() -> Result<(), Box<dyn std::error::Error>> {
    let dictionary = SegmentDictionary::builtin();
    println!("📋 Known segments ({}):\n", dictionary.len());
    for (tag, description) in dictionary.iter() {
        println!("  {:<4} {}", tag, description);
    }
    Ok(())
}

async fn cmd_serve(
    mut config: IngestConfig,
    port: Option<u16>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.port = port;
    }
    if strict {
        config.profile = ValidationProfile::Strict;
    }
    edi_ingest::server::start_server(config).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
