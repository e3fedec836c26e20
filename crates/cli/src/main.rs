// idrecon CLI - identity field reconciliation, headless
// Reads a user-typed record and a document-extracted record, runs the
// engine, reports a verdict through stderr/JSON and the exit code.

mod exit_codes;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use idrecon_engine::{build_input, run, MatchConfig};

use exit_codes::{
    EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, EXIT_VERIFY_INVALID_CONFIG, EXIT_VERIFY_MISMATCH,
    EXIT_VERIFY_RUNTIME,
};

#[derive(Parser)]
#[command(name = "idrecon")]
#[command(about = "Reconcile user-typed identity fields against document-extracted ones")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a user record against a document record (exit 0 = verified, exit 3 = mismatch)
    #[command(after_help = "\
Examples:
  idrecon run --user form.json --document ocr.json
  idrecon run --user form.json --document ocr.json --config kyc.toml
  idrecon run --user form.json --document ocr.json --json
  idrecon run --user form.json --document ocr.json --output verdict.json")]
    Run {
        /// Path to the user-typed record: a JSON object of canonical fields
        #[arg(long)]
        user: PathBuf,

        /// Path to the extractor output: a bare field map or {"fields": {...}}
        #[arg(long)]
        document: PathBuf,

        /// Path to a .toml match config (omit for built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON verdict to stdout in addition to the stderr report
        #[arg(long)]
        json: bool,

        /// Write JSON verdict to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a match config without running
    #[command(after_help = "\
Examples:
  idrecon validate kyc.toml")]
    Validate {
        /// Path to the .toml match config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: idrecon <command> [options]");
            eprintln!("       idrecon --help for more information");
            Err(CliError {
                code: EXIT_USAGE,
                message: String::new(),
                hint: None,
            })
        }
        Some(Commands::Run {
            user,
            document,
            config,
            json,
            output,
        }) => cmd_run(user, document, config, json, output),
        Some(Commands::Validate { config }) => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn verify_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError {
        code,
        message: msg.into(),
        hint: None,
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| verify_err(EXIT_VERIFY_RUNTIME, format!("cannot read {}: {e}", path.display())))
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    user_path: PathBuf,
    document_path: PathBuf,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = match config_path {
        Some(ref path) => {
            let config_str = read_file(path)?;
            MatchConfig::from_toml(&config_str).map_err(|e| CliError {
                code: EXIT_VERIFY_INVALID_CONFIG,
                message: e.to_string(),
                hint: Some("run `idrecon validate <config>` to check a config in isolation".into()),
            })?
        }
        None => MatchConfig::default(),
    };

    let user_json = read_file(&user_path)?;
    let document_json = read_file(&document_path)?;

    let input = build_input(&config, &user_json, &document_json)
        .map_err(|e| verify_err(EXIT_VERIFY_RUNTIME, e.to_string()))?;

    let verdict = run(&config, &input);

    let json_str = serde_json::to_string_pretty(&verdict)
        .map_err(|e| verify_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| verify_err(EXIT_VERIFY_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprint!("{}", report::render_verdict(&verdict));

    if !verdict.overall_pass {
        return Err(verify_err(EXIT_VERIFY_MISMATCH, "field mismatches found"));
    }

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = read_file(&config_path)?;

    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| verify_err(EXIT_VERIFY_INVALID_CONFIG, e.to_string()))?;

    eprintln!("config ok: \"{}\"", config.name);
    for kind in config.enabled_fields() {
        eprintln!(
            "  {:<14} document_key \"{}\"  threshold {:.1}",
            kind.as_str(),
            config.document_key_for(kind),
            config.threshold_for(kind),
        );
    }

    Ok(())
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  idrecon-engine ",
            env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ncontract_version(verdict): 1",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  idrecon-engine ",
            env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ncontract_version(verdict): 1",
        )
    }
}
