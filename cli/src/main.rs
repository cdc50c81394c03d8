use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use mime::{compile_file, schema_to_json, MimeError};
use mime_compiler::{token::TokenKind, tokenizer::Tokenizer, Parser as SchemaParser};

#[derive(Parser, Debug)]
#[command(name = "mime")]
#[command(about = "Tokenize, check, or export Mime schemas", long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tokens of a `.mime` file, one per line
    Tokens {
        /// Input `.mime` file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Report every diagnostic of a `.mime` file; exits non-zero on errors
    Check {
        /// Input `.mime` file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the validated schema, with payload/response views, as JSON
    Json {
        /// Input `.mime` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.json` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(cli:?; "parsed arguments");

    match run(&cli.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            for diag in err.diagnostics() {
                eprintln!("{}", diag);
            }
            if !matches!(err, MimeError::Rejected { .. }) {
                eprintln!("{}", err);
            }
            process::exit(1);
        }
    }
}

/// Runs one command. `Ok(false)` means the input had errors that were
/// already reported.
fn run(command: &Commands) -> Result<bool, MimeError> {
    match command {
        Commands::Tokens { input } => {
            let text = fs::read_to_string(input)?;
            let file = input.display().to_string();
            let mut tokenizer = Tokenizer::with_file(&text, file);
            loop {
                let tok = tokenizer.next_token();
                println!("{}:{}\t{:?}\t{}", tok.line, tok.column, tok.kind, tok.literal);
                if tok.kind == TokenKind::Eof {
                    return Ok(true);
                }
            }
        }

        Commands::Check { input } => {
            let text = fs::read_to_string(input)?;
            let output = SchemaParser::with_file(&text, input.display().to_string()).parse();
            for diag in output.diagnostics.iter() {
                eprintln!("{}", diag);
            }
            let errors = output.diagnostics.error_count();
            info!(
                entities = output.schema.entities().len(),
                enums = output.schema.enums().len(),
                errors;
                "checked {}", input.display()
            );
            if errors > 0 {
                eprintln!("{} error(s) in {}", errors, input.display());
                return Ok(false);
            }
            println!(
                "{}: {} entities, {} enums, {} warning(s)",
                input.display(),
                output.schema.entities().len(),
                output.schema.enums().len(),
                output.diagnostics.warnings().count()
            );
            Ok(true)
        }

        Commands::Json { input, output } => {
            let compiled = compile_file(input)?;
            for warning in &compiled.warnings {
                eprintln!("{}", warning);
            }
            let json = schema_to_json(&compiled.schema)?;
            if let Some(out_path) = output {
                fs::write(out_path, &json)?;
                println!("Wrote {} → {}", input.display(), out_path.display());
            } else {
                println!("{}", json);
            }
            Ok(true)
        }
    }
}
