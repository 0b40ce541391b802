use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::logging::init_logging;
use crate::pattern::{compile, parse, tokenizer::tokens, PathBuilder, PatternError};
use crate::router::Vars;
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for tinyrouter
///
/// Inspects how patterns tokenize, parse and compile, and tries them against
/// sample paths.
#[derive(Parser, Debug)]
#[command(name = "tinyrouter")]
#[command(about = "Path pattern compiler and matcher", long_about = None)]
pub struct Cli {
    /// TOML configuration file (`[matcher]` and `[logging]` tables)
    #[arg(short, long, global = true, env = "TINYROUTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the token stream of a pattern
    Tokens {
        pattern: String,
    },
    /// Print the AST of a pattern with source spans
    Parse {
        pattern: String,
    },
    /// Print the matcher regex and variable slots of a pattern
    Compile {
        pattern: String,

        /// Match letter case exactly (overrides the configuration)
        #[arg(long, default_value_t = false)]
        case_sensitive: bool,
    },
    /// Match one or more paths against a pattern
    Match {
        pattern: String,

        /// Candidate paths
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,
    },
    /// Build a path from a pattern and parameters
    Build {
        pattern: String,

        /// Parameter as `name=value` (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}

/// Runs `cli.command` and returns what it prints.
pub fn execute(cli: &Cli, config: &RuntimeConfig) -> Result<String> {
    let output = match &cli.command {
        Commands::Tokens { pattern } => {
            let (tokens, consumed) = tokens(pattern);
            if consumed != pattern.chars().count() {
                return Err(PatternError::UnexpectedSyntax { offset: consumed })
                    .with_context(|| format!("Failed to tokenize '{pattern}'"));
            }
            tokens
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        }
        Commands::Parse { pattern } => {
            let ast = parse(pattern).with_context(|| format!("Failed to parse '{pattern}'"))?;
            ast.dump().trim_end().to_string()
        }
        Commands::Compile {
            pattern,
            case_sensitive,
        } => {
            let mut options = config.matcher.clone();
            options.case_sensitive |= *case_sensitive;
            let ast = parse(pattern).with_context(|| format!("Failed to parse '{pattern}'"))?;
            let compiled =
                compile(&ast, &options).with_context(|| format!("Failed to compile '{pattern}'"))?;

            let mut lines = vec![format!("regex: {}", compiled.as_str())];
            lines.push(format!("case_sensitive: {}", options.case_sensitive));
            for slot in compiled.slots() {
                lines.push(format!("slot {}: {}", slot.slot, slot.name));
            }
            lines.join("\n")
        }
        Commands::Match { pattern, paths } => {
            let ast = parse(pattern).with_context(|| format!("Failed to parse '{pattern}'"))?;
            let compiled = compile(&ast, &config.matcher)
                .with_context(|| format!("Failed to compile '{pattern}'"))?;

            let mut lines = Vec::with_capacity(paths.len());
            for path in paths {
                match compiled.matches(path) {
                    Some(found) => {
                        let vars = serde_json::to_string(&found.vars)
                            .context("Failed to serialize variables")?;
                        lines.push(format!("{path}\t{}\t{vars}", found.consumed));
                    }
                    None => lines.push(format!("{path}\tno match")),
                }
            }
            lines.join("\n")
        }
        Commands::Build { pattern, params } => {
            let ast = parse(pattern).with_context(|| format!("Failed to parse '{pattern}'"))?;
            let builder = PathBuilder::new(&ast)
                .with_context(|| format!("Failed to lower '{pattern}'"))?;
            let vars: Vars = params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            match builder.build(&vars) {
                Some(path) => path,
                None => {
                    let required: Vec<&str> = builder
                        .params()
                        .iter()
                        .filter(|p| !p.optional && !vars.contains(&p.name))
                        .map(|p| p.name.as_str())
                        .collect();
                    bail!("Cannot build '{pattern}': missing parameters {required:?}");
                }
            }
        }
    };
    Ok(output)
}

/// Loads configuration, initializes logging and runs the command.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::from_env()?,
    };
    init_logging(&config.logging)?;
    debug!(command = ?cli.command, config = ?cli.config, "Running command");

    let output = execute(&cli, &config)?;
    println!("{output}");
    Ok(())
}
