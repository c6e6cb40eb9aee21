use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;

use crate::bridge::{Bridge, Runtime};
use crate::config::BridgeConfig;
use crate::host::{CommandHost, HostEngine};
use crate::script::scriptlet::parse_program;

#[derive(Parser)]
#[command(name = "callbridge")]
#[command(about = "Run scripts against a host command engine through the call bridge", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run script files in order, sharing one top-level namespace
    Run {
        /// Script files to run
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Define a host variable before running (NAME=VALUE)
        #[arg(short = 'D', long = "define", value_parser = parse_define)]
        defines: Vec<(String, String)>,

        /// Trace every script -> host invocation
        #[arg(long)]
        debug: bool,
    },

    /// Parse a script file and print its syntax tree as JSON
    Parse {
        /// Script file to parse
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn parse_define(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing variable name in '{raw}'")),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    // Load configuration up front so errors show before any command output
    let config = BridgeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            files,
            defines,
            debug,
        } => run_scripts(config, &files, &defines, debug),

        Commands::Parse { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let program = parse_program(&source)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(())
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn run_scripts(
    mut config: BridgeConfig,
    files: &[PathBuf],
    defines: &[(String, String)],
    debug: bool,
) -> Result<()> {
    config.debug |= debug;

    let host = CommandHost::with_echo();
    for (name, value) in defines {
        host.define(name, value);
    }

    let runtime = Runtime::from_config(config)?;
    let bridge = Bridge::new(&runtime, Rc::clone(&host) as Rc<dyn HostEngine>)?;

    let mut failed = 0;
    for file in files {
        let mut status = bridge.status();
        if !bridge.run_file(file, &mut status) {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} script(s) failed", files.len());
    }
    if host.fatal_error_occurred() {
        bail!("host reported a fatal error");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(
            parse_define("NAME=a;b").unwrap(),
            ("NAME".to_string(), "a;b".to_string())
        );
        assert_eq!(parse_define("EMPTY=").unwrap(), ("EMPTY".to_string(), String::new()));
        assert!(parse_define("=value").is_err());
        assert!(parse_define("novalue").is_err());
    }

    #[test]
    fn test_run_subcommand_arguments() {
        let cli = Cli::parse_from(["callbridge", "run", "a.sl", "b.sl", "-D", "X=1", "--debug"]);
        match cli.command {
            Commands::Run {
                files,
                defines,
                debug,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.sl"), PathBuf::from("b.sl")]);
                assert_eq!(defines, vec![("X".to_string(), "1".to_string())]);
                assert!(debug);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_requires_files() {
        assert!(Cli::try_parse_from(["callbridge", "run"]).is_err());
    }
}
