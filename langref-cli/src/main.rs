//! Command-line interface for langref
//! This binary compiles a content tree of language documents into the JSON artifacts the reference
//! site serves, and checks an existing output directory against its index.
//!
//! Usage:
//!   langref [build] [--content `<dir>`] [--out `<dir>`] [--config `<file>`] [--env `<mode>`]
//!   langref verify [--out `<dir>`]                 - Check artifacts against hierarchy.json
//!   langref formats                                 - List supported input formats

mod logging;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use langref_babel::{BuildMode, FormatRegistry};
use langref_compiler::{verify, BuildOptions, CompileError, Compiler};
use langref_config::{LangrefConfig, Loader, PROJECT_CONFIG_FILE};
use std::path::PathBuf;
use thiserror::Error;

use crate::logging::{init_logging, LogConfig};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

fn main() {
    let matches = cli().get_matches();

    let log_config = LogConfig::from_flags(matches.get_count("verbose"), matches.get_flag("quiet"));
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match matches.subcommand() {
        Some(("build", sub)) => handle_build_command(sub),
        Some(("verify", sub)) => handle_verify_command(sub),
        Some(("formats", _)) => handle_formats_command(),
        _ => handle_build_command(&matches),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn cli() -> Command {
    Command::new("langref")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile language reference content into JSON artifacts")
        .args_conflicts_with_subcommands(true)
        .args(build_args())
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Compile the content tree (default when no command is given)")
                .args(build_args()),
        )
        .subcommand(
            Command::new("verify")
                .about("Check that every indexed language has exactly one artifact")
                .arg(out_arg())
                .arg(config_arg()),
        )
        .subcommand(Command::new("formats").about("List supported input formats"))
}

fn build_args() -> Vec<Arg> {
    vec![
        Arg::new("content")
            .long("content")
            .help("Content root holding one directory per root language")
            .value_parser(value_parser!(PathBuf)),
        out_arg(),
        config_arg(),
        Arg::new("env")
            .long("env")
            .env("LANGREF_ENV")
            .help("Build mode: 'development' (or 'dev') indents output, anything else is compact"),
    ]
}

fn out_arg() -> Arg {
    Arg::new("out")
        .long("out")
        .short('o')
        .help("Output directory for compiled artifacts")
        .value_parser(value_parser!(PathBuf))
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults (default: ./langref.toml if present)")
        .value_parser(value_parser!(PathBuf))
}

/// Resolve configuration: embedded defaults, then the config file, then command-line overrides.
fn load_config(matches: &ArgMatches) -> Result<LangrefConfig, CliError> {
    let mut loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(PROJECT_CONFIG_FILE),
    };

    let path_overrides = [("content", "content.root"), ("out", "output.dir")];
    for (arg, key) in path_overrides {
        if let Some(path) = matches.try_get_one::<PathBuf>(arg).ok().flatten() {
            loader = loader.set_override(key, path.to_string_lossy().into_owned())?;
        }
    }
    if let Some(env) = matches.try_get_one::<String>("env").ok().flatten() {
        loader = loader.set_override("output.mode", BuildMode::from_env_value(env).as_str())?;
    }

    Ok(loader.build()?)
}

/// Handle the build command
fn handle_build_command(matches: &ArgMatches) -> Result<i32, CliError> {
    let config = load_config(matches)?;
    let options = BuildOptions::new(&config.content.root, &config.output.dir)
        .with_mode(config.output.mode)
        .with_legacy_aliases(config.output.legacy_aliases);

    let report = Compiler::new(options).run_with_progress(|doc| {
        println!("{} -> {}", doc.source.display(), doc.slug.artifact_path());
    })?;

    tracing::info!(
        documents = report.documents.len(),
        roots = report.index.len(),
        out = %config.output.dir.display(),
        "compiled {} documents",
        report.documents.len()
    );
    Ok(0)
}

/// Handle the verify command
fn handle_verify_command(matches: &ArgMatches) -> Result<i32, CliError> {
    let config = load_config(matches)?;
    let report = verify(&config.output.dir)?;

    for slug in &report.missing {
        println!("missing  {}", slug.artifact_path());
    }
    for path in &report.orphans {
        println!("orphan   {}", path.display());
    }

    if report.is_clean() {
        println!("ok: {} artifacts match the index", report.checked);
        Ok(0)
    } else {
        tracing::warn!(
            missing = report.missing.len(),
            orphans = report.orphans.len(),
            "output does not match the index"
        );
        Ok(1)
    }
}

/// Handle the formats command
fn handle_formats_command() -> Result<i32, CliError> {
    let registry = FormatRegistry::with_defaults();
    println!("Supported input formats:\n");

    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {}", format.name());
            println!("    {}", format.description());
            println!("    extensions: {}", format.extensions().join(", "));
            println!();
        }
    }
    Ok(0)
}
