//! Flipbook terminal reader.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use flipbook_cli::config::{AppConfig, ContentLocation};
use flipbook_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let config = app_config_from_cli(cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match &cli.command {
        Command::Sections => commands::run_sections(&config),
        Command::Fetch { section } => runtime.block_on(commands::run_fetch(&config, section)),
        Command::Read => runtime.block_on(commands::run_read(&config)),
    }
}

/// Config file values, then command-line overrides.
fn app_config_from_cli(cli: &Cli) -> Result<AppConfig> {
    let args = &cli.source;
    let mut config = AppConfig::load(args.config.as_deref())?;

    if let Some(base_url) = &args.base_url {
        config.content.base_url = Some(base_url.clone());
    }
    if let Some(directory) = &args.content_dir {
        config.content.base_url = None;
        config.content.directory = Some(directory.clone());
    }
    if let Some(state_file) = &args.state_file {
        config.storage.state_file = Some(state_file.clone());
    }
    if let Some(animation_ms) = args.animation_ms {
        config.presentation.animation_ms = animation_ms;
    }

    if let ContentLocation::Directory(directory) = config.content_location()
        && !directory.is_dir()
    {
        tracing::warn!(
            "Content directory {} does not exist; every section will be unavailable",
            directory.display()
        );
    }
    Ok(config)
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        ..LogConfig::default()
    };
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
