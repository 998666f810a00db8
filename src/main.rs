// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod config;
mod ecr;
mod ecs;
mod error;
mod output;
mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;

use cli::{Args, Command, ConfigCommand, ImagesCommand, OutputFormat, TaskArgs};
use config::{Config, SessionSettings};
use ecs::{LIST_PAGE_SIZE, TaskQuery};
use error::ConfigError;
use output::Render;
use snapshot::SnapshotSession;

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // Rotate daily or at 10MB, keeping 5 files
    let log_path = log_dir.join("ecsq.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose { "ecsq=debug" } else { "ecsq=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Always log to ~/.ecsq/log/ecsq.log; -v adds stderr
    init_logging(args.verbose);

    let config = Config::load()?;

    match &args.command {
        Command::Tasks(task_args) => run_tasks(&args, &config, task_args).await,
        Command::Images { command } => run_images(&args, &config, command).await,
        Command::Config { command } => run_config(&args, config, command),
    }
}

/// Resolve settings and open the session before any remote call
fn open_session(args: &Args, config: &Config) -> Result<(SessionSettings, SnapshotSession)> {
    let settings = SessionSettings::resolve(&args.overrides(), config, |key| {
        std::env::var(key).ok()
    })?;
    let session = SnapshotSession::open(&settings)?;
    Ok((settings, session))
}

fn print<T: Render>(args: &Args, value: &T) -> Result<()> {
    println!("{}", output::render(value, args.output, args.no_headers)?);
    Ok(())
}

async fn run_tasks(args: &Args, config: &Config, task_args: &TaskArgs) -> Result<()> {
    let (settings, session) = open_session(args, config)?;
    let params = task_args.to_params(config.default_cluster.clone());

    info!(
        region = session.region(),
        cluster = params.cluster.as_deref().unwrap_or(ecs::DEFAULT_CLUSTER),
        details = task_args.details,
        "Running task query"
    );

    let result = TaskQuery::new(&session)
        .with_page_size(settings.page_size)
        .run(&params, task_args.details)
        .await?;

    // json and yaml carry warnings in the document itself
    if matches!(args.output, OutputFormat::Csv | OutputFormat::Table) {
        for warning in result.warnings() {
            eprintln!("Warning: {}", warning);
        }
    }

    print(args, &result)
}

async fn run_images(args: &Args, config: &Config, command: &ImagesCommand) -> Result<()> {
    let (_, session) = open_session(args, config)?;

    match command {
        ImagesCommand::List {
            repository,
            tag_status,
        } => {
            let images = ecr::list_repository_images(
                &session,
                repository,
                tag_status.map(ecr::TagStatus::from),
            )
            .await
            .with_context(|| format!("Failed to list images in {}", repository))?;
            print(args, &images)
        }
        ImagesCommand::Delete {
            repository,
            image_ids,
        } => {
            let deleted = ecr::delete_repository_images(&session, repository, image_ids)
                .await
                .with_context(|| format!("Failed to delete images from {}", repository))?;
            if deleted.changed {
                session.persist().await?;
            }
            print(args, &deleted)
        }
    }
}

fn run_config(args: &Args, mut config: Config, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {}
        ConfigCommand::Set { cluster } => {
            if let Some(size) = args.page_size
                && (size == 0 || size > LIST_PAGE_SIZE)
            {
                return Err(ConfigError::InvalidPageSize(size).into());
            }
            if args.region.is_some() {
                config.region = args.region.clone();
            }
            if cluster.is_some() {
                config.default_cluster = cluster.clone();
            }
            if args.snapshot.is_some() {
                config.snapshot = args.snapshot.clone();
            }
            if args.page_size.is_some() {
                config.page_size = args.page_size;
            }
            config.save()?;
            info!("Saved configuration");
        }
    }
    print(args, &config)
}
