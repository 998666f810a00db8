// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SessionOverrides;
use crate::ecr::{ImageRef, TagStatus};
use crate::ecs::{DesiredStatus, TaskArn, TaskQueryParams};

#[derive(Parser, Debug)]
#[command(name = "ecsq")]
#[command(author, version, about = "Query ECS tasks and ECR images")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Region to query. Falls back to AWS_REGION, AWS_DEFAULT_REGION, EC2_REGION, then the config file
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Snapshot file (JSON or YAML) served as the remote API
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Page size for task listing (1-100)
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// Omit column headers in output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn overrides(&self) -> SessionOverrides {
        SessionOverrides {
            region: self.region.clone(),
            snapshot: self.snapshot.clone(),
            page_size: self.page_size,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve tasks by filter, optionally describing them
    Tasks(TaskArgs),

    /// List or delete repository images
    Images {
        #[command(subcommand)]
        command: ImagesCommand,
    },

    /// Show or change saved defaults
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct TaskArgs {
    /// Cluster name or ARN (defaults to the configured cluster, then "default")
    #[arg(long)]
    pub cluster: Option<String>,

    /// Explicit task ARNs or ids to describe with --details (comma-separated)
    #[arg(long = "task", value_delimiter = ',', value_name = "TASK")]
    pub tasks: Vec<TaskArn>,

    /// Only tasks placed on this container instance
    #[arg(long)]
    pub container_instance: Option<String>,

    /// Only tasks started by this originator
    #[arg(long)]
    pub started_by: Option<String>,

    /// Only tasks of this task definition family
    #[arg(long)]
    pub family: Option<String>,

    /// Only tasks belonging to this service
    #[arg(long)]
    pub service: Option<String>,

    /// Only tasks with this desired status (running, pending, stopped)
    #[arg(long)]
    pub status: Option<DesiredStatus>,

    /// Describe the resolved tasks instead of listing their ARNs
    #[arg(long)]
    pub details: bool,

    /// Fail instead of narrowing the result when a filter query errors
    #[arg(long)]
    pub strict: bool,
}

impl TaskArgs {
    /// Build query parameters, using `default_cluster` when --cluster is absent
    pub fn to_params(&self, default_cluster: Option<String>) -> TaskQueryParams {
        TaskQueryParams {
            cluster: self.cluster.clone().or(default_cluster),
            tasks: self
                .tasks
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            container_instance: self.container_instance.clone(),
            started_by: self.started_by.clone(),
            family: self.family.clone(),
            service: self.service.clone(),
            status: self.status,
            strict: self.strict,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ImagesCommand {
    /// List images in a repository
    List {
        #[arg(long)]
        repository: String,

        /// Only tagged or only untagged images
        #[arg(long, value_enum)]
        tag_status: Option<TagStatusArg>,
    },

    /// Delete images from a repository
    Delete {
        #[arg(long)]
        repository: String,

        /// Image to delete: sha256:..., digest=..., tag=..., or a bare tag
        #[arg(long = "image-id", value_name = "ID", required = true)]
        image_ids: Vec<ImageRef>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the saved configuration
    Show,

    /// Update saved defaults from --region, --snapshot, --page-size and --cluster
    Set {
        #[arg(long)]
        cluster: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum TagStatusArg {
    Tagged,
    Untagged,
}

impl From<TagStatusArg> for TagStatus {
    fn from(arg: TagStatusArg) -> Self {
        match arg {
            TagStatusArg::Tagged => TagStatus::Tagged,
            TagStatusArg::Untagged => TagStatus::Untagged,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Csv,
    Table,
}
