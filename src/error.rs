// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the task resolution engine and the image operations
//!
//! The list and describe paths use different error types:
//! - list faults are wrapped in [`Absorbed`] and degrade to an empty set
//! - describe faults become a [`DescribeError`] and end the invocation

use thiserror::Error;

use crate::ecs::DegradedFilter;

/// Fault reported by the remote service (or the session standing in for it)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    #[error("Invalid pagination token: {0}")]
    InvalidToken(String),

    #[error("Service error: {0}")]
    Service(String),
}

/// A list query whose fault was absorbed into an empty result
#[derive(Debug, Clone, Error)]
#[error("List query '{query}' failed: {source}")]
pub struct Absorbed {
    /// Human readable rendering of the query that failed
    pub query: String,
    pub source: RemoteError,
}

/// Batch-describe fault; fatal for the invocation
#[derive(Debug, Clone, Error)]
#[error("Failed to describe {batch_size} task(s) in cluster '{cluster}': {source}")]
pub struct DescribeError {
    pub cluster: String,
    pub batch_size: usize,
    pub source: RemoteError,
}

/// Terminal error of a task query
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error(transparent)]
    Describe(#[from] DescribeError),

    /// Only raised in strict mode; otherwise degraded filters are warnings
    #[error("Filter queries failed: {}", join_degraded(.0))]
    Degraded(Vec<DegradedFilter>),
}

fn join_degraded(degraded: &[DegradedFilter]) -> String {
    degraded
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Problems detected before any remote call is attempted
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Region must be specified with --region, in AWS_REGION, AWS_DEFAULT_REGION or EC2_REGION, or in the config file"
    )]
    MissingRegion,

    #[error("No snapshot configured; pass --snapshot or set \"snapshot\" in the config file")]
    MissingSnapshot,

    #[error("Region '{region}' not present in snapshot {path}")]
    UnknownRegion { region: String, path: String },

    #[error("Failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {path}: {reason}")]
    SnapshotParse { path: String, reason: String },

    #[error("Invalid page size {0}: must be between 1 and 100")]
    InvalidPageSize(u32),
}
