// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! ECS task resolution
//!
//! The ListTasks API accepts any combination of cluster, container instance and
//! started-by, but at most one of family, service name and desired status per
//! call. Queries with several of those are split into one call per dimension
//! and the results intersected.

mod fetcher;
mod lister;
mod query;
mod records;
mod resolver;
mod session;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fetcher::{DESCRIBE_BATCH_LIMIT, RecordFetcher};
pub use lister::{LIST_PAGE_SIZE, PaginatedLister};
pub use query::{QueryResult, TaskQuery, TaskQueryParams};
pub use records::{FailureEntry, RemoteTask, TaskRecord};
pub use resolver::{DegradedFilter, FilterResolver, Resolution};
pub use session::{DescribeTasksOutput, EcsApi, TaskPage};

/// Task ARN (or bare task id); opaque to the resolver
pub type TaskArn = String;

/// Cluster used by the remote API when a request names none
pub const DEFAULT_CLUSTER: &str = "default";

/// Desired status accepted by the ListTasks `desiredStatus` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredStatus {
    Running,
    Pending,
    Stopped,
}

impl DesiredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredStatus::Running => "RUNNING",
            DesiredStatus::Pending => "PENDING",
            DesiredStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for DesiredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUNNING" => Ok(DesiredStatus::Running),
            "PENDING" => Ok(DesiredStatus::Pending),
            "STOPPED" => Ok(DesiredStatus::Stopped),
            other => Err(format!(
                "invalid desired status '{}', expected running, pending or stopped",
                other.to_ascii_lowercase()
            )),
        }
    }
}

/// A filter dimension the ListTasks API accepts only one of per call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExclusiveFilter {
    Family(String),
    ServiceName(String),
    DesiredStatus(DesiredStatus),
}

impl ExclusiveFilter {
    /// API parameter name of this dimension
    pub fn dimension(&self) -> &'static str {
        match self {
            ExclusiveFilter::Family(_) => "family",
            ExclusiveFilter::ServiceName(_) => "serviceName",
            ExclusiveFilter::DesiredStatus(_) => "desiredStatus",
        }
    }
}

impl fmt::Display for ExclusiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusiveFilter::Family(v) | ExclusiveFilter::ServiceName(v) => {
                write!(f, "{}={}", self.dimension(), v)
            }
            ExclusiveFilter::DesiredStatus(s) => write!(f, "{}={}", self.dimension(), s),
        }
    }
}

/// Filters that can be combined freely in a single ListTasks call
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaskFilters {
    /// Cluster name or ARN; the remote default cluster when `None`
    pub cluster: Option<String>,
    /// Container instance (hosting node) ARN or id
    pub container_instance: Option<String>,
    /// Originator tag set when the task was started
    pub started_by: Option<String>,
}

/// One ListTasks request: the shared filters plus at most one exclusive filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListTasksQuery {
    pub filters: TaskFilters,
    pub exclusive: Option<ExclusiveFilter>,
}

impl ListTasksQuery {
    pub fn base(filters: TaskFilters) -> Self {
        Self {
            filters,
            exclusive: None,
        }
    }

    /// Same shared filters, constrained by `filter` instead of any previous exclusive filter
    pub fn with_exclusive(&self, filter: ExclusiveFilter) -> Self {
        Self {
            filters: self.filters.clone(),
            exclusive: Some(filter),
        }
    }

    pub fn cluster(&self) -> Option<&str> {
        self.filters.cluster.as_deref()
    }
}

impl fmt::Display for ListTasksQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster={}", self.cluster().unwrap_or(DEFAULT_CLUSTER))?;
        if let Some(ref node) = self.filters.container_instance {
            write!(f, " containerInstance={}", node)?;
        }
        if let Some(ref started_by) = self.filters.started_by {
            write!(f, " startedBy={}", started_by)?;
        }
        if let Some(ref exclusive) = self.exclusive {
            write!(f, " {}", exclusive)?;
        }
        Ok(())
    }
}
