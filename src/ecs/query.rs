// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Task query entry point: resolve, then optionally describe

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use super::{
    DesiredStatus, EcsApi, ExclusiveFilter, FailureEntry, FilterResolver, LIST_PAGE_SIZE,
    PaginatedLister, RecordFetcher, Resolution, TaskArn, TaskFilters, TaskRecord,
};
use crate::error::QueryError;

/// Caller parameters of a task query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQueryParams {
    pub cluster: Option<String>,
    /// Explicit tasks to describe; bypasses filter resolution in detailed mode
    pub tasks: Vec<TaskArn>,
    pub container_instance: Option<String>,
    pub started_by: Option<String>,
    pub family: Option<String>,
    pub service: Option<String>,
    pub status: Option<DesiredStatus>,
    /// Fail instead of returning a narrowed result when a filter query faults
    pub strict: bool,
}

impl TaskQueryParams {
    pub fn filters(&self) -> TaskFilters {
        TaskFilters {
            cluster: self.cluster.clone(),
            container_instance: self.container_instance.clone(),
            started_by: self.started_by.clone(),
        }
    }

    pub fn exclusive_filters(&self) -> Vec<ExclusiveFilter> {
        let mut filters = Vec::with_capacity(3);
        if let Some(ref family) = self.family {
            filters.push(ExclusiveFilter::Family(family.clone()));
        }
        if let Some(ref service) = self.service {
            filters.push(ExclusiveFilter::ServiceName(service.clone()));
        }
        if let Some(status) = self.status {
            filters.push(ExclusiveFilter::DesiredStatus(status));
        }
        filters
    }
}

/// Result of a task query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// List mode: the resolved task ARNs
    Identifiers {
        tasks: BTreeSet<TaskArn>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    /// Detail mode: described tasks and the ones that could not be described
    Records {
        tasks: Vec<TaskRecord>,
        #[serde(rename = "tasks_not_running", skip_serializing_if = "Vec::is_empty")]
        failures: Vec<FailureEntry>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
}

impl QueryResult {
    pub fn warnings(&self) -> &[String] {
        match self {
            QueryResult::Identifiers { warnings, .. } | QueryResult::Records { warnings, .. } => {
                warnings
            }
        }
    }
}

/// Composes filter resolution and record fetching over one session
pub struct TaskQuery<'a> {
    api: &'a dyn EcsApi,
    page_size: u32,
}

impl<'a> TaskQuery<'a> {
    pub fn new(api: &'a dyn EcsApi) -> Self {
        Self {
            api,
            page_size: LIST_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Run a task query
    ///
    /// With `detailed == false` the explicit task list is ignored (with a
    /// warning) and the resolved ARNs are returned. With `detailed == true` the explicit list,
    /// when given, is described as is; otherwise the resolved ARNs are.
    pub async fn run(
        &self,
        params: &TaskQueryParams,
        detailed: bool,
    ) -> Result<QueryResult, QueryError> {
        let cluster = params.cluster.as_deref();
        let fetcher = RecordFetcher::new(self.api);

        if detailed && !params.tasks.is_empty() {
            info!(count = params.tasks.len(), "Describing explicit task list");
            let described = fetcher.describe(cluster, &params.tasks).await?;
            return Ok(QueryResult::Records {
                tasks: described.tasks,
                failures: described.failures,
                warnings: vec![],
            });
        }

        let resolution = self.resolve(params).await?;
        let mut warnings: Vec<String> = resolution
            .degraded
            .iter()
            .map(|d| format!("filter query failed: {}", d))
            .collect();

        if !detailed && !params.tasks.is_empty() {
            warn!(
                count = params.tasks.len(),
                "Explicit task list ignored without details"
            );
            warnings.push(format!(
                "{} explicit task(s) ignored; they are only described in detail mode",
                params.tasks.len()
            ));
        }

        if !detailed {
            return Ok(QueryResult::Identifiers {
                tasks: resolution.tasks,
                warnings,
            });
        }

        let arns: Vec<TaskArn> = resolution.tasks.into_iter().collect();
        let described = fetcher.describe(cluster, &arns).await?;

        Ok(QueryResult::Records {
            tasks: described.tasks,
            failures: described.failures,
            warnings,
        })
    }

    async fn resolve(&self, params: &TaskQueryParams) -> Result<Resolution, QueryError> {
        let lister = PaginatedLister::new(self.api).with_page_size(self.page_size);
        let resolution = FilterResolver::new(lister)
            .resolve(&params.filters(), &params.exclusive_filters())
            .await;

        if resolution.is_degraded() {
            for degraded in &resolution.degraded {
                warn!(
                    query = %degraded.query,
                    error = %degraded.error,
                    "Filter query failed; result may be narrower than expected"
                );
            }
            if params.strict {
                return Err(QueryError::Degraded(resolution.degraded));
            }
        }

        info!(resolved = resolution.tasks.len(), "Resolved tasks");
        Ok(resolution)
    }
}
