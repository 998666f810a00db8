// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use serde::Serialize;
use tracing::debug;

use super::{DEFAULT_CLUSTER, EcsApi, FailureEntry, TaskArn, TaskRecord};
use crate::error::DescribeError;

/// Most tasks DescribeTasks accepts in one call
pub const DESCRIBE_BATCH_LIMIT: usize = 100;

/// Described tasks plus the remote service's per-task failures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescribedTasks {
    pub tasks: Vec<TaskRecord>,
    pub failures: Vec<FailureEntry>,
}

/// Batch-describes tasks into output records
pub struct RecordFetcher<'a> {
    api: &'a dyn EcsApi,
}

impl<'a> RecordFetcher<'a> {
    pub fn new(api: &'a dyn EcsApi) -> Self {
        Self { api }
    }

    /// Describe `task_arns` in `cluster`
    ///
    /// No call is made for an empty list. Lists longer than
    /// [`DESCRIBE_BATCH_LIMIT`] are described in consecutive batches. Any
    /// remote fault is returned as [`DescribeError`]; failures the service
    /// reports for individual tasks are passed through as data.
    pub async fn describe(
        &self,
        cluster: Option<&str>,
        task_arns: &[TaskArn],
    ) -> Result<DescribedTasks, DescribeError> {
        if task_arns.is_empty() {
            debug!("No tasks to describe");
            return Ok(DescribedTasks::default());
        }

        let mut described = DescribedTasks::default();

        for batch in task_arns.chunks(DESCRIBE_BATCH_LIMIT) {
            let output = self
                .api
                .describe_tasks(cluster, batch)
                .await
                .map_err(|source| DescribeError {
                    cluster: cluster.unwrap_or(DEFAULT_CLUSTER).to_string(),
                    batch_size: batch.len(),
                    source,
                })?;

            debug!(
                cluster = cluster.unwrap_or(DEFAULT_CLUSTER),
                requested = batch.len(),
                described = output.tasks.len(),
                failures = output.failures.len(),
                "Described task batch"
            );

            described
                .tasks
                .extend(output.tasks.into_iter().map(TaskRecord::from));
            described.failures.extend(output.failures);
        }

        Ok(described)
    }
}
