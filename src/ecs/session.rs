// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;

use super::{FailureEntry, ListTasksQuery, RemoteTask, TaskArn};
use crate::error::RemoteError;

/// One page of a ListTasks response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPage {
    pub task_arns: Vec<TaskArn>,
    /// Continuation token; `None` or empty on the last page
    pub next_token: Option<String>,
}

/// DescribeTasks response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeTasksOutput {
    pub tasks: Vec<RemoteTask>,
    pub failures: Vec<FailureEntry>,
}

/// The two ECS calls task resolution needs from an authenticated session
#[async_trait]
pub trait EcsApi: Send + Sync {
    async fn list_tasks_page(
        &self,
        query: &ListTasksQuery,
        page_size: u32,
        next_token: Option<&str>,
    ) -> Result<TaskPage, RemoteError>;

    async fn describe_tasks(
        &self,
        cluster: Option<&str>,
        task_arns: &[TaskArn],
    ) -> Result<DescribeTasksOutput, RemoteError>;
}
