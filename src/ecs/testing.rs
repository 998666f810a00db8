// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Scripted in-memory `EcsApi` for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DescribeTasksOutput, EcsApi, FailureEntry, ListTasksQuery, RemoteTask, TaskArn, TaskPage};
use crate::error::RemoteError;

enum ListScript {
    Pages(Vec<Vec<TaskArn>>),
    /// Serve these pages, then fault on the next one
    FaultAfter(Vec<Vec<TaskArn>>, RemoteError),
}

/// Answers ListTasks from per-query scripts and DescribeTasks from a task map
///
/// Queries without a script return a single empty page.
#[derive(Default)]
pub(crate) struct ScriptedEcs {
    listings: HashMap<ListTasksQuery, ListScript>,
    tasks: HashMap<TaskArn, RemoteTask>,
    describe_fault: Option<RemoteError>,
    extra_failures: HashMap<TaskArn, FailureEntry>,
    list_log: Mutex<Vec<(ListTasksQuery, u32)>>,
    describe_log: Mutex<Vec<Vec<TaskArn>>>,
}

pub(crate) fn arns(ids: &[&str]) -> Vec<TaskArn> {
    ids.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn task(arn: &str) -> RemoteTask {
    RemoteTask {
        task_arn: arn.to_string(),
        cluster_arn: None,
        task_definition_arn: None,
        container_instance_arn: None,
        overrides: None,
        last_status: Some("RUNNING".to_string()),
        desired_status: Some("RUNNING".to_string()),
        containers: vec![],
        started_by: None,
        stopped_reason: None,
        group: None,
        created_at: None,
        started_at: None,
        stopped_at: None,
    }
}

impl ScriptedEcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(mut self, query: &ListTasksQuery, pages: Vec<Vec<&str>>) -> Self {
        let pages = pages.iter().map(|p| arns(p)).collect();
        self.listings.insert(query.clone(), ListScript::Pages(pages));
        self
    }

    pub fn listing(self, query: &ListTasksQuery, ids: &[&str]) -> Self {
        self.pages(query, vec![ids.to_vec()])
    }

    pub fn fault(self, query: &ListTasksQuery, error: RemoteError) -> Self {
        self.fault_after(query, vec![], error)
    }

    pub fn fault_after(
        mut self,
        query: &ListTasksQuery,
        pages: Vec<Vec<&str>>,
        error: RemoteError,
    ) -> Self {
        let pages = pages.iter().map(|p| arns(p)).collect();
        self.listings
            .insert(query.clone(), ListScript::FaultAfter(pages, error));
        self
    }

    pub fn task(mut self, task: RemoteTask) -> Self {
        self.tasks.insert(task.task_arn.clone(), task);
        self
    }

    /// Report `arn` as a failure with `reason` even if it is known
    pub fn failure(mut self, arn: &str, reason: &str) -> Self {
        self.extra_failures.insert(
            arn.to_string(),
            FailureEntry {
                arn: Some(arn.to_string()),
                reason: Some(reason.to_string()),
                detail: None,
            },
        );
        self
    }

    pub fn describe_fault(mut self, error: RemoteError) -> Self {
        self.describe_fault = Some(error);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_log.lock().unwrap().len()
    }

    pub fn listed_queries(&self) -> Vec<ListTasksQuery> {
        self.list_log
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    pub fn requested_page_sizes(&self) -> Vec<u32> {
        self.list_log.lock().unwrap().iter().map(|(_, s)| *s).collect()
    }

    /// Batch sizes of every DescribeTasks call, in order
    pub fn describe_batches(&self) -> Vec<usize> {
        self.describe_log
            .lock()
            .unwrap()
            .iter()
            .map(Vec::len)
            .collect()
    }
}

#[async_trait]
impl EcsApi for ScriptedEcs {
    async fn list_tasks_page(
        &self,
        query: &ListTasksQuery,
        page_size: u32,
        next_token: Option<&str>,
    ) -> Result<TaskPage, RemoteError> {
        self.list_log
            .lock()
            .unwrap()
            .push((query.clone(), page_size));

        let index: usize = match next_token {
            Some(token) => token
                .parse()
                .map_err(|_| RemoteError::InvalidToken(token.to_string()))?,
            None => 0,
        };

        let (pages, fault) = match self.listings.get(query) {
            Some(ListScript::Pages(pages)) => (pages.as_slice(), None),
            Some(ListScript::FaultAfter(pages, error)) => (pages.as_slice(), Some(error)),
            None => return Ok(TaskPage::default()),
        };

        if index >= pages.len() {
            return match fault {
                Some(error) => Err(error.clone()),
                None => Ok(TaskPage::default()),
            };
        }

        let has_more = index + 1 < pages.len() || fault.is_some();
        Ok(TaskPage {
            task_arns: pages[index].clone(),
            next_token: has_more.then(|| (index + 1).to_string()),
        })
    }

    async fn describe_tasks(
        &self,
        _cluster: Option<&str>,
        task_arns: &[TaskArn],
    ) -> Result<DescribeTasksOutput, RemoteError> {
        self.describe_log.lock().unwrap().push(task_arns.to_vec());

        if let Some(ref error) = self.describe_fault {
            return Err(error.clone());
        }

        let mut output = DescribeTasksOutput::default();
        for arn in task_arns {
            if let Some(failure) = self.extra_failures.get(arn) {
                output.failures.push(failure.clone());
            } else if let Some(task) = self.tasks.get(arn) {
                output.tasks.push(task.clone());
            } else {
                output.failures.push(FailureEntry::missing(arn));
            }
        }
        Ok(output)
    }
}
