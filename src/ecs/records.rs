// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Task records as returned by DescribeTasks and as emitted to callers
//!
//! `RemoteTask` is the remote shape with typed timestamps. `TaskRecord` is the
//! output shape where those timestamps are already RFC 3339 strings, so nothing
//! downstream has to know how to serialize a datetime.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::TaskArn;

/// A task as described by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    pub task_arn: TaskArn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_instance_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    /// `service:<name>` for tasks started by a service, `family:<name>` otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl RemoteTask {
    /// Task definition family, taken from `arn:...:task-definition/<family>:<revision>`
    pub fn family(&self) -> Option<&str> {
        let arn = self.task_definition_arn.as_deref()?;
        let name = arn.rsplit_once('/').map(|(_, n)| n).unwrap_or(arn);
        Some(name.split(':').next().unwrap_or(name))
    }

    /// Owning service, taken from a `service:<name>` group
    pub fn service_name(&self) -> Option<&str> {
        self.group.as_deref()?.strip_prefix("service:")
    }

    /// Whether `id` names this task, either as the full ARN or as the trailing task id
    pub fn is_named(&self, id: &str) -> bool {
        self.task_arn == id || arn_suffix(&self.task_arn) == id
    }
}

/// Last path segment of an ARN (`.../cluster/task-id` -> `task-id`)
pub(crate) fn arn_suffix(arn: &str) -> &str {
    arn.rsplit_once('/').map(|(_, id)| id).unwrap_or(arn)
}

/// One container of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_bindings: Option<serde_json::Value>,
}

/// A task as handed back to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_arn: TaskArn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_instance_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
}

fn portable_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<RemoteTask> for TaskRecord {
    fn from(task: RemoteTask) -> Self {
        Self {
            task_arn: task.task_arn,
            cluster_arn: task.cluster_arn,
            task_definition_arn: task.task_definition_arn,
            container_instance_arn: task.container_instance_arn,
            overrides: task.overrides,
            last_status: task.last_status,
            desired_status: task.desired_status,
            containers: task.containers,
            started_by: task.started_by,
            stopped_reason: task.stopped_reason,
            group: task.group,
            created_at: task.created_at.map(portable_timestamp),
            started_at: task.started_at.map(portable_timestamp),
            stopped_at: task.stopped_at.map(portable_timestamp),
        }
    }
}

/// Reason the remote service gave for not describing a requested task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FailureEntry {
    pub fn missing(arn: &str) -> Self {
        Self {
            arn: Some(arn.to_string()),
            reason: Some("MISSING".to_string()),
            detail: None,
        }
    }
}
