use super::{Render, Tabular};
use crate::config::Config;
use crate::ecr::{DeletedImages, ImageList, ImageRef};
use crate::ecs::{FailureEntry, QueryResult, TaskRecord};

const TASK_COLUMNS: &[&str] = &[
    "task_arn",
    "last_status",
    "desired_status",
    "task_definition",
    "group",
    "started_at",
    "containers",
    "stopped_reason",
    "failure",
];

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn last_segment(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

fn task_row(task: &TaskRecord) -> Vec<String> {
    let containers: Vec<&str> = task
        .containers
        .iter()
        .filter_map(|c| c.name.as_deref())
        .collect();
    vec![
        task.task_arn.clone(),
        text(&task.last_status),
        text(&task.desired_status),
        task.task_definition_arn
            .as_deref()
            .map(last_segment)
            .unwrap_or_default()
            .to_string(),
        text(&task.group),
        text(&task.started_at),
        containers.join(","),
        text(&task.stopped_reason),
        String::new(),
    ]
}

fn failure_row(failure: &FailureEntry) -> Vec<String> {
    let reason = match (&failure.reason, &failure.detail) {
        (Some(reason), Some(detail)) => format!("{}: {}", reason, detail),
        (Some(reason), None) => reason.clone(),
        (None, Some(detail)) => detail.clone(),
        (None, None) => String::new(),
    };
    let mut row = vec![String::new(); TASK_COLUMNS.len()];
    row[0] = text(&failure.arn);
    row[TASK_COLUMNS.len() - 1] = reason;
    row
}

impl Render for QueryResult {
    fn tabular(&self) -> Tabular {
        match self {
            QueryResult::Identifiers { tasks, .. } => {
                let mut table = Tabular::new(&["task_arn"]);
                for arn in tasks {
                    table.push(vec![arn.clone()]);
                }
                table
            }
            QueryResult::Records {
                tasks, failures, ..
            } => {
                let mut table = Tabular::new(TASK_COLUMNS);
                for task in tasks {
                    table.push(task_row(task));
                }
                for failure in failures {
                    table.push(failure_row(failure));
                }
                table
            }
        }
    }
}

fn image_row(image: &ImageRef) -> Vec<String> {
    vec![text(&image.image_digest), text(&image.image_tag)]
}

impl Render for ImageList {
    fn tabular(&self) -> Tabular {
        let mut table = Tabular::new(&["image_digest", "image_tag"]);
        for image in &self.image_ids {
            table.push(image_row(image));
        }
        table
    }
}

impl Render for DeletedImages {
    fn tabular(&self) -> Tabular {
        let mut table = Tabular::new(&["image_digest", "image_tag", "result"]);
        for image in &self.image_ids {
            let mut row = image_row(image);
            row.push("deleted".to_string());
            table.push(row);
        }
        for failure in &self.failures {
            let mut row = image_row(&failure.image_id);
            row.push(
                failure
                    .failure_code
                    .clone()
                    .or_else(|| failure.failure_reason.clone())
                    .unwrap_or_else(|| "failed".to_string()),
            );
            table.push(row);
        }
        table
    }
}

impl Render for Config {
    fn tabular(&self) -> Tabular {
        let mut table = Tabular::new(&["key", "value"]);
        table.push(vec!["region".to_string(), text(&self.region)]);
        table.push(vec!["default_cluster".to_string(), text(&self.default_cluster)]);
        table.push(vec![
            "snapshot".to_string(),
            self.snapshot
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ]);
        table.push(vec![
            "page_size".to_string(),
            self.page_size.map(|n| n.to_string()).unwrap_or_default(),
        ]);
        table
    }
}
