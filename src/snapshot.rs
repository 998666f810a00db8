// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Snapshot-backed session
//!
//! Serves the ECS and ECR calls from a JSON or YAML snapshot of one or more
//! regions, following the same rules as the real APIs:
//! - ListTasks pages with opaque continuation tokens and rejects unknown
//!   clusters and services
//! - DescribeTasks reports unknown tasks as `MISSING` failures
//! - BatchDeleteImage removes matching images and reports the rest
//!
//! Image deletions are written back to the snapshot file atomically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use crate::config::SessionSettings;
use crate::ecr::{
    BatchDeleteOutput, DELETE_BATCH_LIMIT, EcrApi, ImageFailure, ImagePage, ImageRef,
    LIST_IMAGES_PAGE_SIZE, TagStatus,
};
use crate::ecs::{
    DEFAULT_CLUSTER, DESCRIBE_BATCH_LIMIT, DescribeTasksOutput, EcsApi, ExclusiveFilter,
    FailureEntry, LIST_PAGE_SIZE, ListTasksQuery, RemoteTask, TaskArn, TaskPage,
};
use crate::error::{ConfigError, RemoteError};

/// Whole snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub regions: BTreeMap<String, RegionSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    #[serde(default)]
    pub clusters: Vec<ClusterSnapshot>,
    #[serde(default)]
    pub repositories: Vec<RepositorySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    /// Service names defined in the cluster
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<RemoteTask>,
}

impl ClusterSnapshot {
    fn is_named(&self, name: &str) -> bool {
        self.cluster_name == name || self.cluster_arn.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    pub repository_name: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SnapshotRead {
            path: display.clone(),
            source,
        })?;
        let parsed = match SnapshotFormat::for_path(path) {
            SnapshotFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            SnapshotFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| ConfigError::SnapshotParse {
            path: display,
            reason,
        })
    }

    fn to_file_content(&self, format: SnapshotFormat) -> Result<String> {
        match format {
            SnapshotFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
            }
            SnapshotFormat::Yaml => {
                serde_yaml::to_string(self).context("Failed to serialize snapshot")
            }
        }
    }
}

/// Atomically write content to a file using tempfile + rename
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))
        .context("Failed to create temp file")?;

    std::fs::write(temp_file.path(), content)
        .with_context(|| format!("Failed to write temp file {:?}", temp_file.path()))?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file to {:?}", path))?;

    Ok(())
}

/// Session answering API calls for one region of a snapshot
pub struct SnapshotSession {
    region: String,
    snapshot: RwLock<Snapshot>,
    /// Backing file; `None` for in-memory sessions
    path: Option<PathBuf>,
}

impl SnapshotSession {
    /// Open the snapshot named by `settings` and select its region
    pub fn open(settings: &SessionSettings) -> Result<Self, ConfigError> {
        let snapshot = Snapshot::load(&settings.snapshot)?;
        let mut session = Self::from_snapshot(snapshot, &settings.region).map_err(|e| match e {
            ConfigError::UnknownRegion { region, .. } => ConfigError::UnknownRegion {
                region,
                path: settings.snapshot.display().to_string(),
            },
            other => other,
        })?;
        session.path = Some(settings.snapshot.clone());

        info!(
            region = %settings.region,
            snapshot = %settings.snapshot.display(),
            "Opened snapshot session"
        );
        Ok(session)
    }

    /// In-memory session over `snapshot`
    pub fn from_snapshot(snapshot: Snapshot, region: &str) -> Result<Self, ConfigError> {
        if !snapshot.regions.contains_key(region) {
            return Err(ConfigError::UnknownRegion {
                region: region.to_string(),
                path: "<memory>".to_string(),
            });
        }
        Ok(Self {
            region: region.to_string(),
            snapshot: RwLock::new(snapshot),
            path: None,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Write the current state back to the backing file, if any
    pub async fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let snapshot = self.snapshot.read().await;
        let content = snapshot.to_file_content(SnapshotFormat::for_path(path))?;
        atomic_write(path, content.as_bytes())?;
        debug!(snapshot = %path.display(), "Persisted snapshot");
        Ok(())
    }

    fn region_of<'s>(&self, snapshot: &'s Snapshot) -> Result<&'s RegionSnapshot, RemoteError> {
        snapshot
            .regions
            .get(&self.region)
            .ok_or_else(|| RemoteError::Service(format!("region '{}' unavailable", self.region)))
    }
}

fn find_cluster<'r>(
    region: &'r RegionSnapshot,
    name: Option<&str>,
) -> Result<&'r ClusterSnapshot, RemoteError> {
    let name = name.unwrap_or(DEFAULT_CLUSTER);
    region
        .clusters
        .iter()
        .find(|c| c.is_named(name))
        .ok_or_else(|| RemoteError::ClusterNotFound(name.to_string()))
}

fn matches_query(task: &RemoteTask, query: &ListTasksQuery) -> bool {
    if let Some(ref node) = query.filters.container_instance {
        let on_node = task
            .container_instance_arn
            .as_deref()
            .is_some_and(|arn| arn == node || arn.ends_with(&format!("/{}", node)));
        if !on_node {
            return false;
        }
    }
    if let Some(ref started_by) = query.filters.started_by
        && task.started_by.as_deref() != Some(started_by.as_str())
    {
        return false;
    }
    match query.exclusive {
        None => true,
        Some(ExclusiveFilter::Family(ref family)) => task.family() == Some(family.as_str()),
        Some(ExclusiveFilter::ServiceName(ref service)) => {
            task.service_name() == Some(service.as_str())
        }
        Some(ExclusiveFilter::DesiredStatus(status)) => {
            task.desired_status.as_deref() == Some(status.as_str())
        }
    }
}

/// Slice one page out of `items`; tokens are offsets into the full listing
fn paginate<T: Clone>(
    items: &[T],
    page_size: u32,
    max_page_size: u32,
    next_token: Option<&str>,
) -> Result<(Vec<T>, Option<String>), RemoteError> {
    if page_size == 0 || page_size > max_page_size {
        return Err(RemoteError::InvalidParameter(format!(
            "maxResults must be between 1 and {}, got {}",
            max_page_size, page_size
        )));
    }
    let start: usize = match next_token {
        Some(token) => token
            .parse()
            .ok()
            .filter(|offset| *offset <= items.len())
            .ok_or_else(|| RemoteError::InvalidToken(token.to_string()))?,
        None => 0,
    };
    let end = (start + page_size as usize).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok((items[start..end].to_vec(), next))
}

#[async_trait]
impl EcsApi for SnapshotSession {
    async fn list_tasks_page(
        &self,
        query: &ListTasksQuery,
        page_size: u32,
        next_token: Option<&str>,
    ) -> Result<TaskPage, RemoteError> {
        let snapshot = self.snapshot.read().await;
        let cluster = find_cluster(self.region_of(&snapshot)?, query.cluster())?;

        if let Some(ExclusiveFilter::ServiceName(ref service)) = query.exclusive
            && !cluster.services.iter().any(|s| s == service)
        {
            return Err(RemoteError::ServiceNotFound(service.clone()));
        }

        let mut arns: Vec<TaskArn> = cluster
            .tasks
            .iter()
            .filter(|t| matches_query(t, query))
            .map(|t| t.task_arn.clone())
            .collect();
        arns.sort();

        let (task_arns, next_token) = paginate(&arns, page_size, LIST_PAGE_SIZE, next_token)?;
        trace!(
            query = %query,
            returned = task_arns.len(),
            more = next_token.is_some(),
            "ListTasks page"
        );
        Ok(TaskPage {
            task_arns,
            next_token,
        })
    }

    async fn describe_tasks(
        &self,
        cluster: Option<&str>,
        task_arns: &[TaskArn],
    ) -> Result<DescribeTasksOutput, RemoteError> {
        if task_arns.len() > DESCRIBE_BATCH_LIMIT {
            return Err(RemoteError::InvalidParameter(format!(
                "at most {} tasks can be described at once, got {}",
                DESCRIBE_BATCH_LIMIT,
                task_arns.len()
            )));
        }

        let snapshot = self.snapshot.read().await;
        let cluster = find_cluster(self.region_of(&snapshot)?, cluster)?;

        let mut output = DescribeTasksOutput::default();
        for arn in task_arns {
            match cluster.tasks.iter().find(|t| t.is_named(arn)) {
                Some(task) => output.tasks.push(task.clone()),
                None => output.failures.push(FailureEntry::missing(arn)),
            }
        }
        Ok(output)
    }
}

#[async_trait]
impl EcrApi for SnapshotSession {
    async fn list_images_page(
        &self,
        repository: &str,
        tag_status: Option<TagStatus>,
        page_size: u32,
        next_token: Option<&str>,
    ) -> Result<ImagePage, RemoteError> {
        let snapshot = self.snapshot.read().await;
        let repo = self
            .region_of(&snapshot)?
            .repositories
            .iter()
            .find(|r| r.repository_name == repository)
            .ok_or_else(|| RemoteError::RepositoryNotFound(repository.to_string()))?;

        let images: Vec<ImageRef> = repo
            .images
            .iter()
            .filter(|i| tag_status.is_none_or(|s| s.matches(i)))
            .cloned()
            .collect();

        let (image_ids, next_token) =
            paginate(&images, page_size, LIST_IMAGES_PAGE_SIZE, next_token)?;
        Ok(ImagePage {
            image_ids,
            next_token,
        })
    }

    async fn batch_delete_image(
        &self,
        repository: &str,
        image_ids: &[ImageRef],
    ) -> Result<BatchDeleteOutput, RemoteError> {
        if image_ids.is_empty() || image_ids.len() > DELETE_BATCH_LIMIT {
            return Err(RemoteError::InvalidParameter(format!(
                "between 1 and {} image ids required, got {}",
                DELETE_BATCH_LIMIT,
                image_ids.len()
            )));
        }

        let mut snapshot = self.snapshot.write().await;
        let region = snapshot
            .regions
            .get_mut(&self.region)
            .ok_or_else(|| RemoteError::Service(format!("region '{}' unavailable", self.region)))?;
        let repo = region
            .repositories
            .iter_mut()
            .find(|r| r.repository_name == repository)
            .ok_or_else(|| RemoteError::RepositoryNotFound(repository.to_string()))?;

        let mut output = BatchDeleteOutput::default();
        for requested in image_ids {
            if requested.image_digest.is_none() && requested.image_tag.is_none() {
                output.failures.push(ImageFailure {
                    image_id: requested.clone(),
                    failure_code: Some("MissingDigestAndTag".to_string()),
                    failure_reason: Some("Neither digest nor tag was given".to_string()),
                });
                continue;
            }
            let Some(index) = repo.images.iter().position(|stored| requested.selects(stored))
            else {
                output.failures.push(ImageFailure {
                    image_id: requested.clone(),
                    failure_code: Some("ImageNotFound".to_string()),
                    failure_reason: Some("Requested image not found".to_string()),
                });
                continue;
            };
            match requested.image_digest {
                // Deleting by digest removes the image together with every tag on it
                Some(ref digest) => {
                    let (removed, kept): (Vec<ImageRef>, Vec<ImageRef>) =
                        std::mem::take(&mut repo.images)
                            .into_iter()
                            .partition(|stored| stored.image_digest.as_ref() == Some(digest));
                    repo.images = kept;
                    output.image_ids.extend(removed);
                }
                None => output.image_ids.push(repo.images.remove(index)),
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{DesiredStatus, TaskFilters};
    use tempfile::TempDir;

    const SNAPSHOT_YAML: &str = r#"
regions:
  us-east-1:
    clusters:
      - clusterName: c1
        clusterArn: arn:aws:ecs:us-east-1:123456789012:cluster/c1
        services: [web-svc]
        tasks:
          - taskArn: arn:aws:ecs:us-east-1:123456789012:task/c1/t1
            taskDefinitionArn: arn:aws:ecs:us-east-1:123456789012:task-definition/web:3
            containerInstanceArn: arn:aws:ecs:us-east-1:123456789012:container-instance/c1/ci-1
            group: service:web-svc
            desiredStatus: RUNNING
            startedBy: ecs-svc/123
            createdAt: 2024-05-01T10:00:00Z
          - taskArn: arn:aws:ecs:us-east-1:123456789012:task/c1/t2
            taskDefinitionArn: arn:aws:ecs:us-east-1:123456789012:task-definition/web:3
            containerInstanceArn: arn:aws:ecs:us-east-1:123456789012:container-instance/c1/ci-2
            group: family:web
            desiredStatus: STOPPED
          - taskArn: arn:aws:ecs:us-east-1:123456789012:task/c1/t3
            taskDefinitionArn: arn:aws:ecs:us-east-1:123456789012:task-definition/batch:1
            containerInstanceArn: arn:aws:ecs:us-east-1:123456789012:container-instance/c1/ci-1
            desiredStatus: RUNNING
      - clusterName: default
    repositories:
      - repositoryName: app
        images:
          - imageDigest: sha256:01
            imageTag: latest
          - imageDigest: sha256:02
  eu-west-1: {}
"#;

    fn session() -> SnapshotSession {
        let snapshot: Snapshot = serde_yaml::from_str(SNAPSHOT_YAML).unwrap();
        SnapshotSession::from_snapshot(snapshot, "us-east-1").unwrap()
    }

    fn c1(exclusive: Option<ExclusiveFilter>) -> ListTasksQuery {
        ListTasksQuery {
            filters: TaskFilters {
                cluster: Some("c1".to_string()),
                ..Default::default()
            },
            exclusive,
        }
    }

    fn ids(page: &TaskPage) -> Vec<&str> {
        page.task_arns
            .iter()
            .map(|a| a.rsplit('/').next().unwrap_or(a))
            .collect()
    }

    #[tokio::test]
    async fn test_list_by_each_dimension() {
        let s = session();

        let family = s
            .list_tasks_page(&c1(Some(ExclusiveFilter::Family("web".into()))), 100, None)
            .await
            .unwrap();
        assert_eq!(ids(&family), vec!["t1", "t2"]);

        let service = s
            .list_tasks_page(
                &c1(Some(ExclusiveFilter::ServiceName("web-svc".into()))),
                100,
                None,
            )
            .await
            .unwrap();
        assert_eq!(ids(&service), vec!["t1"]);

        let running = s
            .list_tasks_page(
                &c1(Some(ExclusiveFilter::DesiredStatus(DesiredStatus::Running))),
                100,
                None,
            )
            .await
            .unwrap();
        assert_eq!(ids(&running), vec!["t1", "t3"]);
    }

    #[tokio::test]
    async fn test_list_shared_filters() {
        let s = session();
        let mut query = c1(None);
        query.filters.container_instance = Some("ci-1".to_string());
        let page = s.list_tasks_page(&query, 100, None).await.unwrap();
        assert_eq!(ids(&page), vec!["t1", "t3"]);

        query.filters.started_by = Some("ecs-svc/123".to_string());
        let page = s.list_tasks_page(&query, 100, None).await.unwrap();
        assert_eq!(ids(&page), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_list_cluster_by_arn() {
        let s = session();
        let mut query = c1(None);
        query.filters.cluster = Some("arn:aws:ecs:us-east-1:123456789012:cluster/c1".into());
        let page = s.list_tasks_page(&query, 100, None).await.unwrap();
        assert_eq!(page.task_arns.len(), 3);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let s = session();
        let first = s.list_tasks_page(&c1(None), 2, None).await.unwrap();
        assert_eq!(ids(&first), vec!["t1", "t2"]);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = s
            .list_tasks_page(&c1(None), 2, first.next_token.as_deref())
            .await
            .unwrap();
        assert_eq!(ids(&second), vec!["t3"]);
        assert_eq!(second.next_token, None);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_requests() {
        let s = session();

        let err = s
            .list_tasks_page(
                &c1(Some(ExclusiveFilter::ServiceName("nope".into()))),
                100,
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::ServiceNotFound("nope".into()));

        let mut query = c1(None);
        query.filters.cluster = Some("c9".into());
        let err = s.list_tasks_page(&query, 100, None).await.unwrap_err();
        assert_eq!(err, RemoteError::ClusterNotFound("c9".into()));

        let err = s.list_tasks_page(&c1(None), 101, None).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidParameter(_)));

        let err = s
            .list_tasks_page(&c1(None), 10, Some("bogus"))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::InvalidToken("bogus".into()));
    }

    #[tokio::test]
    async fn test_default_cluster_used_when_unnamed() {
        let s = session();
        let page = s
            .list_tasks_page(&ListTasksQuery::default(), 100, None)
            .await
            .unwrap();
        assert!(page.task_arns.is_empty());
    }

    #[tokio::test]
    async fn test_describe_reports_missing() {
        let s = session();
        let output = s
            .describe_tasks(Some("c1"), &["t1".to_string(), "t404".to_string()])
            .await
            .unwrap();
        assert_eq!(output.tasks.len(), 1);
        assert_eq!(output.tasks[0].family(), Some("web"));
        assert_eq!(output.failures, vec![FailureEntry::missing("t404")]);
    }

    #[tokio::test]
    async fn test_describe_enforces_batch_limit() {
        let s = session();
        let arns: Vec<TaskArn> = (0..=DESCRIBE_BATCH_LIMIT).map(|i| i.to_string()).collect();
        let err = s.describe_tasks(Some("c1"), &arns).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_images_list_and_delete() {
        let s = session();

        let untagged = s
            .list_images_page("app", Some(TagStatus::Untagged), 1000, None)
            .await
            .unwrap();
        assert_eq!(untagged.image_ids, vec![ImageRef::digest("sha256:02")]);

        let output = s
            .batch_delete_image("app", &[ImageRef::tag("latest"), ImageRef::tag("v9")])
            .await
            .unwrap();
        assert_eq!(output.image_ids.len(), 1);
        assert_eq!(output.image_ids[0].image_digest.as_deref(), Some("sha256:01"));
        assert_eq!(output.failures[0].image_id, ImageRef::tag("v9"));

        let remaining = s.list_images_page("app", None, 1000, None).await.unwrap();
        assert_eq!(remaining.image_ids, vec![ImageRef::digest("sha256:02")]);

        let err = s.list_images_page("nope", None, 1000, None).await.unwrap_err();
        assert_eq!(err, RemoteError::RepositoryNotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_delete_by_digest_removes_every_tag() {
        let snapshot: Snapshot = serde_yaml::from_str(
            r#"
regions:
  us-east-1:
    repositories:
      - repositoryName: app
        images:
          - imageDigest: sha256:01
            imageTag: v1
          - imageDigest: sha256:01
            imageTag: latest
          - imageDigest: sha256:02
            imageTag: v2
"#,
        )
        .unwrap();
        let s = SnapshotSession::from_snapshot(snapshot, "us-east-1").unwrap();

        let output = s
            .batch_delete_image("app", &[ImageRef::digest("sha256:01")])
            .await
            .unwrap();
        let tags: Vec<&str> = output
            .image_ids
            .iter()
            .filter_map(|i| i.image_tag.as_deref())
            .collect();
        assert_eq!(tags, vec!["v1", "latest"]);
        assert!(output.failures.is_empty());

        let remaining = s.list_images_page("app", None, 1000, None).await.unwrap();
        assert_eq!(remaining.image_ids.len(), 1);
        assert_eq!(remaining.image_ids[0].image_tag.as_deref(), Some("v2"));

        let again = s
            .batch_delete_image("app", &[ImageRef::digest("sha256:01")])
            .await
            .unwrap();
        assert!(again.image_ids.is_empty());
        assert_eq!(again.failures[0].failure_code.as_deref(), Some("ImageNotFound"));
    }

    #[tokio::test]
    async fn test_delete_by_tag_keeps_other_tags() {
        let snapshot: Snapshot = serde_yaml::from_str(
            r#"
regions:
  us-east-1:
    repositories:
      - repositoryName: app
        images:
          - imageDigest: sha256:01
            imageTag: v1
          - imageDigest: sha256:01
            imageTag: latest
"#,
        )
        .unwrap();
        let s = SnapshotSession::from_snapshot(snapshot, "us-east-1").unwrap();

        let output = s
            .batch_delete_image("app", &[ImageRef::tag("v1")])
            .await
            .unwrap();
        assert_eq!(output.image_ids.len(), 1);

        let remaining = s.list_images_page("app", None, 1000, None).await.unwrap();
        assert_eq!(remaining.image_ids.len(), 1);
        assert_eq!(remaining.image_ids[0].image_tag.as_deref(), Some("latest"));
    }

    #[test]
    fn test_unknown_region_is_config_error() {
        let snapshot: Snapshot = serde_yaml::from_str(SNAPSHOT_YAML).unwrap();
        let err = SnapshotSession::from_snapshot(snapshot, "ap-south-1").err().unwrap();
        assert!(matches!(err, ConfigError::UnknownRegion { ref region, .. } if region == "ap-south-1"));
    }

    #[tokio::test]
    async fn test_open_and_persist_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.yaml");
        std::fs::write(&path, SNAPSHOT_YAML).unwrap();

        let settings = SessionSettings {
            region: "us-east-1".to_string(),
            snapshot: path.clone(),
            page_size: LIST_PAGE_SIZE,
        };
        let s = SnapshotSession::open(&settings).unwrap();
        s.batch_delete_image("app", &[ImageRef::digest("sha256:02")])
            .await
            .unwrap();
        s.persist().await.unwrap();

        let reloaded = Snapshot::load(&path).unwrap();
        let images = &reloaded.regions["us-east-1"].repositories[0].images;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image_tag.as_deref(), Some("latest"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Snapshot::load(&path),
            Err(ConfigError::SnapshotParse { .. })
        ));
        assert!(matches!(
            Snapshot::load(&temp_dir.path().join("absent.json")),
            Err(ConfigError::SnapshotRead { .. })
        ));
    }
}
