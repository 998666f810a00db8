// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Image repository operations
//!
//! Plain pass-throughs: list every image in a repository (optionally by tag
//! status) and batch-delete images. Unlike task listing, faults here are
//! returned to the caller.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RemoteError;

/// Page size requested from ListImages (the API maximum)
pub const LIST_IMAGES_PAGE_SIZE: u32 = 1000;

/// Most images BatchDeleteImage accepts in one call
pub const DELETE_BATCH_LIMIT: usize = 100;

/// Image identifier: a digest, a tag, or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,
}

impl ImageRef {
    pub fn tag(tag: &str) -> Self {
        Self {
            image_digest: None,
            image_tag: Some(tag.to_string()),
        }
    }

    pub fn digest(digest: &str) -> Self {
        Self {
            image_digest: Some(digest.to_string()),
            image_tag: None,
        }
    }

    /// Whether this identifier (as given in a request) selects `stored`
    ///
    /// Every part present in the request must match.
    pub fn selects(&self, stored: &ImageRef) -> bool {
        if self.image_digest.is_none() && self.image_tag.is_none() {
            return false;
        }
        let digest_ok = self
            .image_digest
            .as_ref()
            .is_none_or(|d| stored.image_digest.as_ref() == Some(d));
        let tag_ok = self
            .image_tag
            .as_ref()
            .is_none_or(|t| stored.image_tag.as_ref() == Some(t));
        digest_ok && tag_ok
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.image_digest, &self.image_tag) {
            (Some(d), Some(t)) => write!(f, "{}@{}", t, d),
            (Some(d), None) => f.write_str(d),
            (None, Some(t)) => f.write_str(t),
            (None, None) => f.write_str("<none>"),
        }
    }
}

/// Parses `tag=<tag>`, `digest=<digest>`, a bare `sha256:...` digest, or a bare tag
impl FromStr for ImageRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(tag) = s.strip_prefix("tag=") {
            return non_empty(tag).map(ImageRef::tag);
        }
        if let Some(digest) = s.strip_prefix("digest=") {
            return non_empty(digest).map(ImageRef::digest);
        }
        if s.starts_with("sha256:") {
            return Ok(ImageRef::digest(s));
        }
        non_empty(s).map(ImageRef::tag)
    }
}

fn non_empty(s: &str) -> Result<&str, String> {
    if s.is_empty() {
        Err("image id must not be empty".to_string())
    } else {
        Ok(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagStatus {
    Tagged,
    Untagged,
}

impl TagStatus {
    pub fn matches(&self, image: &ImageRef) -> bool {
        match self {
            TagStatus::Tagged => image.image_tag.is_some(),
            TagStatus::Untagged => image.image_tag.is_none(),
        }
    }
}

/// Per-image failure reported by BatchDeleteImage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFailure {
    pub image_id: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePage {
    pub image_ids: Vec<ImageRef>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteOutput {
    pub image_ids: Vec<ImageRef>,
    pub failures: Vec<ImageFailure>,
}

/// The two ECR calls image operations need from an authenticated session
#[async_trait]
pub trait EcrApi: Send + Sync {
    async fn list_images_page(
        &self,
        repository: &str,
        tag_status: Option<TagStatus>,
        page_size: u32,
        next_token: Option<&str>,
    ) -> Result<ImagePage, RemoteError>;

    async fn batch_delete_image(
        &self,
        repository: &str,
        image_ids: &[ImageRef],
    ) -> Result<BatchDeleteOutput, RemoteError>;
}

/// Images listed from one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageList {
    pub image_ids: Vec<ImageRef>,
}

/// Outcome of a delete request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedImages {
    pub image_ids: Vec<ImageRef>,
    pub failures: Vec<ImageFailure>,
    /// True when at least one image was removed
    pub changed: bool,
}

/// List every image in `repository`, following pagination to the end
pub async fn list_repository_images(
    api: &dyn EcrApi,
    repository: &str,
    tag_status: Option<TagStatus>,
) -> Result<ImageList, RemoteError> {
    let mut image_ids = Vec::new();
    let mut next_token: Option<String> = None;
    let mut page_count = 0u32;

    loop {
        let page = api
            .list_images_page(
                repository,
                tag_status,
                LIST_IMAGES_PAGE_SIZE,
                next_token.as_deref(),
            )
            .await?;
        image_ids.extend(page.image_ids);
        page_count += 1;

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    debug!(
        repository = %repository,
        tag_status = ?tag_status,
        pages = page_count,
        images = image_ids.len(),
        "Listed repository images"
    );

    Ok(ImageList { image_ids })
}

/// Delete `image_ids` from `repository` in a single call
pub async fn delete_repository_images(
    api: &dyn EcrApi,
    repository: &str,
    image_ids: &[ImageRef],
) -> Result<DeletedImages, RemoteError> {
    if image_ids.is_empty() {
        return Err(RemoteError::InvalidParameter(
            "at least one image id is required".to_string(),
        ));
    }
    if image_ids.len() > DELETE_BATCH_LIMIT {
        return Err(RemoteError::InvalidParameter(format!(
            "at most {} image ids can be deleted at once, got {}",
            DELETE_BATCH_LIMIT,
            image_ids.len()
        )));
    }

    let output = api.batch_delete_image(repository, image_ids).await?;

    info!(
        repository = %repository,
        requested = image_ids.len(),
        deleted = output.image_ids.len(),
        failures = output.failures.len(),
        "Deleted repository images"
    );

    Ok(DeletedImages {
        changed: !output.image_ids.is_empty(),
        image_ids: output.image_ids,
        failures: output.failures,
    })
}
