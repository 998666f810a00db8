// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{EcsApi, ListTasksQuery, TaskArn};
use crate::error::Absorbed;

/// Page size requested from ListTasks (the API maximum)
pub const LIST_PAGE_SIZE: u32 = 100;

/// Collects every task ARN matching one ListTasks query across all pages
pub struct PaginatedLister<'a> {
    api: &'a dyn EcsApi,
    page_size: u32,
}

impl<'a> PaginatedLister<'a> {
    pub fn new(api: &'a dyn EcsApi) -> Self {
        Self {
            api,
            page_size: LIST_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, LIST_PAGE_SIZE);
        self
    }

    /// List all task ARNs for `query`, following continuation tokens
    ///
    /// A fault on any page abandons the query and is returned as [`Absorbed`];
    /// callers treat that as "no tasks" for this query. Pages are not retried.
    pub async fn list(&self, query: &ListTasksQuery) -> Result<HashSet<TaskArn>, Absorbed> {
        let mut arns: HashSet<TaskArn> = HashSet::new();
        let mut next_token: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            let page = match self
                .api
                .list_tasks_page(query, self.page_size, next_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        query = %query,
                        page = page_count + 1,
                        error = %e,
                        "List query failed, treating as empty"
                    );
                    return Err(Absorbed {
                        query: query.to_string(),
                        source: e,
                    });
                }
            };

            let items_count = page.task_arns.len();
            arns.extend(page.task_arns);
            page_count += 1;

            match page.next_token {
                Some(token) if !token.is_empty() => {
                    debug!(
                        query = %query,
                        page = page_count,
                        items_this_page = items_count,
                        total_so_far = arns.len(),
                        "Fetched page, continuing"
                    );
                    next_token = Some(token);
                }
                _ => break,
            }
        }

        if page_count > 1 {
            debug!(
                query = %query,
                pages = page_count,
                total_items = arns.len(),
                "Pagination complete"
            );
        }

        Ok(arns)
    }
}
