// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Multi-criteria task resolution
//!
//! Each exclusive filter becomes its own ListTasks query (carrying all shared
//! filters). The queries run concurrently, each is collected to completion, and
//! the resulting sets are folded with intersection. A query whose fault was
//! absorbed contributes the empty set, which empties the whole result.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use super::{ExclusiveFilter, ListTasksQuery, PaginatedLister, TaskArn, TaskFilters};
use crate::error::Absorbed;

/// A filter query that failed and was treated as matching nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedFilter {
    pub query: String,
    pub error: String,
}

impl From<&Absorbed> for DegradedFilter {
    fn from(absorbed: &Absorbed) -> Self {
        Self {
            query: absorbed.query.clone(),
            error: absorbed.source.to_string(),
        }
    }
}

impl fmt::Display for DegradedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.query, self.error)
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub tasks: BTreeSet<TaskArn>,
    /// Queries whose faults were absorbed; non-empty means `tasks` may be narrower than reality
    pub degraded: Vec<DegradedFilter>,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

pub struct FilterResolver<'a> {
    lister: PaginatedLister<'a>,
}

impl<'a> FilterResolver<'a> {
    pub fn new(lister: PaginatedLister<'a>) -> Self {
        Self { lister }
    }

    /// Resolve the set of tasks matching `filters` and every filter in `exclusive`
    ///
    /// With no exclusive filters a single query with only the shared filters is
    /// issued. Repeated exclusive filters are queried once.
    pub async fn resolve(&self, filters: &TaskFilters, exclusive: &[ExclusiveFilter]) -> Resolution {
        let base = ListTasksQuery::base(filters.clone());

        let mut dimensions: Vec<&ExclusiveFilter> = Vec::with_capacity(exclusive.len());
        for filter in exclusive {
            if !dimensions.contains(&filter) {
                dimensions.push(filter);
            }
        }

        let queries: Vec<ListTasksQuery> = if dimensions.is_empty() {
            vec![base]
        } else {
            dimensions
                .into_iter()
                .map(|f| base.with_exclusive(f.clone()))
                .collect()
        };

        let outcomes = join_all(queries.iter().map(|q| self.lister.list(q))).await;

        let mut degraded = Vec::new();
        let sets: Vec<HashSet<TaskArn>> = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Ok(set) => set,
                Err(absorbed) => {
                    degraded.push(DegradedFilter::from(&absorbed));
                    HashSet::new()
                }
            })
            .collect();

        let per_query: Vec<usize> = sets.iter().map(HashSet::len).collect();
        let tasks: BTreeSet<TaskArn> = intersect_all(sets).into_iter().collect();

        debug!(
            queries = queries.len(),
            per_query = ?per_query,
            degraded = degraded.len(),
            resolved = tasks.len(),
            "Resolved task filters"
        );

        Resolution { tasks, degraded }
    }
}

/// Intersection of all sets; empty when there are none
fn intersect_all(sets: Vec<HashSet<TaskArn>>) -> HashSet<TaskArn> {
    sets.into_iter()
        .reduce(|acc, next| {
            let (small, large) = if acc.len() <= next.len() {
                (acc, next)
            } else {
                (next, acc)
            };
            small.into_iter().filter(|arn| large.contains(arn)).collect()
        })
        .unwrap_or_default()
}
