//! Session-lifetime selection state shared by every page.
//!
//! Both containers are plain values. Setters consume the snapshot and return the
//! updated one; the shell swaps its copy and hands the new snapshot to the next page.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::error::ContextError;
use crate::query::{QueryClient, QueryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    /// The four months of trip data the backend is loaded with.
    fn default() -> Self {
        DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap_or_default(),
        }
    }
}

impl DateRange {
    /// Swaps the bounds when given in reverse order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Dashboard filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterState {
    pub date_range: DateRange,
    pub selected_zones: BTreeSet<i64>,
    pub selected_metrics: BTreeSet<String>,
}

impl FilterState {
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_selected_zones<I: IntoIterator<Item = i64>>(mut self, zones: I) -> Self {
        self.selected_zones = zones.into_iter().collect();
        self
    }

    pub fn with_selected_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_metrics = metrics.into_iter().map(Into::into).collect();
        self
    }
}

/// General app selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppSelection {
    pub selected_zones: BTreeSet<i64>,
    pub date_range: DateRange,
}

impl AppSelection {
    pub fn with_selected_zones<I: IntoIterator<Item = i64>>(mut self, zones: I) -> Self {
        self.selected_zones = zones.into_iter().collect();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardState {
    pub app: AppSelection,
    pub filters: FilterState,
}

impl DashboardState {
    pub fn with_app(self, app: AppSelection) -> Self {
        DashboardState { app, ..self }
    }

    pub fn with_filters(self, filters: FilterState) -> Self {
        DashboardState { filters, ..self }
    }
}

#[derive(Clone)]
struct Services {
    api: ApiClient,
    queries: QueryClient,
    state: DashboardState,
}

/// How a page load treats queries that have no fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fetch {
    /// Await every query until it settles.
    #[default]
    Wait,
    /// Start missing fetches in the background and render what the cache holds now.
    Background,
}

/// What a page gets to work with. Built by the shell for every load.
#[derive(Clone)]
pub struct PageContext {
    services: Option<Services>,
    fetch: Fetch,
    used: Arc<Mutex<Vec<QueryKey>>>,
}

impl PageContext {
    pub fn new(api: ApiClient, queries: QueryClient, state: DashboardState) -> Self {
        PageContext {
            services: Some(Services { api, queries, state }),
            fetch: Fetch::Wait,
            used: Arc::default(),
        }
    }

    /// A context with nothing behind it. Every accessor fails.
    pub fn detached() -> Self {
        PageContext {
            services: None,
            fetch: Fetch::Wait,
            used: Arc::default(),
        }
    }

    pub fn with_fetch(mut self, fetch: Fetch) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn fetch(&self) -> Fetch {
        self.fetch
    }

    pub(crate) async fn record(&self, key: &QueryKey) {
        let mut used = self.used.lock().await;
        if !used.contains(key) {
            used.push(key.clone());
        }
    }

    /// Keys of every query issued through this context, in first-use order.
    pub async fn used_keys(&self) -> Vec<QueryKey> {
        self.used.lock().await.clone()
    }

    fn services(&self, what: &'static str) -> Result<&Services, ContextError> {
        self.services
            .as_ref()
            .ok_or(ContextError::OutsideProvider(what))
    }

    pub fn api(&self) -> Result<&ApiClient, ContextError> {
        self.services("ApiClient").map(|s| &s.api)
    }

    pub fn queries(&self) -> Result<&QueryClient, ContextError> {
        self.services("QueryClient").map(|s| &s.queries)
    }

    pub fn app(&self) -> Result<&AppSelection, ContextError> {
        self.services("AppSelection").map(|s| &s.state.app)
    }

    pub fn filters(&self) -> Result<&FilterState, ContextError> {
        self.services("FilterState").map(|s| &s.state.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DashboardState::default();
        assert_eq!(state.filters.date_range.start.to_string(), "2025-01-01");
        assert_eq!(state.filters.date_range.end.to_string(), "2025-04-30");
        assert_eq!(state.app.date_range, state.filters.date_range);
        assert!(state.app.selected_zones.is_empty());
        assert!(state.filters.selected_metrics.is_empty());
    }

    #[test]
    fn test_setters_return_new_snapshot() {
        let before = DashboardState::default();
        let after = before
            .clone()
            .with_filters(before.filters.clone().with_selected_zones([132, 161, 132]));

        assert!(before.filters.selected_zones.is_empty());
        assert_eq!(after.filters.selected_zones.len(), 2);
        assert_eq!(after.app, before.app);
    }

    #[test]
    fn test_date_range_orders_bounds() {
        let a = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let range = DateRange::new(a, b);
        assert_eq!(range.start, b);
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()));
    }

    #[test]
    fn test_detached_context_fails_fast() {
        let ctx = PageContext::detached();
        assert_eq!(
            ctx.filters().unwrap_err(),
            ContextError::OutsideProvider("FilterState")
        );
        assert_eq!(
            ctx.app().unwrap_err().to_string(),
            "AppSelection must be used within the dashboard shell"
        );
        assert!(ctx.api().is_err());
    }
}
