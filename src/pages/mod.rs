//! Routed pages. Each page issues its queries through the shared cache,
//! combines their statuses and shapes the results into a `PageView`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::ApiClient;
use crate::charts::{ChartSeries, HeatmapGrid, ScatterSeries};
use crate::error::{ApiError, ContextError};
use crate::models::{value_text, Assumptions};
use crate::query::{CacheStatus, QueryKey, QueryOptions};
use crate::router::Route;
use crate::state::{Fetch, PageContext};

pub mod overview;
pub mod question1;
pub mod question2;
pub mod question3;
pub mod question4;
pub mod question5;
pub mod question6;
pub mod question7;
pub mod question8;
pub mod assumptions;

/// User input a page may react to. Pages ignore actions they have no use for.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    Run,
    SetThreshold(f64),
}

#[async_trait]
pub trait Page: Send + Sync {
    fn route(&self) -> Route;
    fn title(&self) -> &'static str;
    fn question(&self) -> Option<&'static str>;

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError>;

    /// Returns true when the action changed the page.
    fn apply(&mut self, _action: &PageAction) -> bool {
        false
    }
}

/// Build the page for a route. Called once per route, on first navigation.
pub fn build(route: Route) -> Box<dyn Page> {
    match route {
        Route::Overview => Box::new(overview::OverviewPage),
        Route::Question1 => Box::new(question1::RevenueZonesPage),
        Route::Question2 => Box::new(question2::EfficiencyPage),
        Route::Question3 => Box::new(question3::SurgePage),
        Route::Question4 => Box::new(question4::WaitTimePage::default()),
        Route::Question5 => Box::new(question5::CongestionPage),
        Route::Question6 => Box::new(question6::IncentivesPage),
        Route::Question7 => Box::new(question7::VariabilityPage),
        Route::Question8 => Box::new(question8::SimulationPage::default()),
        Route::Assumptions => Box::new(assumptions::AssumptionsPage),
    }
}

// ============================================================================
// QUERY STATUS
// ============================================================================

#[derive(Debug)]
pub enum QueryStatus<T> {
    /// Disabled until the user asks for it.
    Idle,
    Loading,
    Failed(String),
    Ready(Arc<T>),
}

impl<T> QueryStatus<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryStatus::Ready(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Run a query through the page's cache and report its status.
///
/// With `Fetch::Wait` the query is awaited until it settles. With
/// `Fetch::Background` a fetch is spawned unless the value is fresh or already
/// being fetched, and the call returns at once: `Ready` with whatever value the
/// cache holds (possibly stale), `Loading` when it holds none.
pub(crate) async fn query<T, F, Fut>(
    ctx: &PageContext,
    key: QueryKey,
    options: QueryOptions,
    fetch: F,
) -> Result<QueryStatus<T>, ContextError>
where
    T: Send + Sync + 'static,
    F: Fn(ApiClient) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let api = ctx.api()?.clone();
    let queries = ctx.queries()?;
    ctx.record(&key).await;

    if ctx.fetch() == Fetch::Background {
        let status = queries.status(&key).await;
        let cached = queries.cached::<T>(&key).await;
        if !matches!(status, CacheStatus::Fresh | CacheStatus::Fetching) {
            let queries = queries.clone();
            tokio::spawn(async move {
                if let Err(e) = queries.fetch(key, options, move || fetch(api.clone())).await {
                    tracing::debug!("Background query failed: {}", e);
                }
            });
        }
        return Ok(match cached {
            Some(value) => QueryStatus::Ready(value),
            None => QueryStatus::Loading,
        });
    }

    let outcome = queries.fetch(key, options, move || fetch(api.clone())).await;
    Ok(match outcome {
        Ok(value) => QueryStatus::Ready(value),
        Err(e) => QueryStatus::Failed(e.to_string()),
    })
}

/// Like `query`, but stays `Idle` without touching the network while disabled.
pub(crate) async fn query_when<T, F, Fut>(
    enabled: bool,
    ctx: &PageContext,
    key: QueryKey,
    options: QueryOptions,
    fetch: F,
) -> Result<QueryStatus<T>, ContextError>
where
    T: Send + Sync + 'static,
    F: Fn(ApiClient) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    if !enabled {
        return Ok(QueryStatus::Idle);
    }
    query(ctx, key, options, fetch).await
}

// ============================================================================
// PAGE STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PageState {
    Loading,
    Failed {
        heading: String,
        message: String,
        hint: String,
    },
    Ready(PageView),
}

impl PageState {
    pub fn failed(heading: &str, message: &str, backend: &str) -> Self {
        PageState::Failed {
            heading: heading.to_string(),
            message: message.to_string(),
            hint: format!("Please ensure the backend API is running at {}", backend),
        }
    }
}

/// Loading/error gate over a page's required queries.
///
/// Any loading query makes the whole page loading; otherwise the first failed
/// query fails the page. `None` means every required query can be rendered.
pub struct Gate<'a> {
    loading: bool,
    failure: Option<&'a str>,
}

impl<'a> Gate<'a> {
    pub fn new() -> Self {
        Gate {
            loading: false,
            failure: None,
        }
    }

    pub fn require<T>(mut self, status: &'a QueryStatus<T>) -> Self {
        self.loading |= status.is_loading();
        if self.failure.is_none() {
            self.failure = status.error();
        }
        self
    }

    /// Optional queries only hold the page while they load; their failures are dropped.
    pub fn wait_for<T>(mut self, status: &QueryStatus<T>) -> Self {
        self.loading |= status.is_loading();
        self
    }

    pub fn check(self, heading: &str, backend: &str) -> Option<PageState> {
        if self.loading {
            return Some(PageState::Loading);
        }
        self.failure
            .map(|message| PageState::failed(heading, message, backend))
    }
}

impl Default for Gate<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// VIEW MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub x: &'static str,
    pub y: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Section {
    Alert {
        severity: Severity,
        title: Option<String>,
        lines: Vec<String>,
    },
    Cards(Vec<Card>),
    Bar {
        title: String,
        axes: Axes,
        series: ChartSeries,
    },
    Line {
        title: String,
        axes: Axes,
        series: ChartSeries,
    },
    Scatter {
        title: String,
        axes: Axes,
        series: ScatterSeries,
    },
    Heatmap {
        title: String,
        grid: HeatmapGrid,
    },
    Bullets {
        title: String,
        items: Vec<String>,
    },
    Paragraph {
        title: Option<String>,
        text: String,
    },
}

impl Section {
    pub fn bar(title: &str, x: &'static str, y: &'static str, series: ChartSeries) -> Self {
        Section::Bar {
            title: title.to_string(),
            axes: Axes { x, y },
            series,
        }
    }

    pub fn line(title: &str, x: &'static str, y: &'static str, series: ChartSeries) -> Self {
        Section::Line {
            title: title.to_string(),
            axes: Axes { x, y },
            series,
        }
    }

    pub fn scatter(title: &str, x: &'static str, y: &'static str, series: ScatterSeries) -> Self {
        Section::Scatter {
            title: title.to_string(),
            axes: Axes { x, y },
            series,
        }
    }

    pub fn bullets(title: &str, items: Vec<String>) -> Self {
        Section::Bullets {
            title: title.to_string(),
            items,
        }
    }

    pub fn paragraph(title: Option<&str>, text: &str) -> Self {
        Section::Paragraph {
            title: title.map(str::to_string),
            text: text.to_string(),
        }
    }

    /// The payload's assumptions as `key: value` lines. `None` when there are none.
    pub fn assumptions(assumptions: &Assumptions) -> Option<Self> {
        if assumptions.is_empty() {
            return None;
        }
        Some(Section::Alert {
            severity: Severity::Info,
            title: Some("Assumptions".to_string()),
            lines: assumptions
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value_text(value)))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: String,
    pub question: Option<String>,
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn for_page(page: &dyn Page) -> Self {
        PageView {
            title: page.title().to_string(),
            question: page.question().map(str::to_string),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn push_some(&mut self, section: Option<Section>) {
        if let Some(section) = section {
            self.sections.push(section);
        }
    }

    /// Add a chart section only when it has something to draw.
    pub fn push_chart(&mut self, section: Section) {
        let empty = match &section {
            Section::Bar { series, .. } | Section::Line { series, .. } => series.is_empty(),
            Section::Scatter { series, .. } => series.is_empty(),
            Section::Heatmap { grid, .. } => grid.cells.is_empty(),
            _ => false,
        };
        if !empty {
            self.sections.push(section);
        }
    }
}
