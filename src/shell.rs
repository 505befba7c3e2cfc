use std::collections::HashMap;

use serde::Serialize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ContextError;
use crate::pages::{self, Page, PageAction, PageState};
use crate::query::{QueryClient, QueryKey, RefetchTrigger};
use crate::router::{header, NavItem, Resolved, Route, APP_TITLE};
use crate::state::{DashboardState, Fetch, PageContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Body {
    Page(PageState),
    NotFound(String),
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub title: &'static str,
    pub nav: Vec<NavItem>,
    pub body: Body,
}

impl Screen {
    pub fn is_loading(&self) -> bool {
        matches!(self.body, Body::Page(PageState::Loading))
    }
}

/// Owns the HTTP client, the query cache and the selection state, and keeps
/// one instance of every page visited so far.
pub struct Dashboard {
    api: ApiClient,
    queries: QueryClient,
    state: DashboardState,
    pages: HashMap<Route, Box<dyn Page>>,
    /// Query keys each page issued on its last render.
    page_keys: HashMap<Route, Vec<QueryKey>>,
    current: Option<Route>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        Self::with_clients(ApiClient::new(config), QueryClient::new(config.stale_time))
    }

    pub fn with_clients(api: ApiClient, queries: QueryClient) -> Self {
        Dashboard {
            api,
            queries,
            state: DashboardState::default(),
            pages: HashMap::new(),
            page_keys: HashMap::new(),
            current: None,
        }
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Replace the selection state with the snapshot returned by `update`.
    pub fn update_state<F>(&mut self, update: F)
    where
        F: FnOnce(DashboardState) -> DashboardState,
    {
        self.state = update(self.state.clone());
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    /// Routes whose page has been built.
    pub fn loaded_pages(&self) -> Vec<Route> {
        let mut routes: Vec<Route> = self.pages.keys().copied().collect();
        routes.sort_by_key(|r| *r as usize);
        routes
    }

    fn context(&self) -> PageContext {
        PageContext::new(self.api.clone(), self.queries.clone(), self.state.clone())
    }

    fn screen(&self, body: Body) -> Screen {
        Screen {
            title: APP_TITLE,
            nav: header(self.current),
            body,
        }
    }

    /// Where the backend is expected to be reachable.
    pub fn backend_location(&self) -> &str {
        self.api.backend_location()
    }

    /// Navigate and wait for the page's queries to settle.
    pub async fn navigate(&mut self, path: &str) -> Result<Screen, ContextError> {
        self.open(path, Fetch::Wait).await
    }

    /// Navigate to `path`. With `Fetch::Background` the screen shows what the
    /// cache holds right now, which is `Loading` for a page never fetched.
    pub async fn open(&mut self, path: &str, fetch: Fetch) -> Result<Screen, ContextError> {
        match Route::resolve(path) {
            Resolved::Page(route) => {
                self.current = Some(route);
                self.render_current(fetch).await
            }
            Resolved::NotFound(path) => {
                tracing::info!("No page for path {}", path);
                self.current = None;
                Ok(self.screen(Body::NotFound(path)))
            }
        }
    }

    /// Re-render the current page. `None` when no page is showing.
    pub async fn refresh(&mut self, fetch: Fetch) -> Result<Option<Screen>, ContextError> {
        if self.current.is_none() {
            return Ok(None);
        }
        self.render_current(fetch).await.map(Some)
    }

    /// Hand an action to the current page without rendering.
    /// Returns whether a page took it.
    pub fn dispatch(&mut self, action: &PageAction) -> bool {
        let Some(route) = self.current else {
            return false;
        };
        let Some(page) = self.pages.get_mut(&route) else {
            return false;
        };
        let taken = page.apply(action);
        if !taken {
            tracing::debug!("{:?} ignored {:?}", route, action);
        }
        taken
    }

    /// Hand an action to the current page and re-render it.
    /// `None` when no page is showing.
    pub async fn apply(&mut self, action: PageAction) -> Result<Option<Screen>, ContextError> {
        self.dispatch(&action);
        self.refresh(Fetch::Wait).await
    }

    /// Forward a focus/reconnect event to the cache and re-render the current
    /// page when one of the queries it shows was marked for refetch.
    pub async fn notify(
        &mut self,
        trigger: RefetchTrigger,
    ) -> Result<Option<Screen>, ContextError> {
        let marked = self.queries.notify(trigger).await;
        let Some(route) = self.current else {
            return Ok(None);
        };
        let shown = self.page_keys.get(&route);
        let affected = marked
            .iter()
            .any(|key| shown.is_some_and(|keys| keys.contains(key)));
        if !affected {
            tracing::debug!("{:?} on {:?}: nothing shown was marked", trigger, route);
            return Ok(None);
        }
        self.refresh(Fetch::Wait).await
    }

    async fn render_current(&mut self, fetch: Fetch) -> Result<Screen, ContextError> {
        let Some(route) = self.current else {
            return Ok(self.screen(Body::NotFound(String::new())));
        };
        let ctx = self.context().with_fetch(fetch);
        let page = self.pages.entry(route).or_insert_with(|| {
            tracing::debug!("Building page for {}", route.path());
            pages::build(route)
        });
        let state = page.load(&ctx).await?;
        self.page_keys.insert(route, ctx.used_keys().await);
        Ok(self.screen(Body::Page(state)))
    }
}
