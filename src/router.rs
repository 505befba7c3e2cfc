use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

pub const APP_TITLE: &str = "NYC TLC Analytics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Overview,
    Question1,
    Question2,
    Question3,
    Question4,
    Question5,
    Question6,
    Question7,
    Question8,
    Assumptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub route: Route,
    pub path: &'static str,
    pub nav_label: &'static str,
}

// ============================================================================
// STATIC ROUTE TABLE (header order)
// ============================================================================

static ROUTES: Lazy<Vec<RouteEntry>> = Lazy::new(|| {
    vec![
        RouteEntry { route: Route::Overview, path: "/", nav_label: "Overview" },
        RouteEntry { route: Route::Question1, path: "/question1", nav_label: "Q1: Revenue Zones" },
        RouteEntry { route: Route::Question2, path: "/question2", nav_label: "Q2: Efficiency" },
        RouteEntry { route: Route::Question3, path: "/question3", nav_label: "Q3: Surge Pricing" },
        RouteEntry { route: Route::Question4, path: "/question4", nav_label: "Q4: Wait Time" },
        RouteEntry { route: Route::Question5, path: "/question5", nav_label: "Q5: Congestion" },
        RouteEntry { route: Route::Question6, path: "/question6", nav_label: "Q6: Incentives" },
        RouteEntry { route: Route::Question7, path: "/question7", nav_label: "Q7: Variability" },
        RouteEntry { route: Route::Question8, path: "/question8", nav_label: "Q8: Simulation" },
        RouteEntry { route: Route::Assumptions, path: "/assumptions", nav_label: "Assumptions" },
    ]
});

/// path -> index into ROUTES
static ROUTE_MAP: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    ROUTES
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.path, idx))
        .collect()
});

/// Outcome of matching a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Page(Route),
    NotFound(String),
}

impl Route {
    pub fn all() -> &'static [RouteEntry] {
        &ROUTES
    }

    fn entry(self) -> &'static RouteEntry {
        // Every variant has exactly one row in ROUTES
        &ROUTES[self as usize]
    }

    pub fn path(self) -> &'static str {
        self.entry().path
    }

    pub fn nav_label(self) -> &'static str {
        self.entry().nav_label
    }

    /// Ignores a query string, a fragment and trailing slashes.
    pub fn resolve(raw: &str) -> Resolved {
        let path = raw
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match ROUTE_MAP.get(path) {
            Some(idx) => Resolved::Page(ROUTES[*idx].route),
            None => Resolved::NotFound(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// The persistent header: title and one link per route, the current one marked active.
pub fn header(current: Option<Route>) -> Vec<NavItem> {
    ROUTES
        .iter()
        .map(|entry| NavItem {
            label: entry.nav_label,
            path: entry.path,
            active: Some(entry.route) == current,
        })
        .collect()
}
