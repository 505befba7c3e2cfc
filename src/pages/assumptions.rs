use async_trait::async_trait;

use super::{Page, PageState, PageView, Section};
use crate::error::ContextError;
use crate::router::Route;
use crate::state::PageContext;

/// (heading, lines)
const METHODOLOGY: [(&str, &[&str]); 4] = [
    (
        "Idle Time Calculation",
        &[
            "Method: Zone-level temporal clustering",
            "Time window: 30 minutes",
            "Spatial window: Same zone or adjacent zones",
        ],
    ),
    (
        "Empty Return Probability",
        &[
            "Time window: 2 hours",
            "Definition: Return trip from destination to origin",
        ],
    ),
    (
        "Wait Time Proxy",
        &[
            "Formula: Demand/Supply ratio",
            "Note: May not reflect actual wait times",
        ],
    ),
    (
        "Surge Detection",
        &[
            "Threshold: 20% above base fare",
            "Base fare: Median fare for similar distance/time",
        ],
    ),
];

/// Static methodology notes; issues no queries.
pub struct AssumptionsPage;

#[async_trait]
impl Page for AssumptionsPage {
    fn route(&self) -> Route {
        Route::Assumptions
    }

    fn title(&self) -> &'static str {
        "Assumptions & Methodology"
    }

    fn question(&self) -> Option<&'static str> {
        None
    }

    async fn load(&self, _ctx: &PageContext) -> Result<PageState, ContextError> {
        let mut view = PageView::for_page(self);
        for (heading, lines) in METHODOLOGY {
            view.push(Section::bullets(
                heading,
                lines.iter().map(|l| l.to_string()).collect(),
            ));
        }
        Ok(PageState::Ready(view))
    }
}
