use async_trait::async_trait;

use super::{query, query_when, Gate, Page, PageAction, PageState, PageView, Section, Severity};
use crate::charts::simulation::{before_after, impact_summary, sensitivity};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::simulation::{
    get_sensitivity_analysis, min_distance_key, sensitivity_key, simulate_min_distance,
    DEFAULT_MIN_DISTANCE,
};
use crate::state::PageContext;

pub const MIN_THRESHOLD: f64 = 0.1;
pub const MAX_THRESHOLD: f64 = 5.0;

/// Minimum-distance simulation.
///
/// Editing the threshold never issues a request; the simulation query is
/// enabled by `PageAction::Run` and keyed by the threshold submitted with it.
pub struct SimulationPage {
    threshold: f64,
    submitted: Option<f64>,
}

impl Default for SimulationPage {
    fn default() -> Self {
        SimulationPage {
            threshold: DEFAULT_MIN_DISTANCE,
            submitted: None,
        }
    }
}

impl SimulationPage {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn submitted(&self) -> Option<f64> {
        self.submitted
    }
}

/// Non-finite input falls back to the default.
pub fn clamp_threshold(miles: f64) -> f64 {
    if miles.is_finite() {
        miles.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
    } else {
        DEFAULT_MIN_DISTANCE
    }
}

#[async_trait]
impl Page for SimulationPage {
    fn route(&self) -> Route {
        Route::Question8
    }

    fn title(&self) -> &'static str {
        "Question 8: Minimum Distance Threshold Simulation"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Using selected data only, simulate the likely impact of removing trips below a minimum \
             distance threshold. Identify which metrics improve, which worsen, and which effects are \
             non-intuitive. Clearly state the assumptions that make this analysis fragile.",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let threshold = self.submitted.unwrap_or(self.threshold);
        let (simulation, sensitivity_data) = tokio::join!(
            query_when(
                self.submitted.is_some(),
                ctx,
                min_distance_key(threshold),
                QueryOptions::default(),
                move |api| async move { simulate_min_distance(&api, threshold).await },
            ),
            query(ctx, sensitivity_key(), QueryOptions::default(), |api| async move {
                get_sensitivity_analysis(&api).await
            }),
        );
        let (simulation, sensitivity_data) = (simulation?, sensitivity_data?);

        if let Some(state) = Gate::new()
            .require(&sensitivity_data)
            .wait_for(&simulation)
            .check("Error loading simulation data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        view.push(Section::paragraph(
            Some("Threshold (miles)"),
            &format!("{} (range {}-{})", self.threshold, MIN_THRESHOLD, MAX_THRESHOLD),
        ));

        if let Some(resp) = simulation.data() {
            view.push(Section::Alert {
                severity: Severity::Warning,
                title: Some("Fragile Assumptions".to_string()),
                lines: resp.assumption_list("limitations"),
            });
            view.push_chart(Section::bar(
                &format!("Before/After Comparison (Threshold: {} miles)", threshold),
                "Metric",
                "Value",
                before_after(&resp.data),
            ));
            view.push(Section::bullets("Impact Summary", impact_summary(&resp.data)));
        } else if let Some(message) = simulation.error() {
            view.push(Section::Alert {
                severity: Severity::Warning,
                title: Some("Simulation failed".to_string()),
                lines: vec![message.to_string()],
            });
        }

        if let Some(resp) = sensitivity_data.data() {
            view.push(Section::paragraph(
                Some("Sensitivity Analysis"),
                "Shows how different threshold values affect trips removed and revenue impact.",
            ));
            view.push_chart(Section::line(
                "Sensitivity to Threshold Changes",
                "Threshold (miles)",
                "Percentage (%)",
                sensitivity(resp),
            ));
        }
        Ok(PageState::Ready(view))
    }

    fn apply(&mut self, action: &PageAction) -> bool {
        match action {
            PageAction::SetThreshold(miles) => {
                let clamped = clamp_threshold(*miles);
                let changed = clamped != self.threshold;
                self.threshold = clamped;
                changed
            }
            PageAction::Run => {
                self.submitted = Some(self.threshold);
                true
            }
        }
    }
}
