use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section, Severity};
use crate::charts::variability::{
    duration_by_hour, top_variability, variability_trend, TOP_VARIABILITY_CELLS,
};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::variability::{
    distribution_key, get_duration_distribution, get_variability_heatmap, get_variability_trends,
    heatmap_key, trends_key,
};
use crate::state::PageContext;

const CV_FORMULA: &str = "Std(Duration) / Mean(Duration)";
const DISTANCE_BINS: &str = "0-2, 2-5, 5-10, 10+ miles";
const INTERPRETATION: &str = "Higher CV = more variability = less predictable";

pub struct VariabilityPage;

#[async_trait]
impl Page for VariabilityPage {
    fn route(&self) -> Route {
        Route::Question7
    }

    fn title(&self) -> &'static str {
        "Question 7: Trip Duration Variability"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Which hours of the day show the highest variability in trip duration for similar distances, \
             and what does this suggest about predictability and rider experience?",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let (heatmap, distribution, trends) = tokio::join!(
            query(ctx, heatmap_key(), QueryOptions::default(), |api| async move {
                get_variability_heatmap(&api).await
            }),
            query(ctx, distribution_key(), QueryOptions::default(), |api| async move {
                get_duration_distribution(&api).await
            }),
            query(ctx, trends_key(), QueryOptions::default(), |api| async move {
                get_variability_trends(&api).await
            }),
        );
        let (heatmap, distribution, trends) = (heatmap?, distribution?, trends?);

        if let Some(state) = Gate::new()
            .require(&heatmap)
            .wait_for(&distribution)
            .wait_for(&trends)
            .check("Error loading variability data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = heatmap.data() {
            view.push(Section::Alert {
                severity: Severity::Info,
                title: Some("Assumptions".to_string()),
                lines: vec![resp.assumption_or("interpretation", INTERPRETATION)],
            });
            view.push(Section::paragraph(
                Some("Highest Variability Hours (by Distance Bin)"),
                "Coefficient of Variation = Std(Duration) / Mean(Duration). \
                 Higher values indicate less predictable trip durations.",
            ));
            view.push_chart(Section::bar(
                "Top 20 Hour / Distance Combinations",
                "Hour - Distance Bin",
                "Coefficient of Variation",
                top_variability(resp, TOP_VARIABILITY_CELLS),
            ));
        }
        if let Some(resp) = distribution.data() {
            view.push_chart(Section::line(
                "Duration Statistics by Hour",
                "Hour of Day",
                "Minutes",
                duration_by_hour(resp),
            ));
        }
        if let Some(resp) = trends.data() {
            view.push_chart(Section::line(
                "Variability Over Time",
                "Date & Hour",
                "Coefficient of Variation",
                variability_trend(resp),
            ));
        }
        if let Some(resp) = heatmap.data() {
            view.push(Section::bullets(
                "Assumptions & Methodology",
                vec![
                    format!(
                        "Coefficient of Variation: {}",
                        resp.assumption_or("coefficient_of_variation", CV_FORMULA)
                    ),
                    format!(
                        "Distance Bins: {}",
                        resp.assumption_or("distance_bins", DISTANCE_BINS)
                    ),
                    format!(
                        "Interpretation: {}",
                        resp.assumption_or("interpretation", INTERPRETATION)
                    ),
                ],
            ));
        }
        Ok(PageState::Ready(view))
    }
}
