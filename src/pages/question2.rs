use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section};
use crate::charts::efficiency::{demand_vs_efficiency, efficiency_heatmap, trips_vs_efficiency};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::efficiency::{
    demand_correlation_key, get_demand_efficiency_correlation, get_efficiency_heatmap,
    get_efficiency_timeseries, heatmap_key, timeseries_key,
};
use crate::state::PageContext;

pub struct EfficiencyPage;

#[async_trait]
impl Page for EfficiencyPage {
    fn route(&self) -> Route {
        Route::Question2
    }

    fn title(&self) -> &'static str {
        "Question 2: Demand vs Efficiency Trade-offs"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "At what times does increased demand reduce overall system efficiency, even though total trips increase?",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let (timeseries, correlation, heatmap) = tokio::join!(
            query(ctx, timeseries_key(), QueryOptions::default(), |api| async move {
                get_efficiency_timeseries(&api).await
            }),
            query(ctx, demand_correlation_key(), QueryOptions::default(), |api| async move {
                get_demand_efficiency_correlation(&api).await
            }),
            query(ctx, heatmap_key(), QueryOptions::default(), |api| async move {
                get_efficiency_heatmap(&api).await
            }),
        );
        let (timeseries, correlation, heatmap) = (timeseries?, correlation?, heatmap?);

        if let Some(state) = Gate::new()
            .require(&timeseries)
            .wait_for(&correlation)
            .wait_for(&heatmap)
            .check("Error loading efficiency data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = timeseries.data() {
            view.push_some(Section::assumptions(&resp.assumptions));
            view.push_chart(Section::line(
                "Total Trips vs System Efficiency Over Time",
                "Time",
                "Value",
                trips_vs_efficiency(resp),
            ));
        }
        if let Some(resp) = correlation.data() {
            view.push(Section::paragraph(
                Some("Demand vs Efficiency Correlation"),
                "Points below the trend line indicate times when increased demand reduces efficiency.",
            ));
            view.push_chart(Section::scatter(
                "Demand (Trips) vs System Efficiency",
                "Demand (Total Trips)",
                "System Efficiency",
                demand_vs_efficiency(resp),
            ));
        }
        if let Some(resp) = heatmap.data() {
            view.push_chart(Section::Heatmap {
                title: "Efficiency by Day of Week and Hour".to_string(),
                grid: efficiency_heatmap(resp),
            });
        }
        Ok(PageState::Ready(view))
    }
}
