use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section};
use crate::charts::surge::{
    surge_share, surge_vs_revenue, top_surge_zones, TOP_SURGE_SHARE_ZONES, TOP_SURGE_ZONES,
};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::surge::{
    correlation_key, get_surge_correlation, get_surge_zones, zones_key, DEFAULT_SURGE_THRESHOLD,
};
use crate::state::PageContext;

pub struct SurgePage;

#[async_trait]
impl Page for SurgePage {
    fn route(&self) -> Route {
        Route::Question3
    }

    fn title(&self) -> &'static str {
        "Question 3: Surge Pricing Paradox"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Identify zones where surge-like pricing correlates with lower total daily revenue, \
             and explain the mechanism using the data.",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let threshold = DEFAULT_SURGE_THRESHOLD;
        let (correlation, zones) = tokio::join!(
            query(ctx, correlation_key(threshold), QueryOptions::default(), move |api| async move {
                get_surge_correlation(&api, threshold).await
            }),
            query(ctx, zones_key(threshold), QueryOptions::default(), move |api| async move {
                get_surge_zones(&api, threshold).await
            }),
        );
        let (correlation, zones) = (correlation?, zones?);

        if let Some(state) = Gate::new()
            .require(&correlation)
            .wait_for(&zones)
            .check("Error loading surge data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = correlation.data() {
            view.push_some(Section::assumptions(&resp.assumptions));
            view.push(Section::paragraph(
                Some("Surge Events vs Daily Revenue Correlation"),
                "Zones with negative correlation (high surge events, low revenue) indicate the surge pricing paradox.",
            ));
            view.push_chart(Section::scatter(
                "Surge Frequency vs Average Daily Revenue",
                "Average Surge Events per Day",
                "Average Daily Revenue ($)",
                surge_vs_revenue(resp),
            ));
            view.push_chart(Section::bar(
                "Top 10 Zones by Surge Events",
                "Zone ID",
                "Value",
                top_surge_zones(resp, TOP_SURGE_ZONES),
            ));
        }
        if let Some(resp) = zones.data() {
            view.push_chart(Section::bar(
                "Share of Trips Priced Above the Surge Threshold",
                "Zone ID",
                "Surge Trips (%)",
                surge_share(resp, TOP_SURGE_SHARE_ZONES),
            ));
        }
        Ok(PageState::Ready(view))
    }
}
