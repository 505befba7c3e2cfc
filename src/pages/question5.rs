use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section};
use crate::charts::congestion::{
    busiest_zone_throughput, short_trip_share, top_congested_zones, TOP_CONGESTION_ZONES,
};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::congestion::{
    get_congestion_zones, get_short_trip_impact, get_throughput, short_trip_key, throughput_key,
    zones_key, DEFAULT_SHORT_TRIP_THRESHOLD,
};
use crate::state::PageContext;

pub struct CongestionPage;

#[async_trait]
impl Page for CongestionPage {
    fn route(&self) -> Route {
        Route::Question5
    }

    fn title(&self) -> &'static str {
        "Question 5: High Trip, High Congestion Zones"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Which zones generate a high number of trips in 2025 (selected duration) but contribute \
             disproportionately to congestion rather than throughput? Show how short trips distort productivity metrics.",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let threshold = DEFAULT_SHORT_TRIP_THRESHOLD;
        let (congestion, throughput, short_trips) = tokio::join!(
            query(ctx, zones_key(), QueryOptions::default(), |api| async move {
                get_congestion_zones(&api).await
            }),
            query(ctx, throughput_key(), QueryOptions::default(), |api| async move {
                get_throughput(&api).await
            }),
            query(ctx, short_trip_key(threshold), QueryOptions::default(), move |api| async move {
                get_short_trip_impact(&api, threshold).await
            }),
        );
        let (congestion, throughput, short_trips) = (congestion?, throughput?, short_trips?);

        if let Some(state) = Gate::new()
            .require(&congestion)
            .wait_for(&throughput)
            .wait_for(&short_trips)
            .check("Error loading congestion data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = congestion.data() {
            view.push_some(Section::assumptions(&resp.assumptions));
            view.push_chart(Section::bar(
                "Top 20 Zones by Congestion Index",
                "Zone ID",
                "Minutes per Mile",
                top_congested_zones(resp, TOP_CONGESTION_ZONES),
            ));
        }
        if let Some(resp) = throughput.data() {
            view.push_chart(Section::bar(
                "Trip Volume vs Throughput (Top 20 Zones by Trips)",
                "Zone ID",
                "Value",
                busiest_zone_throughput(resp, TOP_CONGESTION_ZONES),
            ));
        }
        if let Some(resp) = short_trips.data() {
            view.push(Section::paragraph(
                Some("Short Trip Distortion"),
                &format!(
                    "Trips shorter than {} mile(s) inflate trip counts while adding little distance; \
                     zones with a high share of them look productive by volume only.",
                    threshold
                ),
            ));
            view.push_chart(Section::bar(
                "Short Trip Share by Zone",
                "Zone ID",
                "Value",
                short_trip_share(resp, TOP_CONGESTION_ZONES),
            ));
        }
        Ok(PageState::Ready(view))
    }
}
