use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section};
use crate::charts::zones::{negative_zone_lines, revenue_bar, revenue_vs_net_profit};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::zones::{
    get_negative_zones, get_zone_net_profit, get_zone_revenue, negative_zones_key,
    net_profit_key, revenue_key, NetProfitParams, DEFAULT_REVENUE_LIMIT,
};
use crate::state::PageContext;

pub struct RevenueZonesPage;

#[async_trait]
impl Page for RevenueZonesPage {
    fn route(&self) -> Route {
        Route::Question1
    }

    fn title(&self) -> &'static str {
        "Question 1: High Revenue Zones with Hidden Costs"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Which pickup zones appear to be high revenue zones but become net negative once idle time, \
             trip duration, and empty return probability are accounted for?",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let params = NetProfitParams::default();
        let idle_cost = params.idle_cost_per_hour;

        let (revenue, net_profit, negative) = tokio::join!(
            query(ctx, revenue_key(DEFAULT_REVENUE_LIMIT), QueryOptions::default(), |api| async move {
                get_zone_revenue(&api, DEFAULT_REVENUE_LIMIT).await
            }),
            query(ctx, net_profit_key(&params), QueryOptions::default(), move |api| async move {
                get_zone_net_profit(&api, &params).await
            }),
            query(ctx, negative_zones_key(idle_cost), QueryOptions::default(), move |api| async move {
                get_negative_zones(&api, idle_cost).await
            }),
        );
        let (revenue, net_profit, negative) = (revenue?, net_profit?, negative?);

        if let Some(state) = Gate::new()
            .require(&revenue)
            .wait_for(&net_profit)
            .wait_for(&negative)
            .check("Error loading revenue data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = revenue.data() {
            view.push_some(Section::assumptions(&resp.assumptions));
            view.push_chart(Section::bar(
                "Top 20 Zones by Revenue",
                "Zone ID",
                "Revenue ($)",
                revenue_bar(resp),
            ));
        }
        if let Some(resp) = net_profit.data() {
            view.push_chart(Section::scatter(
                "Gross Revenue vs Net Profit (after costs)",
                "Gross Revenue ($)",
                "Net Profit ($)",
                revenue_vs_net_profit(resp),
            ));
        }
        if let Some(resp) = negative.data() {
            let lines = negative_zone_lines(resp);
            if !lines.is_empty() {
                view.push(Section::bullets("Zones That Become Net Negative", lines));
            }
        }
        Ok(PageState::Ready(view))
    }
}
