use async_trait::async_trait;

use super::{query, Gate, Page, PageState, PageView, Section, Severity};
use crate::charts::incentives::{
    driver_vs_system, misaligned_count, misaligned_zone_hours, top_driver_incentives,
    TOP_DRIVER_ZONES, TOP_MISALIGNED,
};
use crate::error::ContextError;
use crate::models::QueryResult;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::incentives::{
    driver_key, get_driver_incentives, get_incentive_misalignment, get_system_efficiency,
    misalignment_key, system_key,
};
use crate::state::PageContext;

pub struct IncentivesPage;

fn assumption_or_na<T>(resp: Option<&QueryResult<T>>, key: &str) -> String {
    resp.map(|r| r.assumption_or(key, "N/A"))
        .unwrap_or_else(|| "N/A".to_string())
}

#[async_trait]
impl Page for IncentivesPage {
    fn route(&self) -> Route {
        Route::Question6
    }

    fn title(&self) -> &'static str {
        "Question 6: Driver Incentive Misalignment"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "Identify situations in your data where driver incentives (higher fares, tips, or trip density) \
             are misaligned with overall system efficiency. Explain how rational driver behavior can degrade city-level outcomes.",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let (driver, system, misalignment) = tokio::join!(
            query(ctx, driver_key(), QueryOptions::default(), |api| async move {
                get_driver_incentives(&api).await
            }),
            query(ctx, system_key(), QueryOptions::default(), |api| async move {
                get_system_efficiency(&api).await
            }),
            query(ctx, misalignment_key(), QueryOptions::default(), |api| async move {
                get_incentive_misalignment(&api).await
            }),
        );
        let (driver, system, misalignment) = (driver?, system?, misalignment?);

        if let Some(state) = Gate::new()
            .require(&misalignment)
            .wait_for(&driver)
            .wait_for(&system)
            .check("Error loading incentive data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        let Some(misaligned) = misalignment.data() else {
            return Ok(PageState::Ready(view));
        };

        view.push(Section::Alert {
            severity: Severity::Info,
            title: None,
            lines: vec![format!(
                "Found {} misaligned zone-hour combinations where driver incentives are high but system efficiency is low.",
                misaligned_count(misaligned)
            )],
        });
        if let (Some(d), Some(s)) = (driver.data(), system.data()) {
            view.push_chart(Section::scatter(
                "Driver Incentive Score vs System Efficiency Score",
                "Driver Incentive Score",
                "System Efficiency Score",
                driver_vs_system(d, s),
            ));
        }
        view.push_chart(Section::bar(
            "Top Misaligned Zone-Hour Combinations",
            "Zone @ Hour",
            "Score",
            misaligned_zone_hours(misaligned, TOP_MISALIGNED),
        ));
        if let Some(d) = driver.data() {
            view.push_chart(Section::bar(
                "Top Driver Incentive Zones (Earnings per Minute)",
                "Zone @ Hour",
                "Driver Incentive Score",
                top_driver_incentives(d, TOP_DRIVER_ZONES),
            ));
        }
        view.push(Section::bullets(
            "Assumptions & Methodology",
            vec![
                format!(
                    "Driver Incentive Score: {}",
                    assumption_or_na(driver.data(), "driver_incentive_score")
                ),
                format!(
                    "System Efficiency Score: {}",
                    assumption_or_na(system.data(), "system_efficiency_score")
                ),
                format!(
                    "Misalignment Definition: {}",
                    misaligned.assumption_or("misalignment_definition", "N/A")
                ),
                format!("Threshold: {}", misaligned.assumption_or("threshold", "N/A")),
            ],
        ));
        Ok(PageState::Ready(view))
    }
}
