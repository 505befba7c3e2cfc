use std::time::Duration;

use async_trait::async_trait;

use super::{query, Card, Gate, Page, PageState, PageView, Section};
use crate::charts::{date_label, group_thousands, or_zero};
use crate::error::ContextError;
use crate::query::{QueryOptions, RetryDelay};
use crate::router::Route;
use crate::services::overview::{get_overview, overview_key, OverviewData};
use crate::state::PageContext;

/// Executive summary.
pub struct OverviewPage;

/// Two retries, one second apart.
fn overview_options() -> QueryOptions {
    QueryOptions::default().with_retry(2, RetryDelay::Fixed(Duration::from_millis(1000)))
}

pub fn summary_cards(data: &OverviewData) -> Vec<Card> {
    let date_range = match (&data.start_date, &data.end_date) {
        (Some(start), Some(end)) => format!("{} - {}", date_label(start), date_label(end)),
        _ => "N/A".to_string(),
    };
    vec![
        Card {
            label: "Total Trips".to_string(),
            value: group_thousands(or_zero(data.total_trips)),
        },
        Card {
            label: "Total Revenue".to_string(),
            value: format!("${}", group_thousands(or_zero(data.total_revenue))),
        },
        Card {
            label: "Zones Covered".to_string(),
            value: format!("{}", or_zero(data.zone_count)),
        },
        Card {
            label: "Date Range".to_string(),
            value: date_range,
        },
    ]
}

#[async_trait]
impl Page for OverviewPage {
    fn route(&self) -> Route {
        Route::Overview
    }

    fn title(&self) -> &'static str {
        "NYC TLC Analytics Dashboard"
    }

    fn question(&self) -> Option<&'static str> {
        None
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let overview = query(ctx, overview_key(), overview_options(), |api| async move {
            get_overview(&api).await
        })
        .await?;

        if let Some(state) = Gate::new()
            .require(&overview)
            .check("Error loading overview data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        view.push(Section::paragraph(None, "Executive Summary"));
        if let Some(resp) = overview.data() {
            view.push(Section::Cards(summary_cards(&resp.data)));
        }
        view.push(Section::paragraph(
            Some("Navigation"),
            "Use the navigation menu to explore each of the 8 analytical questions.",
        ));
        Ok(PageState::Ready(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_with_missing_dates() {
        let data = OverviewData {
            total_trips: Some(1250000.0),
            start_date: None,
            end_date: Some("2025-04-30".to_string()),
            zone_count: Some(263.0),
            total_revenue: Some(34567890.12),
        };
        let cards = summary_cards(&data);
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["1,250,000", "$34,567,890", "263", "N/A"]);
    }

    #[test]
    fn test_cards_date_range() {
        let data = OverviewData {
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-04-30T00:00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(summary_cards(&data)[3].value, "01/01/2025 - 04/30/2025");
        assert_eq!(summary_cards(&data)[0].value, "0");
    }

    #[test]
    fn test_overview_retries_twice() {
        let options = overview_options();
        assert_eq!(options.retry, 2);
        assert_eq!(options.retry_delay.delay(1), Duration::from_secs(1));
    }
}
