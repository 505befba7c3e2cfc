use async_trait::async_trait;

use super::{query, query_when, Gate, Page, PageAction, PageState, PageView, Section, Severity};
use crate::charts::wait_time::{lever_lines, simulation_lines, top_wait_time_zones, TOP_WAIT_TIME_ZONES};
use crate::error::ContextError;
use crate::query::QueryOptions;
use crate::router::Route;
use crate::services::wait_time::{
    current_key, get_current_wait_time, get_wait_time_tradeoffs, simulate_key,
    simulate_wait_time_reduction, tradeoffs_key, SimulateParams,
};
use crate::state::PageContext;

/// Wait-time levers. The simulation POST only goes out after `PageAction::Run`.
#[derive(Default)]
pub struct WaitTimePage {
    submitted: Option<SimulateParams>,
    runs: u32,
}

#[async_trait]
impl Page for WaitTimePage {
    fn route(&self) -> Route {
        Route::Question4
    }

    fn title(&self) -> &'static str {
        "Question 4: Wait Time Reduction Levers"
    }

    fn question(&self) -> Option<&'static str> {
        Some(
            "If the city wanted to reduce average passenger wait time by 10% without adding vehicles, \
             which two levers suggested by the data would you pull, and what trade-offs would worsen as a result?",
        )
    }

    async fn load(&self, ctx: &PageContext) -> Result<PageState, ContextError> {
        let backend = ctx.api()?.backend_location().to_string();
        let params = self.submitted.clone().unwrap_or_default();
        let (current, tradeoffs, simulation) = tokio::join!(
            query(ctx, current_key(), QueryOptions::default(), |api| async move {
                get_current_wait_time(&api).await
            }),
            query(ctx, tradeoffs_key(), QueryOptions::default(), |api| async move {
                get_wait_time_tradeoffs(&api).await
            }),
            query_when(
                self.submitted.is_some(),
                ctx,
                simulate_key(&params).param("run", self.runs),
                QueryOptions::mutation(),
                move |api| {
                    let params = params.clone();
                    async move { simulate_wait_time_reduction(&api, &params).await }
                },
            ),
        );
        let (current, tradeoffs, simulation) = (current?, tradeoffs?, simulation?);

        if let Some(state) = Gate::new()
            .require(&current)
            .wait_for(&tradeoffs)
            .wait_for(&simulation)
            .check("Error loading wait time data", &backend)
        {
            return Ok(state);
        }

        let mut view = PageView::for_page(self);
        if let Some(resp) = current.data() {
            view.push_some(Section::assumptions(&resp.assumptions));
            view.push_chart(Section::bar(
                "Top 20 Zone-Hours by Wait Time Proxy",
                "Zone @ Hour",
                "Demand / Supply",
                top_wait_time_zones(resp, TOP_WAIT_TIME_ZONES),
            ));
        }
        if let Some(resp) = tradeoffs.data() {
            for lever in [&resp.data.lever_1, &resp.data.lever_2] {
                view.push(Section::bullets(&lever.name, lever_lines(lever)));
            }
        }
        if let Some(resp) = simulation.data() {
            view.push(Section::Alert {
                severity: Severity::Info,
                title: Some("Simulated Reduction".to_string()),
                lines: simulation_lines(resp),
            });
        } else if let Some(message) = simulation.error() {
            view.push(Section::Alert {
                severity: Severity::Warning,
                title: Some("Simulation failed".to_string()),
                lines: vec![message.to_string()],
            });
        }
        Ok(PageState::Ready(view))
    }

    fn apply(&mut self, action: &PageAction) -> bool {
        match action {
            PageAction::Run => {
                self.submitted = Some(SimulateParams::default());
                self.runs += 1;
                true
            }
            PageAction::SetThreshold(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_disabled_until_run() {
        let mut page = WaitTimePage::default();
        assert!(page.submitted.is_none());
        assert!(!page.apply(&PageAction::SetThreshold(2.0)));
        assert!(page.submitted.is_none());
        assert!(page.apply(&PageAction::Run));
        assert_eq!(page.submitted, Some(SimulateParams::default()));
        assert!(page.apply(&PageAction::Run));
        assert_eq!(page.runs, 2);
    }
}
