//! Dashboard figures.

use chrono::Datelike;
use facturo_db::repositories::{Statistics, StatisticsRepository, YearlyRevenue};
use rust_decimal::Decimal;
use serde::Serialize;

use super::read_or_default;
use crate::AppState;

/// Figures shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Global counts and revenue.
    pub statistics: Statistics,
    /// Revenue of the current civil year against the ceiling.
    pub current_year: YearlyRevenue,
}

/// Dashboard controller.
#[derive(Debug, Clone)]
pub struct DashboardController {
    state: AppState,
    statistics: StatisticsRepository,
}

impl DashboardController {
    /// Creates the controller for the session.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            statistics: StatisticsRepository::new(state.connection()),
            state: state.clone(),
        }
    }

    /// Global statistics and current-year revenue.
    pub async fn summary(&self) -> DashboardSummary {
        let statistics = read_or_default(self.statistics.global().await, "global statistics");
        let current_year = self.yearly_revenue(self.state.today().year()).await;
        DashboardSummary {
            statistics,
            current_year,
        }
    }

    /// Revenue of `year` against the configured ceiling.
    pub async fn yearly_revenue(&self, year: i32) -> YearlyRevenue {
        let ceiling = self.state.config.billing.revenue_ceiling;
        self.statistics
            .yearly_revenue(year, ceiling)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, year, "Failed to compute yearly revenue");
                YearlyRevenue::new(year, Decimal::ZERO, ceiling)
            })
    }
}
