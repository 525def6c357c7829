//! Statistics repository for client and dashboard figures.
//!
//! Revenue is the sum of the totals of `paid` invoices.

use chrono::NaiveDate;
use facturo_shared::types::{ClientId, round_money};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::{devis, factures, sea_orm_active_enums::InvoiceStatus};

/// Document counts and revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of invoices, any status.
    pub invoice_count: u64,
    /// Number of quotes, any status.
    pub quote_count: u64,
    /// Sum of paid invoice totals.
    pub total_revenue: Decimal,
}

/// Revenue of a civil year against the yearly ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRevenue {
    /// Civil year.
    pub year: i32,
    /// Sum of paid invoice totals issued that year.
    pub revenue: Decimal,
    /// Yearly ceiling.
    pub ceiling: Decimal,
    /// Share of the ceiling reached, in percent (2 dp).
    pub ceiling_ratio: Decimal,
    /// What is left before the ceiling (never negative).
    pub headroom: Decimal,
}

impl YearlyRevenue {
    /// Builds the figures for `revenue` against `ceiling`.
    #[must_use]
    pub fn new(year: i32, revenue: Decimal, ceiling: Decimal) -> Self {
        let ceiling_ratio = if ceiling > Decimal::ZERO {
            round_money(revenue * Decimal::ONE_HUNDRED / ceiling)
        } else {
            Decimal::ZERO
        };
        Self {
            year,
            revenue,
            ceiling,
            ceiling_ratio,
            headroom: (ceiling - revenue).max(Decimal::ZERO),
        }
    }

    /// True once revenue went past the ceiling.
    #[must_use]
    pub fn exceeds_ceiling(&self) -> bool {
        self.revenue > self.ceiling
    }
}

/// Statistics repository.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    db: DatabaseConnection,
}

impl StatisticsRepository {
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Counts and revenue of one client.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn for_client(&self, client_id: ClientId) -> Result<Statistics, DbErr> {
        let raw = client_id.into_inner();

        let invoice_count = factures::Entity::find()
            .filter(factures::Column::ClientId.eq(raw))
            .count(&self.db)
            .await?;
        let quote_count = devis::Entity::find()
            .filter(devis::Column::ClientId.eq(raw))
            .count(&self.db)
            .await?;
        let totals: Vec<Decimal> = factures::Entity::find()
            .select_only()
            .column(factures::Column::Total)
            .filter(factures::Column::ClientId.eq(raw))
            .filter(factures::Column::Status.eq(InvoiceStatus::Paid))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(Statistics {
            invoice_count,
            quote_count,
            total_revenue: totals.into_iter().sum(),
        })
    }

    /// Counts and revenue over all clients.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn global(&self) -> Result<Statistics, DbErr> {
        let invoice_count = factures::Entity::find().count(&self.db).await?;
        let quote_count = devis::Entity::find().count(&self.db).await?;
        let totals: Vec<Decimal> = factures::Entity::find()
            .select_only()
            .column(factures::Column::Total)
            .filter(factures::Column::Status.eq(InvoiceStatus::Paid))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(Statistics {
            invoice_count,
            quote_count,
            total_revenue: totals.into_iter().sum(),
        })
    }

    /// Revenue of paid invoices issued during `year`, against `ceiling`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn yearly_revenue(
        &self,
        year: i32,
        ceiling: Decimal,
    ) -> Result<YearlyRevenue, DbErr> {
        let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Ok(YearlyRevenue::new(year, Decimal::ZERO, ceiling));
        };

        let totals: Vec<Decimal> = factures::Entity::find()
            .select_only()
            .column(factures::Column::Total)
            .filter(factures::Column::Status.eq(InvoiceStatus::Paid))
            .filter(factures::Column::IssueDate.between(first, last))
            .into_tuple()
            .all(&self.db)
            .await?;

        let revenue: Decimal = totals.into_iter().sum();
        tracing::debug!(year, revenue = %revenue, "Computed yearly revenue");
        Ok(YearlyRevenue::new(year, revenue, ceiling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yearly_revenue_ratio() {
        let figures = YearlyRevenue::new(2025, dec!(38850), dec!(77700));
        assert_eq!(figures.ceiling_ratio, dec!(50.00));
        assert_eq!(figures.headroom, dec!(38850));
        assert!(!figures.exceeds_ceiling());
    }

    #[test]
    fn test_yearly_revenue_over_ceiling() {
        let figures = YearlyRevenue::new(2025, dec!(80000), dec!(77700));
        assert_eq!(figures.headroom, Decimal::ZERO);
        assert!(figures.exceeds_ceiling());
        assert_eq!(figures.ceiling_ratio, dec!(102.96));
    }

    #[test]
    fn test_zero_ceiling() {
        let figures = YearlyRevenue::new(2025, dec!(100), Decimal::ZERO);
        assert_eq!(figures.ceiling_ratio, Decimal::ZERO);
    }
}
