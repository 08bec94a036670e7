use crate::error::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Assumptions, MonthlySales, TenantId};

/// Persistence of the single active `Assumptions` per tenant.
#[async_trait]
pub trait AssumptionsStore: Send + Sync {
    /// Returns the tenant's assumptions, or `DbError::NotFound` if none were ever saved.
    async fn get(&self, tenant: TenantId) -> Result<Assumptions, DbError>;

    /// Validates and stores `assumptions`, replacing any previous set.
    ///
    /// Returns what was stored. Invalid input is rejected with `DbError::Invalid`
    /// and leaves the previous set untouched.
    async fn put(&self, tenant: TenantId, assumptions: Assumptions) -> Result<Assumptions, DbError>;
}

/// Read access to a tenant's sales, aggregated per calendar month.
#[async_trait]
pub trait SalesHistory: Send + Sync {
    /// Monthly totals for every month on or after the month containing `since`,
    /// ordered by month ascending. Months without sales are absent.
    async fn monthly_sales(
        &self,
        tenant: TenantId,
        since: NaiveDate,
    ) -> Result<Vec<MonthlySales>, DbError>;
}
