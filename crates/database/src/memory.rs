use crate::error::DbError;
use crate::store::{AssumptionsStore, SalesHistory};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use core_types::{Assumptions, MonthlySales, TenantId};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Sale {
    sold_on: NaiveDate,
    units: Decimal,
    revenue: Decimal,
}

/// A process-local implementation of the storage traits.
///
/// Used by the test suites and by `serve --in-memory`; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    assumptions: RwLock<HashMap<TenantId, Assumptions>>,
    sales: RwLock<HashMap<TenantId, Vec<Sale>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single sale for `tenant`.
    pub async fn record_sale(
        &self,
        tenant: TenantId,
        sold_on: NaiveDate,
        units: Decimal,
        revenue: Decimal,
    ) {
        self.sales.write().await.entry(tenant).or_default().push(Sale {
            sold_on,
            units,
            revenue,
        });
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[async_trait]
impl AssumptionsStore for InMemoryStore {
    async fn get(&self, tenant: TenantId) -> Result<Assumptions, DbError> {
        self.assumptions
            .read()
            .await
            .get(&tenant)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn put(&self, tenant: TenantId, assumptions: Assumptions) -> Result<Assumptions, DbError> {
        assumptions.validate()?;
        self.assumptions
            .write()
            .await
            .insert(tenant, assumptions.clone());
        tracing::debug!(%tenant, "Assumptions saved in memory.");
        Ok(assumptions)
    }
}

#[async_trait]
impl SalesHistory for InMemoryStore {
    async fn monthly_sales(
        &self,
        tenant: TenantId,
        since: NaiveDate,
    ) -> Result<Vec<MonthlySales>, DbError> {
        let since = first_of_month(since);
        let sales = self.sales.read().await;

        let mut months: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
        for sale in sales.get(&tenant).into_iter().flatten() {
            if sale.sold_on < since {
                continue;
            }
            let totals = months.entry(first_of_month(sale.sold_on)).or_default();
            totals.0 += sale.units;
            totals.1 += sale.revenue;
        }

        Ok(months
            .into_iter()
            .map(|(month, (units, revenue))| MonthlySales {
                month,
                units,
                revenue,
            })
            .collect())
    }
}
