use crate::DbError;
use crate::store::{AssumptionsStore, SalesHistory};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Assumptions, MonthlySales, TenantId};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::{FromRow, Row};

/// The `DbRepository` provides the PostgreSQL-backed implementation of the
/// storage traits. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A row of the `assumptions` table.
#[derive(Debug, Clone, FromRow)]
struct DbAssumptions {
    price: Decimal,
    unit_variable_cost: Decimal,
    fixed_costs_per_month: Decimal,
    growth_rate: Decimal,
    notes: Option<String>,
}

impl From<DbAssumptions> for Assumptions {
    fn from(row: DbAssumptions) -> Self {
        Assumptions {
            price: row.price,
            unit_variable_cost: row.unit_variable_cost,
            fixed_costs_per_month: row.fixed_costs_per_month,
            growth_rate: row.growth_rate,
            notes: row.notes,
        }
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssumptionsStore for DbRepository {
    async fn get(&self, tenant: TenantId) -> Result<Assumptions, DbError> {
        let row = sqlx::query_as::<_, DbAssumptions>(
            r#"
            SELECT price, unit_variable_cost, fixed_costs_per_month, growth_rate, notes
            FROM assumptions
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Assumptions::from).ok_or(DbError::NotFound)
    }

    async fn put(&self, tenant: TenantId, assumptions: Assumptions) -> Result<Assumptions, DbError> {
        assumptions.validate()?;

        let row = sqlx::query_as::<_, DbAssumptions>(
            r#"
            INSERT INTO assumptions (tenant_id, price, unit_variable_cost, fixed_costs_per_month, growth_rate, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (tenant_id) DO UPDATE SET
                price = EXCLUDED.price,
                unit_variable_cost = EXCLUDED.unit_variable_cost,
                fixed_costs_per_month = EXCLUDED.fixed_costs_per_month,
                growth_rate = EXCLUDED.growth_rate,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING price, unit_variable_cost, fixed_costs_per_month, growth_rate, notes
            "#,
        )
        .bind(tenant.0)
        .bind(assumptions.price)
        .bind(assumptions.unit_variable_cost)
        .bind(assumptions.fixed_costs_per_month)
        .bind(assumptions.growth_rate)
        .bind(&assumptions.notes)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%tenant, "Assumptions saved.");
        Ok(row.into())
    }
}

#[async_trait]
impl SalesHistory for DbRepository {
    async fn monthly_sales(
        &self,
        tenant: TenantId,
        since: NaiveDate,
    ) -> Result<Vec<MonthlySales>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                date_trunc('month', sold_on)::date AS month,
                SUM(units) AS units,
                SUM(revenue) AS revenue
            FROM sales
            WHERE tenant_id = $1 AND sold_on >= date_trunc('month', $2::date)::date
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(tenant.0)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let history = rows
            .into_iter()
            .map(|row| -> Result<MonthlySales, sqlx::Error> {
                Ok(MonthlySales {
                    month: row.try_get("month")?,
                    units: row.try_get("units")?,
                    revenue: row.try_get("revenue")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}
