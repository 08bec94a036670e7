use crate::tenant::Tenant;
use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use core_types::{Assumptions, TenantId};
use database::DbError;
use projection::{BreakEvenMetrics, ProjectionError, trailing_average_units};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Overrides the baseline derived from sales history.
    pub baseline: Option<String>,
}

/// # GET /api/assumptions
/// Returns the stored assumptions, or an all-zero set if none were saved yet.
pub async fn get_assumptions(
    State(state): State<Arc<AppState>>,
    Tenant(tenant): Tenant,
) -> Result<Json<Assumptions>, AppError> {
    match state.assumptions.get(tenant).await {
        Ok(assumptions) => Ok(Json(assumptions)),
        Err(DbError::NotFound) => Ok(Json(Assumptions::default())),
        Err(e) => Err(e.into()),
    }
}

/// # PUT /api/assumptions
/// Validates and replaces the tenant's assumptions.
pub async fn put_assumptions(
    State(state): State<Arc<AppState>>,
    Tenant(tenant): Tenant,
    payload: Result<Json<Assumptions>, JsonRejection>,
) -> Result<Json<Assumptions>, AppError> {
    let Json(assumptions) = payload?;
    // The engine's configured bounds may be narrower than the storage bounds.
    state.engine.check_assumptions(&assumptions)?;
    let stored = state.assumptions.put(tenant, assumptions).await?;
    tracing::info!(%tenant, "Assumptions updated.");
    Ok(Json(stored))
}

/// # GET /api/metrics
/// Runs the break-even projection against the tenant's current assumptions.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Tenant(tenant): Tenant,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<BreakEvenMetrics>, AppError> {
    let metrics = compute_for_tenant(&state, tenant, &query).await?;
    Ok(Json(metrics))
}

/// # GET /api/metrics/export
/// The monthly projection table as a CSV download.
pub async fn export_metrics(
    State(state): State<Arc<AppState>>,
    Tenant(tenant): Tenant,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let metrics = compute_for_tenant(&state, tenant, &query).await?;
    let csv = projection::projections_to_csv(&metrics.monthly_projections)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"break-even-projection.csv\"",
            ),
        ],
        csv,
    ))
}

async fn compute_for_tenant(
    state: &AppState,
    tenant: TenantId,
    query: &MetricsQuery,
) -> Result<BreakEvenMetrics, AppError> {
    // One snapshot of the assumptions is used for the whole computation.
    let assumptions = state.assumptions.get(tenant).await?;
    let today = Utc::now().date_naive();

    let baseline = match &query.baseline {
        Some(raw) => parse_baseline(raw)?,
        None => {
            let (since, current_month) = baseline_window(today, state.baseline_window_months);
            let mut history = state.sales.monthly_sales(tenant, since).await?;
            history.retain(|s| s.month < current_month);
            trailing_average_units(&history, state.baseline_window_months)
        }
    };

    let metrics = state.engine.compute_metrics(&assumptions, baseline, today)?;
    tracing::info!(
        %tenant,
        baseline = %baseline,
        break_even_month = ?metrics.break_even_month,
        "Metrics computed."
    );
    Ok(metrics)
}

fn parse_baseline(raw: &str) -> Result<Decimal, ProjectionError> {
    Decimal::from_str(raw.trim()).map_err(|e| ProjectionError::Validation {
        field: "baseline".to_string(),
        reason: format!("'{raw}' is not a number: {e}"),
    })
}

/// The baseline covers the last `window_months` completed months: returns the
/// first day of the oldest one and the first day of the current month, which
/// is excluded because it is still in progress.
fn baseline_window(today: NaiveDate, window_months: u32) -> (NaiveDate, NaiveDate) {
    let current_month = today.with_day(1).unwrap_or(today);
    let since = current_month
        .checked_sub_months(Months::new(window_months))
        .unwrap_or(current_month);
    (since, current_month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_baseline_window_covers_completed_months_only() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let today = date(2025, 3, 17);

        assert_eq!(baseline_window(today, 3), (date(2024, 12, 1), date(2025, 3, 1)));
        assert_eq!(baseline_window(today, 1), (date(2025, 2, 1), date(2025, 3, 1)));
        assert_eq!(baseline_window(date(2025, 3, 1), 6).0, date(2024, 9, 1));
    }

    #[test]
    fn test_parse_baseline() {
        assert_eq!(parse_baseline(" 900.5 ").unwrap(), dec!(900.5));
        let err = parse_baseline("lots").unwrap_err();
        assert_eq!(err.field(), Some("baseline"));
    }
}
