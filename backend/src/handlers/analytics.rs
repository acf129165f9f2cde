//! Dashboard analytics handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::analytics::{
    AnalyticsSummary, PeriodBucket, TopProduct, VariantProfitability,
};
use crate::services::AnalyticsService;
use crate::AppState;
use shared::types::ReportPeriod;

fn service(state: &AppState) -> AnalyticsService {
    AnalyticsService::new(state.db.clone(), state.config.profitability.clone())
}

#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub period: ReportPeriod,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    pub limit: Option<i64>,
}

/// GET /analytics/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<AnalyticsSummary>> {
    Ok(Json(service(&state).summary().await?))
}

/// GET /analytics/sales?period=daily&start=...&end=...
pub async fn sales_by_period(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<Vec<PeriodBucket>>> {
    Ok(Json(
        service(&state)
            .sales_by_period(query.period, query.start, query.end)
            .await?,
    ))
}

/// GET /analytics/profitability
pub async fn profitability(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VariantProfitability>>> {
    Ok(Json(service(&state).profitability().await?))
}

/// GET /analytics/top-products?limit=10
pub async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Json<Vec<TopProduct>>> {
    Ok(Json(
        service(&state).top_products(query.limit.unwrap_or(10)).await?,
    ))
}
