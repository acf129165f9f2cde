//! Sales report and CSV export handlers

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::SalesReport;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /reports/sales?start=...&end=...
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<SalesReport>> {
    Ok(Json(
        ReportingService::new(state.db.clone())
            .sales_report(query.start, query.end)
            .await?,
    ))
}

/// GET /reports/orders/export?start=...&end=... - CSV download
pub async fn export_orders(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<(HeaderMap, Vec<u8>)> {
    let csv = ReportingService::new(state.db.clone())
        .export_orders_csv(query.start, query.end)
        .await?;

    let filename = format!("orders_{}_{}.csv", query.start, query.end);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, csv))
}
