// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

// Cards do dashboard (últimos 30 dias)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
    pub total_orders: i64,
    pub total_amount: Decimal,
    pub pending_orders: i64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_name: String,
    pub total_quantity: Decimal,
}

// Relatório global de um intervalo de datas
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInfo {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_orders: i64,
    pub average_order_value: Decimal,
    pub total_spend: Decimal,
    pub spend_by_supplier: BTreeMap<String, Decimal>,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
