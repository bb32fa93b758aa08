// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::money::max_price;

// Linha da view `product_view`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip)]
    pub id: i64,
    pub uuid: Uuid,
    #[serde(skip)]
    pub supplier_id: i64,
    pub supplier_uuid: Uuid,
    pub supplier_name: String,
    #[serde(skip)]
    pub company_id: i64,
    #[serde(skip)]
    pub company_uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[schema(example = "12.50")]
    pub price: Decimal,
    pub unit: Option<String>,
    pub volume: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub uuid: Uuid,
    pub supplier_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub unit: Option<String>,
    pub volume: Option<Decimal>,
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    if *val > max_price() {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &max_price().to_string());
        err.message = Some("O preço excede o valor máximo permitido.".into());
        return Err(err);
    }
    Ok(())
}

// POST /api/products/create
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub supplier_uuid: Uuid,
    #[validate(length(min = 1, max = 255, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    pub unit: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub volume: Option<Decimal>,
}

// PUT /api/products/{uuid} (o fornecedor não muda)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 255, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    pub unit: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub volume: Option<Decimal>,
}

// GET /api/products?name=...&minPrice=...
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_active: Option<bool>,
    pub supplier_id: Option<Uuid>,
    // Escopo da empresa do chamador; nunca vem da query string.
    #[serde(skip)]
    #[param(ignore)]
    pub company_id: Option<Uuid>,
}
