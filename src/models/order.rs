// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        money::{
            checked_line_subtotal, checked_sum_money, line_subtotal, max_amount, max_quantity,
            QUANTITY_SCALE,
        },
    },
    models::{product::Product, supplier::Supplier},
};

// PENDING --send--> SENT ; PENDING --confirm--> CONFIRMED --complete--> COMPLETED ;
// qualquer estado --admin--> DELETED (soft delete)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Sent,
    Completed,
    Deleted,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Sent => "SENT",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Deleted => "DELETED",
        };
        f.write_str(label)
    }
}

// Linha da view `order_view`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip)]
    pub id: i64,
    pub uuid: Uuid,
    #[serde(skip)]
    pub company_id: i64,
    pub company_uuid: Uuid,
    #[serde(skip)]
    pub supplier_id: i64,
    pub supplier_uuid: Uuid,
    pub supplier_name: String,
    #[serde(skip)]
    pub supplier_email: Option<String>,
    #[serde(skip)]
    pub user_id: Option<i64>,
    pub user_uuid: Option<Uuid>,
    pub name: String,
    pub notes: Option<String>,
    #[schema(example = "150.50")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da view `order_item_view`. O preço é um snapshot do produto no momento do pedido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub order_id: i64,
    #[serde(skip)]
    pub product_id: i64,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        line_subtotal(self.quantity, self.unit_price)
    }
}

// Pedido como chegou do cliente, com as referências já convertidas para UUID.
// O store resolve fornecedor e produtos dentro da mesma transação da escrita.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub uuid: Uuid,
    pub company_id: i64,
    pub user_id: Option<i64>,
    pub supplier_uuid: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub lines: Vec<DraftLine>,
}

#[derive(Debug, Clone)]
pub struct DraftLine {
    pub product_uuid: Uuid,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

/// O que de fato vai para o banco depois de validado e precificado.
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub supplier: Supplier,
    pub total_amount: Decimal,
    pub items: Vec<NewOrderItem>,
}

impl OrderDraft {
    /// Aplica as regras de criação sobre as linhas lidas pelo store.
    /// `products[i]` é o produto da linha `i`, ou `None` se não existe.
    /// Os preços são copiados aqui; nada é gravado.
    pub fn price(&self, supplier: Option<Supplier>, products: &[Option<Product>]) -> Result<PricedOrder, AppError> {
        let supplier = supplier
            .filter(|s| s.company_id == self.company_id)
            .ok_or_else(|| AppError::NotFound(format!("Fornecedor {} não encontrado.", self.supplier_uuid)))?;
        if !supplier.is_active {
            return Err(AppError::BadRequest(format!(
                "O fornecedor '{}' está inativo.",
                supplier.name
            )));
        }

        let mut items = Vec::with_capacity(self.lines.len());
        let mut subtotals = Vec::with_capacity(self.lines.len());
        for (line, product) in self.lines.iter().zip(products) {
            let product = product
                .as_ref()
                .filter(|p| p.company_id == self.company_id)
                .ok_or_else(|| AppError::NotFound(format!("Produto {} não encontrado.", line.product_uuid)))?;

            if product.supplier_id != supplier.id {
                return Err(AppError::BadRequest(format!(
                    "O produto '{}' não pertence ao fornecedor '{}'.",
                    product.name, supplier.name
                )));
            }
            if !product.is_active {
                return Err(AppError::BadRequest(format!(
                    "O produto '{}' está inativo.",
                    product.name
                )));
            }
            check_quantity(&product.name, line.quantity)?;

            let subtotal = checked_line_subtotal(line.quantity, product.price)
                .ok_or_else(|| amount_too_large(&product.name))?;
            subtotals.push(subtotal);
            items.push(NewOrderItem {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
                notes: line.notes.clone(),
            });
        }

        let total_amount = checked_sum_money(subtotals)
            .filter(|total| *total <= max_amount())
            .ok_or_else(|| {
                AppError::BadRequest("O total do pedido excede o valor máximo permitido.".into())
            })?;

        Ok(PricedOrder {
            supplier,
            total_amount,
            items,
        })
    }
}

// Quantidade > 0, no máximo 3 casas decimais e dentro do limite da coluna:
// o que é gravado é exatamente o que entrou no cálculo do total.
fn check_quantity(product_name: &str, quantity: Decimal) -> Result<(), AppError> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "A quantidade do produto '{}' deve ser maior que zero.",
            product_name
        )));
    }
    if quantity.normalize().scale() > QUANTITY_SCALE {
        return Err(AppError::BadRequest(format!(
            "A quantidade do produto '{}' aceita no máximo {} casas decimais.",
            product_name, QUANTITY_SCALE
        )));
    }
    if quantity > max_quantity() {
        return Err(AppError::BadRequest(format!(
            "A quantidade do produto '{}' excede o máximo de {}.",
            product_name,
            max_quantity()
        )));
    }
    Ok(())
}

fn amount_too_large(product_name: &str) -> AppError {
    AppError::BadRequest(format!(
        "O subtotal do produto '{}' excede o valor máximo permitido.",
        product_name
    ))
}

// Linha de item como aparece na resposta (com subtotal calculado)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

impl From<&OrderItem> for OrderLine {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_uuid: item.product_uuid,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal(),
            notes: item.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub items: Vec<OrderLine>,
}

impl OrderDetail {
    pub fn new(header: Order, items: &[OrderItem]) -> Self {
        Self {
            header,
            items: items.iter().map(OrderLine::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_uuid: String,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

// POST /api/orders/create
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub supplier_uuid: String,
    #[validate(length(min = 1, max = 255, message = "O nome do pedido é obrigatório."))]
    pub name: String,
    pub notes: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
}

// GET /api/orders — datas chegam como texto e são interpretadas pelo parser de datas.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub order_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub search_text: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub status: Option<OrderStatus>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub updated_from: Option<String>,
    pub updated_to: Option<String>,
    pub delivery_from: Option<String>,
    pub delivery_to: Option<String>,
}
