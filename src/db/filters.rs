// src/db/filters.rs
//
// Construtor de predicados dinâmicos. Cada filtro opcional que veio preenchido
// vira uma `Condition`; todas são combinadas com AND. A mesma lista é traduzida
// para SQL (QueryBuilder) pelo store do Postgres e avaliada em memória nos testes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        dates::{parse_optional, Bound},
        error::AppError,
    },
    models::{
        order::{OrderFilter, OrderStatus},
        product::ProductFilter,
        supplier::SupplierFilter,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Decimal(Decimal),
    Time(DateTime<Utc>),
    Uuid(Uuid),
    Bool(bool),
    Status(OrderStatus),
}

impl From<Decimal> for FilterValue {
    fn from(v: Decimal) -> Self {
        FilterValue::Decimal(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Time(v)
    }
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        FilterValue::Uuid(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<OrderStatus> for FilterValue {
    fn from(v: OrderStatus) -> Self {
        FilterValue::Status(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `LOWER(col) LIKE '%needle%'`; o needle já está em minúsculas.
    Contains { column: &'static str, needle: String },
    /// Mesmo teste de substring, mas com OR entre várias colunas (modo "search").
    AnyContains { columns: &'static [&'static str], needle: String },
    Eq { column: &'static str, value: FilterValue },
    NotEq { column: &'static str, value: FilterValue },
    AtLeast { column: &'static str, value: FilterValue },
    AtMost { column: &'static str, value: FilterValue },
}

/// Texto vazio ou só com espaços conta como "sem restrição".
fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// Escapa os curingas do LIKE para que o texto do usuário seja literal.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    conditions: Vec<Condition>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn contains(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(needle) = normalized(value) {
            self.conditions.push(Condition::Contains { column, needle });
        }
        self
    }

    pub fn any_contains(mut self, columns: &'static [&'static str], value: Option<&str>) -> Self {
        if let Some(needle) = normalized(value) {
            self.conditions.push(Condition::AnyContains { columns, needle });
        }
        self
    }

    pub fn eq<V: Into<FilterValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.conditions.push(Condition::Eq {
                column,
                value: value.into(),
            });
        }
        self
    }

    pub fn not_eq<V: Into<FilterValue>>(mut self, column: &'static str, value: V) -> Self {
        self.conditions.push(Condition::NotEq {
            column,
            value: value.into(),
        });
        self
    }

    /// Intervalo inclusivo; qualquer uma das pontas pode faltar.
    pub fn between<V: Into<FilterValue>>(
        mut self,
        column: &'static str,
        min: Option<V>,
        max: Option<V>,
    ) -> Self {
        if let Some(min) = min {
            self.conditions.push(Condition::AtLeast {
                column,
                value: min.into(),
            });
        }
        if let Some(max) = max {
            self.conditions.push(Condition::AtMost {
                column,
                value: max.into(),
            });
        }
        self
    }

    /// Escreve ` WHERE a AND b ...` (ou nada, se não houver condições).
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            push_condition(qb, condition);
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Decimal(v) => qb.push_bind(*v),
        FilterValue::Time(v) => qb.push_bind(*v),
        FilterValue::Uuid(v) => qb.push_bind(*v),
        FilterValue::Bool(v) => qb.push_bind(*v),
        FilterValue::Status(v) => qb.push_bind(*v),
    };
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    match condition {
        Condition::Contains { column, needle } => {
            qb.push("LOWER(").push(*column).push(") LIKE ");
            qb.push_bind(like_pattern(needle));
            qb.push(" ESCAPE '\\'");
        }
        Condition::AnyContains { columns, needle } => {
            qb.push("(");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("LOWER(").push(*column).push(") LIKE ");
                qb.push_bind(like_pattern(needle));
                qb.push(" ESCAPE '\\'");
            }
            qb.push(")");
        }
        Condition::Eq { column, value } => {
            qb.push(*column).push(" = ");
            push_value(qb, value);
        }
        Condition::NotEq { column, value } => {
            qb.push(*column).push(" <> ");
            push_value(qb, value);
        }
        Condition::AtLeast { column, value } => {
            qb.push(*column).push(" >= ");
            push_value(qb, value);
        }
        Condition::AtMost { column, value } => {
            qb.push(*column).push(" <= ");
            push_value(qb, value);
        }
    }
}

// ---
// Especificações por entidade
// ---

pub const SUPPLIER_SEARCH_COLUMNS: &[&str] = &["name", "contact_name", "email", "phone", "address"];
pub const ORDER_SEARCH_COLUMNS: &[&str] = &["name", "notes"];

impl SupplierFilter {
    /// Com `search` preenchido, o modo é OR entre os campos de texto;
    /// caso contrário, cada campo informado entra com AND.
    pub fn to_specification(&self) -> Specification {
        let spec = Specification::new()
            .eq("company_uuid", self.company_id)
            .eq("is_active", Some(self.is_active.unwrap_or(true)));

        if normalized(self.search.as_deref()).is_some() {
            return spec.any_contains(SUPPLIER_SEARCH_COLUMNS, self.search.as_deref());
        }

        spec.contains("name", self.name.as_deref())
            .contains("contact_name", self.contact_name.as_deref())
            .contains("email", self.email.as_deref())
            .contains("phone", self.phone.as_deref())
            .contains("address", self.address.as_deref())
    }
}

impl ProductFilter {
    pub fn to_specification(&self) -> Specification {
        Specification::new()
            .eq("company_uuid", self.company_id)
            .eq("supplier_uuid", self.supplier_id)
            .eq("is_active", Some(self.is_active.unwrap_or(true)))
            .contains("name", self.name.as_deref())
            .contains("description", self.description.as_deref())
            .contains("category", self.category.as_deref())
            .contains("unit", self.unit.as_deref())
            .between("price", self.min_price, self.max_price)
    }
}

impl OrderFilter {
    /// Sem `status`, pedidos DELETED ficam de fora; com `status`, é igualdade exata.
    /// Falha apenas se uma data não puder ser interpretada.
    pub fn to_specification(&self) -> Result<Specification, AppError> {
        let created_from = parse_optional(self.created_from.as_deref(), Bound::Start)?;
        let created_to = parse_optional(self.created_to.as_deref(), Bound::End)?;
        let updated_from = parse_optional(self.updated_from.as_deref(), Bound::Start)?;
        let updated_to = parse_optional(self.updated_to.as_deref(), Bound::End)?;
        let delivery_from = parse_optional(self.delivery_from.as_deref(), Bound::Start)?;
        let delivery_to = parse_optional(self.delivery_to.as_deref(), Bound::End)?;

        let mut spec = Specification::new()
            .eq("uuid", self.order_id)
            .eq("company_uuid", self.company_id)
            .eq("supplier_uuid", self.supplier_id)
            .eq("user_uuid", self.user_id);

        spec = match self.status {
            Some(status) => spec.eq("status", Some(status)),
            None => spec.not_eq("status", OrderStatus::Deleted),
        };

        // Texto de busca substitui os filtros por campo (name/notes)
        spec = if normalized(self.search_text.as_deref()).is_some() {
            spec.any_contains(ORDER_SEARCH_COLUMNS, self.search_text.as_deref())
        } else {
            spec.contains("name", self.name.as_deref())
                .contains("notes", self.notes.as_deref())
        };

        spec = spec
            .between("total_amount", self.min_amount, self.max_amount)
            .between("created_at", created_from, created_to)
            .between("updated_at", updated_from, updated_to)
            .between("delivery_date", delivery_from, delivery_to);

        Ok(spec)
    }
}
