// src/services/report_service.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use crate::{
    common::{
        dates::{parse_optional, Bound},
        error::AppError,
        money::{average_money, round_money, sum_money},
    },
    db::{CompanyStore, OrderStore, UserStore},
    models::{
        auth::User,
        order::OrderStatus,
        report::{DashboardInfo, GlobalInfo, ReportRange, TopProduct},
    },
    services::pdf::ReportRenderer,
};

const WINDOW_DAYS: i64 = 30;
const TOP_PRODUCTS_LIMIT: usize = 10;

#[derive(Clone)]
pub struct ReportService {
    users: Arc<dyn UserStore>,
    companies: Arc<dyn CompanyStore>,
    orders: Arc<dyn OrderStore>,
    renderer: Arc<dyn ReportRenderer>,
}

impl ReportService {
    pub fn new(
        users: Arc<dyn UserStore>,
        companies: Arc<dyn CompanyStore>,
        orders: Arc<dyn OrderStore>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            users,
            companies,
            orders,
            renderer,
        }
    }

    // A empresa do relatório é sempre a do e-mail autenticado
    async fn user_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuário com e-mail '{}' não encontrado.", email)))
    }

    /// Últimos 30 dias: quantidade, soma dos totais e quantos ainda estão PENDING.
    pub async fn dashboard_info(&self, email: &str, now: DateTime<Utc>) -> Result<DashboardInfo, AppError> {
        let user = self.user_by_email(email).await?;
        let start = now - Duration::days(WINDOW_DAYS);
        let orders = self.orders.find_in_window(user.company_id, start, now).await?;

        Ok(DashboardInfo {
            total_orders: orders.len() as i64,
            total_amount: sum_money(orders.iter().map(|o| o.total_amount)),
            pending_orders: orders.iter().filter(|o| o.status == OrderStatus::Pending).count() as i64,
            window_start: start,
            window_end: now,
        })
    }

    fn resolve_range(
        range: &ReportRange,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let end = parse_optional(range.end_date.as_deref(), Bound::End)?.unwrap_or(now);
        let start = parse_optional(range.start_date.as_deref(), Bound::Start)?
            .unwrap_or(end - Duration::days(WINDOW_DAYS));
        if start > end {
            return Err(AppError::BadRequest(
                "A data inicial não pode ser posterior à data final.".into(),
            ));
        }
        Ok((start, end))
    }

    pub async fn global_info(
        &self,
        email: &str,
        range: &ReportRange,
        now: DateTime<Utc>,
    ) -> Result<GlobalInfo, AppError> {
        let (start, end) = Self::resolve_range(range, now)?;
        let user = self.user_by_email(email).await?;
        self.global_for(&user, start, end).await
    }

    async fn global_for(
        &self,
        user: &User,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<GlobalInfo, AppError> {
        let orders = self.orders.find_in_window(user.company_id, start, end).await?;
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let items = if ids.is_empty() {
            Vec::new()
        } else {
            self.orders.find_items_for_orders(&ids).await?
        };

        let supplier_of: HashMap<i64, &str> = orders
            .iter()
            .map(|o| (o.id, o.supplier_name.as_str()))
            .collect();

        let mut spend_by_supplier: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut quantities: HashMap<&str, Decimal> = HashMap::new();
        for item in &items {
            if let Some(supplier) = supplier_of.get(&item.order_id) {
                *spend_by_supplier.entry((*supplier).to_string()).or_default() += item.subtotal();
            }
            *quantities.entry(item.product_name.as_str()).or_default() += item.quantity;
        }
        for spend in spend_by_supplier.values_mut() {
            *spend = round_money(*spend);
        }

        // Agrupado pelo nome: produtos homônimos de fornecedores diferentes somam juntos.
        // Maior quantidade primeiro; empate desfeito pelo nome (A-Z)
        let mut top_products: Vec<TopProduct> = quantities
            .into_iter()
            .map(|(name, total_quantity)| TopProduct {
                product_name: name.to_string(),
                total_quantity,
            })
            .collect();
        top_products.sort_by(|a, b| {
            b.total_quantity
                .cmp(&a.total_quantity)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        top_products.truncate(TOP_PRODUCTS_LIMIT);

        let total_spend = sum_money(items.iter().map(|i| i.subtotal()));
        Ok(GlobalInfo {
            start_date: start,
            end_date: end,
            total_orders: orders.len() as i64,
            average_order_value: average_money(total_spend, orders.len()),
            total_spend,
            spend_by_supplier,
            top_products,
        })
    }

    pub async fn global_pdf(
        &self,
        email: &str,
        range: &ReportRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>, AppError> {
        let (start, end) = Self::resolve_range(range, now)?;
        let user = self.user_by_email(email).await?;
        let info = self.global_for(&user, start, end).await?;
        let company = self
            .companies
            .find_by_id(user.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa do usuário não encontrada.".into()))?;

        self.renderer.render_global(&company.name, &info).await
    }
}
