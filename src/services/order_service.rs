// src/services/order_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::OrderStore,
    models::{
        auth::User,
        order::{CreateOrderPayload, DraftLine, Order, OrderDetail, OrderDraft, OrderFilter, OrderStatus},
        pagination::PageRequest,
    },
    services::mail::Mailer,
};

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    mailer: Arc<dyn Mailer>,
}

// UUIDs chegam como texto: um valor malformado é só uma referência inexistente.
fn parse_reference(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::NotFound(format!("{} {} não encontrado.", what, raw)))
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { orders, mailer }
    }

    // --- CRIAÇÃO ---
    // Aqui só se convertem as referências; fornecedor e produtos são lidos,
    // validados e precificados pelo store dentro da transação da escrita.
    pub async fn create_order(&self, caller: &User, payload: CreateOrderPayload) -> Result<OrderDetail, AppError> {
        let supplier_uuid = parse_reference(&payload.supplier_uuid, "Fornecedor")?;
        let lines = payload
            .items
            .iter()
            .map(|item| {
                Ok(DraftLine {
                    product_uuid: parse_reference(&item.product_uuid, "Produto")?,
                    quantity: item.quantity,
                    notes: item.notes.clone(),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let order = self
            .orders
            .create_with_items(OrderDraft {
                uuid: Uuid::new_v4(),
                company_id: caller.company_id,
                user_id: Some(caller.id),
                supplier_uuid,
                name: payload.name.trim().to_string(),
                notes: payload.notes,
                delivery_date: payload.delivery_date,
                lines,
            })
            .await?;

        tracing::info!(
            order = %order.uuid,
            supplier = %order.supplier_uuid,
            total = %order.total_amount,
            "🧾 Pedido criado"
        );

        let items = self.orders.find_items(order.id).await?;
        Ok(OrderDetail::new(order, &items))
    }

    async fn find_scoped(&self, caller: &User, uuid: Uuid) -> Result<Order, AppError> {
        self.orders
            .find_by_uuid(uuid)
            .await?
            .filter(|o| o.company_id == caller.company_id)
            .ok_or_else(|| AppError::NotFound(format!("Pedido {} não encontrado.", uuid)))
    }

    pub async fn get_order(&self, caller: &User, uuid: Uuid) -> Result<OrderDetail, AppError> {
        let order = self.find_scoped(caller, uuid).await?;
        let items = self.orders.find_items(order.id).await?;
        Ok(OrderDetail::new(order, &items))
    }

    pub async fn search_orders(
        &self,
        caller: &User,
        mut filter: OrderFilter,
        page: &PageRequest,
    ) -> Result<Page<Order>, AppError> {
        filter.company_id = Some(caller.company_uuid);
        let spec = filter.to_specification()?;
        self.orders.find_page(&spec, page).await
    }

    // --- ENVIO ---
    /// PENDING -> SENT. O status só muda depois que o e-mail saiu sem erro;
    /// se o envio falhar, o pedido continua PENDING e pode ser reenviado.
    pub async fn send_order(&self, caller: &User, uuid: Uuid) -> Result<Order, AppError> {
        let order = self.find_scoped(caller, uuid).await?;
        if order.status != OrderStatus::Pending {
            return Err(AppError::IllegalState(format!(
                "O pedido precisa estar no estado {} para ser enviado (estado atual: {}).",
                OrderStatus::Pending,
                order.status
            )));
        }

        let items = self.orders.find_items(order.id).await?;
        self.mailer.send_order(&order, &items).await.map_err(|e| match e {
            AppError::Notification(msg) => AppError::Notification(msg),
            other => AppError::Notification(other.to_string()),
        })?;

        let flipped = self
            .orders
            .transition_status(order.id, Some(OrderStatus::Pending), OrderStatus::Sent)
            .await?;
        if !flipped {
            return Err(AppError::IllegalState(format!(
                "O pedido {} foi alterado por outra operação e não está mais {}.",
                uuid,
                OrderStatus::Pending
            )));
        }

        tracing::info!(order = %uuid, "📨 Pedido enviado ao fornecedor");
        self.find_scoped(caller, uuid).await
    }

    /// Soft delete, restrito a administradores.
    pub async fn delete_order(&self, caller: &User, uuid: Uuid) -> Result<(), AppError> {
        if !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Apenas administradores podem excluir pedidos.".into(),
            ));
        }
        let order = self.find_scoped(caller, uuid).await?;
        self.orders
            .transition_status(order.id, None, OrderStatus::Deleted)
            .await?;
        tracing::info!(order = %uuid, "Pedido excluído");
        Ok(())
    }
}
