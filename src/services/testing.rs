// src/services/testing.rs
//
// Fixtures compartilhadas pelos testes dos services.

use async_trait::async_trait;
use chrono::Duration;
use rust_decimal::Decimal;
use std::{str::FromStr, sync::{Arc, Mutex}};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{memory::MemoryStore, CompanyStore},
    models::{
        auth::{NewUser, Role, User},
        company::{NewCompany, RegisterAdminPayload, RegisterCompanyPayload},
        order::{CreateOrderPayload, Order, OrderItem, OrderItemPayload},
        product::{CreateProductPayload, Product},
        report::GlobalInfo,
        supplier::{Supplier, SupplierPayload},
    },
    services::{
        auth::{AuthService, AuthSettings},
        mail::Mailer,
        order_service::OrderService,
        pdf::ReportRenderer,
        product_service::ProductService,
        report_service::ReportService,
        supplier_service::SupplierService,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Verification { email: String, token: String },
    Reset { email: String, token: String },
    Order(Uuid),
}

/// Guarda tudo o que "enviou"; com `fail` ligado, todo envio falha.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn record(&self, message: Sent) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Notification("servidor SMTP indisponível".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    pub fn last_token(&self, email: &str) -> Option<String> {
        self.sent.lock().unwrap().iter().rev().find_map(|m| match m {
            Sent::Verification { email: to, token } | Sent::Reset { email: to, token }
                if to.eq_ignore_ascii_case(email) =>
            {
                Some(token.clone())
            }
            _ => None,
        })
    }

    pub fn orders_sent(&self) -> Vec<Uuid> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Sent::Order(uuid) => Some(*uuid),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.record(Sent::Verification {
            email: user.email.clone(),
            token: token.to_string(),
        })
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.record(Sent::Reset {
            email: user.email.clone(),
            token: token.to_string(),
        })
    }

    async fn send_order(&self, order: &Order, _items: &[OrderItem]) -> Result<(), AppError> {
        self.record(Sent::Order(order.uuid))
    }
}

pub struct FakeRenderer;

#[async_trait]
impl ReportRenderer for FakeRenderer {
    async fn render_global(&self, company_name: &str, _info: &GlobalInfo) -> Result<Vec<u8>, AppError> {
        Ok(format!("%PDF {}", company_name).into_bytes())
    }
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "test-secret".into(),
        jwt_expiration_secs: 3600,
        verification_ttl: Duration::hours(24),
        reset_ttl: Duration::hours(1),
        bcrypt_cost: 4,
    }
}

pub fn auth_service(store: &Arc<MemoryStore>, mailer: &Arc<RecordingMailer>) -> AuthService {
    AuthService::new(store.clone(), store.clone(), mailer.clone(), auth_settings())
}

pub fn register_payload(tax_id: &str, admin_email: &str) -> RegisterCompanyPayload {
    RegisterCompanyPayload {
        name: "Acme Lda".into(),
        tax_id: tax_id.into(),
        email: "geral@acme.pt".into(),
        phone: None,
        address: None,
        city: Some("Porto".into()),
        postal_code: None,
        country: Some("PT".into()),
        admin: RegisterAdminPayload {
            email: admin_email.into(),
            password: "secret-password".into(),
            first_name: Some("Ana".into()),
            last_name: None,
        },
    }
}

pub fn supplier_payload(name: &str) -> SupplierPayload {
    SupplierPayload {
        name: name.into(),
        contact_name: None,
        email: Some("pedidos@fornecedor.pt".into()),
        phone: None,
        address: None,
    }
}

fn new_company(name: &str, tax_id: &str) -> NewCompany {
    NewCompany {
        uuid: Uuid::new_v4(),
        name: name.into(),
        tax_id: tax_id.into(),
        email: format!("geral@{}.pt", tax_id),
        phone: None,
        address: None,
        city: None,
        postal_code: None,
        country: None,
    }
}

fn new_admin(email: &str) -> NewUser {
    NewUser {
        uuid: Uuid::new_v4(),
        email: email.into(),
        password_hash: String::new(),
        first_name: None,
        last_name: None,
        role: Role::Admin,
        email_verification_token: None,
        email_verification_expires_at: None,
    }
}

/// Uma empresa com um administrador, sobre um `MemoryStore` novo.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub admin: User,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_mailer(RecordingMailer::default()).await
    }

    pub async fn with_failing_mailer() -> Self {
        Self::with_mailer(RecordingMailer::failing()).await
    }

    async fn with_mailer(mailer: RecordingMailer) -> Self {
        let store = Arc::new(MemoryStore::new());
        let (_, admin) = store
            .register(new_company("Acme Lda", "500100200"), new_admin("admin@acme.pt"))
            .await
            .unwrap();
        Self {
            store,
            mailer: Arc::new(mailer),
            admin,
        }
    }

    pub async fn other_company_admin(&self) -> User {
        let (_, admin) = self
            .store
            .register(new_company("Globex SA", "600300400"), new_admin("admin@globex.pt"))
            .await
            .unwrap();
        admin
    }

    pub fn member(&self, role: Role) -> User {
        let email = format!("{}@acme.pt", Uuid::new_v4().simple());
        self.store.add_user(self.admin.company_id, &email, role)
    }

    pub fn suppliers(&self) -> SupplierService {
        SupplierService::new(self.store.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.store.clone(), self.store.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.store.clone(), self.mailer.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            Arc::new(FakeRenderer),
        )
    }

    pub async fn supplier(&self, name: &str) -> Supplier {
        self.suppliers().create(&self.admin, supplier_payload(name)).await.unwrap()
    }

    pub async fn product(&self, supplier: &Supplier, name: &str, price: &str) -> Product {
        let payload = CreateProductPayload {
            supplier_uuid: supplier.uuid,
            name: name.into(),
            description: None,
            category: None,
            price: Decimal::from_str(price).unwrap(),
            unit: Some("un".into()),
            volume: None,
        };
        self.products().create(&self.admin, payload).await.unwrap()
    }

    pub async fn order_with(&self, supplier: &Supplier, lines: &[(&Product, &str)]) -> Order {
        let payload = CreateOrderPayload {
            supplier_uuid: supplier.uuid.to_string(),
            name: format!("Pedido {}", supplier.name),
            notes: None,
            delivery_date: None,
            items: lines
                .iter()
                .map(|(product, quantity)| OrderItemPayload {
                    product_uuid: product.uuid.to_string(),
                    quantity: Decimal::from_str(quantity).unwrap(),
                    notes: None,
                })
                .collect(),
        };
        self.orders().create_order(&self.admin, payload).await.unwrap().header
    }

    pub async fn order(&self, supplier: &Supplier) -> Order {
        self.order_with(supplier, &[]).await
    }
}
