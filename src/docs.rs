// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Companies ---
        handlers::company::register_company,
        handlers::company::get_my_company,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::verify_email,
        handlers::auth::resend_verification,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::get_me,

        // --- Suppliers ---
        handlers::supplier::create_supplier,
        handlers::supplier::get_supplier,
        handlers::supplier::update_supplier,
        handlers::supplier::list_company_suppliers,
        handlers::supplier::supplier_name_exists,
        handlers::supplier::set_supplier_status,

        // --- Products ---
        handlers::product::create_product,
        handlers::product::get_product,
        handlers::product::update_product,
        handlers::product::deactivate_product,
        handlers::product::search_products,

        // --- Orders ---
        handlers::order::create_order,
        handlers::order::search_orders,
        handlers::order::get_order,
        handlers::order::send_order,
        handlers::order::delete_order,

        // --- Reports ---
        handlers::report::dashboard,
        handlers::report::global,
        handlers::report::global_pdf,
    ),
    components(
        schemas(
            models::company::CompanyStatus,
            models::company::Company,
            models::company::RegisterAdminPayload,
            models::company::RegisterCompanyPayload,
            models::company::RegistrationResponse,

            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::EmailPayload,
            models::auth::TokenPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,

            models::supplier::Supplier,
            models::supplier::SupplierPayload,
            models::supplier::SupplierStatusPayload,

            models::product::Product,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,

            models::order::OrderStatus,
            models::order::Order,
            models::order::OrderLine,
            models::order::OrderDetail,
            models::order::OrderItemPayload,
            models::order::CreateOrderPayload,

            models::report::DashboardInfo,
            models::report::TopProduct,
            models::report::GlobalInfo,

            models::pagination::SortDirection,
        )
    ),
    tags(
        (name = "Companies", description = "Cadastro e dados da empresa"),
        (name = "Auth", description = "Autenticação, verificação de e-mail e senha"),
        (name = "Suppliers", description = "Gestão de Fornecedores"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Orders", description = "Pedidos a fornecedores"),
        (name = "Reports", description = "Indicadores e relatórios")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
