// src/services/product_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::{ProductStore, SupplierStore},
    models::{
        auth::User,
        pagination::PageRequest,
        product::{CreateProductPayload, NewProduct, Product, ProductFilter, UpdateProductPayload},
    },
};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    suppliers: Arc<dyn SupplierStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>, suppliers: Arc<dyn SupplierStore>) -> Self {
        Self { products, suppliers }
    }

    pub async fn create(&self, caller: &User, payload: CreateProductPayload) -> Result<Product, AppError> {
        let supplier = self
            .suppliers
            .find_by_uuid(payload.supplier_uuid)
            .await?
            .filter(|s| s.company_id == caller.company_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Fornecedor {} não encontrado.", payload.supplier_uuid))
            })?;

        let product = self
            .products
            .insert(NewProduct {
                uuid: Uuid::new_v4(),
                supplier_id: supplier.id,
                name: payload.name.trim().to_string(),
                description: payload.description,
                category: payload.category,
                price: payload.price,
                unit: payload.unit,
                volume: payload.volume,
            })
            .await?;

        tracing::info!(product = %product.uuid, supplier = %supplier.uuid, "Produto criado");
        Ok(product)
    }

    pub async fn get(&self, caller: &User, uuid: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_uuid(uuid)
            .await?
            .filter(|p| p.company_id == caller.company_id)
            .ok_or_else(|| AppError::NotFound(format!("Produto {} não encontrado.", uuid)))
    }

    pub async fn update(
        &self,
        caller: &User,
        uuid: Uuid,
        payload: UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let current = self.get(caller, uuid).await?;
        let updated = Product {
            name: payload.name.trim().to_string(),
            description: payload.description,
            category: payload.category,
            price: payload.price,
            unit: payload.unit,
            volume: payload.volume,
            ..current
        };
        self.products.update(&updated).await
    }

    // Soft delete: pedidos antigos continuam apontando para o produto
    pub async fn deactivate(&self, caller: &User, uuid: Uuid) -> Result<Product, AppError> {
        let current = self.get(caller, uuid).await?;
        self.products.set_active(current.id, false).await?;
        tracing::info!(product = %uuid, "Produto desativado");
        self.get(caller, uuid).await
    }

    pub async fn search(
        &self,
        caller: &User,
        mut filter: ProductFilter,
        page: &PageRequest,
    ) -> Result<Page<Product>, AppError> {
        filter.company_id = Some(caller.company_uuid);
        self.products.find_page(&filter.to_specification(), page).await
    }
}
