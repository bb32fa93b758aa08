// src/services/supplier_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::SupplierStore,
    models::{
        auth::User,
        pagination::PageRequest,
        supplier::{NewSupplier, Supplier, SupplierFilter, SupplierPayload},
    },
};

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct SupplierService {
    suppliers: Arc<dyn SupplierStore>,
}

impl SupplierService {
    pub fn new(suppliers: Arc<dyn SupplierStore>) -> Self {
        Self { suppliers }
    }

    fn duplicate(name: &str) -> AppError {
        AppError::Duplicate(format!("Já existe um fornecedor chamado '{}' nesta empresa.", name))
    }

    pub async fn create(&self, caller: &User, payload: SupplierPayload) -> Result<Supplier, AppError> {
        let name = payload.name.trim().to_string();
        if self
            .suppliers
            .exists_by_company_uuid_and_name_ignore_case(caller.company_uuid, &name)
            .await?
        {
            return Err(Self::duplicate(&name));
        }

        let supplier = self
            .suppliers
            .insert(NewSupplier {
                uuid: Uuid::new_v4(),
                company_id: caller.company_id,
                name,
                contact_name: clean(payload.contact_name),
                email: clean(payload.email),
                phone: clean(payload.phone),
                address: clean(payload.address),
            })
            .await?;

        tracing::info!(supplier = %supplier.uuid, company = %caller.company_uuid, "Fornecedor criado");
        Ok(supplier)
    }

    /// Fornecedor de outra empresa é tratado como inexistente.
    pub async fn get(&self, caller: &User, uuid: Uuid) -> Result<Supplier, AppError> {
        self.suppliers
            .find_by_uuid(uuid)
            .await?
            .filter(|s| s.company_id == caller.company_id)
            .ok_or_else(|| AppError::NotFound(format!("Fornecedor {} não encontrado.", uuid)))
    }

    pub async fn update(
        &self,
        caller: &User,
        uuid: Uuid,
        payload: SupplierPayload,
    ) -> Result<Supplier, AppError> {
        let current = self.get(caller, uuid).await?;
        let name = payload.name.trim().to_string();

        let renamed = current.name.to_lowercase() != name.to_lowercase();
        if renamed
            && self
                .suppliers
                .exists_by_company_uuid_and_name_ignore_case(caller.company_uuid, &name)
                .await?
        {
            return Err(Self::duplicate(&name));
        }

        let updated = Supplier {
            name,
            contact_name: clean(payload.contact_name),
            email: clean(payload.email),
            phone: clean(payload.phone),
            address: clean(payload.address),
            ..current
        };
        self.suppliers.update(&updated).await
    }

    pub async fn list_by_company(
        &self,
        caller: &User,
        company_uuid: Uuid,
        mut filter: SupplierFilter,
        page: &PageRequest,
    ) -> Result<Page<Supplier>, AppError> {
        if company_uuid != caller.company_uuid {
            return Err(AppError::Forbidden(
                "Você não tem acesso aos fornecedores desta empresa.".into(),
            ));
        }
        filter.company_id = Some(company_uuid);
        self.suppliers.find_page(&filter.to_specification(), page).await
    }

    /// Ativa/desativa (soft delete); o registro nunca é apagado.
    pub async fn set_status(&self, caller: &User, uuid: Uuid, is_active: bool) -> Result<Supplier, AppError> {
        let current = self.get(caller, uuid).await?;
        if current.is_active == is_active {
            return Ok(current);
        }
        let supplier = self
            .suppliers
            .update(&Supplier {
                is_active,
                ..current
            })
            .await?;
        tracing::info!(supplier = %supplier.uuid, is_active, "Status do fornecedor alterado");
        Ok(supplier)
    }

    pub async fn exists_by_company_uuid_and_name_ignore_case(
        &self,
        company_uuid: Uuid,
        name: &str,
    ) -> Result<bool, AppError> {
        self.suppliers
            .exists_by_company_uuid_and_name_ignore_case(company_uuid, name.trim())
            .await
    }
}
