use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::response::ApiResponse;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Services e stores devolvem sempre AppError; o handler só repassa.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    BadRequest(String),

    // Transição de estado inválida (ex: enviar um pedido que não está PENDING)
    #[error("{0}")]
    IllegalState(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Falha no envio de e-mail: {0}")]
    Notification(String),

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) | AppError::IllegalState(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Notification(_)
            | AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Bcrypt(_)
            | AppError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converte violação de chave única do Postgres em `Duplicate`; o resto vira `Database`.
pub fn map_unique_violation(e: sqlx::Error, message: impl FnOnce(&str) -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            return AppError::Duplicate(message(&constraint));
        }
    }
    e.into()
}

// Campos aninhados viram `admin.password`, listas viram `items[0].quantity`
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut HashMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                out.insert(key, messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&key, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", key, index), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Erros de validação devolvem o mapa campo -> mensagens em `data`.
        if let AppError::Validation(errors) = &self {
            let mut details: HashMap<String, Vec<String>> = HashMap::new();
            collect_field_errors("", errors, &mut details);
            let body = ApiResponse::failure_with("Um ou mais campos são inválidos.", details);
            return (status, Json(body)).into_response();
        }

        let message = if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
            format!("Ocorreu um erro inesperado: {}", self)
        } else {
            tracing::debug!(status = %status, "Erro de negócio: {}", self);
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_business_errors_to_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Duplicate("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::IllegalState("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Notification("smtp".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn nested_validation_errors_are_flattened() {
        use crate::models::company::{RegisterAdminPayload, RegisterCompanyPayload};
        use validator::Validate;

        let payload = RegisterCompanyPayload {
            name: "Acme".into(),
            tax_id: "1".into(),
            email: "not-an-email".into(),
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            country: None,
            admin: RegisterAdminPayload {
                email: "admin@acme.pt".into(),
                password: "short".into(),
                first_name: None,
                last_name: None,
            },
        };
        let errors = payload.validate().unwrap_err();
        let mut details = HashMap::new();
        collect_field_errors("", &errors, &mut details);
        assert!(details.contains_key("email"));
        assert_eq!(
            details.get("admin.password"),
            Some(&vec!["A senha deve ter no mínimo 8 caracteres.".to_string()])
        );
    }

    #[test]
    fn internal_errors_keep_underlying_message() {
        let err = AppError::Internal(anyhow::anyhow!("disco cheio"));
        assert!(err.to_string().contains("disco cheio"));
    }
}
