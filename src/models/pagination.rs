// src/models/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Asc,
    #[default]
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// Parâmetros de paginação vindos da query string (?page=0&size=20&sort=name&direction=ASC)
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
}

/// Ordenação já resolvida contra a lista de campos permitidos da entidade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub column: &'static str,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            sort: None,
            direction: None,
        }
    }

    pub fn sorted_by(mut self, sort: &str, direction: SortDirection) -> Self {
        self.sort = Some(sort.to_string());
        self.direction = Some(direction);
        self
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page()) * i64::from(self.size())
    }

    pub fn direction(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }

    /// Campo desconhecido cai no padrão: ordenação nunca gera erro.
    /// `allowed` mapeia o nome público (camelCase) para a coluna.
    pub fn resolve_sort(
        &self,
        allowed: &[(&'static str, &'static str)],
        default: (&'static str, &'static str),
    ) -> SortSpec {
        let (field, column) = self
            .sort
            .as_deref()
            .and_then(|wanted| allowed.iter().find(|(name, _)| *name == wanted).copied())
            .unwrap_or(default);

        SortSpec {
            field,
            column,
            direction: self.direction(),
        }
    }
}
