// src/services/pdf.rs

use async_trait::async_trait;
use genpdf::{elements, style, Alignment, Element};
use std::path::PathBuf;

use crate::{common::error::AppError, models::report::GlobalInfo};

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render_global(&self, company_name: &str, info: &GlobalInfo) -> Result<Vec<u8>, AppError>;
}

pub struct GenPdfRenderer {
    fonts_dir: PathBuf,
    font_family: String,
}

impl GenPdfRenderer {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: "Roboto".to_string(),
        }
    }
}

#[async_trait]
impl ReportRenderer for GenPdfRenderer {
    async fn render_global(&self, company_name: &str, info: &GlobalInfo) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        let family = self.font_family.clone();
        let company_name = company_name.to_string();
        let info = info.clone();

        // genpdf é síncrono (leitura de fontes + layout): roda fora do runtime
        tokio::task::spawn_blocking(move || build_global_pdf(&fonts_dir, &family, &company_name, &info))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }
}

fn build_global_pdf(
    fonts_dir: &std::path::Path,
    family: &str,
    company_name: &str,
    info: &GlobalInfo,
) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, family, None).map_err(|e| {
        anyhow::anyhow!("Fonte '{}' não encontrada em {}: {}", family, fonts_dir.display(), e)
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Relatório global - {}", company_name));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let bold = style::Style::new().bold();

    doc.push(elements::Paragraph::new(company_name.to_string()).styled(bold.with_font_size(18)));
    doc.push(elements::Paragraph::new(format!(
        "Período: {} a {}",
        info.start_date.format("%d/%m/%Y"),
        info.end_date.format("%d/%m/%Y")
    )));
    doc.push(elements::Break::new(1.5));

    doc.push(elements::Paragraph::new(format!("Total de pedidos: {}", info.total_orders)));
    doc.push(elements::Paragraph::new(format!("Gasto total: {:.2}", info.total_spend)));
    doc.push(elements::Paragraph::new(format!(
        "Valor médio por pedido: {:.2}",
        info.average_order_value
    )));
    doc.push(elements::Break::new(2));

    // Gasto por fornecedor
    doc.push(elements::Paragraph::new("Gasto por fornecedor").styled(bold.with_font_size(14)));
    let mut suppliers = elements::TableLayout::new(vec![4, 2]);
    suppliers.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    suppliers
        .row()
        .element(elements::Paragraph::new("Fornecedor").styled(bold))
        .element(elements::Paragraph::new("Total").styled(bold))
        .push()
        .map_err(|e| anyhow::anyhow!("Erro na tabela de fornecedores: {}", e))?;
    for (name, spend) in &info.spend_by_supplier {
        let mut amount = elements::Paragraph::new(format!("{:.2}", spend));
        amount.set_alignment(Alignment::Right);
        suppliers
            .row()
            .element(elements::Paragraph::new(name.clone()))
            .element(amount)
            .push()
            .map_err(|e| anyhow::anyhow!("Erro na tabela de fornecedores: {}", e))?;
    }
    doc.push(suppliers);
    doc.push(elements::Break::new(2));

    // Produtos mais pedidos
    doc.push(elements::Paragraph::new("Produtos mais pedidos").styled(bold.with_font_size(14)));
    let mut products = elements::TableLayout::new(vec![4, 2]);
    products.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    products
        .row()
        .element(elements::Paragraph::new("Produto").styled(bold))
        .element(elements::Paragraph::new("Quantidade").styled(bold))
        .push()
        .map_err(|e| anyhow::anyhow!("Erro na tabela de produtos: {}", e))?;
    for top in &info.top_products {
        let mut qty = elements::Paragraph::new(format!("{}", top.total_quantity.normalize()));
        qty.set_alignment(Alignment::Right);
        products
            .row()
            .element(elements::Paragraph::new(top.product_name.clone()))
            .element(qty)
            .push()
            .map_err(|e| anyhow::anyhow!("Erro na tabela de produtos: {}", e))?;
    }
    doc.push(products);

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Falha ao renderizar o PDF: {}", e))?;
    Ok(buffer)
}
