// src/services/mail.rs

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    common::{error::AppError, money::line_subtotal},
    models::{
        auth::User,
        order::{Order, OrderItem},
    },
};

/// Envio de e-mails transacionais. A entrega em si fica atrás deste trait;
/// os services só conhecem o contrato.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), AppError>;
    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), AppError>;
    /// Envia o pedido ao e-mail do fornecedor.
    async fn send_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), AppError>;
}

// Um e-mail já montado: destinatário, assunto e corpo em texto puro
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Monta os e-mails; é o mesmo texto para o SMTP e para o log.
#[derive(Debug, Clone)]
pub struct MailTemplates {
    frontend_url: String,
}

impl MailTemplates {
    pub fn new(frontend_url: &str) -> Self {
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify-email?token={}", self.frontend_url, token)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, token)
    }

    pub fn verification(&self, user: &User, token: &str) -> Outgoing {
        Outgoing {
            to: user.email.clone(),
            subject: "Confirme o seu e-mail".into(),
            body: format!(
                "Olá, {}!\n\nPara ativar a sua conta, acesse:\n{}\n",
                user.display_name(),
                self.verification_link(token)
            ),
        }
    }

    pub fn password_reset(&self, user: &User, token: &str) -> Outgoing {
        Outgoing {
            to: user.email.clone(),
            subject: "Redefinição de senha".into(),
            body: format!(
                "Olá, {}!\n\nPara escolher uma nova senha, acesse:\n{}\n\n\
                 Se não foi você que pediu, ignore este e-mail.\n",
                user.display_name(),
                self.reset_link(token)
            ),
        }
    }

    /// Falha com `Notification` se o fornecedor não tem e-mail cadastrado.
    pub fn order(&self, order: &Order, items: &[OrderItem]) -> Result<Outgoing, AppError> {
        let to = order.supplier_email.as_deref().ok_or_else(|| {
            AppError::Notification(format!(
                "O fornecedor '{}' não tem e-mail cadastrado.",
                order.supplier_name
            ))
        })?;

        let mut body = format!("Pedido: {}\nReferência: {}\n", order.name, order.uuid);
        if let Some(delivery) = order.delivery_date {
            body.push_str(&format!("Entrega: {}\n", delivery.format("%Y-%m-%d")));
        }
        if let Some(notes) = order.notes.as_deref() {
            body.push_str(&format!("Observações: {}\n", notes));
        }
        body.push('\n');
        for item in items {
            body.push_str(&format!(
                "- {} x {} @ {} = {}\n",
                item.quantity,
                item.product_name,
                item.unit_price,
                line_subtotal(item.quantity, item.unit_price)
            ));
        }
        body.push_str(&format!("\nTotal: {}\n", order.total_amount));

        Ok(Outgoing {
            to: to.to_string(),
            subject: format!("Novo pedido: {}", order.name),
            body,
        })
    }
}

// --- SMTP ---

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sem STARTTLS apenas para relays locais de desenvolvimento.
    pub starttls: bool,
}

pub struct SmtpMailer {
    from: Mailbox,
    templates: MailTemplates,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(from: &str, frontend_url: &str, settings: SmtpSettings) -> anyhow::Result<Self> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| anyhow::anyhow!("MAIL_FROM inválido '{}': {}", from, e))?;

        let mut builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);
        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            from,
            templates: MailTemplates::new(frontend_url),
            transport: builder.build(),
        })
    }

    async fn deliver(&self, mail: Outgoing) -> Result<(), AppError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| AppError::Notification(format!("Destinatário inválido '{}': {}", mail.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| AppError::Notification(format!("Falha ao montar o e-mail: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Notification(format!("Falha no envio SMTP: {}", e)))?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "📧 E-mail enviado");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.deliver(self.templates.verification(user, token)).await
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.deliver(self.templates.password_reset(user, token)).await
    }

    async fn send_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), AppError> {
        let mail = self.templates.order(order, items)?;
        self.deliver(mail).await
    }
}

// --- Log ---

// Sem SMTP_HOST: nada é entregue, o e-mail montado só vai para o log.
pub struct LogMailer {
    from: String,
    templates: MailTemplates,
}

impl LogMailer {
    pub fn new(from: String, frontend_url: String) -> Self {
        Self {
            from,
            templates: MailTemplates::new(&frontend_url),
        }
    }

    fn record(&self, mail: Outgoing) {
        tracing::warn!(
            from = %self.from,
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "📧 SMTP não configurado: e-mail apenas registrado no log"
        );
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.record(self.templates.verification(user, token));
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.record(self.templates.password_reset(user, token));
        Ok(())
    }

    async fn send_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), AppError> {
        let mail = self.templates.order(order, items)?;
        self.record(mail);
        Ok(())
    }
}
