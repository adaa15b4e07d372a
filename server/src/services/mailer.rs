//! Correo transaccional
//!
//! Envío de códigos de verificación por un API HTTP de terceros. El correo
//! es best-effort: un fallo se registra y se devuelve en la respuesta como
//! resultado no fatal, nunca tumba la operación que lo originó.

use serde::Serialize;

use crate::core::Config;

/// Resultado no fatal del intento de envío
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailOutcome {
    pub enviado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalle: Option<String>,
}

impl EmailOutcome {
    fn ok() -> Self {
        Self {
            enviado: true,
            detalle: None,
        }
    }

    fn fallo(detalle: impl Into<String>) -> Self {
        Self {
            enviado: false,
            detalle: Some(detalle.into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MailerService {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailerService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
        }
    }

    /// Envía un código de verificación o recuperación
    pub async fn send_codigo(&self, to: &str, codigo: &str, asunto: &str) -> EmailOutcome {
        let Some(api_url) = &self.api_url else {
            tracing::warn!(to = %to, "Mail API not configured, code not sent");
            return EmailOutcome::fallo("Servicio de correo no configurado");
        };

        let cuerpo = format!(
            "Tu código es: {}\n\nCaduca en 15 minutos. Si no solicitaste este código, ignora este mensaje.",
            codigo
        );
        let payload = MailPayload {
            from: &self.from,
            to,
            subject: asunto,
            text: &cuerpo,
        };

        let result = self
            .client
            .post(api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(to = %to, "Verification email sent");
                EmailOutcome::ok()
            }
            Ok(resp) => {
                tracing::warn!(to = %to, status = %resp.status(), "Mail API rejected the message");
                EmailOutcome::fallo(format!("El servicio de correo respondió {}", resp.status()))
            }
            Err(e) => {
                tracing::warn!(to = %to, "Mail API unreachable: {}", e);
                EmailOutcome::fallo("No se pudo contactar el servicio de correo")
            }
        }
    }
}
