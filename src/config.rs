use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    Smtp,
    Console,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub default_from_email: String,
    pub mail_backend: MailBackend,
    pub smtp: SmtpConfig,
    pub paypal: PaypalConfig,
    pub webhook_token: Option<String>,
}

const PAYPAL_SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com";
const PAYPAL_LIVE_URL: &str = "https://api-m.paypal.com";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let default_from_email = env::var("DEFAULT_FROM_EMAIL")
            .unwrap_or_else(|_| "School Uniforms <noreply@schooluniforms.local>".to_string());

        let mail_backend = match env::var("MAIL_BACKEND").as_deref() {
            Ok("smtp") => MailBackend::Smtp,
            Ok("console") | Err(_) => MailBackend::Console,
            Ok(other) => anyhow::bail!("unknown MAIL_BACKEND '{other}'"),
        };
        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(587),
            username: env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
        };

        let base_url = match env::var("PAYPAL_BASE_URL") {
            Ok(url) => url,
            Err(_) => paypal_base_url(env::var("PAYPAL_MODE").as_deref().unwrap_or("sandbox"))?
                .to_string(),
        };
        let paypal = PaypalConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: env::var("PAYPAL_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("PAYPAL_CLIENT_SECRET").unwrap_or_default(),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
        };

        let webhook_token = env::var("PAYMENT_WEBHOOK_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            frontend_url,
            default_from_email,
            mail_backend,
            smtp,
            paypal,
            webhook_token,
        })
    }
}

fn paypal_base_url(mode: &str) -> anyhow::Result<&'static str> {
    match mode {
        "sandbox" => Ok(PAYPAL_SANDBOX_URL),
        "live" => Ok(PAYPAL_LIVE_URL),
        other => anyhow::bail!("unknown PAYPAL_MODE '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::paypal_base_url;

    #[test]
    fn paypal_mode_selects_api_host() {
        assert_eq!(
            paypal_base_url("sandbox").unwrap(),
            "https://api-m.sandbox.paypal.com"
        );
        assert_eq!(paypal_base_url("live").unwrap(), "https://api-m.paypal.com");
        assert!(paypal_base_url("staging").is_err());
    }
}
