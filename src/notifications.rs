//! Plain-text email templates for the order workflow.

use chrono::{DateTime, Utc};

use crate::{config::AppConfig, mail::Email, payments::format_amount};

const SIGNATURE: &str = "Best regards,\nThe School Uniforms Team";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Tailor,
    DeliveryPartner,
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Tailor => "Tailor",
            AccountKind::DeliveryPartner => "Delivery Partner",
        }
    }
}

/// What the order emails need to know about an order.
pub struct OrderSummary<'a> {
    pub order_code: &'a str,
    pub school_name: &'a str,
    pub student_name: Option<&'a str>,
    pub total_amount: i64,
    pub deadline: Option<DateTime<Utc>>,
}

impl OrderSummary<'_> {
    fn student(&self) -> &str {
        self.student_name.unwrap_or("-")
    }

    fn deadline_date(&self) -> String {
        self.deadline
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

pub fn confirmation_url(config: &AppConfig, token: &str) -> String {
    format!("{}/tailor/confirm-order/{}/", config.frontend_url, token)
}

pub fn verification_code(
    config: &AppConfig,
    kind: AccountKind,
    to: &str,
    full_name: &str,
    code: &str,
) -> Email {
    let role = match kind {
        AccountKind::Tailor => "a tailor",
        AccountKind::DeliveryPartner => "a delivery partner",
    };
    Email {
        from: config.default_from_email.clone(),
        to: vec![to.to_string()],
        subject: format!("Email Verification for {} Account", kind.label()),
        body: format!(
            "Hello {full_name},\n\n\
             Thank you for registering as {role} on our platform.\n\
             Your verification code is: {code}\n\n\
             Please enter this code on the verification page to complete your registration.\n\n\
             {SIGNATURE}\n"
        ),
    }
}

pub fn resent_verification_code(
    config: &AppConfig,
    kind: AccountKind,
    to: &str,
    full_name: &str,
    code: &str,
) -> Email {
    Email {
        from: config.default_from_email.clone(),
        to: vec![to.to_string()],
        subject: format!("New Verification Code for {} Account", kind.label()),
        body: format!(
            "Hello {full_name},\n\n\
             Your new verification code is: {code}\n\n\
             Please enter this code on the verification page to complete your registration.\n\n\
             {SIGNATURE}\n"
        ),
    }
}

pub fn tailor_assignment(
    config: &AppConfig,
    to: &str,
    tailor_name: &str,
    order: &OrderSummary<'_>,
    token: &str,
) -> Email {
    Email {
        from: config.default_from_email.clone(),
        to: vec![to.to_string()],
        subject: format!("New Order Assignment - {}", order.order_code),
        body: format!(
            "Hello {tailor_name},\n\n\
             You have been assigned a new school uniform order.\n\n\
             Order Details:\n\
             - Order Code: {code}\n\
             - School: {school}\n\
             - Student: {student}\n\
             - Deadline: {deadline}\n\n\
             Please confirm that you will work on this order by clicking the link below:\n\
             {url}\n\n\
             You have 7 days to complete this order.\n\n\
             {SIGNATURE}\n",
            code = order.order_code,
            school = order.school_name,
            student = order.student(),
            deadline = order.deadline_date(),
            url = confirmation_url(config, token),
        ),
    }
}

pub fn customer_payment_received(
    config: &AppConfig,
    to: &str,
    customer_name: &str,
    order: &OrderSummary<'_>,
) -> Email {
    Email {
        from: config.default_from_email.clone(),
        to: vec![to.to_string()],
        subject: format!("Order Confirmation - {}", order.order_code),
        body: format!(
            "Hello {customer_name},\n\n\
             Thank you for your order. Your payment has been received and your order is being processed.\n\n\
             Order Details:\n\
             - Order Code: {code}\n\
             - School: {school}\n\
             - Student: {student}\n\
             - Total Amount: {total}\n\n\
             We will notify you once your order is ready for delivery.\n\n\
             {SIGNATURE}\n",
            code = order.order_code,
            school = order.school_name,
            student = order.student(),
            total = format_amount(order.total_amount),
        ),
    }
}

pub fn customer_in_production(
    config: &AppConfig,
    to: &str,
    customer_name: &str,
    order: &OrderSummary<'_>,
) -> Email {
    Email {
        from: config.default_from_email.clone(),
        to: vec![to.to_string()],
        subject: format!("Order Update - {}", order.order_code),
        body: format!(
            "Hello {customer_name},\n\n\
             Good news! Your order has been accepted by our tailor and is now in production.\n\n\
             Order Details:\n\
             - Order Code: {code}\n\
             - School: {school}\n\
             - Student: {student}\n\
             - Expected Completion: {deadline}\n\n\
             We will notify you once your order is ready for delivery.\n\n\
             {SIGNATURE}\n",
            code = order.order_code,
            school = order.school_name,
            student = order.student(),
            deadline = order.deadline_date(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MailBackend, PaypalConfig, SmtpConfig};
    use chrono::TimeZone;

    fn config() -> AppConfig {
        AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 3000,
            jwt_secret: "secret".into(),
            frontend_url: "https://uniforms.example".into(),
            default_from_email: "noreply@uniforms.example".into(),
            mail_backend: MailBackend::Console,
            smtp: SmtpConfig {
                host: "localhost".into(),
                port: 25,
                username: None,
                password: None,
            },
            paypal: PaypalConfig {
                base_url: "http://localhost".into(),
                client_id: String::new(),
                client_secret: String::new(),
                currency: "USD".into(),
            },
            webhook_token: None,
        }
    }

    fn summary() -> OrderSummary<'static> {
        OrderSummary {
            order_code: "AB12CD34",
            school_name: "Hillside Primary",
            student_name: Some("Thandi"),
            total_amount: 45000,
            deadline: Some(Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn tailor_email_links_to_confirmation_page() {
        let email = tailor_assignment(&config(), "tailor@example.com", "Sipho Dube", &summary(), "tok123");
        assert_eq!(email.subject, "New Order Assignment - AB12CD34");
        assert!(email
            .body
            .contains("https://uniforms.example/tailor/confirm-order/tok123/"));
        assert!(email.body.contains("Deadline: 2026-03-09"));
        assert_eq!(email.to, vec!["tailor@example.com".to_string()]);
    }

    #[test]
    fn customer_confirmation_shows_total() {
        let email = customer_payment_received(&config(), "parent@example.com", "Ann", &summary());
        assert_eq!(email.subject, "Order Confirmation - AB12CD34");
        assert!(email.body.contains("Total Amount: 450.00"));
        assert!(email.body.contains("Student: Thandi"));
    }

    #[test]
    fn verification_email_names_account_kind() {
        let email = verification_code(
            &config(),
            AccountKind::DeliveryPartner,
            "driver@example.com",
            "Lee Moyo",
            "042917",
        );
        assert_eq!(email.subject, "Email Verification for Delivery Partner Account");
        assert!(email.body.contains("042917"));
    }
}
