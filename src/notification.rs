use crate::model::{Assignment, Event, Participant};
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::extension::ClientId;
use lettre::{SmtpTransport, Transport};
use std::str::FromStr;
use tracing::info;

/// Sujet des messages d'attribution.
pub const SUBJECT: &str = "You may open this email!";

/// Message prêt à l'envoi pour un donneur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub to_name: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Permet de customiser le rendu du corps du message.
pub trait MessageRenderer {
    fn render(&self, giver: &Participant, receiver: &Participant, event: &Event) -> String;
}

/// Prépare le message destiné au donneur d'une attribution.
pub fn prepare_message(
    assignment: &Assignment,
    event: &Event,
    from: &str,
    renderer: &dyn MessageRenderer,
) -> Message {
    Message {
        to: assignment.giver.email().to_string(),
        to_name: assignment.giver.name().to_string(),
        from: from.to_string(),
        subject: SUBJECT.to_string(),
        body: renderer.render(&assignment.giver, &assignment.receiver, event),
    }
}

/// Canal d'envoi (SMTP en production, faux mailer en test).
pub trait Mailer {
    fn send(&self, message: &Message) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// TLS implicite.
    #[default]
    Tls,
    StartTls,
    /// Aucun chiffrement (relais local uniquement).
    None,
}

impl SmtpSecurity {
    /// Port usuel du mode : 465, 587 ou 25.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Tls => 465,
            Self::StartTls => 587,
            Self::None => 25,
        }
    }
}

impl FromStr for SmtpSecurity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tls" | "ssl" | "true" | "1" | "yes" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            "none" | "false" | "0" | "no" => Ok(Self::None),
            _ => anyhow::bail!("expected tls, starttls or none"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub domain: Option<String>,
    pub username: String,
    pub password: String,
    pub security: SmtpSecurity,
}

pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let builder = match settings.security {
            SmtpSecurity::Tls => SmtpTransport::relay(&settings.host)
                .with_context(|| format!("configuring TLS relay {}", settings.host))?,
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(&settings.host)
                .with_context(|| format!("configuring STARTTLS relay {}", settings.host))?,
            SmtpSecurity::None => SmtpTransport::builder_dangerous(&settings.host),
        };
        let mut builder = builder.port(settings.port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }
        if let Some(domain) = &settings.domain {
            builder = builder.hello_name(ClientId::Domain(domain.clone()));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> Result<()> {
        let email = build_email(message)?;
        self.transport
            .send(&email)
            .with_context(|| format!("sending to {}", message.to))?;
        info!(to = %message.to, "assignment email sent");
        Ok(())
    }
}

fn build_email(message: &Message) -> Result<lettre::Message> {
    let from: Mailbox = message
        .from
        .parse()
        .with_context(|| format!("invalid sender address: {}", message.from))?;
    let to = Mailbox::new(
        Some(message.to_name.clone()),
        message
            .to
            .parse()
            .with_context(|| format!("invalid recipient address: {}", message.to))?,
    );
    let email = lettre::Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?;
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> Message {
        Message {
            to: to.to_string(),
            to_name: "Alice".into(),
            from: "santa@example.com".into(),
            subject: SUBJECT.into(),
            body: "Hi Alice!".into(),
        }
    }

    #[test]
    fn builds_rfc5322_email() {
        let email = build_email(&message("alice@example.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: You may open this email!"));
        assert!(raw.contains("alice@example.com"));
        assert!(raw.contains("Hi Alice!"));
    }

    #[test]
    fn rejects_malformed_recipient() {
        assert!(build_email(&message("not an address")).is_err());
    }

    #[test]
    fn security_parses_legacy_flags() {
        assert_eq!("true".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::Tls);
        assert_eq!("false".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::None);
        assert_eq!("STARTTLS".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::StartTls);
        assert!("maybe".parse::<SmtpSecurity>().is_err());
    }

    #[test]
    fn default_port_follows_security_mode() {
        assert_eq!(SmtpSecurity::Tls.default_port(), 465);
        assert_eq!(SmtpSecurity::StartTls.default_port(), 587);
        assert_eq!(SmtpSecurity::None.default_port(), 25);
    }
}
