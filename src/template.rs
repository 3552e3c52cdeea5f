use crate::model::{Event, Participant};
use crate::notification::MessageRenderer;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Corps de message par défaut.
pub const DEFAULT_BODY: &str = "Hi {{giver}}!

It's that time of year again! You are the Secret Santa for {{receiver}}! As the name implies, this is a secret, so please do not tell your giftee.

This email is your gifting assignment for {{year}}. The gift exchange will take place around Christmas. Please be ready with a wrapped gift valued at ${{gift_amount}} or less.

Any further questions about this event, ask {{organizer}} ({{organizer_email}}). But don't let them know if you're their Secret Santa.

Cheers from your Happy Secret Santa Pairing Bot!
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Giver,
    Receiver,
    Organizer,
    OrganizerEmail,
    GiftAmount,
    Year,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "giver" => Some(Self::Giver),
            "receiver" => Some(Self::Receiver),
            "organizer" => Some(Self::Organizer),
            "organizer_email" => Some(Self::OrganizerEmail),
            "gift_amount" => Some(Self::GiftAmount),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// Gabarit texte à champs `{{...}}`, validé au chargement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        // DEFAULT_BODY ne contient que des champs connus
        Self::parse(DEFAULT_BODY).unwrap_or(Self {
            segments: vec![Segment::Text(DEFAULT_BODY.to_string())],
        })
    }
}

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                bail!("unclosed placeholder in template");
            };
            let name = after[..close].trim();
            let Some(field) = Field::parse(name) else {
                bail!("unknown template placeholder: {name}");
            };
            segments.push(Segment::Field(field));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source =
            fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("parsing template {}", path.display()))
    }

    pub fn render(&self, giver: &Participant, receiver: &Participant, event: &Event) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(Field::Giver) => out.push_str(giver.name()),
                Segment::Field(Field::Receiver) => out.push_str(receiver.name()),
                Segment::Field(Field::Organizer) => out.push_str(&event.organizer.name),
                Segment::Field(Field::OrganizerEmail) => out.push_str(&event.organizer.email),
                Segment::Field(Field::GiftAmount) => out.push_str(&event.gift_amount.to_string()),
                Segment::Field(Field::Year) => out.push_str(&event.year.to_string()),
            }
        }
        out
    }
}

impl MessageRenderer for MessageTemplate {
    fn render(&self, giver: &Participant, receiver: &Participant, event: &Event) -> String {
        MessageTemplate::render(self, giver, receiver, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_body_parses() {
        assert!(MessageTemplate::parse(DEFAULT_BODY).is_ok());
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = MessageTemplate::parse("Hi {{nickname}}").unwrap_err();
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn unclosed_placeholder_is_rejected() {
        assert!(MessageTemplate::parse("Hi {{giver").is_err());
    }

    #[test]
    fn placeholders_tolerate_inner_spaces() {
        let t = MessageTemplate::parse("{{ year }}").unwrap();
        assert_eq!(t.segments, vec![Segment::Field(Field::Year)]);
    }
}
