#![forbid(unsafe_code)]
use secret_santa::{
    prepare_message, Assignment, Event, MessageTemplate, Organizer, Participant,
};
use std::fs;
use tempfile::tempdir;

fn event(gift_amount: u32) -> Event {
    Event {
        year: 2025,
        gift_amount,
        organizer: Organizer {
            name: "Sarah".into(),
            email: "sarah@example.com".into(),
        },
    }
}

fn assignment() -> Assignment {
    Assignment::new(
        Participant::new("Alice", "alice@example.com").excluding(["Bob"]),
        Participant::new("Bob", "bob@example.com").excluding(["Alice"]),
    )
}

#[test]
fn default_body_announces_the_receiver() {
    let msg = prepare_message(
        &assignment(),
        &event(75),
        "santa@example.com",
        &MessageTemplate::default(),
    );
    assert_eq!(msg.to, "alice@example.com");
    assert_eq!(msg.subject, "You may open this email!");
    assert!(msg.body.starts_with("Hi Alice!"));
    assert!(msg.body.contains("You are the Secret Santa for Bob"));
    assert!(msg.body.contains("Sarah"));
    assert!(msg.body.contains("$75"));
}

#[test]
fn gift_amount_follows_the_event() {
    let msg = prepare_message(
        &assignment(),
        &event(100),
        "santa@example.com",
        &MessageTemplate::default(),
    );
    assert!(msg.body.contains("$100"));
    assert!(!msg.body.contains("$75"));
}

#[test]
fn custom_template_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("body.txt");
    fs::write(
        &path,
        "{{giver}} -> {{receiver}} ({{year}}, ${{gift_amount}}, ask {{organizer}} at {{organizer_email}})",
    )
    .unwrap();

    let template = MessageTemplate::from_file(&path).unwrap();
    let a = assignment();
    let body = template.render(&a.giver, &a.receiver, &event(50));
    insta::assert_snapshot!(body, @"Alice -> Bob (2025, $50, ask Sarah at sarah@example.com)");
}

#[test]
fn shipped_template_only_uses_known_fields() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/email_body.txt");
    let template = MessageTemplate::from_file(path).unwrap();
    let a = assignment();
    let body = template.render(&a.giver, &a.receiver, &event(75));
    assert!(body.starts_with("Hi Alice!"));
    assert!(!body.contains("{{"));
}
