use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::slice;

/// Participant au tirage (valeur immuable pour la durée d'un run).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    exclude: BTreeSet<String>,
}

impl Participant {
    pub fn new<N: Into<String>, E: Into<String>>(name: N, email: E) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            exclude: BTreeSet::new(),
        }
    }

    /// Ajoute des noms interdits comme destinataire de ce participant.
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }
}

/// Couple (donneur, destinataire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: Participant,
    pub receiver: Participant,
}

impl Assignment {
    pub fn new(giver: Participant, receiver: Participant) -> Self {
        Self { giver, receiver }
    }
}

/// Résultat complet d'un tirage, dans l'ordre des donneurs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingSet {
    assignments: Vec<Assignment>,
}

impl PairingSet {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
    pub fn len(&self) -> usize {
        self.assignments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
    pub fn iter(&self) -> slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    /// Vrai si aucune paire n'est un auto-cadeau ni une exclusion.
    pub fn is_valid(&self) -> bool {
        crate::pairing::pairings_valid(&self.assignments)
    }

    pub fn receiver_of(&self, giver: &str) -> Option<&Participant> {
        self.assignments
            .iter()
            .find(|a| a.giver.name() == giver)
            .map(|a| &a.receiver)
    }
}

impl<'a> IntoIterator for &'a PairingSet {
    type Item = &'a Assignment;
    type IntoIter = slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Organisateur (mentionné dans les messages).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub name: String,
    pub email: String,
}

/// Métadonnées de l'événement transmises au mailer et au recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub year: i32,
    pub gift_amount: u32,
    pub organizer: Organizer,
}
