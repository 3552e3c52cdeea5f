mod feasibility;
mod types;
mod validate;

pub use feasibility::has_valid_pairing;
pub use types::{PairingError, DEFAULT_MAX_ATTEMPTS};
pub use validate::{assignment_allowed, pairings_valid};

use crate::model::{Assignment, PairingSet, Participant};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Générateur de tirages par rejet : mélange, valide, recommence.
///
/// Chaque instance possède sa liste de participants, sa source aléatoire et
/// son compteur de tentatives ; une instance par run logique.
#[derive(Debug)]
pub struct PairingGenerator<R = StdRng> {
    participants: Vec<Participant>,
    rng: R,
    attempts: u64,
    max_attempts: Option<u64>,
}

impl PairingGenerator<StdRng> {
    /// Source aléatoire initialisée par l'OS.
    pub fn new(participants: Vec<Participant>) -> Result<Self, PairingError> {
        ensure_participants(&participants)?;
        Ok(Self::build(participants, StdRng::from_os_rng()))
    }
}

impl PairingGenerator<ChaCha8Rng> {
    /// Tirages reproductibles à partir d'une graine.
    pub fn seeded(participants: Vec<Participant>, seed: u64) -> Result<Self, PairingError> {
        ensure_participants(&participants)?;
        Ok(Self::build(participants, ChaCha8Rng::seed_from_u64(seed)))
    }
}

impl<R: Rng> PairingGenerator<R> {
    pub fn with_rng(participants: Vec<Participant>, rng: R) -> Result<Self, PairingError> {
        ensure_participants(&participants)?;
        Ok(Self::build(participants, rng))
    }

    fn build(participants: Vec<Participant>, rng: R) -> Self {
        Self {
            participants,
            rng,
            attempts: 0,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }

    /// Plafonne le nombre de tentatives d'un `generate()` (0 compte comme 1).
    pub fn with_max_attempts(mut self, max: u64) -> Self {
        self.max_attempts = Some(max);
        self
    }

    /// Aucun plafond : boucle sans fin si les exclusions sont infaisables.
    pub fn unbounded(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    /// Tentatives évaluées par le dernier `generate()` (acceptée incluse).
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Vérifie en amont qu'un tirage valide existe. Jamais appelé par `generate()`.
    pub fn is_feasible(&self) -> bool {
        has_valid_pairing(&self.participants)
    }

    /// Tire une permutation uniforme jusqu'à obtenir un tirage valide.
    pub fn generate(&mut self) -> Result<PairingSet, PairingError> {
        self.attempts = 0;
        let mut order: Vec<usize> = (0..self.participants.len()).collect();

        loop {
            order.shuffle(&mut self.rng);
            self.attempts += 1;

            if validate::order_valid(&self.participants, &order) {
                return Ok(self.pairing_from_order(&order));
            }

            if self.max_attempts.is_some_and(|max| self.attempts >= max) {
                return Err(PairingError::Infeasible {
                    attempts: self.attempts,
                });
            }
        }
    }

    fn pairing_from_order(&self, order: &[usize]) -> PairingSet {
        let assignments = self
            .participants
            .iter()
            .zip(order)
            .map(|(giver, &r)| Assignment::new(giver.clone(), self.participants[r].clone()))
            .collect();
        PairingSet::new(assignments)
    }
}

fn ensure_participants(participants: &[Participant]) -> Result<(), PairingError> {
    if participants.is_empty() {
        return Err(PairingError::InvalidInput("participant list is empty"));
    }
    Ok(())
}
