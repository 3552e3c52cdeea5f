use thiserror::Error;

/// Plafond par défaut du nombre de tirages essayés par `generate()`.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairingError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("no valid pairing found after {attempts} attempt(s); exclusions are probably infeasible")]
    Infeasible { attempts: u64 },
}
