#![forbid(unsafe_code)]
//! Secret Santa — tirage au sort de donneurs/destinataires sous contraintes.
//!
//! - Tirage par rejet : permutation uniforme, validation, nouvel essai.
//! - Exclusions par participant, plafond de tentatives, test de faisabilité.
//! - Configuration YAML, affichage console, historique texte, envoi SMTP.

pub mod config;
pub mod io;
pub mod model;
pub mod notification;
pub mod pairing;
pub mod presenter;
pub mod runner;
pub mod storage;
pub mod template;

pub use config::EventConfig;
pub use model::{Assignment, Event, Organizer, PairingSet, Participant};
pub use notification::{prepare_message, Mailer, Message, MessageRenderer, SmtpMailer, SmtpSettings};
pub use pairing::{has_valid_pairing, pairings_valid, PairingError, PairingGenerator};
pub use presenter::PairingPresenter;
pub use runner::{EmailRunner, RunMode};
pub use storage::{FileRecorder, Recorder};
pub use template::MessageTemplate;
