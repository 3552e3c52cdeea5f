use crate::model::{Event, PairingSet};
use crate::notification::{prepare_message, Mailer, MessageRenderer};
use crate::presenter::Palette;
use crate::storage::Recorder;
use crate::template::MessageTemplate;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Délai entre deux envois.
pub const DEFAULT_PACING: Duration = Duration::from_secs(3);

/// Mode choisi au démarrage : envoi réel ou simple affichage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    Live,
    #[default]
    DryRun,
}

impl RunMode {
    pub fn from_flag(live: bool) -> Self {
        if live {
            Self::Live
        } else {
            Self::DryRun
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

/// Envoie un message par attribution, en série, puis enregistre le tirage.
pub struct EmailRunner<'a> {
    event: Event,
    sender: String,
    mailer: &'a dyn Mailer,
    recorder: &'a dyn Recorder,
    renderer: Box<dyn MessageRenderer + 'a>,
    pacing: Duration,
    palette: Palette,
}

impl<'a> EmailRunner<'a> {
    pub fn new(
        event: Event,
        sender: impl Into<String>,
        mailer: &'a dyn Mailer,
        recorder: &'a dyn Recorder,
    ) -> Self {
        Self {
            event,
            sender: sender.into(),
            mailer,
            recorder,
            renderer: Box::new(MessageTemplate::default()),
            pacing: DEFAULT_PACING,
            palette: Palette::new(true),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_renderer(mut self, renderer: impl MessageRenderer + 'a) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.palette = Palette::new(color);
        self
    }

    /// Renvoie le chemin de l'historique écrit.
    ///
    /// Si un envoi échoue, les attributions déjà envoyées sont enregistrées
    /// (`Sent: N/M`) avant de renvoyer l'erreur.
    pub fn run<W: Write>(&self, out: &mut W, pairings: &PairingSet) -> Result<PathBuf> {
        let c = self.palette;
        writeln!(out, "\n{}{}📧 Sending emails...{}\n", c.red, c.bold, c.reset)?;

        for (idx, assignment) in pairings.iter().enumerate() {
            if idx > 0 && !self.pacing.is_zero() {
                thread::sleep(self.pacing);
            }
            writeln!(
                out,
                "{}Sending to {}...{}",
                c.green,
                assignment.giver.name(),
                c.reset
            )?;
            let message =
                prepare_message(assignment, &self.event, &self.sender, self.renderer.as_ref());
            if let Err(err) = self.mailer.send(&message) {
                let err = self.record_partial(out, pairings, idx, err);
                return Err(err.context(format!("emailing {}", assignment.giver.name())));
            }
        }

        writeln!(
            out,
            "\n{}{}✅ All emails sent successfully!{}",
            c.green, c.bold, c.reset
        )?;

        let path = self.recorder.save(pairings, self.event.year)?;
        info!(path = %path.display(), sent = pairings.len(), "run complete");
        writeln!(
            out,
            "{}💾 Pairings saved to: {}{}",
            c.yellow,
            path.display(),
            c.reset
        )?;
        Ok(path)
    }

    fn record_partial<W: Write>(
        &self,
        out: &mut W,
        pairings: &PairingSet,
        sent: usize,
        err: anyhow::Error,
    ) -> anyhow::Error {
        let c = self.palette;
        match self.recorder.save_partial(pairings, self.event.year, sent) {
            Ok(path) => {
                warn!(path = %path.display(), sent, total = pairings.len(), "run interrupted");
                let _ = writeln!(
                    out,
                    "{}💾 Partial pairings saved to: {} ({}/{} sent){}",
                    c.yellow,
                    path.display(),
                    sent,
                    pairings.len(),
                    c.reset
                );
                err.context(format!(
                    "{sent}/{} email(s) sent, pairings saved to {}",
                    pairings.len(),
                    path.display()
                ))
            }
            Err(save_err) => err.context(format!(
                "{sent}/{} email(s) sent, pairings could not be saved: {save_err:#}",
                pairings.len()
            )),
        }
    }
}
