use crate::model::PairingSet;
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

/// Répertoire d'historique par défaut.
pub const DEFAULT_PAIRINGS_DIR: &str = "pairings";

pub trait Recorder {
    /// Enregistre un tirage entièrement envoyé et renvoie le chemin du fichier écrit.
    fn save(&self, pairings: &PairingSet, year: i32) -> anyhow::Result<PathBuf> {
        self.save_partial(pairings, year, pairings.len())
    }

    /// Enregistre un tirage dont seules les `sent` premières attributions
    /// ont été envoyées.
    fn save_partial(
        &self,
        pairings: &PairingSet,
        year: i32,
        sent: usize,
    ) -> anyhow::Result<PathBuf>;
}

/// Historique texte : `<base>/<year>/pairings_YYYYmmdd_HHMMSS.txt`
pub struct FileRecorder {
    base_dir: PathBuf,
}

impl FileRecorder {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn save_at(
        &self,
        pairings: &PairingSet,
        year: i32,
        sent: usize,
        now: DateTime<Local>,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.base_dir.join(year.to_string());
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let body = render_record(pairings, year, sent, now);
        let mut tmp = NamedTempFile::new_in(&dir).with_context(|| "creating temp file")?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;

        let stem = format!("pairings_{}", now.format("%Y%m%d_%H%M%S"));
        let mut n = 1u32;
        loop {
            let name = if n == 1 {
                format!("{stem}.txt")
            } else {
                format!("{stem}_{n}.txt")
            };
            let path = dir.join(name);
            match tmp.persist_noclobber(&path) {
                Ok(_) => {
                    debug!(path = %path.display(), "pairings recorded");
                    return Ok(path);
                }
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                    tmp = err.file;
                    n += 1;
                }
                Err(err) => {
                    return Err(err.error)
                        .with_context(|| format!("atomic rename to {}", path.display()))
                }
            }
        }
    }
}

impl Recorder for FileRecorder {
    fn save_partial(
        &self,
        pairings: &PairingSet,
        year: i32,
        sent: usize,
    ) -> anyhow::Result<PathBuf> {
        self.save_at(pairings, year, sent, Local::now())
    }
}

fn render_record(pairings: &PairingSet, year: i32, sent: usize, now: DateTime<Local>) -> String {
    let mut s = format!("Secret Santa Pairings - {year}\n");
    s.push_str(&format!("Generated: {}\n", now.format("%Y-%m-%d %H:%M:%S %z")));
    s.push_str(&format!("Run: {}\n", Uuid::new_v4()));
    s.push_str(&format!("Sent: {}/{}\n", sent.min(pairings.len()), pairings.len()));
    s.push_str(&"=".repeat(50));
    s.push_str("\n\n");
    for (idx, a) in pairings.iter().enumerate() {
        s.push_str(&format!(
            "Gift #{}:{}\n  {} ({}) → {} ({})\n\n",
            idx + 1,
            if idx < sent { "" } else { " (not sent)" },
            a.giver.name(),
            a.giver.email(),
            a.receiver.name(),
            a.receiver.email()
        ));
    }
    s
}
