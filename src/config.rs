use crate::model::{Event, Organizer, Participant};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Chemin par défaut du fichier d'événement.
pub const DEFAULT_CONFIG_PATH: &str = "config/event.yml";

/// Forme brute du YAML : tout est optionnel pour produire des erreurs lisibles.
#[derive(Debug, Deserialize)]
struct RawConfig {
    year: Option<i32>,
    gift_amount: Option<u32>,
    organizer: Option<Organizer>,
    participants: Option<Vec<Participant>>,
    template: Option<PathBuf>,
}

/// Configuration validée d'un événement Secret Santa.
#[derive(Debug, Clone)]
pub struct EventConfig {
    pub year: i32,
    pub gift_amount: u32,
    pub organizer: Organizer,
    participants: Vec<Participant>,
    template: Option<PathBuf>,
}

impl EventConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("configuration file not found: {}", path.display());
        }
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config =
            Self::from_yaml_str(&data).with_context(|| format!("loading {}", path.display()))?;

        // Template relatif au fichier de configuration.
        if let Some(template) = config.template.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.template = Some(base.join(template));
        }
        debug!(
            path = %path.display(),
            participants = config.participants.len(),
            "event configuration loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(data).context("parsing event YAML")?;

        let Some(year) = raw.year else {
            bail!("configuration must include year");
        };
        let Some(gift_amount) = raw.gift_amount else {
            bail!("configuration must include gift_amount");
        };
        let Some(organizer) = raw.organizer else {
            bail!("configuration must include organizer");
        };
        let participants = match raw.participants {
            Some(list) if !list.is_empty() => list,
            _ => bail!("configuration must include participants"),
        };

        validate_participants(&participants)?;

        Ok(Self {
            year,
            gift_amount,
            organizer,
            participants,
            template: raw.template,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Remplace la liste (import CSV par exemple) en re-validant.
    pub fn set_participants(&mut self, participants: Vec<Participant>) -> Result<()> {
        if participants.is_empty() {
            bail!("configuration must include participants");
        }
        validate_participants(&participants)?;
        self.participants = participants;
        Ok(())
    }

    pub fn template_path(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    pub fn event(&self) -> Event {
        Event {
            year: self.year,
            gift_amount: self.gift_amount,
            organizer: self.organizer.clone(),
        }
    }
}

pub(crate) fn validate_participants(participants: &[Participant]) -> Result<()> {
    let mut names = BTreeSet::new();
    for p in participants {
        if p.name().trim().is_empty() {
            bail!("participant name cannot be empty");
        }
        if p.email().trim().is_empty() {
            bail!("participant {} has no email", p.name());
        }
        if !names.insert(p.name()) {
            bail!("duplicate participant name: {}", p.name());
        }
    }
    for p in participants {
        for excluded in p.exclude() {
            if !names.contains(excluded.as_str()) {
                warn!(participant = p.name(), excluded = %excluded, "exclusion names an unknown participant");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
year: 2025
gift_amount: 75
organizer:
  name: Alice
  email: alice@example.com
participants:
  - name: Alice
    email: alice@example.com
    exclude: [Bob]
  - name: Bob
    email: bob@example.com
    exclude: [Alice]
  - name: Charlie
    email: charlie@example.com
"#;

    fn without(key: &str) -> String {
        let mut out = String::new();
        let mut skipping = false;
        for line in SAMPLE.lines() {
            if line.starts_with(&format!("{key}:")) {
                skipping = true;
                continue;
            }
            if skipping && line.starts_with(' ') {
                continue;
            }
            skipping = false;
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    #[test]
    fn loads_event_values() {
        let cfg = EventConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.year, 2025);
        assert_eq!(cfg.gift_amount, 75);
        assert_eq!(cfg.organizer.name, "Alice");
        assert_eq!(cfg.organizer.email, "alice@example.com");
        assert_eq!(cfg.participants().len(), 3);
        assert_eq!(cfg.participants()[0].name(), "Alice");
        assert!(cfg.participants()[0].excludes("Bob"));
    }

    #[test]
    fn missing_exclude_is_empty() {
        let cfg = EventConfig::from_yaml_str(SAMPLE).unwrap();
        assert!(cfg.participants()[2].exclude().is_empty());
    }

    #[test]
    fn required_fields_are_enforced() {
        for key in ["year", "gift_amount", "organizer", "participants"] {
            let err = EventConfig::from_yaml_str(&without(key)).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn empty_participants_rejected() {
        let yaml = format!("{}participants: []\n", without("participants"));
        assert!(EventConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn duplicate_names_rejected() {
        let yaml = format!("{SAMPLE}  - name: Alice\n    email: other@example.com\n");
        let err = EventConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(EventConfig::load("/nonexistent/path.yml").is_err());
    }

    #[test]
    fn template_is_resolved_next_to_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{SAMPLE}template: body.txt").unwrap();
        let cfg = EventConfig::load(file.path()).unwrap();
        let expected = file.path().parent().unwrap().join("body.txt");
        assert_eq!(cfg.template_path(), Some(expected.as_path()));
    }
}
