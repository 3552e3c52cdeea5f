use crate::model::{PairingSet, Participant};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de participants depuis CSV: header `name,email[,exclude]` (exclusions séparées par `;`)
pub fn import_participants_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Participant>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let email = rec.get(1).context("missing email")?.trim();
        if name.is_empty() || email.is_empty() {
            bail!("invalid participant row (empty)");
        }
        let exclude = rec
            .get(2)
            .map(parse_exclusions)
            .unwrap_or_default();
        out.push(Participant::new(name, email).excluding(exclude));
    }
    Ok(out)
}

fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Export JSON du tirage (jolie mise en forme)
pub fn export_pairings_json<P: AsRef<Path>>(path: P, pairings: &PairingSet) -> anyhow::Result<()> {
    let path = path.as_ref();
    let s = serde_json::to_string_pretty(pairings)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export CSV du tirage: header `gift,giver,giver_email,receiver,receiver_email`
pub fn export_pairings_csv<P: AsRef<Path>>(path: P, pairings: &PairingSet) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["gift", "giver", "giver_email", "receiver", "receiver_email"])?;
    for (idx, a) in pairings.iter().enumerate() {
        let gift = (idx + 1).to_string();
        w.write_record([
            gift.as_str(),
            a.giver.name(),
            a.giver.email(),
            a.receiver.name(),
            a.receiver.email(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;
    use tempfile::tempdir;

    #[test]
    fn imports_rows_with_optional_exclusions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(
            &path,
            "name,email,exclude\nAlice,alice@example.com,Bob; Charlie\nBob,bob@example.com\n",
        )
        .unwrap();

        let people = import_participants_csv(&path).unwrap();
        assert_eq!(people.len(), 2);
        assert!(people[0].excludes("Bob"));
        assert!(people[0].excludes("Charlie"));
        assert!(people[1].exclude().is_empty());
    }

    #[test]
    fn rejects_blank_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,email\n,nobody@example.com\n").unwrap();
        assert!(import_participants_csv(&path).is_err());
    }

    #[test]
    fn csv_export_is_numbered_in_generation_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let a = Participant::new("Alice", "alice@example.com");
        let b = Participant::new("Bob", "bob@example.com");
        let set = PairingSet::new(vec![
            Assignment::new(a.clone(), b.clone()),
            Assignment::new(b, a),
        ]);
        export_pairings_csv(&path, &set).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "gift,giver,giver_email,receiver,receiver_email");
        assert_eq!(lines[1], "1,Alice,alice@example.com,Bob,bob@example.com");
        assert_eq!(lines[2], "2,Bob,bob@example.com,Alice,alice@example.com");
    }

    #[test]
    fn json_export_keeps_generation_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let a = Participant::new("Alice", "alice@example.com").excluding(["Charlie"]);
        let b = Participant::new("Bob", "bob@example.com");
        let c = Participant::new("Charlie", "charlie@example.com");
        let set = PairingSet::new(vec![
            Assignment::new(a.clone(), b.clone()),
            Assignment::new(b, c.clone()),
            Assignment::new(c, a),
        ]);
        export_pairings_json(&path, &set).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let givers: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["giver"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(givers, ["Alice", "Bob", "Charlie"]);
        assert_eq!(value[0]["receiver"]["email"], "bob@example.com");
        assert_eq!(value[0]["giver"]["exclude"][0], "Charlie");

        let back: PairingSet = serde_json::from_str(&content).unwrap();
        assert_eq!(back, set);
    }
}
