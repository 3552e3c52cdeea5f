use crate::model::PairingSet;
use std::io::{self, Write};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const BANNER: &str = "🎄 ═══════════════════════════════════════════ 🎄";

/// Palette ANSI ; vide quand la couleur est désactivée.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub bold: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if color {
            Self {
                red: RED,
                green: GREEN,
                yellow: YELLOW,
                bold: BOLD,
                reset: RESET,
            }
        } else {
            Self {
                red: "",
                green: "",
                yellow: "",
                bold: "",
                reset: "",
            }
        }
    }
}

/// Affichage console des résultats d'un tirage.
#[derive(Debug, Clone, Copy)]
pub struct PairingPresenter {
    palette: Palette,
}

impl Default for PairingPresenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PairingPresenter {
    pub fn new(color: bool) -> Self {
        Self {
            palette: Palette::new(color),
        }
    }

    pub fn display<W: Write>(
        &self,
        out: &mut W,
        pairings: &PairingSet,
        attempts: u64,
    ) -> io::Result<()> {
        let c = self.palette;

        writeln!(out)?;
        writeln!(out, "{}{}{BANNER}{}", c.green, c.bold, c.reset)?;
        writeln!(
            out,
            "{}{}        Secret Santa Pairing Results!        {}",
            c.red, c.bold, c.reset
        )?;
        writeln!(out, "{}{}{BANNER}{}", c.green, c.bold, c.reset)?;
        writeln!(out)?;

        for (idx, a) in pairings.iter().enumerate() {
            writeln!(out, "{}{}Gift #{}:{}", c.yellow, c.bold, idx + 1, c.reset)?;
            writeln!(
                out,
                "  {}🎁 {}{} → {}{}{}",
                c.green,
                a.giver.name(),
                c.reset,
                c.red,
                a.receiver.name(),
                c.reset
            )?;
            writeln!(out)?;
        }

        writeln!(out, "{}{}{BANNER}{}", c.green, c.bold, c.reset)?;
        writeln!(
            out,
            "{}✨ Pairings generated in {attempts} attempt(s)! ✨{}",
            c.yellow, c.reset
        )?;
        writeln!(out, "{}{}{BANNER}{}", c.green, c.bold, c.reset)?;
        writeln!(out)?;
        Ok(())
    }
}
