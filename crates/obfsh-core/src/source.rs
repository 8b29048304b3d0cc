//! source.rs — Chargement et normalisation du script d’entrée.
//!
//! Tous les `\r` sont retirés (CRLF → LF, CR isolés compris), puis le texte
//! est découpé sur `\n`. Un texte terminé par `\n` produit une dernière
//! ligne vide ; le texte vide produit une unique ligne vide.

use std::fs;

use camino::Utf8Path;
use log::debug;

use crate::{Error, Result};

/// Texte source normalisé + ses lignes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    text: String,
}

impl Source {
    /// Normalise un texte déjà en mémoire.
    pub fn from_text(raw: &str) -> Self {
        Self { text: raw.replace('\r', "") }
    }

    /// Lit un fichier entier (UTF-8 obligatoire) et le normalise.
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        let raw = String::from_utf8(bytes).map_err(|_| Error::Decode { path: path.to_owned() })?;
        let src = Self::from_text(&raw);
        debug!("source {path}: {} octets, {} lignes", src.text.len(), src.line_count());
        Ok(src)
    }

    /// Texte normalisé (sans `\r`).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lignes, dans l’ordre, séparateur `\n` exclu.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_and_lone_cr_are_stripped() {
        let s = Source::from_text("a\r\nb\rc\n");
        assert_eq!(s.text(), "a\nbc\n");
        assert_eq!(s.lines().collect::<Vec<_>>(), vec!["a", "bc", ""]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let s = Source::from_text("");
        assert_eq!(s.line_count(), 1);
        assert_eq!(s.lines().collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn line_count_matches_split() {
        for raw in ["echo hi\n", "x", "\n\n", "a\nb"] {
            let s = Source::from_text(raw);
            assert_eq!(s.line_count(), s.lines().count(), "{raw:?}");
        }
    }
}
