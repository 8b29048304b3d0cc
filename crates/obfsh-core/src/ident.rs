//! ident.rs — Générateur d’identifiants shell.
//!
//! Un identifiant = préfixe fixe (`__` par défaut) + `len` caractères tirés
//! dans `[A-Za-z0-9]`. On retire tant que le candidat est déjà pris.
//! Pas d’aléa cryptographique : on cherche l’unicité, pas le secret.

use std::collections::HashSet;

use log::trace;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::{Error, Result};

/// Nombre maximal de collisions consécutives avant abandon.
pub const MAX_ATTEMPTS: usize = 4096;

pub const DEFAULT_PREFIX: &str = "__";
pub const DEFAULT_LEN: usize = 6;

/// Paramètres de génération (préfixe + longueur de la partie aléatoire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentGen {
    prefix: String,
    len: usize,
}

impl Default for IdentGen {
    fn default() -> Self {
        Self { prefix: DEFAULT_PREFIX.into(), len: DEFAULT_LEN }
    }
}

impl IdentGen {
    pub fn new(prefix: impl Into<String>, len: usize) -> Result<Self> {
        let prefix = prefix.into();
        if !is_shell_name(&prefix) {
            return Err(Error::InvalidConfig(format!("préfixe `{prefix}` : nom shell invalide")));
        }
        if len == 0 {
            return Err(Error::InvalidConfig("longueur d’identifiant nulle".into()));
        }
        Ok(Self { prefix, len })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn random_len(&self) -> usize {
        self.len
    }

    /// Un candidat, sans contrôle d’unicité.
    pub fn candidate<R: Rng>(&self, rng: &mut R) -> String {
        let mut s = String::with_capacity(self.prefix.len() + self.len);
        s.push_str(&self.prefix);
        s.extend((0..self.len).map(|_| char::from(rng.sample(Alphanumeric))));
        s
    }

    /// Identifiant absent de `used`. Échoue après `MAX_ATTEMPTS` collisions.
    pub fn fresh<R: Rng>(&self, rng: &mut R, used: &HashSet<String>) -> Result<String> {
        for attempt in 0..MAX_ATTEMPTS {
            let cand = self.candidate(rng);
            if !used.contains(&cand) {
                return Ok(cand);
            }
            trace!("collision d’identifiant `{cand}` (essai {})", attempt + 1);
        }
        Err(Error::IdentSpaceExhausted { attempts: MAX_ATTEMPTS })
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_shell_name(s: &str) -> bool {
    let mut it = s.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
