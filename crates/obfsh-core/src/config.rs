//! config.rs — Configuration de l’obfuscateur.
//!
//! - Defaults fidèles à l’outil d’origine (`ObfConfig::default()`)
//! - Construction fluide (`with_*`) pour la CLI et les tests
//! - `validate()` : préfixe et accumulateur doivent être des noms shell,
//!   la longueur aléatoire ≥ 1, le shebang commence par `#!`

use crate::alphabet::EscapeStyle;
use crate::ident::{is_shell_name, IdentGen, DEFAULT_LEN, DEFAULT_PREFIX};
use crate::{Error, Result};

pub const DEFAULT_SHEBANG: &str = "#!/system/bin/sh";
pub const DEFAULT_ACCUMULATOR: &str = "cmd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfConfig {
    /// Première ligne du script émis.
    pub shebang: String,
    /// Variable qui accumule le script reconstruit.
    pub accumulator: String,
    /// Préfixe des identifiants générés.
    pub ident_prefix: String,
    /// Longueur de la partie aléatoire des identifiants.
    pub ident_len: usize,
    /// Rendu des octets passés à `printf`.
    pub escape: EscapeStyle,
    /// Graine RNG ; `None` = entropie système.
    pub seed: Option<u64>,
}

impl Default for ObfConfig {
    fn default() -> Self {
        Self {
            shebang: DEFAULT_SHEBANG.into(),
            accumulator: DEFAULT_ACCUMULATOR.into(),
            ident_prefix: DEFAULT_PREFIX.into(),
            ident_len: DEFAULT_LEN,
            escape: EscapeStyle::Hex,
            seed: None,
        }
    }
}

impl ObfConfig {
    pub fn with_shebang(mut self, s: impl Into<String>) -> Self {
        self.shebang = s.into();
        self
    }

    pub fn with_escape(mut self, e: EscapeStyle) -> Self {
        self.escape = e;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_ident_len(mut self, n: usize) -> Self {
        self.ident_len = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.shebang.starts_with("#!") || self.shebang.contains('\n') {
            return Err(Error::InvalidConfig(format!("shebang `{}` : doit commencer par `#!` sur une ligne", self.shebang)));
        }
        if !is_shell_name(&self.accumulator) {
            return Err(Error::InvalidConfig(format!("accumulateur `{}` : nom shell invalide", self.accumulator)));
        }
        self.ident_gen().map(|_| ())
    }

    /// Générateur d’identifiants correspondant.
    pub fn ident_gen(&self) -> Result<IdentGen> {
        IdentGen::new(self.ident_prefix.clone(), self.ident_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = ObfConfig::default();
        c.validate().unwrap();
        assert_eq!(c.shebang, "#!/system/bin/sh");
        assert_eq!(c.accumulator, "cmd");
        assert_eq!(c.escape, EscapeStyle::Hex);
    }

    #[test]
    fn builders_set_their_field_only() {
        let c = ObfConfig::default()
            .with_shebang("#!/bin/bash")
            .with_escape(EscapeStyle::Octal)
            .with_seed(3)
            .with_ident_len(8);
        assert_eq!(c.shebang, "#!/bin/bash");
        assert_eq!(c.escape, EscapeStyle::Octal);
        assert_eq!(c.seed, Some(3));
        assert_eq!(c.ident_len, 8);
        assert_eq!(c.accumulator, DEFAULT_ACCUMULATOR);
        assert_eq!(c.ident_prefix, DEFAULT_PREFIX);
        c.validate().unwrap();
    }

    #[test]
    fn rejects_inconsistent_settings() {
        assert!(ObfConfig::default().with_shebang("/bin/sh").validate().is_err());
        assert!(ObfConfig::default().with_shebang("#!/bin/sh\necho").validate().is_err());
        assert!(ObfConfig::default().with_ident_len(0).validate().is_err());
        let mut c = ObfConfig::default();
        c.accumulator = "2cmd".into();
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }
}
