//! naming.rs — Chemin de sortie et politique de collision.
//!
//! - `foo.sh`  → `foo.obf.sh`
//! - `foo.txt` → `foo.txt.obf.sh` (avertissement + confirmation)
//! - sortie déjà présente et écrasement refusé → `foo.obf.<timestamp>.sh`
//!
//! L’existence des fichiers et l’horloge sont injectées : la politique se
//! teste sans disque ni temps réel.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use crate::report::{Confirm, Reporter};

const SH: &str = ".sh";
const OBF_SH: &str = ".obf.sh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    pub path: Utf8PathBuf,
    /// L’entrée se terminait par `.sh`.
    pub had_sh_suffix: bool,
}

/// Remplace le `.sh` final par `.obf.sh`, ou ajoute `.obf.sh`.
pub fn derive_output(input: &Utf8Path) -> Derived {
    match input.as_str().strip_suffix(SH) {
        Some(stem) => Derived { path: format!("{stem}{OBF_SH}").into(), had_sh_suffix: true },
        None => Derived { path: format!("{input}{OBF_SH}").into(), had_sh_suffix: false },
    }
}

/// `<entrée sans dernière extension>.obf.<ts>.sh`
pub fn fallback_output(input: &Utf8Path, timestamp: u64) -> Utf8PathBuf {
    let base = input.with_extension("");
    format!("{base}.obf.{timestamp}{SH}").into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Écrire vers `path` (`overwrite` : le fichier existait et l’utilisateur a accepté).
    Proceed { path: Utf8PathBuf, overwrite: bool },
    /// L’utilisateur a refusé de traiter une entrée sans `.sh`.
    Cancelled,
}

/// Détermine la sortie : avertit, demande, ou se rabat sur un nom horodaté.
pub fn resolve_output(
    input: &Utf8Path,
    confirm: &mut dyn Confirm,
    reporter: &mut dyn Reporter,
    exists: impl Fn(&Utf8Path) -> bool,
    now: impl Fn() -> u64,
) -> Resolution {
    let derived = derive_output(input);

    if !derived.had_sh_suffix {
        reporter.warn(&format!("l’entrée « {input} » ne se termine pas par .sh"));
        reporter.warn("cela peut écraser le fichier d’origine ou produire un résultat inattendu");
        if !confirm.confirm("Continuer le traitement ?") {
            reporter.info("opération annulée");
            return Resolution::Cancelled;
        }
        reporter.warn("assurez-vous d’en comprendre les risques");
    }

    let path = derived.path;
    if !exists(&path) {
        debug!("sortie: {path}");
        return Resolution::Proceed { path, overwrite: false };
    }

    reporter.warn(&format!("le fichier de sortie existe déjà : {path}"));
    if confirm.confirm("Écraser ?") {
        return Resolution::Proceed { path, overwrite: true };
    }

    let mut ts = now();
    let mut alt = fallback_output(input, ts);
    while exists(&alt) {
        ts += 1;
        alt = fallback_output(input, ts);
    }
    reporter.info(&format!("nouveau nom de fichier : {alt}"));
    Resolution::Proceed { path: alt, overwrite: false }
}
