//! obfsh-core — Moteur d’obfuscation lexicale pour scripts shell
//!
//! Chaque caractère distinct du script est lié à une variable shell générée
//! (`__Ab12Cd=$(printf '\x61')`), puis le corps est reconstruit par une suite
//! de concaténations dans un accumulateur, évalué en fin de programme.
//!
//! ## Modules
//! - `source`   : chargement + normalisation (`\r` retirés, découpe en lignes).
//! - `ident`    : génération d’identifiants uniques (`__` + 6 alphanumériques).
//! - `alphabet` : alphabet trié, table char → identifiant, définitions `printf`.
//! - `emit`     : assemblage du programme final (shebang, défs, appends, eval).
//! - `naming`   : chemin de sortie `.obf.sh` + résolution des collisions.
//! - `report`   : interface de rapport {info, warn, fail} et confirmation o/N.
//! - `config`   : `ObfConfig` (shebang, préfixe, longueur, style d’échappement…).
//! - `pipeline` : `Obfuscator`, l’orchestrateur fichier → fichier.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod alphabet;
pub mod config;
pub mod emit;
pub mod ident;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod source;

// ---------- Reexports de confort ----------
pub use alphabet::{Alphabet, Definition, EscapeStyle, VarMap};
pub use config::ObfConfig;
pub use emit::{Emitter, Program};
pub use ident::IdentGen;
pub use naming::{derive_output, fallback_output, resolve_output, Derived, Resolution};
pub use pipeline::{Obfuscator, Outcome, Stats};
pub use report::{AssumeYes, Confirm, ConsoleReporter, Level, MemoryReporter, Reporter, StdinConfirm};
pub use source::Source;

// ---------- Version ----------
/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("obfsh-core {}", VERSION)
}

// ---------- Erreurs & Résultat ----------
use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Le fichier d’entrée n’existe pas (ou n’est pas un fichier).
    #[error("fichier introuvable: {0}")]
    MissingInput(Utf8PathBuf),

    /// I/O sur un chemin précis (lecture de la source, écriture de la sortie).
    #[error("io {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// La source n’est pas du texte UTF-8.
    #[error("{path}: contenu non UTF-8")]
    Decode { path: Utf8PathBuf },

    /// Garde-fou du générateur d’identifiants.
    #[error("espace d’identifiants épuisé après {attempts} tentatives")]
    IdentSpaceExhausted { attempts: usize },

    /// Caractère de la source sans identifiant (table construite sur un autre texte).
    #[error("caractère {0:?} absent de la table de variables")]
    Unmapped(char),

    /// Configuration incohérente (préfixe, longueur, accumulateur…).
    #[error("configuration invalide: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
