//! pipeline.rs — Orchestrateur : entrée → chemin de sortie → programme écrit.
//!
//! Étapes : vérif de l’entrée, résolution du nom de sortie (avec
//! confirmations), lecture + normalisation, alphabet, table de variables,
//! émission, écriture en un bloc.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::alphabet::{Alphabet, VarMap};
use crate::config::ObfConfig;
use crate::emit::{Emitter, Program};
use crate::ident::IdentGen;
use crate::naming::{resolve_output, Resolution};
use crate::report::{Confirm, Reporter};
use crate::source::Source;
use crate::{Error, Result};

/// Résumé d’un run réussi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Taille de l’alphabet (= nombre de définitions).
    pub alphabet: usize,
    pub lines: usize,
    /// Octets écrits.
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written { output: Utf8PathBuf, overwrite: bool, stats: Stats },
    /// Refus de l’utilisateur : rien n’a été écrit.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Obfuscator {
    cfg: ObfConfig,
    ids: IdentGen,
}

impl Obfuscator {
    pub fn new(cfg: ObfConfig) -> Result<Self> {
        cfg.validate()?;
        let ids = cfg.ident_gen()?;
        Ok(Self { cfg, ids })
    }

    pub fn config(&self) -> &ObfConfig {
        &self.cfg
    }

    fn rng(&self) -> StdRng {
        match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Transformation pure, sans I/O.
    pub fn obfuscate_str(&self, text: &str, reporter: &mut dyn Reporter) -> Result<Program> {
        self.obfuscate(&Source::from_text(text), reporter)
    }

    pub fn obfuscate(&self, source: &Source, reporter: &mut dyn Reporter) -> Result<Program> {
        let alphabet = Alphabet::of(source.text());
        reporter.info(&format!("construction de la table de variables : {} caractères", alphabet.len()));
        let mut rng = self.rng();
        let map = VarMap::build(&alphabet, &self.ids, &mut rng, &[self.cfg.accumulator.as_str()], reporter)?;
        let defs = map.definitions(self.cfg.escape);

        reporter.info(&format!("assemblage des lignes : {} lignes", source.line_count()));
        Emitter::new(&self.cfg).emit(source, &map, &defs, reporter)
    }

    /// Run complet avec l’horloge système.
    pub fn run(&self, input: &Utf8Path, confirm: &mut dyn Confirm, reporter: &mut dyn Reporter) -> Result<Outcome> {
        self.run_with_clock(input, confirm, reporter, unix_now)
    }

    /// Comme `run`, horloge injectée (secondes depuis l’epoch).
    pub fn run_with_clock(
        &self,
        input: &Utf8Path,
        confirm: &mut dyn Confirm,
        reporter: &mut dyn Reporter,
        now: impl Fn() -> u64,
    ) -> Result<Outcome> {
        if !input.is_file() {
            return Err(Error::MissingInput(input.to_owned()));
        }

        let (output, overwrite) = match resolve_output(input, confirm, reporter, |p| p.exists(), now) {
            Resolution::Proceed { path, overwrite } => (path, overwrite),
            Resolution::Cancelled => return Ok(Outcome::Cancelled),
        };

        let source = Source::read(input)?;
        let program = self.obfuscate(&source, reporter)?;
        let text = program.text();
        fs::write(&output, &text).map_err(|source| Error::Io { path: output.clone(), source })?;
        reporter.info(&format!("fichier de sortie écrit : {output}"));
        info!("{input} → {output} ({} octets)", text.len());

        let stats = Stats { alphabet: program.definitions, lines: program.lines, bytes: text.len() };
        debug!("{stats:?}");
        Ok(Outcome::Written { output, overwrite, stats })
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
