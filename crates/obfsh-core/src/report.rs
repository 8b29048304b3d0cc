//! report.rs — Rapport utilisateur et confirmations.
//!
//! Le moteur ne touche jamais la console directement : il passe par
//! `Reporter` (niveaux info / warn / fail + progression) et `Confirm`
//! (question oui/non). Les binaires branchent `ConsoleReporter` et
//! `StdinConfirm`, les tests `MemoryReporter` et une closure.

use std::io::{self, BufRead, Write};

use log::debug;
use yansi::Paint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Fail,
}

pub trait Reporter {
    fn report(&mut self, level: Level, msg: &str);

    /// Avancement d’une étape (`done` sur `total`). Ignoré par défaut.
    fn progress(&mut self, _stage: &str, _done: usize, _total: usize) {}

    fn info(&mut self, msg: &str) {
        self.report(Level::Info, msg);
    }
    fn warn(&mut self, msg: &str) {
        self.report(Level::Warn, msg);
    }
    fn fail(&mut self, msg: &str) {
        self.report(Level::Fail, msg);
    }
}

/* ───────────────────────────── Console ───────────────────────────── */

/// Sortie colorée sur stdout : `[√]` vert, `[!]` jaune, `[×]` rouge.
/// Les couleurs suivent l’état global de `yansi` (désactivable par le binaire).
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet_progress: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coupe les compteurs de progression (sortie non interactive).
    pub fn without_progress(mut self) -> Self {
        self.quiet_progress = true;
        self
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, msg: &str) {
        debug!("{level:?}: {msg}");
        let tag = match level {
            Level::Info => "[√]".green(),
            Level::Warn => "[!]".yellow(),
            Level::Fail => "[×]".red(),
        };
        println!("{tag} {msg}");
    }

    fn progress(&mut self, stage: &str, done: usize, total: usize) {
        if self.quiet_progress {
            return;
        }
        print!("  progression {stage} : {done}/{total}\r");
        if done >= total {
            println!();
        }
        let _ = io::stdout().flush();
    }
}

/* ───────────────────────────── Mémoire ───────────────────────────── */

/// Enregistre tout, pour les tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub messages: Vec<(Level, String)>,
    pub progress: Vec<(String, usize, usize)>,
}

impl MemoryReporter {
    pub fn count(&self, level: Level) -> usize {
        self.messages.iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages.iter().any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, level: Level, msg: &str) {
        self.messages.push((level, msg.to_string()));
    }

    fn progress(&mut self, stage: &str, done: usize, total: usize) {
        self.progress.push((stage.to_string(), done, total));
    }
}

/* ───────────────────────────── Confirmations ───────────────────────────── */

pub trait Confirm {
    /// `true` si l’utilisateur accepte. Le refus est la réponse par défaut.
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Répond oui à tout (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str) -> bool {
        debug!("confirmation implicite: {question}");
        true
    }
}

/// Pose la question sur `out` et lit une ligne sur `input`.
/// Seul `y`/`Y` accepte ; EOF ou erreur de lecture = refus.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    out: W,
}

pub type StdinConfirm = PromptConfirm<io::StdinLock<'static>, io::Stdout>;

impl StdinConfirm {
    pub fn stdin() -> Self {
        Self { input: io::stdin().lock(), out: io::stdout() }
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.out, "{question} (y/N): ");
        let _ = self.out.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => line.trim().eq_ignore_ascii_case("y"),
        }
    }
}
