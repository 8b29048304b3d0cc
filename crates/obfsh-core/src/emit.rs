//! emit.rs — Assemblage du script obfusqué.
//!
//! Forme produite (une instruction par entrée, jointes par `\n`) :
//! ```text
//! #!/system/bin/sh
//! __Ab12Cd=$(printf '\x65')          ← une définition par caractère
//! ...
//! cmd=""
//! cmd="$cmd${__Ab12Cd}${__x9YzQw}"   ← contenu de la ligne 1
//! cmd="$cmd
//! "                                  ← vrai saut de ligne entre guillemets
//! ...
//! eval "$cmd"
//! ```
//! Pas de saut de ligne final, comme l’outil d’origine.

use std::fmt;

use log::debug;

use crate::alphabet::{Definition, VarMap};
use crate::config::ObfConfig;
use crate::report::Reporter;
use crate::source::Source;
use crate::{Error, Result};

/// Programme émis + quelques compteurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<String>,
    /// Nombre d’instructions `ident=$(printf …)`.
    pub definitions: usize,
    /// Nombre de lignes sources reconstruites.
    pub lines: usize,
}

impl Program {
    pub fn text(&self) -> String {
        self.statements.join("\n")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

pub struct Emitter<'a> {
    shebang: &'a str,
    acc: &'a str,
}

impl<'a> Emitter<'a> {
    pub fn new(cfg: &'a ObfConfig) -> Self {
        Self { shebang: &cfg.shebang, acc: &cfg.accumulator }
    }

    /// `cmd=""`
    pub fn init_statement(&self) -> String {
        format!("{}=\"\"", self.acc)
    }

    /// `cmd="$cmd${__a}${__b}…"`
    pub fn line_statement(&self, line: &str, map: &VarMap) -> Result<String> {
        let mut s = format!("{0}=\"${0}", self.acc);
        for c in line.chars() {
            let ident = map.get(c).ok_or(Error::Unmapped(c))?;
            s.push_str("${");
            s.push_str(ident);
            s.push('}');
        }
        s.push('"');
        Ok(s)
    }

    /// `cmd="$cmd⏎"` — le saut de ligne est littéral à l’intérieur des guillemets.
    pub fn newline_statement(&self) -> String {
        format!("{0}=\"${0}\n\"", self.acc)
    }

    /// `eval "$cmd"`
    pub fn eval_statement(&self) -> String {
        format!("eval \"${}\"", self.acc)
    }

    pub fn emit(
        &self,
        source: &Source,
        map: &VarMap,
        defs: &[Definition],
        reporter: &mut dyn Reporter,
    ) -> Result<Program> {
        let total = source.line_count();
        let mut statements = Vec::with_capacity(defs.len() + 2 * total + 3);
        statements.push(self.shebang.to_string());
        statements.extend(defs.iter().map(ToString::to_string));
        statements.push(self.init_statement());

        for (i, line) in source.lines().enumerate() {
            statements.push(self.line_statement(line, map)?);
            statements.push(self.newline_statement());
            if (i + 1) % 10 == 0 || i + 1 == total {
                reporter.progress("lignes", i + 1, total);
            }
        }
        statements.push(self.eval_statement());

        debug!("programme émis: {} instructions ({} définitions, {} lignes)", statements.len(), defs.len(), total);
        Ok(Program { statements, definitions: defs.len(), lines: total })
    }
}
