//! obfsh-cli/src/lib.rs — CLI lib pour obfsh
//!
//! Usage :
//!   obfsh <script.sh>                      → script.obf.sh
//!   obfsh --escape octal --seed 42 x.sh    → sortie reproductible, printf POSIX
//!
//! Codes de sortie : 0 succès ou annulation volontaire, 1 sinon
//! (mauvais nombre d’arguments, fichier introuvable, erreur d’I/O).

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use yansi::Paint;

use obfsh_core::{
    AssumeYes, Confirm, ConsoleReporter, EscapeStyle, ObfConfig, Obfuscator, Outcome, Reporter, StdinConfirm,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EscapeChoice {
    /// `\xHH` (mksh Android, bash, busybox)
    Hex,
    /// `\ooo` (tout printf POSIX, dash compris)
    Octal,
}

impl From<EscapeChoice> for EscapeStyle {
    fn from(c: EscapeChoice) -> Self {
        match c {
            EscapeChoice::Hex => EscapeStyle::Hex,
            EscapeChoice::Octal => EscapeStyle::Octal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "obfsh", version, about = "Obfuscateur lexical de scripts shell (.sh -> .obf.sh)")]
pub struct Cli {
    /// Script shell à obfusquer (idéalement en .sh)
    pub input: PathBuf,

    /// Répond oui à toutes les confirmations
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Graine du générateur d’identifiants (sortie reproductible)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Première ligne du script émis
    #[arg(long, default_value = obfsh_core::config::DEFAULT_SHEBANG)]
    pub shebang: String,

    /// Rendu des octets passés à printf
    #[arg(long, value_enum, default_value_t = EscapeChoice::Hex)]
    pub escape: EscapeChoice,

    /// Longueur de la partie aléatoire des identifiants
    #[arg(long, default_value_t = obfsh_core::ident::DEFAULT_LEN)]
    pub ident_len: usize,

    /// Ne pas afficher la bannière
    #[arg(long)]
    pub no_banner: bool,

    /// Verbosité des logs (répéter pour plus de bruit)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> ObfConfig {
        let mut cfg = ObfConfig::default()
            .with_shebang(self.shebang.clone())
            .with_escape(self.escape.into())
            .with_ident_len(self.ident_len);
        if let Some(seed) = self.seed {
            cfg = cfg.with_seed(seed);
        }
        cfg
    }
}

const RULE_WIDTH: usize = 60;
pub const COPYRIGHT: &str = "Copyright (c) 2026 KensaijoCiallo";
pub const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner() -> String {
    let lines = [
        rule(),
        format!("obfsh {} — obfuscateur de scripts shell", env!("CARGO_PKG_VERSION")),
        COPYRIGHT.to_string(),
        "Licence : MIT".to_string(),
        format!("Dépôt : {REPOSITORY}"),
        rule(),
    ];
    let mut s = String::new();
    for l in lines {
        s.push_str(&l.cyan().to_string());
        s.push('\n');
    }
    s
}

pub fn usage() -> &'static str {
    "usage   : obfsh [OPTIONS] <script.sh>\n\
     exemple : obfsh test.sh\n\
     sortie  : test.obf.sh\n\
     \n\
     note : l’entrée devrait se terminer par .sh, sinon la sortie peut écraser un fichier existant !"
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG garde la main s’il est défini
    let _ = env_logger::Builder::new().filter_level(level).parse_default_env().try_init();
}

fn init_colors() {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        yansi::disable();
    }
}

/// Point d’entrée du binaire. Renvoie le code de sortie.
pub fn run<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    init_colors();
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().context("affichage de l’aide")?;
            return Ok(0);
        }
        Err(e) => {
            print!("{}", banner());
            println!();
            eprintln!("{}", e.render());
            println!("{}", usage());
            return Ok(1);
        }
    };
    init_logging(cli.verbose);

    if !cli.no_banner {
        print!("{}", banner());
        println!();
    }

    let obf = Obfuscator::new(cli.config()).context("configuration")?;
    let input = Utf8PathBuf::from_path_buf(cli.input.clone())
        .map_err(|p| anyhow!("chemin non UTF-8 : {}", p.display()))?;

    let mut reporter = ConsoleReporter::new();
    if !std::io::stdout().is_terminal() {
        reporter = reporter.without_progress();
    }
    let mut confirm: Box<dyn Confirm> = if cli.yes { Box::new(AssumeYes) } else { Box::new(StdinConfirm::stdin()) };

    match obf.run(&input, &mut *confirm, &mut reporter) {
        Ok(Outcome::Written { output, stats, .. }) => {
            reporter.info(&format!(
                "obfuscation terminée ({} caractères, {} lignes) ! test :",
                stats.alphabet, stats.lines
            ));
            println!("\n  sh '{output}'\n");
            println!("{}", rule().cyan());
            println!("{} {output}", "sortie   :".cyan());
            println!("{} {input} (inchangé)", "original :".cyan());
            println!("{} {REPOSITORY}", "projet   :".cyan());
            println!("{}", rule().cyan());
            Ok(0)
        }
        Ok(Outcome::Cancelled) => Ok(0),
        Err(obfsh_core::Error::MissingInput(path)) => {
            reporter.fail(&format!("fichier introuvable : {path}"));
            Ok(1)
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("obfuscation de {input}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_defaults() {
        let cli = Cli::try_parse_from(["obfsh", "x.sh"]).unwrap();
        assert_eq!(cli.config(), ObfConfig::default());
        assert!(!cli.yes);
    }

    #[test]
    fn options_reach_the_config() {
        let cli = Cli::try_parse_from([
            "obfsh", "--escape", "octal", "--seed", "9", "--shebang", "#!/bin/sh", "--ident-len", "10", "-y", "x.sh",
        ])
        .unwrap();
        let cfg = cli.config();
        assert_eq!(cfg.escape, EscapeStyle::Octal);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.shebang, "#!/bin/sh");
        assert_eq!(cfg.ident_len, 10);
        assert!(cli.yes);
    }

    #[test]
    fn exactly_one_positional() {
        assert!(Cli::try_parse_from(["obfsh"]).is_err());
        assert!(Cli::try_parse_from(["obfsh", "a.sh", "b.sh"]).is_err());
    }

    #[test]
    fn bad_arity_exits_one() {
        assert_eq!(run(["obfsh"]).unwrap(), 1);
        assert_eq!(run(["obfsh", "a.sh", "b.sh"]).unwrap(), 1);
    }

    #[test]
    fn usage_mentions_output_naming() {
        assert!(usage().contains("test.obf.sh"));
        assert!(banner().contains("obfsh"));
    }

    #[test]
    fn banner_carries_attribution_and_repository() {
        let b = banner();
        assert!(b.contains(COPYRIGHT));
        assert!(b.contains("https://github.com/KensaijoCiallo/AndroidShellconfusePython"));
    }
}
