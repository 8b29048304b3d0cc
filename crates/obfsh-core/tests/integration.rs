//! tests/integration.rs — batteries d’intégration pour obfsh-core
//!
//! - run complet sur disque (tempfile) : nommage, collisions, contenu écrit
//! - round-trip réel via `sh` (ignoré si aucun `sh` dans le PATH)
//! - propriétés (proptest) : alphabet complet, identifiants uniques, lignes

use std::collections::HashSet;
use std::fs;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use indoc::indoc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use obfsh_core::ident::is_shell_name;
use obfsh_core::{
    Alphabet, EscapeStyle, IdentGen, Level, MemoryReporter, ObfConfig, Obfuscator, Outcome, Source, VarMap,
};

// -----------------------------------------------------------------------------
// Helpers de test
// -----------------------------------------------------------------------------

fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("tempdir UTF-8")
}

fn write(path: &Utf8Path, text: &str) {
    fs::write(path, text).expect("écriture fixture");
}

fn shell_available(shell: &str) -> bool {
    Command::new(shell).arg("-c").arg("true").status().map(|s| s.success()).unwrap_or(false)
}

fn sh_available() -> bool {
    shell_available("sh")
}

fn run_with(shell: &str, path: &Utf8Path) -> String {
    let out = Command::new(shell).arg(path.as_str()).output().expect(shell);
    assert!(out.status.success(), "{shell} a échoué: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout).expect("stdout UTF-8")
}

fn run_sh(path: &Utf8Path) -> String {
    run_with("sh", path)
}

fn sample_script() -> &'static str {
    indoc! {r#"
        #!/bin/sh
        # démo : quotes, substitutions, multi-octets
        name='wörld'
        printf '%s\n' "hello $name"
        x=$((6 * 7)); echo "x=$x"
        for i in 1 2 3; do
          printf '[%s]' "$i"
        done
        echo
        echo "back\\slash \`tick\` \$dollar"
    "#}
}

// -----------------------------------------------------------------------------
// Run complet
// -----------------------------------------------------------------------------

#[test]
fn run_writes_obf_sh_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("hello.sh");
    write(&input, "echo hi\n");

    let o = Obfuscator::new(ObfConfig::default().with_seed(7)).unwrap();
    let mut rep = MemoryReporter::default();
    let mut never = |_: &str| -> bool { panic!("aucune question attendue") };
    let outcome = o.run(&input, &mut never, &mut rep).unwrap();

    let Outcome::Written { output, overwrite, stats } = outcome else { panic!("attendu Written") };
    assert_eq!(output, root.join("hello.obf.sh"));
    assert!(!overwrite);
    assert_eq!(stats.alphabet, 7);
    assert_eq!(stats.lines, 2);

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(stats.bytes, text.len());
    assert!(text.starts_with("#!/system/bin/sh\n"));
    assert!(text.ends_with("eval \"$cmd\""));
    assert!(!text.contains("echo hi"));
    assert_eq!(fs::read_to_string(&input).unwrap(), "echo hi\n", "l’entrée ne doit pas bouger");
    assert_eq!(rep.count(Level::Warn), 0);
}

#[test]
fn declined_overwrite_falls_back_to_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("job.sh");
    let existing = root.join("job.obf.sh");
    write(&input, "true\n");
    write(&existing, "ne pas toucher");

    let o = Obfuscator::new(ObfConfig::default()).unwrap();
    let mut rep = MemoryReporter::default();
    let mut no = |_: &str| false;
    let outcome = o.run_with_clock(&input, &mut no, &mut rep, || 1_234).unwrap();

    let Outcome::Written { output, .. } = outcome else { panic!("attendu Written") };
    assert_eq!(output, root.join("job.obf.1234.sh"));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "ne pas toucher");
    assert!(rep.contains(Level::Warn, "existe déjà"));
}

#[test]
fn accepted_overwrite_replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("job.sh");
    let existing = root.join("job.obf.sh");
    write(&input, "true\n");
    write(&existing, "ancien");

    let o = Obfuscator::new(ObfConfig::default()).unwrap();
    let mut yes = |_: &str| true;
    let outcome = o.run(&input, &mut yes, &mut MemoryReporter::default()).unwrap();
    assert!(matches!(outcome, Outcome::Written { overwrite: true, .. }));
    assert!(fs::read_to_string(&existing).unwrap().contains("eval \"$cmd\""));
}

#[test]
fn non_sh_input_declined_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("notes.txt");
    write(&input, "echo x\n");

    let o = Obfuscator::new(ObfConfig::default()).unwrap();
    let mut rep = MemoryReporter::default();
    let mut no = |_: &str| false;
    assert_eq!(o.run(&input, &mut no, &mut rep).unwrap(), Outcome::Cancelled);
    assert!(!root.join("notes.txt.obf.sh").exists());
    assert_eq!(rep.count(Level::Warn), 2);
}

#[test]
fn non_utf8_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("bin.sh");
    fs::write(&input, [0xffu8, 0xfe, 0x00]).unwrap();

    let o = Obfuscator::new(ObfConfig::default()).unwrap();
    let mut yes = |_: &str| true;
    let err = o.run(&input, &mut yes, &mut MemoryReporter::default()).unwrap_err();
    assert!(matches!(err, obfsh_core::Error::Decode { .. }));
}

// -----------------------------------------------------------------------------
// Round-trip réel
// -----------------------------------------------------------------------------

#[test]
fn obfuscated_script_behaves_like_original() {
    if !sh_available() {
        eprintln!("(skip) pas de `sh` disponible");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("demo.sh");
    write(&input, sample_script());
    let expected = run_sh(&input);

    // \ooo : forme que tout printf POSIX comprend (dash compris)
    let cfg = ObfConfig::default().with_shebang("#!/bin/sh").with_escape(EscapeStyle::Octal);
    let o = Obfuscator::new(cfg).unwrap();
    let mut yes = |_: &str| true;
    let Outcome::Written { output, .. } = o.run(&input, &mut yes, &mut MemoryReporter::default()).unwrap() else {
        panic!("attendu Written")
    };

    assert_eq!(run_sh(&output), expected);
    assert_eq!(expected, "hello wörld\nx=42\n[1][2][3]\nback\\slash `tick` $dollar\n");
}

#[test]
fn crlf_script_runs_after_normalisation() {
    if !sh_available() {
        eprintln!("(skip) pas de `sh` disponible");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("dos.sh");
    write(&input, "echo one\r\necho two\r\n");

    let o = Obfuscator::new(ObfConfig::default().with_escape(EscapeStyle::Octal)).unwrap();
    let mut yes = |_: &str| true;
    let Outcome::Written { output, .. } = o.run(&input, &mut yes, &mut MemoryReporter::default()).unwrap() else {
        panic!("attendu Written")
    };
    assert_eq!(run_sh(&output), "one\ntwo\n");
}

#[test]
fn default_hex_output_behaves_like_original_under_bash() {
    if !shell_available("bash") {
        eprintln!("(skip) pas de `bash` disponible");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let input = root.join("hex.sh");
    // tabulation réelle dans la première chaîne
    write(
        &input,
        "printf '%s|%d\\n' \"a\tb\\tc\" 5; echo 'it''s' \"\\\\x\" é漢🙂 ; echo \"trail \"\necho 100%\n",
    );
    let expected = run_with("bash", &input);
    assert_eq!(expected, "a\tb\\tc|5\nits \\x é漢🙂\ntrail \n100%\n");

    let o = Obfuscator::new(ObfConfig::default().with_seed(11)).unwrap();
    assert_eq!(o.config().escape, EscapeStyle::Hex);
    let mut yes = |_: &str| true;
    let Outcome::Written { output, .. } = o.run(&input, &mut yes, &mut MemoryReporter::default()).unwrap() else {
        panic!("attendu Written")
    };

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("=$(printf '\\x25')"), "le `%` doit passer en \\xHH");
    assert_eq!(run_with("bash", &output), expected);
}

// -----------------------------------------------------------------------------
// Propriétés
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn every_char_gets_exactly_one_fresh_ident(text in "[a-zA-Z0-9 \\n\\r\\t$\"'`\\\\|;&(){}<>*?#~=%éß漢🙂-]{0,80}") {
        let src = Source::from_text(&text);
        let alphabet = Alphabet::of(src.text());
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(text.len() as u64);
        let map = VarMap::build(&alphabet, &IdentGen::default(), &mut rng, &["cmd"], &mut MemoryReporter::default()).unwrap();

        prop_assert_eq!(map.len(), alphabet.len());
        let idents: HashSet<&str> = map.iter().map(|(_, id)| id).collect();
        prop_assert_eq!(idents.len(), map.len());
        for c in src.text().chars() {
            let id = map.get(c);
            prop_assert!(id.is_some());
            prop_assert!(is_shell_name(id.unwrap()));
        }
        prop_assert!(!src.text().contains('\r'));
    }

    #[test]
    fn one_newline_append_per_line(text in "[a-c\\n\\r]{0,40}", seed in any::<u64>()) {
        let o = Obfuscator::new(ObfConfig::default().with_seed(seed)).unwrap();
        let prog = o.obfuscate_str(&text, &mut MemoryReporter::default()).unwrap();
        let lines = Source::from_text(&text).line_count();
        let newline_appends = prog.statements.iter().filter(|s| s.as_str() == "cmd=\"$cmd\n\"").count();
        prop_assert_eq!(newline_appends, lines);
        prop_assert_eq!(prog.statements.len(), 1 + prog.definitions + 1 + 2 * lines + 1);
    }
}
