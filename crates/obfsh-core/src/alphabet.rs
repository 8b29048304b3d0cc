//! alphabet.rs — Alphabet du script, table caractère → identifiant, définitions.
//!
//! Pour chaque caractère distinct `c` :
//!   1. encodage UTF-8 de `c`,
//!   2. rendu octet par octet (`\xHH` ou `\ooo`),
//!   3. définition `<ident>=$(printf '<octets échappés>')`.
//!
//! Une fois les définitions exécutées, `${ident}` contient exactement les
//! octets UTF-8 de `c` (sauf `\n`, mangé par la substitution de commande ;
//! il n’est jamais référencé puisque les lignes sont découpées dessus).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use log::debug;
use rand::Rng;

use crate::ident::IdentGen;
use crate::report::Reporter;
use crate::Result;

/// Style d’échappement des octets passés à `printf`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeStyle {
    /// `\xHH` (bash, mksh, zsh, busybox)
    #[default]
    Hex,
    /// `\ooo` — seule forme exigée par POSIX pour `printf`
    Octal,
}

/// Caractères distincts du texte, triés par point de code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    pub fn of(text: &str) -> Self {
        let set: BTreeSet<char> = text.chars().collect();
        Self { chars: set.into_iter().collect() }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Octets UTF-8 de `c`, échappés pour le format de `printf`.
pub fn escape_char(c: char, style: EscapeStyle) -> String {
    let mut buf = [0u8; 4];
    let bytes = c.encode_utf8(&mut buf).as_bytes();
    bytes
        .iter()
        .map(|b| match style {
            EscapeStyle::Hex => format!("\\x{b:02x}"),
            EscapeStyle::Octal => format!("\\{b:03o}"),
        })
        .collect()
}

/// `<ident>=$(printf '<escaped>')`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub ch: char,
    pub ident: String,
    pub escaped: String,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=$(printf '{}')", self.ident, self.escaped)
    }
}

/// Table bijective caractère → identifiant, dans l’ordre de l’alphabet.
#[derive(Debug, Clone, Default)]
pub struct VarMap {
    order: Vec<(char, String)>,
    index: HashMap<char, usize>,
}

impl VarMap {
    /// Attribue un identifiant neuf à chaque caractère. Les noms de `reserved`
    /// (l’accumulateur) ne sont jamais attribués.
    pub fn build<R: Rng>(
        alphabet: &Alphabet,
        ids: &IdentGen,
        rng: &mut R,
        reserved: &[&str],
        reporter: &mut dyn Reporter,
    ) -> Result<Self> {
        let total = alphabet.len();
        let mut used: HashSet<String> = reserved.iter().map(|s| (*s).to_string()).collect();
        let mut map = Self { order: Vec::with_capacity(total), index: HashMap::with_capacity(total) };

        for (i, &c) in alphabet.chars().iter().enumerate() {
            let ident = ids.fresh(rng, &used)?;
            used.insert(ident.clone());
            map.index.insert(c, map.order.len());
            map.order.push((c, ident));
            if (i + 1) % 10 == 0 || i + 1 == total {
                reporter.progress("variables", i + 1, total);
            }
        }
        debug!("table de variables: {} entrées", map.len());
        Ok(map)
    }

    pub fn get(&self, c: char) -> Option<&str> {
        self.index.get(&c).map(|&i| self.order[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.order.iter().map(|(c, id)| (*c, id.as_str()))
    }

    /// Une définition par caractère, dans l’ordre de l’alphabet.
    pub fn definitions(&self, style: EscapeStyle) -> Vec<Definition> {
        self.iter()
            .map(|(ch, ident)| Definition { ch, ident: ident.to_string(), escaped: escape_char(ch, style) })
            .collect()
    }
}
