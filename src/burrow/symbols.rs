//! Symbol table for letter codes, and flavour text for collected things

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Symbol table shipped with the game
const SHIPPED: &str = include_str!("../../assets/symbols.txt");

/// Letters that spell out a call for rescue
const RESCUE_LETTERS: &str = "HELP";

/// Immutable mapping from four-character letter codes to symbol names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<String, String>,
}

impl SymbolTable {
    /// Parse `name codes` lines, where `codes` is a run of four-character
    /// codes. Blank lines and `#` comments are skipped; bad lines are logged
    /// and skipped.
    pub fn parse(text: &str) -> Self {
        let mut symbols = HashMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, codes)) = line.rsplit_once(char::is_whitespace) else {
                log::warn!("Symbol line {}: missing codes in {:?}", n + 1, line);
                continue;
            };
            let chars: Vec<char> = codes.chars().collect();
            if chars.len() % 4 != 0 {
                log::warn!("Symbol line {}: code run {:?} is not a multiple of 4", n + 1, codes);
                continue;
            }
            for code in chars.chunks(4) {
                symbols.insert(code.iter().collect(), name.trim().to_owned());
            }
        }
        Self { symbols }
    }

    /// The table shipped with the game
    pub fn shipped() -> Self {
        let table = Self::parse(SHIPPED);
        log::info!("Loaded {} symbol codes", table.len());
        table
    }

    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.symbols.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

const NOT_USEFUL: &[&str] = &[
    "It doesn't look useful.",
    "Not much use here.",
    "Probably not much use.",
    "In other words, scrap.",
    "You can't think of a use for it.",
    "You don't see what good it would do here.",
];

const WASTEFUL: &[&str] = &[
    "A waste of metal.",
    "A waste of good material.",
    "Honestly, a waste of metal.",
];

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Either a "not useful" line or a "waste of metal" line
fn useless_or_wasteful(rng: &mut impl Rng) -> &'static str {
    let n = rng.random_range(0..NOT_USEFUL.len() + WASTEFUL.len());
    NOT_USEFUL.get(n).or_else(|| WASTEFUL.get(n - NOT_USEFUL.len())).copied().unwrap_or_default()
}

/// Flavour text for a freshly made thing with the given symbol
pub fn thing_message(symbol: Option<&str>, rng: &mut impl Rng) -> String {
    let Some(symbol) = symbol else {
        let adjective = pick(rng, &["a curious", "an odd", "a strange"]);
        return match rng.random_range(0..5) {
            0 => format!("That doesn't remind you of anything.\n{}", useless_or_wasteful(rng)),
            1 => format!("Is it... modern art?\n{}", useless_or_wasteful(rng)),
            2 => format!("Nothing you recognize.\n{}", useless_or_wasteful(rng)),
            3 => format!("That's {} piece of metal.\n{}", adjective, pick(rng, NOT_USEFUL)),
            _ => format!("That's {} lump of metal.\n{}", adjective, pick(rng, NOT_USEFUL)),
        };
    };

    let mut chars = symbol.chars();
    let single = match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    };

    match (symbol, single) {
        ("box", _) => format!("A roughly rectangular piece of metal.\n{}", pick(rng, NOT_USEFUL)),
        (".", _) => format!("A tiny bit of metal.\n{}", pick(rng, NOT_USEFUL)),
        ("hook", _) => pick(
            rng,
            &[
                "A hook!\nFishing might get easier.",
                "It's a fish hook!",
                "A hook!\nYou'll try it next time you fish.",
                "A metal fish hook!\nProbably no better than the ones you have.",
            ],
        )
        .to_owned(),
        (_, Some(c)) if c.is_ascii_uppercase() => {
            let kind = pick(rng, &["letter", "rune"]);
            let line = match rng.random_range(0..6) {
                0 => format!("That is the {kind} {c}!"),
                1 => format!("It's the {kind} {c}!"),
                2 => format!("A perfect {kind} {c}!"),
                3 => format!("A perfect {c}!"),
                4 => format!("You made the {kind} {c}!"),
                _ => format!("You made a {c}!"),
            };
            let remark = if RESCUE_LETTERS.contains(c) {
                pick(rng, &["That should get some attention!", "Display it!", "It will help!"])
            } else {
                let mut options = NOT_USEFUL.to_vec();
                options.push("That's not very interesting.");
                pick(rng, &options)
            };
            format!("{line}\n{remark}")
        }
        (_, Some(c)) if c.is_ascii_lowercase() => {
            let c = c.to_ascii_uppercase();
            let kind = pick(rng, &["letter", "rune"]);
            let line = match rng.random_range(0..4) {
                0 => format!("That resembles the {kind} {c}."),
                1 => format!("Looks a bit like the {kind} {c}."),
                2 => format!("Someone might read it as the {kind} {c}..."),
                _ => format!("It's similar to a {c}!"),
            };
            let remark = if RESCUE_LETTERS.contains(c) {
                pick(rng, &["That could get some attention.", "Try displaying it.", "It might help!"])
            } else {
                useless_or_wasteful(rng)
            };
            format!("{line}\n{remark}")
        }
        (_, Some(c)) => {
            let line = match rng.random_range(0..3) {
                0 => format!("That resembles the symbol {c}..."),
                1 => format!("Someone might read it as \"{c}\"."),
                _ => format!("It's a bit like a \"{c}\"."),
            };
            format!("{line}\n{}", useless_or_wasteful(rng))
        }
        (name, None) => {
            let line = match rng.random_range(0..3) {
                0 => format!("It's a {name}."),
                1 => format!("A {name}!"),
                _ => format!("It resembles a {name}."),
            };
            format!("{line}\n{}", pick(rng, NOT_USEFUL))
        }
    }
}
