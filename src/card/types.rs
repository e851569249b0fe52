use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mana colors in Magic: The Gathering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManaColor {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "C")]
    Colorless,
}

impl ManaColor {
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    /// Convert to the single character representation
    pub fn to_char(&self) -> char {
        match self {
            ManaColor::White => 'W',
            ManaColor::Blue => 'U',
            ManaColor::Black => 'B',
            ManaColor::Red => 'R',
            ManaColor::Green => 'G',
            ManaColor::Colorless => 'C',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(ManaColor::White),
            'U' => Some(ManaColor::Blue),
            'B' => Some(ManaColor::Black),
            'R' => Some(ManaColor::Red),
            'G' => Some(ManaColor::Green),
            'C' => Some(ManaColor::Colorless),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolParseError {
    #[error("Unknown mana symbol '{0}'")]
    UnknownSymbol(char),
    #[error("Unbalanced braces in '{0}'")]
    UnbalancedBraces(String),
    #[error("Generic amount '{0}' is too large")]
    GenericTooLarge(String),
    #[error("Empty source group at position {0}")]
    EmptyGroup(usize),
}

/// A single mana requirement: one colored (or colorless) pip, or one generic
/// pip that any source can pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbol {
    Color(ManaColor),
    Generic,
}

impl Symbol {
    /// Every symbol, colors first, generic last.
    pub const ALL: [Symbol; 7] = [
        Symbol::Color(ManaColor::White),
        Symbol::Color(ManaColor::Blue),
        Symbol::Color(ManaColor::Black),
        Symbol::Color(ManaColor::Red),
        Symbol::Color(ManaColor::Green),
        Symbol::Color(ManaColor::Colorless),
        Symbol::Generic,
    ];

    pub fn to_char(&self) -> char {
        match self {
            Symbol::Color(color) => color.to_char(),
            Symbol::Generic => '1',
        }
    }

    pub fn from_char(c: char) -> Result<Self, SymbolParseError> {
        if c == '1' {
            return Ok(Symbol::Generic);
        }
        ManaColor::from_char(c)
            .map(Symbol::Color)
            .ok_or(SymbolParseError::UnknownSymbol(c))
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Symbol::Generic)
    }
}

impl From<ManaColor> for Symbol {
    fn from(color: ManaColor) -> Self {
        Symbol::Color(color)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Symbol::from_char(c),
            (Some(c), Some(_)) => Err(SymbolParseError::UnknownSymbol(c)),
            (None, _) => Err(SymbolParseError::EmptyGroup(0)),
        }
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_char().to_string()
    }
}

/// The symbols a source can offer, as bitflags (no allocations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolSet(u8);

impl SymbolSet {
    pub const WHITE: u8 = 1 << 0;
    pub const BLUE: u8 = 1 << 1;
    pub const BLACK: u8 = 1 << 2;
    pub const RED: u8 = 1 << 3;
    pub const GREEN: u8 = 1 << 4;
    pub const COLORLESS: u8 = 1 << 5;
    pub const GENERIC: u8 = 1 << 6;

    pub fn new() -> Self {
        SymbolSet(0)
    }

    fn bit(symbol: Symbol) -> u8 {
        match symbol {
            Symbol::Color(ManaColor::White) => Self::WHITE,
            Symbol::Color(ManaColor::Blue) => Self::BLUE,
            Symbol::Color(ManaColor::Black) => Self::BLACK,
            Symbol::Color(ManaColor::Red) => Self::RED,
            Symbol::Color(ManaColor::Green) => Self::GREEN,
            Symbol::Color(ManaColor::Colorless) => Self::COLORLESS,
            Symbol::Generic => Self::GENERIC,
        }
    }

    #[inline]
    pub fn insert(&mut self, symbol: Symbol) {
        self.0 |= Self::bit(symbol);
    }

    #[inline]
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0 & Self::bit(symbol) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        Symbol::ALL.into_iter().filter(move |s| self.contains(*s))
    }

    /// Parse a group of symbol characters such as `"BR"` or `"1"`.
    pub fn parse(group: &str) -> Result<Self, SymbolParseError> {
        group
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Symbol::from_char)
            .collect()
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}

impl From<Vec<Symbol>> for SymbolSet {
    fn from(symbols: Vec<Symbol>) -> Self {
        symbols.into_iter().collect()
    }
}

impl From<SymbolSet> for Vec<Symbol> {
    fn from(set: SymbolSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.iter() {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Something that can be tapped for exactly one of the symbols it offers.
/// Sources are identified by their index in the slice handed to a solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub produces: SymbolSet,
}

impl ManaSource {
    pub fn new(produces: SymbolSet) -> Self {
        ManaSource {
            name: None,
            produces,
        }
    }

    pub fn named(name: impl Into<String>, produces: SymbolSet) -> Self {
        ManaSource {
            name: Some(name.into()),
            produces,
        }
    }

    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        ManaSource::new(symbols.iter().copied().collect())
    }

    /// Plain membership; the wildcard rules live in `castable::rules`.
    pub fn offers(&self, symbol: Symbol) -> bool {
        self.produces.contains(symbol)
    }
}

impl fmt::Display for ManaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {{{}}}", name, self.produces),
            None => write!(f, "{{{}}}", self.produces),
        }
    }
}

/// Parse comma separated symbol groups, one source per group: `"BR,R,B,W"`.
pub fn parse_sources(input: &str) -> Result<Vec<ManaSource>, SymbolParseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .enumerate()
        .map(|(idx, group)| {
            let produces = SymbolSet::parse(group)?;
            if produces.is_empty() {
                return Err(SymbolParseError::EmptyGroup(idx));
            }
            Ok(ManaSource::new(produces))
        })
        .collect()
}

/// Parse a cost into its ordered symbols.
///
/// Accepts bare (`"2WW"`, `"WRWRB"`) and braced (`"{2}{W}{W}"`) notation. A run
/// of digits is a generic amount, so `"11"` is eleven generic while `"{1}{1}"`
/// is two.
pub fn parse_cost(input: &str) -> Result<Vec<Symbol>, SymbolParseError> {
    let mut symbols = Vec::new();
    let mut digits = String::new();
    let mut open = false;

    let flush = |digits: &mut String, symbols: &mut Vec<Symbol>| -> Result<(), SymbolParseError> {
        if digits.is_empty() {
            return Ok(());
        }
        let amount: u16 = digits
            .parse()
            .map_err(|_| SymbolParseError::GenericTooLarge(digits.clone()))?;
        symbols.extend(std::iter::repeat(Symbol::Generic).take(amount as usize));
        digits.clear();
        Ok(())
    };

    for c in input.chars() {
        match c {
            '{' if !open => {
                flush(&mut digits, &mut symbols)?;
                open = true;
            }
            '}' if open => {
                flush(&mut digits, &mut symbols)?;
                open = false;
            }
            '{' | '}' => return Err(SymbolParseError::UnbalancedBraces(input.to_string())),
            c if c.is_ascii_digit() => digits.push(c),
            c if c.is_whitespace() => flush(&mut digits, &mut symbols)?,
            c => {
                flush(&mut digits, &mut symbols)?;
                let color = ManaColor::from_char(c).ok_or(SymbolParseError::UnknownSymbol(c))?;
                symbols.push(Symbol::Color(color));
            }
        }
    }

    if open {
        return Err(SymbolParseError::UnbalancedBraces(input.to_string()));
    }
    flush(&mut digits, &mut symbols)?;

    Ok(symbols)
}

/// Mana cost for a card, tallied per color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    #[serde(default)]
    pub white: u32,
    #[serde(default)]
    pub blue: u32,
    #[serde(default)]
    pub black: u32,
    #[serde(default)]
    pub red: u32,
    #[serde(default)]
    pub green: u32,
    #[serde(default)]
    pub colorless: u32,
    #[serde(default)]
    pub generic: u32,
}

impl ManaCost {
    pub fn total_value(&self) -> u32 {
        self.white + self.blue + self.black + self.red + self.green + self.colorless + self.generic
    }

    /// Expand into one symbol per pip: colors in WUBRGC order, then generic.
    pub fn to_symbols(&self) -> Vec<Symbol> {
        let tally = [
            (Symbol::Color(ManaColor::White), self.white),
            (Symbol::Color(ManaColor::Blue), self.blue),
            (Symbol::Color(ManaColor::Black), self.black),
            (Symbol::Color(ManaColor::Red), self.red),
            (Symbol::Color(ManaColor::Green), self.green),
            (Symbol::Color(ManaColor::Colorless), self.colorless),
            (Symbol::Generic, self.generic),
        ];

        tally
            .into_iter()
            .flat_map(|(symbol, amount)| std::iter::repeat(symbol).take(amount as usize))
            .collect()
    }
}

impl<'a> FromIterator<&'a Symbol> for ManaCost {
    fn from_iter<I: IntoIterator<Item = &'a Symbol>>(iter: I) -> Self {
        let mut cost = ManaCost::default();
        for symbol in iter {
            match symbol {
                Symbol::Color(ManaColor::White) => cost.white += 1,
                Symbol::Color(ManaColor::Blue) => cost.blue += 1,
                Symbol::Color(ManaColor::Black) => cost.black += 1,
                Symbol::Color(ManaColor::Red) => cost.red += 1,
                Symbol::Color(ManaColor::Green) => cost.green += 1,
                Symbol::Color(ManaColor::Colorless) => cost.colorless += 1,
                Symbol::Generic => cost.generic += 1,
            }
        }
        cost
    }
}
