//! Allele pairs — the two symbols carried at one locus.
//!
//! A pair is always validated against its locus alphabet and stored in
//! canonical order: higher [`Dominance`] first, ties broken lexicographically.
//! `"n/Cr"` and `"Cr/n"` therefore parse to the same value and render as
//! `"Cr/n"`.

use crate::loci::{AlleleSpec, Dominance, Locus};

/// Errors raised while parsing or building an allele pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleError {
    /// The string is not of the form `"X/Y"`.
    Malformed(String),
    /// A symbol is not in the locus alphabet.
    UnknownAllele { locus: Locus, symbol: String },
}

impl std::fmt::Display for AlleleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlleleError::Malformed(s) => write!(f, "malformed allele pair '{}'", s),
            AlleleError::UnknownAllele { locus, symbol } => {
                write!(f, "allele '{}' is not defined for {}", symbol, locus)
            }
        }
    }
}

impl std::error::Error for AlleleError {}

/// Two allele symbols at one locus, canonically ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllelePair {
    locus: Locus,
    first: AlleleSpec,
    second: AlleleSpec,
}

impl AllelePair {
    /// Build a pair from two symbols, validating and ordering them.
    pub fn new(locus: Locus, a: &str, b: &str) -> Result<Self, AlleleError> {
        let lookup = |symbol: &str| {
            locus.allele(symbol).ok_or_else(|| AlleleError::UnknownAllele {
                locus,
                symbol: symbol.to_string(),
            })
        };
        let a = lookup(a.trim())?;
        let b = lookup(b.trim())?;
        Ok(Self::from_specs(locus, a, b))
    }

    /// Parse `"X/Y"` for the given locus.
    pub fn parse(locus: Locus, s: &str) -> Result<Self, AlleleError> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) if !a.trim().is_empty() && !b.trim().is_empty() => {
                Self::new(locus, a, b)
            }
            _ => Err(AlleleError::Malformed(s.to_string())),
        }
    }

    /// Homozygous wild-type pair for a locus (`e/e`, `n/n`, `rn/rn`, ...).
    pub fn wild_type(locus: Locus) -> Self {
        let wt = locus.wild_type();
        let spec = locus.allele(wt).unwrap_or(AlleleSpec {
            symbol: "n",
            dominance: Dominance::Recessive,
        });
        Self::from_specs(locus, spec, spec)
    }

    fn from_specs(locus: Locus, a: AlleleSpec, b: AlleleSpec) -> Self {
        if comes_first(&a, &b) {
            Self { locus, first: a, second: b }
        } else {
            Self { locus, first: b, second: a }
        }
    }

    pub fn locus(&self) -> Locus {
        self.locus
    }

    pub fn first(&self) -> &'static str {
        self.first.symbol
    }

    pub fn second(&self) -> &'static str {
        self.second.symbol
    }

    /// Both symbols, in canonical order.
    pub fn symbols(&self) -> [&'static str; 2] {
        [self.first.symbol, self.second.symbol]
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.first.symbol == symbol || self.second.symbol == symbol
    }

    /// Number of copies of `symbol` (0, 1 or 2).
    pub fn count(&self, symbol: &str) -> usize {
        self.symbols().iter().filter(|s| **s == symbol).count()
    }

    pub fn is_homozygous(&self) -> bool {
        self.first.symbol == self.second.symbol
    }

    pub fn is_homozygous_recessive(&self) -> bool {
        self.is_homozygous() && self.first.dominance == Dominance::Recessive
    }

    /// Whether any symbol differs from the locus wild type.
    pub fn carries_variant(&self) -> bool {
        let wt = self.locus.wild_type();
        self.symbols().iter().any(|s| *s != wt)
    }
}

/// Canonical ordering: higher dominance first, then lexicographic.
fn comes_first(a: &AlleleSpec, b: &AlleleSpec) -> bool {
    match a.dominance.cmp(&b.dominance) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => a.symbol <= b.symbol,
    }
}

impl std::fmt::Display for AllelePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.first.symbol, self.second.symbol)
    }
}

/// Parse a list of pair strings, dropping (and logging) any that fail.
pub fn parse_pair_list(locus: Locus, entries: &[String], table: &str) -> Vec<AllelePair> {
    entries
        .iter()
        .filter_map(|s| match AllelePair::parse(locus, s) {
            Ok(pair) => Some(pair),
            Err(e) => {
                log::warn!("Ignoring {} entry for {}: {}", table, locus, e);
                None
            }
        })
        .collect()
}
