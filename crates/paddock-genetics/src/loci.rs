//! Locus and modifier definitions — the fixed gene positions the engine knows.
//!
//! Each locus carries its own allele alphabet with an explicit [`Dominance`]
//! rank per symbol. Canonical pair ordering and "homozygous recessive"
//! detection read these ranks instead of guessing from symbol spelling.

use serde::{Deserialize, Serialize};

/// Dominance rank of a single allele within its locus.
///
/// Ordered so that `Dominant > Incomplete > Recessive`; the higher-ranked
/// symbol of a pair is written first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dominance {
    Recessive,
    Incomplete,
    Dominant,
}

/// One allele symbol and its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlleleSpec {
    pub symbol: &'static str,
    pub dominance: Dominance,
}

const fn allele(symbol: &'static str, dominance: Dominance) -> AlleleSpec {
    AlleleSpec { symbol, dominance }
}

use Dominance::{Dominant, Incomplete, Recessive};

const EXTENSION: &[AlleleSpec] = &[allele("E", Dominant), allele("e", Recessive)];
const AGOUTI: &[AlleleSpec] = &[allele("A", Dominant), allele("a", Recessive)];
const CREAM: &[AlleleSpec] = &[allele("Cr", Incomplete), allele("n", Recessive)];
const DUN: &[AlleleSpec] = &[
    allele("D", Dominant),
    allele("nd1", Recessive),
    allele("nd2", Recessive),
];
const CHAMPAGNE: &[AlleleSpec] = &[allele("Ch", Dominant), allele("n", Recessive)];
const SILVER: &[AlleleSpec] = &[allele("Z", Dominant), allele("n", Recessive)];
const PEARL: &[AlleleSpec] = &[allele("prl", Recessive), allele("n", Recessive)];
const GRAY: &[AlleleSpec] = &[allele("G", Dominant), allele("g", Recessive)];
const DOMINANT_WHITE: &[AlleleSpec] = &[
    allele("W1", Dominant),
    allele("W2", Dominant),
    allele("W3", Dominant),
    allele("W4", Dominant),
    allele("W5", Dominant),
    allele("W10", Dominant),
    allele("W13", Dominant),
    allele("W15", Dominant),
    allele("W19", Dominant),
    allele("W20", Dominant),
    allele("W22", Dominant),
    allele("n", Recessive),
];
const TOBIANO: &[AlleleSpec] = &[allele("To", Dominant), allele("n", Recessive)];
const FRAME_OVERO: &[AlleleSpec] = &[allele("O", Dominant), allele("n", Recessive)];
const SABINO1: &[AlleleSpec] = &[allele("Sb1", Incomplete), allele("n", Recessive)];
const SPLASH_WHITE: &[AlleleSpec] = &[
    allele("SW1", Incomplete),
    allele("SW2", Dominant),
    allele("SW3", Dominant),
    allele("n", Recessive),
];
const EDEN_WHITE: &[AlleleSpec] = &[
    allele("EDXW1", Dominant),
    allele("EDXW2", Dominant),
    allele("EDXW3", Dominant),
    allele("n", Recessive),
];
const LEOPARD_COMPLEX: &[AlleleSpec] = &[allele("Lp", Incomplete), allele("lp", Recessive)];
const PATTERN1: &[AlleleSpec] = &[allele("PATN1", Incomplete), allele("patn1", Recessive)];
const MUSHROOM: &[AlleleSpec] = &[allele("mu", Recessive), allele("n", Recessive)];
const ROAN: &[AlleleSpec] = &[allele("Rn", Dominant), allele("rn", Recessive)];

/// The fixed set of gene loci. Declaration order is the iteration order of
/// every genotype map, so it also fixes the order of random draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Locus {
    #[serde(rename = "E_Extension")]
    Extension,
    #[serde(rename = "A_Agouti")]
    Agouti,
    #[serde(rename = "Cr_Cream")]
    Cream,
    #[serde(rename = "D_Dun")]
    Dun,
    #[serde(rename = "CH_Champagne")]
    Champagne,
    #[serde(rename = "Z_Silver")]
    Silver,
    #[serde(rename = "PRL_Pearl")]
    Pearl,
    #[serde(rename = "G_Gray")]
    Gray,
    #[serde(rename = "W_DominantWhite")]
    DominantWhite,
    #[serde(rename = "TO_Tobiano")]
    Tobiano,
    #[serde(rename = "O_FrameOvero")]
    FrameOvero,
    #[serde(rename = "SB1_Sabino1")]
    Sabino1,
    #[serde(rename = "SW_SplashWhite")]
    SplashWhite,
    #[serde(rename = "EDXW")]
    EdenWhite,
    #[serde(rename = "LP_LeopardComplex")]
    LeopardComplex,
    #[serde(rename = "PATN1_Pattern1")]
    Pattern1,
    #[serde(rename = "MFSD12_Mushroom")]
    Mushroom,
    #[serde(rename = "Rn_Roan")]
    Roan,
}

impl Locus {
    pub const ALL: [Locus; 18] = [
        Locus::Extension,
        Locus::Agouti,
        Locus::Cream,
        Locus::Dun,
        Locus::Champagne,
        Locus::Silver,
        Locus::Pearl,
        Locus::Gray,
        Locus::DominantWhite,
        Locus::Tobiano,
        Locus::FrameOvero,
        Locus::Sabino1,
        Locus::SplashWhite,
        Locus::EdenWhite,
        Locus::LeopardComplex,
        Locus::Pattern1,
        Locus::Mushroom,
        Locus::Roan,
    ];

    /// Wire name used in profiles and persisted genotypes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Extension => "E_Extension",
            Self::Agouti => "A_Agouti",
            Self::Cream => "Cr_Cream",
            Self::Dun => "D_Dun",
            Self::Champagne => "CH_Champagne",
            Self::Silver => "Z_Silver",
            Self::Pearl => "PRL_Pearl",
            Self::Gray => "G_Gray",
            Self::DominantWhite => "W_DominantWhite",
            Self::Tobiano => "TO_Tobiano",
            Self::FrameOvero => "O_FrameOvero",
            Self::Sabino1 => "SB1_Sabino1",
            Self::SplashWhite => "SW_SplashWhite",
            Self::EdenWhite => "EDXW",
            Self::LeopardComplex => "LP_LeopardComplex",
            Self::Pattern1 => "PATN1_Pattern1",
            Self::Mushroom => "MFSD12_Mushroom",
            Self::Roan => "Rn_Roan",
        }
    }

    pub fn from_name(name: &str) -> Option<Locus> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    /// Allele alphabet for this locus.
    pub fn alleles(self) -> &'static [AlleleSpec] {
        match self {
            Self::Extension => EXTENSION,
            Self::Agouti => AGOUTI,
            Self::Cream => CREAM,
            Self::Dun => DUN,
            Self::Champagne => CHAMPAGNE,
            Self::Silver => SILVER,
            Self::Pearl => PEARL,
            Self::Gray => GRAY,
            Self::DominantWhite => DOMINANT_WHITE,
            Self::Tobiano => TOBIANO,
            Self::FrameOvero => FRAME_OVERO,
            Self::Sabino1 => SABINO1,
            Self::SplashWhite => SPLASH_WHITE,
            Self::EdenWhite => EDEN_WHITE,
            Self::LeopardComplex => LEOPARD_COMPLEX,
            Self::Pattern1 => PATTERN1,
            Self::Mushroom => MUSHROOM,
            Self::Roan => ROAN,
        }
    }

    /// Look up a symbol in this locus's alphabet.
    pub fn allele(self, symbol: &str) -> Option<AlleleSpec> {
        self.alleles().iter().copied().find(|a| a.symbol == symbol)
    }

    /// The wild-type symbol: the last recessive entry of the alphabet
    /// (`n`, `e`, `a`, ...). Every alphabet ends with one.
    pub fn wild_type(self) -> &'static str {
        self.alleles()
            .iter()
            .rev()
            .find(|a| a.dominance == Dominance::Recessive)
            .map_or("n", |a| a.symbol)
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean coat modifiers carried alongside the loci.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Sooty,
    Flaxen,
    Pangare,
    Rabicano,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::Sooty,
        Modifier::Flaxen,
        Modifier::Pangare,
        Modifier::Rabicano,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sooty => "sooty",
            Self::Flaxen => "flaxen",
            Self::Pangare => "pangare",
            Self::Rabicano => "rabicano",
        }
    }

    pub fn from_name(name: &str) -> Option<Modifier> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}
