//! Coat state — the tagged intermediate form of a horse's base color and
//! dilutions.
//!
//! [`CoatState::from_genotype`] reads the genotype once; naming happens
//! afterwards from the structured state, so no stage has to guess what an
//! earlier stage did by inspecting a color string.

use std::collections::BTreeMap;

use crate::genotype::Genotype;
use crate::loci::{Locus, Modifier};

/// Pigment base set by Extension and Agouti.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseColor {
    Chestnut,
    Bay,
    Black,
}

impl BaseColor {
    pub fn name(self) -> &'static str {
        match self {
            Self::Chestnut => "Chestnut",
            Self::Bay => "Bay",
            Self::Black => "Black",
        }
    }

    /// Whether the coat expresses black pigment.
    pub fn expresses_black(self) -> bool {
        matches!(self, Self::Bay | Self::Black)
    }
}

/// Cream dose: zero, one, or two copies of `Cr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreamDose {
    None,
    Single,
    Double,
}

/// Pearl expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PearlStage {
    None,
    /// `prl/prl` without cream.
    Pearl,
    /// One `prl` with a single cream.
    PearlSingleCream,
    /// `prl/prl` with any cream.
    HomozygousPearlCream,
}

/// Pearl display names that read better than the generated form.
const PEARL_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Chestnut Pearl", "Apricot"),
    ("Mushroom Chestnut Pearl", "Apricot"),
    ("Red Dun Pearl", "Apricot Dun"),
];

/// Structured coat color, before shade, patterns, and Gray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoatState {
    pub base: BaseColor,
    pub mushroom: bool,
    pub cream: CreamDose,
    pub dun: bool,
    /// `nd1` without `D`: faint primitive markings.
    pub primitive_markings: bool,
    pub champagne: bool,
    pub silver: bool,
    pub pearl: PearlStage,
    pub sooty: bool,
    pub flaxen: bool,
    pub pangare: bool,
    pub rabicano: bool,
    pub roan: bool,
}

impl CoatState {
    pub fn from_genotype(genotype: &Genotype) -> Self {
        let base = if genotype.copies(Locus::Extension, "e") == 2 {
            BaseColor::Chestnut
        } else if genotype.carries(Locus::Agouti, "A") {
            BaseColor::Bay
        } else {
            BaseColor::Black
        };

        let mushroom = base == BaseColor::Chestnut && genotype.carries(Locus::Mushroom, "mu");

        let cream = match genotype.copies(Locus::Cream, "Cr") {
            0 => CreamDose::None,
            1 => CreamDose::Single,
            _ => CreamDose::Double,
        };

        let dun = genotype.carries(Locus::Dun, "D");
        let primitive_markings = !dun && genotype.carries(Locus::Dun, "nd1");
        let champagne = genotype.carries(Locus::Champagne, "Ch");
        let silver = base.expresses_black() && genotype.carries(Locus::Silver, "Z");

        let pearl = match (genotype.copies(Locus::Pearl, "prl"), cream) {
            (2, CreamDose::None) => PearlStage::Pearl,
            (2, _) => PearlStage::HomozygousPearlCream,
            (1, CreamDose::Single) => PearlStage::PearlSingleCream,
            _ => PearlStage::None,
        };

        CoatState {
            base,
            mushroom,
            cream,
            dun,
            primitive_markings,
            champagne,
            silver,
            pearl,
            sooty: genotype.has_modifier(Modifier::Sooty),
            flaxen: genotype.has_modifier(Modifier::Flaxen),
            pangare: genotype.has_modifier(Modifier::Pangare),
            rabicano: genotype.has_modifier(Modifier::Rabicano),
            roan: genotype.carries(Locus::Roan, "Rn"),
        }
    }

    /// Base plus Mushroom, before any dilution.
    fn base_name(&self) -> &'static str {
        if self.mushroom {
            "Mushroom Chestnut"
        } else {
            self.base.name()
        }
    }

    fn cream_name(&self) -> String {
        let name = match (self.cream, self.base) {
            (CreamDose::None, _) => self.base_name(),
            (CreamDose::Single, BaseColor::Chestnut) => "Palomino",
            (CreamDose::Single, BaseColor::Bay) => "Buckskin",
            (CreamDose::Single, BaseColor::Black) => "Smoky Black",
            (CreamDose::Double, BaseColor::Chestnut) => "Cremello",
            (CreamDose::Double, BaseColor::Bay) => "Perlino",
            (CreamDose::Double, BaseColor::Black) => "Smoky Cream",
        };
        name.to_string()
    }

    fn dun_name(&self) -> String {
        if !self.dun {
            return self.cream_name();
        }
        let name = match (self.cream, self.base) {
            (CreamDose::None | CreamDose::Single, BaseColor::Black) => "Grulla",
            (CreamDose::None, BaseColor::Bay) => "Bay Dun",
            (CreamDose::Single, BaseColor::Bay) => "Buckskin Dun",
            (CreamDose::None, BaseColor::Chestnut) => "Red Dun",
            (CreamDose::Single, BaseColor::Chestnut) => "Palomino Dun",
            (CreamDose::Double, _) => return format!("{} Dun", self.cream_name()),
        };
        name.to_string()
    }

    fn champagne_name(&self) -> String {
        let prefix = match self.base {
            BaseColor::Chestnut => "Gold",
            BaseColor::Bay => "Amber",
            BaseColor::Black => "Classic",
        };
        if self.mushroom {
            log::warn!(
                "No champagne name for Mushroom with cream {:?} dun {}; using {} Champagne",
                self.cream,
                self.dun,
                prefix
            );
            return format!("{} Champagne", prefix);
        }
        match (self.cream, self.dun) {
            (CreamDose::None, false) => format!("{} Champagne", prefix),
            (CreamDose::None, true) => format!("{} Dun Champagne", prefix),
            (CreamDose::Single, false) => format!("{} Cream Champagne", prefix),
            (CreamDose::Single, true) => format!("{} Cream Dun Champagne", prefix),
            (CreamDose::Double, false) => "Ivory Champagne".to_string(),
            (CreamDose::Double, true) => "Ivory Dun Champagne".to_string(),
        }
    }

    fn pearl_name(&self, name: String, overrides: &BTreeMap<String, String>) -> String {
        let generated = match self.pearl {
            PearlStage::None => return name,
            PearlStage::Pearl | PearlStage::PearlSingleCream => format!("{} Pearl", name),
            PearlStage::HomozygousPearlCream => format!("{} Pearl Cream", name),
        };
        if let Some(renamed) = overrides.get(&generated) {
            return renamed.clone();
        }
        PEARL_NAME_OVERRIDES
            .iter()
            .find(|(from, _)| *from == generated)
            .map_or(generated, |(_, to)| to.to_string())
    }

    /// Resolved base/dilution color and the key used for shade lookup.
    ///
    /// Applies Mushroom, Cream, Dun, Champagne, Silver, Pearl, then the
    /// Sooty shade-key prefix.
    pub fn color(&self, pearl_overrides: &BTreeMap<String, String>) -> ColorName {
        let diluted = if self.champagne {
            self.champagne_name()
        } else {
            self.dun_name()
        };

        let mut shade_key = diluted.clone();
        let silvered = if self.silver {
            if self.champagne {
                shade_key = format!("Silver {}", self.base.name());
            } else {
                shade_key = format!("Silver {}", diluted);
            }
            format!("Silver {}", diluted)
        } else {
            diluted
        };

        let name = self.pearl_name(silvered, pearl_overrides);
        if self.pearl != PearlStage::None && !self.silver {
            shade_key = name.clone();
        }
        if self.sooty {
            shade_key = format!("Sooty {}", shade_key);
        }

        ColorName { name, shade_key }
    }

    /// Roan category: red, bay, or blue by the pigment underneath.
    pub fn roan_category(&self) -> &'static str {
        match self.base {
            BaseColor::Chestnut => "Red",
            BaseColor::Bay => "Bay",
            BaseColor::Black => "Blue",
        }
    }

    /// Roan form of the color: `[Silver] <category> Roan` followed by the
    /// Dun, Champagne, and Pearl descriptors the category does not imply.
    pub fn roan_name(&self) -> String {
        let mut words = Vec::new();
        if self.silver {
            words.push("Silver");
        }
        words.push(self.roan_category());
        words.push("Roan");
        if self.dun {
            words.push("Dun");
        }
        if self.champagne {
            words.push("Champagne");
        }
        if self.pearl != PearlStage::None {
            words.push("Pearl");
        }
        words.join(" ")
    }

    /// Flaxen shows only on chestnut-derived coats that cream has not
    /// already lightened.
    pub fn shows_flaxen(&self) -> bool {
        self.flaxen && self.base == BaseColor::Chestnut && self.cream == CreamDose::None
    }

    /// Pangare needs red pigment and is lost under a double cream.
    pub fn shows_pangare(&self) -> bool {
        self.pangare && self.base != BaseColor::Black && self.cream != CreamDose::Double
    }

    /// Gray base tone: Steel over black/bay, Rose over chestnut, none over
    /// cream or champagne dilutions.
    pub fn gray_tone(&self) -> &'static str {
        if self.cream != CreamDose::None || self.champagne {
            return "";
        }
        match self.base {
            BaseColor::Black | BaseColor::Bay => "Steel",
            BaseColor::Chestnut => "Rose",
        }
    }
}

/// Display color and its shade lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorName {
    pub name: String,
    pub shade_key: String,
}
