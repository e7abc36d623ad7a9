//! Phenotype resolution — genotype + breed profile + age → display color,
//! shade, and markings.
//!
//! The cascade runs in a fixed order and later stages may override earlier
//! ones:
//!
//! 1. Base color, Mushroom, Cream, Dun, Champagne, Silver, Pearl, Sooty
//!    shade key ([`coat`])
//! 2. Shade selection ([`shade`])
//! 3. Cosmetic modifiers and Roan
//! 4. White spotting, Appaloosa, Gray ([`patterns`])
//! 5. Rabicano and residual primitive markings
//! 6. Final assembly
//! 7. Face and leg markings ([`markings`])
//!
//! Nothing here fails on malformed input; absent loci simply do not express.
//! The result is derived data and may change with age (Gray staging).

pub mod coat;
pub mod markings;
pub mod patterns;
pub mod shade;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genotype::Genotype;
use crate::loci::Locus;
use crate::profile::BreedGeneticProfile;

use self::coat::CoatState;
pub use self::markings::{BodyMarkings, LegMarkings, PhenotypicMarkings};

/// Name used when assembly produces nothing.
pub const UNDEFINED_PHENOTYPE: &str = "Undefined Phenotype";

/// Observable outcome of a genotype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeResult {
    pub final_display_color: String,
    pub phenotypic_markings: PhenotypicMarkings,
    pub determined_shade: String,
}

/// Display-name tokens grouped by position in the final name.
#[derive(Debug, Default)]
struct NameParts {
    sooty: bool,
    color: String,
    white: Vec<String>,
    appaloosa: Option<String>,
    cosmetic: Vec<String>,
    /// Replaces everything else when set (`White`, or a Gray stage).
    sole: Option<String>,
}

/// Resolve the phenotype of `genotype` at `age` years.
pub fn resolve_phenotype(
    genotype: &Genotype,
    profile: &BreedGeneticProfile,
    age: u32,
    rng: &mut impl Rng,
) -> PhenotypeResult {
    let coat = CoatState::from_genotype(genotype);
    let color = coat.color(&profile.pearl_name_overrides);

    let determined_shade =
        shade::select_shade(&profile.shade_bias, &color.shade_key, coat.base.name(), rng);

    let mut parts = NameParts {
        sooty: coat.sooty,
        ..Default::default()
    };

    parts.color = if coat.roan {
        shade::apply_shade(&coat.roan_name(), &determined_shade)
    } else {
        shade::apply_shade(&color.name, &determined_shade)
    };

    if coat.shows_flaxen() {
        parts.cosmetic.push("Flaxen".into());
    }
    if coat.shows_pangare() {
        parts.cosmetic.push("Pangare".into());
    }

    let mut body = BodyMarkings::default();
    let white = patterns::white_patterns(genotype);

    if white.full_white {
        parts.sole = Some("White".into());
    } else {
        parts.white = white.tokens;

        let appaloosa =
            patterns::appaloosa_pattern(genotype, age, &profile.advanced_markings_bias, rng);
        body.mottling = appaloosa.mottling;
        body.striping = appaloosa.striping;
        parts.appaloosa = appaloosa.name;

        if genotype.carries(Locus::Gray, "G") {
            parts.sole = Some(patterns::gray_stage(coat.gray_tone(), age));
            body.bloody_shoulder =
                patterns::roll_bloody_shoulder(&profile.advanced_markings_bias, rng);
        }
    }

    if parts.sole.is_none() {
        if coat.rabicano {
            parts.cosmetic.push("Rabicano".into());
        }
        if coat.primitive_markings {
            parts.cosmetic.push("Primitive Markings".into());
        }
    }

    let final_display_color = assemble(parts, coat.base.name());

    let (face, legs) = markings::roll_markings(&profile.marking_bias, rng);

    PhenotypeResult {
        final_display_color,
        phenotypic_markings: PhenotypicMarkings { face, legs, body },
        determined_shade,
    }
}

/// Join name parts: `[Sooty] [shade+color] [white patterns] [Appaloosa]
/// [cosmetic]`, deduplicated case-insensitively with repeated adjacent
/// words collapsed.
fn assemble(parts: NameParts, base_name: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    match parts.sole {
        Some(sole) => tokens.push(sole),
        None => {
            if parts.sooty {
                tokens.push("Sooty".into());
            }
            tokens.push(parts.color);
            tokens.extend(parts.white);
            tokens.extend(parts.appaloosa);
            tokens.extend(parts.cosmetic);
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.trim().to_string();
        if token.is_empty() || unique.iter().any(|t| t.eq_ignore_ascii_case(&token)) {
            continue;
        }
        unique.push(token);
    }

    let name = collapse_repeated_words(&unique.join(" "));
    if !name.is_empty() {
        name
    } else if !base_name.is_empty() {
        base_name.to_string()
    } else {
        UNDEFINED_PHENOTYPE.to_string()
    }
}

/// Collapse whitespace and drop a word that repeats the one before it
/// (`Pearl Pearl` → `Pearl`).
pub fn collapse_repeated_words(s: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in s.split_whitespace() {
        if words
            .last()
            .is_some_and(|prev| prev.eq_ignore_ascii_case(word))
        {
            continue;
        }
        words.push(word);
    }
    words.join(" ")
}
