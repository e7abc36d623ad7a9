//! Breed genetic profiles — per-breed allele frequencies, legality rules,
//! and cosmetic bias tables.
//!
//! Profiles are read-only reference data owned by the breed record. They are
//! loaded from JSON; every field defaults, so partial profiles are accepted.
//! Numeric values are read leniently (see [`crate::weighted`]) and checked
//! ahead of time by [`validate_profile`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::allele::{parse_pair_list, AllelePair};
use crate::loci::{Locus, Modifier};
use crate::weighted::{lenient_number, WeightTable};

/// Default number of legs that may carry a marking.
pub const DEFAULT_MAX_LEGS_MARKED: u8 = 4;

/// Per-breed genetic configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedGeneticProfile {
    /// Locus → allele-pair label → weight, used for generation.
    pub allele_weights: BTreeMap<Locus, WeightTable>,
    /// Locus → forbidden allele-pair strings.
    pub disallowed_combinations: BTreeMap<Locus, Vec<String>>,
    /// Locus → permitted allele-pair strings, used to constrain foals.
    pub allowed_alleles: BTreeMap<Locus, Vec<String>>,
    /// Modifier → probability in `0..=1`.
    pub boolean_modifiers_prevalence: BTreeMap<Modifier, Prevalence>,
    /// Color name or shade key → weighted shade names.
    pub shade_bias: BTreeMap<String, WeightTable>,
    pub marking_bias: MarkingBias,
    pub advanced_markings_bias: AdvancedMarkingsBias,
    /// Display-name rewrites applied to pearl colors, merged over the
    /// built-in table.
    pub pearl_name_overrides: BTreeMap<String, String>,
}

impl BreedGeneticProfile {
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Allowed pairs for a locus. `None` means the locus is unrestricted.
    pub fn allowed_pairs(&self, locus: Locus) -> Option<Vec<AllelePair>> {
        self.allowed_alleles
            .get(&locus)
            .filter(|list| !list.is_empty())
            .map(|list| parse_pair_list(locus, list, "allowed_alleles"))
    }

    pub fn disallowed_pairs(&self, locus: Locus) -> Vec<AllelePair> {
        self.disallowed_combinations
            .get(&locus)
            .map(|list| parse_pair_list(locus, list, "disallowed_combinations"))
            .unwrap_or_default()
    }

    pub fn is_disallowed(&self, pair: &AllelePair) -> bool {
        self.disallowed_pairs(pair.locus()).contains(pair)
    }

    /// Whether a pair passes both the allowed list (if any) and the
    /// disallowed list.
    pub fn permits(&self, pair: &AllelePair) -> bool {
        let allowed = self
            .allowed_pairs(pair.locus())
            .map_or(true, |list| list.contains(pair));
        allowed && !self.is_disallowed(pair)
    }

    /// Valid prevalence for a modifier, if the profile declares one.
    pub fn prevalence(&self, modifier: Modifier) -> Option<&Prevalence> {
        self.boolean_modifiers_prevalence.get(&modifier)
    }
}

/// Load a breed-name → profile map.
pub fn load_breed_profiles(json: &str) -> Result<BTreeMap<String, BreedGeneticProfile>, ProfileError> {
    Ok(serde_json::from_str(json)?)
}

/// Probability that a boolean modifier is set. Non-numeric values load as
/// invalid and behave as "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Prevalence(pub Option<f64>);

impl<'de> Deserialize<'de> for Prevalence {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        lenient_number(d).map(Prevalence)
    }
}

impl Prevalence {
    pub fn new(p: f64) -> Self {
        Self(Some(p))
    }

    /// The probability when it is a number in `0..=1`.
    pub fn probability(&self) -> Option<f64> {
        self.0.filter(|p| (0.0..=1.0).contains(p))
    }
}

/// Face and leg marking probabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkingBias {
    pub face: WeightTable,
    #[serde(deserialize_with = "lenient_number")]
    pub legs_general_probability: Option<f64>,
    pub leg_specific_probabilities: WeightTable,
    pub max_legs_marked: Option<u8>,
}

impl MarkingBias {
    pub fn max_legs(&self) -> u8 {
        self.max_legs_marked
            .unwrap_or(DEFAULT_MAX_LEGS_MARKED)
            .min(DEFAULT_MAX_LEGS_MARKED)
    }

    /// Per-leg probability, clamped to `0..=1`; invalid reads as zero.
    pub fn leg_probability(&self) -> f64 {
        self.legs_general_probability
            .filter(|p| p.is_finite())
            .map_or(0.0, |p| p.clamp(0.0, 1.0))
    }
}

/// Multipliers for rare cosmetic events. Missing or invalid values read as 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedMarkingsBias {
    #[serde(deserialize_with = "lenient_number")]
    pub bloody_shoulder_probability_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub snowflake_probability_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub frost_probability_multiplier: Option<f64>,
}

fn multiplier(value: Option<f64>) -> f64 {
    value.filter(|m| m.is_finite() && *m >= 0.0).unwrap_or(1.0)
}

impl AdvancedMarkingsBias {
    pub fn bloody_shoulder(&self) -> f64 {
        multiplier(self.bloody_shoulder_probability_multiplier)
    }

    pub fn snowflake(&self) -> f64 {
        multiplier(self.snowflake_probability_multiplier)
    }

    pub fn frost(&self) -> f64 {
        multiplier(self.frost_probability_multiplier)
    }
}

/// Fatal profile loading error.
#[derive(Debug)]
pub enum ProfileError {
    Parse(serde_json::Error),
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        ProfileError::Parse(e)
    }
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Parse(e) => write!(f, "Profile parse error: {}", e),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Non-fatal problem found by [`validate_profile`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileIssue {
    /// An allele-pair string that does not parse for its locus.
    InvalidAllele {
        locus: Locus,
        table: &'static str,
        entry: String,
    },
    /// A weight that is missing, negative, or non-numeric.
    InvalidWeight { table: String, label: String },
    /// A prevalence outside `0..=1` or non-numeric.
    InvalidPrevalence(Modifier),
    /// Every allowed pair is also disallowed; foals can never carry the locus.
    UnsatisfiableLocus(Locus),
    /// Every positive-weight pair is disallowed; generation always omits the locus.
    GenerationAlwaysOmits(Locus),
}

impl std::fmt::Display for ProfileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileIssue::InvalidAllele {
                locus,
                table,
                entry,
            } => write!(f, "{}: invalid pair '{}' in {}", locus, entry, table),
            ProfileIssue::InvalidWeight { table, label } => {
                write!(f, "{}: invalid weight for '{}'", table, label)
            }
            ProfileIssue::InvalidPrevalence(m) => {
                write!(f, "prevalence for '{}' is not a probability", m.name())
            }
            ProfileIssue::UnsatisfiableLocus(l) => {
                write!(f, "{}: every allowed pair is disallowed", l)
            }
            ProfileIssue::GenerationAlwaysOmits(l) => {
                write!(f, "{}: every weighted pair is disallowed", l)
            }
        }
    }
}

/// Check a profile for authoring mistakes, returning all issues found.
pub fn validate_profile(profile: &BreedGeneticProfile) -> Vec<ProfileIssue> {
    let mut issues = Vec::new();

    for (locus, table) in &profile.allele_weights {
        check_pairs(&mut issues, *locus, "allele_weights", table.labels());
    }
    for (locus, list) in &profile.allowed_alleles {
        check_pairs(&mut issues, *locus, "allowed_alleles", list.iter().map(String::as_str));
    }
    for (locus, list) in &profile.disallowed_combinations {
        check_pairs(
            &mut issues,
            *locus,
            "disallowed_combinations",
            list.iter().map(String::as_str),
        );
    }

    for (locus, table) in &profile.allele_weights {
        check_weights(&mut issues, format!("allele_weights.{}", locus), table);
    }
    for (key, table) in &profile.shade_bias {
        check_weights(&mut issues, format!("shade_bias.{}", key), table);
    }
    check_weights(&mut issues, "marking_bias.face".into(), &profile.marking_bias.face);
    check_weights(
        &mut issues,
        "marking_bias.leg_specific_probabilities".into(),
        &profile.marking_bias.leg_specific_probabilities,
    );

    for (modifier, prevalence) in &profile.boolean_modifiers_prevalence {
        if prevalence.probability().is_none() {
            issues.push(ProfileIssue::InvalidPrevalence(*modifier));
        }
    }

    for locus in Locus::ALL {
        if let Some(allowed) = profile.allowed_pairs(locus) {
            if allowed.iter().all(|p| profile.is_disallowed(p)) {
                issues.push(ProfileIssue::UnsatisfiableLocus(locus));
            }
        }
    }

    for (locus, table) in &profile.allele_weights {
        let mut positive = table
            .valid_entries()
            .filter(|(_, w)| *w > 0.0)
            .filter_map(|(label, _)| AllelePair::parse(*locus, label).ok())
            .peekable();
        if positive.peek().is_some() && positive.all(|p| profile.is_disallowed(&p)) {
            issues.push(ProfileIssue::GenerationAlwaysOmits(*locus));
        }
    }

    issues
}

fn check_pairs<'a>(
    issues: &mut Vec<ProfileIssue>,
    locus: Locus,
    table: &'static str,
    entries: impl Iterator<Item = &'a str>,
) {
    for entry in entries {
        if AllelePair::parse(locus, entry).is_err() {
            issues.push(ProfileIssue::InvalidAllele {
                locus,
                table,
                entry: entry.to_string(),
            });
        }
    }
}

fn check_weights(issues: &mut Vec<ProfileIssue>, table_name: String, table: &WeightTable) {
    for label in table.invalid_labels() {
        issues.push(ProfileIssue::InvalidWeight {
            table: table_name.clone(),
            label: label.to_string(),
        });
    }
}
