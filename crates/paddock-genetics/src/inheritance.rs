//! Inheritance — a foal's genotype from its sire, dam, and breed profile.
//!
//! Each locus takes one random allele from each parent, combined in
//! canonical dominance order, and must pass the foal breed's allowed and
//! disallowed lists. Failing combinations are re-drawn up to
//! [`MAX_INHERITANCE_ATTEMPTS`] times before falling back to a
//! profile-approved pair.

use std::collections::BTreeSet;

use rand::Rng;

use crate::allele::AllelePair;
use crate::generator::roll_modifier;
use crate::genotype::{Genotype, GenotypeBuilder};
use crate::loci::{Locus, Modifier};
use crate::profile::BreedGeneticProfile;
use crate::weighted::select_weighted;

/// Draws per locus before the fallback path.
pub const MAX_INHERITANCE_ATTEMPTS: usize = 10;

/// Missing inputs to inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceError {
    MissingSire,
    MissingDam,
    MissingProfile,
}

impl std::fmt::Display for InheritanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InheritanceError::MissingSire => write!(f, "Sire genotype is required for breeding"),
            InheritanceError::MissingDam => write!(f, "Dam genotype is required for breeding"),
            InheritanceError::MissingProfile => {
                write!(f, "Foal breed genetic profile is required for breeding")
            }
        }
    }
}

impl std::error::Error for InheritanceError {}

/// Compute a foal's genotype.
///
/// Loci come from the profile's `allowed_alleles` keys when it has any,
/// otherwise from the sire. A locus missing on either parent is drawn fresh
/// from the profile's `allele_weights`, or omitted if that is impossible.
pub fn inherit_genotype(
    sire: Option<&Genotype>,
    dam: Option<&Genotype>,
    profile: Option<&BreedGeneticProfile>,
    rng: &mut impl Rng,
) -> Result<Genotype, InheritanceError> {
    let sire = sire.ok_or(InheritanceError::MissingSire)?;
    let dam = dam.ok_or(InheritanceError::MissingDam)?;
    let profile = profile.ok_or(InheritanceError::MissingProfile)?;

    let loci: BTreeSet<Locus> = if profile.allowed_alleles.is_empty() {
        sire.loci().map(|(locus, _)| locus).collect()
    } else {
        profile.allowed_alleles.keys().copied().collect()
    };

    let mut builder = GenotypeBuilder::default();

    for locus in loci {
        let pair = match (sire.get(locus), dam.get(locus)) {
            (Some(s), Some(d)) => inherit_locus(locus, s, d, profile, rng),
            _ => synthesize_locus(locus, profile, rng),
        };
        if let Some(pair) = pair {
            builder.insert_pair(pair);
        }
    }

    for &modifier in profile.boolean_modifiers_prevalence.keys() {
        let value = inherit_modifier(
            modifier,
            sire.modifier(modifier),
            dam.modifier(modifier),
            profile,
            rng,
        );
        builder.insert_modifier(modifier, value);
    }

    Ok(builder.build())
}

/// Draw a pair for a locus one parent lacks.
fn synthesize_locus(
    locus: Locus,
    profile: &BreedGeneticProfile,
    rng: &mut impl Rng,
) -> Option<AllelePair> {
    let table = profile.allele_weights.get(&locus)?;
    let label = select_weighted(table, rng)?;
    match AllelePair::parse(locus, label) {
        Ok(pair) => Some(pair),
        Err(e) => {
            log::warn!("Cannot synthesize {} for foal: {}", locus, e);
            None
        }
    }
}

/// Mendelian draw with retries, then the profile fallback.
fn inherit_locus(
    locus: Locus,
    sire: &AllelePair,
    dam: &AllelePair,
    profile: &BreedGeneticProfile,
    rng: &mut impl Rng,
) -> Option<AllelePair> {
    let allowed = profile.allowed_pairs(locus);
    let disallowed = profile.disallowed_pairs(locus);
    let permitted = |pair: &AllelePair| {
        allowed.as_ref().map_or(true, |list| list.contains(pair)) && !disallowed.contains(pair)
    };

    for _ in 0..MAX_INHERITANCE_ATTEMPTS {
        let from_sire = pick_allele(sire, rng);
        let from_dam = pick_allele(dam, rng);
        match AllelePair::new(locus, from_sire, from_dam) {
            Ok(pair) if permitted(&pair) => return Some(pair),
            Ok(_) => {}
            Err(e) => log::warn!("Parent alleles for {} do not combine: {}", locus, e),
        }
    }

    let Some(fallback) = fallback_pair(locus, allowed.as_deref()) else {
        log::error!(
            "No permitted pair for {}: allowed_alleles lists no usable pair; locus omitted",
            locus
        );
        return None;
    };
    if disallowed.contains(&fallback) {
        log::error!(
            "No permitted pair for {}: fallback {} is disallowed by the breed profile; locus omitted",
            locus,
            fallback
        );
        return None;
    }
    log::debug!(
        "{} exhausted {} attempts; using fallback {}",
        locus,
        MAX_INHERITANCE_ATTEMPTS,
        fallback
    );
    Some(fallback)
}

/// Preferred fallback: the wild-type homozygote, then any homozygous
/// recessive pair, then the first allowed pair. `None` when the locus is
/// restricted to a list with no usable pairs.
fn fallback_pair(locus: Locus, allowed: Option<&[AllelePair]>) -> Option<AllelePair> {
    let wild = AllelePair::wild_type(locus);
    let Some(allowed) = allowed else {
        return Some(wild);
    };
    if allowed.contains(&wild) {
        return Some(wild);
    }
    allowed
        .iter()
        .find(|p| p.is_homozygous_recessive())
        .or_else(|| allowed.first())
        .copied()
}

fn pick_allele(pair: &AllelePair, rng: &mut impl Rng) -> &'static str {
    if rng.gen_bool(0.5) {
        pair.first()
    } else {
        pair.second()
    }
}

/// Inherit one boolean modifier.
///
/// Agreeing parents pass their value on. Disagreeing parents, or a single
/// known parent, give a coin flip between the parent's value and a fresh
/// prevalence roll.
fn inherit_modifier(
    modifier: Modifier,
    sire: Option<bool>,
    dam: Option<bool>,
    profile: &BreedGeneticProfile,
    rng: &mut impl Rng,
) -> bool {
    match (sire, dam) {
        (Some(a), Some(b)) if a == b => a,
        (Some(_), Some(_)) => rng.gen_bool(0.5) || fresh_roll(modifier, profile, rng),
        (Some(v), None) | (None, Some(v)) => {
            if rng.gen_bool(0.5) {
                v
            } else {
                fresh_roll(modifier, profile, rng)
            }
        }
        (None, None) => fresh_roll(modifier, profile, rng),
    }
}

fn fresh_roll(modifier: Modifier, profile: &BreedGeneticProfile, rng: &mut impl Rng) -> bool {
    profile
        .prevalence(modifier)
        .map_or(false, |p| roll_modifier(modifier, p, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Prevalence;
    use crate::weighted::WeightTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn g(pairs: &[(Locus, &str)]) -> Genotype {
        Genotype::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_missing_inputs_fail_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = BreedGeneticProfile::default();
        let x = Genotype::default();
        assert_eq!(
            inherit_genotype(None, Some(&x), Some(&p), &mut rng),
            Err(InheritanceError::MissingSire)
        );
        assert_eq!(
            inherit_genotype(Some(&x), None, Some(&p), &mut rng),
            Err(InheritanceError::MissingDam)
        );
        assert_eq!(
            inherit_genotype(Some(&x), Some(&x), None, &mut rng),
            Err(InheritanceError::MissingProfile)
        );
    }

    #[test]
    fn test_homozygous_parents_breed_true() {
        let mut p = BreedGeneticProfile::default();
        p.allowed_alleles.insert(
            Locus::Dun,
            vec!["D/D".into(), "D/nd1".into(), "nd1/nd1".into()],
        );
        let sire = g(&[(Locus::Dun, "D/D")]);
        let dam = g(&[(Locus::Dun, "D/D")]);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let foal = inherit_genotype(Some(&sire), Some(&dam), Some(&p), &mut rng).unwrap();
            assert_eq!(foal.get(Locus::Dun).unwrap().to_string(), "D/D");
        }
    }

    #[test]
    fn test_loci_default_to_sire_when_unrestricted() {
        let sire = g(&[(Locus::Extension, "E/E"), (Locus::Agouti, "A/A")]);
        let dam = g(&[(Locus::Extension, "e/e"), (Locus::Gray, "G/G")]);
        let mut rng = StdRng::seed_from_u64(3);
        let foal = inherit_genotype(
            Some(&sire),
            Some(&dam),
            Some(&BreedGeneticProfile::default()),
            &mut rng,
        )
        .unwrap();
        assert_eq!(foal.get(Locus::Extension).unwrap().to_string(), "E/e");
        // Dam lacks Agouti and the profile has no weights for it
        assert!(!foal.has_locus(Locus::Agouti));
        // Gray is not on the sire
        assert!(!foal.has_locus(Locus::Gray));
    }

    #[test]
    fn test_missing_parent_locus_synthesized_from_weights() {
        let mut p = BreedGeneticProfile::default();
        p.allowed_alleles
            .insert(Locus::Roan, vec!["Rn/rn".into(), "rn/rn".into()]);
        p.allele_weights
            .insert(Locus::Roan, WeightTable::new().with("Rn/rn", 1.0));
        let mut rng = StdRng::seed_from_u64(4);
        let foal = inherit_genotype(
            Some(&Genotype::default()),
            Some(&g(&[(Locus::Roan, "rn/rn")])),
            Some(&p),
            &mut rng,
        )
        .unwrap();
        assert_eq!(foal.get(Locus::Roan).unwrap().to_string(), "Rn/rn");
    }

    #[test]
    fn test_always_disallowed_uses_fallback() {
        let mut p = BreedGeneticProfile::default();
        p.allowed_alleles
            .insert(Locus::FrameOvero, vec!["O/n".into(), "n/n".into()]);
        p.disallowed_combinations
            .insert(Locus::FrameOvero, vec!["O/O".into()]);
        let parent = g(&[(Locus::FrameOvero, "O/O")]);
        let mut rng = StdRng::seed_from_u64(5);
        let foal = inherit_genotype(Some(&parent), Some(&parent), Some(&p), &mut rng).unwrap();
        assert_eq!(foal.get(Locus::FrameOvero).unwrap().to_string(), "n/n");
    }

    #[test]
    fn test_fallback_prefers_recessive_then_first() {
        let allowed = [
            AllelePair::parse(Locus::Gray, "G/g").unwrap(),
            AllelePair::parse(Locus::Gray, "G/G").unwrap(),
        ];
        assert_eq!(fallback_pair(Locus::Gray, Some(&allowed)).unwrap().to_string(), "G/g");

        let allowed = [
            AllelePair::parse(Locus::Pearl, "n/prl").unwrap(),
            AllelePair::parse(Locus::Pearl, "prl/prl").unwrap(),
        ];
        assert_eq!(
            fallback_pair(Locus::Pearl, Some(&allowed)).unwrap().to_string(),
            "prl/prl"
        );

        assert_eq!(fallback_pair(Locus::Extension, None).unwrap().to_string(), "e/e");
        assert_eq!(fallback_pair(Locus::Extension, Some(&[][..])), None);
    }

    #[test]
    fn test_unparsable_allowed_list_omits_locus() {
        let mut p = BreedGeneticProfile::default();
        p.allowed_alleles
            .insert(Locus::Cream, vec!["Cr/Q".into(), "bogus".into()]);
        let parent = g(&[(Locus::Cream, "n/n")]);
        let mut rng = StdRng::seed_from_u64(12);
        let foal = inherit_genotype(Some(&parent), Some(&parent), Some(&p), &mut rng).unwrap();
        assert!(!foal.has_locus(Locus::Cream));
        assert!(crate::profile::validate_profile(&p)
            .contains(&crate::profile::ProfileIssue::UnsatisfiableLocus(Locus::Cream)));
    }

    #[test]
    fn test_contradictory_profile_omits_locus() {
        let mut p = BreedGeneticProfile::default();
        p.allowed_alleles
            .insert(Locus::Tobiano, vec!["To/To".into()]);
        p.disallowed_combinations
            .insert(Locus::Tobiano, vec!["To/To".into()]);
        let parent = g(&[(Locus::Tobiano, "To/To")]);
        let mut rng = StdRng::seed_from_u64(6);
        let foal = inherit_genotype(Some(&parent), Some(&parent), Some(&p), &mut rng).unwrap();
        assert!(!foal.has_locus(Locus::Tobiano));
    }

    #[test]
    fn test_modifiers_agreeing_parents() {
        let mut p = BreedGeneticProfile::default();
        p.boolean_modifiers_prevalence
            .insert(Modifier::Sooty, Prevalence::new(0.0));
        p.boolean_modifiers_prevalence
            .insert(Modifier::Flaxen, Prevalence::new(1.0));
        let both_true = Genotype::builder()
            .modifier(Modifier::Sooty, true)
            .modifier(Modifier::Flaxen, false)
            .build();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let foal =
                inherit_genotype(Some(&both_true), Some(&both_true), Some(&p), &mut rng).unwrap();
            assert_eq!(foal.modifier(Modifier::Sooty), Some(true));
            assert_eq!(foal.modifier(Modifier::Flaxen), Some(false));
            // Not declared by the profile
            assert_eq!(foal.modifier(Modifier::Rabicano), None);
        }
    }

    #[test]
    fn test_modifiers_neither_parent_rolls_prevalence() {
        let mut p = BreedGeneticProfile::default();
        p.boolean_modifiers_prevalence
            .insert(Modifier::Pangare, Prevalence::new(1.0));
        p.boolean_modifiers_prevalence
            .insert(Modifier::Rabicano, Prevalence(None));
        let blank = Genotype::default();
        let mut rng = StdRng::seed_from_u64(8);
        let foal = inherit_genotype(Some(&blank), Some(&blank), Some(&p), &mut rng).unwrap();
        assert_eq!(foal.modifier(Modifier::Pangare), Some(true));
        assert_eq!(foal.modifier(Modifier::Rabicano), Some(false));
    }

    #[test]
    fn test_modifiers_mixed_parents_zero_prevalence() {
        // Zero prevalence: the result is true exactly when the coin favours
        // the true parent, so both outcomes appear.
        let mut p = BreedGeneticProfile::default();
        p.boolean_modifiers_prevalence
            .insert(Modifier::Sooty, Prevalence::new(0.0));
        let sire = Genotype::builder().modifier(Modifier::Sooty, true).build();
        let dam = Genotype::builder().modifier(Modifier::Sooty, false).build();
        let mut rng = StdRng::seed_from_u64(9);
        let trues = (0..200)
            .filter(|_| {
                inherit_genotype(Some(&sire), Some(&dam), Some(&p), &mut rng)
                    .unwrap()
                    .has_modifier(Modifier::Sooty)
            })
            .count();
        assert!(trues > 60 && trues < 140, "trues={trues}");
    }

    #[test]
    fn test_seeded_inheritance_is_reproducible() {
        let sire = g(&[(Locus::Extension, "E/e"), (Locus::Agouti, "A/a"), (Locus::Cream, "Cr/n")]);
        let dam = g(&[(Locus::Extension, "E/e"), (Locus::Agouti, "a/a"), (Locus::Cream, "n/n")]);
        let p = BreedGeneticProfile::default();
        let a = inherit_genotype(Some(&sire), Some(&dam), Some(&p), &mut StdRng::seed_from_u64(10));
        let b = inherit_genotype(Some(&sire), Some(&dam), Some(&p), &mut StdRng::seed_from_u64(10));
        assert_eq!(a, b);
    }
}
