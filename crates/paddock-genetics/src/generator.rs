//! Genotype generation for freshly created horses.
//!
//! Every locus in the breed's `allele_weights` gets one weighted draw. A draw
//! that lands on a disallowed pair is dropped, not re-rolled: the locus is
//! left absent so the profile bug stays visible. Boolean modifiers are rolled
//! against their prevalence.

use rand::Rng;

use crate::allele::AllelePair;
use crate::genotype::{Genotype, GenotypeBuilder};
use crate::loci::Modifier;
use crate::profile::{BreedGeneticProfile, Prevalence};
use crate::weighted::select_weighted;

/// Build a starting genotype from a breed profile.
///
/// A missing profile yields an empty genotype.
pub fn generate_genotype(profile: Option<&BreedGeneticProfile>, rng: &mut impl Rng) -> Genotype {
    let Some(profile) = profile else {
        log::warn!("No breed genetic profile supplied; generating empty genotype");
        return Genotype::default();
    };

    let mut builder = GenotypeBuilder::default();

    for (&locus, table) in &profile.allele_weights {
        let Some(label) = select_weighted(table, rng) else {
            log::warn!("No selectable allele pair for {}; locus omitted", locus);
            continue;
        };
        let pair = match AllelePair::parse(locus, label) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("Weighted pick for {} is unusable: {}", locus, e);
                continue;
            }
        };
        if profile.is_disallowed(&pair) {
            log::warn!(
                "Generated disallowed pair {} for {}; locus omitted",
                pair,
                locus
            );
            continue;
        }
        builder.insert_pair(pair);
    }

    for (&modifier, prevalence) in &profile.boolean_modifiers_prevalence {
        builder.insert_modifier(modifier, roll_modifier(modifier, prevalence, rng));
    }

    builder.build()
}

/// Roll a boolean modifier against its prevalence. Invalid prevalence is
/// logged and reads as `false` without consuming a draw.
pub(crate) fn roll_modifier(modifier: Modifier, prevalence: &Prevalence, rng: &mut impl Rng) -> bool {
    match prevalence.probability() {
        Some(p) => rng.gen::<f64>() < p,
        None => {
            log::warn!(
                "Invalid prevalence {:?} for '{}'; defaulting to false",
                prevalence.0,
                modifier.name()
            );
            false
        }
    }
}
