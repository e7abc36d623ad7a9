//! Horse-level entry points: store horses, foals, and phenotype refresh.
//!
//! These tie the generator, inheritance engine and phenotype resolver
//! together so callers get a genotype and its observable outcome in one
//! step. The phenotype is derived data; call [`refresh_phenotype`] when a
//! horse ages.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::generator::generate_genotype;
use crate::genotype::Genotype;
use crate::inheritance::{inherit_genotype, InheritanceError};
use crate::phenotype::{resolve_phenotype, PhenotypeResult};
use crate::profile::BreedGeneticProfile;

/// A horse's genetic record: its genotype and the phenotype resolved from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseGenetics {
    pub genotype: Genotype,
    pub phenotype: PhenotypeResult,
}

/// Generate a store horse of the given age.
///
/// A missing profile yields an empty genotype, which resolves to the plain
/// default phenotype.
pub fn create_store_horse(
    profile: Option<&BreedGeneticProfile>,
    age: u32,
    rng: &mut impl Rng,
) -> HorseGenetics {
    let genotype = generate_genotype(profile, rng);
    let phenotype = refresh_phenotype(&genotype, profile, age, rng);
    HorseGenetics {
        genotype,
        phenotype,
    }
}

/// Breed a newborn foal (age 0) of the foal breed's `profile`.
pub fn breed_foal(
    sire: Option<&Genotype>,
    dam: Option<&Genotype>,
    profile: Option<&BreedGeneticProfile>,
    rng: &mut impl Rng,
) -> Result<HorseGenetics, InheritanceError> {
    let genotype = inherit_genotype(sire, dam, profile, rng)?;
    let phenotype = refresh_phenotype(&genotype, profile, 0, rng);
    log::debug!(
        "Foal resolved to '{}' ({} loci)",
        phenotype.final_display_color,
        genotype.locus_count()
    );
    Ok(HorseGenetics {
        genotype,
        phenotype,
    })
}

/// Resolve the phenotype for a horse at `age`, using an empty profile when
/// none is available.
pub fn refresh_phenotype(
    genotype: &Genotype,
    profile: Option<&BreedGeneticProfile>,
    age: u32,
    rng: &mut impl Rng,
) -> PhenotypeResult {
    match profile {
        Some(p) => resolve_phenotype(genotype, p, age, rng),
        None => resolve_phenotype(genotype, &BreedGeneticProfile::default(), age, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loci::Locus;
    use crate::weighted::WeightTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey_profile() -> BreedGeneticProfile {
        let mut p = BreedGeneticProfile::default();
        p.allele_weights
            .insert(Locus::Extension, WeightTable::new().with("E/E", 1.0));
        p.allele_weights
            .insert(Locus::Agouti, WeightTable::new().with("A/A", 1.0));
        p.allele_weights
            .insert(Locus::Gray, WeightTable::new().with("G/g", 1.0));
        p
    }

    #[test]
    fn test_store_horse_without_profile() {
        let mut rng = StdRng::seed_from_u64(1);
        let horse = create_store_horse(None, 5, &mut rng);
        assert!(horse.genotype.is_empty());
        // Extension absent is not e/e, and no Agouti means black
        assert_eq!(horse.phenotype.final_display_color, "Black");
    }

    #[test]
    fn test_refresh_tracks_age() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = grey_profile();
        let horse = create_store_horse(Some(&p), 2, &mut rng);
        assert_eq!(horse.phenotype.final_display_color, "Steel Gray");

        let older = refresh_phenotype(&horse.genotype, Some(&p), 14, &mut rng);
        assert_eq!(older.final_display_color, "Fleabitten Gray");
    }

    #[test]
    fn test_breed_foal_resolves_at_birth() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = grey_profile();
        let sire = Genotype::from_pairs(&[
            (Locus::Extension, "E/E"),
            (Locus::Agouti, "A/A"),
            (Locus::Gray, "G/G"),
        ])
        .unwrap();
        let foal = breed_foal(Some(&sire), Some(&sire), Some(&p), &mut rng).unwrap();
        assert_eq!(foal.genotype.get(Locus::Gray).unwrap().to_string(), "G/G");
        // Age 0 is the first Gray stage
        assert_eq!(foal.phenotype.final_display_color, "Steel Gray");
    }

    #[test]
    fn test_breed_foal_requires_profile() {
        let mut rng = StdRng::seed_from_u64(4);
        let g = Genotype::default();
        assert_eq!(
            breed_foal(Some(&g), Some(&g), None, &mut rng),
            Err(InheritanceError::MissingProfile)
        );
    }
}
