//! Pure coat-color genetics for Paddock.
//!
//! This crate contains the horse genetics engine: genotype generation for
//! store horses, phenotype resolution, and Mendelian inheritance for foals.
//! Functions take plain data plus an explicit random source and return
//! results, so every outcome is reproducible from a seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`loci`] | Locus and modifier catalogue, allele alphabets, dominance ranks |
//! | [`allele`] | Allele pairs in canonical order, parsing from `"X/Y"` |
//! | [`genotype`] | Partial genotype (loci + boolean modifiers) and builder |
//! | [`weighted`] | Weight tables and the weighted random selector |
//! | [`profile`] | Breed genetic profiles, JSON loading, validation |
//! | [`generator`] | Random genotype for a new horse from a profile |
//! | [`phenotype`] | Display color, shade and markings from a genotype |
//! | [`inheritance`] | Foal genotype from sire, dam and breed profile |
//! | [`breeding`] | Store-horse and foal entry points, phenotype refresh |
//! | [`persistence`] | Versioned binary save/load of horse records |

pub mod allele;
pub mod breeding;
pub mod generator;
pub mod genotype;
pub mod inheritance;
pub mod loci;
pub mod persistence;
pub mod phenotype;
pub mod profile;
pub mod weighted;
