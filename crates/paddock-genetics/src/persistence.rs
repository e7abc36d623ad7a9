//! Save/Load of horse genetic records.
//!
//! Uses bincode for compact binary serialization. Each record carries a
//! format version so stale saves are rejected rather than misread.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::breeding::HorseGenetics;
use crate::genotype::Genotype;
use crate::phenotype::PhenotypeResult;

/// Version number for the record format (increment when format changes)
pub const RECORD_VERSION: u32 = 1;

/// Serializable snapshot of one horse
#[derive(Serialize, Deserialize)]
struct RecordData {
    version: u32,
    /// Breed the profile was taken from, if known
    breed: Option<String>,
    age: u32,
    genotype: Genotype,
    phenotype: PhenotypeResult,
}

/// A loaded horse record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseRecord {
    pub breed: Option<String>,
    pub age: u32,
    pub genetics: HorseGenetics,
}

/// Save a horse record to a writer
pub fn save_record<W: Write>(writer: W, record: &HorseRecord) -> Result<(), RecordError> {
    let data = RecordData {
        version: RECORD_VERSION,
        breed: record.breed.clone(),
        age: record.age,
        genotype: record.genetics.genotype.clone(),
        phenotype: record.genetics.phenotype.clone(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Load a horse record from a reader
pub fn load_record<R: Read>(reader: R) -> Result<HorseRecord, RecordError> {
    let data: RecordData = bincode::deserialize_from(reader)?;

    if data.version != RECORD_VERSION {
        return Err(RecordError::VersionMismatch {
            expected: RECORD_VERSION,
            found: data.version,
        });
    }

    Ok(HorseRecord {
        breed: data.breed,
        age: data.age,
        genetics: HorseGenetics {
            genotype: data.genotype,
            phenotype: data.phenotype,
        },
    })
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum RecordError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for RecordError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        RecordError::Bincode(e)
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Io(e) => write!(f, "IO error: {}", e),
            RecordError::Bincode(e) => write!(f, "Serialization error: {}", e),
            RecordError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Record version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::breed_foal;
    use crate::loci::{Locus, Modifier};
    use crate::profile::BreedGeneticProfile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_record() -> HorseRecord {
        let sire = Genotype::builder()
            .parse(Locus::Extension, "E/e")
            .unwrap()
            .parse(Locus::Cream, "Cr/n")
            .unwrap()
            .modifier(Modifier::Sooty, true)
            .build();
        let dam = Genotype::from_pairs(&[(Locus::Extension, "e/e"), (Locus::Cream, "n/n")]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let genetics =
            breed_foal(Some(&sire), Some(&dam), Some(&BreedGeneticProfile::default()), &mut rng)
                .unwrap();
        HorseRecord {
            breed: Some("Quarter Horse".into()),
            age: 0,
            genetics,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let record = sample_record();

        let mut buffer = Vec::new();
        save_record(&mut buffer, &record).expect("Save failed");
        let loaded = load_record(&buffer[..]).expect("Load failed");

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let record = sample_record();
        let mut buffer = Vec::new();
        save_record(&mut buffer, &record).unwrap();
        // The version is the leading little-endian u32
        buffer[0] = 99;

        match load_record(&buffer[..]) {
            Err(RecordError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, RECORD_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_record_fails() {
        let record = sample_record();
        let mut buffer = Vec::new();
        save_record(&mut buffer, &record).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(load_record(&buffer[..]), Err(RecordError::Bincode(_))));
    }
}
