//! Face and leg markings, rolled independently of coat color.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::profile::MarkingBias;
use crate::weighted::select_weighted;

/// Value used for an unmarked face or leg.
pub const NO_MARKING: &str = "none";

/// Per-leg markings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegMarkings {
    #[serde(rename = "LF")]
    pub left_fore: String,
    #[serde(rename = "RF")]
    pub right_fore: String,
    #[serde(rename = "LH")]
    pub left_hind: String,
    #[serde(rename = "RH")]
    pub right_hind: String,
}

impl Default for LegMarkings {
    fn default() -> Self {
        Self {
            left_fore: NO_MARKING.into(),
            right_fore: NO_MARKING.into(),
            left_hind: NO_MARKING.into(),
            right_hind: NO_MARKING.into(),
        }
    }
}

impl LegMarkings {
    /// Legs in roll order: LF, RF, LH, RH.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.left_fore,
            &self.right_fore,
            &self.left_hind,
            &self.right_hind,
        ]
        .into_iter()
        .map(String::as_str)
    }

    pub fn marked_count(&self) -> usize {
        self.iter().filter(|m| *m != NO_MARKING).count()
    }
}

/// Body-level flags set by the pattern stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyMarkings {
    pub mottling: bool,
    pub striping: bool,
    pub bloody_shoulder: bool,
}

/// Structured marking map of a phenotype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypicMarkings {
    pub face: String,
    pub legs: LegMarkings,
    pub body: BodyMarkings,
}

impl Default for PhenotypicMarkings {
    fn default() -> Self {
        Self {
            face: NO_MARKING.into(),
            legs: LegMarkings::default(),
            body: BodyMarkings::default(),
        }
    }
}

/// Roll face and leg markings.
///
/// Legs are visited LF, RF, LH, RH. Once `max_legs` legs carry a marking the
/// remaining legs are not rolled.
pub fn roll_markings(bias: &MarkingBias, rng: &mut impl Rng) -> (String, LegMarkings) {
    let face = select_weighted(&bias.face, rng)
        .unwrap_or(NO_MARKING)
        .to_string();

    let max_legs = usize::from(bias.max_legs());
    let probability = bias.leg_probability();
    let mut legs = LegMarkings::default();
    let mut marked = 0;
    for leg in [
        &mut legs.left_fore,
        &mut legs.right_fore,
        &mut legs.left_hind,
        &mut legs.right_hind,
    ] {
        if marked >= max_legs {
            break;
        }
        if rng.gen::<f64>() < probability {
            let marking = select_weighted(&bias.leg_specific_probabilities, rng).unwrap_or(NO_MARKING);
            if marking != NO_MARKING {
                *leg = marking.to_string();
                marked += 1;
            }
        }
    }

    (face, legs)
}
