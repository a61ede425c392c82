use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// # Eye conditions known to both classifiers
///
/// Variant order is the model class order: the image network's output unit
/// `i` corresponds to `ConditionLabel::ALL[i]`, and the derived `Ord` is used
/// to order the text model's classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLabel {
    Normal,
    Conjunctivitis,
    Stye,
    Chalazion,
    Blepharitis,
    Ptosis,
    AllergicReaction,
    DryEye,
}

impl ConditionLabel {
    pub const ALL: [ConditionLabel; 8] = [
        ConditionLabel::Normal,
        ConditionLabel::Conjunctivitis,
        ConditionLabel::Stye,
        ConditionLabel::Chalazion,
        ConditionLabel::Blepharitis,
        ConditionLabel::Ptosis,
        ConditionLabel::AllergicReaction,
        ConditionLabel::DryEye,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionLabel::Normal => "normal",
            ConditionLabel::Conjunctivitis => "conjunctivitis",
            ConditionLabel::Stye => "stye",
            ConditionLabel::Chalazion => "chalazion",
            ConditionLabel::Blepharitis => "blepharitis",
            ConditionLabel::Ptosis => "ptosis",
            ConditionLabel::AllergicReaction => "allergic_reaction",
            ConditionLabel::DryEye => "dry_eye",
        }
    }

    /// Position of this label in the declared class order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("unknown condition label `{s}`"))
    }
}
