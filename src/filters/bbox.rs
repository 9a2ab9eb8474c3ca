//! Output geometry resolution.
//!
//! Inputs are labelled B (index 0), A or A1 (index 1), A2, A3, ... The
//! policy chooses which of them define the output bounding box.

use crate::core::error::{NodeId, ValidationError, ValidationResult};
use crate::core::types::ImageInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the output bounding box is derived from the inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BBoxPolicy {
    /// Union of every input's box and channels.
    #[default]
    #[serde(rename = "union")]
    Union,
    /// Box pinned to input 1 (A); channels still grown by inputs 2 and up.
    A,
    /// Geometry of input 0 (B) verbatim.
    B,
}

impl BBoxPolicy {
    /// Option names in knob order.
    pub const NAMES: [&'static str; 3] = ["union", "A", "B"];

    /// Option name of this policy.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Position of this policy in the knob's option list.
    pub fn index(self) -> usize {
        match self {
            BBoxPolicy::Union => 0,
            BBoxPolicy::A => 1,
            BBoxPolicy::B => 2,
        }
    }

    /// Policy at knob position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(BBoxPolicy::Union),
            1 => Some(BBoxPolicy::A),
            2 => Some(BBoxPolicy::B),
            _ => None,
        }
    }
}

impl fmt::Display for BBoxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BBoxPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| *name == s)
            .and_then(Self::from_index)
            .ok_or_else(|| format!("unknown bbox policy '{}'", s))
    }
}

/// Combine the inputs' geometry into the output geometry.
///
/// Inputs' records are read, never modified. Needs at least two records.
pub fn resolve_geometry(
    node_id: NodeId,
    policy: BBoxPolicy,
    inputs: &[ImageInfo],
) -> ValidationResult<ImageInfo> {
    if inputs.len() < 2 {
        return Err(ValidationError::TooFewInputs {
            node_id,
            connected: inputs.len(),
            minimum: 2,
        });
    }

    let info = match policy {
        BBoxPolicy::Union => inputs[1..]
            .iter()
            .fold(inputs[0], |acc, info| acc.merge(info)),
        BBoxPolicy::A => inputs[2..]
            .iter()
            .fold(inputs[1], |acc, info| acc.merge_channels(info)),
        BBoxPolicy::B => inputs[0],
    };

    Ok(info)
}
