use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Face blendshape channels in the order the landmark model emits them.
pub const BLENDSHAPE_NAMES: [&str; 52] = [
    "_neutral",
    "browDownLeft",
    "browDownRight",
    "browInnerUp",
    "browOuterUpLeft",
    "browOuterUpRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "eyeBlinkLeft",
    "eyeBlinkRight",
    "eyeLookDownLeft",
    "eyeLookDownRight",
    "eyeLookInLeft",
    "eyeLookInRight",
    "eyeLookOutLeft",
    "eyeLookOutRight",
    "eyeLookUpLeft",
    "eyeLookUpRight",
    "eyeSquintLeft",
    "eyeSquintRight",
    "eyeWideLeft",
    "eyeWideRight",
    "jawForward",
    "jawLeft",
    "jawOpen",
    "jawRight",
    "mouthClose",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthFunnel",
    "mouthLeft",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthPucker",
    "mouthRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "noseSneerLeft",
    "noseSneerRight",
];

static BLENDSHAPE_INDEX: Lazy<GestureIndex> =
    Lazy::new(|| GestureIndex::from_names(BLENDSHAPE_NAMES.iter().copied()));

/// Gesture name to sample-vector position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureIndex {
    indices: HashMap<String, usize>,
}

impl GestureIndex {
    /// Build an index where each name maps to its position in `names`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let indices = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx))
            .collect();
        Self { indices }
    }

    /// The standard 52-channel face blendshape layout.
    pub fn blendshapes() -> Self {
        BLENDSHAPE_INDEX.clone()
    }

    pub fn index_of(&self, gesture: &str) -> Option<usize> {
        self.indices.get(gesture).copied()
    }

    /// Value of `gesture` in `values`, or `None` when the gesture is not part
    /// of this layout or the vector is too short to hold it.
    pub fn value_in(&self, gesture: &str, values: &[f32]) -> Option<f32> {
        self.index_of(gesture).and_then(|idx| values.get(idx).copied())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parse one sample vector written as comma or whitespace separated floats.
pub fn parse_sample_line(line: &str) -> Result<Vec<f32>, std::num::ParseFloatError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(str::parse::<f32>)
        .collect()
}
