use crate::*;

/// A closed elevation interval `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LevelRange {
    min: f64,
    max: f64,
}

impl LevelRange {
    pub fn new(min: f64, max: f64) -> Result<Self, &'static str> {
        if min <= max {
            Ok(Self { min, max })
        } else {
            Err("level range minimum must not exceed maximum")
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, z: f64) -> bool {
        self.min <= z && z <= self.max
    }
}

/// Check `levels` are finite and strictly descending (which also makes them distinct).
pub fn validate_levels(levels: &[f64]) -> Result<()> {
    if let Some((index, &level)) = levels.iter().enumerate().find(|(_, l)| !l.is_finite()) {
        return Err(Error::NonFiniteLevel { index, level });
    }

    match levels.windows(2).position(|w| w[1] >= w[0]) {
        Some(i) => Err(Error::LevelsNotDescending {
            index: i + 1,
            prev: levels[i],
            level: levels[i + 1],
        }),
        None => Ok(()),
    }
}

/// Split the surface span `[min, max]` into contiguous ranges at the `levels` lying strictly
/// inside it.
///
/// `levels` must be descending. The ranges are returned highest first; adjacent ranges share
/// exactly one boundary value.
///
/// # Example
/// ```rust
/// # use relief::*;
/// let ranges = level_ranges(0.0, 10.0, &[12.0, 7.5, 2.5, 0.0]);
/// let bounds = ranges.iter().map(|r| (r.min(), r.max())).collect::<Vec<_>>();
/// assert_eq!(bounds, [(7.5, 10.0), (2.5, 7.5), (0.0, 2.5)]);
/// ```
pub fn level_ranges(min: f64, max: f64, levels: &[f64]) -> Vec<LevelRange> {
    let values = std::iter::once(max)
        .chain(levels.iter().copied().filter(|&l| min < l && l < max))
        .chain(std::iter::once(min))
        .collect::<Vec<_>>();

    values
        .windows(2)
        .map(|w| LevelRange { min: w[1], max: w[0] })
        .collect()
}

/// The first range containing `z`. On a shared boundary this is the higher range.
pub fn classify(ranges: &[LevelRange], z: f64) -> Option<&LevelRange> {
    ranges.iter().find(|r| r.contains(z))
}
