use crate::*;

/// Result type for surface build operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors a build call can fail with.
///
/// Everything except [`Error::Unclassified`] is raised while validating input, before any
/// geometry work is done.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The level at `index` is not strictly less than the level before it.
    LevelsNotDescending {
        index: usize,
        prev: f64,
        level: f64,
    },

    /// The level at `index` is NaN or infinite.
    NonFiniteLevel { index: usize, level: f64 },

    /// A surface vertex has a NaN or infinite coordinate.
    NonFiniteCoordinate { point: Point3 },

    /// Not enough points to triangulate.
    InsufficientPoints { required: usize, actual: usize },

    /// The surface has no triangles to work with.
    EmptySurface,

    /// The light vector is zero length or not finite.
    InvalidLight { light: Point3 },

    /// The vertical exaggeration is zero or not finite.
    InvalidZFactor { z_factor: f64 },

    /// Shading needs at least one luminosity bin.
    InvalidBinCount,

    /// An interpolated elevation did not land in any level range.
    ///
    /// The ranges partition the surface's elevation span, so this indicates a broken internal
    /// invariant rather than bad input.
    Unclassified { z: f64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelsNotDescending { index, prev, level } => write!(
                f,
                "levels must be strictly descending: level {index} ({level}) is not below {prev}"
            ),
            Self::NonFiniteLevel { index, level } => {
                write!(f, "level {index} is not finite ({level})")
            }
            Self::NonFiniteCoordinate { point } => {
                write!(f, "surface point {point:?} has a non-finite coordinate")
            }
            Self::InsufficientPoints { required, actual } => write!(
                f,
                "insufficient points: need at least {required}, got {actual}"
            ),
            Self::EmptySurface => write!(f, "surface has no triangles"),
            Self::InvalidLight { light } => {
                write!(f, "light vector {light:?} must be finite and non-zero")
            }
            Self::InvalidZFactor { z_factor } => {
                write!(f, "z factor must be finite and non-zero, got {z_factor}")
            }
            Self::InvalidBinCount => write!(f, "at least one luminosity bin is required"),
            Self::Unclassified { z } => {
                write!(f, "elevation {z} does not fall within any level range")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = Error::LevelsNotDescending {
            index: 2,
            prev: 5.0,
            level: 7.0,
        };
        assert_eq!(
            e.to_string(),
            "levels must be strictly descending: level 2 (7) is not below 5"
        );

        let e = Error::InsufficientPoints {
            required: 3,
            actual: 1,
        };
        assert_eq!(
            e.to_string(),
            "insufficient points: need at least 3, got 1"
        );

        let e: Box<dyn std::error::Error + Send + Sync> = Box::new(Error::EmptySurface);
        assert_eq!(e.to_string(), "surface has no triangles");
    }
}
