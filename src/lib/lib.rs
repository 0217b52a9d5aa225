#![warn(missing_docs)]

//! Numeric foundation of a ray tracer: vectors for points, directions and colors, closed intervals
//! for hit ranges and clamping, and the random direction samplers used for diffuse scattering.

pub mod interval;
pub mod random;
pub mod vector;

/// Component type of a [Vector](vector::Vector) when none is given.
pub type DefaultType = f64;
/// Dimension of a [Vector](vector::Vector) when none is given.
pub const DEFAULT_DIM: usize = 3;

/// Everything a renderer usually needs in scope.
pub mod prelude {
    pub use crate::interval::Interval;
    pub use crate::random::{
        random_double, random_double_range, random_on_hemisphere, random_unit_vector,
        SamplerConfig,
    };
    pub use crate::vector::{cross, dot, unit_vector, Color, Point3, Vec3, Vector};
}
