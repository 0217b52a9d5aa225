//! Fixed-size vector used for points, directions and colors.

use super::{DefaultType, DEFAULT_DIM};

use std::{
    fmt,
    iter::Sum,
    ops::{
        Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
    },
    str::FromStr,
};

use paste::paste;
use rand::Rng;

/// 3D vector of `f64`, the workhorse of the renderer.
pub type Vec3 = Vector<3, f64>;
/// Position in space. Same type as [Vec3], named for intent.
pub type Point3 = Vec3;
/// Linear RGB color. Same type as [Vec3], named for intent.
pub type Color = Vec3;

#[derive(Debug, PartialEq, thiserror::Error)]
/// Errors returned by the checked and parsing entry points of [Vector].
pub enum Error {
    #[error("Index {index} out of range for a {dim}-dimensional vector")]
    /// Component index past the vector's dimension.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Dimension of the vector.
        dim: usize,
    },

    #[error("Cannot normalize a vector of length {0}")]
    /// Normalization would divide by a zero or non-finite length.
    Degenerate(f64),

    #[error("Expected {expected} components, got {got}")]
    /// Wrong number of components in the source.
    ComponentCount {
        /// Dimension of the vector.
        expected: usize,
        /// Number of components found.
        got: usize,
    },

    #[error("Invalid component `{0}`")]
    /// A component failed to parse as a number.
    InvalidComponent(String),
}

#[repr(C)]
#[derive(PartialEq, Clone, Copy, Debug)]
/// DIM-dimensional vector of TYPE values.
///
/// No invariant is enforced on the components: infinities and NaN are representable and
/// propagate through every operation untouched.
pub struct Vector<const DIM: usize = DEFAULT_DIM, TYPE = DefaultType> {
    /// Component storage.
    pub inner: [TYPE; DIM],
}

impl<const DIM: usize, TYPE: Default + Copy> Default for Vector<DIM, TYPE> {
    fn default() -> Self {
        Self {
            inner: [TYPE::default(); DIM],
        }
    }
}

impl<const DIM: usize, TYPE> Index<usize> for Vector<DIM, TYPE> {
    type Output = TYPE;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

impl<const DIM: usize, TYPE> IndexMut<usize> for Vector<DIM, TYPE> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.inner[index]
    }
}

impl<const DIM: usize, TYPE: Copy> Vector<DIM, TYPE> {
    /// Bounds-checked read of the component at `index`.
    pub fn get(&self, index: usize) -> Result<TYPE, Error> {
        self.inner
            .get(index)
            .copied()
            .ok_or(Error::OutOfRange { index, dim: DIM })
    }

    /// Bounds-checked mutable access to the component at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut TYPE, Error> {
        self.inner
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, dim: DIM })
    }
}

macro_rules! primitive_array_conversions {
    ($($target:ty),+ $(,)?) => {
        $(
            impl<const DIM: usize> From<Vector<DIM, $target>> for [$target; DIM] {
                fn from(value: Vector<DIM, $target>) -> Self {
                    value.inner
                }
            }

            impl<const DIM: usize> From<[$target; DIM]> for Vector<DIM, $target> {
                fn from(value: [$target; DIM]) -> Self {
                    Self { inner: value }
                }
            }

            impl<const DIM: usize> TryFrom<&[$target]> for Vector<DIM, $target> {
                type Error = Error;

                fn try_from(value: &[$target]) -> Result<Self, Self::Error> {
                    let inner = <[$target; DIM]>::try_from(value).map_err(|_| {
                        Error::ComponentCount {
                            expected: DIM,
                            got: value.len(),
                        }
                    })?;

                    Ok(Self { inner })
                }
            }
        )+
    };
}

primitive_array_conversions!(i32, i64, f32, f64);

macro_rules! impl_vec_vec_op {
    ($trait:ident, $function:ident, $($op:tt)+) => {
        paste! {
            impl<const DIM: usize, TYPE: Copy + [<$trait Assign>]<TYPE>> [<$trait Assign>]<Self> for Vector<DIM, TYPE> {
                fn [<$function _assign>](&mut self, rhs: Self) {
                    for (l, r) in self.inner.iter_mut().zip(rhs.inner.iter()) {
                        *l $($op)+ *r;
                    }
                }
            }

            impl<const DIM: usize, TYPE: Copy + [<$trait Assign>]<TYPE>> $trait<Self> for Vector<DIM, TYPE> {
                type Output = Self;

                fn $function(mut self, rhs: Self) -> Self::Output {
                    self $($op)+ rhs;
                    self
                }
            }
        }
    }
}

impl_vec_vec_op! (Add, add, +=);
impl_vec_vec_op! (Sub, sub, -=);
// Hadamard product, used to tint colors.
impl_vec_vec_op! (Mul, mul, *=);

macro_rules! impl_vec_type_op {
    ($trait:ident, $function:ident, $($op:tt)+) => {
        paste! {
            impl<const DIM: usize, TYPE: Copy + [<$trait Assign>]<TYPE>> [<$trait Assign>]<TYPE> for Vector<DIM, TYPE> {
                fn [<$function _assign>](&mut self, rhs: TYPE) {
                    for v in self.inner.as_mut_slice() {
                        *v $($op)+ rhs;
                    }
                }
            }

            impl<const DIM: usize, TYPE: Copy + [<$trait Assign>]<TYPE>> $trait<TYPE> for Vector<DIM, TYPE> {
                type Output = Self;

                fn $function(mut self, rhs: TYPE) -> Self::Output {
                    self $($op)+ rhs;
                    self
                }
            }
        }
    }
}

impl_vec_type_op! (Add, add, +=);
impl_vec_type_op! (Sub, sub, -=);
impl_vec_type_op! (Mul, mul, *=);

impl<const DIM: usize, TYPE: Copy + Neg<Output = TYPE>> Neg for Vector<DIM, TYPE> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for v in self.inner.iter_mut() {
            *v = -*v;
        }

        self
    }
}

impl<const DIM: usize, TYPE: Copy + Default + AddAssign<TYPE>> Sum for Vector<DIM, TYPE> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, cur| acc + cur)
    }
}

impl<TYPE> Vector<3, TYPE> {
    /// Create a new 3D vector from values.
    pub fn new<T: Into<TYPE>>(x: T, y: T, z: T) -> Self {
        Self {
            inner: [x.into(), y.into(), z.into()],
        }
    }
}

impl<TYPE: Copy> Vector<3, TYPE> {
    #[inline]
    /// First component.
    pub fn x(&self) -> TYPE {
        self.inner[0]
    }

    #[inline]
    /// Second component.
    pub fn y(&self) -> TYPE {
        self.inner[1]
    }

    #[inline]
    /// Third component.
    pub fn z(&self) -> TYPE {
        self.inner[2]
    }
}

impl<const DIM: usize, TYPE: Copy + Default + Add<Output = TYPE> + Mul<Output = TYPE>>
    Vector<DIM, TYPE>
{
    #[inline]
    /// Sum of the squared components, slightly faster than `length`.
    ///
    /// No overflow guard: huge components square to infinity.
    pub fn length_squared(&self) -> TYPE {
        self.dot(self)
    }

    /// Euclidean inner product with `other`.
    pub fn dot(&self, other: &Self) -> TYPE {
        self.inner
            .iter()
            .zip(other.inner.iter())
            .fold(TYPE::default(), |acc, cur| acc + *cur.0 * *cur.1)
    }
}

impl<TYPE: Copy + Mul<Output = TYPE> + Sub<TYPE, Output = TYPE>> Vector<3, TYPE> {
    /// Right-handed cross product with `other`.
    pub fn cross(&self, other: &Self) -> Self {
        Vector {
            inner: [
                self.inner[1] * other.inner[2] - self.inner[2] * other.inner[1],
                self.inner[2] * other.inner[0] - self.inner[0] * other.inner[2],
                self.inner[0] * other.inner[1] - self.inner[1] * other.inner[0],
            ],
        }
    }
}

/// Magnitude under which every component must fall for [Vector::near_zero].
const NEAR_ZERO: f64 = 1e-8;

macro_rules! impl_float_vector {
    ($($float:ty),+ $(,)?) => {
        $(
            impl<const DIM: usize> DivAssign<$float> for Vector<DIM, $float> {
                /// Multiplies by the reciprocal, so dividing by zero yields infinities or NaN.
                fn div_assign(&mut self, rhs: $float) {
                    *self *= 1. / rhs;
                }
            }

            impl<const DIM: usize> Div<$float> for Vector<DIM, $float> {
                type Output = Self;

                fn div(mut self, rhs: $float) -> Self::Output {
                    self /= rhs;
                    self
                }
            }

            impl<const DIM: usize> Mul<Vector<DIM, $float>> for $float {
                type Output = Vector<DIM, $float>;

                fn mul(self, rhs: Vector<DIM, $float>) -> Self::Output {
                    rhs * self
                }
            }

            // SAFETY: `Vector` is `repr(C)` around a single array of a plain float type, so it
            // has no padding and every bit pattern is valid.
            unsafe impl<const DIM: usize> bytemuck::Zeroable for Vector<DIM, $float> {}
            unsafe impl<const DIM: usize> bytemuck::Pod for Vector<DIM, $float> {}

            impl<const DIM: usize> Vector<DIM, $float> {
                #[inline]
                /// Euclidean length.
                pub fn length(&self) -> $float {
                    self.length_squared().sqrt()
                }

                #[inline]
                /// Same direction scaled to length 1.
                ///
                /// The caller guarantees a non-zero length; a zero vector comes back as NaN.
                pub fn unit_vector(&self) -> Self {
                    *self / self.length()
                }

                /// Checked [unit_vector](Self::unit_vector), refusing zero and non-finite lengths.
                pub fn try_unit_vector(&self) -> Result<Self, Error> {
                    let length = self.length();
                    if length == 0. || !length.is_finite() {
                        return Err(Error::Degenerate(f64::from(length)));
                    }

                    Ok(*self / length)
                }

                /// Whether every component is close enough to zero to be meaningless as a
                /// direction.
                pub fn near_zero(&self) -> bool {
                    self.inner
                        .iter()
                        .all(|v| f64::from(v.abs()) < NEAR_ZERO)
                }

                /// Components drawn independently and uniformly from `[0, 1)`.
                pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    let mut res = Self::default();
                    for v in res.inner.iter_mut() {
                        *v = rng.gen();
                    }

                    res
                }

                /// Components drawn independently and uniformly from `[min, max)`.
                pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: $float, max: $float) -> Self {
                    Self::random(rng) * (max - min) + min
                }
            }
        )+
    };
}

impl_float_vector!(f32, f64);

impl<const DIM: usize, TYPE: fmt::Display> fmt::Display for Vector<DIM, TYPE> {
    /// Space separated components, the format expected by the image writer.
    ///
    /// Each component uses its own `Display`, so `f64` prints in shortest round-trip form
    /// without exponent (`1e10` is `10000000000`). Precision flags apply to every component.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.inner.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(v, f)?;
        }

        Ok(())
    }
}

impl<const DIM: usize, TYPE: FromStr + Default + Copy> FromStr for Vector<DIM, TYPE> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut res = Self::default();
        let mut got = 0;

        for token in s.split_whitespace() {
            if got < DIM {
                res.inner[got] = token
                    .parse()
                    .map_err(|_| Error::InvalidComponent(token.to_string()))?;
            }
            got += 1;
        }

        if got != DIM {
            return Err(Error::ComponentCount { expected: DIM, got });
        }

        Ok(res)
    }
}

#[inline]
/// Euclidean inner product of `u` and `v`.
pub fn dot<const DIM: usize, TYPE>(u: &Vector<DIM, TYPE>, v: &Vector<DIM, TYPE>) -> TYPE
where
    TYPE: Copy + Default + Add<Output = TYPE> + Mul<Output = TYPE>,
{
    u.dot(v)
}

#[inline]
/// Right-handed cross product of `u` and `v`.
pub fn cross<TYPE>(u: &Vector<3, TYPE>, v: &Vector<3, TYPE>) -> Vector<3, TYPE>
where
    TYPE: Copy + Mul<Output = TYPE> + Sub<TYPE, Output = TYPE>,
{
    u.cross(v)
}

#[inline]
/// `v` scaled to length 1. See [Vector::unit_vector].
pub fn unit_vector(v: &Vec3) -> Vec3 {
    v.unit_vector()
}
