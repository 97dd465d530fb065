use std::ops::{Add, Mul, Neg, Sub};

/// Floating-point scalars usable as point coordinates.
pub trait Scalar:
    Copy
    + PartialOrd
    + std::fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;

    /// One half.
    const HALF: Self;

    /// `infinity` (∞) value of the type.
    const INFINITY: Self;

    /// Returns the minimum between two numbers.
    fn min(self, rhs: Self) -> Self;

    /// Returns the maximum between two numbers.
    fn max(self, rhs: Self) -> Self;

    /// Returns the middle point of `self` and `rhs`.
    fn midpoint(self, rhs: Self) -> Self;

    /// Returns half of a number, defined by the midpoint between this number and zero.
    #[inline]
    fn half(self) -> Self {
        self.midpoint(Self::ZERO)
    }
}

macro_rules! impl_scalar {
    ($s: ty) => {
        impl Scalar for $s {
            const ZERO: Self = 0.0;
            const HALF: Self = 0.5;
            const INFINITY: Self = Self::INFINITY;

            #[inline]
            fn min(self, rhs: Self) -> Self {
                self.min(rhs)
            }

            #[inline]
            fn max(self, rhs: Self) -> Self {
                self.max(rhs)
            }

            #[inline]
            fn midpoint(self, rhs: Self) -> Self {
                (self + rhs) / 2.0
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);

/// An axis-aligned extent defined by its minimum and maximum corners.
///
/// Used to accumulate the per-axis bounds of a point cloud before deriving the
/// cubic [`BoundingBox`] a tree is built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<const D: usize, S> {
    /// Minimum corner of the extent.
    pub min: [S; D],
    /// Maximum corner of the extent.
    pub max: [S; D],
}

impl<const D: usize, S: Scalar> Default for Aabb<D, S> {
    #[inline]
    fn default() -> Self {
        Self::new([S::INFINITY; D], [-S::INFINITY; D])
    }
}

impl<const D: usize, S: Scalar> Aabb<D, S> {
    /// Creates a new [`Aabb`] with the given min and max corners.
    #[inline]
    pub const fn new(min: [S; D], max: [S; D]) -> Self {
        Self { min, max }
    }

    /// Extends the [`Aabb`] so that it contains the given position.
    #[inline]
    pub fn extend(&mut self, position: &[S; D]) {
        for i in 0..D {
            self.min[i] = self.min[i].min(position[i]);
            self.max[i] = self.max[i].max(position[i]);
        }
    }

    /// Creates a new [`Aabb`] that contains the given positions.
    #[inline]
    pub fn with<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [S; D]>,
    {
        let mut result = Self::default();
        for position in positions {
            result.extend(&position);
        }
        result
    }

    /// Returns the center of the [`Aabb`].
    #[inline]
    pub fn center(&self) -> [S; D] {
        std::array::from_fn(|i| self.min[i].midpoint(self.max[i]))
    }

    /// Returns the size of the [`Aabb`].
    #[inline]
    pub fn size(&self) -> [S; D] {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }
}

/// A hyper-cubic region of space defined by its center and its radius, the
/// half-length of its sides.
///
/// Nodes of an [`Orthtree`](crate::tree::Orthtree) always cover a regular
/// hyper-cube, never a per-axis rectangle, so halving the radius and offsetting
/// the center is enough to subdivide a region into its `2^D` octants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<const D: usize, S> {
    /// Center of the region.
    pub center: [S; D],
    /// Half the side length of the region.
    pub radius: S,
}

impl<const D: usize, S: Scalar> Default for BoundingBox<D, S> {
    #[inline]
    fn default() -> Self {
        Self::new([S::ZERO; D], S::ZERO)
    }
}

impl<const D: usize, S: Scalar> BoundingBox<D, S> {
    /// Creates a new [`BoundingBox`] with the given center and radius.
    #[inline]
    pub const fn new(center: [S; D], radius: S) -> Self {
        Self { center, radius }
    }

    /// Creates the smallest cubic [`BoundingBox`] containing the given positions.
    ///
    /// The cube is centered on the midpoint of the per-axis extents and sized by
    /// the *largest* axis extent. On anisotropic point clouds this wastes volume
    /// compared to a per-axis box, but keeps every subdivision a regular cube.
    #[inline]
    pub fn square_with<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [S; D]>,
    {
        let extent = Aabb::with(positions);
        let radius = extent.size().into_iter().fold(S::ZERO, S::max).half();

        Self::new(extent.center(), radius)
    }

    /// Returns the full side length of the region.
    #[inline]
    pub fn diameter(&self) -> S {
        self.radius + self.radius
    }

    /// Returns the octant of this region the given position falls in.
    ///
    /// Bit `i` of the returned index is set iff `position[i] > center[i]`; a
    /// position exactly on the center plane of an axis lands on the lower side.
    /// The result is in `[0, 2^D)`.
    #[inline]
    pub fn octant_index(&self, position: &[S; D]) -> usize {
        (0..D).fold(0, |index, i| {
            index | (usize::from(position[i] > self.center[i]) << i)
        })
    }

    /// Subdivides this [`BoundingBox`] into `X` bounding boxes, one per octant.
    /// This only works if `X = 2^D`.
    ///
    /// The octant `k` cube has half this cube's radius and its center offset by
    /// [`octant_offset`]`(k)` times this cube's radius.
    #[inline]
    pub fn subdivide<const X: usize>(&self) -> [Self; X] {
        let radius = self.radius.half();

        std::array::from_fn(|k| {
            let offset: [S; D] = octant_offset(k);
            Self::new(
                std::array::from_fn(|i| self.center[i] + offset[i] * self.radius),
                radius,
            )
        })
    }
}

/// Offset from the center of a region to the center of its octant `k`, in units
/// of the region's radius.
///
/// Component `i` is `-0.5` when bit `i` of `k` is clear and `+0.5` when it is
/// set, matching the bit convention of [`BoundingBox::octant_index`] for any
/// dimension.
#[inline]
pub fn octant_offset<const D: usize, S: Scalar>(octant: usize) -> [S; D] {
    std::array::from_fn(|i| {
        if octant & (1 << i) == 0 {
            -S::HALF
        } else {
            S::HALF
        }
    })
}

/// Marker trait for the division of a dimension.
pub trait SubDivide {
    /// An array type with the amount of divisions as its size.
    type Division;
}

/// Marker struct for a constant.
#[derive(Clone, Copy, Debug)]
pub struct Const<const D: usize>;

macro_rules! impl_subdivide {
    ($($dim: literal),*) => {$(
        impl SubDivide for Const<$dim> {
            type Division = Const<{ 2usize.pow($dim) }>;
        }
    )*};
}

impl_subdivide!(1, 2, 3, 4, 5, 6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octant_offsets_match_index_bits() {
        for k in 0..8 {
            let offset: [f32; 3] = octant_offset(k);

            for i in 0..3 {
                let expected = if k & (1 << i) == 0 { -0.5 } else { 0.5 };
                assert_eq!(offset[i], expected, "octant {k}, axis {i}");
            }
        }
    }

    #[test]
    fn octant_index_ties_resolve_below() {
        let bbox = BoundingBox::new([0.0f64; 3], 1.0);

        assert_eq!(bbox.octant_index(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(bbox.octant_index(&[0.1, 0.0, 0.0]), 1);
        assert_eq!(bbox.octant_index(&[0.0, 0.1, 0.0]), 2);
        assert_eq!(bbox.octant_index(&[0.1, 0.1, 0.1]), 7);
        assert_eq!(bbox.octant_index(&[-0.1, 0.1, -0.1]), 2);
    }

    #[test]
    fn subdivide_halves_radius_and_offsets_centers() {
        let bbox = BoundingBox::new([2.0f32, -1.0, 0.5], 4.0);
        let cells: [BoundingBox<3, f32>; 8] = bbox.subdivide();

        for (k, cell) in cells.iter().enumerate() {
            assert_eq!(cell.radius, 2.0);

            let offset: [f32; 3] = octant_offset(k);
            for i in 0..3 {
                assert_eq!(cell.center[i], bbox.center[i] + offset[i] * bbox.radius);
            }
            // A point nudged towards the cell's center indexes back to it.
            let inner = std::array::from_fn(|i| bbox.center[i] + offset[i]);
            assert_eq!(bbox.octant_index(&inner), k);
        }
    }

    #[test]
    fn square_with_uses_largest_axis() {
        let bbox = BoundingBox::square_with([[0.0f32, 0.0], [8.0, 2.0]]);

        assert_eq!(bbox.center, [4.0, 1.0]);
        assert_eq!(bbox.radius, 4.0);
        assert_eq!(bbox.diameter(), 8.0);
    }

    #[test]
    fn aabb_accumulates_extents() {
        let extent = Aabb::with([[1.0f64, -2.0], [-3.0, 5.0], [2.0, 0.0]]);

        assert_eq!(extent.min, [-3.0, -2.0]);
        assert_eq!(extent.max, [2.0, 5.0]);
        assert_eq!(extent.center(), [-0.5, 1.5]);
        assert_eq!(extent.size(), [5.0, 7.0]);
    }
}
