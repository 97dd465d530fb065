use crate::partition::Scalar;

/// Index of a point in a [`PointCloud`].
pub type PointIndex = usize;

/// Read-only view over a `D`-dimensional point cloud.
///
/// An [`Orthtree`](crate::tree::Orthtree) never stores coordinates: it stores
/// [`PointIndex`]es and reads positions back through this trait, which the
/// build never mutates. Any indexable coordinate container can implement it.
pub trait PointCloud<const D: usize> {
    /// Scalar type of the coordinates.
    type Scalar: Scalar;

    /// Returns the number of points in the cloud.
    fn len(&self) -> usize;

    /// Returns `true` if the cloud contains no points.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the coordinates of the point at the given index.
    ///
    /// # Panics
    ///
    /// May panic if `index >= self.len()`.
    fn position(&self, index: PointIndex) -> [Self::Scalar; D];
}

impl<const D: usize, S: Scalar> PointCloud<D> for [[S; D]] {
    type Scalar = S;

    #[inline]
    fn len(&self) -> usize {
        <[[S; D]]>::len(self)
    }

    #[inline]
    fn position(&self, index: PointIndex) -> [S; D] {
        self[index]
    }
}

/// Borrowed `D × count` coordinate table in column-per-point layout.
///
/// The coordinates of point `i` are the `D` consecutive scalars starting at
/// `i * D`, the memory layout of a column-major `dim × count` coordinate
/// matrix.
#[derive(Clone, Copy, Debug)]
pub struct Interleaved<'c, const D: usize, S> {
    coordinates: &'c [S],
}

impl<'c, const D: usize, S: Scalar> Interleaved<'c, D, S> {
    /// Creates a new [`Interleaved`] cloud over the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the number of scalars is not a multiple of `D`.
    #[inline]
    pub fn new(coordinates: &'c [S]) -> Self {
        assert!(
            coordinates.len() % D == 0,
            "interleaved coordinate count must be a multiple of the dimension"
        );
        Self { coordinates }
    }
}

impl<const D: usize, S: Scalar> PointCloud<D> for Interleaved<'_, D, S> {
    type Scalar = S;

    #[inline]
    fn len(&self) -> usize {
        self.coordinates.len() / D
    }

    #[inline]
    fn position(&self, index: PointIndex) -> [S; D] {
        std::array::from_fn(|i| self.coordinates[index * D + i])
    }
}

#[cfg(feature = "glam")]
mod glam_impls {
    use super::{PointCloud, PointIndex};

    macro_rules! impl_cloud {
        ($vec: ty, $dim: literal, $s: ty) => {
            impl PointCloud<$dim> for [$vec] {
                type Scalar = $s;

                #[inline]
                fn len(&self) -> usize {
                    <[$vec]>::len(self)
                }

                #[inline]
                fn position(&self, index: PointIndex) -> [$s; $dim] {
                    self[index].to_array()
                }
            }
        };
    }

    impl_cloud!(glam::Vec2, 2, f32);
    impl_cloud!(glam::Vec3, 3, f32);
    impl_cloud!(glam::DVec2, 2, f64);
    impl_cloud!(glam::DVec3, 3, f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_of_arrays_are_clouds() {
        let points = [[0.0f32, 1.0], [2.0, 3.0], [4.0, 5.0]];
        let cloud: &[[f32; 2]] = &points;

        assert_eq!(PointCloud::len(cloud), 3);
        assert_eq!(cloud.position(1), [2.0, 3.0]);
    }

    #[test]
    fn interleaved_reads_columns() {
        let coordinates = [0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0];
        let cloud = Interleaved::<3, f64>::new(&coordinates);

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.position(0), [0.0, 1.0, 2.0]);
        assert_eq!(cloud.position(1), [3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "multiple of the dimension")]
    fn interleaved_rejects_ragged_tables() {
        let _ = Interleaved::<3, f64>::new(&[0.0, 1.0]);
    }

    #[cfg(feature = "glam")]
    #[test]
    fn glam_slices_are_clouds() {
        let points = [glam::Vec3::ZERO, glam::Vec3::new(1.0, 2.0, 3.0)];
        let cloud: &[glam::Vec3] = &points;

        assert_eq!(PointCloud::len(cloud), 2);
        assert_eq!(cloud.position(1), [1.0, 2.0, 3.0]);
    }
}
