//! Dense distance matrix.

/// A dense n×n distance matrix stored in row-major order.
///
/// Locations are plain indices; tasks and vehicles refer to them by index.
///
/// # Examples
///
/// ```
/// use u_pdp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from `(x, y)` coordinates.
    pub fn from_coordinates(coords: &[(f64, f64)]) -> Self {
        let n = coords.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (coords[i].0 - coords[j].0, coords[i].1 - coords[j].1);
                let d = (dx * dx + dy * dy).sqrt();
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size` or an
    /// entry is negative or not finite.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        let dm = Self { data, size };
        match dm.first_invalid() {
            Some(_) => None,
            None => Some(dm),
        }
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// First `(from, to, distance)` entry that is negative or not finite.
    pub fn first_invalid(&self) -> Option<(usize, usize, f64)> {
        self.data
            .iter()
            .position(|d| !d.is_finite() || *d < 0.0)
            .map(|i| (i / self.size, i % self.size, self.data[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coordinates() {
        let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(2, 0) - 8.0).abs() < 1e-10);
        assert!(dm.get(1, 1).abs() < 1e-10);
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 7.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 7.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_data_rejects_bad_entries() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, -1.0, 1.0, 0.0]).is_none());
        assert!(DistanceMatrix::from_data(2, vec![0.0, f64::NAN, 1.0, 0.0]).is_none());
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, f64::INFINITY, 0.0]).is_none());
    }

    #[test]
    fn test_first_invalid() {
        let mut dm = DistanceMatrix::new(3);
        assert_eq!(dm.first_invalid(), None);
        dm.set(2, 1, -4.0);
        assert_eq!(dm.first_invalid(), Some((2, 1, -4.0)));
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }
}
