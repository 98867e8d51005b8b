//! Deterministic two-cluster k-means over scalar values

/// Iteration cap for Lloyd's algorithm
const MAX_ITERATIONS: usize = 100;

/// Result of a two-cluster split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoMeans {
    /// Cluster centres, lower first
    pub centroids: [f64; 2],

    /// Number of values assigned to each cluster
    pub sizes: [usize; 2],

    /// Lloyd iterations performed
    pub iterations: usize,
}

impl TwoMeans {
    /// Absolute distance between the two centres
    pub fn separation(&self) -> f64 {
        (self.centroids[1] - self.centroids[0]).abs()
    }
}

/// Split values into two clusters
///
/// Centres are seeded at the minimum and maximum value so the result does not
/// depend on any random state. Returns `None` when the data cannot support two
/// distinct clusters: fewer than two values, no spread, or a cluster that ends
/// up empty or coincident with the other.
pub fn two_means(values: &[f64]) -> Option<TwoMeans> {
    if values.len() < 2 {
        return None;
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min >= max {
        return None;
    }

    let mut centroids = [min, max];
    let mut sizes = [0usize; 2];
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let mut sums = [0.0f64; 2];
        sizes = [0, 0];
        for &value in values {
            let cluster = nearest(&centroids, value);
            sums[cluster] += value;
            sizes[cluster] += 1;
        }

        if sizes[0] == 0 || sizes[1] == 0 {
            return None;
        }

        let updated = [sums[0] / sizes[0] as f64, sums[1] / sizes[1] as f64];
        if updated == centroids {
            break;
        }
        centroids = updated;
    }

    if centroids[0] == centroids[1] {
        return None;
    }

    Some(TwoMeans {
        centroids,
        sizes,
        iterations,
    })
}

/// Index of the closest centre, ties go to the first
fn nearest(centroids: &[f64; 2], value: f64) -> usize {
    if (value - centroids[0]).abs() <= (value - centroids[1]).abs() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bimodal_split() {
        let values = [8.0, 8.2, 7.9, 8.1, 14.0, 14.2, 13.8];
        let result = two_means(&values).unwrap();

        assert!((result.centroids[0] - 8.05).abs() < 1e-9);
        assert!((result.centroids[1] - 14.0).abs() < 1e-9);
        assert_eq!(result.sizes, [4, 3]);
        assert!((result.separation() - 5.95).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(two_means(&[]).is_none());
        assert!(two_means(&[4.0]).is_none());
        assert!(two_means(&[4.0, 4.0, 4.0]).is_none());
    }

    #[test]
    fn test_two_points() {
        let result = two_means(&[1.0, 3.0]).unwrap();
        assert_eq!(result.centroids, [1.0, 3.0]);
        assert_eq!(result.sizes, [1, 1]);
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
        assert_eq!(two_means(&values), two_means(&values));
    }
}
