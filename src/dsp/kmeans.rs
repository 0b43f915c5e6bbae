//! Fixed-k clustering of scalar durations.
//!
//! The decoder partitions on-durations into 2 groups (dot/dash) and
//! off-durations into 3 (symbol/letter/word spacing). Only the ordering
//! of the centroids matters to the caller, so seeding is deterministic:
//! the first centroid is the smallest value, and each further centroid is
//! the point farthest from all chosen so far. No RNG, identical output on
//! every run.

/// A fitted partition: one centroid per cluster and a cluster label per
/// input point, in input order.
#[derive(Clone, Debug)]
pub struct Clustering {
    pub centroids: Vec<f64>,
    pub labels: Vec<usize>,
}

const MAX_ITERS: usize = 100;

/// Cluster `data` into exactly `k` groups by 1-D k-means.
///
/// With fewer distinct values than `k`, surplus clusters collapse onto
/// duplicate centroids and end up empty; label assignment ties break
/// toward the lowest cluster index.
pub fn fit(data: &[f64], k: usize) -> Clustering {
    assert!(k >= 1, "cluster count must be >= 1");
    assert!(!data.is_empty(), "cannot cluster an empty set");

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Farthest-first seeding from the smallest value.
    let mut centroids = vec![sorted[0]];
    while centroids.len() < k {
        let mut best = sorted[0];
        let mut best_dist = -1.0;
        for &x in &sorted {
            let dist = centroids
                .iter()
                .map(|&c| (x - c).abs())
                .fold(f64::INFINITY, f64::min);
            if dist > best_dist {
                best_dist = dist;
                best = x;
            }
        }
        centroids.push(best);
    }

    let mut labels = vec![usize::MAX; data.len()];
    for _ in 0..MAX_ITERS {
        let mut changed = false;

        for (i, &x) in data.iter().enumerate() {
            let mut best = 0;
            let mut best_dist = (x - centroids[0]).abs();
            for (j, &c) in centroids.iter().enumerate().skip(1) {
                let dist = (x - c).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = j;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        for (j, centroid) in centroids.iter_mut().enumerate() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (i, &x) in data.iter().enumerate() {
                if labels[i] == j {
                    sum += x;
                    count += 1;
                }
            }
            // An empty cluster keeps its seed position.
            if count > 0 {
                *centroid = sum / count as f64;
            }
        }
    }

    Clustering { centroids, labels }
}

/// Indices of `values` in ascending order (stable on ties).
pub fn sorted_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_separated_groups() {
        let data = [2.0, 6.0, 2.0, 6.0, 2.0, 6.0, 3.0, 7.0];
        let fit = fit(&data, 2);

        let order = sorted_order(&fit.centroids);
        let small = order[0];
        let large = order[1];
        assert!((fit.centroids[small] - 2.25).abs() < 1e-9);
        assert!((fit.centroids[large] - 6.25).abs() < 1e-9);
        for (i, &x) in data.iter().enumerate() {
            let expected = if x < 4.0 { small } else { large };
            assert_eq!(fit.labels[i], expected, "point {x}");
        }
    }

    #[test]
    fn test_three_gap_groups() {
        let data = [1.0, 3.0, 1.0, 7.0, 1.0];
        let fit = fit(&data, 3);
        let order = sorted_order(&fit.centroids);

        assert_eq!(fit.centroids[order[0]], 1.0);
        assert_eq!(fit.centroids[order[1]], 3.0);
        assert_eq!(fit.centroids[order[2]], 7.0);
        assert_eq!(fit.labels[1], order[1]);
        assert_eq!(fit.labels[3], order[2]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let data = [10.0, 30.0, 10.0, 70.0, 10.0, 30.0, 10.0];
        let a = fit(&data, 3);
        let b = fit(&data, 3);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn test_fewer_points_than_clusters() {
        let fit = fit(&[5.0], 3);
        assert_eq!(fit.labels, vec![0]);
        assert_eq!(fit.centroids, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_identical_values() {
        let data = [4.0; 10];
        let fit = fit(&data, 2);
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert_eq!(fit.centroids[0], 4.0);
    }

    #[test]
    fn test_sorted_order_stable_on_ties() {
        assert_eq!(sorted_order(&[3.0, 1.0, 3.0, 0.5]), vec![3, 1, 0, 2]);
    }
}
