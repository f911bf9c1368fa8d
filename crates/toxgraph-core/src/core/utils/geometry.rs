use nalgebra::{Point3, Vector3};

/// Arithmetic mean of a set of points, `None` when empty.
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Weighted mean of a set of points.
///
/// Returns `None` when the slices differ in length, are empty, or the weights sum
/// to zero.
pub fn weighted_centroid(points: &[Point3<f64>], weights: &[f64]) -> Option<Point3<f64>> {
    if points.len() != weights.len() || points.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total.abs() < f64::EPSILON {
        return None;
    }
    let sum: Vector3<f64> = points
        .iter()
        .zip(weights)
        .map(|(p, &w)| p.coords * w)
        .sum();
    Some(Point3::from(sum / total))
}

/// Angle in radians between two vectors, with the cosine clamped to [-1, 1].
///
/// Zero-length input yields `None`.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let norm_product = a.norm() * b.norm();
    if norm_product == 0.0 {
        return None;
    }
    Some((a.dot(b) / norm_product).clamp(-1.0, 1.0).acos())
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn centroid_averages_points() {
        let c = centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -2.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn weighted_centroid_pulls_towards_heavy_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)];
        let c = weighted_centroid(&points, &[3.0, 1.0]).unwrap();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!(weighted_centroid(&points, &[1.0]).is_none());
        assert!(weighted_centroid(&points, &[0.0, 0.0]).is_none());
    }

    #[test]
    fn angle_between_handles_orthogonal_and_degenerate_vectors() {
        let angle = angle_between(&Vector3::x(), &Vector3::z()).unwrap();
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
        assert!(angle_between(&Vector3::zeros(), &Vector3::z()).is_none());
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((distance(&Point3::origin(), &Point3::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-12);
    }
}
