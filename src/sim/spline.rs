//! Clamped Catmull-Rom path
//!
//! A smooth curve through an ordered list of control points, parameterized by
//! normalized progress in [0, 1]. Each segment spans `1 / (count - 1)` of the
//! parameter range. At the first and last segment the missing neighbor is
//! replaced by the endpoint itself (clamped) instead of being extrapolated.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::LOOK_AHEAD;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("a path needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("control point {0} is not finite")]
    NonFinite(usize),
}

/// Point on a single Catmull-Rom segment running from `p1` to `p2` (u ∈ [0, 1])
pub fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, u: f32) -> Vec3 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * u
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * u3)
}

/// Rotation whose local +Z points along `dir` with local +Y as close to `up`
/// as possible. `None` when `dir` has no length.
pub fn look_rotation(dir: Vec3, up: Vec3) -> Option<Quat> {
    let forward = dir.try_normalize()?;
    let right = match up.cross(forward).try_normalize() {
        Some(r) => r,
        // Looking straight along `up`
        None => forward.any_orthonormal_vector(),
    };
    let up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Immutable control-point sequence with clamped Catmull-Rom evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct CatmullRomPath {
    points: Vec<Vec3>,
}

impl TryFrom<Vec<Vec3>> for CatmullRomPath {
    type Error = PathError;

    fn try_from(points: Vec<Vec3>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<CatmullRomPath> for Vec<Vec3> {
    fn from(path: CatmullRomPath) -> Self {
        path.points
    }
}

impl CatmullRomPath {
    pub fn new(points: Vec<Vec3>) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(PathError::NonFinite(i));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn start(&self) -> Vec3 {
        self.points[0]
    }

    pub fn end(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Number of segments (`count - 1`)
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Segment selected for progress `t`, never past the last segment
    pub fn segment_index(&self, t: f32) -> usize {
        let t = clamp_progress(t);
        let scaled = t * self.segment_count() as f32;
        (scaled.floor() as usize).min(self.segment_count() - 1)
    }

    /// Position at normalized progress `t` (clamped to [0, 1])
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let t = clamp_progress(t);
        // Endpoints are returned exactly, not through the cubic
        if t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }

        let count = self.points.len();
        if count == 2 {
            return self.points[0].lerp(self.points[1], t);
        }

        let i = self.segment_index(t);
        let u = t * self.segment_count() as f32 - i as f32;

        let p0 = self.points[i.saturating_sub(1)];
        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p3 = self.points[(i + 2).min(count - 1)];

        catmull_rom_point(p0, p1, p2, p3, u)
    }

    /// Orientation facing along the path at `t`.
    ///
    /// Looks from `evaluate(t)` toward `evaluate(t + LOOK_AHEAD)`. At the very
    /// end the displacement vanishes, and `current` is returned unchanged.
    pub fn facing(&self, t: f32, current: Quat) -> Quat {
        let t = clamp_progress(t);
        let ahead = (t + LOOK_AHEAD).min(1.0);
        let dir = self.evaluate(ahead) - self.evaluate(t);
        look_rotation(dir, Vec3::Y).unwrap_or(current)
    }

    /// Sample `n` evenly spaced positions (inclusive of both ends)
    pub fn sample(&self, n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|k| self.evaluate(k as f32 / (n - 1).max(1) as f32))
            .collect()
    }
}

/// NaN progress is treated as the start of the path
#[inline]
fn clamp_progress(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq;
    use proptest::prelude::*;

    fn line4() -> CatmullRomPath {
        CatmullRomPath::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    fn bent4() -> CatmullRomPath {
        CatmullRomPath::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(4.0, 0.0, -1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_short_paths() {
        assert_eq!(CatmullRomPath::new(vec![]), Err(PathError::TooFewPoints(0)));
        assert_eq!(
            CatmullRomPath::new(vec![Vec3::ONE]),
            Err(PathError::TooFewPoints(1))
        );
        assert_eq!(
            CatmullRomPath::new(vec![Vec3::ZERO, Vec3::splat(f32::NAN)]),
            Err(PathError::NonFinite(1))
        );
    }

    #[test]
    fn test_collinear_midpoint() {
        let p = line4().evaluate(0.5);
        assert!((p.x - 1.5).abs() < 1e-5, "x was {}", p.x);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_passes_through_interior_points() {
        let path = bent4();
        let pts = path.points().to_vec();
        assert!(approx_eq(path.evaluate(1.0 / 3.0), pts[1], 1e-4));
        assert!(approx_eq(path.evaluate(2.0 / 3.0), pts[2], 1e-4));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let path = bent4();
        assert_eq!(path.evaluate(-2.0), path.start());
        assert_eq!(path.evaluate(7.0), path.end());
        assert_eq!(path.evaluate(f32::NAN), path.start());
    }

    #[test]
    fn test_segment_index_clamps_at_end() {
        let path = bent4();
        assert_eq!(path.segment_index(0.0), 0);
        assert_eq!(path.segment_index(0.5), 1);
        assert_eq!(path.segment_index(1.0), 2);
    }

    #[test]
    fn test_three_points_clamped_ends() {
        let path = CatmullRomPath::new(vec![
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!(approx_eq(path.evaluate(0.5), Vec3::new(1.0, 1.0, 0.0), 1e-5));
        // Symmetric shape, symmetric curve
        let a = path.evaluate(0.25);
        let b = path.evaluate(0.75);
        assert!((a.y - b.y).abs() < 1e-5);
        assert!((a.x + b.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_facing_points_along_path() {
        let rot = line4().facing(0.5, Quat::IDENTITY);
        assert!(approx_eq(rot * Vec3::Z, Vec3::X, 1e-4));
    }

    #[test]
    fn test_facing_at_end_keeps_current() {
        let current = Quat::from_rotation_y(0.7);
        assert_eq!(line4().facing(1.0, current), current);
    }

    #[test]
    fn test_look_rotation_straight_up() {
        let rot = look_rotation(Vec3::Y, Vec3::Y).unwrap();
        assert!(approx_eq(rot * Vec3::Z, Vec3::Y, 1e-4));
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_sample_includes_endpoints() {
        let path = bent4();
        let pts = path.sample(11);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], path.start());
        assert_eq!(pts[10], path.end());
    }

    #[test]
    fn test_serde_rejects_short_path() {
        let json = serde_json::to_string(&vec![Vec3::ZERO]).unwrap();
        assert!(serde_json::from_str::<CatmullRomPath>(&json).is_err());
        let ok = serde_json::to_string(&line4()).unwrap();
        assert_eq!(serde_json::from_str::<CatmullRomPath>(&ok).unwrap(), line4());
    }

    fn arb_point() -> impl Strategy<Value = Vec3> {
        (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn arb_path() -> impl Strategy<Value = CatmullRomPath> {
        prop::collection::vec(arb_point(), 2..12)
            .prop_map(|pts| CatmullRomPath::new(pts).unwrap())
    }

    proptest! {
        #[test]
        fn prop_start_is_exact(path in arb_path()) {
            prop_assert_eq!(path.evaluate(0.0), path.points()[0]);
        }

        #[test]
        fn prop_end_is_exact(path in arb_path()) {
            prop_assert_eq!(path.evaluate(1.0), *path.points().last().unwrap());
        }

        #[test]
        fn prop_two_points_is_lerp(a in arb_point(), b in arb_point(), t in 0.0f32..=1.0) {
            let path = CatmullRomPath::new(vec![a, b]).unwrap();
            let expected = a + t * (b - a);
            prop_assert!(approx_eq(path.evaluate(t), expected, 1e-3));
        }

        #[test]
        fn prop_segment_index_monotonic(path in arb_path(), t1 in 0.0f32..=1.0, t2 in 0.0f32..=1.0) {
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(path.segment_index(lo) <= path.segment_index(hi));
        }

        #[test]
        fn prop_four_points_hit_boundaries(
            a in arb_point(), b in arb_point(), c in arb_point(), d in arb_point()
        ) {
            let path = CatmullRomPath::new(vec![a, b, c, d]).unwrap();
            prop_assert!(approx_eq(path.evaluate(1.0 / 3.0), b, 1e-2));
            prop_assert!(approx_eq(path.evaluate(2.0 / 3.0), c, 1e-2));
        }

        #[test]
        fn prop_evaluate_is_deterministic(path in arb_path(), t in 0.0f32..=1.0) {
            prop_assert_eq!(path.evaluate(t), path.evaluate(t));
        }
    }
}
