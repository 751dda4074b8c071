//! Collision checks between two agent paths.

use std::collections::BTreeMap;

use crate::track::TrackRow;

/// Default per-agent radius in metres.
pub const DEFAULT_PERSON_RADIUS: f64 = 0.1;

/// Default number of parts each inter-frame segment is split into.
pub const DEFAULT_INTER_PARTS: usize = 2;

/// First row per frame, keyed by frame.
fn by_frame(path: &[TrackRow]) -> BTreeMap<i64, &TrackRow> {
    let mut rows = BTreeMap::new();
    for row in path {
        rows.entry(row.frame()).or_insert(row);
    }
    rows
}

fn lerp(a: &TrackRow, b: &TrackRow, t: f64) -> (f64, f64) {
    (a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t)
}

/// Check whether two agents come closer than `2 * radius` on shared frames.
///
/// Uses [`DEFAULT_INTER_PARTS`] interpolation steps between frames.
pub fn collision(path1: &[TrackRow], path2: &[TrackRow], radius: f64) -> bool {
    collision_with_parts(path1, path2, radius, DEFAULT_INTER_PARTS)
}

/// Check whether two agents come closer than `2 * radius` on shared frames.
///
/// Only frames present in both paths are compared. Between consecutive
/// shared frames both agents are assumed to move linearly and the segment is
/// sampled at `inter_parts + 1` evenly spaced positions (endpoints included).
/// The result does not depend on the order of the two paths.
///
/// # Arguments
/// * `path1`, `path2` - Agent paths, at most one row per frame is used
/// * `radius` - Per-agent radius
/// * `inter_parts` - Number of parts each segment is split into (0 is treated as 1)
pub fn collision_with_parts(
    path1: &[TrackRow],
    path2: &[TrackRow],
    radius: f64,
    inter_parts: usize,
) -> bool {
    let threshold = 2.0 * radius;
    let rows2 = by_frame(path2);

    let shared: Vec<(&TrackRow, &TrackRow)> = by_frame(path1)
        .into_iter()
        .filter_map(|(frame, a)| rows2.get(&frame).map(|b| (a, *b)))
        .collect();

    match shared.as_slice() {
        [] => false,
        [(a, b)] => a.distance_to(b) < threshold,
        pairs => {
            let parts = inter_parts.max(1);
            pairs.windows(2).any(|window| {
                let (a0, b0) = window[0];
                let (a1, b1) = window[1];
                (0..=parts).any(|step| {
                    let t = step as f64 / parts as f64;
                    let (ax, ay) = lerp(a0, a1, t);
                    let (bx, by) = lerp(b0, b1, t);
                    (ax - bx).hypot(ay - by) < threshold
                })
            })
        }
    }
}

/// Check `primary` against each of `others` in turn, stopping at the first collision.
pub fn collides_with_any(
    primary: &[TrackRow],
    others: &[Vec<TrackRow>],
    radius: f64,
    inter_parts: usize,
) -> bool {
    others
        .iter()
        .any(|other| collision_with_parts(primary, other, radius, inter_parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(agent_id: i64, points: &[(i64, f64, f64)]) -> Vec<TrackRow> {
        points
            .iter()
            .map(|&(f, x, y)| TrackRow::new(f, agent_id, x, y))
            .collect()
    }

    #[test]
    fn test_far_apart_paths_do_not_collide() {
        let a = path(1, &[(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 2.0, 0.0)]);
        let b = path(2, &[(0, 0.0, 5.0), (1, 1.0, 5.0), (2, 2.0, 5.0)]);
        assert!(!collision(&a, &b, DEFAULT_PERSON_RADIUS));
    }

    #[test]
    fn test_overlap_at_a_frame_collides() {
        let a = path(1, &[(0, 0.0, 0.0), (1, 1.0, 0.0)]);
        let b = path(2, &[(0, 5.0, 5.0), (1, 1.05, 0.0)]);
        assert!(collision(&a, &b, DEFAULT_PERSON_RADIUS));
    }

    #[test]
    fn test_crossing_between_frames_collides() {
        // Agents swap positions; they meet halfway between frame 0 and frame 1
        let a = path(1, &[(0, 0.0, 0.0), (1, 2.0, 0.0)]);
        let b = path(2, &[(0, 2.0, 0.0), (1, 0.0, 0.0)]);
        assert!(collision(&a, &b, DEFAULT_PERSON_RADIUS));
        // Without intermediate samples the crossing is missed
        assert!(!collision_with_parts(&a, &b, DEFAULT_PERSON_RADIUS, 1));
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = path(1, &[(0, 0.0, 0.0)]);
        let b = path(2, &[(0, 0.5, 0.0)]);
        assert!(!collision(&a, &b, 0.25));
        assert!(collision(&a, &b, 0.2500001));
    }

    #[test]
    fn test_only_shared_frames_count() {
        let a = path(1, &[(0, 0.0, 0.0), (1, 1.0, 0.0)]);
        let b = path(2, &[(5, 0.0, 0.0), (6, 1.0, 0.0)]);
        assert!(!collision(&a, &b, DEFAULT_PERSON_RADIUS));
    }

    #[test]
    fn test_collision_is_symmetric() {
        let cases = [
            (
                path(1, &[(0, 0.0, 0.0), (1, 2.0, 0.0), (2, 4.0, 0.0)]),
                path(2, &[(1, 2.0, 0.15), (2, 3.0, 3.0), (3, 9.0, 9.0)]),
            ),
            (
                path(1, &[(0, 0.0, 0.0), (1, 2.0, 0.0)]),
                path(2, &[(0, 2.0, 0.0), (1, 0.0, 0.0)]),
            ),
            (
                path(1, &[(0, 0.0, 0.0), (1, 1.0, 1.0)]),
                path(2, &[(0, 0.0, 3.0), (1, 1.0, 4.0)]),
            ),
        ];
        for (a, b) in &cases {
            assert_eq!(collision(a, b, 0.1), collision(b, a, 0.1));
        }
    }

    #[test]
    fn test_collides_with_any() {
        let primary = path(1, &[(0, 0.0, 0.0), (1, 1.0, 0.0)]);
        let far = path(2, &[(0, 0.0, 9.0), (1, 1.0, 9.0)]);
        let near = path(3, &[(0, 0.0, 0.1), (1, 1.0, 0.1)]);

        assert!(!collides_with_any(&primary, &[far.clone()], 0.1, 2));
        assert!(collides_with_any(&primary, &[far, near], 0.1, 2));
        assert!(!collides_with_any(&primary, &[], 0.1, 2));
    }
}
