use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::Rng;

/// Near-regular convex outline with a random vertex count and jittered spacing.
///
/// The vertex count is drawn from `vertex_range` (end exclusive). Each vertex
/// drifts by at most `variation * PI / n` radians from its even slot, which
/// keeps the angular order and therefore convexity. Vertices are returned
/// counter-clockwise and lie on the circle of `radius`.
pub fn random_outline<R: Rng + ?Sized>(
    rng: &mut R,
    radius: f64,
    vertex_range: (usize, usize),
    variation: f64,
) -> Vec<DVec2> {
    let (low, high) = vertex_range;
    let low = low.max(3);
    let n = if high > low {
        rng.gen_range(low..high)
    } else {
        low
    };

    let step = TAU / n as f64;
    let max_jitter = PI * variation.clamp(0.0, 1.0) / n as f64;
    (0..n)
        .map(|i| {
            let jitter = if max_jitter > 0.0 {
                rng.gen_range(-max_jitter..=max_jitter)
            } else {
                0.0
            };
            DVec2::from_angle(step * i as f64 + jitter) * radius
        })
        .collect()
}
