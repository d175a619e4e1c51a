use geo_types::Coordinate;

use super::spiderfy_types::SpiderfyConfig;

/// Bearing of the first point on every circle and ring ("straight up").
const START_ANGLE_DEGREES: f64 = -90.0;

/// Fans `count` points out around `center` with the default threshold and ring growth.
///
/// Up to 8 points share a single circle of `base_radius`; more than that are
/// laid out on rings of 8, each ring `0.8 * base_radius` further out than the
/// previous one. The result has one coordinate per input, in input order.
pub fn calculate_positions(
    count: usize,
    center: Coordinate<f64>,
    base_radius: f64,
) -> Vec<Coordinate<f64>> {
    let defaults = SpiderfyConfig::default();
    layout(count, center, base_radius, defaults.circle_threshold, defaults.ring_growth)
}

/// Same layout as [`calculate_positions`], with the threshold, ring growth and
/// radius taken from `config`.
pub fn calculate_positions_with(
    count: usize,
    center: Coordinate<f64>,
    config: &SpiderfyConfig,
) -> Vec<Coordinate<f64>> {
    layout(
        count,
        center,
        config.base_radius,
        config.circle_threshold,
        config.ring_growth,
    )
}

fn layout(
    count: usize,
    center: Coordinate<f64>,
    base_radius: f64,
    circle_threshold: usize,
    ring_growth: f64,
) -> Vec<Coordinate<f64>> {
    if count == 0 {
        return Vec::new();
    }

    if count <= circle_threshold {
        let angle_step = 360.0 / count as f64;
        return (0..count)
            .map(|i| offset(center, base_radius, i as f64 * angle_step))
            .collect();
    }

    // Every ring restarts at the top, so consecutive rings line up radially.
    let ring_size = circle_threshold.max(1);
    let angle_step = 360.0 / ring_size as f64;
    let mut positions = Vec::with_capacity(count);
    let mut radius = base_radius;
    let mut angle = 0.0;

    for i in 0..count {
        if i > 0 && i % ring_size == 0 {
            radius += base_radius * ring_growth;
            angle = 0.0;
        }
        positions.push(offset(center, radius, angle));
        angle += angle_step;
    }

    positions
}

#[inline]
fn offset(center: Coordinate<f64>, radius: f64, angle_degrees: f64) -> Coordinate<f64> {
    let theta = (START_ANGLE_DEGREES + angle_degrees).to_radians();
    Coordinate {
        x: center.x + radius * theta.cos(),
        y: center.y + radius * theta.sin(),
    }
}
