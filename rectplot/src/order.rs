use rten_imageproc::Point;

use crate::geom_util::centroid;

/// Reorder `points` so that consecutive entries are adjacent corners of a
/// polygon.
///
/// Points are sorted by descending angle around their centroid, which is
/// clockwise when y points up. The sort is stable, so points at the same
/// angle (eg. duplicates) keep their relative input order. Degenerate input
/// such as collinear points is not rejected, the result is still a
/// permutation of the input.
pub fn order_vertices(points: &mut [Point]) {
    let Some(center) = centroid(points) else {
        return;
    };
    let angle = |p: &Point| (p.y as f64 - center.y).atan2(p.x as f64 - center.x);
    points.sort_by(|a, b| angle(b).total_cmp(&angle(a)));
}

/// Return a copy of `points` in polygon order. See [order_vertices].
pub fn sort_vertices(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    order_vertices(&mut sorted);
    sorted
}
