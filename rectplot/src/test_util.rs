use rten_imageproc::Point;

/// Generate the corners of a random non-degenerate parallelogram, in
/// boundary order.
pub fn gen_parallelogram(rng: &mut fastrand::Rng) -> [Point; 4] {
    let origin = Point::from_yx(rng.i32(-50..50), rng.i32(-50..50));
    let (u, v) = loop {
        let u = Point::from_yx(rng.i32(-20..20), rng.i32(-20..20));
        let v = Point::from_yx(rng.i32(-20..20), rng.i32(-20..20));
        if u.x * v.y - u.y * v.x != 0 {
            break (u, v);
        }
    };
    let offset = |p: Point, d: Point| Point::from_yx(p.y + d.y, p.x + d.x);
    [
        origin,
        offset(origin, u),
        offset(offset(origin, u), v),
        offset(origin, v),
    ]
}

/// Return twice the signed area of a polygon. This is positive if the
/// vertices are counter-clockwise when y points up.
pub fn signed_area(points: &[Point]) -> i64 {
    (0..points.len())
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum()
}

/// Return true if `a` is a rotation of `b`.
pub fn is_cyclic_shift(a: &[Point], b: &[Point]) -> bool {
    a.len() == b.len()
        && (0..b.len()).any(|shift| (0..a.len()).all(|i| a[i] == b[(i + shift) % b.len()]))
}
