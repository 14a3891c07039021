//! Shared utilities for working with point sets.

use rten_imageproc::Point;

/// Arithmetic mean of a set of points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Return the centroid of `points`, or `None` if `points` is empty.
pub fn centroid(points: &[Point]) -> Option<Centroid> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sum_x, sum_y) = points.iter().fold((0., 0.), |(sx, sy), p| {
        (sx + p.x as f64, sy + p.y as f64)
    });
    Some(Centroid {
        x: sum_x / n,
        y: sum_y / n,
    })
}

/// Axis-aligned integer box `[x_min, x_max] × [y_min, y_max]`.
///
/// Both ends of each range are inclusive, so a single point has zero width
/// and height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Bounds {
    /// Return the smallest box containing all of `points`, or `None` if there
    /// are no points.
    pub fn of_points(points: impl IntoIterator<Item = Point>) -> Option<Bounds> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let init = Bounds {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        Some(points.fold(init, |b, p| Bounds {
            x_min: b.x_min.min(p.x),
            x_max: b.x_max.max(p.x),
            y_min: b.y_min.min(p.y),
            y_max: b.y_max.max(p.y),
        }))
    }

    /// Grow the box by `margin` units on every side.
    pub fn expand(self, margin: i32) -> Bounds {
        Bounds {
            x_min: self.x_min.saturating_sub(margin),
            x_max: self.x_max.saturating_add(margin),
            y_min: self.y_min.saturating_sub(margin),
            y_max: self.y_max.saturating_add(margin),
        }
    }

    pub fn width(&self) -> u64 {
        (self.x_max as i64 - self.x_min as i64) as u64
    }

    pub fn height(&self) -> u64 {
        (self.y_max as i64 - self.y_min as i64) as u64
    }

    pub fn area(&self) -> u64 {
        self.width() * self.height()
    }
}
