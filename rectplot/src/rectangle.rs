use std::fmt;

use rten_imageproc::Point;

use crate::geom_util::{centroid, Bounds, Centroid};
use crate::order::order_vertices;

/// Margin, in data units, added around the plotted rectangles.
pub const VIEW_MARGIN: i32 = 1;

/// A quadrilateral given by its four corners, in the order they were read.
///
/// The corners are not required to form a valid winding. Use
/// [Rectangle::sorted_vertices] to get them in polygon order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle {
    vertices: [Point; 4],
}

impl Rectangle {
    pub fn new(vertices: [Point; 4]) -> Rectangle {
        Rectangle { vertices }
    }

    /// Create a rectangle from `(x, y)` pairs.
    pub fn from_xy(coords: [(i32, i32); 4]) -> Rectangle {
        Rectangle::new(coords.map(|(x, y)| Point::from_yx(y, x)))
    }

    /// Return the corners in input order.
    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    /// Return the corners ordered so that consecutive entries are adjacent.
    pub fn sorted_vertices(&self) -> [Point; 4] {
        let mut sorted = self.vertices;
        order_vertices(&mut sorted);
        sorted
    }

    /// Return the mean of the four corners.
    pub fn centroid(&self) -> Centroid {
        centroid(&self.vertices).expect("rectangle has vertices")
    }

    /// Return the area enclosed by the corners in polygon order.
    pub fn area(&self) -> f64 {
        let corners = self.sorted_vertices();
        // Cross products of i32 coordinates fit in i64, but their sum may not.
        let twice_area: i128 = (0..corners.len())
            .map(|i| {
                let a = corners[i];
                let b = corners[(i + 1) % corners.len()];
                a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128
            })
            .sum();
        twice_area.abs() as f64 / 2.
    }
}

/// Formats the rectangle in the listing format, eg. `(0 0) (0 2) (2 2) (2 0)`.
impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, p) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({} {})", p.x, p.y)?;
        }
        Ok(())
    }
}

/// Rectangles read from a listing, in file order.
///
/// The position of a rectangle in the set is the label it is drawn with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RectangleSet {
    rects: Vec<Rectangle>,
    trailer: Option<String>,
}

impl RectangleSet {
    pub fn new(rects: Vec<Rectangle>, trailer: Option<String>) -> RectangleSet {
        RectangleSet { rects, trailer }
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rectangle> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Return the final line of the listing, which carries no rectangle data.
    pub fn trailer(&self) -> Option<&str> {
        self.trailer.as_deref()
    }

    /// Return the floorplan area recorded in the trailer line, if the trailer
    /// is an integer.
    pub fn reported_area(&self) -> Option<u64> {
        self.trailer()?.trim().parse().ok()
    }

    /// Return the summed area of all rectangles.
    pub fn total_area(&self) -> f64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Return an iterator over the corners of all rectangles.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.rects.iter().flat_map(|r| r.vertices().iter().copied())
    }

    /// Return the bounding box of all corners, or `None` if the set is empty.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.points())
    }

    /// Return the region to plot: [RectangleSet::bounds] plus
    /// [VIEW_MARGIN] on each side.
    pub fn view_bounds(&self) -> Option<Bounds> {
        self.bounds().map(|b| b.expand(VIEW_MARGIN))
    }
}
