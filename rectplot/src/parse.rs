//! Reader for rectangle listings.
//!
//! A listing has one rectangle per line, written as four parenthesized
//! `x y` pairs, followed by a trailer line which carries no rectangle data:
//!
//! ```text
//! (0 0) (0 2) (2 2) (2 0)
//! (3 0) (3 1) (4 1) (4 0)
//! 6
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rten_imageproc::Point;

use crate::errors::{LineError, ParseError};
use crate::rectangle::{Rectangle, RectangleSet};

/// Separator between the vertex groups of a line, once the outer parentheses
/// have been removed.
const VERTEX_SEPARATOR: &str = ") (";

fn parse_coord(s: &str) -> Result<i32, LineError> {
    s.parse().map_err(|_| LineError::NotAnInteger(s.to_string()))
}

fn parse_vertex(vertex: &str) -> Result<Point, LineError> {
    let coords: Vec<&str> = vertex.split_whitespace().collect();
    let [x, y] = coords.as_slice() else {
        return Err(LineError::CoordinateCount {
            vertex: vertex.to_string(),
            count: coords.len(),
        });
    };
    let x = parse_coord(x)?;
    let y = parse_coord(y)?;
    Ok(Point::from_yx(y, x))
}

impl FromStr for Rectangle {
    type Err = LineError;

    /// Parse a line of the form `(x1 y1) (x2 y2) (x3 y3) (x4 y4)`. Leading
    /// and trailing whitespace is ignored.
    fn from_str(line: &str) -> Result<Rectangle, LineError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(LineError::Empty);
        }
        let inner = line
            .strip_prefix('(')
            .and_then(|l| l.strip_suffix(')'))
            .ok_or(LineError::MissingParens)?;

        let vertices = inner
            .split(VERTEX_SEPARATOR)
            .map(parse_vertex)
            .collect::<Result<Vec<_>, _>>()?;
        let vertices: [Point; 4] = vertices
            .try_into()
            .map_err(|v: Vec<Point>| LineError::VertexCount(v.len()))?;

        Ok(Rectangle::new(vertices))
    }
}

/// Parse the contents of a rectangle listing.
///
/// The last line is kept as the set's trailer and is not parsed. Parsing
/// stops at the first malformed line.
pub fn parse_rectangles(text: &str) -> Result<RectangleSet, ParseError> {
    let mut lines: Vec<&str> = text.lines().collect();
    let trailer = lines.pop().map(|l| l.trim().to_string());

    let rects = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.parse::<Rectangle>()
                .map_err(|reason| ParseError::InvalidLine {
                    line: i + 1,
                    content: line.to_string(),
                    reason,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RectangleSet::new(rects, trailer))
}

/// Read and parse a rectangle listing from `path`.
pub fn read_rectangles<P: AsRef<Path>>(path: P) -> Result<RectangleSet, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rectangles(&text)
}
