use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading a rectangle listing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input file could not be read.
    #[error("failed to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data line does not have the `(x1 y1) (x2 y2) (x3 y3) (x4 y4)`
    /// structure. `line` is 1-based.
    #[error("invalid rectangle on line {line}: {content:?}")]
    InvalidLine {
        line: usize,
        content: String,
        #[source]
        reason: LineError,
    },
}

/// Reasons a single line fails to parse as a rectangle.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum LineError {
    #[error("line is empty")]
    Empty,

    #[error("vertex list is not enclosed in parentheses")]
    MissingParens,

    #[error("expected 4 vertices, found {0}")]
    VertexCount(usize),

    #[error("expected 2 coordinates in vertex \"{vertex}\", found {count}")]
    CoordinateCount { vertex: String, count: usize },

    #[error("coordinate \"{0}\" is not an integer")]
    NotAnInteger(String),
}

/// Errors that can occur when rendering a set of rectangles.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum RenderError {
    /// There were no rectangles to plot, so the plot bounds are undefined.
    #[error("input contains no rectangles")]
    EmptyInput,

    /// The requested canvas has no pixels.
    #[error("canvas size {width}x{height} is empty")]
    EmptyCanvas { width: usize, height: usize },
}
