//! Parse rectangle listings produced by floorplanning tools and plot them.
//!
//! ```no_run
//! use rectplot::{read_rectangles, render_rectangles, RenderParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rects = read_rectangles("result.txt")?;
//! let image = render_rectangles(&rects, &RenderParams::default())?;
//! # Ok(())
//! # }
//! ```

mod errors;
mod font;
mod geom_util;
mod log;
mod order;
mod parse;
mod rectangle;
mod render;

#[cfg(test)]
mod test_util;

pub use errors::{LineError, ParseError, RenderError};
pub use geom_util::{centroid, Bounds, Centroid};
pub use order::{order_vertices, sort_vertices};
pub use parse::{parse_rectangles, read_rectangles};
pub use rectangle::{Rectangle, RectangleSet, VIEW_MARGIN};
pub use render::{render_rectangles, PlotTransform, RenderParams};
