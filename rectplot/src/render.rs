use rten_imageproc::{Painter, Point, PointF, Rgb};
use rten_tensor::NdTensor;

use crate::errors::RenderError;
use crate::font::{draw_text, glyph_scale, TextAnchor};
use crate::geom_util::Bounds;
use crate::rectangle::RectangleSet;

// Colors chosen from https://www.w3.org/wiki/CSS/Properties/color/keywords.
const BLACK: Rgb = [0, 0, 0];
const BLUE: Rgb = [0, 0, 255];
const GREEN: Rgb = [0, 128, 0];
const RED: Rgb = [255, 0, 0];

/// Height of rectangle index labels.
const LABEL_FONT_PT: f32 = 12.;

/// Height of vertex coordinate labels.
const COORD_FONT_PT: f32 = 10.;

/// Height of axis tick labels.
const TICK_FONT_PT: f32 = 8.;

/// Length of tick marks, and gap between a tick mark and its label.
const TICK_LENGTH_PT: f32 = 3.5;

/// Upper limit on the number of ticks along one axis.
const MAX_TICKS: u64 = 9;

fn u8_to_f32(x: u8) -> f32 {
    x as f32 / 255.
}

/// Configuration for [render_rectangles].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Output resolution in dots per inch.
    pub dpi: u32,

    /// Canvas width in inches.
    pub width_in: f32,

    /// Canvas height in inches.
    pub height_in: f32,

    /// Label every vertex with its `(x, y)` coordinates.
    pub show_coords: bool,

    /// Enable debug logging.
    pub debug: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            dpi: 300,
            width_in: 6.4,
            height_in: 4.8,
            show_coords: false,
            debug: false,
        }
    }
}

impl RenderParams {
    /// Return the canvas size in pixels as `(width, height)`.
    pub fn canvas_size(&self) -> (usize, usize) {
        let px = |inches: f32| (inches * self.dpi as f32).round().max(0.) as usize;
        (px(self.width_in), px(self.height_in))
    }

    /// Return the outline stroke width in pixels (one point).
    pub fn stroke_width(&self) -> i32 {
        (self.dpi as f32 / 72.).round().max(1.) as i32
    }

    /// Return the length of tick marks in pixels.
    pub fn tick_length(&self) -> i32 {
        (TICK_LENGTH_PT * self.dpi as f32 / 72.).round().max(1.) as i32
    }

    /// Return the minimum distance in pixels between the plot area and the
    /// canvas edge. This leaves room for tick marks and their labels.
    pub fn padding(&self) -> usize {
        (self.dpi as usize / 2).max(self.stroke_width() as usize + 1)
    }
}

/// Maps data coordinates (y up) to canvas pixel coordinates (y down).
///
/// Both axes share one scale factor, so shapes keep their aspect ratio. The
/// view is centered within the canvas, leaving at least `padding` pixels on
/// each side.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotTransform {
    view: Bounds,
    scale: f64,
    left: f64,
    top: f64,
}

impl PlotTransform {
    pub fn new(
        view: Bounds,
        canvas_width: usize,
        canvas_height: usize,
        padding: usize,
    ) -> PlotTransform {
        let avail_w = canvas_width.saturating_sub(2 * padding).max(1) as f64;
        let avail_h = canvas_height.saturating_sub(2 * padding).max(1) as f64;
        let view_w = view.width().max(1) as f64;
        let view_h = view.height().max(1) as f64;
        let scale = (avail_w / view_w).min(avail_h / view_h);

        PlotTransform {
            view,
            scale,
            left: (canvas_width as f64 - view_w * scale) / 2.,
            top: (canvas_height as f64 - view_h * scale) / 2.,
        }
    }

    /// Return the number of pixels per data unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a point in data coordinates to canvas coordinates.
    pub fn to_canvas(&self, x: f64, y: f64) -> PointF {
        let cx = self.left + (x - self.view.x_min as f64) * self.scale;
        let cy = self.top + (self.view.y_max as f64 - y) * self.scale;
        PointF::from_yx(cy as f32, cx as f32)
    }

    /// Map a point in data coordinates to the nearest canvas pixel.
    pub fn to_pixel(&self, p: Point) -> Point {
        self.to_pixel_f64(p.x as f64, p.y as f64)
    }

    fn to_pixel_f64(&self, x: f64, y: f64) -> Point {
        let pf = self.to_canvas(x, y);
        Point::from_yx(pf.y.round() as i32, pf.x.round() as i32)
    }

    /// Return the corners of the visible region in canvas pixels.
    pub fn frame(&self) -> [Point; 4] {
        let Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.view;
        [
            Point::from_yx(y_min, x_min),
            Point::from_yx(y_max, x_min),
            Point::from_yx(y_max, x_max),
            Point::from_yx(y_min, x_max),
        ]
        .map(|p| self.to_pixel(p))
    }
}

/// Draw a closed polygon outline `width` pixels thick.
fn stroke_polygon(painter: &mut Painter<f32>, points: &[Point], width: i32) {
    let shifted = |dy: i32, dx: i32| -> Vec<Point> {
        points
            .iter()
            .map(|p| Point::from_yx(p.y + dy, p.x + dx))
            .collect()
    };
    let first = -(width - 1) / 2;
    for d in first..first + width {
        painter.draw_polygon(&shifted(d, 0));
        painter.draw_polygon(&shifted(0, d));
    }
}

/// Return the step between ticks on an axis spanning `span` units: the
/// smallest of 1, 2 or 5 times a power of ten giving at most [MAX_TICKS]
/// intervals.
fn tick_step(span: u64) -> i64 {
    let raw = span as f64 / MAX_TICKS as f64;
    if raw <= 1. {
        return 1;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let step = [1., 2., 5.]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10. * magnitude);
    step as i64
}

/// Return the integer tick positions within `[min, max]`.
fn axis_ticks(min: i32, max: i32) -> Vec<i64> {
    let (min, max) = (min as i64, max as i64);
    let step = tick_step((max - min) as u64);
    let mut first = min.div_euclid(step) * step;
    if first < min {
        first += step;
    }
    (0..)
        .map(|i| first + i * step)
        .take_while(|t| *t <= max)
        .collect()
}

/// Plot a set of rectangles.
///
/// Each rectangle is drawn as an outline through its corners in polygon
/// order and labeled with its index at its centroid. The visible region is
/// the bounding box of all corners plus a margin of one unit, framed by axes
/// with integer ticks along the bottom and left edges.
///
/// Returns a (3, height, width) RGB tensor with values in [0, 1].
pub fn render_rectangles(
    rects: &RectangleSet,
    params: &RenderParams,
) -> Result<NdTensor<f32, 3>, RenderError> {
    let view = rects.view_bounds().ok_or(RenderError::EmptyInput)?;
    let (width, height) = params.canvas_size();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas { width, height });
    }

    let transform = PlotTransform::new(view, width, height, params.padding());
    let mut canvas = NdTensor::full([3, height, width], 1.0f32);
    let stroke_width = params.stroke_width();
    let tick_length = params.tick_length();
    let Bounds {
        x_min,
        x_max,
        y_min,
        y_max,
    } = view;
    let x_ticks = axis_ticks(x_min, x_max);
    let y_ticks = axis_ticks(y_min, y_max);

    // Outlines go first so that labels are drawn on top of them.
    {
        let mut painter = Painter::new(canvas.view_mut());

        painter.set_stroke(BLACK.map(u8_to_f32));
        stroke_polygon(&mut painter, &transform.frame(), stroke_width);
        for &x in &x_ticks {
            let base = transform.to_pixel_f64(x as f64, y_min as f64);
            let mark = [base, Point::from_yx(base.y + tick_length, base.x)];
            stroke_polygon(&mut painter, &mark, stroke_width);
        }
        for &y in &y_ticks {
            let base = transform.to_pixel_f64(x_min as f64, y as f64);
            let mark = [base, Point::from_yx(base.y, base.x - tick_length)];
            stroke_polygon(&mut painter, &mark, stroke_width);
        }

        painter.set_stroke(BLUE.map(u8_to_f32));
        for rect in rects.iter() {
            let outline = rect.sorted_vertices().map(|p| transform.to_pixel(p));
            stroke_polygon(&mut painter, &outline, stroke_width);
        }
    }

    let label_scale = glyph_scale(LABEL_FONT_PT, params.dpi);
    let coord_scale = glyph_scale(COORD_FONT_PT, params.dpi);
    let tick_scale = glyph_scale(TICK_FONT_PT, params.dpi);
    let tick_offset = 2. * tick_length as f32;

    for &x in &x_ticks {
        let base = transform.to_canvas(x as f64, y_min as f64);
        draw_text(
            canvas.view_mut(),
            &x.to_string(),
            PointF::from_yx(base.y + tick_offset, base.x),
            TextAnchor::Top,
            tick_scale,
            BLACK.map(u8_to_f32),
        );
    }
    for &y in &y_ticks {
        let base = transform.to_canvas(x_min as f64, y as f64);
        draw_text(
            canvas.view_mut(),
            &y.to_string(),
            PointF::from_yx(base.y, base.x - tick_offset),
            TextAnchor::Right,
            tick_scale,
            BLACK.map(u8_to_f32),
        );
    }

    for (i, rect) in rects.iter().enumerate() {
        let center = rect.centroid();
        draw_text(
            canvas.view_mut(),
            &i.to_string(),
            transform.to_canvas(center.x, center.y),
            TextAnchor::Center,
            label_scale,
            RED.map(u8_to_f32),
        );

        if params.show_coords {
            for p in rect.vertices() {
                draw_text(
                    canvas.view_mut(),
                    &format!("({}, {})", p.x, p.y),
                    transform.to_canvas(p.x as f64, p.y as f64),
                    TextAnchor::Bottom,
                    coord_scale,
                    GREEN.map(u8_to_f32),
                );
            }
        }
    }

    if params.debug {
        crate::log!(
            "Plotted {} rectangles on {}x{} canvas, view x [{}, {}] y [{}, {}], {:.2} px per unit",
            rects.len(),
            width,
            height,
            view.x_min,
            view.x_max,
            view.y_min,
            view.y_max,
            transform.scale(),
        );
    }

    Ok(canvas)
}
