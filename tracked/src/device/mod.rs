use crate::error::Result;
use crate::geom::Rect;

pub mod color;
pub mod trace;

/// Stroke style that a device treats as "draw nothing".
pub const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// The argument forms of `drawImage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImagePlacement {
    /// Draw at `(x, y)` with the image's natural size.
    SourceOnly { x: f64, y: f64 },
    /// Draw into the given rectangle.
    SourceWithSize(Rect),
    /// Copy the `source` region of the image into `dest`.
    SourceAndDest { source: Rect, dest: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
}

/// The drawing surface a [`TrackedSurface`](crate::canvas::TrackedSurface)
/// forwards to. Coordinates handed to a device are always surface space.
///
/// Drawing calls may fail; style properties are plain values and setting them
/// never fails, which lets scoped substitutions restore them from `Drop`.
pub trait Device {
    type Gradient;
    type Image;
    type ImageData;

    fn save(&mut self) -> Result<()>;
    fn restore(&mut self) -> Result<()>;

    // path construction
    fn begin_path(&mut self) -> Result<()>;
    fn close_path(&mut self) -> Result<()>;
    fn move_to(&mut self, x: f64, y: f64) -> Result<()>;
    fn line_to(&mut self, x: f64, y: f64) -> Result<()>;
    fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> Result<()>;
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()>;
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()>;
    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()>;
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;

    // painting
    fn fill(&mut self, rule: FillRule) -> Result<()>;
    fn stroke(&mut self) -> Result<()>;
    fn clip(&mut self, rule: FillRule) -> Result<()>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;

    // text
    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()>;
    fn stroke_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()>;
    fn measure_text(&mut self, text: &str) -> Result<TextMetrics>;

    // style state
    fn font(&self) -> String;
    fn set_font(&mut self, font: &str);
    fn line_width(&self) -> f64;
    fn set_line_width(&mut self, width: f64);
    /// CSS text of the stroke paint. Gradient paints report an
    /// implementation-defined description.
    fn stroke_style(&self) -> String;
    fn set_stroke_style(&mut self, style: &str);
    fn fill_style(&self) -> String;
    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_gradient(&mut self, gradient: &Self::Gradient);
    fn set_fill_gradient(&mut self, gradient: &Self::Gradient);
    fn line_cap(&self) -> LineCap;
    fn set_line_cap(&mut self, cap: LineCap);
    fn line_join(&self) -> LineJoin;
    fn set_line_join(&mut self, join: LineJoin);
    fn global_alpha(&self) -> f64;
    fn set_global_alpha(&mut self, alpha: f64);

    // gradients
    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64)
        -> Result<Self::Gradient>;
    fn create_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<Self::Gradient>;
    fn add_color_stop(
        &mut self,
        gradient: &mut Self::Gradient,
        offset: f64,
        color: &str,
    ) -> Result<()>;

    // images
    fn draw_image(&mut self, image: &Self::Image, placement: ImagePlacement) -> Result<()>;
    fn put_image_data(
        &mut self,
        data: &Self::ImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Rect>,
    ) -> Result<()>;
    fn get_image_data(&mut self, x: f64, y: f64, width: f64, height: f64)
        -> Result<Self::ImageData>;
}
