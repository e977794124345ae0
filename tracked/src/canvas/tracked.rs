use log::{info, warn};

use crate::canvas::config::{TrackerConfig, UnderflowPolicy};
use crate::canvas::debug::{draw_controls, DebugSegment, DebugStyle};
use crate::canvas::pen::PenState;
use crate::canvas::scoped::Scoped;
use crate::canvas::transform_stack::TransformStack;
use crate::device::{Device, FillRule, ImagePlacement, LineCap, LineJoin, TextMetrics, TRANSPARENT};
use crate::error::Result;
use crate::geom::coordinate::round_tenth;
use crate::geom::{Matrix, Point, Rect};

/// Wraps a [`Device`] and tracks the transform and pen position on its
/// behalf.
///
/// The device never sees a transform: every coordinate is mapped into
/// surface space before it is forwarded, and line widths and font sizes are
/// scaled for the duration of the calls that use them.
pub struct TrackedSurface<'a, D: Device> {
    device: &'a mut D,
    stack: TransformStack,
    pen: PenState,
    origin: Point,
    show_controls: bool,
    underflow: UnderflowPolicy,
    debug_style: DebugStyle,
}

impl<'a, D: Device> TrackedSurface<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self::with_config(device, TrackerConfig::default())
    }

    pub fn with_config(device: &'a mut D, config: TrackerConfig) -> Self {
        TrackedSurface {
            device,
            stack: TransformStack::new(),
            pen: PenState::default(),
            origin: Point::default(),
            show_controls: config.show_controls,
            underflow: config.underflow,
            debug_style: config.debug_style,
        }
    }

    pub fn device(&self) -> &D {
        &*self.device
    }

    /// Direct access to the wrapped device. Calls made through it bypass
    /// transform and pen tracking.
    pub fn device_mut(&mut self) -> &mut D {
        &mut *self.device
    }

    pub fn current_transform(&self) -> &Matrix {
        self.stack.current()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    pub fn set_show_controls(&mut self, show: bool) {
        self.show_controls = show;
    }

    pub fn set_debug_style(&mut self, style: DebugStyle) {
        self.debug_style = style;
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    /// Offset added to the coordinates reported by [`trace`](Self::trace).
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = Point::new(x, y);
    }

    fn map(&self, x: f64, y: f64) -> Point {
        self.stack.current().apply_to_point(x, y)
    }

    // Radii, widths and font sizes only follow the x scale; a non-uniform
    // scale cannot be expressed on a circle.
    fn scale_factor(&self) -> f64 {
        self.stack.current().a.abs()
    }

    // transform stack

    pub fn save(&mut self) -> Result<()> {
        self.stack.push();
        if let Err(e) = self.device.save() {
            let _ = self.stack.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if let Err(e) = self.stack.pop() {
            match self.underflow {
                UnderflowPolicy::Strict => return Err(e),
                UnderflowPolicy::Lenient => warn!("Transform stack is empty!"),
            }
        }
        self.device.restore()
    }

    pub fn scale(&mut self, x: f64, y: f64) {
        self.stack.current_mut().scale(x, y);
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.stack.current_mut().translate(x, y);
    }

    pub fn rotate(&mut self, angle: f64) {
        self.stack.current_mut().rotate(angle);
    }

    pub fn skew(&mut self, ax: f64, ay: f64) {
        self.stack.current_mut().skew(ax, ay);
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.stack.current_mut().transform(a, b, c, d, e, f);
    }

    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.stack.current_mut().set_transform(a, b, c, d, e, f);
    }

    pub fn reset_transform(&mut self) {
        self.stack.current_mut().reset();
    }

    /// Maps a surface-space point back into logical space.
    pub fn transform_point(&self, x: f64, y: f64) -> Result<Point> {
        Ok(self.stack.current().inverse()?.apply_to_point(x, y))
    }

    /// Maps a logical point into surface space.
    pub fn transform_coordinate(&self, x: f64, y: f64) -> Point {
        self.map(x, y)
    }

    // pen

    /// Moves the tracked pen to a surface-space position. The first move after
    /// `begin_path` also records the path's begin-point.
    pub fn move_pen(&mut self, x: f64, y: f64) {
        self.pen.move_to(x, y);
    }

    /// Draws a crosshair at the pen and returns its position. Assumes a path
    /// has been begun.
    pub fn trace(&mut self) -> Result<Point> {
        let (x, y) = (self.pen.x, self.pen.y);
        info!(
            "{} {}",
            round_tenth(x) + self.origin.x,
            round_tenth(y) + self.origin.y
        );
        self.device.move_to(x - 5.0, y)?;
        self.device.line_to(x + 5.0, y)?;
        self.device.move_to(x, y + 5.0)?;
        self.device.line_to(x, y - 5.0)?;
        self.device.move_to(x, y)?;
        Ok(Point::new(x, y))
    }

    fn draw_overlay(&mut self, debug: Option<&DebugStyle>, segment: DebugSegment) -> Result<()> {
        if debug.is_none() && !self.show_controls {
            return Ok(());
        }
        let style = debug.unwrap_or(&self.debug_style);
        draw_controls(&mut *self.device, &segment, style)
    }

    // path building

    pub fn begin_path(&mut self) -> Result<()> {
        self.pen.begin();
        self.device.begin_path()
    }

    pub fn close_path(&mut self) -> Result<()> {
        self.device.close_path()?;
        let begin = self.pen.begin_point();
        self.move_pen(begin.x, begin.y);
        Ok(())
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        let t = self.map(x, y);
        self.move_pen(t.x, t.y);
        self.device.move_to(t.x, t.y)
    }

    pub fn line_to(&mut self, x: f64, y: f64, debug: Option<&DebugStyle>) -> Result<()> {
        let t = self.map(x, y);
        self.draw_overlay(debug, DebugSegment::line(self.pen.position(), t))?;
        self.device.line_to(t.x, t.y)?;
        self.move_pen(t.x, t.y);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
        debug: Option<&DebugStyle>,
    ) -> Result<()> {
        let t = self.map(x, y);
        let tcp1 = self.map(cp1x, cp1y);
        let tcp2 = self.map(cp2x, cp2y);
        self.draw_overlay(
            debug,
            DebugSegment::cubic(self.pen.position(), tcp1, tcp2, t),
        )?;
        self.device
            .bezier_curve_to(tcp1.x, tcp1.y, tcp2.x, tcp2.y, t.x, t.y)?;
        self.move_pen(t.x, t.y);
        Ok(())
    }

    pub fn quadratic_curve_to(
        &mut self,
        cpx: f64,
        cpy: f64,
        x: f64,
        y: f64,
        debug: Option<&DebugStyle>,
    ) -> Result<()> {
        let t = self.map(x, y);
        let tcp = self.map(cpx, cpy);
        self.draw_overlay(debug, DebugSegment::quadratic(self.pen.position(), tcp, t))?;
        self.device.quadratic_curve_to(tcp.x, tcp.y, t.x, t.y)?;
        self.move_pen(t.x, t.y);
        Ok(())
    }

    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()> {
        let t = self.map(x, y);
        let r = radius * self.scale_factor();
        self.arc_mapped(t, r, start_angle, end_angle, anticlockwise)
    }

    // `center`, `radius` and the angles are already in surface space.
    fn arc_mapped(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()> {
        let (cx, cy) = (center.x, center.y);
        self.move_pen(cx + start_angle.cos() * radius, cy + start_angle.sin() * radius);
        self.device
            .arc(cx, cy, radius, start_angle, end_angle, anticlockwise)?;
        let (ex, ey) = (cx + end_angle.cos() * radius, cy + end_angle.sin() * radius);
        self.move_pen(ex, ey);
        // the next segment continues from the arc's end
        self.pen.set_begin(ex, ey);
        Ok(())
    }

    /// Forwards mapped control points; the pen is not moved.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        let t1 = self.map(x1, y1);
        let t2 = self.map(x2, y2);
        let r = radius * self.scale_factor();
        self.device.arc_to(t1.x, t1.y, t2.x, t2.y, r)
    }

    /// Best effort: a unit arc under a local translate/rotate/scale. The
    /// radius is the length of the mapped x axis and the angles turn with
    /// it, so the result is a circle of radius `radius_x` (times the current
    /// scale) and `radius_y` is not represented.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()> {
        self.save()?;
        self.translate(x, y);
        self.rotate(rotation);
        self.scale(radius_x, radius_y);
        let m = *self.stack.current();
        let turn = m.b.atan2(m.a);
        let drawn = self.arc_mapped(
            m.apply_to_point(0.0, 0.0),
            m.a.hypot(m.b),
            start_angle + turn,
            end_angle + turn,
            anticlockwise,
        );
        let restored = self.restore();
        drawn?;
        restored
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let r = self.map_rect(x, y, width, height);
        self.device.rect(r.x(), r.y(), r.width(), r.height())
    }

    fn map_rect(&self, x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect::new(x, y, width, height).transform(self.stack.current())
    }

    // painting

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let r = self.map_rect(x, y, width, height);
        self.device.fill_rect(r.x(), r.y(), r.width(), r.height())
    }

    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let r = self.map_rect(x, y, width, height);
        self.device.clear_rect(r.x(), r.y(), r.width(), r.height())
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let r = self.map_rect(x, y, width, height);
        let factor = self.scale_factor();
        let mut device = Scoped::scale_line_width(&mut *self.device, factor);
        device.stroke_rect(r.x(), r.y(), r.width(), r.height())
    }

    /// Strokes with the line width scaled to the current transform. A fully
    /// transparent stroke style draws nothing and is not forwarded.
    pub fn stroke(&mut self) -> Result<()> {
        if self.device.stroke_style() == TRANSPARENT {
            return Ok(());
        }
        let factor = self.scale_factor();
        let mut device = Scoped::scale_line_width(&mut *self.device, factor);
        device.stroke()
    }

    /// The device closes the path back to its start when filling; the pen
    /// follows it there.
    pub fn fill(&mut self, rule: FillRule) -> Result<()> {
        let begin = self.pen.begin_point();
        self.move_pen(begin.x, begin.y);
        self.device.fill(rule)
    }

    pub fn clip(&mut self, rule: FillRule) -> Result<()> {
        let begin = self.pen.begin_point();
        self.move_pen(begin.x, begin.y);
        self.device.clip(rule)
    }

    // text

    pub fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let t = self.map(x, y);
        let factor = self.scale_factor();
        let mut device = Scoped::scale_font(&mut *self.device, factor);
        device.fill_text(text, t.x, t.y, max_width)
    }

    pub fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<()> {
        let t = self.map(x, y);
        let factor = self.scale_factor();
        let mut width = Scoped::scale_line_width(&mut *self.device, factor);
        let mut device = Scoped::scale_font(&mut *width, factor);
        device.stroke_text(text, t.x, t.y, max_width)
    }

    pub fn measure_text(&mut self, text: &str) -> Result<TextMetrics> {
        self.device.measure_text(text)
    }

    // gradients

    pub fn create_linear_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Result<D::Gradient> {
        let t0 = self.map(x0, y0);
        let t1 = self.map(x1, y1);
        self.device.create_linear_gradient(t0.x, t0.y, t1.x, t1.y)
    }

    pub fn create_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<D::Gradient> {
        let t0 = self.map(x0, y0);
        let t1 = self.map(x1, y1);
        let factor = self.scale_factor();
        self.device
            .create_radial_gradient(t0.x, t0.y, r0 * factor, t1.x, t1.y, r1 * factor)
    }

    pub fn add_color_stop(
        &mut self,
        gradient: &mut D::Gradient,
        offset: f64,
        color: &str,
    ) -> Result<()> {
        self.device.add_color_stop(gradient, offset, color)
    }

    // images

    pub fn draw_image(&mut self, image: &D::Image, placement: ImagePlacement) -> Result<()> {
        let m = self.stack.current();
        let placement = match placement {
            ImagePlacement::SourceOnly { x, y } => {
                let t = m.apply_to_point(x, y);
                ImagePlacement::SourceOnly { x: t.x, y: t.y }
            }
            ImagePlacement::SourceWithSize(r) => ImagePlacement::SourceWithSize(r.transform(m)),
            ImagePlacement::SourceAndDest { source, dest } => ImagePlacement::SourceAndDest {
                source: source.transform(m),
                dest: dest.transform(m),
            },
        };
        self.device.draw_image(image, placement)
    }

    pub fn put_image_data(
        &mut self,
        data: &D::ImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Rect>,
    ) -> Result<()> {
        let m = self.stack.current();
        let d = m.apply_to_point(dx, dy);
        let dirty = dirty.map(|r| r.transform(m));
        self.device.put_image_data(data, d.x, d.y, dirty)
    }

    pub fn get_image_data(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<D::ImageData> {
        self.device.get_image_data(x, y, width, height)
    }

    // style state, read live from the device

    pub fn font(&self) -> String {
        self.device.font()
    }

    pub fn set_font(&mut self, font: &str) {
        self.device.set_font(font);
    }

    pub fn line_width(&self) -> f64 {
        self.device.line_width()
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.device.set_line_width(width);
    }

    pub fn stroke_style(&self) -> String {
        self.device.stroke_style()
    }

    pub fn set_stroke_style(&mut self, style: &str) {
        self.device.set_stroke_style(style);
    }

    pub fn fill_style(&self) -> String {
        self.device.fill_style()
    }

    pub fn set_fill_style(&mut self, style: &str) {
        self.device.set_fill_style(style);
    }

    pub fn set_stroke_gradient(&mut self, gradient: &D::Gradient) {
        self.device.set_stroke_gradient(gradient);
    }

    pub fn set_fill_gradient(&mut self, gradient: &D::Gradient) {
        self.device.set_fill_gradient(gradient);
    }

    pub fn line_cap(&self) -> LineCap {
        self.device.line_cap()
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.device.set_line_cap(cap);
    }

    pub fn line_join(&self) -> LineJoin {
        self.device.line_join()
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.device.set_line_join(join);
    }

    pub fn global_alpha(&self) -> f64 {
        self.device.global_alpha()
    }

    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.device.set_global_alpha(alpha);
    }
}
