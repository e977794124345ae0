use std::fs::File;
use std::path::Path;

use cairo::{
    Context, FontSlant, FontWeight, Format, Gradient, ImageSurface, LinearGradient, Operator,
    RadialGradient,
};
use log::warn;
use tracked::{
    canvas::font::FontSpec,
    device::{color::Rgba, Device, FillRule, ImagePlacement, LineCap, LineJoin, TextMetrics},
    error::{Result, TrackError},
    geom::Rect,
};

const DEFAULT_FONT: &str = "10px sans-serif";

fn device_error(e: impl std::fmt::Display) -> TrackError {
    TrackError::Device(e.to_string())
}

#[derive(Debug, Clone)]
enum Paint {
    Color { css: String, rgba: Rgba },
    Gradient(Gradient),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color {
            css: "#000000".to_string(),
            rgba: Rgba::BLACK,
        }
    }
}

impl Paint {
    fn css(&self) -> String {
        match self {
            Paint::Color { css, .. } => css.clone(),
            Paint::Gradient(_) => "gradient".to_string(),
        }
    }
}

/// State cairo's own `save`/`restore` does not cover.
#[derive(Debug, Clone)]
struct PaintState {
    font: String,
    fill: Paint,
    stroke: Paint,
    global_alpha: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        PaintState {
            font: DEFAULT_FONT.to_string(),
            fill: Paint::default(),
            stroke: Paint::default(),
            global_alpha: 1.0,
        }
    }
}

/// Renders canvas calls into an ARGB32 image surface. The context keeps an
/// identity matrix; every coordinate it receives is already in surface space.
pub struct CairoDevice {
    context: Context,
    surface: ImageSurface,
    state: PaintState,
    state_stack: Vec<PaintState>,
}

impl CairoDevice {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let surface = ImageSurface::create(Format::ARgb32, width, height).map_err(device_error)?;
        let context = Context::new(&surface).map_err(device_error)?;
        context.set_line_width(1.0);
        Ok(CairoDevice {
            context,
            surface,
            state: PaintState::default(),
            state_stack: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Paints the whole surface with a CSS colour, ignoring the clip.
    pub fn paint_background(&mut self, color: &str) -> Result<()> {
        let rgba = Rgba::parse(color)?;
        self.context.save().map_err(device_error)?;
        self.context.reset_clip();
        self.context.set_source_rgba(rgba.r, rgba.g, rgba.b, rgba.a);
        self.context.paint().map_err(device_error)?;
        self.context.restore().map_err(device_error)
    }

    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.surface.flush();
        let mut file = File::create(path.as_ref())
            .map_err(|e| TrackError::File(format!("{}: {}", path.as_ref().display(), e)))?;
        self.surface.write_to_png(&mut file).map_err(device_error)
    }

    fn set_source(&self, paint: &Paint) -> Result<()> {
        match paint {
            Paint::Color { rgba, .. } => {
                self.context.set_source_rgba(
                    rgba.r,
                    rgba.g,
                    rgba.b,
                    rgba.a * self.state.global_alpha,
                );
                Ok(())
            }
            Paint::Gradient(gradient) => self.context.set_source(gradient).map_err(device_error),
        }
    }

    fn apply_font(&self) {
        let (size, family) = match FontSpec::parse(&self.state.font) {
            Some(spec) => (spec.size, spec.family),
            None => (10.0, "sans-serif"),
        };
        let family = if family.is_empty() { "sans-serif" } else { family };
        self.context
            .select_font_face(family, FontSlant::Normal, FontWeight::Normal);
        self.context.set_font_size(size);
    }

    /// Runs `draw` on a fresh path and puts the caller's path back afterwards;
    /// rectangle and text painting leave the current path alone.
    fn detached<F>(&mut self, draw: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let path = self.context.copy_path().map_err(device_error)?;
        self.context.new_path();
        let drawn = draw(self);
        self.context.new_path();
        self.context.append_path(&path);
        drawn
    }

    fn parse_paint(style: &str) -> Option<Paint> {
        match Rgba::parse(style) {
            Ok(rgba) => Some(Paint::Color {
                css: style.to_string(),
                rgba,
            }),
            Err(e) => {
                warn!("ignore paint {:?}: {}", style, e);
                None
            }
        }
    }
}

impl Device for CairoDevice {
    type Gradient = Gradient;
    type Image = ImageSurface;
    type ImageData = ImageSurface;

    fn save(&mut self) -> Result<()> {
        self.context.save().map_err(device_error)?;
        self.state_stack.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.context.restore().map_err(device_error)?;
        }
        Ok(())
    }

    fn begin_path(&mut self) -> Result<()> {
        self.context.new_path();
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        self.context.close_path();
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.context.move_to(x, y);
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.context.line_to(x, y);
        Ok(())
    }

    fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> Result<()> {
        self.context.curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        Ok(())
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()> {
        let (x0, y0) = if self.context.has_current_point().map_err(device_error)? {
            self.context.current_point().map_err(device_error)?
        } else {
            self.context.move_to(cpx, cpy);
            (cpx, cpy)
        };
        // degree elevation
        let cp1x = x0 + 2.0 / 3.0 * (cpx - x0);
        let cp1y = y0 + 2.0 / 3.0 * (cpy - y0);
        let cp2x = x + 2.0 / 3.0 * (cpx - x);
        let cp2y = y + 2.0 / 3.0 * (cpy - y);
        self.context.curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        Ok(())
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()> {
        if radius < 0.0 {
            return Err(TrackError::Device(format!("negative arc radius {}", radius)));
        }
        if anticlockwise {
            self.context.arc_negative(x, y, radius, start_angle, end_angle);
        } else {
            self.context.arc(x, y, radius, start_angle, end_angle);
        }
        Ok(())
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        if radius < 0.0 {
            return Err(TrackError::Device(format!("negative arc radius {}", radius)));
        }
        if !self.context.has_current_point().map_err(device_error)? {
            self.context.move_to(x1, y1);
        }
        let (x0, y0) = self.context.current_point().map_err(device_error)?;
        let (ux, uy) = (x0 - x1, y0 - y1);
        let (vx, vy) = (x2 - x1, y2 - y1);
        let (lu, lv) = (ux.hypot(uy), vx.hypot(vy));
        let cross = ux * vy - uy * vx;
        if radius == 0.0 || lu == 0.0 || lv == 0.0 || cross.abs() < f64::EPSILON {
            self.context.line_to(x1, y1);
            return Ok(());
        }
        let (ux, uy) = (ux / lu, uy / lu);
        let (vx, vy) = (vx / lv, vy / lv);
        let theta = (ux * vx + uy * vy).clamp(-1.0, 1.0).acos();
        let tangent = radius / (theta / 2.0).tan();
        let (t1x, t1y) = (x1 + ux * tangent, y1 + uy * tangent);
        let (t2x, t2y) = (x1 + vx * tangent, y1 + vy * tangent);
        let (bx, by) = (ux + vx, uy + vy);
        let lb = bx.hypot(by);
        let center = radius / (theta / 2.0).sin();
        let (cx, cy) = (x1 + bx / lb * center, y1 + by / lb * center);
        let start = (t1y - cy).atan2(t1x - cx);
        let end = (t2y - cy).atan2(t2x - cx);
        self.context.line_to(t1x, t1y);
        if cross < 0.0 {
            self.context.arc(cx, cy, radius, start, end);
        } else {
            self.context.arc_negative(cx, cy, radius, start, end);
        }
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.context.rectangle(x, y, width, height);
        Ok(())
    }

    fn fill(&mut self, rule: FillRule) -> Result<()> {
        self.context.set_fill_rule(match rule {
            FillRule::NonZero => cairo::FillRule::Winding,
            FillRule::EvenOdd => cairo::FillRule::EvenOdd,
        });
        self.set_source(&self.state.fill)?;
        self.context.fill_preserve().map_err(device_error)
    }

    fn stroke(&mut self) -> Result<()> {
        self.set_source(&self.state.stroke)?;
        self.context.stroke_preserve().map_err(device_error)
    }

    fn clip(&mut self, rule: FillRule) -> Result<()> {
        self.context.set_fill_rule(match rule {
            FillRule::NonZero => cairo::FillRule::Winding,
            FillRule::EvenOdd => cairo::FillRule::EvenOdd,
        });
        self.context.clip_preserve();
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.detached(|device| {
            device.context.rectangle(x, y, width, height);
            device.context.set_fill_rule(cairo::FillRule::Winding);
            device.set_source(&device.state.fill)?;
            device.context.fill().map_err(device_error)
        })
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.detached(|device| {
            device.context.rectangle(x, y, width, height);
            device.set_source(&device.state.stroke)?;
            device.context.stroke().map_err(device_error)
        })
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.detached(|device| {
            device.context.save().map_err(device_error)?;
            device.context.set_operator(Operator::Clear);
            device.context.rectangle(x, y, width, height);
            let filled = device.context.fill().map_err(device_error);
            device.context.restore().map_err(device_error)?;
            filled
        })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, _max_width: Option<f64>) -> Result<()> {
        self.detached(|device| {
            device.apply_font();
            device.set_source(&device.state.fill)?;
            device.context.move_to(x, y);
            device.context.show_text(text).map_err(device_error)
        })
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64, _max_width: Option<f64>) -> Result<()> {
        self.detached(|device| {
            device.apply_font();
            device.context.move_to(x, y);
            device.context.text_path(text);
            device.set_source(&device.state.stroke)?;
            device.context.stroke().map_err(device_error)
        })
    }

    fn measure_text(&mut self, text: &str) -> Result<TextMetrics> {
        self.apply_font();
        let extents = self.context.text_extents(text).map_err(device_error)?;
        Ok(TextMetrics {
            width: extents.x_advance(),
        })
    }

    fn font(&self) -> String {
        self.state.font.clone()
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
    }

    fn line_width(&self) -> f64 {
        self.context.line_width()
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.context.set_line_width(width);
        }
    }

    fn stroke_style(&self) -> String {
        self.state.stroke.css()
    }

    fn set_stroke_style(&mut self, style: &str) {
        if let Some(paint) = Self::parse_paint(style) {
            self.state.stroke = paint;
        }
    }

    fn fill_style(&self) -> String {
        self.state.fill.css()
    }

    fn set_fill_style(&mut self, style: &str) {
        if let Some(paint) = Self::parse_paint(style) {
            self.state.fill = paint;
        }
    }

    fn set_stroke_gradient(&mut self, gradient: &Gradient) {
        self.state.stroke = Paint::Gradient(gradient.clone());
    }

    fn set_fill_gradient(&mut self, gradient: &Gradient) {
        self.state.fill = Paint::Gradient(gradient.clone());
    }

    fn line_cap(&self) -> LineCap {
        match self.context.line_cap() {
            cairo::LineCap::Round => LineCap::Round,
            cairo::LineCap::Square => LineCap::Square,
            _ => LineCap::Butt,
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.context.set_line_cap(match cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        });
    }

    fn line_join(&self) -> LineJoin {
        match self.context.line_join() {
            cairo::LineJoin::Round => LineJoin::Round,
            cairo::LineJoin::Bevel => LineJoin::Bevel,
            _ => LineJoin::Miter,
        }
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.context.set_line_join(match join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        });
    }

    fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Gradient> {
        let linear = LinearGradient::new(x0, y0, x1, y1);
        Ok((*linear).clone())
    }

    fn create_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<Gradient> {
        if r0 < 0.0 || r1 < 0.0 {
            return Err(TrackError::Device(format!(
                "negative gradient radius {} {}",
                r0, r1
            )));
        }
        let radial = RadialGradient::new(x0, y0, r0, x1, y1, r1);
        Ok((*radial).clone())
    }

    fn add_color_stop(&mut self, gradient: &mut Gradient, offset: f64, color: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(TrackError::Device(format!(
                "color stop offset {} out of range",
                offset
            )));
        }
        let rgba = Rgba::parse(color)?;
        gradient.add_color_stop_rgba(offset, rgba.r, rgba.g, rgba.b, rgba.a);
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageSurface, placement: ImagePlacement) -> Result<()> {
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        let (source, dest) = match placement {
            ImagePlacement::SourceOnly { x, y } => {
                (Rect::new(0.0, 0.0, iw, ih), Rect::new(x, y, iw, ih))
            }
            ImagePlacement::SourceWithSize(dest) => (Rect::new(0.0, 0.0, iw, ih), dest),
            ImagePlacement::SourceAndDest { source, dest } => (source, dest),
        };
        if source.width() == 0.0 || source.height() == 0.0 {
            return Ok(());
        }
        self.detached(|device| {
            let context = &device.context;
            context.save().map_err(device_error)?;
            context.rectangle(dest.x(), dest.y(), dest.width(), dest.height());
            context.clip();
            context.translate(dest.x(), dest.y());
            context.scale(dest.width() / source.width(), dest.height() / source.height());
            context
                .set_source_surface(image, -source.x(), -source.y())
                .map_err(device_error)?;
            let painted = context
                .paint_with_alpha(device.state.global_alpha)
                .map_err(device_error);
            context.restore().map_err(device_error)?;
            painted
        })
    }

    fn put_image_data(
        &mut self,
        data: &ImageSurface,
        dx: f64,
        dy: f64,
        dirty: Option<Rect>,
    ) -> Result<()> {
        self.detached(|device| {
            let context = &device.context;
            context.save().map_err(device_error)?;
            context.reset_clip();
            context.set_operator(Operator::Source);
            if let Some(dirty) = dirty {
                context.rectangle(dx + dirty.x(), dy + dirty.y(), dirty.width(), dirty.height());
                context.clip();
            }
            context
                .set_source_surface(data, dx, dy)
                .map_err(device_error)?;
            let painted = context.paint().map_err(device_error);
            context.restore().map_err(device_error)?;
            painted
        })
    }

    fn get_image_data(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<ImageSurface> {
        let data = ImageSurface::create(
            Format::ARgb32,
            width.round().max(1.0) as i32,
            height.round().max(1.0) as i32,
        )
        .map_err(device_error)?;
        {
            let context = Context::new(&data).map_err(device_error)?;
            context.set_operator(Operator::Source);
            context
                .set_source_surface(&self.surface, -x, -y)
                .map_err(device_error)?;
            context.paint().map_err(device_error)?;
        }
        data.flush();
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::CairoDevice;
    use tracked::device::{Device, FillRule};
    use tracked::TrackedSurface;

    fn pixel(device: &mut CairoDevice, x: f64, y: f64) -> [u8; 4] {
        let mut data = device.get_image_data(x, y, 1.0, 1.0).unwrap();
        let bytes = data.data().unwrap();
        [bytes[0], bytes[1], bytes[2], bytes[3]]
    }

    #[test]
    fn test_fill_rect() {
        let mut device = CairoDevice::new(20, 20).unwrap();
        device.set_fill_style("#ff0000");
        device.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
        // ARGB32 is stored as BGRA on little-endian hosts
        assert_eq!(pixel(&mut device, 5.0, 5.0)[2], 255);
        assert_eq!(pixel(&mut device, 15.0, 15.0)[3], 0);
    }

    #[test]
    fn test_tracked_translate() {
        let mut device = CairoDevice::new(20, 20).unwrap();
        {
            let mut surface = TrackedSurface::new(&mut device);
            surface.set_fill_style("#0000ff");
            surface.translate(10.0, 10.0);
            surface.begin_path().unwrap();
            surface.rect(0.0, 0.0, 10.0, 10.0).unwrap();
            surface.fill(FillRule::NonZero).unwrap();
        }
        assert_eq!(pixel(&mut device, 2.0, 2.0)[3], 0);
        assert_eq!(pixel(&mut device, 15.0, 15.0)[0], 255);
    }

    #[test]
    fn test_style_state_restored() {
        let mut device = CairoDevice::new(4, 4).unwrap();
        device.save().unwrap();
        device.set_line_width(3.0);
        device.set_font("20px serif");
        device.restore().unwrap();
        assert_eq!(device.line_width(), 1.0);
        assert_eq!(device.font(), "10px sans-serif");
        // an unmatched restore is ignored
        assert!(device.restore().is_ok());
    }

    #[test]
    fn test_invalid_style_ignored() {
        let mut device = CairoDevice::new(4, 4).unwrap();
        device.set_stroke_style("not a colour");
        assert_eq!(device.stroke_style(), "#000000");
    }
}
