use crate::canvas::font::FontSpec;
use crate::device::{Device, FillRule, ImagePlacement, LineCap, LineJoin, TextMetrics};
use crate::error::{Result, TrackError};
use crate::geom::Rect;

/// One forwarded call, with the style state that was live when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCall {
    pub name: &'static str,
    pub args: Vec<f64>,
    pub text: Option<String>,
    pub line_width: f64,
    pub font: String,
    pub stroke_style: String,
}

impl DeviceCall {
    pub fn xml(&self) -> String {
        let mut res = format!("<call name=\"{}\"", self.name);
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|v| v.to_string()).collect();
            res.push_str(format!(" args=\"{}\"", args.join(" ")).as_str());
        }
        if let Some(text) = &self.text {
            res.push_str(format!(" text=\"{}\"", escape(text)).as_str());
        }
        match self.name {
            "stroke" | "strokeRect" | "strokeText" => {
                res.push_str(format!(" line_width=\"{}\"", self.line_width).as_str());
            }
            _ => {}
        }
        if self.name.ends_with("Text") {
            res.push_str(format!(" font=\"{}\"", escape(&self.font)).as_str());
        }
        res.push_str(" />\n");
        res
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceGradient {
    pub kind: GradientKind,
    pub args: Vec<f64>,
    pub stops: Vec<(f64, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct TraceState {
    font: String,
    line_width: f64,
    stroke_style: String,
    fill_style: String,
    line_cap: LineCap,
    line_join: LineJoin,
    global_alpha: f64,
}

impl Default for TraceState {
    fn default() -> Self {
        TraceState {
            font: "10px sans-serif".to_string(),
            line_width: 1.0,
            stroke_style: "#000000".to_string(),
            fill_style: "#000000".to_string(),
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            global_alpha: 1.0,
        }
    }
}

/// A device that draws nothing and records every call it receives, keeping
/// canvas-like style state with its own save/restore stack.
#[derive(Debug, Default)]
pub struct TraceDevice {
    calls: Vec<DeviceCall>,
    state: TraceState,
    state_stack: Vec<TraceState>,
    fail_on: Option<&'static str>,
}

impl TraceDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call named `name` fail after being recorded.
    pub fn fail_on(&mut self, name: &'static str) {
        self.fail_on = Some(name);
    }

    pub fn calls(&self) -> &[DeviceCall] {
        self.calls.as_slice()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.iter().map(|c| c.name).collect()
    }

    /// The most recent call with the given name.
    pub fn last(&self, name: &str) -> Option<&DeviceCall> {
        self.calls.iter().rev().find(|c| c.name == name)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn xml(&self) -> String {
        let mut res = String::new();
        res.push_str("<trace>\n");
        for call in self.calls.iter() {
            res.push_str(call.xml().as_str());
        }
        res.push_str("</trace>\n");
        res
    }

    fn record(&mut self, name: &'static str, args: &[f64], text: Option<&str>) -> Result<()> {
        self.calls.push(DeviceCall {
            name,
            args: args.to_vec(),
            text: text.map(|t| t.to_string()),
            line_width: self.state.line_width,
            font: self.state.font.clone(),
            stroke_style: self.state.stroke_style.clone(),
        });
        if self.fail_on == Some(name) {
            return Err(TrackError::Device(format!("{} failed", name)));
        }
        Ok(())
    }
}

impl Device for TraceDevice {
    type Gradient = TraceGradient;
    type Image = TraceImage;
    type ImageData = TraceImageData;

    fn save(&mut self) -> Result<()> {
        self.record("save", &[], None)?;
        self.state_stack.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.record("restore", &[], None)?;
        // an unmatched restore is ignored, as on a canvas
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
        Ok(())
    }

    fn begin_path(&mut self) -> Result<()> {
        self.record("beginPath", &[], None)
    }

    fn close_path(&mut self) -> Result<()> {
        self.record("closePath", &[], None)
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.record("moveTo", &[x, y], None)
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.record("lineTo", &[x, y], None)
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
        self.record("bezierCurveTo", &[cp1x, cp1y, cp2x, cp2y, x, y], None)
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()> {
        self.record("quadraticCurveTo", &[cpx, cpy, x, y], None)
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
        let ccw = if anticlockwise { 1.0 } else { 0.0 };
        self.record("arc", &[x, y, radius, start_angle, end_angle, ccw], None)
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        self.record("arcTo", &[x1, y1, x2, y2, radius], None)
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record("rect", &[x, y, width, height], None)
    }

    fn fill(&mut self, rule: FillRule) -> Result<()> {
        match rule {
            FillRule::NonZero => self.record("fill", &[], None),
            FillRule::EvenOdd => self.record("fill", &[], Some("evenodd")),
        }
    }

    fn stroke(&mut self) -> Result<()> {
        self.record("stroke", &[], None)
    }

    fn clip(&mut self, rule: FillRule) -> Result<()> {
        match rule {
            FillRule::NonZero => self.record("clip", &[], None),
            FillRule::EvenOdd => self.record("clip", &[], Some("evenodd")),
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record("fillRect", &[x, y, width, height], None)
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record("strokeRect", &[x, y, width, height], None)
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record("clearRect", &[x, y, width, height], None)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let mut args = vec![x, y];
        args.extend(max_width);
        self.record("fillText", &args, Some(text))
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let mut args = vec![x, y];
        args.extend(max_width);
        self.record("strokeText", &args, Some(text))
    }

    fn measure_text(&mut self, text: &str) -> Result<TextMetrics> {
        self.record("measureText", &[], Some(text))?;
        // half an em per character is close enough for a device that never rasterizes
        let size = FontSpec::parse(&self.state.font).map_or(10.0, |spec| spec.size);
        Ok(TextMetrics {
            width: text.chars().count() as f64 * size * 0.5,
        })
    }

    fn font(&self) -> String {
        self.state.font.clone()
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
    }

    fn line_width(&self) -> f64 {
        self.state.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        // canvases ignore zero, negative and non-finite widths
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn stroke_style(&self) -> String {
        self.state.stroke_style.clone()
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.state.stroke_style = style.to_string();
    }

    fn fill_style(&self) -> String {
        self.state.fill_style.clone()
    }

    fn set_fill_style(&mut self, style: &str) {
        self.state.fill_style = style.to_string();
    }

    fn set_stroke_gradient(&mut self, gradient: &TraceGradient) {
        self.state.stroke_style = format!("{:?}Gradient", gradient.kind);
    }

    fn set_fill_gradient(&mut self, gradient: &TraceGradient) {
        self.state.fill_style = format!("{:?}Gradient", gradient.kind);
    }

    fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn line_join(&self) -> LineJoin {
        self.state.line_join
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn global_alpha(&self) -> f64 {
        self.state.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<TraceGradient> {
        let args = [x0, y0, x1, y1];
        self.record("createLinearGradient", &args, None)?;
        Ok(TraceGradient {
            kind: GradientKind::Linear,
            args: args.to_vec(),
            stops: Vec::new(),
        })
    }

    fn create_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<TraceGradient> {
        if r0 < 0.0 || r1 < 0.0 {
            return Err(TrackError::Device(format!(
                "negative gradient radius {} {}",
                r0, r1
            )));
        }
        let args = [x0, y0, r0, x1, y1, r1];
        self.record("createRadialGradient", &args, None)?;
        Ok(TraceGradient {
            kind: GradientKind::Radial,
            args: args.to_vec(),
            stops: Vec::new(),
        })
    }

    fn add_color_stop(&mut self, gradient: &mut TraceGradient, offset: f64, color: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(TrackError::Device(format!(
                "color stop offset {} out of range",
                offset
            )));
        }
        gradient.stops.push((offset, color.to_string()));
        Ok(())
    }

    fn draw_image(&mut self, image: &TraceImage, placement: ImagePlacement) -> Result<()> {
        let args = match placement {
            ImagePlacement::SourceOnly { x, y } => vec![x, y],
            ImagePlacement::SourceWithSize(r) => vec![r.x(), r.y(), r.width(), r.height()],
            ImagePlacement::SourceAndDest { source, dest } => vec![
                source.x(),
                source.y(),
                source.width(),
                source.height(),
                dest.x(),
                dest.y(),
                dest.width(),
                dest.height(),
            ],
        };
        self.record("drawImage", &args, Some(image.name.as_str()))
    }

    fn put_image_data(
        &mut self,
        data: &TraceImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Rect>,
    ) -> Result<()> {
        let mut args = vec![dx, dy];
        if let Some(r) = dirty {
            args.extend([r.x(), r.y(), r.width(), r.height()]);
        }
        let size = format!("{}x{}", data.width, data.height);
        self.record("putImageData", &args, Some(size.as_str()))
    }

    fn get_image_data(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<TraceImageData> {
        self.record("getImageData", &[x, y, width, height], None)?;
        let (w, h) = (width.max(0.0) as u32, height.max(0.0) as u32);
        Ok(TraceImageData {
            width: w,
            height: h,
            data: vec![0; (w as usize) * (h as usize) * 4],
        })
    }
}
