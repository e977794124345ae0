//! A line-oriented drawing language using canvas operation names, e.g.
//!
//! ```text
//! translate 10 10
//! scale 2 2
//! beginPath
//! moveTo 0 0
//! lineTo 5 0
//! stroke
//! ```

use log::warn;

use crate::canvas::TrackedSurface;
use crate::device::{Device, FillRule};
use crate::error::Result;

pub mod operation;
pub mod parser;

pub use operation::Operation;
pub use parser::{parse_script, ScriptParser};

const OPERATIONS: &[&str] = &[
    "save",
    "restore",
    "translate",
    "scale",
    "rotate",
    "skew",
    "transform",
    "setTransform",
    "resetTransform",
    "beginPath",
    "closePath",
    "moveTo",
    "lineTo",
    "bezierCurveTo",
    "quadraticCurveTo",
    "arc",
    "arcTo",
    "ellipse",
    "rect",
    "fillRect",
    "strokeRect",
    "clearRect",
    "fill",
    "stroke",
    "clip",
    "fillText",
    "strokeText",
    "lineWidth",
    "font",
    "strokeStyle",
    "fillStyle",
    "globalAlpha",
    "trace",
    "showControls",
];

pub(crate) fn is_known(name: &str) -> bool {
    OPERATIONS.contains(&name)
}

/// True for operations that only change the tracked transform.
pub fn is_transform(name: &str) -> bool {
    matches!(
        name,
        "save"
            | "restore"
            | "translate"
            | "scale"
            | "rotate"
            | "skew"
            | "transform"
            | "setTransform"
            | "resetTransform"
    )
}

pub fn run<D: Device>(ops: &[Operation], surface: &mut TrackedSurface<'_, D>) -> Result<()> {
    for op in ops {
        if let Err(e) = invoke_operation(op, surface) {
            warn!("line {}: {:?} failed", op.line(), op.name());
            return Err(e);
        }
    }
    Ok(())
}

fn fill_rule(op: &Operation) -> FillRule {
    if op.flag(0, "evenodd") {
        FillRule::EvenOdd
    } else {
        FillRule::NonZero
    }
}

pub fn invoke_operation<D: Device>(op: &Operation, s: &mut TrackedSurface<'_, D>) -> Result<()> {
    match op.name() {
        "save" => s.save(),
        "restore" => s.restore(),
        "translate" => {
            let [x, y] = op.numbers()?;
            s.translate(x, y);
            Ok(())
        }
        "scale" => {
            let [x, y] = op.numbers()?;
            s.scale(x, y);
            Ok(())
        }
        "rotate" => {
            s.rotate(op.number(0)?);
            Ok(())
        }
        "skew" => {
            let [ax, ay] = op.numbers()?;
            s.skew(ax, ay);
            Ok(())
        }
        "transform" => {
            let [a, b, c, d, e, f] = op.numbers()?;
            s.transform(a, b, c, d, e, f);
            Ok(())
        }
        "setTransform" => {
            let [a, b, c, d, e, f] = op.numbers()?;
            s.set_transform(a, b, c, d, e, f);
            Ok(())
        }
        "resetTransform" => {
            s.reset_transform();
            Ok(())
        }
        "beginPath" => s.begin_path(),
        "closePath" => s.close_path(),
        "moveTo" => {
            let [x, y] = op.numbers()?;
            s.move_to(x, y)
        }
        "lineTo" => {
            let [x, y] = op.numbers()?;
            s.line_to(x, y, None)
        }
        "bezierCurveTo" => {
            let [cp1x, cp1y, cp2x, cp2y, x, y] = op.numbers()?;
            s.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y, None)
        }
        "quadraticCurveTo" => {
            let [cpx, cpy, x, y] = op.numbers()?;
            s.quadratic_curve_to(cpx, cpy, x, y, None)
        }
        "arc" => {
            let [x, y, r, start, end] = op.numbers()?;
            s.arc(x, y, r, start, end, op.flag(5, "ccw"))
        }
        "arcTo" => {
            let [x1, y1, x2, y2, r] = op.numbers()?;
            s.arc_to(x1, y1, x2, y2, r)
        }
        "ellipse" => {
            let [x, y, rx, ry, rotation, start, end] = op.numbers()?;
            s.ellipse(x, y, rx, ry, rotation, start, end, op.flag(7, "ccw"))
        }
        "rect" => {
            let [x, y, w, h] = op.numbers()?;
            s.rect(x, y, w, h)
        }
        "fillRect" => {
            let [x, y, w, h] = op.numbers()?;
            s.fill_rect(x, y, w, h)
        }
        "strokeRect" => {
            let [x, y, w, h] = op.numbers()?;
            s.stroke_rect(x, y, w, h)
        }
        "clearRect" => {
            let [x, y, w, h] = op.numbers()?;
            s.clear_rect(x, y, w, h)
        }
        "fill" => s.fill(fill_rule(op)),
        "stroke" => s.stroke(),
        "clip" => s.clip(fill_rule(op)),
        "fillText" => {
            let [x, y] = op.numbers()?;
            s.fill_text(&op.text_from(2)?, x, y, None)
        }
        "strokeText" => {
            let [x, y] = op.numbers()?;
            s.stroke_text(&op.text_from(2)?, x, y, None)
        }
        "lineWidth" => {
            s.set_line_width(op.number(0)?);
            Ok(())
        }
        "font" => {
            s.set_font(&op.text_from(0)?);
            Ok(())
        }
        "strokeStyle" => {
            s.set_stroke_style(&op.text_from(0)?);
            Ok(())
        }
        "fillStyle" => {
            s.set_fill_style(&op.text_from(0)?);
            Ok(())
        }
        "globalAlpha" => {
            s.set_global_alpha(op.number(0)?);
            Ok(())
        }
        "trace" => s.trace().map(|_| ()),
        "showControls" => {
            s.set_show_controls(!op.flag(0, "off"));
            Ok(())
        }
        name => Err(op.error(format!("unknown operation {:?}", name))),
    }
}
