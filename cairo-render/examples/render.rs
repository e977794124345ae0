use std::f64::consts::PI;

use cairo_render::CairoDevice;
use tracked::canvas::DebugStyle;
use tracked::device::FillRule;
use tracked::{TrackedSurface, TrackerConfig};

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("render.png");

    let mut device = CairoDevice::new(300, 300).unwrap();
    device.paint_background("white").unwrap();
    {
        let config = TrackerConfig::default().show_controls(true);
        let mut ctx = TrackedSurface::with_config(&mut device, config);
        ctx.set_stroke_style("#336699");
        ctx.set_line_width(1.5);

        for i in 0..6 {
            ctx.save().unwrap();
            ctx.translate(150.0, 150.0);
            ctx.rotate(i as f64 * PI / 3.0);
            ctx.scale(2.0, 2.0);
            ctx.begin_path().unwrap();
            ctx.move_to(10.0, 0.0).unwrap();
            ctx.quadratic_curve_to(30.0, -20.0, 50.0, 0.0, None).unwrap();
            ctx.stroke().unwrap();
            ctx.restore().unwrap();
        }

        ctx.translate(150.0, 150.0);
        ctx.set_fill_style("rgba(200, 60, 60, 0.6)");
        ctx.begin_path().unwrap();
        ctx.arc(0.0, 0.0, 12.0, 0.0, 2.0 * PI, false).unwrap();
        ctx.fill(FillRule::NonZero).unwrap();

        let loud = DebugStyle::default();
        ctx.begin_path().unwrap();
        ctx.move_to(-120.0, 120.0).unwrap();
        ctx.bezier_curve_to(-60.0, 60.0, 60.0, 180.0, 120.0, 120.0, Some(&loud))
            .unwrap();
        ctx.stroke().unwrap();

        ctx.set_font("14px sans-serif");
        ctx.fill_text("tracked", -20.0, -120.0, None).unwrap();
    }
    device.write_png(path).unwrap();
    println!("wrote {}", path);
}
