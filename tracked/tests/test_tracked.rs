use std::f64::consts::FRAC_PI_2;

use tracked::canvas::DebugStyle;
use tracked::device::trace::TraceDevice;
use tracked::device::FillRule;
use tracked::script::{parse_script, run};
use tracked::{Matrix, TrackError, TrackedSurface, TrackerConfig, UnderflowPolicy};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_translate_then_scale() {
    init();
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.translate(3.0, 0.0);
    ctx.scale(2.0, 2.0);
    let p = ctx.transform_coordinate(1.0, 0.0);
    assert_eq!((p.x, p.y), (5.0, 0.0));
}

#[test]
fn test_scale_then_translate() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.scale(2.0, 2.0);
    ctx.translate(3.0, 0.0);
    let p = ctx.transform_coordinate(1.0, 0.0);
    assert_eq!((p.x, p.y), (8.0, 0.0));
}

#[test]
fn test_rotation_maps_quarter_turn() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.rotate(FRAC_PI_2);
    let p = ctx.transform_coordinate(1.0, 0.0);
    assert!(close(p.x, 0.0));
    assert!(close(p.y, 1.0));
}

#[test]
fn test_surface_sees_only_mapped_geometry() {
    let mut device = TraceDevice::new();
    {
        let mut ctx = TrackedSurface::new(&mut device);
        ctx.translate(10.0, 20.0);
        ctx.begin_path().unwrap();
        ctx.move_to(0.0, 0.0).unwrap();
        ctx.line_to(5.0, 5.0, None).unwrap();
        ctx.stroke().unwrap();
    }
    assert_eq!(
        device.call_names(),
        vec!["beginPath", "moveTo", "lineTo", "stroke"]
    );
    assert_eq!(device.last("moveTo").unwrap().args, vec![10.0, 20.0]);
    assert_eq!(device.last("lineTo").unwrap().args, vec![15.0, 25.0]);
}

#[test]
fn test_save_restore_reverts_transform() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.translate(1.0, 1.0);
    let before = *ctx.current_transform();
    ctx.save().unwrap();
    ctx.scale(3.0, 3.0);
    ctx.rotate(0.3);
    ctx.restore().unwrap();
    assert_eq!(*ctx.current_transform(), before);
    assert_eq!(ctx.depth(), 1);
}

#[test]
fn test_strict_underflow() {
    let mut device = TraceDevice::new();
    {
        let mut ctx = TrackedSurface::new(&mut device);
        ctx.translate(4.0, 0.0);
        assert_eq!(ctx.restore(), Err(TrackError::StackUnderflow));
        assert_eq!(ctx.current_transform().e, 4.0);
    }
    assert!(device.last("restore").is_none());
}

#[test]
fn test_lenient_underflow() {
    let mut device = TraceDevice::new();
    {
        let config = TrackerConfig::default().underflow(UnderflowPolicy::Lenient);
        let mut ctx = TrackedSurface::with_config(&mut device, config);
        ctx.translate(4.0, 0.0);
        assert!(ctx.restore().is_ok());
        assert_eq!(ctx.depth(), 1);
    }
    assert!(device.last("restore").is_some());
}

#[test]
fn test_inverse_round_trip() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.translate(7.0, -3.0);
    ctx.rotate(0.7);
    ctx.scale(1.5, 0.5);
    let surface = ctx.transform_coordinate(2.0, 9.0);
    let user = ctx.transform_point(surface.x, surface.y).unwrap();
    assert!(close(user.x, 2.0));
    assert!(close(user.y, 9.0));
}

#[test]
fn test_singular_transform_point() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.scale(0.0, 1.0);
    assert_eq!(ctx.transform_point(1.0, 1.0), Err(TrackError::NotInvertible));
}

#[test]
fn test_fill_closes_to_begin_point() {
    let mut device = TraceDevice::new();
    let mut ctx = TrackedSurface::new(&mut device);
    ctx.begin_path().unwrap();
    ctx.move_to(1.0, 2.0).unwrap();
    ctx.line_to(10.0, 2.0, None).unwrap();
    ctx.line_to(10.0, 12.0, None).unwrap();
    ctx.fill(FillRule::NonZero).unwrap();
    let pen = ctx.pen().position();
    assert_eq!((pen.x, pen.y), (1.0, 2.0));
}

#[test]
fn test_debug_overlay_restores_state() {
    let mut device = TraceDevice::new();
    {
        let mut ctx = TrackedSurface::new(&mut device);
        ctx.set_line_width(2.0);
        ctx.begin_path().unwrap();
        ctx.move_to(0.0, 0.0).unwrap();
        let style = DebugStyle::default();
        ctx.quadratic_curve_to(5.0, 5.0, 10.0, 0.0, Some(&style))
            .unwrap();
        assert_eq!(ctx.line_width(), 2.0);
    }
    let names = device.call_names();
    assert!(names.contains(&"save"));
    assert!(names.contains(&"restore"));
    assert_eq!(names.last(), Some(&"quadraticCurveTo"));
}

#[test]
fn test_script_matches_direct_calls() {
    init();
    let source = "
        # a rotated square
        save
        translate 50 50
        rotate 0.5
        beginPath
        rect -5 -5 10 10
        fill
        restore
        beginPath
        moveTo 0 0
        lineTo 1 1
        stroke
    ";
    let mut scripted = TraceDevice::new();
    {
        let ops = parse_script(source).unwrap();
        let mut ctx = TrackedSurface::new(&mut scripted);
        run(&ops, &mut ctx).unwrap();
        assert_eq!(ctx.depth(), 1);
        assert!(ctx.current_transform().is_identity());
    }

    let mut direct = TraceDevice::new();
    {
        let mut ctx = TrackedSurface::new(&mut direct);
        ctx.save().unwrap();
        ctx.translate(50.0, 50.0);
        ctx.rotate(0.5);
        ctx.begin_path().unwrap();
        ctx.rect(-5.0, -5.0, 10.0, 10.0).unwrap();
        ctx.fill(FillRule::NonZero).unwrap();
        ctx.restore().unwrap();
        ctx.begin_path().unwrap();
        ctx.move_to(0.0, 0.0).unwrap();
        ctx.line_to(1.0, 1.0, None).unwrap();
        ctx.stroke().unwrap();
    }
    assert_eq!(scripted.xml(), direct.xml());
}

#[test]
fn test_matrix_is_public() {
    let mut m = Matrix::identity();
    m.translate(2.0, 0.0).scale(3.0, 3.0);
    let p = m.apply_to_point(1.0, 1.0);
    assert_eq!((p.x, p.y), (5.0, 3.0));
}
