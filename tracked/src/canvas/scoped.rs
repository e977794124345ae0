use std::ops::{Deref, DerefMut};

use log::warn;

use crate::canvas::font::FontSpec;
use crate::device::Device;

/// A device with one style property temporarily substituted. The saved value
/// is written back when the guard drops, so it is restored after a failed
/// call and during unwinding alike.
pub(crate) struct Scoped<'a, D: Device, T> {
    device: &'a mut D,
    saved: Option<T>,
    reset: fn(&mut D, T),
}

impl<'a, D: Device> Scoped<'a, D, f64> {
    /// Multiplies the line width by `factor` for the guard's lifetime.
    pub(crate) fn scale_line_width(device: &'a mut D, factor: f64) -> Self {
        let saved = device.line_width();
        device.set_line_width(saved * factor);
        Scoped {
            device,
            saved: Some(saved),
            reset: D::set_line_width,
        }
    }
}

impl<'a, D: Device> Scoped<'a, D, String> {
    /// Multiplies the leading font size by `factor` for the guard's lifetime.
    pub(crate) fn scale_font(device: &'a mut D, factor: f64) -> Self {
        let saved = device.font();
        match FontSpec::parse(&saved) {
            Some(spec) => {
                let scaled = spec.scaled(factor);
                device.set_font(&scaled);
            }
            None => warn!("font {:?} has no leading size, not scaled", saved),
        }
        Scoped {
            device,
            saved: Some(saved),
            reset: |device: &mut D, font: String| device.set_font(&font),
        }
    }
}

impl<D: Device, T> Deref for Scoped<'_, D, T> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.device
    }
}

impl<D: Device, T> DerefMut for Scoped<'_, D, T> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.device
    }
}

impl<D: Device, T> Drop for Scoped<'_, D, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            (self.reset)(&mut *self.device, saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scoped;
    use crate::device::trace::TraceDevice;
    use crate::device::Device;

    #[test]
    fn test_line_width_restored_on_error() {
        let mut device = TraceDevice::new();
        device.set_line_width(1.5);
        device.fail_on("stroke");
        {
            let mut scoped = Scoped::scale_line_width(&mut device, 4.0);
            assert_eq!(scoped.line_width(), 6.0);
            assert!(scoped.stroke().is_err());
        }
        assert_eq!(device.line_width(), 1.5);
    }

    #[test]
    fn test_nested_guards_unwind_in_order() {
        let mut device = TraceDevice::new();
        device.set_font("10px serif");
        {
            let mut width = Scoped::scale_line_width(&mut device, 2.0);
            let mut font = Scoped::scale_font(&mut *width, 3.0);
            assert_eq!(font.font(), "30px serif");
            font.stroke_text("x", 0.0, 0.0, None).unwrap();
        }
        assert_eq!(device.font(), "10px serif");
        assert_eq!(device.line_width(), 1.0);
        let call = device.calls().last().unwrap();
        assert_eq!(call.font, "30px serif");
        assert_eq!(call.line_width, 2.0);
    }

    #[test]
    fn test_unparsable_font_left_alone() {
        let mut device = TraceDevice::new();
        device.set_font("bold 12px serif");
        {
            let scoped = Scoped::scale_font(&mut device, 2.0);
            assert_eq!(scoped.font(), "bold 12px serif");
        }
        assert_eq!(device.font(), "bold 12px serif");
    }
}
