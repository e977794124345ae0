use crate::error::{Result, TrackError};

/// Straight (non-premultiplied) colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// Parses any CSS colour: hex, `rgb()`/`rgba()`, `hsl()`/`hwb()` and the
    /// named colours.
    pub fn parse(css: &str) -> Result<Rgba> {
        let parsed = csscolorparser::parse(css)
            .map_err(|e| TrackError::Device(format!("invalid colour {:?}: {}", css, e)))?;
        let [r, g, b, a] = parsed.to_array();
        Ok(Rgba::new(r, g, b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::parse("#000").unwrap(), Rgba::BLACK);
        assert_eq!(Rgba::parse("#ff0000").unwrap(), Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(Rgba::parse("#FFFFFF00").unwrap().a, 0.0);
        assert!(Rgba::parse("#12").is_err());
    }

    #[test]
    fn test_functional() {
        assert_eq!(Rgba::parse("rgba(0, 0, 0, 0)").unwrap(), Rgba::TRANSPARENT);
        let c = Rgba::parse("rgb(200,100,100)").unwrap();
        assert!((c.r - 200.0 / 255.0).abs() < 1e-12);
        assert_eq!(c.a, 1.0);
        assert!(Rgba::parse("rgb(1, 2)").is_err());
    }

    #[test]
    fn test_named() {
        assert_eq!(Rgba::parse("White").unwrap(), Rgba::new(1.0, 1.0, 1.0, 1.0));
        let orange = Rgba::parse("orange").unwrap();
        assert_eq!((orange.r, orange.b), (1.0, 0.0));
        assert!((orange.g - 165.0 / 255.0).abs() < 1e-9);
        assert!(Rgba::parse("rebeccapurple").is_ok());
        assert!(Rgba::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn test_percent_and_hsl() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let c = Rgba::parse("rgb(100%, 0%, 0%)").unwrap();
        assert!((c.r - red.r).abs() < 1e-9 && c.g.abs() < 1e-9);
        let c = Rgba::parse("hsl(0, 100%, 50%)").unwrap();
        assert!((c.r - 1.0).abs() < 1e-9 && c.g.abs() < 1e-9 && c.b.abs() < 1e-9);
    }
}
