//! Leading-size handling for CSS font shorthands such as `"12px Arial"`.

/// A font string split into its leading size token and the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec<'a> {
    pub size: f64,
    pub unit: &'a str,
    pub family: &'a str,
}

impl<'a> FontSpec<'a> {
    /// Parses `"<number><unit> <family...>"`. Returns `None` when the first
    /// token does not start with a number.
    pub fn parse(font: &'a str) -> Option<Self> {
        let font = font.trim_start();
        let (token, family) = match font.find(char::is_whitespace) {
            Some(pos) => (&font[..pos], font[pos..].trim_start()),
            None => (font, ""),
        };
        let split = token
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(token.len());
        let size = token[..split].parse::<f64>().ok()?;
        Some(FontSpec {
            size,
            unit: &token[split..],
            family,
        })
    }

    /// The same font with its size multiplied by `factor` and rounded to a
    /// whole number.
    pub fn scaled(&self, factor: f64) -> String {
        let size = (self.size * factor).round();
        if self.family.is_empty() {
            format!("{}{}", size, self.unit)
        } else {
            format!("{}{} {}", size, self.unit, self.family)
        }
    }
}
