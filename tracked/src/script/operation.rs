use crate::error::{Result, TrackError};

/// One script line: an operator name and its whitespace-separated operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    line: usize,
    op: String,
    operands: Vec<String>,
}

impl Operation {
    pub fn new(line: usize, op: String, operands: Vec<String>) -> Self {
        Operation { line, op, operands }
    }

    pub fn name(&self) -> &str {
        &self.op
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn operands(&self) -> &[String] {
        self.operands.as_slice()
    }

    pub fn error(&self, msg: String) -> TrackError {
        TrackError::Script {
            line: self.line,
            msg,
        }
    }

    pub fn number(&self, index: usize) -> Result<f64> {
        let operand = self.operands.get(index).ok_or_else(|| {
            self.error(format!(
                "{:?} can't have enough operands {:?}",
                self.op, self.operands
            ))
        })?;
        operand
            .parse::<f64>()
            .map_err(|_| self.error(format!("{:?} is not a number", operand)))
    }

    pub fn numbers<const N: usize>(&self) -> Result<[f64; N]> {
        let mut values = [0.0; N];
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.number(i)?;
        }
        Ok(values)
    }

    pub fn flag(&self, index: usize, on: &str) -> bool {
        self.operands.get(index).is_some_and(|v| v == on)
    }

    /// Operands from `index` on, joined back with single spaces.
    pub fn text_from(&self, index: usize) -> Result<String> {
        if index >= self.operands.len() {
            return Err(self.error(format!("{:?} is missing its text operand", self.op)));
        }
        Ok(self.operands[index..].join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::Operation;
    use crate::error::TrackError;

    fn op(line: &str) -> Operation {
        let mut parts = line.split_whitespace().map(|s| s.to_string());
        let name = parts.next().unwrap();
        Operation::new(1, name, parts.collect())
    }

    #[test]
    fn test_numbers() {
        let o = op("setTransform 1 0 0 1 5.5 -2");
        assert_eq!(o.numbers::<6>().unwrap(), [1.0, 0.0, 0.0, 1.0, 5.5, -2.0]);
        assert!(o.number(6).is_err());
    }

    #[test]
    fn test_missing_operand() {
        let o = op("moveTo 1");
        assert!(matches!(
            o.numbers::<2>(),
            Err(TrackError::Script { line: 1, .. })
        ));
    }

    #[test]
    fn test_text_from() {
        let o = op("strokeStyle rgba(0, 0, 0, 0)");
        assert_eq!(o.text_from(0).unwrap(), "rgba(0, 0, 0, 0)");
        assert!(o.text_from(4).is_err());
    }
}
