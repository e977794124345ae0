use crate::error::Result;
use crate::script::operation::Operation;

/// Splits a script into operations; line numbers are 1-based.
///
/// A line whose first token starts with `#` is a comment, and a lone `#`
/// token ends the line. Any other `#` is operand text, so `fillStyle #f00`
/// keeps its colour.
pub struct ScriptParser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> ScriptParser<'a> {
    pub fn new(source: &'a str) -> Self {
        ScriptParser {
            lines: source.lines().enumerate(),
        }
    }

    pub fn parse_op(&mut self) -> Option<Operation> {
        for (index, line) in self.lines.by_ref() {
            let mut tokens = line.split_whitespace().take_while(|t| *t != "#");
            match tokens.next() {
                Some(op) if !op.starts_with('#') => {
                    let operands = tokens.map(|t| t.to_string()).collect();
                    return Some(Operation::new(index + 1, op.to_string(), operands));
                }
                _ => continue,
            }
        }
        None
    }
}

impl Iterator for ScriptParser<'_> {
    type Item = Operation;

    fn next(&mut self) -> Option<Operation> {
        self.parse_op()
    }
}

pub fn parse_script(source: &str) -> Result<Vec<Operation>> {
    let ops: Vec<Operation> = ScriptParser::new(source).collect();
    for op in ops.iter() {
        if !super::is_known(op.name()) {
            return Err(op.error(format!("unknown operation {:?}", op.name())));
        }
    }
    Ok(ops)
}
