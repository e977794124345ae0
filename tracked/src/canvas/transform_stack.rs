use crate::error::{Result, TrackError};
use crate::geom::Matrix;

/// Save/restore-scoped sequence of transforms. Never empty; the last element
/// is the active transform.
#[derive(Debug, Clone)]
pub struct TransformStack {
    frames: Vec<Matrix>,
}

impl TransformStack {
    pub fn new() -> Self {
        TransformStack {
            frames: vec![Matrix::identity()],
        }
    }

    pub fn current(&self) -> &Matrix {
        // frames is never empty, see pop
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Matrix {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn push(&mut self) {
        let top = *self.current();
        self.frames.push(top);
    }

    pub fn pop(&mut self) -> Result<Matrix> {
        if self.frames.len() == 1 {
            return Err(TrackError::StackUnderflow);
        }
        self.frames.pop().ok_or(TrackError::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
