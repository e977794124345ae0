use crate::canvas::debug::DebugStyle;

/// What `restore` does when there is no matching `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderflowPolicy {
    /// Fail with `StackUnderflow` and do not forward the restore.
    #[default]
    Strict,
    /// Keep the bottom transform, log a warning and forward the restore.
    Lenient,
}

#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    pub show_controls: bool,
    pub underflow: UnderflowPolicy,
    pub debug_style: DebugStyle,
}

impl TrackerConfig {
    pub fn show_controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    pub fn underflow(mut self, policy: UnderflowPolicy) -> Self {
        self.underflow = policy;
        self
    }

    pub fn debug_style(mut self, style: DebugStyle) -> Self {
        self.debug_style = style;
        self
    }
}
