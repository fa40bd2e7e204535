//! Router tunables.

/// Knobs for the support-desk pipeline.
///
/// The defaults reproduce the reference behavior; the ceiling is
/// configurable so the termination guard can be exercised below the natural
/// step count in tests.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Hard ceiling on completed steps; exceeded → the session terminates
    /// after the specialist without review.
    pub max_iterations: u32,
    /// How many trailing transcript messages a specialist sees.
    pub context_window: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            context_window: 2,
        }
    }
}

impl RouterConfig {
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = RouterConfig::default();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.context_window, 2);
    }

    #[test]
    fn builder_overrides() {
        let config = RouterConfig::default()
            .with_max_iterations(2)
            .with_context_window(4);
        assert_eq!(config.max_iterations, 2);
        assert_eq!(config.context_window, 4);
    }
}
