use std::num::NonZeroUsize;

const DEFAULT_MAX_FRAGMENT_DEPTH: NonZeroUsize = match NonZeroUsize::new(512) {
    Some(depth) => depth,
    None => NonZeroUsize::MIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How many fragments can be spread into each other before the document is rejected.
    /// 512 by default.
    pub max_fragment_depth: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_fragment_depth: DEFAULT_MAX_FRAGMENT_DEPTH,
        }
    }
}

impl Config {
    pub fn with_max_fragment_depth(mut self, max_fragment_depth: NonZeroUsize) -> Self {
        self.max_fragment_depth = max_fragment_depth;
        self
    }
}
