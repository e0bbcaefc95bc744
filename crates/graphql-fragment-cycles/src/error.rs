pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Syntax(#[from] cynic_parser::Error),
    #[error("Circular fragment dependency detected: {}", .fragment_path.join(" -> "))]
    CircularFragment { fragment_path: Vec<String> },
    #[error("Fragment chain is nested too deep: reached {depth}, limit is {limit}.")]
    FragmentChainTooDeep { depth: usize, limit: usize },
}

impl Error {
    /// The fragments forming the cycle, starting and ending with the repeated fragment.
    pub fn fragment_path(&self) -> Option<&[String]> {
        match self {
            Error::CircularFragment { fragment_path } => Some(fragment_path),
            Error::Syntax(_) | Error::FragmentChainTooDeep { .. } => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }
}
