//! Rejects GraphQL executable documents whose fragments spread each other in a cycle, such as
//! `fragment A on T { ...B } fragment B on T { ...A }`. Inlining those fragments would never
//! terminate, so the document has to be refused before it reaches planning.
//!
//! The check only looks at fragment spreads. Spreads of undefined fragments, unused fragments
//! and everything schema related are left to other validation stages.

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod config;
mod cycle;
mod dependencies;
mod error;

use cynic_parser::ExecutableDocument;

pub use config::Config;
pub use cycle::detect_cycle;
pub use dependencies::{FragmentDependencies, build_dependencies};
pub use error::{Error, Result};

/// Validates `query` with the default [Config].
pub fn validate_no_circular_fragments(query: &str) -> Result<()> {
    CycleValidator::default().validate(query)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CycleValidator {
    config: Config,
}

impl CycleValidator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parses and validates `query`.
    ///
    /// Empty input is accepted as there is nothing to validate. Parsing errors, including a
    /// document with no definition at all, are returned as [Error::Syntax].
    pub fn validate(&self, query: &str) -> Result<()> {
        if query.is_empty() {
            tracing::debug!("empty query, skipping fragment cycle validation");
            return Ok(());
        }

        let document = cynic_parser::parse_executable_document(query)?;

        self.validate_document(&document)
    }

    pub fn validate_document(&self, document: &ExecutableDocument) -> Result<()> {
        let dependencies = build_dependencies(document);

        if dependencies.is_empty() {
            return Ok(());
        }

        tracing::trace!(fragments = dependencies.len(), "checking fragment cycles");

        detect_cycle(&dependencies, self.config.max_fragment_depth)
    }
}
