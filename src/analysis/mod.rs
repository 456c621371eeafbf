//! Symbol resolution and compiler output parsing
//!
//! Everything here is synchronous and works on an immutable [`Document`].
//! Line scans poll a [`CancellationToken`] so callers can abandon a query.
//!
//! [`Document`]: crate::infra::document::Document
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod classifier;
pub mod definition;
pub mod diagnostics;
pub mod references;
pub mod scope;

pub use classifier::{classify, has_wildcard_suffix};
pub use definition::find_definition;
pub use diagnostics::parse_line;
pub use references::find_references;
pub use scope::locate_scope;

#[cfg(test)]
pub(crate) const PEEK_RULES: &str = include_str!("testdata/peek_rules.yara");
