//! Server-side HTML fragments for hierarchical views.
//!
//! Two renderers sit at the core:
//!
//! - [`tree::HtmlTree`]: an expandable tree whose expand/collapse state is
//!   driven by a selection token round-tripped through each request.
//! - [`listing::DirectoryListing`]: a directory table, directories first,
//!   backed by a local directory or a [`listing::filesystem::RemoteSystem`].
//!
//! Both order siblings with [`sort::sort`], an in-place heap sort over an
//! optional locale [`sort::Collator`].

pub mod config;
pub mod encode;
pub mod error;
pub mod events;
pub mod html;
pub mod labels;
pub mod listing;
pub mod request;
pub mod sort;
pub mod tree;

pub use error::{Error, Result};
