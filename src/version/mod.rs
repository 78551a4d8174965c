//! Version handling.
//!
//! - [`loose`] - Loose version ordering used for framework bounds
//! - [`local`] - The installer's own VERSION file
//! - [`bindings`] - Latest validated bindings lookup in the release bucket

pub mod bindings;
pub mod local;
pub mod loose;

pub use bindings::{
    bindings_search_prefix, fetch_latest_compatible_binding_version, latest_compatible_version,
    parse_list_page, select_latest, BucketLister, ListPage, S3BucketLister,
};
pub use local::{read_local_version, LocalVersion};
pub use loose::{Component, LooseVersion};
