//! Layout providers
//!
//! Group traversal is layout-agnostic; each repository's `layout` name picks
//! the hooks used to map a relative path into it and to decide whether an
//! artifact is present there.

pub mod ports;
pub mod providers;
pub mod registry;

pub use ports::{LayoutHooks, CHECKSUM_EXTENSIONS};
pub use providers::{Maven2Layout, NpmLayout, SuffixLayout};
pub use registry::LayoutRegistry;
