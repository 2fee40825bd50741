//! Page acquisition and extraction.
//!
//! - Fetching through a CORS proxy behind the [`PageSource`] trait (`source`)
//! - URL validation and the fetch-then-extract flow (`cloner`)
//! - Regex extraction of inline CSS and JS (`extract`)
//! - External resource listing (`resources`)
//! - Text preview and temp-file preview (`preview`)
//! - Saving the raw markup (`download`)

pub mod cloner;
pub mod download;
pub mod extract;
pub mod preview;
pub mod resources;
pub mod source;

pub use cloner::{ClonedSite, Cloner, validate_url};
pub use extract::{ExtractionResult, extract};
pub use resources::{ResourceKind, ResourceList, ResourceRef, collect_resources};
pub use source::{PageSource, ProxySource};
