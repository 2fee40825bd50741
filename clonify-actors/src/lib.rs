pub mod actor;
pub mod builder;
pub mod clone;
pub mod system;

use clonify_common::Result;
use clonify_web::ClonedSite;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Requests handled by [`clone::CloneActor`]. Every variant answers on its
/// own oneshot; failures are replied, never fatal to the actor.
pub enum CloneMsg {
    /// Validate `url`, fetch it through the proxy and extract it.
    Clone {
        url: String,
        reply: oneshot::Sender<Result<ClonedSite>>,
    },
    /// Save the raw markup into the configured download directory.
    Save {
        site: Arc<ClonedSite>,
        reply: oneshot::Sender<Result<PathBuf>>,
    },
    /// Write the markup to a temp file for viewing in a browser.
    WritePreview {
        html: String,
        reply: oneshot::Sender<Result<PathBuf>>,
    },
}
