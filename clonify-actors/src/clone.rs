use crate::actor::{Actor, Context};
use crate::system::ShutdownHandle;
use crate::CloneMsg;
use anyhow::Result;
use async_trait::async_trait;
use clonify_web::{Cloner, download, preview};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Owns the [`Cloner`] and every side effect that touches the network or the
/// filesystem, so the UI actor never blocks on I/O.
pub struct CloneActor {
    cloner: Cloner,
    download_dir: PathBuf,
    shutdown: Option<broadcast::Receiver<()>>,
}

impl CloneActor {
    pub fn new(cloner: Cloner, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            cloner,
            download_dir: download_dir.into(),
            shutdown: None,
        }
    }

    /// Abandon an in-flight fetch when `shutdown` fires instead of holding up
    /// teardown until the proxy answers or times out.
    pub fn with_shutdown(mut self, shutdown: &ShutdownHandle) -> Self {
        self.shutdown = Some(shutdown.subscribe());
        self
    }
}

#[async_trait]
impl Actor for CloneActor {
    type Msg = CloneMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            CloneMsg::Clone { url, reply } => {
                let fetch = self.cloner.clone_site(&url);
                let res = match self.shutdown.as_mut() {
                    Some(shutdown) => tokio::select! {
                        res = fetch => res,
                        _ = shutdown.recv() => {
                            tracing::info!(target_url = %url, "clone.cancelled");
                            ctx.stop();
                            return Ok(());
                        }
                    },
                    None => fetch.await,
                };
                // The requester may have gone away; nothing to do then.
                let _ = reply.send(res);
            }
            CloneMsg::Save { site, reply } => {
                let res = download::save_download(&self.download_dir, &site).await;
                if let Err(e) = &res {
                    tracing::warn!(error = %e, dir = %self.download_dir.display(), "download.failed");
                }
                let _ = reply.send(res);
            }
            CloneMsg::WritePreview { html, reply } => {
                let _ = reply.send(preview::write_preview_file(&html).await);
            }
        }
        Ok(())
    }
}
