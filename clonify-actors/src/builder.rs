use crate::actor::{
    Actor, ActorHandle, Addr, Reserved, spawn_actor_reserved, spawn_actor_with_shutdown,
};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;
use std::any::Any;
use std::collections::HashMap;

/// Wires actors together and owns their tasks.
///
/// Addresses are published by name as soon as an actor is reserved or
/// spawned, so later actors can look up earlier ones without constructor
/// plumbing.
pub struct Builder {
    sys: ActorSystem,
    addrs: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            addrs: HashMap::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve an actor's mailbox and publish its `Addr` under `name`.
    pub fn reserve<A: Actor>(&mut self, name: &str, mailbox: usize) -> Reserved<A> {
        let r = spawn_actor_reserved::<A>(name, mailbox);
        self.addrs.insert(name.to_string(), Box::new(r.addr()));
        r
    }

    /// Start a reserved actor and track its task.
    pub fn start_reserved<A: Actor>(&mut self, r: Reserved<A>, actor: A) -> &mut Self {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.track(h);
        self
    }

    /// Spawn an actor right away and publish its `Addr` under `name`.
    pub fn spawn<A: Actor>(&mut self, name: &str, mailbox: usize, actor: A) -> &mut Self {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        self.addrs.insert(name.to_string(), Box::new(h.addr.clone()));
        self.track(h);
        self
    }

    fn track<A: Actor>(&mut self, h: ActorHandle<A>) {
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
    }

    /// Typed address lookup. `None` if the name is unknown or was published
    /// for a different actor type.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>> {
        self.addrs
            .get(name)
            .and_then(|b| b.downcast_ref::<Addr<A>>().cloned())
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.sys.graceful_shutdown().await
    }

    /// Wait for CTRL-C or an internal shutdown signal, then shut down.
    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(target = "clonify-actors", "shutdown.ctrl_c");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!(target = "clonify-actors", "shutdown.requested");
            }
        }
        // Published addresses would keep mailboxes open.
        self.addrs.clear();
        self.sys.graceful_shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Context;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Actor for Noop {
        type Msg = ();
        async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) -> Result<()> {
            Ok(())
        }
    }

    struct Other;

    #[async_trait]
    impl Actor for Other {
        type Msg = u8;
        async fn handle(&mut self, _msg: u8, _ctx: &mut Context<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn reserved_addr_is_published_before_start() {
        let mut b = Builder::new();
        let r = b.reserve::<Noop>("noop", 4);
        assert!(b.addr::<Noop>("noop").is_some());
        assert!(b.addr::<Other>("noop").is_none());
        assert!(b.addr::<Noop>("missing").is_none());
        b.start_reserved(r, Noop);
        b.graceful_shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn internal_signal_ends_run() {
        let mut b = Builder::new();
        b.spawn("other", 4, Other);
        let handle = b.shutdown_handle();
        let run = tokio::spawn(b.run_until_ctrl_c());
        // The run task subscribes on first poll, so keep signalling until it ends.
        while !run.is_finished() {
            handle.signal();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        run.await.unwrap().unwrap();
    }
}
