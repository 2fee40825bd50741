use anyhow::Result;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

/// A unit of state that processes one message at a time from a bounded mailbox.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Handle a single message. Returning `Err` stops the actor.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()>;
}

/// Per-instance runtime context handed to [`Actor::handle`].
pub struct Context<A: Actor> {
    addr: Addr<A>,
    stop: bool,
}

impl<A: Actor> Context<A> {
    /// This actor's own address, for scheduling follow-up messages.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use clonify_actors::actor::{self, Actor, Context};
    /// struct Retry { attempts: u8 }
    ///
    /// #[async_trait]
    /// impl Actor for Retry {
    ///     type Msg = ();
    ///     async fn handle(&mut self, _msg: (), ctx: &mut Context<Self>) -> Result<()> {
    ///         self.attempts += 1;
    ///         if self.attempts < 3 {
    ///             ctx.addr().try_send(()).ok();
    ///         } else {
    ///             ctx.stop();
    ///         }
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let actor::ActorHandle { addr, task } = actor::spawn_actor(Retry { attempts: 0 }, 2);
    ///     addr.send(()).await.unwrap();
    ///     drop(addr);
    ///     task.await.unwrap().unwrap();
    /// });
    /// ```
    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Stop once the current message has been handled.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.stop
    }
}

/// Sending side of an actor's mailbox.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

// Manual impl: derive would require `A: Clone`.
impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Wait for mailbox space. Gives the message back if the actor is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Send without waiting. Gives the message back if the mailbox is full or closed.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use clonify_actors::actor::{self, Actor, Context};
    /// struct Sink;
    ///
    /// #[async_trait]
    /// impl Actor for Sink {
    ///     type Msg = String;
    ///     async fn handle(&mut self, _msg: String, _ctx: &mut Context<Self>) -> Result<()> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let reserved = actor::spawn_actor_reserved::<Sink>("sink", 1);
    ///     let addr = reserved.addr();
    ///     addr.try_send("first".into()).unwrap();
    ///     // Not started yet, so the single slot is still taken.
    ///     assert_eq!(addr.try_send("second".into()).unwrap_err(), "second");
    ///     assert_eq!(addr.capacity(), 1);
    /// });
    /// ```
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }

    pub fn capacity(&self) -> usize {
        self.0.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<Result<()>>,
}

/// Spawn an actor with a bounded mailbox.
///
/// The actor stops when `handle` returns `Err` or after `ctx.stop()`. Its
/// [`Context`] holds an address of its own, so dropping the outside handles is
/// not enough.
///
/// ```
/// # use anyhow::Result;
/// # use async_trait::async_trait;
/// # use clonify_actors::actor::{self, Actor, Context};
/// struct ByteCounter(usize);
///
/// #[async_trait]
/// impl Actor for ByteCounter {
///     type Msg = Vec<u8>;
///     async fn handle(&mut self, msg: Vec<u8>, _ctx: &mut Context<Self>) -> Result<()> {
///         self.0 += msg.len();
///         anyhow::ensure!(self.0 <= 4, "too many bytes");
///         Ok(())
///     }
/// }
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let actor::ActorHandle { addr, task } = actor::spawn_actor(ByteCounter(0), 4);
///     addr.send(vec![1, 2, 3]).await.unwrap();
///     addr.send(vec![4, 5]).await.unwrap();
///     assert!(task.await.unwrap().is_err());
/// });
/// ```
pub fn spawn_actor<A: Actor>(actor: A, capacity: usize) -> ActorHandle<A> {
    spawn_actor_with_shutdown(actor, capacity, None)
}

pub fn spawn_actor_with_shutdown<A: Actor>(
    actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    spawn_actor_reserved::<A>("", capacity).start_with_shutdown(actor, shutdown)
}

async fn run_loop<A: Actor>(
    mut actor: A,
    mut rx: mpsc::Receiver<A::Msg>,
    mut ctx: Context<A>,
    shutdown: Option<broadcast::Receiver<()>>,
) -> Result<()> {
    let mut shutdown = shutdown;
    loop {
        let next = match shutdown.as_mut() {
            Some(shutdown_rx) => tokio::select! {
                _ = shutdown_rx.recv() => None,
                msg = rx.recv() => msg,
            },
            None => rx.recv().await,
        };
        let Some(msg) = next else {
            break;
        };
        if let Err(e) = actor.handle(msg, &mut ctx).await {
            tracing::error!(target = "clonify-actors", error = ?e, "actor returned error; stopping");
            return Err(e);
        }
        if ctx.stop {
            break;
        }
    }
    Ok(())
}

/// A mailbox and address created ahead of the actor itself, so that actors
/// can be wired to each other before any of them runs.
pub struct Reserved<A: Actor> {
    name: String,
    addr: Addr<A>,
    rx: mpsc::Receiver<A::Msg>,
}

impl<A: Actor> Reserved<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    pub fn start(self, actor: A) -> ActorHandle<A> {
        self.start_with_shutdown(actor, None)
    }

    pub fn start_with_shutdown(
        self,
        actor: A,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> ActorHandle<A> {
        let Reserved { name, addr, rx } = self;
        let ctx = Context {
            addr: addr.clone(),
            stop: false,
        };
        if !name.is_empty() {
            tracing::debug!(target = "clonify-actors", actor = %name, "actor.start");
        }
        let task = tokio::spawn(run_loop(actor, rx, ctx, shutdown));
        ActorHandle { addr, task }
    }
}

/// Reserve a named mailbox; start it later with [`Reserved::start`].
///
/// ```
/// # use anyhow::Result;
/// # use async_trait::async_trait;
/// # use clonify_actors::actor::{self, Actor, Context};
/// struct Echo(tokio::sync::mpsc::UnboundedSender<String>);
///
/// #[async_trait]
/// impl Actor for Echo {
///     type Msg = String;
///     async fn handle(&mut self, msg: String, ctx: &mut Context<Self>) -> Result<()> {
///         self.0.send(msg)?;
///         ctx.stop();
///         Ok(())
///     }
/// }
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let reserved = actor::spawn_actor_reserved::<Echo>("echo", 4);
///     let addr = reserved.addr();
///     addr.send("queued before start".into()).await.unwrap();
///
///     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
///     let handle = reserved.start(Echo(tx));
///     assert_eq!(rx.recv().await.unwrap(), "queued before start");
///     handle.task.await.unwrap().unwrap();
/// });
/// ```
pub fn spawn_actor_reserved<A: Actor>(name: impl Into<String>, capacity: usize) -> Reserved<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    Reserved {
        name: name.into(),
        addr: Addr(tx),
        rx,
    }
}
