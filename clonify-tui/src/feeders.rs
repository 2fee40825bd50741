use crate::tui::{TuiActor, TuiMsg};
use clonify_actors::actor::Addr;
use clonify_actors::system::ShutdownHandle;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Spawn the two tasks that drive the UI actor: terminal events and the
/// animation tick. Both end on shutdown.
pub fn spawn_tui_feeders(tui: Addr<TuiActor>, shutdown: ShutdownHandle, tick: Duration) {
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            tokio::select! {
                _ = shutdown_input.recv() => break,
                ev = events.next() => match ev {
                    // Mouse moves arrive in bursts; a full mailbox just drops one.
                    Some(Ok(e @ Event::Mouse(_))) => {
                        let _ = tui_in.try_send(TuiMsg::InputEvent(e));
                    }
                    Some(Ok(e)) => {
                        if tui_in.send(TuiMsg::InputEvent(e)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tui_in.send(TuiMsg::OpError(format!("input: {e}"))).await;
                    }
                    None => break,
                },
            }
        }
    });

    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tui.try_send(TuiMsg::Tick);
                }
            }
        }
    });
}
