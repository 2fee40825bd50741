use anyhow::Result;
use clonify_actors::{actor::Addr, builder::Builder, clone::CloneActor};
use clonify_config::ClonifyConfig;
use clonify_tui::{SceneConfig, TuiActor, TuiSettings, spawn_tui_feeders};
use std::time::Duration;

use crate::headless::cloner_from_config;

const CLONE_MAILBOX: usize = 64;
const TUI_MAILBOX: usize = 256;

pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }

    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }

    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }
}

pub fn tui_settings(cfg: &ClonifyConfig) -> TuiSettings {
    TuiSettings {
        tick: Duration::from_millis(cfg.ui.tick_ms),
        reveal_ticks: cfg.ui.reveal_ticks.max(1),
        scene: SceneConfig {
            max_particles: cfg.ui.max_particles,
            shapes: cfg.ui.shapes,
            seed: cfg.ui.seed.unwrap_or_else(rand::random),
        },
    }
}

/// Start the clone worker, then the UI on top of it.
pub fn build_from_config(t: &mut Tether, cfg: &ClonifyConfig) -> Result<()> {
    let b = t.builder_mut();
    let shutdown = b.shutdown_handle();

    let r_tui = b.reserve::<TuiActor>("tui:main", TUI_MAILBOX);

    let cloner = cloner_from_config(cfg)?;
    b.spawn(
        "clone:main",
        CLONE_MAILBOX,
        CloneActor::new(cloner, cfg.download.dir.clone()).with_shutdown(&shutdown),
    );
    let clone_addr: Addr<CloneActor> = b
        .addr("clone:main")
        .ok_or_else(|| anyhow::anyhow!("clone actor was not published"))?;

    let settings = tui_settings(cfg);
    let tui = TuiActor::new(clone_addr, settings, shutdown.clone())?;
    let tui_addr = r_tui.addr();
    b.start_reserved(r_tui, tui);
    spawn_tui_feeders(tui_addr, shutdown, settings.tick);

    tracing::info!(endpoint = %cfg.proxy.endpoint, "app.wired");
    Ok(())
}

pub async fn run_tui(cfg: &ClonifyConfig) -> Result<()> {
    let mut tether = Tether::new();
    build_from_config(&mut tether, cfg)?;
    tether.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut cfg = ClonifyConfig::default();
        cfg.ui.tick_ms = 25;
        cfg.ui.reveal_ticks = 0;
        cfg.ui.seed = Some(9);
        cfg.ui.max_particles = 40;
        let s = tui_settings(&cfg);
        assert_eq!(s.tick, Duration::from_millis(25));
        assert_eq!(s.reveal_ticks, 1);
        assert_eq!(s.scene.seed, 9);
        assert_eq!(s.scene.max_particles, 40);
    }
}
