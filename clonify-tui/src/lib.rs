pub mod background;
mod command;
mod feeders;
mod message;
mod reveal;
mod styles;
mod tui;
mod view;

pub use background::SceneConfig;
pub use feeders::spawn_tui_feeders;
pub use tui::{TuiActor, TuiMsg, TuiSettings, restore_terminal};
