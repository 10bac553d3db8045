pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod region;
pub mod report;
pub mod scale;
pub mod stat;
pub mod types;
pub mod ui;
pub mod view;

pub use cli::{Cli, Commands};
pub use error::{IiveError, Result};
pub use pipeline::{Selection, Session, ViewSnapshot};
pub use ui::{Dashboard, Phase, SilentUi, Ui};
