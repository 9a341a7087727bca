#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core heatmap logic (transport-agnostic).
//!
//! Raw lines come in through `heatmap_traits::LineSource`; everything after
//! that lives here.
//!
//! ## Architecture
//!
//! - **Parsing**: `x,y,v` lines → `Measurement` (`measurement` module)
//! - **Grid store**: growable row-major matrix of intensities (`grid` module)
//! - **Session**: grid + last measurement + counters (`session` module)
//! - **Rendering**: inferno colormap, layout, bitmap text (`render`, `colormap`, `font`)
//! - **Export**: CSV and PNG, atomic file writes (`export` module)
//! - **Refresh loop**: poll → apply → render → sleep (`runner` module)
//!
//! Coordinates: `x` is the column, `y` the row; row 0 is drawn at the bottom.

pub mod colormap;
pub mod config;
pub mod conversions;
pub mod error;
pub mod export;
pub mod font;
pub mod grid;
pub mod hw_error;
pub mod measurement;
pub mod mocks;
pub mod render;
pub mod runner;
pub mod session;
pub mod status;
pub mod util;

pub use config::{RenderOptions, RunParams};
pub use error::{CsvError, GridError, HeatmapError, IngestError, ParseError, Report, Result};
pub use grid::Grid;
pub use measurement::Measurement;
pub use render::{Layout, Renderer, load_background};
pub use runner::{Control, Frame, RunSummary, StopReason};
pub use session::{Session, SessionStats};
pub use status::TickOutcome;
