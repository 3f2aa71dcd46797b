//! # embedded-window
//!
//! Sliding-window statistical feature extraction for embedded ML pipelines.
//!
//! Cuts a labeled multivariate time series into (possibly overlapping)
//! windows, computes eight statistics per axis per window, and aggregates
//! per-sample labels by majority vote with an agreement threshold. The same
//! feature math is available three ways, all derived from one parameter
//! record so training and on-device inference cannot drift:
//!
//! - [`window::Windower`] — offline batch transform over a full dataset;
//! - [`stream::StreamingExtractor`] — incremental, fixed-memory extraction,
//!   one sample at a time;
//! - [`emitter::render`] — a self-contained C++ header implementing the
//!   streaming extractor with all sizes as compile-time constants, ready to
//!   drop into a microcontroller build.
//!
//! # Example
//!
//! ```
//! use embedded_window::prelude::*;
//!
//! let data = Dataset::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1)?;
//! let labels = [0, 0, 0, 1, 1, 1];
//!
//! let mut windower = Windower::new(WindowSpec::new(4, 2.0, 3.0)?);
//! let windows = windower.fit_transform(&data, &labels)?;
//! assert_eq!(windows.labels(), &[0, 1]);
//!
//! // The fitted spec renders to device-ready C++.
//! let source = embedded_window::emitter::render(windower.spec())?;
//! assert!(source.contains("float queue[4];"));
//! # Ok::<(), embedded_window::WindowError>(())
//! ```

pub mod dataset;
pub mod emitter;
pub mod error;
pub mod features;
pub mod stream;
pub mod window;

pub use error::{Result, WindowError};

pub mod prelude {
    pub use crate::dataset::Dataset;
    pub use crate::emitter::{render, render_named, RenderParams};
    pub use crate::error::{Result, WindowError};
    pub use crate::stream::StreamingExtractor;
    pub use crate::window::{StreamLayout, WindowSpec, WindowedSet, Windower};
}
