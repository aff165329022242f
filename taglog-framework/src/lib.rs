//! # taglog-framework
//!
//! Tagged terminal logging with a live spinner line that printed messages flow
//! around without clobbering it.
//!
//! ## Overview
//!
//! Messages are built from a list of [`Value`]s, composed into one line and
//! handed to one or more destinations. Every destination owns its own filter,
//! so a console can hide debug chatter while a log file keeps all of it.
//!
//! ## Core Concepts
//!
//! ### Tags
//!
//! A [`Tag`] turns a template with `{}` holes plus values into a prefixed line.
//! The built-in level tags ([`INFO`], [`WARN`], [`ERROR`], ...) prefix a colored
//! level label; the [`tag!`] macro is the short way to use them.
//!
//! ### Destinations
//!
//! - **[`ConsoleSink`]**: one line per message on stdout (or any writer)
//! - **[`FileSink`]**: appends plain text or JSON records to a file
//! - **[`CallbackSink`]**: hands the message to a closure
//! - **[`LiveRenderer`]**: stdout with an animated spinner row below the output
//! - **[`ComposeWriter`]**: fans one message out to a primary plus secondaries
//!
//! ### Filtering
//!
//! [`FilterOptions`] admit messages by `only`/`exclude` lists of level names or
//! regular expressions; [`FilterSpec::custom`] takes any predicate. Styling is
//! stripped before matching.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taglog_framework::{
//!     ComposeWriter, FileSink, INFO, LiveRenderer, SpinnerOptions, tag, values,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> taglog_framework::Result<()> {
//!     let local = tokio::task::LocalSet::new();
//!     local
//!         .run_until(async {
//!             let file = FileSink::new("build.log", true)?;
//!             let mut writer = ComposeWriter::new(LiveRenderer::new()).with(file);
//!
//!             writer.start_spinner("compiling", SpinnerOptions::default())?;
//!             writer.print(&values![tag!(INFO, "step {} done", 1)])?;
//!             writer.stop_spinner(&values!["finished"])?;
//!             Ok::<_, taglog_framework::Error>(())
//!         })
//!         .await
//! }
//! ```
//!
//! ## Spinner scheduling
//!
//! The spinner timer is a [`tokio::task::spawn_local`] task, so a
//! [`LiveRenderer`] animates only inside a [`tokio::task::LocalSet`]. Printing
//! and every other destination work without a runtime.

pub mod error;
pub mod exit_hook;
pub mod filter;
pub mod format;
pub mod live;
pub mod styles;
pub mod tags;
pub mod writer;

pub(crate) mod theme;

// re-export commonly used types
pub use error::{Error, Result};
pub use filter::{FilterOptions, FilterSpec, Matcher, Predicate, Tester, create_tester};
pub use format::{
    InspectOptions, Value, compose, inspect, inspect_with, merge_strings_with_values, stringify,
};
pub use live::{
    CrosstermTerminal, DEFAULT_FALLBACK_WIDTH, DEFAULT_FRAME_SET, FrameSet, LiveRegionState,
    LiveRenderer, RendererDesc, SpinnerOptions, Terminal, frame_set, frame_set_names,
};
pub use tags::{DEBUG, ERROR, INFO, INSPECT, SUCCESS, Tag, WARN, trace};
pub use writer::{
    CallbackSink, ComposeWriter, ConsoleSink, Destination, DestinationId, FileSink,
    compose_writers, print,
};
