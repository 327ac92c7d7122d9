//! PageVox application: the playback controller and its glue.
//!
//! All controller state lives behind a single event queue; UI keys, speech
//! engine callbacks, and interruption signals are converted to
//! [`controller::ControllerEvent`]s and processed one at a time.

pub mod config;
pub mod controller;
pub mod interruption;
pub mod runtime;
pub mod ui;
