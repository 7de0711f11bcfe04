//! Input-signal sampling and event location for simulation drivers.
//!
//! A driver using externally supplied time-series data asks two questions:
//! what is each input variable's value and derivative at a query time, and
//! at which future times does the data itself force a discrete event the
//! solver must land on exactly. The [`sample`]/[`sample_row`] functions
//! answer the first, [`find_events`] the second, and [`InputSignals`] ties
//! both to a prepared [`inlet_core::SignalTable`] for the lifetime of a run.

mod events;
mod input;
mod sample;

pub use events::{EventTimes, NO_MORE_EVENTS, find_events};
pub use input::{ApplyError, InputReceiver, InputSignals};
pub use sample::{Interpolation, Sample, SampleError, sample, sample_row};
