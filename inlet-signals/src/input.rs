//! Driver-facing access to one run's input signals.

use std::error::Error as StdError;

use inlet_core::{SignalTable, Variability, VariableDescriptor};
use thiserror::Error;

use crate::{
    events::{EventTimes, find_events},
    sample::{Interpolation, Sample, SampleError, evaluate},
};

/// The seam through which sampled input values reach the simulated model.
///
/// The surrounding driver implements this for whatever native calling
/// convention its model uses; the signal core never sees that convention.
pub trait InputReceiver {
    type Error;

    /// Sets the named input variable to the given value.
    ///
    /// # Errors
    ///
    /// Returns the receiver's own error if the variable cannot be set.
    fn set_input(&mut self, name: &str, value: f64) -> Result<(), Self::Error>;
}

/// Error returned when applying sampled inputs to a receiver.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to set input {name:?}")]
    Receiver {
        name: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Externally supplied input signals, prepared once for a simulation run.
///
/// Construction resolves each column's [`Interpolation`] kind from the
/// variable descriptors, validates the table for sampling, and locates the
/// forced event times up front. Every query afterwards is a pure read, so a
/// driver can share one `InputSignals` across threads and issue thousands
/// of `sample` calls per run without locking.
///
/// # Examples
///
/// ```
/// use inlet_core::{SignalTable, Variability, VariableDescriptor};
/// use inlet_signals::{InputSignals, NO_MORE_EVENTS};
///
/// let table = SignalTable::from_records(
///     ["u", "mode"],
///     [
///         (0.0, vec![0.0, 0.0]),
///         (1.0, vec![2.0, 0.0]),
///         (1.0, vec![2.0, 1.0]),
///         (2.0, vec![4.0, 1.0]),
///     ],
/// )
/// .unwrap();
/// let variables = [
///     VariableDescriptor::new("u", Variability::Continuous),
///     VariableDescriptor::new("mode", Variability::Discrete),
/// ];
///
/// let input = InputSignals::new(table, &variables).unwrap();
///
/// assert_eq!(input.next_event(0.0), 1.0);
/// assert_eq!(input.next_event(1.0), NO_MORE_EVENTS);
///
/// let at_half = input.sample(0.5, false);
/// assert_eq!(at_half[0].value, 1.0); // "u" interpolates
/// assert_eq!(at_half[1].value, 0.0); // "mode" holds
/// ```
#[derive(Debug)]
pub struct InputSignals {
    table: SignalTable,
    kinds: Vec<Interpolation>,
    events: EventTimes,
}

impl InputSignals {
    /// Prepares the signals in `table` for sampling and event queries.
    ///
    /// Columns described as `continuous` (or not described at all)
    /// interpolate linearly; every other variability holds between events.
    /// Only `discrete` columns contribute value-change events.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::EmptyTimeGrid`] if the table has no records.
    /// Shape and time-ordering violations are already rejected when the
    /// table itself is built.
    pub fn new(table: SignalTable, variables: &[VariableDescriptor]) -> Result<Self, SampleError> {
        if table.is_empty() {
            return Err(SampleError::EmptyTimeGrid);
        }

        let kinds = table
            .columns()
            .iter()
            .map(|column| {
                let variability = variables
                    .iter()
                    .find(|variable| variable.name == column.name())
                    .map_or(Variability::Continuous, |variable| variable.variability);
                match variability {
                    Variability::Continuous => Interpolation::Linear,
                    _ => Interpolation::Hold,
                }
            })
            .collect();

        let events = find_events(&table, variables);

        Ok(Self {
            table,
            kinds,
            events,
        })
    }

    /// Returns the column names, in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.columns().iter().map(|column| column.name())
    }

    /// Samples every input variable at `time`, in table column order.
    ///
    /// `after_event` selects the far side of a duplicated timestamp, exactly
    /// as in [`sample_row`](crate::sample_row).
    #[must_use]
    pub fn sample(&self, time: f64, after_event: bool) -> Vec<Sample> {
        let grid = self.table.time().view();
        self.table
            .columns()
            .iter()
            .zip(&self.kinds)
            .map(|(column, &kind)| evaluate(time, grid, column.values().view(), kind, after_event))
            .collect()
    }

    /// Returns the forced event times located in the signal data.
    #[must_use]
    pub fn events(&self) -> &EventTimes {
        &self.events
    }

    /// Returns the first event time strictly after `time`.
    #[must_use]
    pub fn next_event(&self, time: f64) -> f64 {
        self.events.next_after(time)
    }

    /// Samples every input variable at `time` and pushes the values into
    /// `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::Receiver`] wrapping the receiver's error for
    /// the first variable it rejects; later variables are left untouched.
    pub fn apply<R>(
        &self,
        receiver: &mut R,
        time: f64,
        after_event: bool,
    ) -> Result<(), ApplyError>
    where
        R: InputReceiver,
        R::Error: StdError + Send + Sync + 'static,
    {
        for (column, sample) in self.table.columns().iter().zip(self.sample(time, after_event)) {
            receiver
                .set_input(column.name(), sample.value)
                .map_err(|source| ApplyError::Receiver {
                    name: column.name().to_string(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Returns the underlying signal table.
    #[must_use]
    pub fn table(&self) -> &SignalTable {
        &self.table
    }
}
