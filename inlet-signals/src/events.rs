use std::collections::HashSet;

use inlet_core::{SignalTable, VariableDescriptor};
use log::debug;

/// Sentinel appended to every event sequence: no further events.
///
/// The sentinel compares equal to positive infinity with ordinary `==`, so
/// event sequences can be checked against expected slices directly.
pub const NO_MORE_EVENTS: f64 = f64::INFINITY;

/// The ordered time instants at which the input signals force an event.
///
/// Finite entries are strictly increasing and duplicate-free; the sequence
/// always ends with [`NO_MORE_EVENTS`]. A driver steps its solver to each
/// instant in turn so it lands exactly on every signal discontinuity.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTimes {
    times: Vec<f64>,
}

impl EventTimes {
    /// Returns the first event time strictly greater than `time`.
    ///
    /// Falls through to [`NO_MORE_EVENTS`] once every finite event has
    /// passed.
    #[must_use]
    pub fn next_after(&self, time: f64) -> f64 {
        self.times
            .iter()
            .copied()
            .find(|&t| t > time)
            .unwrap_or(NO_MORE_EVENTS)
    }

    /// Returns the full sequence, sentinel included.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    /// Returns an iterator over the sequence, sentinel included.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().copied()
    }
}

impl<'a> IntoIterator for &'a EventTimes {
    type Item = f64;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter().copied()
    }
}

/// Locates the time instants at which a signal table forces an event.
///
/// Two detection rules contribute, and their results are merged into one
/// sorted, duplicate-free sequence terminated by [`NO_MORE_EVENTS`]:
///
/// 1. Two or more consecutive records sharing a time value mark an event at
///    that time, however many records coincide. This catches before/after
///    sample pairs injected upstream to represent a discontinuity in any
///    variable.
/// 2. For each column whose descriptor classifies it as discrete, a value
///    change between consecutive records marks an event at the later
///    record's time. Other columns never contribute through this rule, even
///    if their values jump.
///
/// No event is ever reported at the first record, and a table with fewer
/// than two records yields just the sentinel.
///
/// # Examples
///
/// ```
/// use inlet_core::{SignalTable, Variability, VariableDescriptor};
/// use inlet_signals::{find_events, NO_MORE_EVENTS};
///
/// let table = SignalTable::from_records(
///     ["mode"],
///     [(0.0, vec![0.0]), (0.2, vec![1.0]), (0.4, vec![1.0])],
/// )
/// .unwrap();
/// let variables = [VariableDescriptor::new("mode", Variability::Discrete)];
///
/// let events = find_events(&table, &variables);
/// assert_eq!(events.as_slice(), &[0.2, NO_MORE_EVENTS]);
/// ```
pub fn find_events(table: &SignalTable, variables: &[VariableDescriptor]) -> EventTimes {
    let time = table.time();
    let mut instants = Vec::new();

    for i in 1..time.len() {
        if time[i] == time[i - 1] {
            instants.push(time[i]);
        }
    }

    let discrete: HashSet<&str> = variables
        .iter()
        .filter(|variable| variable.is_discrete())
        .map(|variable| variable.name.as_str())
        .collect();

    for column in table.columns() {
        if !discrete.contains(column.name()) {
            continue;
        }
        let values = column.values();
        for k in 1..values.len() {
            if values[k] != values[k - 1] {
                instants.push(time[k]);
            }
        }
    }

    instants.sort_by(f64::total_cmp);
    instants.dedup();

    debug!("located {} forced input events", instants.len());

    instants.push(NO_MORE_EVENTS);
    EventTimes { times: instants }
}
