use log::debug;
use ndarray::Array1;
use thiserror::Error;

/// Errors raised while assembling a [`SignalTable`].
#[derive(Debug, Error)]
pub enum TableError {
    /// A value column's length differs from the time column's length.
    #[error("column {name:?} has {actual} samples but the time column has {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// The time column strictly decreases somewhere.
    #[error("time column decreases at index {index}: {prev} > {next}")]
    DecreasingTime { index: usize, prev: f64, next: f64 },

    /// A record carries a different number of values than the schema has fields.
    #[error("record {index} has {actual} values but the schema has {expected} fields")]
    RecordArity {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// A named column of sample values aligned index-for-index with a table's
/// time column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Array1<f64>,
}

impl Column {
    /// Returns the column's variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sample values.
    #[must_use]
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }
}

/// A time-ordered stream of signal records in columnar form.
///
/// A `SignalTable` holds one time column plus zero or more named value
/// columns of the same length. The time column is non-decreasing; two equal
/// consecutive times are meaningful and denote a sample immediately before
/// an event followed by a sample immediately after it.
///
/// The schema is resolved once at construction, so consumers read columns
/// through accessors instead of looking fields up by name per record.
///
/// # Examples
///
/// ```
/// use inlet_core::SignalTable;
///
/// let mut table = SignalTable::new(vec![0.0, 0.5, 0.5, 1.0]).unwrap();
/// table.try_push_column("u", vec![1.0, 1.0, 2.0, 2.0]).unwrap();
///
/// assert_eq!(table.len(), 4);
/// assert_eq!(table.column("u").unwrap().values()[2], 2.0);
/// assert!(table.column("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    time: Array1<f64>,
    columns: Vec<Column>,
}

impl SignalTable {
    /// Creates a table from its time column.
    ///
    /// An empty time column is allowed here; event location degenerates
    /// gracefully, and sampling rejects it separately.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DecreasingTime`] if any adjacent pair of times
    /// strictly decreases. Equal consecutive times are accepted.
    pub fn new(time: impl Into<Array1<f64>>) -> Result<Self, TableError> {
        let time = time.into();

        for i in 1..time.len() {
            if time[i] < time[i - 1] {
                return Err(TableError::DecreasingTime {
                    index: i,
                    prev: time[i - 1],
                    next: time[i],
                });
            }
        }

        Ok(Self {
            time,
            columns: Vec::new(),
        })
    }

    /// Decodes an ordered record stream into a table.
    ///
    /// `names` lists the value fields of each record, in record order; every
    /// record is a time paired with one value per named field.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RecordArity`] if a record's value count differs
    /// from the schema, or [`TableError::DecreasingTime`] if record times
    /// strictly decrease.
    ///
    /// # Examples
    ///
    /// ```
    /// use inlet_core::SignalTable;
    ///
    /// let table = SignalTable::from_records(
    ///     ["u", "mode"],
    ///     [(0.0, vec![0.0, 0.0]), (1.0, vec![0.5, 1.0])],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.columns().len(), 2);
    /// assert_eq!(table.column("mode").unwrap().values()[1], 1.0);
    /// ```
    pub fn from_records<S, N, R>(names: N, records: R) -> Result<Self, TableError>
    where
        S: Into<String>,
        N: IntoIterator<Item = S>,
        R: IntoIterator<Item = (f64, Vec<f64>)>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let mut time = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for (index, (t, values)) in records.into_iter().enumerate() {
            if values.len() != names.len() {
                return Err(TableError::RecordArity {
                    index,
                    expected: names.len(),
                    actual: values.len(),
                });
            }
            time.push(t);
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        debug!(
            "decoded {} records into {} signal columns",
            time.len(),
            names.len()
        );

        let mut table = Self::new(time)?;
        for (name, values) in names.into_iter().zip(columns) {
            table.try_push_column(name, values)?;
        }
        Ok(table)
    }

    /// Attempts to add a named value column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ShapeMismatch`] if the column's length differs
    /// from the time column's length. The column is never truncated or
    /// padded to fit.
    pub fn try_push_column(
        &mut self,
        name: impl Into<String>,
        values: impl Into<Array1<f64>>,
    ) -> Result<(), TableError> {
        let name = name.into();
        let values = values.into();

        if values.len() != self.time.len() {
            return Err(TableError::ShapeMismatch {
                name,
                expected: self.time.len(),
                actual: values.len(),
            });
        }

        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Returns the time column.
    #[must_use]
    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    /// Returns all value columns, in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the value column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns `true` if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
