//! Lazy row access for query results.
//!
//! A [`Cursor`] owns a prepared statement on the read handle. Rows are pulled
//! from SQLite only while a [`Rows`] iterator is being driven, and calling
//! [`Cursor::rows`] again re-runs the query from the top. Dropping the
//! iterator resets the statement and dropping the cursor finalizes it, so the
//! underlying SQLite resources are released on every exit path.

use rusqlite::{params_from_iter, Connection, Statement};

use crate::error::{Operation, ProviderError, Result};
use crate::models::Pet;
use crate::values::Value;

/// One materialized row: column names paired with their values, in
/// projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Position of `column` within the row.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }

    pub fn get_string(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// Result of a query, bound to the read handle it was prepared on.
pub struct Cursor<'conn> {
    stmt: Statement<'conn>,
    args: Vec<Value>,
    columns: Vec<String>,
}

impl<'conn> Cursor<'conn> {
    pub(crate) fn prepare(conn: &'conn Connection, sql: &str, args: Vec<Value>) -> Result<Self> {
        let stmt = conn
            .prepare(sql)
            .map_err(|err| ProviderError::storage(Operation::Query, err))?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            stmt,
            args,
            columns,
        })
    }

    /// Column names in the order each [`Record`] carries them.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Execute the query and stream its rows. Each call starts over from the
    /// first row.
    pub fn rows(&mut self) -> Result<Rows<'_>> {
        let Self {
            stmt,
            args,
            columns,
        } = self;
        let inner = stmt
            .query(params_from_iter(args.iter()))
            .map_err(|err| ProviderError::storage(Operation::Query, err))?;

        Ok(Rows {
            inner,
            columns,
            finished: false,
        })
    }

    /// Collect every row.
    pub fn records(&mut self) -> Result<Vec<Record>> {
        self.rows()?.collect()
    }

    /// Number of rows the query currently yields.
    pub fn count(&mut self) -> Result<usize> {
        let mut count = 0;
        for row in self.rows()? {
            row?;
            count += 1;
        }
        Ok(count)
    }

    /// Hydrate every row as a [`Pet`]. Requires a projection carrying every
    /// column; anything else is rejected before rows are read.
    pub fn pets(&mut self) -> Result<Vec<Pet>> {
        if let Some(missing) = crate::contract::ALL_COLUMNS
            .iter()
            .find(|column| self.column_index(column).is_none())
        {
            return Err(ProviderError::invalid(
                *missing,
                "column missing from projection",
            ));
        }

        self.rows()?
            .map(|row| Pet::from_record(&row?))
            .collect()
    }
}

/// Streaming view over a running query. Yields each row once, stops at the
/// first storage error.
pub struct Rows<'stmt> {
    inner: rusqlite::Rows<'stmt>,
    columns: &'stmt [String],
    finished: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let row = match self.inner.next() {
            Ok(Some(row)) => row,
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(err) => {
                self.finished = true;
                return Some(Err(ProviderError::storage(Operation::Query, err)));
            }
        };

        let mut fields = Vec::with_capacity(self.columns.len());
        for (index, name) in self.columns.iter().enumerate() {
            match row.get_ref(index) {
                Ok(value) => fields.push((name.clone(), Value::from(value))),
                Err(err) => {
                    self.finished = true;
                    return Some(Err(ProviderError::storage(Operation::Query, err)));
                }
            }
        }
        Some(Ok(Record { fields }))
    }
}
