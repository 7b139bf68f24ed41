//! Partial `UPDATE` statement builder
//!
//! Only columns that were explicitly supplied end up in the `SET` list.
//! Every value goes through `push_bind`; column names are static strings
//! chosen by the store, never request input.

use sqlx::{Encode, Postgres, QueryBuilder, Type};
use uuid::Uuid;

pub struct UpdateBuilder<'a> {
    builder: QueryBuilder<'a, Postgres>,
    columns: usize,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(table: &'static str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {} SET ", table)),
            columns: 0,
        }
    }

    /// Add `column = $n` with `value` bound as parameter `n`.
    pub fn set<T>(&mut self, column: &'static str, value: T) -> &mut Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if self.columns > 0 {
            self.builder.push(", ");
        }
        self.builder.push(column).push(" = ").push_bind(value);
        self.columns += 1;
        self
    }

    /// Like [`set`](Self::set) but skipped when `value` is `None`.
    pub fn set_opt<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    /// Number of columns in the `SET` list so far.
    pub fn len(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0
    }

    /// Close the statement with `WHERE <key> = $n RETURNING <returning>`.
    pub fn finish(
        mut self,
        key: &'static str,
        id: Uuid,
        returning: &'static str,
    ) -> QueryBuilder<'a, Postgres> {
        self.builder
            .push(" WHERE ")
            .push(key)
            .push(" = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(returning);
        self.builder
    }
}
