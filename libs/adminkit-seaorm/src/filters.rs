//! Query filters
//!
//! A filter narrows the list query: it receives the `Select` under
//! construction and the raw value from the query string. Filters also
//! describe their UI input so the frontend can render a search box or a
//! select.

use adminkit::{Choice, FilterInput};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};

/// Narrows a list query for entity `E`.
pub trait EntityFilter<E: EntityTrait>: Send + Sync {
    /// Apply the filter value to the query.
    fn apply(&self, select: Select<E>, value: &str) -> Select<E>;

    /// UI input this filter renders as.
    fn input(&self) -> FilterInput {
        FilterInput::Search
    }
}

/// Case-sensitive substring search across several columns, OR-combined.
pub struct SearchFilter<E: EntityTrait> {
    columns: Vec<E::Column>,
}

impl<E: EntityTrait> SearchFilter<E> {
    pub fn new(columns: Vec<E::Column>) -> Self {
        Self { columns }
    }
}

impl<E: EntityTrait> EntityFilter<E> for SearchFilter<E>
where
    E::Column: Send + Sync,
{
    fn apply(&self, select: Select<E>, value: &str) -> Select<E> {
        let mut condition = Condition::any();
        for column in &self.columns {
            condition = condition.add(column.contains(value));
        }
        select.filter(condition)
    }
}

/// How a [`ColumnFilter`] coerces the raw query-string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Boolean,
}

/// Equality filter on a single column.
///
/// Values arrive as strings; [`ValueKind`] controls how they are typed
/// before comparison. Unparseable values leave the query untouched.
pub struct ColumnFilter<E: EntityTrait> {
    column: E::Column,
    kind: ValueKind,
    choices: Vec<Choice>,
}

impl<E: EntityTrait> ColumnFilter<E> {
    pub fn new(column: E::Column) -> Self {
        Self {
            column,
            kind: ValueKind::Text,
            choices: Vec::new(),
        }
    }

    /// Coerce values to the given kind before comparing.
    #[must_use]
    pub fn coerce(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Fixed choice list for the select input.
    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }
}

impl<E: EntityTrait> EntityFilter<E> for ColumnFilter<E>
where
    E::Column: Send + Sync,
{
    fn apply(&self, select: Select<E>, value: &str) -> Select<E> {
        match self.kind {
            ValueKind::Text => select.filter(self.column.eq(value)),
            ValueKind::Integer => match value.parse::<i64>() {
                Ok(parsed) => select.filter(self.column.eq(parsed)),
                Err(_) => {
                    tracing::debug!(value, "ignoring unparseable integer filter value");
                    select
                }
            },
            ValueKind::Boolean => match value {
                "1" | "true" | "on" => select.filter(self.column.eq(true)),
                "0" | "false" | "off" => select.filter(self.column.eq(false)),
                other => {
                    tracing::debug!(value = other, "ignoring unparseable boolean filter value");
                    select
                }
            },
        }
    }

    fn input(&self) -> FilterInput {
        // an empty value means "all"; the component layer skips it
        let mut choices = vec![Choice::new("", "All")];
        choices.extend(self.choices.iter().cloned());
        FilterInput::Select { choices }
    }
}
