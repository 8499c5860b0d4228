//! SeaORM backend for adminkit
//!
//! [`SeaOrmController`] implements [`adminkit::Controller`] for any entity
//! with a scalar, string-parseable primary key: queries are built with the
//! entity's `find()` chain, mutations map JSON payloads onto `ActiveModel`s,
//! and paging goes through `PaginatorTrait`. [`scaffold`] builds a whole
//! [`adminkit::Resource`] from an entity, deriving display rules from its
//! columns.

pub mod actions;
pub mod controller;
pub mod filters;
pub mod scaffold;

pub use actions::{DeleteSelected, EntityAction};
pub use controller::SeaOrmController;
pub use filters::{ColumnFilter, EntityFilter, SearchFilter, ValueKind};
