//! Admin scaffolding for axum
//!
//! Given a set of controllers and declarative display rules, adminkit
//! generates a routed tree of List/Create/Read/Update/Delete endpoints on an
//! [`axum::Router`]. The generated admin is headless: every endpoint responds
//! with JSON (items, render rules, navigation menu) for an admin frontend to
//! consume.
//!
//! The pieces compose bottom-up:
//! - [`controller::Controller`] wraps a persistence layer,
//! - [`display::Display`] declares how each CRUD role renders fields,
//! - [`crud::Resource`] binds the two into a set of per-role components,
//! - [`crud::Group`] nests resources (and other groups) into a tree,
//! - [`crud::Admin`] mounts the tree, deriving every endpoint's URL and
//!   name from its position in the hierarchy.

pub mod auth;
pub mod component;
pub mod config;
pub mod controller;
pub mod crud;
pub mod display;
pub mod error;
pub mod tree;
pub mod validate;

pub use auth::{AllowAll, Grant, HeaderRoles, RoleProvider};
pub use component::Role;
pub use config::AdminConfig;
pub use controller::{Controller, FilterInput, FilterSpec, ItemPage, ListQuery};
pub use crud::{Admin, Group, Node, Resource, ViewNode};
pub use display::{Choice, Display, FieldSpec, Rule, Widget};
pub use error::{AdminError, AdminResult, MountError, Problem};
pub use tree::{concat_urls, slugify, MenuNode};
