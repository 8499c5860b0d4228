//! Admin tree wiring

use crate::entities::{tag, tag_kind};
use adminkit::{Admin, AdminConfig, Display, Group, MountError, Resource};
use adminkit_seaorm::{scaffold, ColumnFilter, DeleteSelected, SearchFilter, SeaOrmController, ValueKind};
use axum::Router;
use sea_orm::{DatabaseConnection, Order};
use serde_json::json;
use std::sync::Arc;

/// Build the routed admin tree: Admin -> Tagging -> { Tag Kind, Tag }.
pub fn build_admin(db: Arc<DatabaseConnection>, config: AdminConfig) -> Result<Router, MountError> {
    let tag_controller = SeaOrmController::<tag::Entity, tag::ActiveModel>::new(db.clone(), "Tag")
        .with_default_order(tag::Column::Name, Order::Asc)
        .filter(
            "search",
            SearchFilter::new(vec![tag::Column::Name, tag::Column::Rules]),
        )
        .filter(
            "kind",
            ColumnFilter::new(tag::Column::KindId).coerce(ValueKind::Integer),
        )
        .action("delete selected", DeleteSelected);

    let tags = Resource::new("Tag", Arc::new(tag_controller))
        .with_display(Display::scaffold(&scaffold::field_specs::<tag::Entity>()))
        .with_schema(tag_schema());

    let kinds = scaffold::resource::<tag_kind::Entity, tag_kind::ActiveModel>(db);

    let root = Group::new("Admin").register(Group::new("Tagging").register(kinds).register(tags));
    Admin::new(root).with_config(config).into_router()
}

fn tag_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "minLength": 1 },
            "kind_id": { "type": ["integer", "null"] },
            "rules": { "type": ["string", "null"] }
        },
        "required": ["name"]
    })
}
