//! Development seed data

use crate::entities::{tag, tag_kind};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait};

/// Insert a starter set of kinds and tags into an empty database.
pub async fn seed(db: &DatabaseConnection) -> Result<()> {
    if tag_kind::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let color = tag_kind::ActiveModel {
        name: Set("color".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    let shape = tag_kind::ActiveModel {
        name: Set("shape".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (name, kind_id, rules) in [
        ("blue", color.id, Some("hue < 250")),
        ("red", color.id, Some("hue > 340")),
        ("round", shape.id, None),
    ] {
        tag::ActiveModel {
            name: Set(name.to_string()),
            kind_id: Set(Some(kind_id)),
            rules: Set(rules.map(String::from)),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    tracing::info!("seeded demo tags");
    Ok(())
}
