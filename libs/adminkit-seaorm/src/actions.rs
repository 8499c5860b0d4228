//! Bulk actions
//!
//! An action runs over a set of primary keys selected in the list view.
//! Implementations get the live connection; the controller maps failures to
//! admin errors.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PrimaryKeyTrait};
use std::fmt::Display;
use std::str::FromStr;

/// A bulk operation over selected items of entity `E`.
#[async_trait]
pub trait EntityAction<E: EntityTrait>: Send + Sync {
    /// Run the action, returning the number of affected items.
    async fn execute(&self, db: &DatabaseConnection, ids: &[String]) -> anyhow::Result<u64>;
}

/// Deletes every selected item.
pub struct DeleteSelected;

#[async_trait]
impl<E> EntityAction<E> for DeleteSelected
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: FromStr,
    <<E::PrimaryKey as PrimaryKeyTrait>::ValueType as FromStr>::Err: Display,
{
    async fn execute(&self, db: &DatabaseConnection, ids: &[String]) -> anyhow::Result<u64> {
        let mut affected = 0;
        for id in ids {
            let key = id
                .parse::<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>()
                .map_err(|e| anyhow::anyhow!("invalid id '{id}': {e}"))?;
            affected += E::delete_by_id(key).exec(db).await?.rows_affected;
        }
        Ok(affected)
    }
}
