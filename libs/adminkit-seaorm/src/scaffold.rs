//! Entity scaffolding
//!
//! Builds a default [`Resource`] straight from an entity: name humanized
//! from the table name, display rules over every non-primary-key column,
//! widgets derived from the SeaORM column types.

use crate::controller::SeaOrmController;
use adminkit::display::humanize;
use adminkit::{Display, FieldSpec, Resource, Widget};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ColumnType, DatabaseConnection,
    EntityName, EntityTrait, IdenStatic, IntoActiveModel, Iterable, PrimaryKeyToColumn,
    PrimaryKeyTrait,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display as FmtDisplay;
use std::str::FromStr;
use std::sync::Arc;

/// Field specs for every non-primary-key column of an entity.
pub fn field_specs<E: EntityTrait>() -> Vec<FieldSpec> {
    let pk_columns: Vec<E::Column> = E::PrimaryKey::iter().map(|key| key.into_column()).collect();
    E::Column::iter()
        .filter(|column| !pk_columns.iter().any(|pk| pk.as_str() == column.as_str()))
        .map(|column| {
            let def = column.def();
            FieldSpec::new(column.as_str(), widget_for(def.get_column_type()))
        })
        .collect()
}

/// Map a SeaORM column type onto an input widget.
fn widget_for(column_type: &ColumnType) -> Widget {
    match column_type {
        ColumnType::Char(_) | ColumnType::String(_) => Widget::Text,
        ColumnType::Text => Widget::TextArea,
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned
        | ColumnType::Float
        | ColumnType::Double
        | ColumnType::Decimal(_) => Widget::Number,
        ColumnType::Boolean => Widget::Checkbox,
        ColumnType::Date
        | ColumnType::Time
        | ColumnType::DateTime
        | ColumnType::Timestamp
        | ColumnType::TimestampWithTimeZone => Widget::DateTime,
        ColumnType::Json | ColumnType::JsonBinary => Widget::Json,
        _ => Widget::Text,
    }
}

/// Build a resource for an entity with scaffolded display rules and a
/// plain controller.
pub fn resource<E, A>(db: Arc<DatabaseConnection>) -> Resource
where
    E: EntityTrait + Default + 'static,
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<A> + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: FromStr,
    <<E::PrimaryKey as PrimaryKeyTrait>::ValueType as FromStr>::Err: FmtDisplay,
{
    let name = humanize(E::default().table_name());
    let fields = field_specs::<E>();
    let controller = SeaOrmController::<E, A>::new(db, name.clone());
    Resource::new(name, Arc::new(controller)).with_display(Display::scaffold(&fields))
}
