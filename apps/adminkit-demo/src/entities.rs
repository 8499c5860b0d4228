//! SeaORM entities for the tagging demo

/// Tag kind lookup table
pub mod tag_kind {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
    #[sea_orm(table_name = "tag_kind")]
    pub struct Model {
        // assigned by the database; payloads never carry it
        #[sea_orm(primary_key)]
        #[serde(skip_deserializing)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::tag::Entity")]
        Tag,
    }

    impl Related<super::tag::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tag.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Tags, each optionally belonging to a kind
pub mod tag {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
    #[sea_orm(table_name = "tag")]
    pub struct Model {
        #[sea_orm(primary_key)]
        #[serde(skip_deserializing)]
        pub id: i32,
        pub kind_id: Option<i32>,
        pub name: String,
        pub rules: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tag_kind::Entity",
            from = "Column::KindId",
            to = "super::tag_kind::Column::Id"
        )]
        TagKind,
    }

    impl Related<super::tag_kind::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::TagKind.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
