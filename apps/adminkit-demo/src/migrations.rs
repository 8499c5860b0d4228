//! Database migrations for the demo schema

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_tag_kind::Migration),
            Box::new(m20250115_000002_create_tag::Migration),
        ]
    }
}

mod m20250115_000001_create_tag_kind {
    use super::*;

    pub struct Migration;

    // `DeriveMigrationName` names a migration after its source file, which
    // collides when several migrations share one file. Name it explicitly.
    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250115_000001_create_tag_kind"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TagKind::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TagKind::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TagKind::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tag_kind_name")
                        .table(TagKind::Table)
                        .col(TagKind::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TagKind::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TagKind {
        Table,
        Id,
        Name,
    }
}

mod m20250115_000002_create_tag {
    use super::*;

    pub struct Migration;

    // Named explicitly to avoid the shared-file collision described above.
    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250115_000002_create_tag"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tag::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tag::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tag::KindId).integer())
                        .col(ColumnDef::new(Tag::Name).string().not_null())
                        .col(ColumnDef::new(Tag::Rules).text())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tag_kind_id")
                                .from(Tag::Table, Tag::KindId)
                                .to(TagKind::Table, TagKind::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tag_name")
                        .table(Tag::Table)
                        .col(Tag::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tag::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tag {
        Table,
        Id,
        KindId,
        Name,
        Rules,
    }

    #[derive(DeriveIden)]
    enum TagKind {
        Table,
        Id,
    }
}
