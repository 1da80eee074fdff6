use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create genre enum
        manager
            .create_type(
                Type::create()
                    .as_enum(Genre::Enum)
                    .values([
                        Genre::Action,
                        Genre::Animation,
                        Genre::Comedy,
                        Genre::Drama,
                        Genre::Horror,
                        Genre::Romance,
                        Genre::SciFi,
                        Genre::Thriller,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Title, 100).not_null())
                    .col(string_len(Movie::Description, 500).not_null())
                    .col(
                        ColumnDef::new(Movie::Genre)
                            .custom(Genre::Enum)
                            .not_null(),
                    )
                    .col(decimal_len(Movie::Price, 18, 2).not_null())
                    .col(integer(Movie::Duration).not_null())
                    // Serialized JSON array of showtime slots, kept opaque
                    .col(text(Movie::Showtimes).not_null())
                    .col(
                        timestamp_with_time_zone(Movie::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Genre::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Movie {
    Table,
    Id,
    Title,
    Description,
    Genre,
    Price,
    Duration,
    Showtimes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Genre {
    #[sea_orm(iden = "genre")]
    Enum,
    #[sea_orm(iden = "action")]
    Action,
    #[sea_orm(iden = "animation")]
    Animation,
    #[sea_orm(iden = "comedy")]
    Comedy,
    #[sea_orm(iden = "drama")]
    Drama,
    #[sea_orm(iden = "horror")]
    Horror,
    #[sea_orm(iden = "romance")]
    Romance,
    #[sea_orm(iden = "sci_fi")]
    SciFi,
    #[sea_orm(iden = "thriller")]
    Thriller,
}
