use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed genre vocabulary. Query-string filters are matched against the
/// variant names ("SciFi", "Drama", ...); unknown values are ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "genre")]
pub enum Genre {
    #[sea_orm(string_value = "action")]
    Action,
    #[sea_orm(string_value = "animation")]
    Animation,
    #[sea_orm(string_value = "comedy")]
    Comedy,
    #[sea_orm(string_value = "drama")]
    Drama,
    #[sea_orm(string_value = "horror")]
    Horror,
    #[sea_orm(string_value = "romance")]
    Romance,
    #[sea_orm(string_value = "sci_fi")]
    SciFi,
    #[sea_orm(string_value = "thriller")]
    Thriller,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    /// Runtime in minutes
    pub duration: i32,
    /// Serialized JSON array of {dateTime, cinema, availableSeats} records.
    /// Kept opaque; never cross-checked against bookings.
    #[sea_orm(column_type = "Text")]
    pub showtimes: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
