use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workshops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub company: String,

    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    pub time: String,

    /// online, offline or hybrid
    pub mode: String,

    pub location: Option<String>,

    pub price_cents: i64,

    pub seats: i32,

    /// Live registrations holding a seat. Only changed inside registration transactions.
    #[sea_orm(default_value = 0)]
    pub registered_seats: i32,

    /// automated or manual
    pub registration_mode: String,

    pub image: String,

    /// active, inactive or completed
    pub status: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
