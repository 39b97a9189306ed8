use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "combo")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_combo")]
    pub id: i64,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "descripcion")]
    pub description: Option<String>,
    #[sea_orm(column_name = "precio")]
    pub price: Decimal,
    #[sea_orm(column_name = "disponibilidad")]
    pub available: bool,
    #[sea_orm(column_name = "eliminado")]
    pub deleted: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::combo_item::Entity")]
    ComboItem,
}

impl Related<super::combo_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComboItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
