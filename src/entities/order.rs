use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pedido")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_pedido")]
    pub id: i32,
    #[sea_orm(column_name = "id_usuario_mesero")]
    pub waiter_id: i32,
    #[sea_orm(column_name = "fecha_hora_registro")]
    pub registered_at: Option<NaiveDateTime>,
    #[sea_orm(column_name = "estado_actual")]
    pub status: i32,
    #[sea_orm(column_name = "eliminado")]
    pub deleted: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_line::Entity")]
    OrderLine,
}

impl Related<super::order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
