use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "detallepedido")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_detalle")]
    pub id: i32,
    #[sea_orm(column_name = "id_pedido")]
    pub order_id: i32,
    #[sea_orm(column_name = "id_producto")]
    pub product_id: i32,
    #[sea_orm(column_name = "cantidad")]
    pub quantity: i32,
    #[sea_orm(column_name = "comentario")]
    pub comment: Option<String>,
    #[sea_orm(column_name = "precio_unitario")]
    pub unit_price: Decimal,
    #[sea_orm(column_name = "eliminado")]
    pub deleted: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
