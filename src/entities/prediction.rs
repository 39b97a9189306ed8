use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prediccion")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_prediccion")]
    pub id: i32,
    #[sea_orm(column_name = "id_producto")]
    pub product_id: i32,
    #[sea_orm(column_name = "fecha_predicha")]
    pub predicted_date: NaiveDate,
    #[sea_orm(column_name = "fecha_generada")]
    pub generated_at: Option<NaiveDateTime>,
    #[sea_orm(column_name = "demanda_prevista")]
    pub predicted_demand: i32,
    #[sea_orm(column_name = "tipo_sugerencia")]
    pub suggestion_type: Option<SuggestionType>,
    #[sea_orm(column_name = "sugerencia_descripcion")]
    pub suggestion_text: Option<String>,
    #[sea_orm(column_name = "aceptado")]
    pub accepted: Option<bool>,
    #[sea_orm(column_name = "id_usuario_accion")]
    pub acted_by: Option<i32>,
    #[sea_orm(column_name = "eliminado")]
    pub deleted: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Restock suggestion attached to each prediction row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    #[sea_orm(string_value = "stock_critico")]
    #[serde(rename = "stock_critico")]
    CriticalStock,
    #[sea_orm(string_value = "incrementar_stock")]
    #[serde(rename = "incrementar_stock")]
    IncreaseStock,
    #[sea_orm(string_value = "mantener_stock")]
    #[serde(rename = "mantener_stock")]
    KeepStock,
    #[sea_orm(string_value = "reducir_stock")]
    #[serde(rename = "reducir_stock")]
    ReduceStock,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::CriticalStock => "stock_critico",
            SuggestionType::IncreaseStock => "incrementar_stock",
            SuggestionType::KeepStock => "mantener_stock",
            SuggestionType::ReduceStock => "reducir_stock",
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
