//! `SeaORM` Entity for avoirs_lignes table (credit note lines).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avoirs_lignes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub credit_note_id: i32,
    pub prestation_id: Option<i32>,
    pub label: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::avoirs::Entity",
        from = "Column::CreditNoteId",
        to = "super::avoirs::Column::Id"
    )]
    Avoirs,
    #[sea_orm(
        belongs_to = "super::prestations::Entity",
        from = "Column::PrestationId",
        to = "super::prestations::Column::Id"
    )]
    Prestations,
}

impl Related<super::avoirs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Avoirs.def()
    }
}

impl Related<super::prestations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prestations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
