//! `SeaORM` Entity for avoirs table (credit notes).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "avoirs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    pub invoice_id: i32,
    pub issue_date: Date,
    /// Always negative.
    pub amount: Decimal,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::factures::Entity",
        from = "Column::InvoiceId",
        to = "super::factures::Column::Id"
    )]
    Factures,
    #[sea_orm(has_many = "super::avoirs_lignes::Entity")]
    AvoirsLignes,
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl Related<super::avoirs_lignes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AvoirsLignes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
