//! `SeaORM` Entity for devis table (quotes).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::QuoteStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    pub client_id: i32,
    pub issue_date: Date,
    pub validity_date: Date,
    pub status: QuoteStatus,
    pub total: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub terms: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(has_many = "super::devis_lignes::Entity")]
    DevisLignes,
    #[sea_orm(has_many = "super::factures::Entity")]
    Factures,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::devis_lignes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DevisLignes.def()
    }
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
