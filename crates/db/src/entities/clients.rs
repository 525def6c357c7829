//! `SeaORM` Entity for clients table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ClientKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: ClientKind,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub legal_name: Option<String>,
    pub tax_id: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::devis::Entity")]
    Devis,
    #[sea_orm(has_many = "super::factures::Entity")]
    Factures,
}

impl Related<super::devis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devis.def()
    }
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
