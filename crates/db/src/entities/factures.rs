//! `SeaORM` Entity for factures table (invoices).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{InvoiceStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "factures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    pub client_id: i32,
    pub devis_id: Option<i32>,
    pub issue_date: Date,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub due_date: Date,
    /// Stored status. `overdue` is derived on read, never stored.
    pub status: InvoiceStatus,
    pub total: Decimal,
    pub payment_method: Option<PaymentMethod>,
    #[sea_orm(column_type = "Text", nullable)]
    pub payment_terms: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::devis::Entity",
        from = "Column::DevisId",
        to = "super::devis::Column::Id"
    )]
    Devis,
    #[sea_orm(has_many = "super::factures_lignes::Entity")]
    FacturesLignes,
    #[sea_orm(has_many = "super::paiements::Entity")]
    Paiements,
    #[sea_orm(has_many = "super::avoirs::Entity")]
    Avoirs,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::devis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devis.def()
    }
}

impl Related<super::factures_lignes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacturesLignes.def()
    }
}

impl Related<super::paiements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paiements.def()
    }
}

impl Related<super::avoirs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Avoirs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
