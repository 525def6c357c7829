//! `SeaORM` entity definitions.
//!
//! One module per table. Line tables keep their own copy of label and price
//! so catalog edits never rewrite history.

pub mod avoirs;
pub mod avoirs_lignes;
pub mod clients;
pub mod devis;
pub mod devis_lignes;
pub mod factures;
pub mod factures_lignes;
pub mod paiements;
pub mod parametres;
pub mod prestations;
pub mod sea_orm_active_enums;
