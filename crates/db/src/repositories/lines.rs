//! Line persistence shared by quotes, invoices and credit notes.

use facturo_core::billing::{ComputedLine, LineInput};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::{avoirs_lignes, devis_lignes, factures_lignes};

pub(crate) async fn insert_quote_lines<C>(
    conn: &C,
    quote_id: i32,
    lines: &[ComputedLine],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if lines.is_empty() {
        return Ok(());
    }
    let rows = lines.iter().map(|line| devis_lignes::ActiveModel {
        devis_id: Set(quote_id),
        prestation_id: Set(line.prestation_id.map(i32::from)),
        label: Set(line.label.clone()),
        description: Set(line.description.clone()),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        line_total: Set(line.line_total),
        position: Set(line.position),
        ..Default::default()
    });
    devis_lignes::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub(crate) async fn insert_invoice_lines<C>(
    conn: &C,
    invoice_id: i32,
    lines: &[ComputedLine],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if lines.is_empty() {
        return Ok(());
    }
    let rows = lines.iter().map(|line| factures_lignes::ActiveModel {
        invoice_id: Set(invoice_id),
        prestation_id: Set(line.prestation_id.map(i32::from)),
        label: Set(line.label.clone()),
        description: Set(line.description.clone()),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        line_total: Set(line.line_total),
        position: Set(line.position),
        ..Default::default()
    });
    factures_lignes::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub(crate) async fn insert_credit_note_lines<C>(
    conn: &C,
    credit_note_id: i32,
    lines: &[ComputedLine],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if lines.is_empty() {
        return Ok(());
    }
    let rows = lines.iter().map(|line| avoirs_lignes::ActiveModel {
        credit_note_id: Set(credit_note_id),
        prestation_id: Set(line.prestation_id.map(i32::from)),
        label: Set(line.label.clone()),
        description: Set(line.description.clone()),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        line_total: Set(line.line_total),
        position: Set(line.position),
        ..Default::default()
    });
    avoirs_lignes::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub(crate) async fn delete_quote_lines<C>(conn: &C, quote_id: i32) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = devis_lignes::Entity::delete_many()
        .filter(devis_lignes::Column::DevisId.eq(quote_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete_invoice_lines<C>(conn: &C, invoice_id: i32) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = factures_lignes::Entity::delete_many()
        .filter(factures_lignes::Column::InvoiceId.eq(invoice_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Converts stored lines back to line inputs (quote to invoice copy).
pub(crate) fn quote_lines_as_inputs(lines: &[devis_lignes::Model]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|line| LineInput {
            label: line.label.clone(),
            description: line.description.clone(),
            prestation_id: line.prestation_id.map(Into::into),
            quantity: line.quantity,
            unit_price: line.unit_price,
        })
        .collect()
}
