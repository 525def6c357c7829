//! Initial database migration.
//!
//! Creates every table of the invoicing schema. Foreign keys have no
//! `ON DELETE CASCADE`: repositories delete dependents explicitly.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: REFERENCE DATA
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(PRESTATIONS_SQL).await?;
        db.execute_unprepared(PARAMETRES_SQL).await?;

        // ============================================================
        // PART 2: QUOTES
        // ============================================================
        db.execute_unprepared(DEVIS_SQL).await?;

        // ============================================================
        // PART 3: INVOICES, PAYMENTS, CREDIT NOTES
        // ============================================================
        db.execute_unprepared(FACTURES_SQL).await?;
        db.execute_unprepared(PAIEMENTS_SQL).await?;
        db.execute_unprepared(AVOIRS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind VARCHAR(32) NOT NULL CHECK (kind IN ('individual', 'organization')),
    last_name VARCHAR(100),
    first_name VARCHAR(100),
    legal_name VARCHAR(200),
    tax_id VARCHAR(14),
    address TEXT NOT NULL,
    postal_code VARCHAR(10) NOT NULL,
    city VARCHAR(100) NOT NULL,
    email VARCHAR(200) NOT NULL,
    phone VARCHAR(20),
    notes TEXT,
    active BOOLEAN NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX idx_clients_name ON clients(last_name, first_name);
CREATE INDEX idx_clients_active ON clients(active);
";

const PRESTATIONS_SQL: &str = r"
CREATE TABLE prestations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    label VARCHAR(200) NOT NULL,
    description TEXT,
    unit_price REAL NOT NULL CHECK (unit_price >= 0),
    unit VARCHAR(50) NOT NULL,
    category VARCHAR(100),
    active BOOLEAN NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX idx_prestations_category ON prestations(category);
";

const PARAMETRES_SQL: &str = r#"
CREATE TABLE parametres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    "key" VARCHAR(100) NOT NULL UNIQUE,
    "value" TEXT,
    value_type VARCHAR(20) NOT NULL DEFAULT 'string'
        CHECK (value_type IN ('string', 'integer', 'float', 'boolean', 'json'))
);
"#;

const DEVIS_SQL: &str = r"
CREATE TABLE devis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    number VARCHAR(50) NOT NULL UNIQUE,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    issue_date DATE NOT NULL,
    validity_date DATE NOT NULL,
    status VARCHAR(32) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'accepted', 'refused', 'expired')),
    total REAL NOT NULL DEFAULT 0,
    terms TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT chk_devis_validity CHECK (validity_date >= issue_date)
);

CREATE INDEX idx_devis_client ON devis(client_id);

CREATE TABLE devis_lignes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    devis_id INTEGER NOT NULL REFERENCES devis(id),
    prestation_id INTEGER REFERENCES prestations(id),
    label VARCHAR(200) NOT NULL,
    description TEXT,
    quantity REAL NOT NULL CHECK (quantity > 0),
    unit_price REAL NOT NULL,
    line_total REAL NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (devis_id, position)
);
";

const FACTURES_SQL: &str = r"
CREATE TABLE factures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    number VARCHAR(50) NOT NULL UNIQUE,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    devis_id INTEGER REFERENCES devis(id),
    issue_date DATE NOT NULL,
    period_start DATE,
    period_end DATE,
    due_date DATE NOT NULL,
    status VARCHAR(32) NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'issued', 'paid', 'partially_paid', 'overdue', 'cancelled')),
    total REAL NOT NULL DEFAULT 0,
    payment_method VARCHAR(32),
    payment_terms TEXT,
    notes TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT chk_factures_due CHECK (due_date >= issue_date)
);

CREATE INDEX idx_factures_client ON factures(client_id);
CREATE INDEX idx_factures_devis ON factures(devis_id);
CREATE INDEX idx_factures_status ON factures(status);

CREATE TABLE factures_lignes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id INTEGER NOT NULL REFERENCES factures(id),
    prestation_id INTEGER REFERENCES prestations(id),
    label VARCHAR(200) NOT NULL,
    description TEXT,
    quantity REAL NOT NULL CHECK (quantity > 0),
    unit_price REAL NOT NULL,
    line_total REAL NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (invoice_id, position)
);
";

const PAIEMENTS_SQL: &str = r"
CREATE TABLE paiements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id INTEGER NOT NULL REFERENCES factures(id),
    payment_date DATE NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    method VARCHAR(32) NOT NULL,
    reference VARCHAR(100),
    notes TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX idx_paiements_invoice ON paiements(invoice_id);
";

const AVOIRS_SQL: &str = r"
CREATE TABLE avoirs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    number VARCHAR(50) NOT NULL UNIQUE,
    invoice_id INTEGER NOT NULL REFERENCES factures(id),
    issue_date DATE NOT NULL,
    amount REAL NOT NULL CHECK (amount < 0),
    reason TEXT NOT NULL CHECK (length(trim(reason)) > 0),
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX idx_avoirs_invoice ON avoirs(invoice_id);

CREATE TABLE avoirs_lignes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    credit_note_id INTEGER NOT NULL REFERENCES avoirs(id),
    prestation_id INTEGER REFERENCES prestations(id),
    label VARCHAR(200) NOT NULL,
    description TEXT,
    quantity REAL NOT NULL CHECK (quantity > 0),
    unit_price REAL NOT NULL,
    line_total REAL NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (credit_note_id, position)
);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS avoirs_lignes;
DROP TABLE IF EXISTS avoirs;
DROP TABLE IF EXISTS paiements;
DROP TABLE IF EXISTS factures_lignes;
DROP TABLE IF EXISTS factures;
DROP TABLE IF EXISTS devis_lignes;
DROP TABLE IF EXISTS devis;
DROP TABLE IF EXISTS parametres;
DROP TABLE IF EXISTS prestations;
DROP TABLE IF EXISTS clients;
";
