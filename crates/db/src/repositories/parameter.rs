//! Parameter repository for typed key/value settings.

use facturo_core::numbering::{HIGH_WATER_PREFIX, is_high_water_key};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::{parametres, sea_orm_active_enums::ValueType};

/// Days between issue and due date of an invoice.
pub const PAYMENT_TERMS_DAYS: &str = "billing.payment_terms_days";

/// Days a quote stays open for acceptance.
pub const QUOTE_VALIDITY_DAYS: &str = "billing.quote_validity_days";

/// Error types for parameter operations.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    /// Key is blank.
    #[error("Parameter key is required")]
    EmptyKey,

    /// Key belongs to document numbering.
    #[error("Parameter {0} is managed by document numbering and cannot be changed")]
    ReservedKey(String),

    /// Stored text does not parse as the declared type.
    #[error("Parameter {key} holds an invalid {value_type:?} value: {value:?}")]
    InvalidValue {
        /// Parameter key.
        key: String,
        /// Declared type.
        value_type: ValueType,
        /// Stored text.
        value: Option<String>,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    /// Free text.
    Text(String),
    /// Integer.
    Integer(i64),
    /// Decimal number, stored under the `float` type.
    Decimal(Decimal),
    /// Boolean.
    Boolean(bool),
    /// JSON document.
    Json(serde_json::Value),
}

impl ParameterValue {
    /// Column type matching this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Integer(_) => ValueType::Integer,
            Self::Decimal(_) => ValueType::Float,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Json(_) => ValueType::Json,
        }
    }

    /// Text stored in the `value` column.
    #[must_use]
    pub fn to_stored(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Parses a stored row. `None` when the text does not fit the type.
    #[must_use]
    pub fn from_stored(value_type: ValueType, value: Option<&str>) -> Option<Self> {
        let Some(raw) = value else {
            return match value_type {
                ValueType::Text => Some(Self::Text(String::new())),
                ValueType::Json => Some(Self::Json(serde_json::Value::Null)),
                _ => None,
            };
        };

        match value_type {
            ValueType::Text => Some(Self::Text(raw.to_string())),
            ValueType::Integer => raw.trim().parse().ok().map(Self::Integer),
            ValueType::Float => Decimal::from_str(raw.trim()).ok().map(Self::Decimal),
            ValueType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "1" => Some(Self::Boolean(true)),
                "false" | "0" => Some(Self::Boolean(false)),
                _ => None,
            },
            ValueType::Json => serde_json::from_str(raw).ok().map(Self::Json),
        }
    }
}

/// Reads the typed value of `key` on any connection or transaction.
pub(crate) async fn read_value<C>(
    conn: &C,
    key: &str,
) -> Result<Option<ParameterValue>, ParameterError>
where
    C: ConnectionTrait,
{
    let Some(row) = parametres::Entity::find()
        .filter(parametres::Column::Key.eq(key))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    ParameterValue::from_stored(row.value_type, row.value.as_deref())
        .map(Some)
        .ok_or(ParameterError::InvalidValue {
            key: row.key,
            value_type: row.value_type,
            value: row.value,
        })
}

/// Inserts or replaces `key` on any connection or transaction.
pub(crate) async fn write_value<C>(
    conn: &C,
    key: &str,
    value: &ParameterValue,
) -> Result<parametres::Model, DbErr>
where
    C: ConnectionTrait,
{
    let existing = parametres::Entity::find()
        .filter(parametres::Column::Key.eq(key))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let mut active: parametres::ActiveModel = row.into();
            active.value = Set(Some(value.to_stored()));
            active.value_type = Set(value.value_type());
            active.update(conn).await
        }
        None => {
            parametres::ActiveModel {
                key: Set(key.to_string()),
                value: Set(Some(value.to_stored())),
                value_type: Set(value.value_type()),
                ..Default::default()
            }
            .insert(conn)
            .await
        }
    }
}

fn settable_key(key: &str) -> Result<&str, ParameterError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ParameterError::EmptyKey);
    }
    if is_high_water_key(key) {
        return Err(ParameterError::ReservedKey(key.to_string()));
    }
    Ok(key)
}

/// Parameter repository.
#[derive(Debug, Clone)]
pub struct ParameterRepository {
    db: DatabaseConnection,
}

impl ParameterRepository {
    /// Creates a new parameter repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the user settings ordered by key. Numbering marks are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<parametres::Model>, DbErr> {
        parametres::Entity::find()
            .filter(parametres::Column::Key.not_like(format!("{HIGH_WATER_PREFIX}%")))
            .order_by_asc(parametres::Column::Key)
            .all(&self.db)
            .await
    }

    /// Finds the raw row of a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, key: &str) -> Result<Option<parametres::Model>, DbErr> {
        parametres::Entity::find()
            .filter(parametres::Column::Key.eq(key))
            .one(&self.db)
            .await
    }

    /// Reads the typed value of a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored text does not match
    /// its declared type.
    pub async fn get(&self, key: &str) -> Result<Option<ParameterValue>, ParameterError> {
        read_value(&self.db, key).await
    }

    /// Writes a parameter, creating it when missing. The declared type
    /// follows the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or reserved, or the write fails.
    pub async fn set(
        &self,
        key: &str,
        value: &ParameterValue,
    ) -> Result<parametres::Model, ParameterError> {
        let key = settable_key(key)?;
        Ok(write_value(&self.db, key, value).await?)
    }

    /// Deletes a parameter. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is reserved or the database delete fails.
    pub async fn delete(&self, key: &str) -> Result<bool, ParameterError> {
        let key = settable_key(key)?;
        let result = parametres::Entity::delete_many()
            .filter(parametres::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
