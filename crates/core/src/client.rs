//! Client identity rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::validation::{
    normalize_tax_id, validate_email, validate_phone, validate_postal_code, validate_required,
    validate_tax_id,
};

/// Kind of client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    /// Private person, identified by last/first name.
    Individual,
    /// Company or association, identified by legal name and SIRET.
    Organization,
}

impl ClientKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Organization => "organization",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "individual" => Some(Self::Individual),
            "organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client form failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ClientValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Client fields as entered in the client form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Client kind.
    pub kind: ClientKind,
    /// Last name (individuals).
    pub last_name: String,
    /// First name (individuals).
    pub first_name: String,
    /// Legal name (organizations).
    pub legal_name: String,
    /// SIRET (organizations).
    pub tax_id: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Email address.
    pub email: String,
    /// Optional phone number, empty when unknown.
    pub phone: String,
    /// Free-text notes.
    pub notes: String,
    /// Active flag.
    pub active: bool,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            kind: ClientKind::Individual,
            last_name: String::new(),
            first_name: String::new(),
            legal_name: String::new(),
            tax_id: String::new(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            email: String::new(),
            phone: String::new(),
            notes: String::new(),
            active: true,
        }
    }
}

fn required(value: &str, field: &'static str, label: &str) -> Result<(), ClientValidationError> {
    let (ok, message) = validate_required(value, label);
    if ok {
        Ok(())
    } else {
        Err(ClientValidationError::new(field, message))
    }
}

impl ClientProfile {
    /// Validates the profile, reporting the first failing field.
    ///
    /// Order: identity, address, postal code, city, email, phone.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        match self.kind {
            ClientKind::Organization => {
                required(&self.legal_name, "legal_name", "Legal name")?;
                let (ok, message) = validate_tax_id(&self.tax_id);
                if !ok {
                    return Err(ClientValidationError::new("tax_id", message));
                }
            }
            ClientKind::Individual => required(&self.last_name, "last_name", "Last name")?,
        }

        required(&self.address, "address", "Address")?;

        if !validate_postal_code(&self.postal_code) {
            return Err(ClientValidationError::new(
                "postal_code",
                "Postal code must contain 5 digits",
            ));
        }

        required(&self.city, "city", "City")?;

        if !validate_email(self.email.trim()) {
            return Err(ClientValidationError::new(
                "email",
                "Email address is not valid",
            ));
        }

        if !validate_phone(self.phone.trim()) {
            return Err(ClientValidationError::new(
                "phone",
                "Phone number is not valid (10 digits)",
            ));
        }

        Ok(())
    }

    /// Returns a copy with surrounding whitespace trimmed and the tax id
    /// stripped of separators, ready to be stored.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let tax_id = normalize_tax_id(self.tax_id.trim());
        Self {
            kind: self.kind,
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            legal_name: self.legal_name.trim().to_string(),
            tax_id,
            address: self.address.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            city: self.city.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            notes: self.notes.trim().to_string(),
            active: self.active,
        }
    }

    /// Name shown in lists and on documents.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(
            self.kind,
            &self.last_name,
            &self.first_name,
            &self.legal_name,
        )
    }
}

/// Name shown in lists and on documents: legal name for organizations,
/// "first last" for individuals.
#[must_use]
pub fn display_name(
    kind: ClientKind,
    last_name: &str,
    first_name: &str,
    legal_name: &str,
) -> String {
    match kind {
        ClientKind::Organization => legal_name.to_string(),
        ClientKind::Individual => format!("{first_name} {last_name}").trim().to_string(),
    }
}

/// Multi-line postal address: street, then "postal_code city" when both are set.
#[must_use]
pub fn full_address(address: &str, postal_code: &str, city: &str) -> String {
    let mut parts = Vec::with_capacity(2);
    if !address.is_empty() {
        parts.push(address.to_string());
    }
    if !postal_code.is_empty() && !city.is_empty() {
        parts.push(format!("{postal_code} {city}"));
    }
    parts.join("\n")
}
