//! # Client Record Shapes
//!
//! [`ClientRecord`] is the complete, normalized unit of storage.
//! [`ClientPayload`] is a proposed partial record as supplied by a caller
//! (or read back from a persisted document), where every field is optional.
//!
//! The payload parser is the boundary where structure is enforced: an
//! unknown `status`, an unparseable timestamp, or a non-string id/CIF is
//! rejected as [`ClientError::MalformedInput`]. List fields that are not
//! arrays are treated as absent so that the stored list survives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::identity::{Cif, ClientId};
use crate::temporal::Timestamp;

/// Wire keys with dedicated handling. Everything else is a pass-through attribute.
const KEY_ID: &str = "id";
const KEY_CIF: &str = "cif";
const KEY_STATUS: &str = "status";
const KEY_SERVICES: &str = "services";
const KEY_BANK_ACCOUNTS: &str = "bankAccounts";
const KEY_CREATED_AT: &str = "createdAt";
const KEY_DRAFT_UPDATED_AT: &str = "draftUpdatedAt";

/// Lifecycle status of a client record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Provisional record awaiting finalization.
    Draft,
    /// Finalized record.
    Active,
}

impl ClientStatus {
    /// Wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            other => Err(ClientError::MalformedInput(format!(
                "status must be \"draft\" or \"active\", got {other:?}"
            ))),
        }
    }
}

/// A complete client record as stored in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cif: Option<Cif>,
    pub status: ClientStatus,
    #[serde(default)]
    pub services: Vec<Value>,
    #[serde(default)]
    pub bank_accounts: Vec<Value>,
    pub created_at: Timestamp,
    /// Last draft write, `null` once the record is active.
    #[serde(default)]
    pub draft_updated_at: Option<Timestamp>,
    /// Caller-supplied attributes preserved verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ClientRecord {
    /// Whether this record is still a draft.
    pub fn is_draft(&self) -> bool {
        self.status == ClientStatus::Draft
    }
}

/// A proposed partial client record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ClientPayload {
    pub id: Option<ClientId>,
    pub cif: Option<Cif>,
    pub status: Option<ClientStatus>,
    /// `Some` only when the caller sent a JSON array.
    pub services: Option<Vec<Value>>,
    /// `Some` only when the caller sent a JSON array.
    pub bank_accounts: Option<Vec<Value>>,
    pub created_at: Option<Timestamp>,
    pub draft_updated_at: Option<Timestamp>,
    pub attributes: Map<String, Value>,
}

impl ClientPayload {
    /// Parse a payload from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ClientError::MalformedInput(format!(
                "client payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a payload from a JSON object.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, ClientError> {
        let id = optional_string(&mut map, KEY_ID)?.and_then(ClientId::parse);
        let cif = optional_string(&mut map, KEY_CIF)?.and_then(Cif::parse);
        let status = optional_string(&mut map, KEY_STATUS)?
            .map(|s| s.parse::<ClientStatus>())
            .transpose()?;
        let services = optional_array(&mut map, KEY_SERVICES);
        let bank_accounts = optional_array(&mut map, KEY_BANK_ACCOUNTS);
        let created_at = optional_timestamp(&mut map, KEY_CREATED_AT)?;
        let draft_updated_at = optional_timestamp(&mut map, KEY_DRAFT_UPDATED_AT)?;

        Ok(Self {
            id,
            cif,
            status,
            services,
            bank_accounts,
            created_at,
            draft_updated_at,
            attributes: map,
        })
    }
}

impl TryFrom<Map<String, Value>> for ClientPayload {
    type Error = ClientError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

impl From<ClientRecord> for ClientPayload {
    fn from(record: ClientRecord) -> Self {
        Self {
            id: Some(record.id),
            cif: record.cif,
            status: Some(record.status),
            services: Some(record.services),
            bank_accounts: Some(record.bank_accounts),
            created_at: Some(record.created_at),
            draft_updated_at: record.draft_updated_at,
            attributes: record.attributes,
        }
    }
}

fn optional_string(map: &mut Map<String, Value>, key: &str) -> Result<Option<String>, ClientError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ClientError::MalformedInput(format!(
            "{key} must be a string, got {}",
            json_kind(&other)
        ))),
    }
}

fn optional_array(map: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn optional_timestamp(
    map: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<Timestamp>, ClientError> {
    optional_string(map, key)?
        .map(|s| Timestamp::parse(&s))
        .transpose()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
