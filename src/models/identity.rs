//! Signed-in user identity and its normalization from backend responses.
//!
//! The identity endpoint answers in two shapes:
//! - password login: `{ "user": { ... }, "message": "..." }`
//! - federated login: `{ "name": ..., "email": ..., "type": "oauth2", "picture": ... }`
//!
//! Both collapse into [`Identity`]. Anything else is rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// How the user signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdentityKind {
    Password,
    Federated { provider: Option<String> },
}

/// Normalized identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// From `picture` (federated) or `profilePicture` (password).
    pub avatar_url: Option<String>,
    pub kind: IdentityKind,
}

/// Wire form of a user record, accepting every field name the backend uses.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IdentityRecord {
    id: Option<i64>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    phone_number: Option<String>,
    location: Option<String>,
    picture: Option<String>,
    profile_picture: Option<String>,
    avatar_url: Option<String>,
    #[serde(rename = "type")]
    login_type: Option<String>,
    provider: Option<String>,
}

impl From<IdentityRecord> for Identity {
    fn from(r: IdentityRecord) -> Self {
        let kind = match r.login_type.as_deref() {
            Some("oauth2") => IdentityKind::Federated {
                provider: r.provider,
            },
            _ => IdentityKind::Password,
        };
        Identity {
            id: r.id,
            name: r.name.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            phone: r.phone.or(r.phone_number),
            location: r.location,
            avatar_url: r.picture.or(r.profile_picture).or(r.avatar_url),
            kind,
        }
    }
}

/// The two response shapes the identity endpoint produces.
enum IdentityShape<'a> {
    Nested(&'a Value),
    Flat(&'a Value),
}

impl<'a> IdentityShape<'a> {
    fn classify(body: &'a Value) -> Option<Self> {
        if let Some(user) = body.get("user").filter(|u| is_present(u)) {
            return Some(IdentityShape::Nested(user));
        }
        let has_email = body.get("email").is_some_and(is_present);
        let has_name = body.get("name").is_some_and(is_present);
        if has_email || has_name {
            return Some(IdentityShape::Flat(body));
        }
        None
    }

    fn record(&self) -> &'a Value {
        match self {
            IdentityShape::Nested(v) | IdentityShape::Flat(v) => v,
        }
    }
}

impl Identity {
    /// Normalize a current-identity response.
    ///
    /// Fails with [`ClientError::InvalidIdentity`] when the body matches
    /// neither known shape.
    pub fn from_response(body: &Value) -> Result<Self> {
        let shape = IdentityShape::classify(body).ok_or(ClientError::InvalidIdentity)?;
        Self::from_record(shape.record())
    }

    /// Extract the identity from a login response: `user` when present,
    /// otherwise the whole body.
    pub fn from_login_response(body: &Value) -> Result<Self> {
        let record = body
            .get("user")
            .filter(|u| is_present(u))
            .unwrap_or(body);
        Self::from_record(record)
    }

    fn from_record(record: &Value) -> Result<Self> {
        if !record.is_object() {
            return Err(ClientError::InvalidIdentity);
        }
        let record: IdentityRecord = serde_json::from_value(record.clone())
            .map_err(|e| ClientError::Decode(format!("user record: {}", e)))?;
        Ok(record.into())
    }

    pub fn is_federated(&self) -> bool {
        matches!(self.kind, IdentityKind::Federated { .. })
    }
}

/// Truthy: not null, `false`, zero or an empty string.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}
