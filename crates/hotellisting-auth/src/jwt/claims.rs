//! JWT claims carried by every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use hotellisting_entity::UserRole;

/// Claims payload of an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated subject.
    pub unique_name: String,
    /// Roles granted to the subject, in store order.
    #[serde(default, deserialize_with = "one_or_many")]
    pub role: Vec<UserRole>,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token identifier.
    pub jti: Uuid,
}

impl Claims {
    /// Expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Whether the subject holds `role`.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role.contains(&role)
    }
}

/// Accept `"role": "User"` as well as `"role": ["User", "Administrator"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<UserRole>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(UserRole),
        Many(Vec<UserRole>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(role) => vec![role],
        OneOrMany::Many(roles) => roles,
    })
}
