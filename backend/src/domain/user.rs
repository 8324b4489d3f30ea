//! User accounts and their public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{DocId, Document, Patch, PatchError, Record};

/// Stored user account.
///
/// The password is stored as supplied. It never leaves the domain: every
/// value handed to callers goes through [`PublicUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub username: String,
    pub password: String,
    pub profile_picture_url: Option<String>,
}

impl Document for UserDoc {
    const COLLECTION: &'static str = "users";
}

/// Validation errors for account input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username or password was blank.
    #[error("Username and password must be non-empty!")]
    Empty,
}

/// Validated username/password pair.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is kept.
///
/// # Examples
/// ```
/// use shelfmates::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("  ada ", "x").expect("valid credentials");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CredentialsValidationError::Empty);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// User as returned to callers, without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl From<Record<UserDoc>> for PublicUser {
    fn from(record: Record<UserDoc>) -> Self {
        let Record {
            id,
            date_created,
            date_updated,
            fields:
                UserDoc {
                    username,
                    password: _,
                    profile_picture_url,
                },
        } = record;
        Self {
            id,
            username,
            profile_picture_url,
            date_created,
            date_updated,
        }
    }
}

/// Partial update of a user account.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl UserPatch {
    /// Whether any supplied credential field is blank.
    pub fn has_blank_credentials(&self) -> bool {
        let blank_username = self
            .username
            .as_deref()
            .is_some_and(|username| username.trim().is_empty());
        let blank_password = self.password.as_deref().is_some_and(str::is_empty);
        blank_username || blank_password
    }

    /// Store patch for this update with the username trimmed.
    pub fn to_patch(&self) -> Result<Patch, PatchError> {
        let normalised = Self {
            username: self.username.as_deref().map(|name| name.trim().to_owned()),
            ..self.clone()
        };
        Patch::from_serializable(&normalised)
    }
}

/// Acknowledgement returned by user creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub msg: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", "pw")]
    #[case("   ", "pw")]
    #[case("ada", "")]
    fn blank_credentials_rejected(#[case] username: &str, #[case] password: &str) {
        assert_eq!(
            Credentials::try_from_parts(username, password),
            Err(CredentialsValidationError::Empty)
        );
    }

    #[rstest]
    fn public_projection_drops_password() {
        let record = Record::stamped(
            DocId::random(),
            UserDoc {
                username: "ada".into(),
                password: "secret".into(),
                profile_picture_url: None,
            },
            Utc::now(),
        );
        let value = serde_json::to_value(PublicUser::from(record)).expect("serialise");
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "ada");
        assert!(value.get("_id").is_some());
    }

    #[rstest]
    fn patch_skips_absent_fields() {
        let patch = UserPatch {
            username: Some("  grace ".into()),
            ..UserPatch::default()
        }
        .to_patch()
        .expect("patch");
        assert_eq!(patch.keys().collect::<Vec<_>>(), ["username"]);
        assert_eq!(patch.get("username"), Some(&json!("grace")));
    }

    #[rstest]
    fn patch_rejects_unknown_json_fields() {
        let result = serde_json::from_value::<UserPatch>(json!({ "role": "admin" }));
        assert!(result.is_err());
    }

    #[rstest]
    #[case(UserPatch { username: Some(" ".into()), ..UserPatch::default() }, true)]
    #[case(UserPatch { password: Some(String::new()), ..UserPatch::default() }, true)]
    #[case(UserPatch { profile_picture_url: Some(String::new()), ..UserPatch::default() }, false)]
    fn blank_credentials_detected(#[case] patch: UserPatch, #[case] expected: bool) {
        assert_eq!(patch.has_blank_credentials(), expected);
    }
}
