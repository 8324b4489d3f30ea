//! Reader profiles: display name, friends and three reading shelves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DocId, Document, MembershipSet, Record};

pub const USER_FIELD: &str = "user";
pub const FRIENDS_FIELD: &str = "friends";

/// Stored profile, one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDoc {
    pub user: DocId,
    pub name: String,
    pub friends: MembershipSet,
    pub books_reading: MembershipSet,
    pub books_read: MembershipSet,
    pub books_to_read: MembershipSet,
}

impl Document for ProfileDoc {
    const COLLECTION: &'static str = "profiles";
}

impl ProfileDoc {
    /// A profile with no friends and empty shelves.
    pub fn blank(user: DocId, name: impl Into<String>) -> Self {
        Self {
            user,
            name: name.into(),
            friends: MembershipSet::new(),
            books_reading: MembershipSet::new(),
            books_read: MembershipSet::new(),
            books_to_read: MembershipSet::new(),
        }
    }

    /// Current contents of `shelf`.
    pub fn shelf(&self, shelf: Shelf) -> &MembershipSet {
        match shelf {
            Shelf::Reading => &self.books_reading,
            Shelf::Read => &self.books_read,
            Shelf::ToRead => &self.books_to_read,
        }
    }
}

/// One of the reading shelves on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shelf {
    Reading,
    Read,
    ToRead,
}

impl Shelf {
    /// Profile field holding this shelf.
    pub fn field(self) -> &'static str {
        match self {
            Self::Reading => "booksReading",
            Self::Read => "booksRead",
            Self::ToRead => "booksToRead",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Read => "read",
            Self::ToRead => "to-read",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown shelf name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shelf '{0}'; expected reading, read or to-read")]
pub struct ShelfParseError(String);

impl FromStr for Shelf {
    type Err = ShelfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            "to-read" => Ok(Self::ToRead),
            other => Err(ShelfParseError(other.to_owned())),
        }
    }
}

/// Acknowledgement returned when a profile is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCreated {
    pub msg: String,
    pub profile: Record<ProfileDoc>,
}
