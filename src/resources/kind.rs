//! Resource tags known to the client registry

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resource collection exposed by the content-management API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Content records (`/items`)
    Items,
    /// Models (`/item-types`)
    ItemTypes,
    /// Navigation entries (`/menu-items`)
    MenuItems,
    /// Media library assets (`/uploads`)
    Uploads,
    /// Collaborators (`/users`)
    Users,
    /// Permission roles (`/roles`)
    Roles,
    /// API tokens (`/access-tokens`)
    AccessTokens,
    /// Project settings (`/site`, singleton)
    Site,
}

impl ResourceKind {
    /// Number of kinds
    pub const COUNT: usize = 8;

    /// Every kind, in registry order
    pub const ALL: [ResourceKind; Self::COUNT] = [
        Self::Items,
        Self::ItemTypes,
        Self::MenuItems,
        Self::Uploads,
        Self::Users,
        Self::Roles,
        Self::AccessTokens,
        Self::Site,
    ];

    /// Registry name (`items`, `item_types`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::ItemTypes => "item_types",
            Self::MenuItems => "menu_items",
            Self::Uploads => "uploads",
            Self::Users => "users",
            Self::Roles => "roles",
            Self::AccessTokens => "access_tokens",
            Self::Site => "site",
        }
    }

    /// Position in `ALL`
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::UnknownResource {
                name: s.to_string(),
            })
    }
}
