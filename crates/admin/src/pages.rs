//! Dashboard pages and the navigation table.
//!
//! Navigation is a data table rather than a chain of comparisons: adding a
//! page means adding a variant and one `NAV_ITEMS` row.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A top-level dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Products,
    Orders,
    Users,
    Categories,
}

/// Every page in sidebar order, with its display label.
pub const NAV_ITEMS: &[(Page, &str)] = &[
    (Page::Dashboard, "Dashboard"),
    (Page::Products, "Products"),
    (Page::Orders, "Orders"),
    (Page::Users, "Users"),
    (Page::Categories, "Categories"),
];

impl Page {
    /// Canonical lowercase name, used as the route key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Users => "users",
            Self::Categories => "categories",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub fn label(self) -> &'static str {
        NAV_ITEMS
            .iter()
            .find(|(page, _)| *page == self)
            .map_or("", |(_, label)| label)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route key that names no page.
#[derive(Debug, Error)]
#[error("unknown page: {0}")]
pub struct PageParseError(String);

impl FromStr for Page {
    type Err = PageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAV_ITEMS
            .iter()
            .map(|(page, _)| *page)
            .find(|page| page.as_str() == s)
            .ok_or_else(|| PageParseError(s.to_owned()))
    }
}
