//! Named document-store collections.

/// The collections the admin dashboard touches.
///
/// The document store addresses collections by name; this enum keeps those
/// names in one place instead of scattering string literals through the
/// gateway calls. The wire never carries the enum itself, only the
/// [`as_str`](Self::as_str) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Categories,
    Orders,
    Users,
}

impl Collection {
    /// The collection name as stored in the document store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Orders => "orders",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Products.as_str(), "products");
        assert_eq!(Collection::Categories.as_str(), "categories");
        assert_eq!(Collection::Orders.as_str(), "orders");
        assert_eq!(Collection::Users.as_str(), "users");
    }
}
