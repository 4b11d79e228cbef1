//! Catalog persistence: product and category saves and deletes.
//!
//! Saves are keyed by the presence of an `id`: a payload without one creates
//! a new document and the store assigns the ID, a payload with one merges
//! into the existing document. Deletes require an explicit confirmation
//! decision from the collection view; an unconfirmed delete is a no-op.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use luxe_admin_core::{Category, CategoryId, Collection, Product, ProductId};

use crate::gateway::{DataGateway, GatewayError};

/// A create or update that did not persist.
#[derive(Debug, Error)]
#[error("save failed: {0}")]
pub struct SaveError(#[from] pub GatewayError);

/// The user's answer to a delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    Confirmed,
    Declined,
}

/// Serialize an entity into a store field map, dropping the `id` field.
///
/// The ID addresses the document; it is never stored inside it.
fn entity_fields<T: Serialize>(entity: &T) -> Result<Map<String, Value>, GatewayError> {
    let mut fields = match serde_json::to_value(entity)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    fields.remove("id");
    Ok(fields)
}

/// Persist a product, creating or updating based on its `id`.
///
/// Returns the product with its store-assigned ID filled in on create.
///
/// # Errors
///
/// Returns [`SaveError`] if the gateway rejects the write.
pub async fn save_product(
    gateway: &dyn DataGateway,
    mut product: Product,
) -> Result<Product, SaveError> {
    let fields = entity_fields(&product).map_err(SaveError)?;
    match &product.id {
        Some(id) => {
            gateway
                .update(Collection::Products, id.as_str(), fields)
                .await?;
            tracing::info!(id = %id, name = %product.name, "product updated");
        }
        None => {
            let id = gateway.create(Collection::Products, fields).await?;
            tracing::info!(id = %id, name = %product.name, "product created");
            product.id = Some(ProductId::new(id));
        }
    }
    Ok(product)
}

/// Persist a category, creating or updating based on its `id`.
///
/// # Errors
///
/// Returns [`SaveError`] if the gateway rejects the write.
pub async fn save_category(
    gateway: &dyn DataGateway,
    mut category: Category,
) -> Result<Category, SaveError> {
    let fields = entity_fields(&category).map_err(SaveError)?;
    match &category.id {
        Some(id) => {
            gateway
                .update(Collection::Categories, id.as_str(), fields)
                .await?;
            tracing::info!(id = %id, name = %category.name, "category updated");
        }
        None => {
            let id = gateway.create(Collection::Categories, fields).await?;
            tracing::info!(id = %id, name = %category.name, "category created");
            category.id = Some(CategoryId::new(id));
        }
    }
    Ok(category)
}

/// Delete a product if the user confirmed the prompt.
///
/// Returns `true` if a delete was issued.
///
/// # Errors
///
/// Returns [`GatewayError`] if the confirmed delete fails at the store.
pub async fn delete_product(
    gateway: &dyn DataGateway,
    id: &ProductId,
    decision: DeleteDecision,
) -> Result<bool, GatewayError> {
    if decision == DeleteDecision::Declined {
        tracing::debug!(id = %id, "product delete declined");
        return Ok(false);
    }
    gateway.delete(Collection::Products, id.as_str()).await?;
    tracing::info!(id = %id, "product deleted");
    Ok(true)
}

/// Delete a category if the user confirmed the prompt.
///
/// Returns `true` if a delete was issued.
///
/// # Errors
///
/// Returns [`GatewayError`] if the confirmed delete fails at the store.
pub async fn delete_category(
    gateway: &dyn DataGateway,
    id: &CategoryId,
    decision: DeleteDecision,
) -> Result<bool, GatewayError> {
    if decision == DeleteDecision::Declined {
        tracing::debug!(id = %id, "category delete declined");
        return Ok(false);
    }
    gateway.delete(Collection::Categories, id.as_str()).await?;
    tracing::info!(id = %id, "category deleted");
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryDataGateway;
    use rust_decimal::Decimal;

    fn scarf() -> Product {
        Product {
            id: None,
            name: "Silk Scarf".into(),
            category: "Accessories".into(),
            price: Decimal::from(4500),
            stock: 12,
            sizes: vec!["S".into(), "M".into()],
            description: "Hand-rolled hem".into(),
            details: vec!["100% silk".into()],
            image: "https://i.ibb.co/abc/scarf.jpg".into(),
            created_at: "2025-06-01T10:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn test_save_without_id_creates() {
        let gateway = MemoryDataGateway::new();
        let saved = save_product(&gateway, scarf()).await.unwrap();

        let id = saved.id.unwrap();
        assert_eq!(gateway.len(Collection::Products), 1);
        let doc = gateway.get(Collection::Products, id.as_str()).unwrap();
        assert_eq!(doc.fields["name"], "Silk Scarf");
        // The id lives on the document path, not in its fields.
        assert!(!doc.fields.contains_key("id"));
    }

    #[tokio::test]
    async fn test_save_with_id_updates_in_place() {
        let gateway = MemoryDataGateway::new();
        let created = save_product(&gateway, scarf()).await.unwrap();

        let mut edited = created.clone();
        edited.stock = 3;
        let saved = save_product(&gateway, edited).await.unwrap();

        assert_eq!(saved.id, created.id);
        assert_eq!(gateway.len(Collection::Products), 1);
        let doc = gateway
            .get(Collection::Products, created.id.unwrap().as_str())
            .unwrap();
        assert_eq!(doc.fields["stock"], 3);
    }

    #[tokio::test]
    async fn test_update_missing_product_fails() {
        let gateway = MemoryDataGateway::new();
        let mut product = scarf();
        product.id = Some(ProductId::new("ghost"));

        let result = save_product(&gateway, product).await;
        assert!(matches!(result, Err(SaveError(GatewayError::NotFound(_)))));
    }

    #[tokio::test]
    async fn test_declined_delete_is_a_noop() {
        let gateway = MemoryDataGateway::new();
        let saved = save_product(&gateway, scarf()).await.unwrap();
        let id = saved.id.unwrap();

        let issued = delete_product(&gateway, &id, DeleteDecision::Declined)
            .await
            .unwrap();
        assert!(!issued);
        assert_eq!(gateway.len(Collection::Products), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_document() {
        let gateway = MemoryDataGateway::new();
        let saved = save_product(&gateway, scarf()).await.unwrap();
        let id = saved.id.unwrap();

        let issued = delete_product(&gateway, &id, DeleteDecision::Confirmed)
            .await
            .unwrap();
        assert!(issued);
        assert!(gateway.is_empty(Collection::Products));
    }

    #[tokio::test]
    async fn test_category_create_then_delete() {
        let gateway = MemoryDataGateway::new();
        let category = Category {
            id: None,
            name: "Shoes".into(),
            image: "https://i.ibb.co/abc/shoes.jpg".into(),
        };
        let saved = save_category(&gateway, category).await.unwrap();
        let id = saved.id.unwrap();
        assert_eq!(gateway.len(Collection::Categories), 1);

        delete_category(&gateway, &id, DeleteDecision::Confirmed)
            .await
            .unwrap();
        assert!(gateway.is_empty(Collection::Categories));
    }
}
