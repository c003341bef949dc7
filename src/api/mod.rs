mod client;
mod error;
mod resource;

pub use error::ApiError;
pub use resource::*;

use client::Client;
use log::*;

/// Responsible for asynchronous interaction with the storefront backend
/// including transformation of response data into explicitly-defined types.
///
/// Thin wrapper over HTTP verbs: POST to create, PATCH to update, DELETE to
/// remove, GET to refresh listings. One attempt per call; failures surface
/// directly to the caller.
pub struct Api {
    client: Client,
}

impl Api {
    /// Returns a new instance for the given base URL.
    ///
    pub fn new(base_url: &str) -> Api {
        debug!("Initializing storefront API client for {}...", base_url);
        Api {
            client: Client::new(base_url),
        }
    }

    /// Returns all stores the admin surface can manage.
    ///
    pub async fn stores(&self) -> Result<Vec<Store>, ApiError> {
        debug!("Requesting stores...");
        self.client.list::<Store>("").await
    }

    /// Create a store.
    ///
    pub async fn create_store(&self, input: &StoreInput) -> Result<Store, ApiError> {
        debug!("Creating store '{}'...", input.name);
        self.client.create::<Store>("", input).await
    }

    /// Update a store.
    ///
    pub async fn update_store(&self, id: &str, input: &StoreInput) -> Result<Store, ApiError> {
        debug!("Updating store {}...", id);
        self.client.update::<Store>("", id, input).await
    }

    /// Delete a store.
    ///
    pub async fn delete_store(&self, id: &str) -> Result<(), ApiError> {
        debug!("Deleting store {}...", id);
        self.client.delete::<Store>("", id).await
    }

    /// Returns the billboards belonging to the store.
    ///
    pub async fn billboards(&self, store_id: &str) -> Result<Vec<Billboard>, ApiError> {
        debug!("Requesting billboards for store {}...", store_id);
        self.client.list::<Billboard>(store_id).await
    }

    /// Create a billboard under the store.
    ///
    pub async fn create_billboard(
        &self,
        store_id: &str,
        input: &BillboardInput,
    ) -> Result<Billboard, ApiError> {
        debug!("Creating billboard '{}' in store {}...", input.label, store_id);
        self.client.create::<Billboard>(store_id, input).await
    }

    /// Update a billboard under the store.
    ///
    pub async fn update_billboard(
        &self,
        store_id: &str,
        id: &str,
        input: &BillboardInput,
    ) -> Result<Billboard, ApiError> {
        debug!("Updating billboard {} in store {}...", id, store_id);
        self.client.update::<Billboard>(store_id, id, input).await
    }

    /// Delete a billboard under the store.
    ///
    pub async fn delete_billboard(&self, store_id: &str, id: &str) -> Result<(), ApiError> {
        debug!("Deleting billboard {} in store {}...", id, store_id);
        self.client.delete::<Billboard>(store_id, id).await
    }

    /// Returns the categories belonging to the store.
    ///
    pub async fn categories(&self, store_id: &str) -> Result<Vec<Category>, ApiError> {
        debug!("Requesting categories for store {}...", store_id);
        self.client.list::<Category>(store_id).await
    }

    /// Create a category under the store.
    ///
    pub async fn create_category(
        &self,
        store_id: &str,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        debug!("Creating category '{}' in store {}...", input.name, store_id);
        self.client.create::<Category>(store_id, input).await
    }

    /// Update a category under the store.
    ///
    pub async fn update_category(
        &self,
        store_id: &str,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        debug!("Updating category {} in store {}...", id, store_id);
        self.client.update::<Category>(store_id, id, input).await
    }

    /// Delete a category under the store.
    ///
    pub async fn delete_category(&self, store_id: &str, id: &str) -> Result<(), ApiError> {
        debug!("Deleting category {} in store {}...", id, store_id);
        self.client.delete::<Category>(store_id, id).await
    }
}
