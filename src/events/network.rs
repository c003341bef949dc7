use crate::api::{Api, ApiError, BillboardInput, CategoryInput, EntityKind, StoreInput};
use crate::notify::{Notice, Notifier};
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Failure notice for any submission error. Raw network detail never
/// reaches the user.
const GENERIC_FAILURE: &str = "Something went wrong.";

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Bootstrap,
    RefreshStores,
    RefreshBillboards,
    RefreshCategories,
    CreateStore {
        input: StoreInput,
    },
    UpdateStore {
        id: String,
        input: StoreInput,
    },
    DeleteStore {
        id: String,
    },
    CreateBillboard {
        input: BillboardInput,
    },
    UpdateBillboard {
        id: String,
        input: BillboardInput,
    },
    DeleteBillboard {
        id: String,
    },
    CreateCategory {
        input: CategoryInput,
    },
    UpdateCategory {
        id: String,
        input: CategoryInput,
    },
    DeleteCategory {
        id: String,
    },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    api: &'a Api,
    notifier: &'a mut dyn Notifier,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(
        state: &'a Arc<Mutex<State>>,
        api: &'a Api,
        notifier: &'a mut dyn Notifier,
    ) -> Self {
        Handler {
            state,
            api,
            notifier,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Bootstrap => self.bootstrap().await?,
            Event::RefreshStores => self.refresh_stores().await?,
            Event::RefreshBillboards => self.refresh_billboards().await?,
            Event::RefreshCategories => self.refresh_categories().await?,
            Event::CreateStore { input } => self.create_store(input).await?,
            Event::UpdateStore { id, input } => self.update_store(id, input).await?,
            Event::DeleteStore { id } => self.delete_store(id).await?,
            Event::CreateBillboard { input } => self.create_billboard(input).await?,
            Event::UpdateBillboard { id, input } => self.update_billboard(id, input).await?,
            Event::DeleteBillboard { id } => self.delete_billboard(id).await?,
            Event::CreateCategory { input } => self.create_category(input).await?,
            Event::UpdateCategory { id, input } => self.update_category(id, input).await?,
            Event::DeleteCategory { id } => self.delete_category(id).await?,
        }
        Ok(())
    }

    /// Update state with the known stores and select one if none is active.
    /// Selecting a store queues the listing refreshes for it.
    ///
    async fn bootstrap(&mut self) -> Result<()> {
        info!("Preparing initial application data...");
        let stores = self.api.stores().await?;
        let mut state = self.state.lock().await;
        state.set_stores(stores.clone());
        let target = state
            .context()
            .store_id()
            .map(str::to_owned)
            .or_else(|| stores.first().map(|store| store.id.clone()));
        if let Some(store_id) = target {
            state.switch_store(store_id);
        }
        info!("Loaded initial application data.");
        Ok(())
    }

    /// Update state with the known stores.
    ///
    async fn refresh_stores(&mut self) -> Result<()> {
        let stores = self.api.stores().await?;
        info!("Received {} stores.", stores.len());
        self.state.lock().await.set_stores(stores);
        Ok(())
    }

    /// Update state with the active store's billboards.
    ///
    async fn refresh_billboards(&mut self) -> Result<()> {
        let store_id = match self.active_store().await {
            Some(store_id) => store_id,
            None => {
                warn!("Skipping billboard refresh with no active store.");
                return Ok(());
            }
        };
        let billboards = self.api.billboards(&store_id).await?;
        info!("Received {} billboards.", billboards.len());
        self.state.lock().await.set_billboards(billboards);
        Ok(())
    }

    /// Update state with the active store's categories.
    ///
    async fn refresh_categories(&mut self) -> Result<()> {
        let store_id = match self.active_store().await {
            Some(store_id) => store_id,
            None => {
                warn!("Skipping category refresh with no active store.");
                return Ok(());
            }
        };
        let categories = self.api.categories(&store_id).await?;
        info!("Received {} categories.", categories.len());
        self.state.lock().await.set_categories(categories);
        Ok(())
    }

    /// Create a store.
    ///
    async fn create_store(&mut self, input: StoreInput) -> Result<()> {
        info!("Creating store '{}'...", input.name);
        match self.api.create_store(&input).await {
            Ok(store) => {
                info!("Store {} created successfully.", store.id);
                self.submit_succeeded(EntityKind::Store, EntityKind::Store.created_notice())
                    .await
            }
            Err(err) => self.submit_failed(EntityKind::Store, err).await,
        }
    }

    /// Update a store.
    ///
    async fn update_store(&mut self, id: String, input: StoreInput) -> Result<()> {
        info!("Updating store {}...", id);
        match self.api.update_store(&id, &input).await {
            Ok(_) => {
                info!("Store {} updated successfully.", id);
                self.submit_succeeded(EntityKind::Store, EntityKind::Store.updated_notice())
                    .await
            }
            Err(err) => self.submit_failed(EntityKind::Store, err).await,
        }
    }

    /// Delete a store.
    ///
    async fn delete_store(&mut self, id: String) -> Result<()> {
        info!("Deleting store {}...", id);
        match self.api.delete_store(&id).await {
            Ok(()) => {
                info!("Store {} deleted successfully.", id);
                self.delete_succeeded(EntityKind::Store).await
            }
            Err(err) => self.delete_failed(EntityKind::Store, err).await,
        }
    }

    /// Create a billboard in the active store.
    ///
    async fn create_billboard(&mut self, input: BillboardInput) -> Result<()> {
        let store_id = match self.store_for_submit(EntityKind::Billboard).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Creating billboard '{}' in store {}...", input.label, store_id);
        match self.api.create_billboard(&store_id, &input).await {
            Ok(billboard) => {
                info!("Billboard {} created successfully.", billboard.id);
                self.submit_succeeded(
                    EntityKind::Billboard,
                    EntityKind::Billboard.created_notice(),
                )
                .await
            }
            Err(err) => self.submit_failed(EntityKind::Billboard, err).await,
        }
    }

    /// Update a billboard in the active store.
    ///
    async fn update_billboard(&mut self, id: String, input: BillboardInput) -> Result<()> {
        let store_id = match self.store_for_submit(EntityKind::Billboard).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Updating billboard {} in store {}...", id, store_id);
        match self.api.update_billboard(&store_id, &id, &input).await {
            Ok(_) => {
                info!("Billboard {} updated successfully.", id);
                self.submit_succeeded(
                    EntityKind::Billboard,
                    EntityKind::Billboard.updated_notice(),
                )
                .await
            }
            Err(err) => self.submit_failed(EntityKind::Billboard, err).await,
        }
    }

    /// Delete a billboard in the active store.
    ///
    async fn delete_billboard(&mut self, id: String) -> Result<()> {
        let store_id = match self.store_for_delete(EntityKind::Billboard).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Deleting billboard {} in store {}...", id, store_id);
        match self.api.delete_billboard(&store_id, &id).await {
            Ok(()) => {
                info!("Billboard {} deleted successfully.", id);
                self.delete_succeeded(EntityKind::Billboard).await
            }
            Err(err) => self.delete_failed(EntityKind::Billboard, err).await,
        }
    }

    /// Create a category in the active store.
    ///
    async fn create_category(&mut self, input: CategoryInput) -> Result<()> {
        let store_id = match self.store_for_submit(EntityKind::Category).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Creating category '{}' in store {}...", input.name, store_id);
        match self.api.create_category(&store_id, &input).await {
            Ok(category) => {
                info!("Category {} created successfully.", category.id);
                self.submit_succeeded(EntityKind::Category, EntityKind::Category.created_notice())
                    .await
            }
            Err(err) => self.submit_failed(EntityKind::Category, err).await,
        }
    }

    /// Update a category in the active store.
    ///
    async fn update_category(&mut self, id: String, input: CategoryInput) -> Result<()> {
        let store_id = match self.store_for_submit(EntityKind::Category).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Updating category {} in store {}...", id, store_id);
        match self.api.update_category(&store_id, &id, &input).await {
            Ok(_) => {
                info!("Category {} updated successfully.", id);
                self.submit_succeeded(EntityKind::Category, EntityKind::Category.updated_notice())
                    .await
            }
            Err(err) => self.submit_failed(EntityKind::Category, err).await,
        }
    }

    /// Delete a category in the active store.
    ///
    async fn delete_category(&mut self, id: String) -> Result<()> {
        let store_id = match self.store_for_delete(EntityKind::Category).await {
            Some(store_id) => store_id,
            None => return Ok(()),
        };
        info!("Deleting category {} in store {}...", id, store_id);
        match self.api.delete_category(&store_id, &id).await {
            Ok(()) => {
                info!("Category {} deleted successfully.", id);
                self.delete_succeeded(EntityKind::Category).await
            }
            Err(err) => self.delete_failed(EntityKind::Category, err).await,
        }
    }

    /// The active store id, if one is selected.
    ///
    async fn active_store(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.context().store_id().map(str::to_owned)
    }

    /// The active store for a submission, resolving the submission as failed
    /// when none is selected.
    ///
    async fn store_for_submit(&mut self, kind: EntityKind) -> Option<String> {
        if let Some(store_id) = self.active_store().await {
            return Some(store_id);
        }
        warn!("No active store for {} submission.", kind.label());
        self.state.lock().await.finish_submit_failure(kind);
        self.notifier.notify(Notice::failure(GENERIC_FAILURE));
        None
    }

    /// The active store for a deletion, resolving the deletion as failed
    /// when none is selected.
    ///
    async fn store_for_delete(&mut self, kind: EntityKind) -> Option<String> {
        if let Some(store_id) = self.active_store().await {
            return Some(store_id);
        }
        warn!("No active store for {} deletion.", kind.label());
        self.state.lock().await.finish_delete_failure();
        self.notifier.notify(Notice::failure(GENERIC_FAILURE));
        None
    }

    /// Refresh the listing backing the entity's redirect target.
    ///
    async fn refresh_kind(&mut self, kind: EntityKind) -> Result<()> {
        match kind {
            EntityKind::Store => self.refresh_stores().await,
            EntityKind::Billboard => self.refresh_billboards().await,
            EntityKind::Category => self.refresh_categories().await,
        }
    }

    /// Resolve a successful submission: refresh the listing, then redirect,
    /// then report success. The refresh runs before the redirect so the
    /// listing reflects the mutation when it is rendered.
    ///
    async fn submit_succeeded(&mut self, kind: EntityKind, message: String) -> Result<()> {
        if let Err(err) = self.refresh_kind(kind).await {
            // The write itself succeeded; resolve the form rather than wedge
            // it on a stale listing.
            warn!("Listing refresh after mutation failed: {}", err);
        }
        self.state.lock().await.finish_submit_success(kind);
        self.notifier.notify(Notice::success(message));
        Ok(())
    }

    /// Resolve a failed submission: the form stays editable with its values
    /// preserved and the user sees the generic failure notice.
    ///
    async fn submit_failed(&mut self, kind: EntityKind, err: ApiError) -> Result<()> {
        error!("{} submission failed: {}", kind.label(), err);
        self.state.lock().await.finish_submit_failure(kind);
        self.notifier.notify(Notice::failure(GENERIC_FAILURE));
        Ok(())
    }

    /// Resolve a successful deletion: refresh, redirect, report.
    ///
    async fn delete_succeeded(&mut self, kind: EntityKind) -> Result<()> {
        if let Err(err) = self.refresh_kind(kind).await {
            warn!("Listing refresh after delete failed: {}", err);
        }
        self.state.lock().await.finish_delete_success(kind);
        self.notifier
            .notify(Notice::success(kind.deleted_notice()));
        Ok(())
    }

    /// Resolve a failed deletion. A referential-integrity rejection names
    /// the dependents to remove first; any other failure stays generic.
    ///
    async fn delete_failed(&mut self, kind: EntityKind, err: ApiError) -> Result<()> {
        error!("{} deletion failed: {}", kind.label(), err);
        self.state.lock().await.finish_delete_failure();
        let message = if err.is_constraint() {
            kind.delete_constraint_hint().to_owned()
        } else {
            GENERIC_FAILURE.to_owned()
        };
        self.notifier.notify(Notice::failure(message));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, Severity};
    use crate::state::{FormPhase, Route, StoreContext};
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::mpsc::{channel, Receiver};

    fn engine_state(store: Option<&str>) -> (Arc<Mutex<State>>, Receiver<Event>) {
        let (tx, rx) = channel();
        let context = match store {
            Some(id) => StoreContext::new(id),
            None => StoreContext::default(),
        };
        (Arc::new(Mutex::new(State::new(tx, context))), rx)
    }

    #[tokio::test]
    async fn create_category_success_flow() -> Result<()> {
        let server = MockServer::start();
        let create_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/s1/categories").json_body(json!({
                    "name": "Shoes",
                    "billboardId": "b1",
                }));
                then.status(200).json_body(json!({
                    "id": "c1",
                    "name": "Shoes",
                    "billboardId": "b1",
                }));
            })
            .await;
        let refresh_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/s1/categories");
                then.status(200).json_body(json!([
                    { "id": "c1", "name": "Shoes", "billboardId": "b1" }
                ]));
            })
            .await;

        let (state, rx) = engine_state(Some("s1"));
        {
            let mut state = state.lock().await;
            state
                .open_create_form(EntityKind::Category)
                .change_field("name", "Shoes")
                .change_field("billboardId", "b1")
                .submit_form();
        }
        let event = rx.try_recv()?;

        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(event).await?;

        create_mock.assert_async().await;
        refresh_mock.assert_async().await;

        let state = state.lock().await;
        assert!(state.form().is_none());
        assert_eq!(state.current_route(), &Route::Listing(EntityKind::Category));
        assert_eq!(state.current_route().path("s1"), "/s1/categories");
        assert_eq!(state.categories().len(), 1);

        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(notifier.notices()[0].severity, Severity::Success);
        assert_eq!(notifier.notices()[0].message, "Category created.");
        Ok(())
    }

    #[tokio::test]
    async fn update_billboard_success_flow() -> Result<()> {
        let server = MockServer::start();
        let update_mock = server
            .mock_async(|when, then| {
                when.method("PATCH").path("/s1/billboards/b1");
                then.status(200).json_body(json!({
                    "id": "b1",
                    "label": "Summer sale",
                    "imageUrl": "https://cdn.example/summer.png",
                }));
            })
            .await;
        let refresh_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/s1/billboards");
                then.status(200).json_body(json!([
                    { "id": "b1", "label": "Summer sale", "imageUrl": "https://cdn.example/summer.png" }
                ]));
            })
            .await;

        let (state, rx) = engine_state(Some("s1"));
        {
            let mut state = state.lock().await;
            state
                .open_edit_form(
                    EntityKind::Billboard,
                    "b1".to_owned(),
                    std::collections::HashMap::from([
                        ("label".to_owned(), "Summer".to_owned()),
                        (
                            "imageUrl".to_owned(),
                            "https://cdn.example/summer.png".to_owned(),
                        ),
                    ]),
                )
                .change_field("label", "Summer sale")
                .submit_form();
        }
        let event = rx.try_recv()?;

        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(event).await?;

        update_mock.assert_async().await;
        refresh_mock.assert_async().await;

        let state = state.lock().await;
        assert_eq!(
            state.current_route(),
            &Route::Listing(EntityKind::Billboard)
        );
        assert_eq!(notifier.notices()[0].message, "Billboard updated.");
        Ok(())
    }

    #[tokio::test]
    async fn submit_failure_preserves_input_and_reports_generic_notice() -> Result<()> {
        let server = MockServer::start();
        let create_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/s1/categories");
                then.status(500).body("Internal error");
            })
            .await;

        let (state, rx) = engine_state(Some("s1"));
        {
            let mut state = state.lock().await;
            state
                .open_create_form(EntityKind::Category)
                .change_field("name", "Shoes")
                .change_field("billboardId", "b1")
                .submit_form();
        }
        let event = rx.try_recv()?;

        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(event).await?;

        create_mock.assert_async().await;

        let state = state.lock().await;
        let form = state.form().expect("form stays open on failure");
        assert_eq!(form.phase(), FormPhase::Error);
        assert!(!form.is_busy());
        assert_eq!(form.value("name"), Some("Shoes"));
        assert_eq!(notifier.notices()[0].severity, Severity::Failure);
        assert_eq!(notifier.notices()[0].message, "Something went wrong.");
        Ok(())
    }

    #[tokio::test]
    async fn delete_billboard_success_flow() -> Result<()> {
        let server = MockServer::start();
        let delete_mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/s1/billboards/b1");
                then.status(200).json_body(json!({
                    "id": "b1",
                    "label": "Summer",
                    "imageUrl": "u",
                }));
            })
            .await;
        let refresh_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/s1/billboards");
                then.status(200).json_body(json!([]));
            })
            .await;

        let (state, rx) = engine_state(Some("s1"));
        {
            let mut state = state.lock().await;
            state
                .request_delete(EntityKind::Billboard, "b1".to_owned())
                .confirm_delete();
        }
        let event = rx.try_recv()?;

        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(event).await?;

        delete_mock.assert_async().await;
        refresh_mock.assert_async().await;

        let state = state.lock().await;
        assert!(!state.delete_modal().is_open());
        assert_eq!(
            state.current_route(),
            &Route::Listing(EntityKind::Billboard)
        );
        assert_eq!(notifier.notices()[0].message, "Billboard deleted.");
        Ok(())
    }

    #[tokio::test]
    async fn delete_constraint_reports_dependents_hint() -> Result<()> {
        let server = MockServer::start();
        let delete_mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/s1/billboards/b1");
                then.status(409).body("Foreign key constraint violated");
            })
            .await;

        let (state, rx) = engine_state(Some("s1"));
        {
            let mut state = state.lock().await;
            state
                .request_delete(EntityKind::Billboard, "b1".to_owned())
                .confirm_delete();
        }
        let event = rx.try_recv()?;

        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(event).await?;

        delete_mock.assert_async().await;

        let state = state.lock().await;
        // Modal closes regardless of the outcome.
        assert!(!state.delete_modal().is_open());
        assert!(!state.delete_modal().is_busy());
        assert_eq!(state.current_route(), &Route::Dashboard);
        assert_eq!(notifier.notices()[0].severity, Severity::Failure);
        assert_eq!(
            notifier.notices()[0].message,
            "Make sure you removed all categories using this billboard first."
        );
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_selects_first_store() -> Result<()> {
        let server = MockServer::start();
        let stores_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/stores");
                then.status(200).json_body(json!([
                    { "id": "s1", "name": "Main" },
                    { "id": "s2", "name": "Outlet" }
                ]));
            })
            .await;

        let (state, rx) = engine_state(None);
        let api = Api::new(&server.base_url());
        let mut notifier = MemoryNotifier::new();
        let mut handler = Handler::new(&state, &api, &mut notifier);
        handler.handle(Event::Bootstrap).await?;

        stores_mock.assert_async().await;

        let state = state.lock().await;
        assert_eq!(state.stores().len(), 2);
        assert_eq!(state.context().store_id(), Some("s1"));
        // Selecting the store queued its listing refreshes.
        assert!(matches!(rx.try_recv()?, Event::RefreshBillboards));
        assert!(matches!(rx.try_recv()?, Event::RefreshCategories));
        Ok(())
    }
}
