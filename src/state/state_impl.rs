use crate::api::{
    Billboard, BillboardInput, Category, CategoryInput, EntityKind, Store, StoreInput,
};
use crate::app::EventSender;
use crate::events::network::Event as NetworkEvent;
use log::*;
use std::collections::HashMap;

use super::form::{Form, FormMode};
use super::modal::ConfirmModal;
use super::navigation::Route;

/// Ambient identifiers addressing the backend, supplied by the surrounding
/// navigation. Read-only to forms.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreContext {
    store_id: Option<String>,
}

impl StoreContext {
    /// Return a context for the given store.
    ///
    pub fn new(store_id: impl Into<String>) -> StoreContext {
        StoreContext {
            store_id: Some(store_id.into()),
        }
    }

    /// The active store, if one is selected.
    ///
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }
}

/// Houses data representative of the admin surface state.
///
/// Owned by the embedder's thread behind a lock; the network worker applies
/// gateway results through the `finish_*` methods. Mutators dispatch network
/// events over the channel rather than performing I/O themselves.
pub struct State {
    net_sender: Option<EventSender>,
    context: StoreContext,
    stores: Vec<Store>,
    billboards: Vec<Billboard>,
    categories: Vec<Category>,
    route_stack: Vec<Route>,
    form: Option<Form>,
    delete_modal: ConfirmModal,
}

/// Defines default engine state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            context: StoreContext::default(),
            stores: vec![],
            billboards: vec![],
            categories: vec![],
            route_stack: vec![Route::Dashboard],
            form: None,
            delete_modal: ConfirmModal::default(),
        }
    }
}

impl State {
    /// Return a new instance wired to the network event channel.
    ///
    pub fn new(net_sender: EventSender, context: StoreContext) -> State {
        State {
            net_sender: Some(net_sender),
            context,
            ..State::default()
        }
    }

    /// Get the ambient store context.
    ///
    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// Get the known stores.
    ///
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Set the known stores.
    ///
    pub fn set_stores(&mut self, stores: Vec<Store>) -> &mut Self {
        self.stores = stores;
        self
    }

    /// Get the billboards for the active store.
    ///
    pub fn billboards(&self) -> &[Billboard] {
        &self.billboards
    }

    /// Set the billboards for the active store.
    ///
    pub fn set_billboards(&mut self, billboards: Vec<Billboard>) -> &mut Self {
        self.billboards = billboards;
        self
    }

    /// Get the categories for the active store.
    ///
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Set the categories for the active store.
    ///
    pub fn set_categories(&mut self, categories: Vec<Category>) -> &mut Self {
        self.categories = categories;
        self
    }

    /// Get the route currently shown.
    ///
    pub fn current_route(&self) -> &Route {
        // The stack is seeded with Dashboard and never popped below one entry.
        self.route_stack.last().expect("route stack is never empty")
    }

    /// Navigate to a route. Leaving a form route discards the form state.
    ///
    pub fn navigate_to(&mut self, route: Route) -> &mut Self {
        if !matches!(route, Route::Form { .. }) {
            self.form = None;
        }
        self.route_stack.push(route);
        self
    }

    /// Navigate back to the previous route.
    ///
    pub fn navigate_back(&mut self) -> &mut Self {
        if self.route_stack.len() > 1 {
            self.route_stack.pop();
            if !matches!(self.current_route(), Route::Form { .. }) {
                self.form = None;
            }
        }
        self
    }

    /// Switch the active store: updates the ambient context, resets
    /// navigation to the store's dashboard, and refreshes its listings.
    ///
    pub fn switch_store(&mut self, store_id: String) -> &mut Self {
        info!("Switching to store {}...", store_id);
        self.context = StoreContext::new(store_id);
        self.form = None;
        self.delete_modal = ConfirmModal::default();
        self.route_stack = vec![Route::Dashboard];
        self.billboards.clear();
        self.categories.clear();
        self.dispatch(NetworkEvent::RefreshBillboards)
            .dispatch(NetworkEvent::RefreshCategories)
    }

    /// Get the open form, if any.
    ///
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// Open a create-mode form for the entity type.
    ///
    pub fn open_create_form(&mut self, kind: EntityKind) -> &mut Self {
        self.form = Some(Form::create(kind));
        self.navigate_to(Route::Form { kind, id: None })
    }

    /// Open an edit-mode form seeded with an existing entity's values.
    ///
    pub fn open_edit_form(
        &mut self,
        kind: EntityKind,
        id: String,
        values: HashMap<String, String>,
    ) -> &mut Self {
        self.form = Some(Form::edit(kind, id.clone(), values));
        self.navigate_to(Route::Form { kind, id: Some(id) })
    }

    /// Update a field on the open form.
    ///
    pub fn change_field(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        match self.form.as_mut() {
            Some(form) => {
                form.change_field(name, value);
            }
            None => warn!("Ignoring field change with no open form."),
        }
        self
    }

    /// Submit the open form: validate, and when validation passes dispatch
    /// the create or update event matching the form's mode. A submit while
    /// one is already in flight dispatches nothing.
    ///
    pub fn submit_form(&mut self) -> &mut Self {
        let kind = match self.form.as_ref() {
            Some(form) => form.kind(),
            None => {
                warn!("Ignoring submit with no open form.");
                return self;
            }
        };
        // Store forms address the root resource; everything else needs an
        // active store to build its path.
        if kind != EntityKind::Store && self.context.store_id().is_none() {
            warn!("Ignoring submit with no active store.");
            return self;
        }
        let (mode, values) = match self.form.as_mut() {
            Some(form) => match form.begin_submit() {
                Some(values) => (form.mode().clone(), values),
                None => return self,
            },
            None => return self,
        };
        let event = match kind {
            EntityKind::Store => {
                let input = StoreInput::from_values(&values);
                match mode {
                    FormMode::Create => NetworkEvent::CreateStore { input },
                    FormMode::Edit { id } => NetworkEvent::UpdateStore { id, input },
                }
            }
            EntityKind::Billboard => {
                let input = BillboardInput::from_values(&values);
                match mode {
                    FormMode::Create => NetworkEvent::CreateBillboard { input },
                    FormMode::Edit { id } => NetworkEvent::UpdateBillboard { id, input },
                }
            }
            EntityKind::Category => {
                let input = CategoryInput::from_values(&values);
                match mode {
                    FormMode::Create => NetworkEvent::CreateCategory { input },
                    FormMode::Edit { id } => NetworkEvent::UpdateCategory { id, input },
                }
            }
        };
        self.dispatch(event)
    }

    /// Resolve a submission that succeeded: close the form and redirect to
    /// the entity's listing. A result arriving after the form was discarded
    /// is dropped.
    ///
    pub fn finish_submit_success(&mut self, kind: EntityKind) -> &mut Self {
        match self.form.as_mut() {
            Some(form) if form.is_busy() && form.kind() == kind => {
                form.finish_success();
            }
            _ => {
                warn!("Discarding submit result with no matching submission in flight.");
                return self;
            }
        }
        self.form = None;
        self.navigate_to(Route::listing(kind))
    }

    /// Resolve a submission that failed: the form stays open with its values
    /// preserved so the user can retry.
    ///
    pub fn finish_submit_failure(&mut self, kind: EntityKind) -> &mut Self {
        match self.form.as_mut() {
            Some(form) if form.is_busy() && form.kind() == kind => {
                form.finish_failure();
            }
            _ => warn!("Discarding submit failure with no matching submission in flight."),
        }
        self
    }

    /// Get the delete confirmation modal.
    ///
    pub fn delete_modal(&self) -> &ConfirmModal {
        &self.delete_modal
    }

    /// Show the delete confirmation modal for an entity.
    ///
    pub fn request_delete(&mut self, kind: EntityKind, id: String) -> &mut Self {
        self.delete_modal.open(kind, id);
        self
    }

    /// Dismiss the delete confirmation modal without side effect.
    ///
    pub fn cancel_delete(&mut self) -> &mut Self {
        self.delete_modal.cancel();
        self
    }

    /// Confirm the pending deletion and dispatch the delete event. A confirm
    /// while one is already in flight dispatches nothing.
    ///
    pub fn confirm_delete(&mut self) -> &mut Self {
        let target = match self.delete_modal.confirm() {
            Some(target) => target,
            None => return self,
        };
        let event = match target.kind {
            EntityKind::Store => NetworkEvent::DeleteStore { id: target.id },
            EntityKind::Billboard => NetworkEvent::DeleteBillboard { id: target.id },
            EntityKind::Category => NetworkEvent::DeleteCategory { id: target.id },
        };
        self.dispatch(event)
    }

    /// Resolve a deletion that succeeded: close the modal, drop any form for
    /// the deleted entity, and redirect to the listing.
    ///
    pub fn finish_delete_success(&mut self, kind: EntityKind) -> &mut Self {
        if !self.delete_modal.is_busy() {
            warn!("Discarding delete result with no delete in flight.");
            return self;
        }
        self.delete_modal.finish();
        self.form = None;
        self.navigate_to(Route::listing(kind))
    }

    /// Resolve a deletion that failed: the modal closes regardless of the
    /// outcome; reporting is the network handler's concern.
    ///
    pub fn finish_delete_failure(&mut self) -> &mut Self {
        if !self.delete_modal.is_busy() {
            warn!("Discarding delete failure with no delete in flight.");
            return self;
        }
        self.delete_modal.finish();
        self
    }

    /// Send a network event for asynchronous processing.
    ///
    fn dispatch(&mut self, event: NetworkEvent) -> &mut Self {
        if let Some(net_sender) = &self.net_sender {
            if let Err(err) = net_sender.send(event) {
                error!("Failed to dispatch network event: {}", err);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormPhase;
    use std::sync::mpsc::{channel, Receiver, TryRecvError};

    fn state_with_channel(store: Option<&str>) -> (State, Receiver<NetworkEvent>) {
        let (tx, rx) = channel();
        let context = match store {
            Some(id) => StoreContext::new(id),
            None => StoreContext::default(),
        };
        (State::new(tx, context), rx)
    }

    #[test]
    fn test_default_state() {
        let state = State::default();
        assert_eq!(state.current_route(), &Route::Dashboard);
        assert!(state.form().is_none());
        assert!(!state.delete_modal().is_open());
        assert!(state.stores().is_empty());
    }

    #[test]
    fn test_valid_submit_dispatches_create_event() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form();

        match rx.try_recv().unwrap() {
            NetworkEvent::CreateCategory { input } => {
                assert_eq!(input.name, "Shoes");
                assert_eq!(input.billboard_id, "b1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(state.form().unwrap().is_busy());
        assert_eq!(state.form().unwrap().phase(), FormPhase::Submitting);
    }

    #[test]
    fn test_invalid_submit_dispatches_nothing() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("billboardId", "b1")
            .submit_form();

        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(state.form().unwrap().phase(), FormPhase::Error);
    }

    #[test]
    fn test_resubmit_while_busy_dispatches_nothing() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form()
            .submit_form();

        assert!(rx.try_recv().is_ok());
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn test_edit_submit_dispatches_update_event() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        let category = Category {
            id: "c1".to_owned(),
            name: "Shoes".to_owned(),
            billboard_id: "b1".to_owned(),
        };
        state
            .open_edit_form(
                EntityKind::Category,
                category.id.clone(),
                category.form_values(),
            )
            .change_field("name", "Sneakers")
            .submit_form();

        match rx.try_recv().unwrap() {
            NetworkEvent::UpdateCategory { id, input } => {
                assert_eq!(id, "c1");
                assert_eq!(input.name, "Sneakers");
                assert_eq!(input.billboard_id, "b1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_store_scoped_submit_requires_active_store() {
        let (mut state, rx) = state_with_channel(None);
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form();
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn test_store_form_submits_without_active_store() {
        let (mut state, rx) = state_with_channel(None);
        state
            .open_create_form(EntityKind::Store)
            .change_field("name", "Main")
            .submit_form();
        assert!(matches!(
            rx.try_recv().unwrap(),
            NetworkEvent::CreateStore { .. }
        ));
    }

    #[test]
    fn test_finish_submit_success_redirects_to_listing() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form()
            .finish_submit_success(EntityKind::Category);

        assert!(state.form().is_none());
        assert_eq!(state.current_route(), &Route::Listing(EntityKind::Category));
        assert_eq!(state.current_route().path("s1"), "/s1/categories");
    }

    #[test]
    fn test_finish_submit_failure_keeps_form_editable() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form()
            .finish_submit_failure(EntityKind::Category);

        let form = state.form().unwrap();
        assert_eq!(form.phase(), FormPhase::Error);
        assert!(!form.is_busy());
        assert_eq!(form.value("name"), Some("Shoes"));
        assert!(matches!(state.current_route(), Route::Form { .. }));
    }

    #[test]
    fn test_late_result_does_not_resurrect_discarded_form() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .change_field("billboardId", "b1")
            .submit_form()
            // User navigates away while the request is in flight.
            .navigate_to(Route::Dashboard)
            .finish_submit_success(EntityKind::Category);

        assert!(state.form().is_none());
        assert_eq!(state.current_route(), &Route::Dashboard);
    }

    #[test]
    fn test_navigating_away_discards_form_state() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .open_create_form(EntityKind::Category)
            .change_field("name", "Shoes")
            .navigate_to(Route::Listing(EntityKind::Billboard));
        assert!(state.form().is_none());
    }

    #[test]
    fn test_delete_flow_dispatches_once() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .request_delete(EntityKind::Billboard, "b1".to_owned())
            .confirm_delete()
            // Second confirm while busy must not dispatch again.
            .confirm_delete();

        assert!(matches!(
            rx.try_recv().unwrap(),
            NetworkEvent::DeleteBillboard { id } if id == "b1"
        ));
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        assert!(state.delete_modal().is_busy());
    }

    #[test]
    fn test_cancel_delete_dispatches_nothing() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .request_delete(EntityKind::Billboard, "b1".to_owned())
            .cancel_delete();
        assert!(!state.delete_modal().is_open());
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn test_finish_delete_success_closes_modal_and_redirects() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .request_delete(EntityKind::Billboard, "b1".to_owned())
            .confirm_delete()
            .finish_delete_success(EntityKind::Billboard);

        assert!(!state.delete_modal().is_open());
        assert_eq!(
            state.current_route(),
            &Route::Listing(EntityKind::Billboard)
        );
    }

    #[test]
    fn test_finish_delete_failure_closes_modal_in_place() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .open_edit_form(
                EntityKind::Billboard,
                "b1".to_owned(),
                HashMap::from([
                    ("label".to_owned(), "Summer".to_owned()),
                    ("imageUrl".to_owned(), "u".to_owned()),
                ]),
            )
            .request_delete(EntityKind::Billboard, "b1".to_owned())
            .confirm_delete()
            .finish_delete_failure();

        assert!(!state.delete_modal().is_open());
        assert!(!state.delete_modal().is_busy());
        // Still on the edit form; the entity was not deleted.
        assert!(state.form().is_some());
    }

    #[test]
    fn test_switch_store_resets_and_refreshes() {
        let (mut state, rx) = state_with_channel(Some("s1"));
        state
            .set_billboards(vec![Billboard {
                id: "b1".to_owned(),
                label: "Summer".to_owned(),
                image_url: "u".to_owned(),
            }])
            .open_create_form(EntityKind::Category)
            .switch_store("s2".to_owned());

        assert_eq!(state.context().store_id(), Some("s2"));
        assert_eq!(state.current_route(), &Route::Dashboard);
        assert!(state.form().is_none());
        assert!(state.billboards().is_empty());
        assert!(matches!(
            rx.try_recv().unwrap(),
            NetworkEvent::RefreshBillboards
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            NetworkEvent::RefreshCategories
        ));
    }

    #[test]
    fn test_navigate_back() {
        let (mut state, _rx) = state_with_channel(Some("s1"));
        state
            .navigate_to(Route::Listing(EntityKind::Category))
            .navigate_back();
        assert_eq!(state.current_route(), &Route::Dashboard);
        // Never pops below the seed route.
        state.navigate_back();
        assert_eq!(state.current_route(), &Route::Dashboard);
    }
}
