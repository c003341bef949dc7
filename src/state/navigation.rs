//! Navigation-related state types.
//!
//! This module contains the route types for the admin surface and their
//! path rendering.

use crate::api::EntityKind;

/// Specifying the addressable locations within the admin surface.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Route {
    /// Store-level overview.
    Dashboard,
    /// Collection listing for an entity type.
    Listing(EntityKind),
    /// Create (no id) or edit (with id) form for an entity type.
    Form {
        kind: EntityKind,
        id: Option<String>,
    },
}

impl Route {
    /// The listing route mutations of this entity type redirect to. Store
    /// mutations land on the dashboard; stores have no listing page of
    /// their own.
    ///
    pub fn listing(kind: EntityKind) -> Route {
        match kind {
            EntityKind::Store => Route::Dashboard,
            _ => Route::Listing(kind),
        }
    }

    /// Render the route as an absolute path under the active store.
    ///
    pub fn path(&self, store_id: &str) -> String {
        match self {
            Route::Dashboard => format!("/{}", store_id),
            Route::Listing(kind) => format!("/{}/{}", store_id, kind.resource()),
            Route::Form { kind, id } => match id {
                Some(id) => format!("/{}/{}/{}", store_id, kind.resource(), id),
                None => format!("/{}/{}/new", store_id, kind.resource()),
            },
        }
    }
}
