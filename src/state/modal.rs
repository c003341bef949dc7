//! Delete confirmation modal state.
//!
//! A destructive action is blocked until the user explicitly confirms it.
//! The modal only reads and reports; the surrounding state owns its
//! lifecycle and dispatches the confirmed delete.

use crate::api::EntityKind;
use log::*;

/// Target of a pending destructive action.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DeleteTarget {
    pub kind: EntityKind,
    pub id: String,
}

/// Confirmation gate in front of entity deletion.
///
/// Closed until a delete intent opens it; `confirm` hands the target back to
/// the caller and marks the modal busy until the outcome lands. The busy
/// flag disables both buttons while the delete is in flight.
#[derive(Debug, Default)]
pub struct ConfirmModal {
    target: Option<DeleteTarget>,
    busy: bool,
}

impl ConfirmModal {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The entity pending deletion, while open.
    ///
    pub fn target(&self) -> Option<&DeleteTarget> {
        self.target.as_ref()
    }

    /// Open the modal for the given entity. Ignored while a delete is in
    /// flight.
    ///
    pub fn open(&mut self, kind: EntityKind, id: String) -> &mut Self {
        if self.busy {
            warn!("Ignoring delete request while another delete is in flight.");
            return self;
        }
        self.target = Some(DeleteTarget { kind, id });
        self
    }

    /// Close without side effect. Ignored while busy (the cancel button is
    /// disabled during an in-flight delete).
    ///
    pub fn cancel(&mut self) -> &mut Self {
        if self.busy {
            debug!("Ignoring cancel while delete is in flight.");
            return self;
        }
        self.target = None;
        self
    }

    /// Confirm the pending deletion. Returns the target for the caller to
    /// dispatch; the modal stays open and busy until `finish` is called.
    /// Returns `None` when closed or already busy.
    ///
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        if self.busy {
            debug!("Ignoring confirm while delete is in flight.");
            return None;
        }
        let target = self.target.clone()?;
        self.busy = true;
        Some(target)
    }

    /// Record that the in-flight delete finished. Closes the modal
    /// regardless of the action's outcome; outcome reporting is the
    /// caller's concern.
    ///
    pub fn finish(&mut self) -> &mut Self {
        self.busy = false;
        self.target = None;
        self
    }
}
