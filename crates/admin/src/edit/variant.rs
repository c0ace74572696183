//! Variant edit modal.
//!
//! The modal is opened with a snapshot of the row and posts the draft
//! together with that snapshot, so a save can tell what changed without
//! looking anything up.

use serde::Deserialize;
use storeroom_core::{
    InventoryCount, InventoryCountError, ProductId, TrackingType, VariantId,
};

use crate::backend::UpdateVariantRequest;
use crate::middleware::SessionToken;

/// Shown in the modal when the backend rejects a save.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to update the variant. Please try again.";

/// Editable fields of a variant as listed when the modal was opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariantSnapshot {
    pub product_id: ProductId,
    pub sku: String,
    pub tracking: TrackingType,
    pub inventory: u32,
}

/// Values currently entered in the form. The count is kept as typed so an
/// invalid entry can be shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDraft {
    pub tracking: TrackingType,
    pub inventory: String,
}

impl VariantDraft {
    /// Draft equal to the snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &VariantSnapshot) -> Self {
        Self {
            tracking: snapshot.tracking,
            inventory: snapshot.inventory.to_string(),
        }
    }
}

/// Modal form submission: the snapshot fields plus the draft.
#[derive(Debug, Deserialize)]
pub struct VariantForm {
    pub product_id: ProductId,
    pub sku: String,
    pub original_tracking: TrackingType,
    pub original_inventory: u32,
    pub tracking: TrackingType,
    pub inventory: String,
}

impl VariantForm {
    #[must_use]
    pub fn into_parts(self) -> (VariantSnapshot, VariantDraft) {
        (
            VariantSnapshot {
                product_id: self.product_id,
                sku: self.sku,
                tracking: self.original_tracking,
                inventory: self.original_inventory,
            },
            VariantDraft {
                tracking: self.tracking,
                inventory: self.inventory,
            },
        )
    }
}

/// What saving a draft does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    /// Nothing changed; close without a request.
    Close,
    /// Send this update.
    Write(UpdateVariantRequest),
}

/// Decide how to save `draft`.
///
/// The inventory count is always sent; the tracking type only when it
/// differs from the snapshot (`None` otherwise).
///
/// # Errors
///
/// Returns the validation error when the entered count is not accepted.
pub fn save_action(
    variant_id: VariantId,
    snapshot: &VariantSnapshot,
    draft: &VariantDraft,
) -> Result<SaveAction, InventoryCountError> {
    let count = InventoryCount::parse(&draft.inventory)?;
    let tracking_changed = draft.tracking != snapshot.tracking;

    if !tracking_changed && count.get() == snapshot.inventory {
        return Ok(SaveAction::Close);
    }

    Ok(SaveAction::Write(UpdateVariantRequest {
        variant_id,
        product_id: snapshot.product_id,
        tracking_type: tracking_changed.then_some(draft.tracking),
        inventory_count: count,
    }))
}

/// One option of the tracking type select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Template data for the open modal.
#[derive(Debug, Clone)]
pub struct ModalView {
    pub dom_id: String,
    pub title: String,
    /// Save endpoint, carrying the session token.
    pub action: String,
    pub snapshot: VariantSnapshot,
    pub inventory: String,
    pub max_digits: usize,
    pub max_inventory: u32,
    pub tracking_options: Vec<TrackingOption>,
    pub error: Option<String>,
}

impl ModalView {
    /// Modal in the editing state with `draft` filled in.
    #[must_use]
    pub fn editing(
        session: &SessionToken,
        variant_id: VariantId,
        snapshot: VariantSnapshot,
        draft: VariantDraft,
        error: Option<String>,
    ) -> Self {
        let tracking_options = TrackingType::ALL
            .iter()
            .map(|&t| TrackingOption {
                value: t.as_str(),
                label: t.label(),
                selected: t == draft.tracking,
            })
            .collect();

        Self {
            dom_id: modal_dom_id(variant_id),
            title: format!("Editing SKU: {}", snapshot.sku),
            action: session.href(&format!("/inventory/variants/{variant_id}"), &[]),
            snapshot,
            inventory: draft.inventory,
            max_digits: InventoryCount::MAX_DIGITS,
            max_inventory: InventoryCount::MAX,
            tracking_options,
            error,
        }
    }
}

/// DOM id of a variant's modal; a response for a closed modal has no target.
#[must_use]
pub fn modal_dom_id(variant_id: VariantId) -> String {
    format!("variant-modal-{variant_id}")
}
