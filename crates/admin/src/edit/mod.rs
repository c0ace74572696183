//! Edit surfaces: the inline role editor and the variant modal.

pub mod role;
pub mod variant;

pub use role::{RoleCellView, RoleForm, RoleUpdateOutcome, RowWriteGuard, RowWriteLocks};
pub use variant::{
    ModalView, SAVE_FAILED_MESSAGE, SaveAction, VariantDraft, VariantForm, VariantSnapshot,
    modal_dom_id, save_action,
};
