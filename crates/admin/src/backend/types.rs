//! Wire types for the REST backend.
//!
//! The two list endpoints report pagination in different shapes; both are
//! normalised into [`Page`] here.

use serde::{Deserialize, Serialize};
use storeroom_core::{
    InventoryCount, Page, ProductId, Role, StoreUser, TrackingType, UserId, Variant, VariantId,
};

/// Permissions of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Permissions {
    pub role: Role,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// `GET /api/users` response.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    pub data: Vec<StoreUser>,
    pub pagination: UsersPagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsersPagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl UsersResponse {
    /// The users envelope has no page size, so the requested limit is used.
    pub(crate) fn into_page(self, limit: u32) -> Page<StoreUser> {
        Page {
            items: self.data,
            current_page: self.pagination.current_page.max(1),
            total_pages: self.pagination.total_pages,
            total_items: self.pagination.total_items,
            items_per_page: limit,
        }
    }
}

/// `GET /api/variants` response.
#[derive(Debug, Deserialize)]
pub(crate) struct VariantsResponse {
    pub data: Vec<Variant>,
    pub meta: VariantsMeta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantsMeta {
    pub pagination: VariantsPagination,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantsPagination {
    pub total: u64,
    #[allow(dead_code)]
    pub count: u32,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl VariantsResponse {
    pub(crate) fn into_page(self) -> Page<Variant> {
        let pagination = self.meta.pagination;
        Page {
            items: self.data,
            current_page: pagination.current_page.max(1),
            total_pages: pagination.total_pages,
            total_items: pagination.total,
            items_per_page: pagination.per_page,
        }
    }
}

/// `PUT /api/users` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    pub user_id: UserId,
    pub role: Role,
}

/// `PUT /api/variants` body.
///
/// `tracking_type` is `None` (sent as `null`) when the tracking type is
/// unchanged; the inventory count is always sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariantRequest {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub tracking_type: Option<TrackingType>,
    pub inventory_count: InventoryCount,
}
