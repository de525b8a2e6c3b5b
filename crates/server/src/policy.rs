//! Access rules for stores, products, and orders.
//!
//! Handlers describe what the caller is attempting as an [`Action`] and ask
//! [`authorize`] whether the authenticated user may do it. Keeping the rules
//! and their denial messages in one table keeps the route handlers short and
//! the wording consistent.

use thiserror::Error;

use retail_radar_core::{Role, UserId};

use crate::models::CurrentUser;

/// Refusal returned when an action is not allowed for the caller.
///
/// The message is the exact string sent back in the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Denied {
    reason: &'static str,
}

impl Denied {
    /// The user-facing denial message.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

/// An action a handler wants to perform on behalf of the caller.
///
/// Mutations on owned resources carry the resource's `owner_id` so the rule
/// can compare it against the caller.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    CreateStore,
    ViewOwnStores,
    UpdateStore { owner_id: UserId },
    DeleteStore { owner_id: UserId },
    CreateProduct,
    ViewOwnProducts,
    UpdateProduct { owner_id: UserId },
    DeleteProduct { owner_id: UserId },
    ViewOrder { customer_id: UserId },
    UpdateOrderStatus,
}

/// Decide whether `actor` may perform `action`.
///
/// # Errors
///
/// Returns [`Denied`] with the user-facing message when the action is not
/// allowed.
///
/// # Example
///
/// ```rust,ignore
/// policy::authorize(&user, Action::UpdateStore { owner_id: store.owner_id })?;
/// ```
pub fn authorize(actor: &CurrentUser, action: Action) -> Result<(), Denied> {
    match action {
        Action::CreateStore => require_store_owner(actor, "Only store owners can create stores"),
        Action::CreateProduct => {
            require_store_owner(actor, "Only store owners can create products")
        }
        Action::ViewOwnStores | Action::ViewOwnProducts | Action::UpdateOrderStatus => {
            require_store_owner(actor, "Only store owners can access this endpoint")
        }
        Action::UpdateStore { owner_id } => {
            require_owner(actor, owner_id, "Not authorized to update this store")
        }
        Action::DeleteStore { owner_id } => {
            require_owner(actor, owner_id, "Not authorized to delete this store")
        }
        Action::UpdateProduct { owner_id } => {
            require_owner(actor, owner_id, "Not authorized to update this product")
        }
        Action::DeleteProduct { owner_id } => {
            require_owner(actor, owner_id, "Not authorized to delete this product")
        }
        // Customers may only open their own orders. Store owners pass so
        // they can inspect orders that touch their inventory.
        Action::ViewOrder { customer_id } => {
            if actor.role == Role::Customer && actor.id != customer_id {
                Err(Denied {
                    reason: "Access denied",
                })
            } else {
                Ok(())
            }
        }
    }
}

fn require_store_owner(actor: &CurrentUser, reason: &'static str) -> Result<(), Denied> {
    if actor.role.is_store_owner() {
        Ok(())
    } else {
        Err(Denied { reason })
    }
}

fn require_owner(
    actor: &CurrentUser,
    owner_id: UserId,
    reason: &'static str,
) -> Result<(), Denied> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(Denied { reason })
    }
}
