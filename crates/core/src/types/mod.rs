//! Domain types: IDs, emails, roles, and order lifecycle enums.

pub mod email;
pub mod id;
pub mod order;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{OrderNumber, OrderStatus, PaymentMethod, PaymentStatus};
pub use role::Role;
