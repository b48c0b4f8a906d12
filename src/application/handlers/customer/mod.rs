//! Customer directory handlers.

mod customer_sync;
mod manage_customers;

pub use customer_sync::CustomerSyncHandler;
pub use manage_customers::{
    DeleteCustomerHandler, GetCustomerHandler, ListCustomersHandler, UpdateCustomerCommand,
    UpdateCustomerHandler,
};
