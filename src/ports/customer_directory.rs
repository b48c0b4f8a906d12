//! CustomerDirectory port - guest profiles keyed by phone.

use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerFilter};
use crate::domain::foundation::{CustomerId, DomainError};

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError>;

    /// Inserts or replaces by id.
    async fn save(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Ordered by name.
    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError>;

    /// Returns `false` when no such customer existed.
    async fn delete(&self, id: &CustomerId) -> Result<bool, DomainError>;
}
