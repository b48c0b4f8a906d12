//! In-memory customer directory.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::customer::{Customer, CustomerFilter};
use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::CustomerDirectory;

#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn get(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.customers.read().await.get(id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self
            .customers
            .read()
            .await
            .values()
            .find(|c| c.phone == phone)
            .cloned())
    }

    async fn save(&self, customer: &Customer) -> Result<(), DomainError> {
        let mut customers = self.customers.write().await;
        let phone_taken = customers
            .values()
            .any(|c| c.phone == customer.phone && c.id != customer.id);
        if phone_taken {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "phone already belongs to another customer",
            )
            .with_detail("field", "phone"));
        }
        customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        let mut found: Vec<Customer> = self
            .customers
            .read()
            .await
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, DomainError> {
        Ok(self.customers.write().await.remove(id).is_some())
    }
}
