//! Customer directory queries and staff edits.

use std::sync::Arc;

use crate::domain::customer::{Customer, CustomerFilter, CustomerPatch};
use crate::domain::foundation::{AuthenticatedUser, CustomerId, DomainError, StaffRole};
use crate::domain::reservation::ReservationError;
use crate::ports::CustomerDirectory;

pub struct ListCustomersHandler {
    customers: Arc<dyn CustomerDirectory>,
}

impl ListCustomersHandler {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers }
    }

    pub async fn handle(&self, filter: CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        self.customers.list(&filter).await
    }
}

pub struct GetCustomerHandler {
    customers: Arc<dyn CustomerDirectory>,
}

impl GetCustomerHandler {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers }
    }

    pub async fn handle(&self, id: CustomerId) -> Result<Customer, ReservationError> {
        self.customers
            .get(&id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Customer", id))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCustomerCommand {
    pub customer_id: CustomerId,
    pub patch: CustomerPatch,
}

pub struct UpdateCustomerHandler {
    customers: Arc<dyn CustomerDirectory>,
}

impl UpdateCustomerHandler {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers }
    }

    pub async fn handle(
        &self,
        cmd: UpdateCustomerCommand,
        actor: &AuthenticatedUser,
    ) -> Result<Customer, ReservationError> {
        let mut customer = self
            .customers
            .get(&cmd.customer_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Customer", cmd.customer_id))?;
        customer.apply(cmd.patch)?;
        self.customers.save(&customer).await?;

        tracing::info!(customer_id = %customer.id, staff_id = %actor.id, "customer updated");
        Ok(customer)
    }
}

/// Removes a directory entry. Admin only.
pub struct DeleteCustomerHandler {
    customers: Arc<dyn CustomerDirectory>,
}

impl DeleteCustomerHandler {
    pub fn new(customers: Arc<dyn CustomerDirectory>) -> Self {
        Self { customers }
    }

    pub async fn handle(
        &self,
        id: CustomerId,
        actor: &AuthenticatedUser,
    ) -> Result<(), ReservationError> {
        if !actor.is_admin() {
            return Err(ReservationError::permission(
                StaffRole::Admin,
                "Only Admins can delete customers.",
            ));
        }
        if !self.customers.delete(&id).await? {
            return Err(ReservationError::not_found("Customer", id));
        }
        tracing::info!(customer_id = %id, staff_id = %actor.id, "customer deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCustomerDirectory;
    use crate::domain::area::{Area, AreaKind};
    use crate::domain::foundation::StaffId;
    use crate::domain::reservation::fixtures::draft_for;
    use crate::domain::reservation::Reservation;

    fn staff(role: StaffRole) -> AuthenticatedUser {
        AuthenticatedUser::new(StaffId::new("staff-2").unwrap(), "s@goldenbay.ph", None, role)
    }

    async fn directory_with_one() -> (Arc<InMemoryCustomerDirectory>, Customer) {
        let area = Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap();
        let booking = Reservation::create(draft_for(&area, 2), &area, None).unwrap();
        let customer = Customer::from_booking(&booking);
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        customers.save(&customer).await.unwrap();
        (customers, customer)
    }

    #[tokio::test]
    async fn staff_can_edit_profile_fields() {
        let (customers, customer) = directory_with_one().await;
        let updated = UpdateCustomerHandler::new(customers.clone())
            .handle(
                UpdateCustomerCommand {
                    customer_id: customer.id,
                    patch: CustomerPatch {
                        viber_number: Some("09171234567".to_string()),
                        notes: Some("Prefers window seat".to_string()),
                        ..Default::default()
                    },
                },
                &staff(StaffRole::Receptionist),
            )
            .await
            .unwrap();

        assert_eq!(updated.viber_number.as_deref(), Some("09171234567"));
        let stored = GetCustomerHandler::new(customers).handle(customer.id).await.unwrap();
        assert_eq!(stored.notes, "Prefers window seat");
    }

    #[tokio::test]
    async fn only_admins_delete() {
        let (customers, customer) = directory_with_one().await;
        let handler = DeleteCustomerHandler::new(customers.clone());

        let err = handler
            .handle(customer.id, &staff(StaffRole::Supervisor))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReservationError::PermissionDenied {
                required: StaffRole::Admin,
                ..
            }
        ));

        handler.handle(customer.id, &staff(StaffRole::Admin)).await.unwrap();
        assert!(customers.get(&customer.id).await.unwrap().is_none());
        assert!(matches!(
            handler.handle(customer.id, &staff(StaffRole::Admin)).await,
            Err(ReservationError::NotFound { entity: "Customer", .. })
        ));
    }

    #[tokio::test]
    async fn search_and_vip_filter() {
        let (customers, _) = directory_with_one().await;
        let handler = ListCustomersHandler::new(customers);

        let found = handler
            .handle(CustomerFilter {
                search: Some("maria".to_string()),
                vip_only: false,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let vips = handler
            .handle(CustomerFilter {
                search: None,
                vip_only: true,
            })
            .await
            .unwrap();
        assert!(vips.is_empty());
    }
}
