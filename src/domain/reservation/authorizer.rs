//! Role policy for staff status changes.

use super::{ReservationError, ReservationStatus};
use crate::domain::foundation::{AuthenticatedUser, StaffRole};

/// Decides whether a staff member may move a booking between two statuses.
///
/// - into `Cancelled` from any other status needs Supervisor or Admin
/// - out of `Completed` or `Cancelled` into an open status needs the same
/// - everything else is open to any authenticated staff member
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleAuthorizer;

impl LifecycleAuthorizer {
    pub fn authorize(
        &self,
        actor: &AuthenticatedUser,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<(), ReservationError> {
        if from == to || actor.is_elevated() {
            return Ok(());
        }
        if to == ReservationStatus::Cancelled {
            return Err(ReservationError::permission(
                StaffRole::Supervisor,
                "Only Supervisors and Admins can cancel bookings.",
            ));
        }
        if from.is_finalized() && !to.is_finalized() {
            return Err(ReservationError::permission(
                StaffRole::Supervisor,
                "Only Supervisors and Admins can reopen finalized bookings.",
            ));
        }
        Ok(())
    }
}
