//! UpdateReservationHandler - staff edits, including status changes.
//!
//! The role check runs before anything is written. The edited record is
//! re-validated as a whole and re-admitted into its slot under the area
//! lock, excluding its own previous version.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, CommandMetadata, EventEnvelope, ReservationId};
use crate::domain::reservation::{
    ChangeSet, HistoryKind, LifecycleAuthorizer, Rejection, Reservation, ReservationError,
    ReservationPatch, ReservationUpdated,
};
use crate::ports::{AreaRegistry, LedgerRecord, ReservationLedger};

#[derive(Debug, Clone)]
pub struct UpdateReservationCommand {
    pub reservation_id: ReservationId,
    pub patch: ReservationPatch,
    /// Version the editor saw. When set, a newer stored version is a conflict.
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct UpdateReservationResult {
    pub reservation: Reservation,
    pub changes: ChangeSet,
}

pub struct UpdateReservationHandler {
    areas: Arc<dyn AreaRegistry>,
    ledger: Arc<dyn ReservationLedger>,
    authorizer: LifecycleAuthorizer,
}

impl UpdateReservationHandler {
    pub fn new(areas: Arc<dyn AreaRegistry>, ledger: Arc<dyn ReservationLedger>) -> Self {
        Self {
            areas,
            ledger,
            authorizer: LifecycleAuthorizer,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateReservationCommand,
        actor: &AuthenticatedUser,
        metadata: CommandMetadata,
    ) -> Result<UpdateReservationResult, ReservationError> {
        let current = self
            .ledger
            .find_by_id(&cmd.reservation_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Reservation", cmd.reservation_id))?;

        if cmd.expected_version.is_some_and(|v| v != current.version) {
            return Err(ReservationError::Conflict(Rejection::StaleVersion));
        }
        if let Some(target) = cmd.patch.status {
            if let Err(e) = self.authorizer.authorize(actor, current.status, target) {
                tracing::warn!(
                    reservation_id = %current.id,
                    staff_id = %actor.id,
                    role = %actor.role,
                    from = %current.status,
                    to = %target,
                    "status change denied"
                );
                return Err(e);
            }
        }

        let area_id = cmd.patch.area_id.unwrap_or(current.area_id);
        let area = self
            .areas
            .get(&area_id)
            .await?
            .ok_or_else(|| ReservationError::not_found("Area", area_id))?;

        let (next, changes) = current.apply(cmd.patch, &area, actor.id.clone())?;

        let event = ReservationUpdated::new(&next, &area.name, changes);
        let envelope = EventEnvelope::from_event(&event)
            .map_err(|e| ReservationError::Infrastructure(e.to_string()))?
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(actor.id.to_string());

        let committed = self
            .ledger
            .update(
                current.version,
                &next,
                &area,
                LedgerRecord::new(HistoryKind::Updated, actor.id.to_string(), vec![envelope]),
            )
            .await?;

        tracing::info!(
            reservation_id = %committed.id,
            staff_id = %actor.id,
            from = %changes.previous_status,
            to = %committed.status,
            details_changed = changes.details_changed,
            version = committed.version,
            "reservation updated"
        );

        Ok(UpdateReservationResult {
            reservation: committed,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAreaRegistry, InMemoryOutbox, InMemoryReservationStore};
    use crate::domain::area::{Area, AreaKind};
    use crate::domain::foundation::{StaffId, StaffRole};
    use crate::domain::reservation::fixtures::draft_for;
    use crate::domain::reservation::{ReservationStatus, RESERVATION_UPDATED};
    use chrono::NaiveTime;

    struct Fixture {
        hall: Area,
        vip: Area,
        vip2: Area,
        outbox: Arc<InMemoryOutbox>,
        store: Arc<InMemoryReservationStore>,
        handler: UpdateReservationHandler,
    }

    fn fixture() -> Fixture {
        let hall = Area::new("Main Dining Hall", AreaKind::Shared, 250).unwrap();
        let vip = Area::new("VIP Room 1", AreaKind::Exclusive, 20).unwrap();
        let vip2 = Area::new("VIP Room 2", AreaKind::Exclusive, 10).unwrap();
        let areas = Arc::new(InMemoryAreaRegistry::with_areas(vec![
            hall.clone(),
            vip.clone(),
            vip2.clone(),
        ]));
        let outbox = Arc::new(InMemoryOutbox::new());
        let store = Arc::new(InMemoryReservationStore::new(outbox.clone()));
        let handler = UpdateReservationHandler::new(areas, store.clone());
        Fixture {
            hall,
            vip,
            vip2,
            outbox,
            store,
            handler,
        }
    }

    fn staff(role: StaffRole) -> AuthenticatedUser {
        AuthenticatedUser::new(StaffId::new("staff-9").unwrap(), "s@goldenbay.ph", None, role)
    }

    async fn seed(f: &Fixture, area: &Area, pax: u32, status: ReservationStatus) -> Reservation {
        let mut reservation = Reservation::create(draft_for(area, pax), area, None).unwrap();
        reservation.status = status;
        f.store
            .insert(&reservation, area, LedgerRecord::new(HistoryKind::Created, "public", vec![]))
            .await
            .unwrap();
        reservation
    }

    fn command(id: ReservationId, patch: ReservationPatch) -> UpdateReservationCommand {
        UpdateReservationCommand {
            reservation_id: id,
            patch,
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn receptionist_cannot_cancel_but_supervisor_can() {
        let f = fixture();
        let booking = seed(&f, &f.vip, 6, ReservationStatus::Confirmed).await;
        let cancel = ReservationPatch::status(ReservationStatus::Cancelled);

        let err = f
            .handler
            .handle(
                command(booking.id, cancel.clone()),
                &staff(StaffRole::Receptionist),
                CommandMetadata::public(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReservationError::PermissionDenied {
                required: StaffRole::Supervisor,
                ..
            }
        ));
        let unchanged = f.store.find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ReservationStatus::Confirmed);
        assert_eq!(unchanged.version, 1);

        let result = f
            .handler
            .handle(
                command(booking.id, cancel),
                &staff(StaffRole::Supervisor),
                CommandMetadata::public(),
            )
            .await
            .unwrap();
        assert_eq!(result.reservation.status, ReservationStatus::Cancelled);
        assert_eq!(result.reservation.version, 2);
    }

    #[tokio::test]
    async fn edit_into_a_taken_room_is_a_conflict() {
        let f = fixture();
        seed(&f, &f.vip2, 4, ReservationStatus::Confirmed).await;
        let mover = seed(&f, &f.vip, 4, ReservationStatus::Confirmed).await;

        let err = f
            .handler
            .handle(
                command(
                    mover.id,
                    ReservationPatch {
                        area_id: Some(f.vip2.id),
                        ..Default::default()
                    },
                ),
                &staff(StaffRole::Receptionist),
                CommandMetadata::public(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReservationError::Conflict(Rejection::AreaTaken { .. })));
    }

    #[tokio::test]
    async fn growing_a_hall_party_rechecks_without_counting_itself() {
        let f = fixture();
        seed(&f, &f.hall, 200, ReservationStatus::Confirmed).await;
        let party = seed(&f, &f.hall, 30, ReservationStatus::Confirmed).await;
        let grow = |pax| ReservationPatch {
            pax: Some(pax),
            ..Default::default()
        };

        let err = f
            .handler
            .handle(command(party.id, grow(60)), &staff(StaffRole::Admin), CommandMetadata::public())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Only 50 seats left in Main Dining Hall.");

        let ok = f
            .handler
            .handle(command(party.id, grow(50)), &staff(StaffRole::Admin), CommandMetadata::public())
            .await
            .unwrap();
        assert_eq!(ok.reservation.pax, 50);
    }

    #[tokio::test]
    async fn time_only_edit_marks_details_changed() {
        let f = fixture();
        let booking = seed(&f, &f.vip, 6, ReservationStatus::Confirmed).await;

        let result = f
            .handler
            .handle(
                command(
                    booking.id,
                    ReservationPatch {
                        time: NaiveTime::from_hms_opt(20, 30, 0),
                        ..Default::default()
                    },
                ),
                &staff(StaffRole::Receptionist),
                CommandMetadata::public(),
            )
            .await
            .unwrap();

        assert!(result.changes.details_changed);
        assert!(!result.changes.status_changed);
        assert!(!result.reservation.reminder_sent);

        let entries = f.outbox.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event.event_type, RESERVATION_UPDATED);
    }

    #[tokio::test]
    async fn edit_racing_a_reminder_scan_reports_the_flag() {
        let f = fixture();
        let booking = seed(&f, &f.hall, 4, ReservationStatus::Confirmed).await;
        assert!(f.store.mark_reminder_sent(&booking.id).await.unwrap());

        let result = f
            .handler
            .handle(
                command(
                    booking.id,
                    ReservationPatch {
                        time: NaiveTime::from_hms_opt(20, 0, 0),
                        ..Default::default()
                    },
                ),
                &staff(StaffRole::Receptionist),
                CommandMetadata::public(),
            )
            .await
            .unwrap();

        assert!(result.reservation.reminder_sent);
        assert_eq!(result.reservation.version, 2);
        assert!(!f.store.mark_reminder_sent(&booking.id).await.unwrap());
    }

    #[tokio::test]
    async fn stale_expected_version_is_rejected() {
        let f = fixture();
        let booking = seed(&f, &f.vip, 6, ReservationStatus::Pending).await;
        let mut cmd = command(booking.id, ReservationPatch::status(ReservationStatus::Confirmed));
        cmd.expected_version = Some(7);

        let err = f
            .handler
            .handle(cmd, &staff(StaffRole::Admin), CommandMetadata::public())
            .await
            .unwrap_err();
        assert_eq!(err, ReservationError::Conflict(Rejection::StaleVersion));
    }

    #[tokio::test]
    async fn skipping_states_is_a_validation_error() {
        let f = fixture();
        let booking = seed(&f, &f.vip, 6, ReservationStatus::Pending).await;

        let err = f
            .handler
            .handle(
                command(booking.id, ReservationPatch::status(ReservationStatus::Seated)),
                &staff(StaffRole::Admin),
                CommandMetadata::public(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_reservation_is_not_found() {
        let f = fixture();
        let err = f
            .handler
            .handle(
                command(ReservationId::new(), ReservationPatch::default()),
                &staff(StaffRole::Admin),
                CommandMetadata::public(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::NotFound { entity: "Reservation", .. }));
    }
}
