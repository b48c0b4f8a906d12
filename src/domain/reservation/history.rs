//! Append-only audit trail of reservation writes.

use serde::{Deserialize, Serialize};

use super::Reservation;
use crate::domain::foundation::{ReservationId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Created,
    Updated,
    /// Flag flips made by the scheduler, e.g. reminder sent.
    System,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Created => "created",
            HistoryKind::Updated => "updated",
            HistoryKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(HistoryKind::Created),
            "updated" => Some(HistoryKind::Updated),
            "system" => Some(HistoryKind::System),
            _ => None,
        }
    }
}

/// One row of the trail, keyed by (reservation_id, sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub reservation_id: ReservationId,
    /// Starts at 1 and has no gaps.
    pub sequence: i64,
    pub kind: HistoryKind,
    /// Staff id, `"public"` or `"system"`.
    pub actor: String,
    pub snapshot: Reservation,
    pub recorded_at: Timestamp,
}

impl HistoryEntry {
    pub fn new(sequence: i64, kind: HistoryKind, actor: impl Into<String>, snapshot: &Reservation) -> Self {
        Self {
            reservation_id: snapshot.id,
            sequence,
            kind,
            actor: actor.into(),
            snapshot: snapshot.clone(),
            recorded_at: Timestamp::now(),
        }
    }
}
