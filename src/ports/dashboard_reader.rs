//! DashboardReader port - aggregates for the staff dashboard.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::dashboard::DashboardFacts;
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait DashboardReader: Send + Sync {
    /// Figures for `today` in the venue's calendar.
    async fn facts(&self, today: NaiveDate) -> Result<DashboardFacts, DomainError>;
}
