use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::domain::foundation::AreaId;
use crate::domain::reservation::{Reservation, ReservationStatus};

/// Days shown in the booking trend, ending today.
pub const TREND_DAYS: i64 = 7;

/// Most recently created bookings shown on the dashboard.
pub const RECENT_LIMIT: usize = 5;

/// Raw figures a reader gathers for one business day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFacts {
    /// All bookings dated today, whatever their status.
    pub today_count: u32,
    /// Pending bookings on any date.
    pub pending_count: u32,
    /// Guests today across confirmed, seated and completed bookings.
    pub pax_today: u32,
    /// Guests today in exclusive areas, excluding released bookings.
    pub vip_pax: u32,
    /// Bookings per date; dates without bookings may be missing.
    pub daily_counts: HashMap<NaiveDate, u32>,
    pub recent: Vec<Reservation>,
}

impl DashboardFacts {
    /// Computes facts from a full set of reservations.
    pub fn tally(
        today: NaiveDate,
        reservations: &[Reservation],
        exclusive_areas: &HashSet<AreaId>,
    ) -> Self {
        let first_day = today - Duration::days(TREND_DAYS - 1);
        let mut facts = DashboardFacts::default();

        for r in reservations {
            if r.status == ReservationStatus::Pending {
                facts.pending_count += 1;
            }
            if r.date >= first_day && r.date <= today {
                *facts.daily_counts.entry(r.date).or_insert(0) += 1;
            }
            if r.date != today {
                continue;
            }
            facts.today_count += 1;
            if counts_toward_revenue(r.status) {
                facts.pax_today += r.pax;
            }
            if r.status.occupies_area() && exclusive_areas.contains(&r.area_id) {
                facts.vip_pax += r.pax;
            }
        }

        let mut recent: Vec<&Reservation> = reservations.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        facts.recent = recent.into_iter().take(RECENT_LIMIT).cloned().collect();
        facts
    }
}

/// Statuses whose guests are expected to spend.
pub fn counts_toward_revenue(status: ReservationStatus) -> bool {
    matches!(
        status,
        ReservationStatus::Confirmed | ReservationStatus::Seated | ReservationStatus::Completed
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBookings {
    pub date: NaiveDate,
    /// e.g. "Mar 01"
    pub label: String,
    pub bookings: u32,
}

/// Read-only projection shown on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub today_count: u32,
    pub pending_count: u32,
    pub pax_today: u32,
    pub vip_pax: u32,
    pub revenue: u64,
    pub revenue_display: String,
    pub chart: Vec<DailyBookings>,
    pub recent_bookings: Vec<Reservation>,
}

impl DashboardStats {
    pub fn from_facts(
        facts: DashboardFacts,
        today: NaiveDate,
        spend_per_pax: u64,
        currency_symbol: &str,
    ) -> Self {
        let chart = (0..TREND_DAYS)
            .rev()
            .map(|days_ago| {
                let date = today - Duration::days(days_ago);
                DailyBookings {
                    date,
                    label: date.format("%b %d").to_string(),
                    bookings: facts.daily_counts.get(&date).copied().unwrap_or(0),
                }
            })
            .collect();
        let revenue = u64::from(facts.pax_today) * spend_per_pax;

        Self {
            today_count: facts.today_count,
            pending_count: facts.pending_count,
            pax_today: facts.pax_today,
            vip_pax: facts.vip_pax,
            revenue,
            revenue_display: format_currency(revenue, currency_symbol),
            chart,
            recent_bookings: facts.recent,
        }
    }
}

/// Formats an amount with thousands separators, e.g. "₱1,234,500".
pub fn format_currency(amount: u64, symbol: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", symbol, grouped)
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
