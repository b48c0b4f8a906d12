//! Dashboard read model: today's figures, a 7-day trend and recent bookings.

pub mod stats;

pub use stats::{
    counts_toward_revenue, format_currency, DailyBookings, DashboardFacts, DashboardStats,
    RECENT_LIMIT, TREND_DAYS,
};
