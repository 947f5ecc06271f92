//! Grievance Client Analytics
//!
//! Derived statistics over a fetched request list: per-status counts, type
//! and priority breakdowns with percentages, and the last week's activity.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::style::{CardColor, StatCard};
use chrono::{DateTime, Duration, Utc};
use grievance_common::utils::percent;
use grievance_common::{PriorityLevel, Request, RequestStatus, RequestType};

pub const RECENT_WINDOW_DAYS: i64 = 7;
pub const RECENT_LIMIT: usize = 5;

/// One row of a breakdown table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub label: String,
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total: usize,
    pub status_counts: Vec<(RequestStatus, usize)>,
    pub by_type: Vec<Breakdown>,
    pub by_priority: Vec<Breakdown>,
    pub recent_count: usize,
    pub recent: Vec<Request>,
}

impl Analytics {
    pub fn compute(requests: &[Request], now: DateTime<Utc>) -> Self {
        let total = requests.len();
        let breakdown = |label: &str, count: usize| Breakdown {
            label: label.to_string(),
            count,
            percent: percent(count, total),
        };

        let status_counts = RequestStatus::ALL
            .into_iter()
            .map(|status| (status, requests.iter().filter(|r| r.status_name() == status).count()))
            .collect();

        let by_type = RequestType::KNOWN
            .iter()
            .map(|kind| breakdown(kind.as_str(), requests.iter().filter(|r| &r.request_type == kind).count()))
            .collect();

        let by_priority = PriorityLevel::ALL
            .into_iter()
            .map(|level| breakdown(level.as_str(), requests.iter().filter(|r| r.priority_level() == level).count()))
            .collect();

        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        let recent_all: Vec<&Request> = requests.iter().filter(|r| r.created_on >= cutoff).collect();

        Self {
            total,
            status_counts,
            by_type,
            by_priority,
            recent_count: recent_all.len(),
            recent: recent_all.into_iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }

    pub fn count(&self, status: RequestStatus) -> usize {
        self.status_counts
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Summary cards of the analytics screen.
    pub fn stat_cards(&self) -> Vec<StatCard> {
        vec![
            StatCard::new("Total Requests", self.total, CardColor::Blue),
            StatCard::new("Pending", self.count(RequestStatus::Pending), CardColor::Yellow),
            StatCard::new("Active", self.count(RequestStatus::Active), CardColor::Blue),
            StatCard::new("In Development", self.count(RequestStatus::Dev), CardColor::Purple),
            StatCard::new("In UAT", self.count(RequestStatus::Uat), CardColor::Red),
            StatCard::new("Live", self.count(RequestStatus::Live), CardColor::Green),
            StatCard::new("Closed", self.count(RequestStatus::Closed), CardColor::Gray),
            StatCard::new("This Week", self.recent_count, CardColor::Indigo),
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::request_fixture;

    fn now() -> DateTime<Utc> {
        "2024-03-10T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_empty_list() {
        let analytics = Analytics::compute(&[], now());
        assert_eq!(analytics.total, 0);
        assert!(analytics.by_type.iter().all(|b| b.count == 0 && b.percent == 0));
        assert!(analytics.by_priority.iter().all(|b| b.percent == 0));
        assert_eq!(analytics.recent_count, 0);
        assert_eq!(analytics.status_counts.len(), 7);
    }

    #[test]
    fn test_breakdowns() {
        let requests = vec![
            request_fixture(1, RequestStatus::Pending, PriorityLevel::High, RequestType::SystemBug, now()),
            request_fixture(2, RequestStatus::Dev, PriorityLevel::High, RequestType::SystemBug, now()),
            request_fixture(3, RequestStatus::Closed, PriorityLevel::Low, RequestType::DataChange, now()),
        ];
        let analytics = Analytics::compute(&requests, now());

        assert_eq!(analytics.count(RequestStatus::Pending), 1);
        assert_eq!(analytics.count(RequestStatus::Dev), 1);
        assert_eq!(analytics.count(RequestStatus::Live), 0);

        let bug = analytics.by_type.iter().find(|b| b.label == "System Bug").unwrap();
        assert_eq!((bug.count, bug.percent), (2, 67));
        let data = analytics.by_type.iter().find(|b| b.label == "Data Change").unwrap();
        assert_eq!((data.count, data.percent), (1, 33));

        let high = &analytics.by_priority[0];
        assert_eq!((high.label.as_str(), high.count, high.percent), ("High", 2, 67));
    }

    #[test]
    fn test_recent_window_is_inclusive() {
        let boundary = now() - Duration::days(7);
        let requests = vec![
            request_fixture(1, RequestStatus::Pending, PriorityLevel::Low, RequestType::SystemBug, boundary),
            request_fixture(
                2,
                RequestStatus::Pending,
                PriorityLevel::Low,
                RequestType::SystemBug,
                boundary - Duration::seconds(1),
            ),
        ];
        let analytics = Analytics::compute(&requests, now());
        assert_eq!(analytics.recent_count, 1);
        assert_eq!(analytics.recent[0].request_id.0, 1);
    }

    #[test]
    fn test_recent_list_capped() {
        let requests: Vec<Request> = (1..=8)
            .map(|i| request_fixture(i, RequestStatus::Active, PriorityLevel::Medium, RequestType::DataChange, now()))
            .collect();
        let analytics = Analytics::compute(&requests, now());
        assert_eq!(analytics.recent_count, 8);
        assert_eq!(analytics.recent.len(), RECENT_LIMIT);
        assert_eq!(analytics.stat_cards().last().unwrap().value, "8");
    }
}
