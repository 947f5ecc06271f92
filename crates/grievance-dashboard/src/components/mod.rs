//! Reusable presentation components

mod badges;
mod request_list;
mod stat_card;

pub use badges::{PriorityBadge, RequestTypeBadge, StatusBadge};
pub use request_list::RequestList;
pub use stat_card::{StatCardGrid, StatCardView};
