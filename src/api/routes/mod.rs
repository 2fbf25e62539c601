//! API Routes
//!
//! Route handlers organized by dashboard concern.

pub mod charts;
pub mod health;
pub mod layout;
pub mod logs;
pub mod metrics;
pub mod notifications;
pub mod uploads;
pub mod view;
