//! Billing module
//!
//! Fetches subscription state from the billing service and caches it for a
//! freshness window. Nothing here decides access; see [`crate::access`].

pub mod cache;
pub mod client;
pub mod service;
pub mod source;

pub use cache::{QueryCache, QueryKey};
pub use client::HttpSubscriptionSource;
pub use service::SubscriptionService;
pub use source::{StaticSource, SubscriptionSource};
