//! Domain model for listener subscriptions.

mod filter;
mod ids;
mod subscription;

pub use filter::NotificationFilter;
pub use ids::{ListenerHandle, SubscriptionId};
pub use subscription::Subscription;
