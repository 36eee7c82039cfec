//! Listener-registration ledger.
//!
//! Records which collaborator listeners want notifications from which
//! managed objects. Delivery itself happens elsewhere: a delivery
//! collaborator asks the ledger which subscriptions are
//! [`interested`](ports::ListenerRegistry::interested) in a notification
//! type and forwards accordingly.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
