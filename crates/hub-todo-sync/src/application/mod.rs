//! # Application Module
//!
//! Services orchestrating the domain and outbound ports: connection
//! bootstrap, commit reconciliation, the write path and the observable
//! model.

pub mod bootstrap;
pub mod model;
pub mod reconciler;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::HubConnector;
pub use model::{Subscription, TodoModel};
pub use reconciler::CommitReconciler;
pub use session::HubSession;
pub use store::HubStore;
