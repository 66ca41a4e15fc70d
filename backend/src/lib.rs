//! Multi-user to-do backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the use-cases and the
//! port traits, [`inbound`] adapts HTTP onto the driving ports and
//! [`outbound`] implements the driven ones over PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(test)]
mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
