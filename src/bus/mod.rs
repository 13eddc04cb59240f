//! Message bus boundary.
//!
//! Envelopes arrive on a subject, the router hands them to the handler
//! subscribed there, and every envelope gets exactly one ack back.

pub mod envelope;
pub mod handler;
pub mod router;
pub mod server;

pub use handler::WordFrequencyHandler;
pub use router::Router;
pub use server::BusServer;
