//! Top-level facade crate for promgate.
//!
//! Re-exports the core registry types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use promgate_core::*;
}

pub mod gateway {
    pub use promgate_gateway::*;
}
