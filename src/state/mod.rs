//! Shared client-side state.
//!
//! DESIGN
//! ======
//! The session store is the only stateful module; everything else derives
//! from it or queries the network on demand.

pub mod auth;
