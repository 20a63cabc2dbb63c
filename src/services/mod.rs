//! Services that sit between routes and the pure core modules.

pub mod classify;
