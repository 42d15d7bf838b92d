//! Graceful degradation (spec C9): per-subsystem circuit breakers,
//! fallback values, and an emergency mode that strips the core down to its
//! two essential subsystems.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

mod breaker;
mod fallback;
mod manager;
mod subsystem;

pub use breaker::{CircuitBreaker, CircuitState};
pub use fallback::FallbackResult;
pub use manager::DegradationManager;
pub use subsystem::{Subsystem, ALL};
