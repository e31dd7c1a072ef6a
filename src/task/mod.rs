//! Task tracking and agent execution for Tasklane.
//!
//! Tasks are created with a title and description, listed, fetched, and
//! executed by launching an external coding-agent runner against the GitHub
//! repository named in the description. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the status machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
