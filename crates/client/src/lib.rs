//! Pantry cart client
//!
//! Client side of the storefront cart: a guest backend over local storage, a remote
//! backend over the JSON API, the sign-in merge between the two, and an in-memory
//! state container that mirrors whichever is authoritative.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod view;

mod http;

#[cfg(test)]
mod test;
