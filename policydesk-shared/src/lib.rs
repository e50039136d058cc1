#![cfg_attr(not(test), forbid(unsafe_code))]

//! Wire models, bearer token claims, and configuration shared by the
//! PolicyDesk front ends.

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod models;
pub mod token;
