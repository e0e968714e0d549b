//! Models and payloads shared by the mapping backend and its clients.

pub mod model;
pub mod requests;
pub mod views;
