//! Domain entities exchanged with the ticket API.

pub mod auth;
pub mod batch;
pub mod filters;
pub mod page;
pub mod pdf;
pub mod redemption;
pub mod ticket;
pub mod types;
