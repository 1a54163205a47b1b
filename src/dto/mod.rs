//! DTO modules that bridge services with templates and JSON endpoints.

pub mod tickets;
