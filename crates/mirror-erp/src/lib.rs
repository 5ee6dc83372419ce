//! ERP upstream integration
//!
//! - `client` - `ErpClient`, the HTTP implementation of `mirror_core::UpstreamSource`
//! - `envelope` - normalization of the ERP response envelope into a flat record list

pub mod client;
pub mod envelope;

pub use client::ErpClient;
pub use envelope::{extract_records, parse_records};
