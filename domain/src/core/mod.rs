//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: query-level errors
//! - [`string::truncate`]: UTF-8 safe truncation

pub mod error;
pub mod string;
