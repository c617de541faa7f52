//! Progress display for fan-out rounds

pub mod reporter;
