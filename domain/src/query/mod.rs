//! Query requests and generation parameters

pub mod params;
pub mod request;
