//! Weight persistence
//!
//! Provides [`JsonWeightFile`], which implements the
//! [`WeightRepository`](quorum_application::WeightRepository) port.

mod weight_file;

pub use weight_file::JsonWeightFile;
