//! Stages of the media ingestion pipeline.

pub mod naming;
pub mod policy;
pub mod probe;
pub mod staging;
pub mod transcode;
