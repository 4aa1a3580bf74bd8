//! End-to-end audits of the sample catalog with the bundled vocabulary and policy.

pub mod fixtures;

mod batch;
mod compliance;
mod enforcement;
mod matching;
mod volumetric;
