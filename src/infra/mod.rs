//! Readiness aggregators backed by OS primitives.

pub mod poll;

pub use poll::PollVec;
