//! Placement pipeline: clearings, members, rotation rules, proximity and the runner.
pub mod clearing;
pub mod events;
pub mod materializer;
pub mod member;
pub mod proximity;
pub mod rotation;
pub mod runner;
pub mod seed;
