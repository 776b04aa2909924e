//! Host graph wiring module
//!
//! This module turns a selected stage chain into graph topology:
//! - Stage to component mapping
//! - Ordered spawn/link instructions between input tap and output merge point
//! - One-shot application onto a host graph

pub mod assembler;
pub mod splice;

pub use assembler::{Assembly, GraphAssembler, HostGraph};
pub use splice::{ComponentSpec, Endpoint, GraphInstruction, SplicePlan};
