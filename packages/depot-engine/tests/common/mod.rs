//! Common test utilities for depot-engine
//!
//! Shared repository graphs, counting/failing file stubs, recording
//! callbacks and scripted remote resolvers.

#![allow(dead_code)]

mod fixtures;
mod stubs;

pub use fixtures::*;
pub use stubs::*;
