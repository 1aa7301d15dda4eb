//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations

pub mod layout;

// Group membership, subtree existence, upward propagation, routing rules
pub mod group_resolution;

// Remote liveness tracking and fetch-through transport
pub mod proxy;

// Checksum-based freshness of proxied metadata
pub mod metadata_expiration;

// Entry persistence + group propagation driven by file events
pub mod artifact_events;
