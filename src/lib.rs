//! Travel advisory report pipeline.
//!
//! Ingests the US State Department's free-text travel advisory records and
//! produces a verified, policy-classified set of structured advisories:
//! titles parsed, HTML summaries normalized, regional escalations extracted
//! from prose, duplicates collapsed, and the result partitioned into
//! policy-prohibited and high-risk sets. A verification gate computes a
//! content fingerprint and runs hard invariant checks before anything is
//! rendered.
//!
//! The core pipeline ([`pipeline`]) is pure and synchronous; all I/O lives
//! in the boundary modules ([`fetch`], [`render`], [`cli`]).

pub mod cli;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod policy;
pub mod render;
pub mod text;
pub mod verify;
