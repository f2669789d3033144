//! The pure data pipeline.
//!
//! Every stage here is a free function with no hidden state: the validity
//! gate and user filters, facet extraction, and chart aggregation. Stages
//! are recomputed from scratch on each render.

pub mod aggregate;
pub mod facets;
pub mod filter;

pub use aggregate::*;
pub use facets::*;
pub use filter::*;
