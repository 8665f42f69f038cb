//! Tree-shaped argument matching.
//!
//! A [`domain::DataTree`] maps hierarchical paths to branches of items. A
//! [`application::TreeHandler`] wraps a plain function and calls it once per
//! matched element across several argument trees, then reassembles the
//! results into an output tree with the same path structure.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
