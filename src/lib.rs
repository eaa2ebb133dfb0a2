//! # ID card tool
//!
//! Command line front end of the [`idcard`] crate.
#![warn(missing_docs)]

pub mod cli;
