// SPDX-License-Identifier: GPL-3.0-only

//! Conversion pipelines
//!
//! - [`point_cloud`]: ray table construction and depth projection
//! - [`export`]: PLY, LAS and vertex matrix output
//! - [`session`]: single-capture conversion from a recording

pub mod export;
pub mod point_cloud;
pub mod session;
