//! Core library for the packing-results visualization toolkit.
//!
//! Packing runs drop `item_placements_*.csv` tables into a results
//! directory. The tools in this workspace give every `ProductId` appearing
//! in those tables a deterministic display color, so that the batch
//! colorizer and the browser visualizer agree on every product's color
//! without sharing any runtime state.
//!
//! The color mapping lives in [`color`], the table model in [`table`], the
//! augmentation pipeline in [`augment`] and result-file discovery in
//! [`results`].

#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::all,
    clippy::correctness,
    missing_docs,
    missing_debug_implementations,
    clippy::wildcard_imports,
    clippy::needless_borrow,
    clippy::cast_lossless
)]
#![cfg_attr(not(test), warn(clippy::indexing_slicing))]

pub mod augment;
pub mod color;
pub mod results;
pub mod table;
