//! Weight-balanced ordered set and merge-based set algebra for Rust.
//!
//! This crate provides three pieces that work together:
//!
//! - [`OrderedSet`] - a duplicate-free set kept in a weight-balanced binary search tree, with
//!   ascending iteration, a removal-capable [`Cursor`], and O(log n) order statistics.
//! - [`Peekable`] - an iterator adapter that can look any number of items ahead without
//!   consuming them, reporting exhaustion with `None` instead of failing.
//! - [`merge`] - [`union`], [`intersection`] and [`difference`] of ordered sequences in
//!   O(n + m), returning a container of the same kind as the first operand.
//!
//! # Example
//!
//! ```
//! use wabi_set::{OrderedSet, difference, intersection, union};
//!
//! let odd = OrderedSet::from([1, 3, 5]);
//! let mid = OrderedSet::from([2, 3, 4]);
//!
//! assert_eq!(union(&odd, &mid).unwrap().to_vec(), [1, 2, 3, 4, 5]);
//! assert_eq!(intersection(&odd, &mid).unwrap().to_vec(), [3]);
//! assert_eq!(difference(&odd, &mid).unwrap().to_vec(), [1, 5]);
//!
//! // The same algorithms work over plain ascending sequences.
//! let merged = union(&String::from("abck"), "def").unwrap();
//! assert_eq!(merged, "abcdefk");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Amortized O(log n) updates** - Scapegoat-style rebuilds keep every subtree weight-balanced
//! - **O(log n) rank operations** - Subtree weights double as order-statistic counters
//! - **Type-preserving set algebra** - Sets stay sets, `Vec`s stay `Vec`s, `String`s stay `String`s
//!
//! # Implementation
//!
//! Nodes live in an arena and are addressed by compact handles. Every node records the number of
//! nodes in its subtree. After an insertion or removal the highest node whose heavier child exceeds
//! the configured [`Balance`] fraction is rebuilt into a perfectly balanced subtree, reusing the
//! same nodes, so handles held by a [`Cursor`] stay valid across rebalancing.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod balance;
mod error;
mod order_statistic;
mod raw;

pub mod merge;
pub mod ordered_set;
pub mod peekable;
pub mod sequence;

pub use balance::Balance;
pub use error::{Error, Result};
pub use merge::{difference, intersection, intersection_all, union, union_all};
pub use order_statistic::Rank;
pub use ordered_set::{Cursor, CursorState, OrderedSet};
pub use peekable::Peekable;
pub use sequence::{OrderedSink, OrderedSource};
