#![warn(missing_docs)]

//! Rectangle bin packing for sheet goods.
//!
//! Panels are submitted as [`PackRequest`]s against a catalog of stock
//! sheets ([`Bin`]). Any [`Packer`] can answer; [`pack_exact`] accepts the
//! answer only when every request was placed exactly once.
//!
//! # Example
//!
//! ```
//! use carcass_pack::{pack_exact, Bin, MaxRectsPacker, PackRequest};
//!
//! let bins = vec![Bin::new(2440.0, 1220.0); 2];
//! let requests = vec![
//!     PackRequest::with_kerf("side_left", 1564.0, 300.0, 3.0),
//!     PackRequest::with_kerf("side_right", 1564.0, 300.0, 3.0),
//! ];
//! let layout = pack_exact(&MaxRectsPacker::new(), &requests, &bins).unwrap();
//! assert_eq!(layout.len(), 2);
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod maxrects;
pub mod packer;

pub use error::{PackError, Result};
pub use geometry::{Bin, PackRequest, Placement, EPSILON};
pub use layout::{pack_exact, Layout, SheetStats};
pub use maxrects::MaxRectsPacker;
pub use packer::{PackOutcome, Packer};
