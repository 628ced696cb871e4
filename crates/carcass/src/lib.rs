#![warn(missing_docs)]

//! carcass — cut lists for built-in bookcases
//!
//! Turns overall cabinet dimensions into a panel list, packs the panels onto
//! stock sheets with kerf allowance, and exports per-sheet diagrams plus an
//! OpenSCAD sketch of the assembly.
//!
//! # Example
//!
//! ```rust,no_run
//! use carcass::{default_packer, dimension, pack_pieces, CabinetConfig};
//! use carcass::export::{scad, svg::SvgRenderer, write_sheets};
//!
//! let config = CabinetConfig::default();
//! let pieces = dimension(&config).unwrap();
//! let layout = pack_pieces(&pieces, &config.packing, &default_packer(&config.packing)).unwrap();
//! write_sheets(&layout, &SvgRenderer::default(), "out").unwrap();
//! scad::write_openscad(&pieces, config.width, config.height, "out/cabinet.scad").unwrap();
//! ```

pub mod config;
pub mod cutting;
pub mod dimension;
pub mod error;
pub mod export;
pub mod piece;
pub mod report;

pub use config::{CabinetConfig, PackingConfig, StockSheet};
pub use cutting::{default_packer, pack_pieces, pack_requests};
pub use dimension::dimension;
pub use error::{CarcassError, Result};
pub use piece::{Piece, PieceSet};
pub use report::CutList;
