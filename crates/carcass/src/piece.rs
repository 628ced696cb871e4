//! Named rectangular panels.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// A rectangular panel to be cut from sheet stock.
///
/// `width` and `height` are the panel's face dimensions as cut; they do not
/// say which axis carries load once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Face extent along the first axis (mm).
    pub width: f64,
    /// Face extent along the second axis (mm).
    pub height: f64,
    /// Unique name, e.g. `side_left` or `shelf_3`.
    pub name: String,
    /// Material thickness (mm).
    pub thickness: f64,
}

impl Piece {
    /// Create a new piece.
    pub fn new(width: f64, height: f64, name: impl Into<String>, thickness: f64) -> Self {
        Self {
            width,
            height,
            name: name.into(),
            thickness,
        }
    }

    /// Face area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Piece `{}`: {} x {} x {}",
            self.name, self.width, self.height, self.thickness
        )
    }
}

/// The ordered set of pieces for one carcass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceSet {
    pieces: Vec<Piece>,
}

impl PieceSet {
    pub(crate) fn from_vec(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Iterate in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Piece> {
        self.pieces.iter()
    }

    /// Find a piece by name.
    pub fn get(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }

    /// Sum of face areas in mm².
    pub fn total_area(&self) -> f64 {
        self.pieces.iter().map(Piece::area).sum()
    }
}

impl Index<usize> for PieceSet {
    type Output = Piece;

    fn index(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }
}

impl<'a> IntoIterator for &'a PieceSet {
    type Item = &'a Piece;
    type IntoIter = std::slice::Iter<'a, Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}
