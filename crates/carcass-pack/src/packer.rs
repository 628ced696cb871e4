//! The solver boundary.

use crate::error::Result;
use crate::geometry::{Bin, PackRequest, Placement};

/// Raw answer from a [`Packer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackOutcome {
    /// One entry per request the solver managed to place.
    pub placements: Vec<Placement>,
    /// Ids of requests the solver rejected.
    pub unplaced: Vec<String>,
}

/// A rectangle bin-packing strategy.
///
/// Implementations try to put every request into some bin of `bins` so that
/// placements sharing a bin never overlap and never leave the bin. They may
/// reorder, rotate or reject requests; [`crate::pack_exact`] decides whether
/// the outcome is acceptable.
pub trait Packer {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Pack `requests` into `bins`.
    fn pack(&self, requests: &[PackRequest], bins: &[Bin]) -> Result<PackOutcome>;
}

impl<P: Packer + ?Sized> Packer for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn pack(&self, requests: &[PackRequest], bins: &[Bin]) -> Result<PackOutcome> {
        (**self).pack(requests, bins)
    }
}

impl<P: Packer + ?Sized> Packer for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn pack(&self, requests: &[PackRequest], bins: &[Bin]) -> Result<PackOutcome> {
        (**self).pack(requests, bins)
    }
}
