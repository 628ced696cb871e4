//! Validated packings.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PackError, Result};
use crate::geometry::{Bin, PackRequest, Placement, EPSILON};
use crate::packer::Packer;

/// Usage of one stock sheet in a [`Layout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetStats {
    /// Index into the bin catalog.
    pub bin_index: usize,
    /// The sheet itself.
    pub bin: Bin,
    /// Number of placements on this sheet.
    pub piece_count: usize,
    /// Area covered by placements, kerf included (mm²).
    pub used_area: f64,
    /// `used_area / bin.area()`.
    pub utilization: f64,
}

/// A packing in which every request received exactly one placement.
///
/// Only [`pack_exact`] builds one, so every placement is known to lie inside
/// its bin without overlapping another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    bins: Vec<Bin>,
    placements: Vec<Placement>,
}

impl Layout {
    /// The catalog the layout was packed against.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// All placements, grouped by bin in the order the solver returned them.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether the layout holds no placements.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Catalog indices that received at least one placement, ascending.
    pub fn sheets_used(&self) -> Vec<usize> {
        let mut used: Vec<usize> = self.placements.iter().map(|p| p.bin_index).collect();
        used.sort_unstable();
        used.dedup();
        used
    }

    /// Placements on one sheet.
    pub fn placements_on(&self, bin_index: usize) -> impl Iterator<Item = &Placement> + '_ {
        self.placements
            .iter()
            .filter(move |p| p.bin_index == bin_index)
    }

    /// Look up the placement for a request id.
    pub fn placement_of(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// Per-sheet usage for every sheet that received a placement.
    pub fn sheet_stats(&self) -> Vec<SheetStats> {
        let mut per_sheet: BTreeMap<usize, (usize, f64)> = BTreeMap::new();
        for p in &self.placements {
            let entry = per_sheet.entry(p.bin_index).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += p.area();
        }
        per_sheet
            .into_iter()
            .map(|(bin_index, (piece_count, used_area))| {
                let bin = self.bins[bin_index];
                SheetStats {
                    bin_index,
                    bin,
                    piece_count,
                    used_area,
                    utilization: used_area / bin.area(),
                }
            })
            .collect()
    }

    /// Pairs of placements that share interior area. Empty for any sound solver.
    pub fn overlapping_pairs(&self) -> Vec<(&Placement, &Placement)> {
        let mut pairs = Vec::new();
        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

/// Run `packer` and require a perfect placement.
///
/// Every request must come back exactly once; otherwise the shortfall is
/// returned as [`PackError::Incomplete`]. Placements outside their bin, of a
/// size other than the request's (either orientation), or overlapping another
/// placement on the same bin are rejected as [`PackError::InvalidPlacement`].
/// Nothing is retried.
pub fn pack_exact<P: Packer + ?Sized>(
    packer: &P,
    requests: &[PackRequest],
    bins: &[Bin],
) -> Result<Layout> {
    if bins.is_empty() {
        return Err(PackError::EmptyCatalog);
    }
    if let Some(bin) = bins
        .iter()
        .find(|b| !(b.width > 0.0 && b.height > 0.0) || !b.area().is_finite())
    {
        return Err(PackError::InvalidRequest(format!(
            "bin {} x {} must have positive size",
            bin.width, bin.height
        )));
    }

    let mut by_id = HashMap::with_capacity(requests.len());
    for request in requests {
        if !request.is_valid() {
            return Err(PackError::InvalidRequest(format!(
                "{} has size {} x {}",
                request.id, request.width, request.height
            )));
        }
        if by_id.insert(request.id.as_str(), request).is_some() {
            return Err(PackError::DuplicateId(request.id.clone()));
        }
    }

    info!(
        solver = packer.name(),
        requests = requests.len(),
        bins = bins.len(),
        "packing"
    );
    let outcome = packer.pack(requests, bins)?;

    let mut seen = HashSet::with_capacity(outcome.placements.len());
    for placement in &outcome.placements {
        let Some(request) = by_id.get(placement.id.as_str()) else {
            return Err(PackError::UnknownId(placement.id.clone()));
        };
        if !seen.insert(placement.id.as_str()) {
            return Err(PackError::DuplicateId(placement.id.clone()));
        }
        let Some(bin) = bins.get(placement.bin_index) else {
            return Err(PackError::InvalidPlacement(format!(
                "{} placed in bin {} of {}",
                placement.id,
                placement.bin_index,
                bins.len()
            )));
        };
        if !matches_request(placement, request) {
            return Err(PackError::InvalidPlacement(format!(
                "{} placed as {} x {} but requested {} x {}",
                placement.id, placement.width, placement.height, request.width, request.height
            )));
        }
        if !placement.within(bin) {
            return Err(PackError::InvalidPlacement(format!(
                "{} at ({}, {}) extends past bin {} ({} x {})",
                placement.id, placement.x, placement.y, placement.bin_index, bin.width, bin.height
            )));
        }
    }
    for (i, a) in outcome.placements.iter().enumerate() {
        if let Some(b) = outcome.placements[i + 1..].iter().find(|b| a.overlaps(b)) {
            return Err(PackError::InvalidPlacement(format!(
                "{} overlaps {} in bin {}",
                a.id, b.id, a.bin_index
            )));
        }
    }

    if outcome.placements.len() != requests.len() {
        let unplaced: Vec<String> = requests
            .iter()
            .filter(|r| !seen.contains(r.id.as_str()))
            .map(|r| r.id.clone())
            .collect();
        warn!(
            placed = outcome.placements.len(),
            required = requests.len(),
            ?unplaced,
            "packing incomplete"
        );
        return Err(PackError::Incomplete {
            placed: outcome.placements.len(),
            required: requests.len(),
            unplaced,
        });
    }

    let layout = Layout {
        bins: bins.to_vec(),
        placements: outcome.placements,
    };
    debug!(sheets = layout.sheets_used().len(), "packing complete");
    Ok(layout)
}

/// Same size as the request, in either orientation.
fn matches_request(placement: &Placement, request: &PackRequest) -> bool {
    let same = |a: f64, b: f64| (a - b).abs() <= EPSILON;
    (same(placement.width, request.width) && same(placement.height, request.height))
        || (same(placement.width, request.height) && same(placement.height, request.width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::PackOutcome;
    use approx::assert_relative_eq;

    /// Answers with a fixed outcome regardless of input.
    struct Scripted(PackOutcome);

    impl Packer for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn pack(&self, _requests: &[PackRequest], _bins: &[Bin]) -> Result<PackOutcome> {
            Ok(self.0.clone())
        }
    }

    fn at(id: &str, bin_index: usize, x: f64, y: f64, w: f64, h: f64) -> Placement {
        Placement {
            bin_index,
            x,
            y,
            width: w,
            height: h,
            id: id.into(),
            rotated: false,
        }
    }

    fn requests() -> Vec<PackRequest> {
        vec![
            PackRequest::new("a", 10.0, 10.0),
            PackRequest::new("b", 10.0, 10.0),
        ]
    }

    #[test]
    fn test_complete_packing_is_accepted() {
        let packer = Scripted(PackOutcome {
            placements: vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("b", 1, 0.0, 0.0, 10.0, 10.0),
            ],
            unplaced: vec![],
        });
        let bins = [Bin::new(20.0, 10.0), Bin::new(10.0, 10.0)];
        let layout = pack_exact(&packer, &requests(), &bins).unwrap();

        assert_eq!(layout.len(), 2);
        assert_eq!(layout.sheets_used(), vec![0, 1]);
        assert_eq!(layout.placements_on(1).count(), 1);

        let stats = layout.sheet_stats();
        assert_eq!(stats.len(), 2);
        assert_relative_eq!(stats[0].utilization, 0.5);
        assert_relative_eq!(stats[1].utilization, 1.0);
        assert!(layout.overlapping_pairs().is_empty());
    }

    #[test]
    fn test_shortfall_is_reported() {
        let packer = Scripted(PackOutcome {
            placements: vec![at("a", 0, 0.0, 0.0, 10.0, 10.0)],
            unplaced: vec!["b".into()],
        });
        let err = pack_exact(&packer, &requests(), &[Bin::new(10.0, 10.0)]).unwrap_err();

        assert_eq!(
            err,
            PackError::Incomplete {
                placed: 1,
                required: 2,
                unplaced: vec!["b".into()],
            }
        );
        assert_eq!(err.to_string(), "1 rectangles packed, but 2 required");
    }

    #[test]
    fn test_unknown_id_rejected() {
        let packer = Scripted(PackOutcome {
            placements: vec![at("zzz", 0, 0.0, 0.0, 1.0, 1.0)],
            unplaced: vec![],
        });
        let err = pack_exact(&packer, &requests(), &[Bin::new(10.0, 10.0)]).unwrap_err();
        assert_eq!(err, PackError::UnknownId("zzz".into()));
    }

    #[test]
    fn test_repeated_placement_rejected() {
        let packer = Scripted(PackOutcome {
            placements: vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("a", 0, 10.0, 0.0, 10.0, 10.0),
            ],
            unplaced: vec![],
        });
        let err = pack_exact(&packer, &requests(), &[Bin::new(20.0, 10.0)]).unwrap_err();
        assert_eq!(err, PackError::DuplicateId("a".into()));
    }

    #[test]
    fn test_bin_index_outside_catalog_rejected() {
        let packer = Scripted(PackOutcome {
            placements: vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("b", 3, 0.0, 0.0, 10.0, 10.0),
            ],
            unplaced: vec![],
        });
        let err = pack_exact(&packer, &requests(), &[Bin::new(20.0, 10.0)]).unwrap_err();
        assert!(matches!(err, PackError::InvalidPlacement(_)));
    }

    fn rejected(placements: Vec<Placement>, bins: &[Bin]) -> PackError {
        let packer = Scripted(PackOutcome {
            placements,
            unplaced: vec![],
        });
        pack_exact(&packer, &requests(), bins).unwrap_err()
    }

    #[test]
    fn test_placement_outside_bin_rejected() {
        let err = rejected(
            vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("b", 0, 500.0, 0.0, 10.0, 10.0),
            ],
            &[Bin::new(20.0, 10.0)],
        );
        assert!(matches!(err, PackError::InvalidPlacement(ref msg) if msg.starts_with("b at")));

        let err = rejected(
            vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("b", 0, 0.0, -5.0, 10.0, 10.0),
            ],
            &[Bin::new(20.0, 10.0)],
        );
        assert!(matches!(err, PackError::InvalidPlacement(_)));
    }

    #[test]
    fn test_overlapping_placements_rejected() {
        let err = rejected(
            vec![
                at("a", 0, 0.0, 0.0, 10.0, 10.0),
                at("b", 0, 5.0, 0.0, 10.0, 10.0),
            ],
            &[Bin::new(20.0, 10.0)],
        );
        assert_eq!(err, PackError::InvalidPlacement("a overlaps b in bin 0".into()));
    }

    #[test]
    fn test_resized_placement_rejected() {
        let err = rejected(
            vec![
                at("a", 0, 0.0, 0.0, 1.0, 10.0),
                at("b", 0, 10.0, 0.0, 1.0, 10.0),
            ],
            &[Bin::new(20.0, 10.0)],
        );
        assert!(matches!(err, PackError::InvalidPlacement(ref msg) if msg.contains("requested 10 x 10")));
    }

    #[test]
    fn test_rotated_placement_accepted() {
        let packer = Scripted(PackOutcome {
            placements: vec![Placement {
                rotated: true,
                ..at("long", 0, 0.0, 0.0, 10.0, 30.0)
            }],
            unplaced: vec![],
        });
        let requests = [PackRequest::new("long", 30.0, 10.0)];
        let layout = pack_exact(&packer, &requests, &[Bin::new(10.0, 30.0)]).unwrap();
        assert!(layout.placements()[0].rotated);
    }

    #[test]
    fn test_input_checks() {
        let packer = Scripted(PackOutcome::default());

        assert_eq!(
            pack_exact(&packer, &requests(), &[]).unwrap_err(),
            PackError::EmptyCatalog
        );

        let dup = vec![PackRequest::new("x", 1.0, 1.0), PackRequest::new("x", 2.0, 2.0)];
        assert_eq!(
            pack_exact(&packer, &dup, &[Bin::new(10.0, 10.0)]).unwrap_err(),
            PackError::DuplicateId("x".into())
        );

        let flat = vec![PackRequest::new("x", 1.0, 0.0)];
        assert!(matches!(
            pack_exact(&packer, &flat, &[Bin::new(10.0, 10.0)]).unwrap_err(),
            PackError::InvalidRequest(_)
        ));

        assert!(matches!(
            pack_exact(&packer, &requests(), &[Bin::new(0.0, 10.0)]).unwrap_err(),
            PackError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_overlap_detection() {
        let layout = Layout {
            bins: vec![Bin::new(100.0, 100.0)],
            placements: vec![
                at("a", 0, 0.0, 0.0, 50.0, 50.0),
                at("b", 0, 25.0, 25.0, 50.0, 50.0),
            ],
        };
        assert_eq!(layout.overlapping_pairs().len(), 1);
        assert_eq!(layout.placement_of("b").map(|p| p.x), Some(25.0));
    }
}
