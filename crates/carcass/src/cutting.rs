//! Turn pieces into packing requests and lay them out on stock.

use carcass_pack::{pack_exact, Layout, MaxRectsPacker, PackError, PackRequest, Packer};
use tracing::info;

use crate::config::PackingConfig;
use crate::piece::PieceSet;

/// One request per piece, padded by `kerf` on both axes and keyed by piece name.
pub fn pack_requests(pieces: &PieceSet, kerf: f64) -> Vec<PackRequest> {
    pieces
        .iter()
        .map(|p| PackRequest::with_kerf(p.name.clone(), p.width, p.height, kerf))
        .collect()
}

/// The solver used when none is injected: MaxRects honoring `allow_rotation`.
pub fn default_packer(packing: &PackingConfig) -> MaxRectsPacker {
    MaxRectsPacker::new().with_rotation(packing.allow_rotation)
}

/// Pack every piece onto the configured stock, or report the shortfall.
pub fn pack_pieces<P: Packer + ?Sized>(
    pieces: &PieceSet,
    packing: &PackingConfig,
    packer: &P,
) -> carcass_pack::Result<Layout> {
    if !(packing.kerf.is_finite() && packing.kerf > 0.0) {
        return Err(PackError::InvalidRequest(format!(
            "kerf must be positive, got {}",
            packing.kerf
        )));
    }
    let requests = pack_requests(pieces, packing.kerf);
    let bins = packing.bin_catalog();
    let layout = pack_exact(packer, &requests, &bins)?;
    info!(
        pieces = layout.len(),
        sheets = layout.sheets_used().len(),
        "all pieces placed"
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CabinetConfig, StockSheet};
    use crate::dimension::dimension;
    use carcass_pack::{Bin, PackOutcome, Placement};

    /// Lays requests left to right in input order, moving to the next bin
    /// when the current one is full.
    struct NextFit;

    impl Packer for NextFit {
        fn name(&self) -> &str {
            "next-fit"
        }

        fn pack(
            &self,
            requests: &[PackRequest],
            bins: &[Bin],
        ) -> carcass_pack::Result<PackOutcome> {
            let mut outcome = PackOutcome::default();
            let (mut bin_index, mut x) = (0, 0.0);
            for r in requests {
                while bin_index < bins.len() && !bins[bin_index].fits(x + r.width, r.height) {
                    bin_index += 1;
                    x = 0.0;
                }
                if bin_index == bins.len() {
                    outcome.unplaced.push(r.id.clone());
                    continue;
                }
                outcome.placements.push(Placement {
                    bin_index,
                    x,
                    y: 0.0,
                    width: r.width,
                    height: r.height,
                    id: r.id.clone(),
                    rotated: false,
                });
                x += r.width;
            }
            Ok(outcome)
        }
    }

    #[test]
    fn test_requests_carry_kerf() {
        let pieces = dimension(&CabinetConfig::default()).unwrap();
        let requests = pack_requests(&pieces, 3.0);

        assert_eq!(requests.len(), pieces.len());
        assert_eq!(requests[0].id, "side_left");
        assert_eq!((requests[0].width, requests[0].height), (1567.0, 303.0));
        assert_eq!(requests[4].width, 648.5);
    }

    #[test]
    fn test_injected_packer_is_used() {
        let mut config = CabinetConfig::default();
        config.packing.stock[0].count = 8;
        let pieces = dimension(&config).unwrap();
        let layout = pack_pieces(&pieces, &config.packing, &NextFit).unwrap();

        assert_eq!(layout.len(), 14);
        assert_eq!(layout.sheets_used(), (0..8).collect::<Vec<_>>());
        let shelf = layout.placement_of("shelf_0").unwrap();
        assert_eq!((shelf.bin_index, shelf.x), (3, 1348.0));
    }

    #[test]
    fn test_injected_packer_shortfall() {
        let config = CabinetConfig::default();
        let pieces = dimension(&config).unwrap();
        let err = pack_pieces(&pieces, &config.packing, &NextFit).unwrap_err();

        assert_eq!(
            err,
            PackError::Incomplete {
                placed: 13,
                required: 14,
                unplaced: vec!["centre_0".into()],
            }
        );
    }

    #[test]
    fn test_default_packer_follows_rotation_setting() {
        let mut packing = CabinetConfig::default().packing;
        assert!(default_packer(&packing).allows_rotation());
        packing.allow_rotation = false;
        assert!(!default_packer(&packing).allows_rotation());
    }

    #[test]
    fn test_default_config_fits_catalog() {
        let config = CabinetConfig::default();
        let pieces = dimension(&config).unwrap();
        let layout = pack_pieces(&pieces, &config.packing, &default_packer(&config.packing)).unwrap();

        assert_eq!(layout.len(), pieces.len());
        assert!(layout.overlapping_pairs().is_empty());
        assert_eq!(layout.sheets_used().len(), 7);
    }

    #[test]
    fn test_invalid_kerf() {
        let mut config = CabinetConfig::default();
        config.packing.kerf = 0.0;
        let pieces = dimension(&CabinetConfig::default()).unwrap();
        let err = pack_pieces(&pieces, &config.packing, &NextFit).unwrap_err();
        assert!(matches!(err, PackError::InvalidRequest(_)));
    }

    #[test]
    fn test_five_columns_need_full_sheets() {
        let mut config = CabinetConfig {
            width: 960.0,
            height: 960.0,
            depth: 350.0,
            number_columns: 5,
            number_shelves: vec![6; 5],
            ..CabinetConfig::default()
        };
        let pieces = dimension(&config).unwrap();

        config.packing.stock = vec![StockSheet {
            width: 2440.0,
            height: 1220.0,
            count: 1,
        }];
        let packer = default_packer(&config.packing);
        match pack_pieces(&pieces, &config.packing, &packer) {
            Err(PackError::Incomplete {
                placed, required, ..
            }) => {
                assert_eq!(required, 38);
                assert!(placed < 38);
            }
            other => panic!("expected shortfall, got {other:?}"),
        }

        config.packing.stock[0].count = 4;
        let layout = pack_pieces(&pieces, &config.packing, &packer).unwrap();
        assert_eq!(layout.len(), 38);
        assert!(layout.overlapping_pairs().is_empty());
    }
}
