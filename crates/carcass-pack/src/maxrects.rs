//! MaxRects packing with Best-Short-Side-Fit scoring.
//!
//! Requests are packed offline, largest area first. Each request goes to the
//! best-scoring position among the sheets already opened; a new sheet is
//! opened from the catalog (in catalog order) only when no open sheet can
//! take it. Every sheet keeps a list of maximal free rectangles which is
//! split around each placement and pruned of rectangles contained in others.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Bin, PackRequest, Placement, EPSILON};
use crate::packer::{PackOutcome, Packer};

#[derive(Debug, Clone, Copy, PartialEq)]
struct FreeRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FreeRect {
    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn top(&self) -> f64 {
        self.y + self.height
    }

    fn intersects(&self, other: &FreeRect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.top() - EPSILON
            && other.y < self.top() - EPSILON
    }

    fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.top() <= self.top() + EPSILON
    }
}

/// A candidate position and its leftover-side score.
#[derive(Debug, Clone, Copy)]
struct Fit {
    rect: FreeRect,
    rotated: bool,
    short_side: f64,
    long_side: f64,
}

impl Fit {
    fn better_than(&self, other: &Fit) -> bool {
        match cmp_len(self.short_side, other.short_side) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => cmp_len(self.long_side, other.long_side) == Ordering::Less,
        }
    }
}

fn cmp_len(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPSILON {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn orientations(
    width: f64,
    height: f64,
    allow_rotation: bool,
) -> impl Iterator<Item = (f64, f64, bool)> {
    let turned = (allow_rotation && (width - height).abs() > EPSILON).then_some((height, width, true));
    std::iter::once((width, height, false)).chain(turned)
}

/// One opened stock sheet.
struct Sheet {
    bin_index: usize,
    free: Vec<FreeRect>,
}

impl Sheet {
    fn new(bin_index: usize, bin: Bin) -> Self {
        Self {
            bin_index,
            free: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                width: bin.width,
                height: bin.height,
            }],
        }
    }

    fn best_fit(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Fit> {
        let mut best: Option<Fit> = None;
        for free in &self.free {
            for (w, h, rotated) in orientations(width, height, allow_rotation) {
                if w > free.width + EPSILON || h > free.height + EPSILON {
                    continue;
                }
                let leftover_x = free.width - w;
                let leftover_y = free.height - h;
                let fit = Fit {
                    rect: FreeRect {
                        x: free.x,
                        y: free.y,
                        width: w,
                        height: h,
                    },
                    rotated,
                    short_side: leftover_x.min(leftover_y),
                    long_side: leftover_x.max(leftover_y),
                };
                if best.map_or(true, |b| fit.better_than(&b)) {
                    best = Some(fit);
                }
            }
        }
        best
    }

    fn occupy(&mut self, used: FreeRect) {
        let mut split = Vec::with_capacity(self.free.len() + 4);
        for free in self.free.drain(..) {
            if !free.intersects(&used) {
                split.push(free);
                continue;
            }
            if used.x > free.x + EPSILON {
                split.push(FreeRect {
                    width: used.x - free.x,
                    ..free
                });
            }
            if used.right() < free.right() - EPSILON {
                split.push(FreeRect {
                    x: used.right(),
                    width: free.right() - used.right(),
                    ..free
                });
            }
            if used.y > free.y + EPSILON {
                split.push(FreeRect {
                    height: used.y - free.y,
                    ..free
                });
            }
            if used.top() < free.top() - EPSILON {
                split.push(FreeRect {
                    y: used.top(),
                    height: free.top() - used.top(),
                    ..free
                });
            }
        }
        self.free = prune(split);
    }
}

/// Drop free rectangles fully contained in another one.
fn prune(rects: Vec<FreeRect>) -> Vec<FreeRect> {
    let mut keep = vec![true; rects.len()];
    for i in 0..rects.len() {
        for j in 0..rects.len() {
            if i != j && keep[j] && rects[j].contains(&rects[i]) {
                keep[i] = false;
                break;
            }
        }
    }
    rects
        .into_iter()
        .zip(keep)
        .filter_map(|(rect, kept)| kept.then_some(rect))
        .collect()
}

/// Offline MaxRects packer (Best-Short-Side-Fit, best open sheet first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxRectsPacker {
    allow_rotation: bool,
}

impl Default for MaxRectsPacker {
    fn default() -> Self {
        Self {
            allow_rotation: true,
        }
    }
}

impl MaxRectsPacker {
    /// Create a packer that may rotate requests by 90°.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow or forbid 90° rotation of requests.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Whether requests may be rotated.
    pub fn allows_rotation(&self) -> bool {
        self.allow_rotation
    }
}

impl Packer for MaxRectsPacker {
    fn name(&self) -> &str {
        "maxrects-bssf"
    }

    fn pack(&self, requests: &[PackRequest], bins: &[Bin]) -> Result<PackOutcome> {
        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.sort_by(|&a, &b| requests[b].area().total_cmp(&requests[a].area()));

        // Open sheets, kept sorted by catalog index so ties go to the lower bin.
        let mut sheets: Vec<Sheet> = Vec::new();
        let mut opened = vec![false; bins.len()];
        let mut outcome = PackOutcome::default();

        for idx in order {
            let request = &requests[idx];
            let (width, height) = (request.width, request.height);

            let mut best: Option<(usize, Fit)> = None;
            for (pos, sheet) in sheets.iter().enumerate() {
                if let Some(fit) = sheet.best_fit(width, height, self.allow_rotation) {
                    if best.as_ref().map_or(true, |(_, b)| fit.better_than(b)) {
                        best = Some((pos, fit));
                    }
                }
            }

            if best.is_none() {
                for (bin_index, bin) in bins.iter().enumerate() {
                    if opened[bin_index] {
                        continue;
                    }
                    let sheet = Sheet::new(bin_index, *bin);
                    if let Some(fit) = sheet.best_fit(width, height, self.allow_rotation) {
                        opened[bin_index] = true;
                        let pos = sheets.partition_point(|s| s.bin_index < bin_index);
                        sheets.insert(pos, sheet);
                        trace!(bin_index, id = %request.id, "opened sheet");
                        best = Some((pos, fit));
                        break;
                    }
                }
            }

            match best {
                Some((pos, fit)) => {
                    let sheet = &mut sheets[pos];
                    sheet.occupy(fit.rect);
                    outcome.placements.push(Placement {
                        bin_index: sheet.bin_index,
                        x: fit.rect.x,
                        y: fit.rect.y,
                        width: fit.rect.width,
                        height: fit.rect.height,
                        id: request.id.clone(),
                        rotated: fit.rotated,
                    });
                }
                None => {
                    debug!(id = %request.id, width, height, "no bin can take request");
                    outcome.unplaced.push(request.id.clone());
                }
            }
        }

        outcome.placements.sort_by_key(|p| p.bin_index);
        debug!(
            placed = outcome.placements.len(),
            unplaced = outcome.unplaced.len(),
            sheets = sheets.len(),
            "maxrects finished"
        );
        Ok(outcome)
    }
}
