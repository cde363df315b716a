//! Impact mapping
//!
//! Converts an asset's confidentiality/integrity/availability triad into a
//! base impact on the 1-5 scale used by the score calculator.

use register_types::asset::{Asset, CidRatings};
use register_types::scale::{CID_MAX, CID_MIN, SCALE_MAX, SCALE_MIN};

/// Smallest possible CID total (1 + 1 + 1)
pub const CID_TOTAL_MIN: u8 = CID_MIN * 3;
/// Largest possible CID total (3 + 3 + 3)
pub const CID_TOTAL_MAX: u8 = CID_MAX * 3;

// ── Mapping table ────────────────────────────────────────────────────────

/// Upper bound (inclusive) of each CID band and the impact it maps to.
///
/// | CID total | Impact |
/// |-----------|--------|
/// | 3 – 4     | 1      |
/// | 5 – 7     | 3      |
/// | 8 – 9     | 5      |
static IMPACT_BANDS: [(u8, u8); 3] = [(4, 1), (7, 3), (CID_TOTAL_MAX, 5)];

/// Map a CID total (3-9) to an impact value in {1, 3, 5}.
///
/// Totals outside 3-9 are clamped first; upstream validation should make
/// that path unreachable.
pub fn impact_mapping(cid_total: u8) -> u8 {
    let total = cid_total.clamp(CID_TOTAL_MIN, CID_TOTAL_MAX);
    IMPACT_BANDS
        .iter()
        .find(|(upper, _)| total <= *upper)
        .map(|(_, impact)| *impact)
        .unwrap_or(SCALE_MAX)
}

// ── Asset helpers ────────────────────────────────────────────────────────

/// Clamp a single CID component to 1-3
pub fn clamp_rating(value: u8) -> u8 {
    value.clamp(CID_MIN, CID_MAX)
}

/// Clamp a probability/impact value to 1-5
pub fn clamp_scale(value: u8) -> u8 {
    value.clamp(SCALE_MIN, SCALE_MAX)
}

/// Sum of the clamped CID components (3-9)
pub fn cid_total(ratings: &CidRatings) -> u8 {
    clamp_rating(ratings.confidentiality)
        + clamp_rating(ratings.integrity)
        + clamp_rating(ratings.availability)
}

/// Base impact derived from the asset's CID ratings
pub fn base_impact(asset: &Asset) -> u8 {
    impact_mapping(cid_total(&asset.ratings))
}
