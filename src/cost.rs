//! Pricing rules for placement and upgrades.
//!
//! A pure calculator: multiplicative factors are applied in a fixed order
//! (base, supply scaling, land-value surcharge, wealth tax) and rounded once
//! at the end, so reimplementations agree bit-for-bit.

use crate::catalog::Catalog;
use crate::land_value::LandValueField;
use crate::world::{BuildingKind, Coord, Grid};

/// Treasury balance above which the wealth tax applies.
pub const WEALTH_TAX_THRESHOLD: i64 = 10_000;
/// Flat multiplier on all prices at high balances.
pub const WEALTH_TAX_MULTIPLIER: f64 = 1.25;
/// Maximum land-value surcharge fraction (+50% at desirability 1.0).
pub const LAND_VALUE_SURCHARGE: f64 = 0.5;
/// Per-level multiplier step for upgrade pricing.
pub const UPGRADE_LEVEL_FACTOR: f64 = 0.8;

fn raw_cost(
    kind: BuildingKind,
    coord: Coord,
    grid: &Grid,
    land_value: &LandValueField,
    catalog: &Catalog,
    treasury: i64,
) -> f64 {
    let entry = catalog.entry(kind);
    let existing = grid.count_kind(kind);
    let mut price = entry.base_cost as f64 * entry.cost_scaling_factor.powi(existing as i32);
    price *= 1.0 + land_value.value_or_zero(coord) * LAND_VALUE_SURCHARGE;
    if treasury > WEALTH_TAX_THRESHOLD {
        price *= WEALTH_TAX_MULTIPLIER;
    }
    price
}

/// Price to place `kind` at `coord`. Erasing (the `Empty` kind) is free:
/// its base cost of zero flows through every multiplier.
pub fn placement_cost(
    kind: BuildingKind,
    coord: Coord,
    grid: &Grid,
    land_value: &LandValueField,
    catalog: &Catalog,
    treasury: i64,
) -> u64 {
    raw_cost(kind, coord, grid, land_value, catalog, treasury).round() as u64
}

/// Price to raise the tile at `coord` from `current_level` (1-based) to the
/// next level: the placement price scaled by the level factor.
pub fn upgrade_cost(
    kind: BuildingKind,
    current_level: u32,
    coord: Coord,
    grid: &Grid,
    land_value: &LandValueField,
    catalog: &Catalog,
    treasury: i64,
) -> u64 {
    let base = placement_cost(kind, coord, grid, land_value, catalog, treasury);
    (base as f64 * (1.0 + current_level as f64 * UPGRADE_LEVEL_FACTOR)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Decoration;

    fn fixture() -> (Grid, LandValueField, Catalog) {
        let grid = Grid::new(20);
        let catalog = Catalog::standard();
        let field = LandValueField::compute(&grid, catalog.amenity_radius());
        (grid, field, catalog)
    }

    fn place(grid: &mut Grid, kind: BuildingKind, x: u32, y: u32) {
        grid.set_building(Coord::new(x, y), kind, Decoration::None, kind.palette()[0]);
    }

    #[test]
    fn identical_inputs_price_identically() {
        let (grid, field, catalog) = fixture();
        let coord = Coord::new(3, 3);
        let first = placement_cost(BuildingKind::House, coord, &grid, &field, &catalog, 500);
        let second = placement_cost(BuildingKind::House, coord, &grid, &field, &catalog, 500);
        assert_eq!(first, second);
    }

    #[test]
    fn repeated_construction_gets_strictly_dearer() {
        let (mut grid, field, catalog) = fixture();
        let coord = Coord::new(10, 10);
        let mut previous = placement_cost(BuildingKind::House, coord, &grid, &field, &catalog, 0);
        for i in 0..5 {
            place(&mut grid, BuildingKind::House, i, 0);
            let next = placement_cost(BuildingKind::House, coord, &grid, &field, &catalog, 0);
            assert!(
                next > previous,
                "cost should rise with supply: {next} <= {previous}"
            );
            previous = next;
        }
    }

    #[test]
    fn erase_is_always_free() {
        let (grid, field, catalog) = fixture();
        let cost = placement_cost(
            BuildingKind::Empty,
            Coord::new(1, 1),
            &grid,
            &field,
            &catalog,
            50_000,
        );
        assert_eq!(cost, 0);
    }

    #[test]
    fn high_desirability_adds_a_surcharge() {
        let (mut grid, _, catalog) = fixture();
        place(&mut grid, BuildingKind::Park, 5, 5);
        let field = LandValueField::compute(&grid, catalog.amenity_radius());

        let near = placement_cost(BuildingKind::Shop, Coord::new(5, 6), &grid, &field, &catalog, 0);
        let far = placement_cost(
            BuildingKind::Shop,
            Coord::new(19, 19),
            &grid,
            &field,
            &catalog,
            0,
        );
        assert!(near > far, "park proximity should cost more: {near} vs {far}");
    }

    #[test]
    fn wealth_tax_kicks_in_above_the_threshold() {
        let (grid, field, catalog) = fixture();
        let coord = Coord::new(2, 2);
        let modest = placement_cost(BuildingKind::Factory, coord, &grid, &field, &catalog, 10_000);
        let wealthy =
            placement_cost(BuildingKind::Factory, coord, &grid, &field, &catalog, 10_001);
        assert_eq!(wealthy, (modest as f64 * 1.25).round() as u64);
    }

    #[test]
    fn factor_order_matches_the_contract() {
        // One existing house, land value floor 0.1, no wealth tax:
        // 100 * 1.15 * (1 + 0.1 * 0.5) = 120.75 -> 121.
        let (mut grid, _, catalog) = fixture();
        place(&mut grid, BuildingKind::House, 0, 0);
        let field = LandValueField::compute(&grid, catalog.amenity_radius());
        let cost = placement_cost(BuildingKind::House, Coord::new(9, 9), &grid, &field, &catalog, 0);
        assert_eq!(cost, 121);
    }

    #[test]
    fn upgrade_price_scales_with_the_current_level() {
        let (grid, field, catalog) = fixture();
        let coord = Coord::new(4, 4);
        let base = placement_cost(BuildingKind::House, coord, &grid, &field, &catalog, 0);
        let level_one =
            upgrade_cost(BuildingKind::House, 1, coord, &grid, &field, &catalog, 0);
        let level_three =
            upgrade_cost(BuildingKind::House, 3, coord, &grid, &field, &catalog, 0);
        assert_eq!(level_one, (base as f64 * 1.8).round() as u64);
        assert_eq!(level_three, (base as f64 * 3.4).round() as u64);
    }
}
