#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use sand_engine::{MATERIAL_COUNT, Material, SimConfig, Universe};

fn seeded(width: i32, height: i32, seed: u64) -> Universe {
    Universe::with_config(width, height, SimConfig::seeded(seed)).expect("valid dimensions")
}

fn positions_of(u: &Universe, material: Material) -> Vec<(u32, u32)> {
    let width = u.width() as usize;
    u.cells()
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id == material.id())
        .map(|(i, _)| ((i / width) as u32, (i % width) as u32))
        .collect()
}

#[test]
fn buffer_keeps_its_size_and_valid_ids() {
    let mut u = seeded(24, 18, 11);
    for (row, material) in [
        (1, Material::Sand),
        (3, Material::Water),
        (5, Material::Lava),
        (7, Material::Gunpowder),
        (9, Material::Fire),
        (11, Material::Acid),
        (13, Material::Oil),
        (15, Material::Plant),
    ] {
        u.paint(row, (row * 3) % 24, material, 2);
    }
    u.paint(17, 12, Material::Ice, 3);
    u.paint(0, 4, Material::Wood, 2);

    for _ in 0..300 {
        u.tick();
        assert_eq!(u.cells().len(), 24 * 18);
        assert!(u.cells().iter().all(|&id| (id as usize) < MATERIAL_COUNT));
    }
}

#[test]
fn stone_and_glass_are_conserved_without_reactive_neighbors() {
    let mut u = seeded(20, 20, 3);
    u.paint(15, 5, Material::Stone, 2);
    u.paint(10, 14, Material::Glass, 2);
    u.paint(19, 0, Material::Stone, 0);
    u.paint(2, 5, Material::Sand, 2);
    u.paint(2, 14, Material::Water, 2);
    let stone = u.count(Material::Stone);
    let glass = u.count(Material::Glass);
    let stone_at = positions_of(&u, Material::Stone);

    for _ in 0..500 {
        u.tick();
        assert_eq!(u.count(Material::Stone), stone);
        assert_eq!(u.count(Material::Glass), glass);
    }
    assert_eq!(positions_of(&u, Material::Stone), stone_at);
}

#[test]
fn sand_falls_to_the_bottom_within_height_ticks() {
    let height = 25;
    let mut u = seeded(7, height, 1);
    u.paint(0, 3, Material::Sand, 0);
    for _ in 0..height {
        u.tick();
    }
    assert_eq!(u.get(height - 1, 3), Some(Material::Sand));
    assert_eq!(u.count(Material::Sand), 1);
}

#[test]
fn full_bottom_row_of_sand_is_at_rest() {
    let mut u = seeded(16, 8, 2);
    for col in 0..16 {
        u.paint(7, col, Material::Sand, 0);
    }
    let before = u.cells().to_vec();
    for _ in 0..200 {
        u.tick();
    }
    assert_eq!(u.cells(), before.as_slice());
}

#[test]
fn water_column_levels_out() {
    let (width, height) = (20, 10);
    let mut u = seeded(width, height, 4);
    for row in 0..height {
        u.paint(row, 0, Material::Water, 0);
    }

    for _ in 0..3000 {
        u.tick();
    }

    let water = positions_of(&u, Material::Water);
    assert_eq!(water.len(), 10);
    let bottom = (height - 1) as u32;
    let on_floor = water.iter().filter(|&&(row, _)| row == bottom).count();
    assert!(on_floor >= 9, "only {on_floor} of 10 water cells reached the floor");
    // Nothing is left hanging over empty space.
    for &(row, col) in &water {
        if row < bottom {
            assert_ne!(u.get(row as i32 + 1, col as i32), Some(Material::Empty));
        }
    }
}

#[test]
fn sand_sinks_through_water() {
    let mut u = seeded(1, 4, 5);
    u.paint(3, 0, Material::Water, 0);
    u.paint(2, 0, Material::Sand, 0);
    for _ in 0..20 {
        u.tick();
    }
    assert_eq!(u.get(3, 0), Some(Material::Sand));
    assert_eq!(u.get(2, 0), Some(Material::Water));
}

#[test]
fn lone_fire_burns_out_within_bound() {
    const TRIALS: u64 = 200;
    const BOUND: usize = 150;

    let burned_out = (0..TRIALS)
        .filter(|&seed| {
            let mut u = seeded(9, 9, seed);
            u.paint(6, 4, Material::Fire, 0);
            (0..BOUND).any(|_| {
                u.tick();
                u.count(Material::Fire) == 0
            })
        })
        .count();

    assert!(
        burned_out * 100 >= TRIALS as usize * 99,
        "{burned_out} of {TRIALS} fires burned out within {BOUND} ticks"
    );
}

#[test]
fn painting_far_outside_the_grid_changes_nothing() {
    let mut u = seeded(10, 10, 6);
    u.paint(4, 4, Material::Stone, 1);
    let before = u.cells().to_vec();
    u.paint(-500, 3, Material::Sand, 4);
    u.paint(3, 10_000, Material::Water, 40);
    u.paint(i32::MAX, i32::MIN, Material::Lava, 2);
    assert_eq!(u.cells(), before.as_slice());
}

#[test]
fn clear_always_empties_the_grid() {
    let mut u = seeded(12, 12, 7);
    u.paint(2, 2, Material::Lava, 3);
    u.paint(8, 8, Material::Gunpowder, 2);
    u.paint(9, 7, Material::Fire, 0);
    u.paint(0, 11, Material::Water, 4);
    for _ in 0..25 {
        u.tick();
    }
    u.clear();
    assert!(u.cells().iter().all(|&id| id == Material::Empty.id()));
    u.clear();
    assert!(u.cells().iter().all(|&id| id == Material::Empty.id()));
}

#[test]
fn single_grain_lands_at_row_nine() {
    let mut u = seeded(10, 10, 8);
    u.paint(0, 5, Material::Sand, 0);
    for _ in 0..10 {
        u.tick();
    }
    assert_eq!(u.get(9, 5), Some(Material::Sand));
    assert_eq!(u.count(Material::Sand), 1);
    assert_eq!(u.count(Material::Empty), 99);
}

#[test]
fn lava_on_water_hardens() {
    let mut u = seeded(8, 6, 9);
    for col in 0..8 {
        u.paint(5, col, Material::Water, 0);
    }
    u.paint(1, 4, Material::Lava, 0);
    for _ in 0..30 {
        u.tick();
    }
    assert_eq!(u.count(Material::Lava), 0);
    assert_eq!(u.count(Material::Obsidian), 1);
}

#[test]
fn flames_spread_through_wood() {
    let config = SimConfig {
        fire_decay_chance: 0.02,
        ..SimConfig::seeded(10)
    };
    let mut u = Universe::with_config(12, 4, config).expect("valid dimensions");
    for col in 0..12 {
        u.paint(2, col, Material::Wood, 0);
        u.paint(3, col, Material::Wood, 0);
    }
    // Buried in the wood, the flame has nowhere to rise.
    u.paint(3, 5, Material::Fire, 0);
    let start = u.count(Material::Wood);
    for _ in 0..400 {
        u.tick();
    }
    assert!(u.count(Material::Wood) < start);
}
