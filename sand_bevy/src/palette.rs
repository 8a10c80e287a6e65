use sand_engine::{MATERIAL_COUNT, Material};

/// RGBA for each material, indexed by material id.
pub const COLORS: [[u8; 4]; MATERIAL_COUNT] = [
    [0, 0, 0, 0],         // Empty
    [237, 201, 175, 255], // Sand
    [0, 119, 190, 255],   // Water
    [128, 128, 128, 255], // Stone
    [139, 69, 19, 255],   // Wood
    [255, 69, 0, 255],    // Fire
    [220, 220, 220, 255], // Steam
    [50, 50, 50, 255],    // Oil
    [173, 255, 47, 255],  // Acid
    [207, 16, 32, 255],   // Lava
    [34, 139, 34, 255],   // Plant
    [173, 216, 230, 255], // Ice
    [50, 50, 50, 150],    // Smoke
    [200, 220, 255, 180], // Glass
    [40, 0, 60, 255],     // Obsidian
    [64, 64, 64, 255],    // Gunpowder
];

pub const fn color(material: Material) -> [u8; 4] {
    COLORS[material.id() as usize]
}

/// The color as one little-endian word: `a << 24 | b << 16 | g << 8 | r`.
pub const fn packed(material: Material) -> u32 {
    u32::from_le_bytes(color(material))
}

/// Expand a cell buffer into `Rgba8Unorm` pixel bytes.
/// Unknown ids draw as Empty.
pub fn pixels(cells: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cells.len() * 4);
    for &id in cells {
        out.extend_from_slice(&color(Material::from_u8(id)));
    }
    out
}
