#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::too_many_arguments
)]

use bevy::{
    asset::RenderAssetUsages,
    input::mouse::MouseWheel,
    log::info,
    prelude::*,
    render::render_resource::{TextureFormat, TextureUsages},
    window::PrimaryWindow,
};
use bevy_egui::{EguiContexts, egui};
use sand_engine::{Brush, Material, Universe};

use crate::palette;

/// Largest brush the UI and scroll wheel allow
pub const MAX_BRUSH_RADIUS: i32 = 32;

/// Materials offered in the picker, in display order
pub const PICKER: [Material; 12] = [
    Material::Sand,
    Material::Water,
    Material::Stone,
    Material::Wood,
    Material::Oil,
    Material::Acid,
    Material::Lava,
    Material::Plant,
    Material::Ice,
    Material::Gunpowder,
    Material::Fire,
    Material::Steam,
];

/// Digit shortcuts for selecting materials
const KEY_MAP: [(KeyCode, char, Material); 10] = [
    (KeyCode::Digit1, '1', Material::Sand),
    (KeyCode::Digit2, '2', Material::Water),
    (KeyCode::Digit3, '3', Material::Stone),
    (KeyCode::Digit4, '4', Material::Wood),
    (KeyCode::Digit5, '5', Material::Oil),
    (KeyCode::Digit6, '6', Material::Acid),
    (KeyCode::Digit7, '7', Material::Lava),
    (KeyCode::Digit8, '8', Material::Plant),
    (KeyCode::Digit9, '9', Material::Ice),
    (KeyCode::Digit0, '0', Material::Gunpowder),
];

pub fn material_for_key(key: KeyCode) -> Option<Material> {
    KEY_MAP
        .iter()
        .find(|&&(k, _, _)| k == key)
        .map(|&(_, _, material)| material)
}

fn key_label(material: Material) -> Option<char> {
    KEY_MAP
        .iter()
        .find(|&&(_, _, m)| m == material)
        .map(|&(_, label, _)| label)
}

/// The simulated world
#[derive(Resource)]
pub struct Sandbox(pub Universe);

/// Screen pixels per cell
#[derive(Resource, Clone, Copy)]
pub struct DisplayFactor(pub u32);

/// Resource to track the currently selected material for placement
#[derive(Resource, Clone, Copy)]
pub struct SelectedMaterial(pub Material);

/// Resource to track whether to overwrite existing materials when drawing
#[derive(Resource, Clone, Copy)]
pub struct OverwriteMode(pub bool);

/// Resource to track the drawing radius in cells
#[derive(Resource, Clone, Copy)]
pub struct DrawRadius(pub i32);

/// Resource to signal that the grid should be cleared
#[derive(Resource, Default)]
pub struct ClearGrid(pub bool);

/// Toggled with Space
#[derive(Resource, Default)]
pub struct Paused(pub bool);

/// Resource to track simulation speed (0.0 = paused, 1.0 = normal, 2.0 = 2x speed)
#[derive(Resource)]
pub struct SimulationSpeed(pub f32);

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Start of a shift-drag straight line, as `(row, col)`
#[derive(Resource, Default)]
pub struct LineDrawingState {
    pub start: Option<(i32, i32)>,
}

/// Fractional ticks carried between frames
#[derive(Default)]
pub struct SimulationFrameAccumulator(pub f32);

impl SimulationFrameAccumulator {
    /// Add one frame at `speed` and return how many ticks are due.
    pub fn advance(&mut self, speed: f32) -> u32 {
        if speed <= 0.0 {
            return 0;
        }
        self.0 += speed;
        let due = self.0.floor();
        self.0 -= due;
        due as u32
    }
}

/// Map a world position over the grid sprite to `(row, col)`. The sprite is
/// centered on the origin with row 0 at the top. Positions off the sprite map
/// to cells outside the grid.
pub fn world_to_cell(world: Vec2, width: u32, height: u32, factor: u32) -> (i32, i32) {
    let factor = factor.max(1) as f32;
    let col = (world.x / factor + width as f32 / 2.0).floor() as i32;
    let row = (height as f32 / 2.0 - world.y / factor).floor() as i32;
    (row, col)
}

fn pointer_over_ui(egui_contexts: Option<EguiContexts>) -> bool {
    egui_contexts.is_some_and(|mut contexts| {
        contexts
            .ctx_mut()
            .is_ok_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
    })
}

fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) -> Option<Vec2> {
    let window = windows.single().ok()?;
    let cursor_position = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    camera
        .viewport_to_world_2d(camera_transform, cursor_position)
        .ok()
}

fn grid_image(width: u32, height: u32, data: Option<Vec<u8>>) -> Image {
    let mut image = Image::new_target_texture(width, height, TextureFormat::Rgba8Unorm);
    image.data = data;
    image.asset_usage = RenderAssetUsages::RENDER_WORLD;
    image.texture_descriptor.usage = TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING;
    image
}

pub fn setup(
    mut commands: Commands,
    mut image_assets: ResMut<Assets<Image>>,
    sandbox: Res<Sandbox>,
    display_factor: Res<DisplayFactor>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let (width, height) = (sandbox.0.width(), sandbox.0.height());
    let texture_handle = image_assets.add(grid_image(width, height, None));

    commands.spawn((
        Sprite {
            image: texture_handle,
            custom_size: Some(UVec2::new(width, height).as_vec2()),
            ..default()
        },
        Transform::from_scale(Vec3::splat(display_factor.0 as f32)),
    ));
    commands.spawn(Camera2d);

    commands.insert_resource(SelectedMaterial(Material::Sand));
    commands.insert_resource(OverwriteMode(true));
    commands.insert_resource(ClearGrid::default());
    commands.insert_resource(Paused::default());
    commands.insert_resource(SimulationSpeed::default());
    commands.insert_resource(LineDrawingState::default());

    // Fit the window to a grid size read from the settings file.
    if let Ok(mut window) = windows.single_mut() {
        window.resolution.set(
            width.saturating_mul(display_factor.0) as f32,
            height.saturating_mul(display_factor.0) as f32,
        );
    }

    info!("Sandbox ready: {}x{} cells at {}px per cell", width, height, display_factor.0);
}

/// UI system for the egui controls window.
pub fn ui_system(
    mut contexts: EguiContexts,
    sandbox: Res<Sandbox>,
    mut selected_material: ResMut<SelectedMaterial>,
    mut draw_radius: ResMut<DrawRadius>,
    mut overwrite_mode: ResMut<OverwriteMode>,
    mut clear_grid: ResMut<ClearGrid>,
    mut simulation_speed: ResMut<SimulationSpeed>,
    mut paused: ResMut<Paused>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    egui::Window::new("Controls").show(ctx, |ui| {
        ui.label("Material:");
        ui.horizontal_wrapped(|ui| {
            for material in PICKER {
                let response = ui.selectable_label(selected_material.0 == material, material.name());
                if response.clicked() {
                    selected_material.0 = material;
                }
                let hint = key_label(material).map_or_else(String::new, |key| format!(" [{key}]"));
                response.on_hover_text(format!("{}{hint}", material.description()));
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Brush Radius:");
            let mut radius = draw_radius.0;
            if ui.add(egui::Slider::new(&mut radius, 0..=MAX_BRUSH_RADIUS)).changed() {
                draw_radius.0 = radius;
            }
        });

        let mut overwrite = overwrite_mode.0;
        if ui.checkbox(&mut overwrite, "Overwrite").changed() {
            overwrite_mode.0 = overwrite;
        }
        ui.label("When disabled, drawing only fills empty cells.");

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Speed:");
            let mut speed = simulation_speed.0;
            if ui.add(egui::Slider::new(&mut speed, 0.0..=4.0)).changed() {
                simulation_speed.0 = speed;
            }
            if paused.0 || speed <= 0.0 {
                ui.label("(Paused)");
            } else {
                ui.label(format!("{speed:.1}x"));
            }
        });

        let mut is_paused = paused.0;
        if ui.checkbox(&mut is_paused, "Pause [Space]").changed() {
            paused.0 = is_paused;
        }

        ui.separator();

        ui.label(format!("Generation: {}", sandbox.0.generation()));
        if ui.button("Clear Grid").clicked() {
            clear_grid.0 = true;
        }
    });
}

/// Space toggles pause, digits pick a material.
pub fn handle_keyboard(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut selected_material: ResMut<SelectedMaterial>,
    mut paused: ResMut<Paused>,
    egui_contexts: Option<EguiContexts>,
) {
    if let Some(mut contexts) = egui_contexts
        && let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard_input.just_pressed(KeyCode::Space) {
        paused.0 = !paused.0;
        info!("Simulation {}", if paused.0 { "paused" } else { "resumed" });
    }
    for &key in keyboard_input.get_just_pressed() {
        if let Some(material) = material_for_key(key) {
            selected_material.0 = material;
        }
    }
}

/// Tick the universe according to speed and pause state
pub fn update_simulation(
    mut sandbox: ResMut<Sandbox>,
    mut clear_grid: ResMut<ClearGrid>,
    simulation_speed: Res<SimulationSpeed>,
    paused: Res<Paused>,
    mut frame_accumulator: Local<SimulationFrameAccumulator>,
) {
    if clear_grid.0 {
        clear_grid.0 = false;
        sandbox.0.clear();
    }
    if paused.0 {
        return;
    }
    for _ in 0..frame_accumulator.advance(simulation_speed.0) {
        sandbox.0.tick();
    }
}

/// Blit the cell buffer through the palette into a fresh texture.
pub fn render_grid_to_texture(
    sandbox: Res<Sandbox>,
    mut images: ResMut<Assets<Image>>,
    mut sprite_query: Query<&mut Sprite, Without<Camera>>,
) {
    let universe = &sandbox.0;
    let pixel_data = palette::pixels(universe.cells());

    // A new image each frame forces Bevy to upload the new data
    let new_handle = images.add(grid_image(universe.width(), universe.height(), Some(pixel_data)));
    for mut sprite in &mut sprite_query {
        sprite.image = new_handle.clone();
    }
}

/// Handle mouse scroll to adjust draw radius
pub fn handle_mouse_scroll(
    mut draw_radius: ResMut<DrawRadius>,
    mut scroll_evr: MessageReader<MouseWheel>,
    egui_contexts: Option<EguiContexts>,
) {
    if pointer_over_ui(egui_contexts) {
        scroll_evr.clear();
        return;
    }

    let total_scroll: f32 = scroll_evr.read().map(|ev| ev.y).sum();
    let step = if total_scroll > 0.0 {
        1
    } else if total_scroll < 0.0 {
        -1
    } else {
        return;
    };
    draw_radius.0 = (draw_radius.0 + step).clamp(0, MAX_BRUSH_RADIUS);
}

/// Draw circle outline to show where material will be placed
pub fn draw_circle_preview(
    mut gizmos: Gizmos,
    draw_radius: Res<DrawRadius>,
    display_factor: Res<DisplayFactor>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    egui_contexts: Option<EguiContexts>,
) {
    if pointer_over_ui(egui_contexts) {
        return;
    }
    let Some(world_pos) = cursor_world_position(&windows, &camera_query) else {
        return;
    };

    // Radius in cells to world units, out to the edge of the outermost cell
    let world_radius = (draw_radius.0 as f32 + 0.5) * display_factor.0 as f32;
    gizmos.circle_2d(world_pos, world_radius, Color::WHITE);
}

/// Left paints the selected material, right erases, shift-drag draws a line.
pub fn handle_mouse_clicks(
    mut sandbox: ResMut<Sandbox>,
    selected_material: Res<SelectedMaterial>,
    draw_radius: Res<DrawRadius>,
    overwrite_mode: Res<OverwriteMode>,
    display_factor: Res<DisplayFactor>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut line_state: ResMut<LineDrawingState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    egui_contexts: Option<EguiContexts>,
) {
    let painting = mouse_button_input.pressed(MouseButton::Left);
    let erasing = mouse_button_input.pressed(MouseButton::Right);
    if !painting && !erasing {
        line_state.start = None;
        return;
    }
    if pointer_over_ui(egui_contexts) {
        return;
    }
    let Some(world_pos) = cursor_world_position(&windows, &camera_query) else {
        return;
    };

    let universe = &mut sandbox.0;
    let (row, col) = world_to_cell(world_pos, universe.width(), universe.height(), display_factor.0);

    if painting {
        let brush = Brush {
            material: selected_material.0,
            radius: draw_radius.0,
            overwrite: overwrite_mode.0,
        };
        let shift_pressed =
            keyboard_input.pressed(KeyCode::ShiftLeft) || keyboard_input.pressed(KeyCode::ShiftRight);
        if shift_pressed {
            let start = *line_state.start.get_or_insert((row, col));
            universe.paint_line(start, (row, col), &brush);
        } else {
            line_state.start = None;
            universe.paint_brush(row, col, &brush);
        }
    } else {
        line_state.start = None;
        universe.paint(row, col, Material::Empty, draw_radius.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_follow_the_key_map() {
        assert_eq!(material_for_key(KeyCode::Digit1), Some(Material::Sand));
        assert_eq!(material_for_key(KeyCode::Digit7), Some(Material::Lava));
        assert_eq!(material_for_key(KeyCode::Digit0), Some(Material::Gunpowder));
        assert_eq!(material_for_key(KeyCode::KeyA), None);
        assert_eq!(key_label(Material::Ice), Some('9'));
        assert_eq!(key_label(Material::Fire), None);
    }

    #[test]
    fn picker_hides_residue_materials() {
        for hidden in [Material::Empty, Material::Smoke, Material::Glass, Material::Obsidian] {
            assert!(!PICKER.contains(&hidden));
        }
        for (_, _, material) in KEY_MAP {
            assert!(PICKER.contains(&material));
        }
    }

    #[test]
    fn accumulator_spreads_fractional_speed() {
        let mut acc = SimulationFrameAccumulator::default();
        let half: Vec<u32> = (0..4).map(|_| acc.advance(0.5)).collect();
        assert_eq!(half, [0, 1, 0, 1]);
        assert_eq!(acc.advance(2.0), 2);
        assert_eq!(acc.advance(0.0), 0);
        assert_eq!(acc.advance(-1.0), 0);
    }

    #[test]
    fn world_positions_map_to_cells() {
        // 128x128 grid at 4px per cell spans -256..256 on both axes
        assert_eq!(world_to_cell(Vec2::new(-256.0, 256.0), 128, 128, 4), (0, 0));
        assert_eq!(world_to_cell(Vec2::new(255.0, -255.0), 128, 128, 4), (127, 127));
        assert_eq!(world_to_cell(Vec2::ZERO, 128, 128, 4), (64, 64));
        assert_eq!(world_to_cell(Vec2::new(-257.0, 0.0), 128, 128, 4), (64, -1));
        assert_eq!(world_to_cell(Vec2::new(0.0, 300.0), 128, 128, 4), (-11, 64));
    }
}
