//! A falling-sand sandbox: paint materials with the mouse and watch them react.

use bevy::log::error;
use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use sand_bevy::settings::{HostSettings, SETTINGS_FILE};
use sand_bevy::systems::{self, DisplayFactor, Sandbox};
use sand_bevy::{DISPLAY_FACTOR, GRID_HEIGHT, GRID_WIDTH};
use sand_engine::{EngineError, Universe};

#[allow(clippy::cast_possible_wrap)]
fn main() -> Result<(), EngineError> {
    let mut app = App::new();
    app.insert_resource(ClearColor(Color::BLACK)).add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Falling Sand".into(),
                    resolution: (UVec2::new(GRID_WIDTH, GRID_HEIGHT) * DISPLAY_FACTOR).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
        EguiPlugin::default(),
    ));

    // Loaded after the plugins so the log subscriber is installed.
    let settings = HostSettings::load(SETTINGS_FILE);
    let universe = match create_universe(&settings) {
        Ok(universe) => universe,
        Err(e) => {
            error!("Invalid settings ({}), using the default grid", e);
            Universe::new(GRID_WIDTH as i32, GRID_HEIGHT as i32)?
        }
    };

    app.insert_resource(DisplayFactor(settings.display_factor))
        .insert_resource(systems::DrawRadius(settings.brush_radius.max(0)))
        .insert_resource(Sandbox(universe))
        .add_systems(Startup, systems::setup)
        .add_systems(EguiPrimaryContextPass, systems::ui_system)
        .add_systems(
            Update,
            (
                systems::handle_keyboard,
                systems::handle_mouse_scroll,
                systems::handle_mouse_clicks,
                systems::update_simulation,
                systems::render_grid_to_texture,
                systems::draw_circle_preview,
            )
                .chain(), // input -> tick -> render -> preview
        )
        .run();
    Ok(())
}

fn create_universe(settings: &HostSettings) -> Result<Universe, EngineError> {
    let invalid = EngineError::InvalidDimensions {
        width: i64::from(settings.grid_width),
        height: i64::from(settings.grid_height),
    };
    let width = i32::try_from(settings.grid_width).map_err(|_| invalid.clone())?;
    let height = i32::try_from(settings.grid_height).map_err(|_| invalid)?;
    Universe::with_config(width, height, settings.simulation.clone())
}
