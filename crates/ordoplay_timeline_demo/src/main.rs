// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` timeline demo.
//!
//! Runs a headless scene at a fixed frame rate and drives a few entities
//! through scripted timelines:
//! - A crate that waits, slides and is destroyed
//! - A player that swaps sprite and flashes red
//! - A drone that drifts at a constant rate
//!
//! Pass a RON config path as the first argument to override the defaults.

mod config;
mod scene;

use config::DemoConfig;
use scene::{Scene, SceneEntity, SpriteAtlas};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match DemoConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in config.log_filter.split(',').filter(|d| !d.trim().is_empty()) {
        match directive.trim().parse::<tracing_subscriber::filter::Directive>() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log directive {directive:?}: {e}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OrdoPlay timeline demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &DemoConfig) -> Result<(), ordoplay_timeline::TimelineError> {
    let mut atlas = SpriteAtlas::default();
    let mut scene = Scene::new(config.timeline.clone());

    let crate_id = scene.spawn(SceneEntity::new("Crate", [0.0, 0.0, 0.0]));
    scene.animate(crate_id, |t| {
        t.delay(1.0)?
            .move_to([10.0, 0.0, 0.0], 2.0)?
            .destroy()
    })?;

    let idle = atlas.sprite("player_idle");
    let hurt = atlas.sprite("player_hurt");
    let player_id = scene.spawn(
        SceneEntity::new("Player", [0.0, 2.0, 0.0]).with_sprite(idle, [1.0, 1.0, 1.0, 1.0]),
    );
    scene.animate(player_id, |t| {
        t.delay(0.5)?
            .set_sprite(hurt)?
            .set_color([1.0, 0.2, 0.2, 1.0], 0.25)?
            .set_color([1.0, 1.0, 1.0, 1.0], 0.25)?
            .set_sprite(idle)
    })?;

    let drone_id = scene.spawn(SceneEntity::new("Drone", [0.0, 5.0, 0.0]));
    scene.animate(drone_id, |t| {
        t.move_by([1.0, 0.0, 0.5], 2.0)?
            .delay(0.5)?
            .move_to([0.0, 5.0, 0.0], 1.0)
    })?;

    let delta = config.frame_delta();
    for frame in 0..config.frames {
        scene.update(delta);
        if scene.is_settled() {
            tracing::info!("All timelines finished after {} frames", frame + 1);
            break;
        }
    }

    if scene.entity(crate_id).is_none() {
        tracing::info!("Crate was destroyed");
    }
    tracing::info!(
        "{} entities and {} timelines remain",
        scene.entity_count(),
        scene.timeline_count()
    );

    for entity in scene.entities() {
        let entity = entity.borrow();
        let sprite = entity.sprite.and_then(|s| atlas.name_of(s)).unwrap_or("-");
        tracing::info!(
            "{}: position {:?}, color {:?}, sprite {}",
            entity.name,
            entity.position,
            entity.color,
            sprite
        );
    }

    Ok(())
}
