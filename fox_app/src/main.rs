//! Fox scene demo
//!
//! Boots a headless experience from `resources/experience.toml`, loads the
//! asset manifest, then replays a scripted keyboard session at the
//! configured frame rate and logs what the fox does.

mod manifest;

use experience_engine::prelude::*;
use manifest::ManifestLoader;
use std::path::PathBuf;

/// Seconds of simulated time
const SESSION_LENGTH: f32 = 8.0;

/// Key presses at given times (seconds)
const SCRIPT: &[(f32, &str)] = &[
    (0.5, "ArrowDown"),
    (0.75, "ArrowUp"),
    (1.0, "Enter"),
    (1.5, "w"),
    (3.0, "R"),
    (4.5, "1"),
    (5.0, "x"),
    (6.0, "2"),
    (7.0, "s"),
];

fn resource_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources").join(name)
}

fn main() -> Result<(), ExperienceError> {
    experience_engine::foundation::logging::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| resource_path("experience.toml"));
    log::info!("Loading configuration from {}", config_path.display());
    let config = ExperienceConfig::load_from_file(&config_path)?;

    let manifest_path = match &config.manifest {
        Some(path) if path.is_relative() => config_path.parent().map_or(path.clone(), |dir| dir.join(path)),
        Some(path) => path.clone(),
        None => resource_path("manifest.ron"),
    };
    let mut loader = ManifestLoader::from_file(&manifest_path)?;

    let audio = if config.audio.enabled {
        AudioEngine::platform_default()
    } else {
        AudioEngine::silent()
    };
    let frame_delta = config.frame_delta();
    let mut experience = Experience::new(config, SimpleSceneGraph::new().into_shared(), audio);
    experience.load(&mut loader);

    let frames = (SESSION_LENGTH / frame_delta).round() as u64;
    let mut script = SCRIPT.iter().peekable();
    for frame in 0..frames {
        let now = frame as f32 * frame_delta;
        while let Some((_, name)) = script.next_if(|(at, _)| *at <= now) {
            match name.parse::<Key>() {
                Ok(key) => {
                    log::info!("[{:>5.2}s] key {}", now, key);
                    experience.handle_key(&key);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        experience.tick(frame_delta);

        if frame % (1.0 / frame_delta).round().max(1.0) as u64 == 0 {
            report(&experience, now);
        }
    }

    experience.destroy();
    log::info!("Session finished");
    Ok(())
}

fn report(experience: &Experience, now: f32) {
    let state = experience.state().map_or("<unset>", AppState::as_str);
    for entity in experience.world().entities() {
        let weights: Vec<String> = entity
            .mixer()
            .weights()
            .iter()
            .map(|(name, weight)| format!("{name}={weight:.2}"))
            .collect();
        let screen = entity
            .interactive()
            .panel()
            .and_then(|panel| panel.screen_position)
            .map_or_else(|| "offscreen".to_string(), |p| format!("({:.0}, {:.0})", p.x, p.y));
        log::info!(
            "[{:>5.2}s] {} | {} current={} [{}] panel {}",
            now,
            state,
            entity.name(),
            entity.current_animation().unwrap_or("-"),
            weights.join(", "),
            screen
        );
    }
    if experience.world().is_empty() {
        log::info!("[{:>5.2}s] {} | waiting for resources", now, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_resources_build_the_fox() {
        let config = ExperienceConfig::load_from_file(resource_path("experience.toml")).unwrap();
        let mut loader = ManifestLoader::from_file(resource_path("manifest.ron")).unwrap();
        let mut experience = Experience::headless(config);
        experience.load(&mut loader);

        assert!(experience.is_ready());
        let fox = experience.world().entity("Fox Model").unwrap();
        assert_eq!(fox.animation_names(), &["idle", "walking", "running"]);
        assert_eq!(
            fox.interactive().panel().unwrap().item_names(),
            vec!["", "Animation", "", "Play Idle", "Play Walking", "Play Running", "Scale", "Bark"]
        );
    }

    #[test]
    fn test_script_keys_parse() {
        for (_, name) in SCRIPT {
            assert!(name.parse::<Key>().is_ok(), "{name}");
        }
    }
}
