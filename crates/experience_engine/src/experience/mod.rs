//! The experience context object
//!
//! One [`Experience`] owns everything a running scene needs: clock, scene
//! graph, resources, audio, world entities, start screen, lifecycle
//! controller and, once resources are ready, the input router. It is built
//! once and passed explicitly; nothing is looked up globally.

mod lifecycle;
mod world;

pub use lifecycle::SceneLifecycleController;
pub use world::World;

use crate::assets::{AssetError, AssetLoader, ResourceTable};
use crate::audio::{AudioEngine, AudioError};
use crate::config::{ConfigError, ExperienceConfig};
use crate::context::Context;
use crate::events::{names, HandlerId};
use crate::foundation::time::Timer;
use crate::input::{InputRouter, Key};
use crate::scene::{SharedSceneGraph, SimpleSceneGraph};
use crate::state::{AppState, AppStateMachine, StateError};
use crate::ui::{MenuResponse, MenuUi, StartScreen};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// Errors surfacing at the application boundary
#[derive(thiserror::Error, Debug)]
pub enum ExperienceError {
    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Assets could not be read
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Audio failed
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Invalid state
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Running experience
#[derive(Debug)]
pub struct Experience {
    config: ExperienceConfig,
    timer: Timer,
    context: Context,
    world: World,
    start_screen: Rc<RefCell<StartScreen>>,
    lifecycle: SceneLifecycleController,
    router: Option<InputRouter>,
    ready_signal: Rc<Cell<bool>>,
    ready_handler: Option<HandlerId>,
    destroyed: bool,
}

impl Experience {
    /// Assemble an experience over `scene` and `audio`
    pub fn new(config: ExperienceConfig, scene: SharedSceneGraph, audio: AudioEngine) -> Self {
        let resources = Rc::new(ResourceTable::new(config.sources.clone()));
        let ready_signal = Rc::new(Cell::new(false));
        let signal = Rc::clone(&ready_signal);
        let ready_handler = resources.events().on(names::READY, move |_| signal.set(true));

        let start_screen = Rc::new(RefCell::new(StartScreen::new(
            config.title.clone(),
            config.menu.options.clone(),
            &config.menu.sounds,
            &audio,
        )));
        let menu: Rc<RefCell<dyn MenuUi>> = start_screen.clone();
        let lifecycle = SceneLifecycleController::new(AppStateMachine::new(Some(config.starting_state)), Rc::downgrade(&menu));

        log::info!("Experience '{}' created in state {}", config.title, config.starting_state);
        Self {
            context: Context::new(scene, resources, audio),
            config,
            timer: Timer::new(),
            world: World::default(),
            start_screen,
            lifecycle,
            router: None,
            ready_signal,
            ready_handler: Some(ready_handler),
            destroyed: false,
        }
    }

    /// In-memory scene and silent audio
    pub fn headless(config: ExperienceConfig) -> Self {
        Self::new(config, SimpleSceneGraph::new().into_shared(), AudioEngine::silent())
    }

    /// Load every source through `loader`
    ///
    /// When the last source arrives the world is built and input starts
    /// routing to it.
    pub fn load(&mut self, loader: &mut dyn AssetLoader) {
        self.context.resources.load_all(loader);
        self.poll_ready();
    }

    fn poll_ready(&mut self) {
        if self.destroyed || !self.ready_signal.take() {
            return;
        }
        self.world = World::build(
            &self.context,
            &self.config.entities,
            self.config.input_target.as_deref(),
            self.config.audio.default_volume,
        );
        self.router = Some(InputRouter::new(&self.config.bindings));
        self.lifecycle.resources_ready();
        log::info!("World built with {} entit(ies)", self.world.entities().len());
    }

    /// Advance by a fixed `delta_seconds`
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.destroyed {
            return;
        }
        let delta = self.timer.advance(delta_seconds);
        self.step(delta);
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn update(&mut self) {
        if self.destroyed {
            return;
        }
        let delta = self.timer.update();
        self.step(delta);
    }

    fn step(&mut self, delta: f32) {
        self.poll_ready();
        self.world.update(delta);
        self.context.audio.update();
    }

    /// Feed a key press
    ///
    /// A visible start screen takes the key first; otherwise the router
    /// applies it to the input target, if one exists yet.
    pub fn handle_key(&mut self, key: &Key) {
        if self.destroyed {
            return;
        }
        if self.start_screen.borrow().is_visible() {
            let response = self.start_screen.borrow_mut().handle_key(key);
            if let MenuResponse::Activated(event) = response {
                self.lifecycle.events().trigger(&event, &[]);
            }
            return;
        }
        if let Some(router) = &self.router {
            router.handle_key(key, self.world.input_target_mut());
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> Option<AppState> {
        self.lifecycle.state()
    }

    /// Lifecycle controller
    pub fn lifecycle(&self) -> &SceneLifecycleController {
        &self.lifecycle
    }

    /// Whether resources finished loading
    pub fn is_ready(&self) -> bool {
        self.context.resources.is_ready()
    }

    /// Shared services
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Live entities
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Live entities, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Start screen
    pub fn start_screen(&self) -> Ref<'_, StartScreen> {
        self.start_screen.borrow()
    }

    /// Frame clock
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Configuration in use
    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    /// Tear everything down; idempotent
    pub fn destroy(&mut self) {
        if let Some(router) = self.router.as_mut() {
            router.dispose();
        }
        self.lifecycle.dispose();
        if let Some(id) = self.ready_handler.take() {
            self.context.resources.events().off_handler(names::READY, id);
        }
        self.world.dispose();
        if !self.destroyed {
            log::info!("Experience destroyed after {} frame(s)", self.timer.frame_count());
        }
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AnimationClip, ModelResource, Resource, SourceDescriptor, SourceKind};
    use crate::config::EntityConfig;
    use crate::foundation::math::Vec3;
    use crate::input::NamedKey;
    use crate::scene::Aabb;

    struct FoxLoader;

    impl AssetLoader for FoxLoader {
        fn load(&mut self, source: &SourceDescriptor) -> Result<Resource, AssetError> {
            match source.kind {
                SourceKind::GltfModel => Ok(Resource::Model(ModelResource {
                    scene_name: "Fox".into(),
                    bounds: Aabb::new(Vec3::new(-10.0, 0.0, -40.0), Vec3::new(10.0, 60.0, 60.0)),
                    mesh_count: 1,
                    animations: vec![
                        AnimationClip::new("Survey", 3.4),
                        AnimationClip::new("Walk", 0.7),
                        AnimationClip::new("Run", 0.5),
                    ],
                })),
                _ => Err(AssetError::LoadFailed {
                    name: source.name.clone(),
                    reason: "unsupported".into(),
                }),
            }
        }
    }

    fn fox_config() -> ExperienceConfig {
        ExperienceConfig {
            sources: vec![SourceDescriptor {
                name: "foxModel".into(),
                kind: SourceKind::GltfModel,
                path: "models/Fox/glTF/Fox.gltf".into(),
            }],
            entities: vec![EntityConfig {
                resource_name: Some("foxModel".into()),
                name: "Fox".into(),
                ..EntityConfig::default()
            }],
            bindings: vec![crate::input::KeyBinding {
                keys: vec!["w".into()],
                command: crate::input::AnimationCommand::Play("walk".into()),
            }],
            ..ExperienceConfig::default()
        }
    }

    #[test]
    fn test_full_session() {
        crate::foundation::logging::init_for_tests();
        let mut experience = Experience::headless(fox_config());
        assert_eq!(experience.state(), Some(AppState::Loading));

        experience.handle_key(&Key::Character('w'));
        assert!(experience.world().is_empty());

        experience.load(&mut FoxLoader);
        assert!(experience.is_ready());
        assert_eq!(experience.state(), Some(AppState::Menu));
        assert_eq!(experience.world().entities().len(), 1);

        // menu has the keyboard until Continue
        experience.handle_key(&Key::Character('w'));
        assert_eq!(experience.world().entity("Fox").unwrap().current_animation(), Some("survey"));

        experience.handle_key(&Key::Named(NamedKey::Enter));
        assert_eq!(experience.state(), Some(AppState::Experience));
        assert!(!experience.start_screen().is_visible());

        experience.handle_key(&Key::Character('w'));
        for _ in 0..60 {
            experience.tick(1.0 / 60.0);
        }
        let fox = experience.world().entity("Fox").unwrap();
        assert_eq!(fox.current_animation(), Some("walk"));
        assert_eq!(fox.mixer().weights(), vec![("walk", 1.0)]);
        assert_eq!(experience.timer().frame_count(), 60);

        experience.destroy();
        experience.destroy();
        assert!(experience.world().is_empty());
        assert!(experience.context().scene.borrow().is_empty());
        assert!(!experience.lifecycle().is_attached());
    }

    #[test]
    fn test_failed_source_leaves_input_inert() {
        let mut config = fox_config();
        config.sources.push(SourceDescriptor {
            name: "grass".into(),
            kind: SourceKind::Texture,
            path: "textures/dirt/color.jpg".into(),
        });
        let mut experience = Experience::headless(config);
        experience.load(&mut FoxLoader);

        assert!(!experience.is_ready());
        assert_eq!(experience.state(), Some(AppState::Loading));
        experience.tick(0.016);
        assert!(experience.world().is_empty());
    }

    #[test]
    fn test_empty_sources_ready_immediately() {
        let mut experience = Experience::headless(ExperienceConfig::default());
        experience.load(&mut FoxLoader);
        assert!(experience.is_ready());
        assert_eq!(experience.state(), Some(AppState::Menu));
        experience.tick(0.016);
    }
}
