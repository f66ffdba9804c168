//! # Experience Engine
//!
//! Interaction and animation-state core for an interactive 3D experience.
//!
//! ## Features
//!
//! - **Lifecycle**: loading, menu and experience states behind a validating
//!   state machine and a synchronous event bus
//! - **Animated entities**: crossfading animation mixer keyed by normalized
//!   clip names
//! - **Inspection panels**: declarative panel items tracked in screen space
//!   through an invisible proxy
//! - **Sounds**: per-entity named sound registry over a pluggable audio backend
//! - **Input**: configurable key bindings routed to animation commands
//!
//! Rendering, asset decoding and audio mixing stay behind narrow traits
//! ([`scene::SceneGraph`], [`assets::AssetLoader`], [`audio::backend::AudioBackend`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use experience_engine::prelude::*;
//!
//! fn main() -> Result<(), ExperienceError> {
//!     experience_engine::foundation::logging::init();
//!     let config = ExperienceConfig::load_from_file("experience.toml")?;
//!     let mut experience = Experience::headless(config);
//!     experience.handle_key(&Key::Named(NamedKey::Enter));
//!     experience.tick(1.0 / 60.0);
//!     experience.destroy();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod context;
pub mod entity;
pub mod events;
pub mod experience;
pub mod foundation;
pub mod input;
pub mod scene;
pub mod state;
pub mod ui;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AnimationClip, AssetError, AssetLoader, ModelResource, Resource, ResourceTable, SourceDescriptor, SourceKind},
        audio::{AudioEngine, SoundHandle, SoundOptions},
        config::{Config, ConfigError, EntityConfig, ExperienceConfig},
        context::Context,
        entity::{AnimatedEntity, AnimatedEntityOptions, InteractiveEntity, PanelAction, PanelItemDescriptor, SceneEntity},
        events::{names, EventArg, EventBus},
        experience::{Experience, ExperienceError, SceneLifecycleController},
        foundation::{
            math::{Transform, Vec3},
            time::Timer,
        },
        input::{AnimationCommand, InputRouter, Key, NamedKey},
        scene::{Aabb, SceneGraph, SimpleSceneGraph},
        state::{AppState, AppStateMachine},
        ui::{MenuUi, StartScreen},
    };
}
