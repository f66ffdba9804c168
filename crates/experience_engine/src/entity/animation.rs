//! Animation actions and the crossfade mixer
//!
//! Pose sampling belongs to the renderer; the mixer owns what the renderer
//! needs from the core: which actions run, their clocks, and their blend
//! weights.

use crate::assets::AnimationClip;
use crate::foundation::math::utils::{lerp, smoothstep};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefixes stripped from authored clip names, tried in this order
const CLIP_PREFIXES: [&str; 3] = ["animation_", "anim_", "clip_"];

/// Fades whose accumulated time lands this close to the duration complete
const FADE_EPSILON: f64 = 1e-4;

/// Completion tolerance per second of fade, for long ramps
const FADE_RELATIVE_EPSILON: f64 = 1e-5;

/// Normalize an authored clip name to its registry key
///
/// Strips one case-insensitive `animation_`/`anim_`/`clip_` prefix, drops
/// everything from the first `|`, lowercases and trims.
pub fn normalize_animation_name(name: &str) -> String {
    let mut rest = name;
    for prefix in CLIP_PREFIXES {
        if let Some(head) = name.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                rest = &name[prefix.len()..];
                break;
            }
        }
    }
    if let Some(pipe) = rest.find('|') {
        rest = &rest[..pipe];
    }
    rest.to_lowercase().trim().to_string()
}

/// Capitalize the first character for display
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Weight curve applied over a crossfade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Constant-rate ramp
    #[default]
    Linear,
    /// Ease in and out
    SmoothStep,
}

impl FadeCurve {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t.clamp(0.0, 1.0),
            Self::SmoothStep => smoothstep(t),
        }
    }
}

/// Outcome of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A crossfade (or immediate switch) started
    Started,
    /// The requested action was already current
    AlreadyCurrent,
    /// No action is registered under the name
    Unknown,
    /// The entity has no animation clips
    NoAnimations,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct WeightRamp {
    from: f32,
    to: f32,
    // f64 so long fades summed from frame deltas still land on the duration
    elapsed: f64,
    duration: f64,
}

impl WeightRamp {
    fn is_complete(&self) -> bool {
        let tolerance = FADE_EPSILON.max(self.duration * FADE_RELATIVE_EPSILON);
        self.elapsed >= self.duration - tolerance
    }

    fn progress(&self) -> f32 {
        (self.elapsed / self.duration) as f32
    }
}

/// One named, loopable motion clip bound to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAction {
    name: String,
    clip: AnimationClip,
    time: f32,
    weight: f32,
    running: bool,
    looping: bool,
    ramp: Option<WeightRamp>,
}

impl AnimationAction {
    fn new(name: String, clip: AnimationClip) -> Self {
        Self {
            name,
            clip,
            time: 0.0,
            weight: 0.0,
            running: false,
            looping: true,
            ramp: None,
        }
    }

    /// Normalized name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying clip
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Local clock in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current blend weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Whether the action is playing
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a weight ramp is in progress
    pub fn is_fading(&self) -> bool {
        self.ramp.is_some()
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.weight = 1.0;
        self.ramp = None;
    }

    fn play(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.weight = 0.0;
        self.ramp = None;
    }

    fn fade_to(&mut self, to: f32, duration: f32) {
        self.ramp = Some(WeightRamp {
            from: self.weight,
            to,
            elapsed: 0.0,
            duration: f64::from(duration),
        });
    }

    fn advance(&mut self, delta: f32, curve: FadeCurve) {
        if !self.running {
            return;
        }

        let duration = self.clip.duration;
        self.time += delta;
        if duration > 0.0 {
            self.time = if self.looping {
                self.time.rem_euclid(duration)
            } else {
                self.time.min(duration)
            };
        }

        let Some(mut ramp) = self.ramp else {
            return;
        };
        ramp.elapsed += f64::from(delta);
        if ramp.is_complete() {
            self.weight = ramp.to;
            self.ramp = None;
            if ramp.to <= 0.0 {
                self.stop();
            }
        } else {
            self.weight = lerp(ramp.from, ramp.to, curve.apply(ramp.progress()));
            self.ramp = Some(ramp);
        }
    }
}

/// Registry of actions keyed by normalized name, with one current action
#[derive(Debug, Clone, Default)]
pub struct AnimationMixer {
    actions: HashMap<String, AnimationAction>,
    names: Vec<String>,
    current: Option<String>,
    curve: FadeCurve,
}

impl AnimationMixer {
    /// Register every clip under its normalized name
    ///
    /// Clips that normalize to the same name collide; the last one wins.
    pub fn new(clips: &[AnimationClip], curve: FadeCurve) -> Self {
        let mut mixer = Self {
            curve,
            ..Self::default()
        };
        for clip in clips {
            let name = normalize_animation_name(&clip.name);
            let action = AnimationAction::new(name.clone(), clip.clone());
            if mixer.actions.insert(name.clone(), action).is_some() {
                log::warn!("Animation clip '{}' collides with an earlier clip named '{}'; last one wins", clip.name, name);
            } else {
                mixer.names.push(name);
            }
        }
        mixer
    }

    /// Whether no clips are registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the current action
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Look up an action
    pub fn action(&self, name: &str) -> Option<&AnimationAction> {
        self.actions.get(name)
    }

    /// Make `name` current at full weight without a fade
    pub fn start(&mut self, name: &str) -> bool {
        let Some(action) = self.actions.get_mut(name) else {
            return false;
        };
        action.reset();
        action.play();
        self.current = Some(name.to_string());
        true
    }

    /// Crossfade from the current action to `name` over `fade_duration` seconds
    ///
    /// `name` is case-folded. The current pointer moves immediately.
    pub fn transition_to(&mut self, name: &str, fade_duration: f32) -> Transition {
        if self.is_empty() {
            return Transition::NoAnimations;
        }
        let key = name.to_lowercase();
        if !self.actions.contains_key(&key) {
            return Transition::Unknown;
        }
        if self.current.as_deref() == Some(key.as_str()) {
            return Transition::AlreadyCurrent;
        }

        let fade = if fade_duration.is_finite() { fade_duration.max(0.0) } else { 0.0 };
        let previous = self.current.replace(key.clone());

        if let Some(outgoing) = previous.as_deref().and_then(|prev| self.actions.get_mut(prev)) {
            if fade > 0.0 {
                outgoing.fade_to(0.0, fade);
            } else {
                outgoing.stop();
            }
        }

        if let Some(incoming) = self.actions.get_mut(&key) {
            incoming.reset();
            incoming.play();
            if previous.is_some() && fade > 0.0 {
                incoming.weight = 0.0;
                incoming.fade_to(1.0, fade);
            }
        }
        Transition::Started
    }

    /// Advance every running action's clock and weight ramp
    pub fn update(&mut self, delta_seconds: f32) {
        let curve = self.curve;
        for action in self.actions.values_mut() {
            action.advance(delta_seconds, curve);
        }
    }

    /// Stop every action; the current pointer is kept
    pub fn stop_all(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Blend weights of running actions, in registration order
    pub fn weights(&self) -> Vec<(&str, f32)> {
        self.names
            .iter()
            .filter_map(|name| self.actions.get(name))
            .filter(|action| action.running)
            .map(|action| (action.name.as_str(), action.weight))
            .collect()
    }
}
