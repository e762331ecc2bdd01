//! Demo services registered by the bootstrap routine.

use parking_lot::Mutex;
use tracing::info;

/// Interface under which the audio backend is registered.
pub trait AudioService: Send + Sync {
    fn play(&self, cue: &str);
    fn played(&self) -> Vec<String>;
}

/// Anything advanced once per frame.
pub trait Tickable: Send + Sync {
    fn tick(&self, dt: f32);
}

#[derive(Debug, Default)]
pub struct AudioManager {
    played: Mutex<Vec<String>>,
}

impl AudioService for AudioManager {
    fn play(&self, cue: &str) {
        info!("Audio cue: {}", cue);
        self.played.lock().push(cue.to_string());
    }

    fn played(&self) -> Vec<String> {
        self.played.lock().clone()
    }
}

#[derive(Debug)]
pub struct SceneService {
    current: Mutex<String>,
}

impl SceneService {
    pub fn new(initial: &str) -> Self {
        Self {
            current: Mutex::new(initial.to_string()),
        }
    }

    pub fn load(&self, scene: &str) {
        info!("Loading scene {}", scene);
        *self.current.lock() = scene.to_string();
    }

    pub fn current(&self) -> String {
        self.current.lock().clone()
    }
}

/// Game clock, in seconds since startup.
#[derive(Debug, Default)]
pub struct TimeService {
    elapsed: Mutex<f32>,
}

impl TimeService {
    pub fn elapsed(&self) -> f32 {
        *self.elapsed.lock()
    }
}

impl Tickable for TimeService {
    fn tick(&self, dt: f32) {
        *self.elapsed.lock() += dt;
    }
}
