use serde::{Deserialize, Serialize};

/// Pointer/rotation state of a globe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationMode {
    #[default]
    AutoRotating,
    Dragging,
    /// Stopped after a drag; only the explicit toggle leaves this mode.
    ManualIdle,
}

/// Coarse mode exposed to the host UI (the Auto/Manual toggle label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    AutoRotating,
    ManualPaused,
}

impl RotationMode {
    #[must_use]
    pub const fn render_mode(self) -> RenderMode {
        match self {
            Self::AutoRotating => RenderMode::AutoRotating,
            Self::Dragging | Self::ManualIdle => RenderMode::ManualPaused,
        }
    }
}

/// Tuning for post-drag rotation inertia.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticRotationConfig {
    pub enabled: bool,
    /// Multiplicative velocity decay per second.
    pub decay_per_second: f64,
    /// Inertia stops once the angular speed drops below this, in degrees/second.
    pub stop_velocity_deg_per_sec: f64,
}

impl Default for KineticRotationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            decay_per_second: 0.05,
            stop_velocity_deg_per_sec: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct KineticRotationState {
    pub active: bool,
    /// `[lambda, phi]` velocity in degrees/second.
    pub velocity_deg_per_sec: [f64; 2],
}

impl KineticRotationState {
    #[must_use]
    pub fn speed(self) -> f64 {
        self.velocity_deg_per_sec[0].hypot(self.velocity_deg_per_sec[1])
    }
}

/// Drag bookkeeping and the rotation-mode state machine.
///
/// The state only tracks modes and velocities; it never touches the
/// projection itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    mode: RotationMode,
    kinetic_config: KineticRotationConfig,
    kinetic: KineticRotationState,
    pending_drag_delta: [f64; 2],
    drag_velocity_deg_per_sec: [f64; 2],
}

impl InteractionState {
    #[must_use]
    pub fn new(kinetic_config: KineticRotationConfig) -> Self {
        Self {
            kinetic_config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mode(self) -> RotationMode {
        self.mode
    }

    #[must_use]
    pub fn kinetic_config(self) -> KineticRotationConfig {
        self.kinetic_config
    }

    pub fn set_kinetic_config(&mut self, config: KineticRotationConfig) {
        self.kinetic_config = config;
        if !config.enabled {
            self.stop_kinetic();
        }
    }

    #[must_use]
    pub fn kinetic_state(self) -> KineticRotationState {
        self.kinetic
    }

    pub fn on_drag_start(&mut self) {
        self.mode = RotationMode::Dragging;
        self.pending_drag_delta = [0.0, 0.0];
        self.drag_velocity_deg_per_sec = [0.0, 0.0];
        self.stop_kinetic();
    }

    /// Records a rotation delta applied by a drag move.
    ///
    /// Returns `false` when no drag is in progress.
    pub fn on_drag_move(&mut self, delta_deg: [f64; 2]) -> bool {
        if self.mode != RotationMode::Dragging {
            return false;
        }
        self.pending_drag_delta[0] += delta_deg[0];
        self.pending_drag_delta[1] += delta_deg[1];
        true
    }

    /// Turns drag deltas recorded since the last sample into a velocity.
    pub fn sample_drag_velocity(&mut self, delta_seconds: f64) {
        if self.mode != RotationMode::Dragging || delta_seconds <= 0.0 {
            return;
        }
        self.drag_velocity_deg_per_sec = [
            self.pending_drag_delta[0] / delta_seconds,
            self.pending_drag_delta[1] / delta_seconds,
        ];
        self.pending_drag_delta = [0.0, 0.0];
    }

    /// Ends a drag. Returns `true` when inertia took over.
    pub fn on_drag_end(&mut self) -> bool {
        if self.mode != RotationMode::Dragging {
            return false;
        }
        self.mode = RotationMode::ManualIdle;
        let velocity = self.drag_velocity_deg_per_sec;
        self.pending_drag_delta = [0.0, 0.0];
        self.drag_velocity_deg_per_sec = [0.0, 0.0];

        let speed = velocity[0].hypot(velocity[1]);
        if self.kinetic_config.enabled && speed >= self.kinetic_config.stop_velocity_deg_per_sec {
            self.kinetic = KineticRotationState {
                active: true,
                velocity_deg_per_sec: velocity,
            };
            return true;
        }
        false
    }

    /// Flips between auto rotation and manual mode and returns the new mode.
    pub fn toggle_auto_rotate(&mut self) -> RotationMode {
        self.stop_kinetic();
        self.pending_drag_delta = [0.0, 0.0];
        self.mode = match self.mode {
            RotationMode::AutoRotating => RotationMode::ManualIdle,
            RotationMode::Dragging | RotationMode::ManualIdle => RotationMode::AutoRotating,
        };
        self.mode
    }

    pub fn stop_kinetic(&mut self) {
        self.kinetic = KineticRotationState::default();
    }

    /// Advances inertia and returns the rotation displacement to apply.
    ///
    /// Returns `None` when inertia is not active.
    pub fn step_kinetic(&mut self, delta_seconds: f64) -> Option<[f64; 2]> {
        if !self.kinetic.active || self.mode != RotationMode::ManualIdle {
            return None;
        }

        let [vx, vy] = self.kinetic.velocity_deg_per_sec;
        let displacement = [vx * delta_seconds, vy * delta_seconds];
        let decay = self.kinetic_config.decay_per_second.powf(delta_seconds);
        self.kinetic.velocity_deg_per_sec = [vx * decay, vy * decay];

        if self.kinetic.speed() < self.kinetic_config.stop_velocity_deg_per_sec {
            self.stop_kinetic();
        }

        Some(displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionState, KineticRotationConfig, RenderMode, RotationMode};

    #[test]
    fn manual_idle_only_leaves_through_toggle() {
        let mut state = InteractionState::default();
        assert_eq!(state.mode(), RotationMode::AutoRotating);

        state.on_drag_start();
        assert_eq!(state.mode().render_mode(), RenderMode::ManualPaused);
        assert!(!state.on_drag_end());
        assert_eq!(state.mode(), RotationMode::ManualIdle);
        assert!(!state.on_drag_end());

        assert_eq!(state.toggle_auto_rotate(), RotationMode::AutoRotating);
        assert_eq!(state.toggle_auto_rotate(), RotationMode::ManualIdle);
    }

    #[test]
    fn drag_moves_outside_a_drag_are_rejected() {
        let mut state = InteractionState::default();
        assert!(!state.on_drag_move([1.0, 0.0]));
    }

    #[test]
    fn inertia_decays_and_stops() {
        let mut state = InteractionState::new(KineticRotationConfig {
            enabled: true,
            ..KineticRotationConfig::default()
        });
        state.on_drag_start();
        assert!(state.on_drag_move([2.0, -1.0]));
        state.sample_drag_velocity(0.1);
        assert!(state.on_drag_end());
        assert!(state.kinetic_state().active);

        let first = state.step_kinetic(0.5).expect("inertia step");
        assert!((first[0] - 10.0).abs() < 1e-9);
        assert!((first[1] + 5.0).abs() < 1e-9);

        let mut steps = 0;
        while state.step_kinetic(0.5).is_some() {
            steps += 1;
            assert!(steps < 100, "inertia must settle");
        }
        assert!(!state.kinetic_state().active);
    }

    #[test]
    fn inertia_stays_off_when_disabled() {
        let mut state = InteractionState::default();
        state.on_drag_start();
        state.on_drag_move([5.0, 0.0]);
        state.sample_drag_velocity(0.016);
        assert!(!state.on_drag_end());
        assert_eq!(state.step_kinetic(0.016), None);
    }
}
