use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    GeoPoint, GreatCircle, OrthographicProjection, ScreenPoint, Transition, normalize_longitude,
};
use crate::error::AtlasResult;
use crate::globe::markers::{self, MarkerPlacement};
use crate::globe::scheduler::{FrameScheduler, TimerId};
use crate::globe::{GlobeConfig, GlobeGeography};
use crate::interaction::{InteractionState, KineticRotationState, RenderMode, RotationMode};
use crate::topology::{BoundarySource, CountryShape};

const IDLE_TIMER_NAME: &str = "globe-idle-spin";

/// Loading state of the country boundary dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryStatus {
    Loading,
    Ready,
    /// Load failed. The globe keeps showing its loading indicator.
    Failed,
}

/// The one driver currently allowed to write the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDriver {
    None,
    Intro,
    IdleSpin,
    Drag,
    Inertia,
}

/// Interactive orthographic globe for one report.
///
/// The host forwards pointer events and calls `advance` once per frame; the
/// renderer keeps projection state, marker placements and the idle timer
/// registration consistent across those calls.
#[derive(Debug)]
pub struct GlobeRenderer<S: FrameScheduler> {
    pub(super) config: GlobeConfig,
    pub(super) geography: GlobeGeography,
    pub(super) projection: OrthographicProjection,
    pub(super) graticule: Vec<Vec<GeoPoint>>,
    pub(super) countries: Vec<CountryShape>,
    pub(super) arc_paths: Vec<Vec<GeoPoint>>,
    pub(super) markers: Vec<MarkerPlacement>,
    pub(super) status: BoundaryStatus,
    interaction: InteractionState,
    driver: RotationDriver,
    intro: Option<Transition<2>>,
    intro_played: bool,
    scheduler: S,
    idle_timer: Option<TimerId>,
    disposed: bool,
}

impl<S: FrameScheduler> GlobeRenderer<S> {
    pub fn new(geography: GlobeGeography, config: GlobeConfig, scheduler: S) -> AtlasResult<Self> {
        config.validate()?;
        let (cx, cy) = config.viewport.center();
        let projection = OrthographicProjection::new(
            config.scale,
            ScreenPoint::new(cx, cy),
            config.initial_rotation,
        )?;
        let graticule = config.graticule.lines()?;
        let arc_paths = build_arc_paths(&geography, config.arc_sample_step_deg);
        let markers = markers::place_markers(&geography, &projection, &config);

        let mut renderer = Self {
            config,
            geography,
            projection,
            graticule,
            countries: Vec::new(),
            arc_paths,
            markers,
            status: BoundaryStatus::Loading,
            interaction: InteractionState::new(config.kinetic),
            driver: RotationDriver::None,
            intro: None,
            intro_played: false,
            scheduler,
            idle_timer: None,
            disposed: false,
        };
        renderer.start_idle_spin();
        Ok(renderer)
    }

    #[must_use]
    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    #[must_use]
    pub fn geography(&self) -> &GlobeGeography {
        &self.geography
    }

    #[must_use]
    pub fn rotation(&self) -> [f64; 2] {
        self.projection.rotation
    }

    #[must_use]
    pub fn projection(&self) -> &OrthographicProjection {
        &self.projection
    }

    #[must_use]
    pub fn rotation_mode(&self) -> RotationMode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        self.interaction.mode().render_mode()
    }

    #[must_use]
    pub fn driver(&self) -> RotationDriver {
        self.driver
    }

    #[must_use]
    pub fn kinetic_state(&self) -> KineticRotationState {
        self.interaction.kinetic_state()
    }

    #[must_use]
    pub fn boundary_status(&self) -> BoundaryStatus {
        self.status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == BoundaryStatus::Ready
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[must_use]
    pub fn countries(&self) -> &[CountryShape] {
        &self.countries
    }

    #[must_use]
    pub fn idle_timer(&self) -> Option<TimerId> {
        self.idle_timer
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Every marker, visible or not, origin first.
    #[must_use]
    pub fn marker_placements(&self) -> &[MarkerPlacement] {
        &self.markers
    }

    /// Visible marker under the pointer. Always `None` until boundaries load.
    #[must_use]
    pub fn marker_at(&self, x: f64, y: f64) -> Option<&MarkerPlacement> {
        if !self.is_ready() {
            return None;
        }
        markers::marker_at(&self.markers, x, y)
    }

    pub fn begin_boundary_load(&mut self) {
        if self.status != BoundaryStatus::Ready {
            self.status = BoundaryStatus::Loading;
            debug!("boundary dataset load started");
        }
    }

    /// Applies the outcome of the boundary load.
    ///
    /// Country polygons are built once; later successful loads are ignored.
    /// A failure keeps the globe in its loading state with no retry.
    pub fn complete_boundary_load(&mut self, result: AtlasResult<Vec<CountryShape>>) {
        if self.disposed {
            return;
        }
        if self.status == BoundaryStatus::Ready {
            trace!("boundary dataset already loaded; ignoring");
            return;
        }
        match result {
            Ok(countries) => {
                debug!(countries = countries.len(), "boundary dataset ready");
                self.countries = countries;
                self.status = BoundaryStatus::Ready;
                self.start_intro();
            }
            Err(err) => {
                warn!(error = %err, "boundary dataset failed to load; globe stays in loading state");
                self.status = BoundaryStatus::Failed;
            }
        }
    }

    pub fn load_boundaries_from(&mut self, source: &dyn BoundarySource) {
        self.begin_boundary_load();
        let result = source.load();
        self.complete_boundary_load(result);
    }

    pub fn drag_start(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_idle_spin();
        if self.intro.take().is_some() {
            debug!("drag cancelled the intro transition");
        }
        self.interaction.on_drag_start();
        self.set_driver(RotationDriver::Drag);
    }

    /// Rotates by a pointer delta in pixels. Ignored unless a drag is active.
    pub fn drag_move(&mut self, dx: f64, dy: f64) -> bool {
        if self.driver != RotationDriver::Drag || !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let k = self.config.drag_sensitivity / self.projection.scale;
        let delta = [dx * k, -dy * k];
        if !self.interaction.on_drag_move(delta) {
            return false;
        }
        let [lambda, phi] = self.projection.rotation;
        self.write_rotation(RotationDriver::Drag, [lambda + delta[0], phi + delta[1]])
    }

    pub fn drag_end(&mut self) {
        if self.driver != RotationDriver::Drag {
            return;
        }
        if self.interaction.on_drag_end() {
            self.set_driver(RotationDriver::Inertia);
        } else {
            self.set_driver(RotationDriver::None);
        }
    }

    /// Switches between auto rotation and manual mode.
    pub fn toggle_auto_rotate(&mut self) -> RenderMode {
        if self.disposed {
            return self.render_mode();
        }
        let mode = self.interaction.toggle_auto_rotate();
        debug!(?mode, "auto rotation toggled");
        match mode {
            RotationMode::AutoRotating => {
                if self.intro.is_none() {
                    self.start_idle_spin();
                }
            }
            RotationMode::ManualIdle | RotationMode::Dragging => {
                self.cancel_idle_spin();
                if self.intro.is_none() {
                    self.set_driver(RotationDriver::None);
                }
            }
        }
        mode.render_mode()
    }

    /// Advances the active driver by `delta_ms` of wall-clock time.
    ///
    /// Returns whether the rotation changed.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        if self.disposed || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return false;
        }
        let delta_seconds = delta_ms / 1000.0;
        match self.driver {
            RotationDriver::None => false,
            RotationDriver::Intro => self.advance_intro(delta_ms),
            RotationDriver::IdleSpin => {
                let ticking = self
                    .idle_timer
                    .is_some_and(|id| self.scheduler.is_active(id));
                if !ticking {
                    return false;
                }
                let [lambda, phi] = self.projection.rotation;
                let step = self.config.idle_spin_deg_per_sec * delta_seconds;
                self.write_rotation(RotationDriver::IdleSpin, [lambda + step, phi])
            }
            RotationDriver::Drag => {
                self.interaction.sample_drag_velocity(delta_seconds);
                false
            }
            RotationDriver::Inertia => match self.interaction.step_kinetic(delta_seconds) {
                Some([d_lambda, d_phi]) => {
                    let [lambda, phi] = self.projection.rotation;
                    self.write_rotation(RotationDriver::Inertia, [lambda + d_lambda, phi + d_phi])
                }
                None => {
                    self.set_driver(RotationDriver::None);
                    false
                }
            },
        }
    }

    /// Swaps in a new report's geography.
    ///
    /// Country polygons are kept; arcs and markers are rebuilt, the rotation
    /// resets and the intro plays again once boundaries are ready.
    pub fn replace_geography(&mut self, geography: GlobeGeography) -> AtlasResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.cancel_idle_spin();
        self.intro = None;
        self.intro_played = false;
        if self.interaction.mode() == RotationMode::Dragging {
            self.interaction.on_drag_end();
        }
        self.interaction.stop_kinetic();
        self.set_driver(RotationDriver::None);

        self.projection = OrthographicProjection::new(
            self.projection.scale,
            self.projection.translate,
            self.config.initial_rotation,
        )?;
        self.arc_paths = build_arc_paths(&geography, self.config.arc_sample_step_deg);
        self.geography = geography;
        self.markers = markers::place_markers(&self.geography, &self.projection, &self.config);

        if self.is_ready() {
            self.start_intro();
        } else {
            self.start_idle_spin();
        }
        Ok(())
    }

    /// Stops every driver and releases the idle timer.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_idle_spin();
        self.intro = None;
        self.interaction.stop_kinetic();
        self.driver = RotationDriver::None;
        self.disposed = true;
        debug!("globe disposed");
    }

    fn start_intro(&mut self) {
        if self.intro_played {
            return;
        }
        self.intro_played = true;
        if self.interaction.mode() == RotationMode::Dragging {
            debug!("intro skipped: drag in progress");
            return;
        }

        let [lambda, phi] = self.projection.rotation;
        let from = [normalize_longitude(lambda), phi];
        let origin = self.geography.origin;
        let target_lambda = -origin.lon;
        // Spin the short way round.
        let to = [
            from[0] + normalize_longitude(target_lambda - from[0]),
            -origin.lat + self.config.intro_lat_offset_deg,
        ];
        match Transition::new(
            from,
            to,
            self.config.intro_duration_ms,
            self.config.intro_easing,
        ) {
            Ok(transition) => {
                self.cancel_idle_spin();
                self.intro = Some(transition);
                self.set_driver(RotationDriver::Intro);
                self.write_rotation(RotationDriver::Intro, from);
            }
            Err(err) => warn!(error = %err, "intro transition rejected"),
        }
    }

    fn advance_intro(&mut self, delta_ms: f64) -> bool {
        let Some(intro) = self.intro.as_mut() else {
            self.set_driver(RotationDriver::None);
            return false;
        };
        let rotation = intro.advance(delta_ms);
        let finished = intro.is_finished();
        let changed = self.write_rotation(RotationDriver::Intro, rotation);
        if finished {
            self.intro = None;
            debug!("intro transition finished");
            if self.interaction.mode() == RotationMode::AutoRotating {
                self.start_idle_spin();
            } else {
                self.set_driver(RotationDriver::None);
            }
        }
        changed
    }

    /// Registers the idle timer if none is active and hands it the rotation.
    fn start_idle_spin(&mut self) {
        if self.disposed || self.interaction.mode() != RotationMode::AutoRotating {
            return;
        }
        let active = self
            .idle_timer
            .is_some_and(|id| self.scheduler.is_active(id));
        if !active {
            self.idle_timer = Some(self.scheduler.start_periodic(IDLE_TIMER_NAME));
        }
        self.set_driver(RotationDriver::IdleSpin);
    }

    fn cancel_idle_spin(&mut self) {
        if let Some(id) = self.idle_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.driver == RotationDriver::IdleSpin {
            self.driver = RotationDriver::None;
        }
    }

    fn set_driver(&mut self, driver: RotationDriver) {
        if self.driver != driver {
            trace!(from = ?self.driver, to = ?driver, "rotation driver changed");
            self.driver = driver;
        }
    }

    /// Only the current owner may move the globe.
    fn write_rotation(&mut self, writer: RotationDriver, rotation: [f64; 2]) -> bool {
        if self.driver != writer {
            trace!(?writer, owner = ?self.driver, "rotation write rejected");
            return false;
        }
        if !rotation[0].is_finite() || !rotation[1].is_finite() {
            return false;
        }
        if self.projection.rotation == rotation {
            return false;
        }
        self.projection.rotation = rotation;
        for marker in &mut self.markers {
            markers::update_marker(marker, &self.projection, &self.config);
        }
        true
    }
}

impl<S: FrameScheduler> Drop for GlobeRenderer<S> {
    fn drop(&mut self) {
        if let Some(id) = self.idle_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

fn build_arc_paths(geography: &GlobeGeography, step_deg: f64) -> Vec<Vec<GeoPoint>> {
    geography
        .route_legs()
        .into_iter()
        .map(|(from, to)| GreatCircle::new(from, to).sample(step_deg))
        .collect()
}
