use approx::assert_abs_diff_eq;
use culinary_atlas::core::GeoPoint;
use culinary_atlas::globe::{
    BoundaryStatus, FrameScheduler, GlobeConfig, GlobeGeography, GlobeRenderer, HubPoint,
    LOADING_LABEL, ManualScheduler, MarkerKind, RotationDriver,
};
use culinary_atlas::interaction::{KineticRotationConfig, RenderMode};
use culinary_atlas::render::SceneLayerKind;
use culinary_atlas::topology::{BoundarySource, StaticBoundarySource};
use culinary_atlas::{AtlasError, AtlasResult};

const MINI_ATLAS: &str = include_str!("fixtures/mini_atlas.topo.json");

struct FailingSource;

impl BoundarySource for FailingSource {
    fn load(&self) -> AtlasResult<Vec<culinary_atlas::topology::CountryShape>> {
        Err(AtlasError::BoundaryDatasetLoad("connection refused".to_owned()))
    }
}

fn geography() -> GlobeGeography {
    GlobeGeography::new(
        GeoPoint::unchecked(31.2, 30.0),
        vec![
            GeoPoint::unchecked(23.7, 38.0),
            GeoPoint::unchecked(2.35, 48.9),
        ],
        vec![HubPoint {
            point: GeoPoint::unchecked(10.4, 51.2),
            country: "Germany".to_owned(),
            percentage: 40.0,
        }],
    )
}

fn ready_globe(config: GlobeConfig, scheduler: ManualScheduler) -> GlobeRenderer<ManualScheduler> {
    let mut globe = GlobeRenderer::new(geography(), config, scheduler).expect("globe");
    let source = StaticBoundarySource::from_topojson(MINI_ATLAS, "countries").expect("atlas");
    globe.load_boundaries_from(&source);
    globe
}

#[test]
fn identical_state_renders_identical_frames() {
    let mut a = ready_globe(GlobeConfig::default(), ManualScheduler::new());
    let mut b = ready_globe(GlobeConfig::default(), ManualScheduler::new());
    for globe in [&mut a, &mut b] {
        globe.advance(800.0);
        globe.advance(2000.0);
        globe.advance(16.0);
    }
    assert_eq!(a.rotation(), b.rotation());
    assert_eq!(a.marker_placements(), b.marker_placements());
    assert_eq!(a.build_frame().expect("a"), b.build_frame().expect("b"));
    assert_eq!(a.build_frame().expect("again"), a.build_frame().expect("again"));
}

#[test]
fn intro_focuses_origin_then_idles() {
    let scheduler = ManualScheduler::new();
    let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
    assert_eq!(globe.boundary_status(), BoundaryStatus::Ready);
    assert_eq!(globe.driver(), RotationDriver::Intro);
    assert_eq!(scheduler.active_count(), 0);

    globe.advance(2500.0);
    let [lambda, phi] = globe.rotation();
    assert_abs_diff_eq!(lambda, -31.2, epsilon = 1e-9);
    assert_abs_diff_eq!(phi, -20.0, epsilon = 1e-9);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);
    assert_eq!(scheduler.active_count(), 1);

    let origin = globe
        .marker_placements()
        .iter()
        .find(|m| m.kind == MarkerKind::Origin)
        .expect("origin");
    assert!(origin.visible);
    assert_eq!(
        globe.marker_at(origin.point.x, origin.point.y).map(|m| m.kind),
        Some(MarkerKind::Origin)
    );
}

#[test]
fn idle_rotation_never_writes_during_a_drag() {
    let scheduler = ManualScheduler::new();
    let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
    globe.advance(3000.0);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);

    globe.drag_start();
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(globe.render_mode(), RenderMode::ManualPaused);
    let before = globe.rotation();
    for _ in 0..10 {
        assert!(!globe.advance(16.0));
    }
    assert_eq!(globe.rotation(), before);

    assert!(globe.drag_move(28.0, 0.0));
    let after = globe.rotation();
    assert_abs_diff_eq!(after[0] - before[0], 7.5, epsilon = 1e-9);
    globe.drag_end();

    // Manual mode stays paused until toggled back.
    assert!(!globe.advance(1000.0));
    assert_eq!(globe.rotation(), after);
    assert_eq!(globe.toggle_auto_rotate(), RenderMode::AutoRotating);
    assert_eq!(scheduler.active_count(), 1);
    assert!(globe.advance(1000.0));
}

#[test]
fn inertia_coasts_then_stops_when_enabled() {
    let config = GlobeConfig::default().with_kinetic(KineticRotationConfig {
        enabled: true,
        ..KineticRotationConfig::default()
    });
    let mut globe = ready_globe(config, ManualScheduler::new());
    globe.advance(3000.0);

    globe.drag_start();
    globe.drag_move(40.0, 0.0);
    globe.advance(16.0);
    globe.drag_end();
    assert_eq!(globe.driver(), RotationDriver::Inertia);

    let start = globe.rotation();
    assert!(globe.advance(16.0));
    assert!(globe.rotation()[0] > start[0]);
    for _ in 0..600 {
        globe.advance(16.0);
    }
    assert_eq!(globe.driver(), RotationDriver::None);
}

#[test]
fn failed_boundaries_keep_the_loading_indicator() {
    let mut globe =
        GlobeRenderer::new(geography(), GlobeConfig::default(), ManualScheduler::new())
            .expect("globe");
    globe.load_boundaries_from(&FailingSource);
    assert_eq!(globe.boundary_status(), BoundaryStatus::Failed);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);

    let frame = globe.build_layered_frame().expect("frame");
    let overlay = frame.layer(SceneLayerKind::Overlay).expect("overlay");
    assert_eq!(overlay.texts[0].text, LOADING_LABEL);
    assert!(frame.layer(SceneLayerKind::Geography).expect("geo").is_empty());
    assert!(globe.marker_at(400.0, 325.0).is_none());
}

#[test]
fn teardown_leaves_no_active_timers() {
    let scheduler = ManualScheduler::new();
    {
        let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
        globe.advance(3000.0);
        assert_eq!(scheduler.active_count(), 1);
    }
    assert_eq!(scheduler.active_count(), 0);

    let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
    globe.advance(3000.0);
    globe.dispose();
    assert_eq!(scheduler.active_count(), 0);
    assert!(!globe.advance(16.0));
    globe.toggle_auto_rotate();
    globe.toggle_auto_rotate();
    assert_eq!(scheduler.active_count(), 0);
    drop(globe);
    assert_eq!(scheduler.active_count(), 0);
    assert!(scheduler.active_names().is_empty());
}

#[test]
fn replacing_geography_replays_the_intro() {
    let scheduler = ManualScheduler::new();
    let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
    globe.advance(3000.0);

    let next = GlobeGeography::new(GeoPoint::unchecked(-0.38, 39.47), Vec::new(), Vec::new());
    globe.replace_geography(next).expect("replace");
    assert_eq!(globe.driver(), RotationDriver::Intro);
    assert_eq!(scheduler.active_count(), 0);
    globe.advance(2500.0);
    assert_abs_diff_eq!(globe.rotation()[0], 0.38, epsilon = 1e-9);
    assert_eq!(globe.marker_placements().len(), 1);
    assert_eq!(scheduler.active_count(), 1);
}

#[test]
fn toggling_during_a_drag_hands_rotation_to_the_idle_spin() {
    let scheduler = ManualScheduler::new();
    let mut globe = ready_globe(GlobeConfig::default(), scheduler.clone());
    globe.advance(3000.0);

    globe.drag_start();
    assert_eq!(globe.driver(), RotationDriver::Drag);
    assert!(globe.drag_move(20.0, 0.0));
    assert_eq!(scheduler.active_count(), 0);

    assert_eq!(globe.toggle_auto_rotate(), RenderMode::AutoRotating);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);
    assert_eq!(scheduler.active_count(), 1);

    // Pointer events from the abandoned drag no longer move the globe.
    let before = globe.rotation();
    assert!(!globe.drag_move(50.0, 10.0));
    globe.drag_end();
    assert_eq!(globe.rotation(), before);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);
    assert_eq!(scheduler.active_count(), 1);

    assert!(globe.advance(1000.0));
    let after = globe.rotation();
    assert_abs_diff_eq!(after[0] - before[0], 9.0, epsilon = 1e-9);
    assert_abs_diff_eq!(after[1], before[1], epsilon = 1e-12);
    assert!(scheduler.active_count() <= 1);
}

#[test]
fn boundaries_arriving_mid_drag_skip_the_intro() {
    let scheduler = ManualScheduler::new();
    let mut globe =
        GlobeRenderer::new(geography(), GlobeConfig::default(), scheduler.clone())
            .expect("globe");
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);
    assert_eq!(scheduler.active_count(), 1);

    globe.drag_start();
    assert_eq!(scheduler.active_count(), 0);
    assert!(globe.drag_move(0.0, -16.0));
    let dragged = globe.rotation();

    let source = StaticBoundarySource::from_topojson(MINI_ATLAS, "countries").expect("atlas");
    globe.load_boundaries_from(&source);
    assert_eq!(globe.boundary_status(), BoundaryStatus::Ready);
    assert_eq!(globe.driver(), RotationDriver::Drag);
    assert_eq!(globe.rotation(), dragged);
    assert!(scheduler.active_count() <= 1);

    globe.drag_end();
    assert_eq!(globe.driver(), RotationDriver::None);
    assert!(!globe.advance(2500.0));
    assert_eq!(globe.rotation(), dragged);
    assert_eq!(scheduler.active_count(), 0);

    // The intro does not replay once the user resumes auto rotation.
    assert_eq!(globe.toggle_auto_rotate(), RenderMode::AutoRotating);
    assert_eq!(globe.driver(), RotationDriver::IdleSpin);
    assert_eq!(scheduler.active_count(), 1);
    assert!(globe.advance(1000.0));
    assert_abs_diff_eq!(globe.rotation()[0] - dragged[0], 9.0, epsilon = 1e-9);
    assert_abs_diff_eq!(globe.rotation()[1], dragged[1], epsilon = 1e-12);
}
