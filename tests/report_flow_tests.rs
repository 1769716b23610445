use std::cell::Cell;

use culinary_atlas::globe::{FrameScheduler, ManualScheduler};
use culinary_atlas::narrative::{NarrativeBackend, NarrativeRequest, fetch_food_history};
use culinary_atlas::shell::{
    AppStatus, CompleteOutcome, PresentationShell, ReportView, SubmitOutcome, TimelineKind,
};
use culinary_atlas::{AtlasConfig, AtlasError, AtlasResult};

const SOURDOUGH: &str = include_str!("fixtures/sourdough_report.json");

struct FakeBackend {
    reply: String,
    calls: Cell<usize>,
}

impl FakeBackend {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: Cell::new(0),
        }
    }
}

impl NarrativeBackend for FakeBackend {
    fn generate(&self, request: &NarrativeRequest) -> AtlasResult<Option<String>> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(request.response_mime_type, "application/json");
        assert!(request.response_schema["required"].is_array());
        Ok(Some(self.reply.clone()))
    }
}

#[test]
fn sourdough_query_reaches_success_and_builds_every_section() {
    let backend = FakeBackend::new(SOURDOUGH);
    let mut shell = PresentationShell::new(true);
    assert_eq!(shell.status(), AppStatus::Idle);

    let SubmitOutcome::Started(ticket) = shell.submit("Sourdough") else {
        panic!("query should start");
    };
    assert_eq!(shell.status(), AppStatus::Loading);
    let result = fetch_food_history(&backend, &ticket.query);
    assert_eq!(shell.complete(&ticket, result), CompleteOutcome::Applied);
    assert_eq!(shell.status(), AppStatus::Success);
    assert_eq!(backend.calls.get(), 1);

    let report = shell.report().expect("report");
    let scheduler = ManualScheduler::new();
    let view = ReportView::build(report, &AtlasConfig::default(), scheduler.clone())
        .expect("view");

    assert_eq!(view.food_name, "Sourdough");
    let insights: Vec<(&str, &str)> = view
        .key_insights
        .iter()
        .map(|k| (k.label, k.value.as_str()))
        .collect();
    assert_eq!(
        insights,
        [
            ("Origin Era", "c. 1500 BCE"),
            ("Main Root", "Ancient Egypt"),
            ("Cultural Soul", "San Francisco"),
            ("Global Reach", "3 Major Hubs"),
        ]
    );
    assert_eq!(view.cultural_insights.len(), 1);
    assert_eq!(view.timeline.len(), 4);
    assert_eq!(view.timeline[0].kind, TimelineKind::Genesis);
    assert_eq!(view.timeline[3].when, "1849");
    assert_eq!(view.regional_variations[0].key_difference, "Stiff levain and long cold proof.");

    let ranking: Vec<&str> = view.stats.hub_ranking.iter().map(|h| h.country.as_str()).collect();
    assert_eq!(ranking, ["Germany", "USA", "France"]);
    assert_eq!(view.stats.share.segments().len(), 3);
    assert_eq!(view.stats.ingredient_shifts[0].modern, "Bread wheat");
    assert_eq!(view.stats.radar.values(), [2.0, 6.0, 0.0, 9.0, 1.0]);
    view.stats.radar.build_frame().expect("radar frame");
    view.stats.share.build_frame().expect("share frame");

    assert_eq!(view.globe.geography().milestones.len(), 3);
    assert_eq!(view.globe.marker_placements().len(), 4);
    view.globe.build_frame().expect("globe frame");
    assert_eq!(scheduler.active_count(), 1);
    drop(view);
    assert_eq!(scheduler.active_count(), 0);
}

#[test]
fn missing_field_fails_the_request() {
    // Misspelt key: the required `flavorProfile` is absent.
    let backend = FakeBackend::new(SOURDOUGH.replacen("\"flavorProfile\"", "\"flavourProfile\"", 1));
    let mut shell = PresentationShell::new(true);
    assert_eq!(shell.run_query(&backend, "Sourdough"), AppStatus::Error);
    assert!(shell.report().is_none());
    let message = shell.error_message().expect("message");
    assert!(message.contains("schema"), "{message}");

    let err = fetch_food_history(&backend, "Sourdough").expect_err("mismatch");
    assert!(matches!(err, AtlasError::SchemaMismatch(_)));
}

#[test]
fn non_json_text_is_a_parse_failure() {
    let backend = FakeBackend::new("Sorry, I can't help with that.");
    let err = fetch_food_history(&backend, "Sourdough").expect_err("parse");
    assert!(matches!(err, AtlasError::Parse(_)));
}

#[test]
fn stale_response_does_not_overwrite_the_newer_query() {
    let backend = FakeBackend::new(SOURDOUGH);
    let mut shell = PresentationShell::new(true);
    let SubmitOutcome::Started(first) = shell.submit("Sourdough") else {
        panic!("first");
    };
    let SubmitOutcome::Started(second) = shell.submit("Paella") else {
        panic!("second");
    };

    let late = fetch_food_history(&backend, &first.query);
    assert_eq!(shell.complete(&first, late), CompleteOutcome::Stale);
    assert_eq!(shell.status(), AppStatus::Loading);
    assert!(shell.report().is_none());

    assert_eq!(
        shell.complete(&second, Err(AtlasError::EmptyResponse)),
        CompleteOutcome::Applied
    );
    assert_eq!(shell.status(), AppStatus::Error);
    assert!(shell.dismiss_error());
    assert_eq!(shell.status(), AppStatus::Idle);
}

#[test]
fn shell_without_credential_warns_and_blocks() {
    let config = AtlasConfig::default().with_api_key(None);
    let mut shell = PresentationShell::from_config(&config);
    assert_eq!(shell.warnings().len(), 1);
    assert_eq!(shell.warnings()[0].to_string(), "API_KEY Missing");
    let backend = FakeBackend::new(SOURDOUGH);
    assert_eq!(shell.run_query(&backend, "Sourdough"), AppStatus::Error);
    assert_eq!(backend.calls.get(), 0);
}
