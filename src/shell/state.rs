use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AtlasConfig;
use crate::error::{AtlasError, AtlasResult};
use crate::narrative::{FoodReport, NarrativeBackend, fetch_food_history};

pub const SUGGESTED_QUERIES: [&str; 4] = ["Sourdough", "Butter Chicken", "Paella", "Dumplings"];

const FALLBACK_ERROR: &str = "Failed to uncover the culinary past. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Handle for one in-flight query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub query: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank query; nothing changed.
    Ignored,
    /// No credential; the shell moved to `Error`.
    Blocked,
    Started(RequestTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
    Applied,
    /// A newer request was issued; the result was dropped.
    Stale,
}

/// Non-blocking conditions surfaced alongside the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellWarning {
    MissingCredential,
}

impl fmt::Display for ShellWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => f.write_str("API_KEY Missing"),
        }
    }
}

/// Query input and status state machine.
#[derive(Debug, Default)]
pub struct PresentationShell {
    has_credential: bool,
    status: AppStatus,
    report: Option<FoodReport>,
    error: Option<String>,
    last_issued: u64,
}

impl PresentationShell {
    #[must_use]
    pub fn new(has_credential: bool) -> Self {
        Self {
            has_credential,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_config(config: &AtlasConfig) -> Self {
        Self::new(config.has_credential())
    }

    #[must_use]
    pub fn status(&self) -> AppStatus {
        self.status
    }

    /// The displayed report; present only in `Success`.
    #[must_use]
    pub fn report(&self) -> Option<&FoodReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn latest_request_id(&self) -> Option<u64> {
        (self.last_issued > 0).then_some(self.last_issued)
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<ShellWarning> {
        if self.has_credential {
            Vec::new()
        } else {
            vec![ShellWarning::MissingCredential]
        }
    }

    pub fn submit(&mut self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !self.has_credential {
            warn!(query, "query blocked: no credential configured");
            self.fail(&AtlasError::MissingCredential);
            return SubmitOutcome::Blocked;
        }

        self.last_issued += 1;
        let ticket = RequestTicket {
            id: self.last_issued,
            query: query.to_owned(),
            requested_at: Utc::now(),
        };
        self.status = AppStatus::Loading;
        self.error = None;
        self.report = None;
        debug!(id = ticket.id, query, "query started");
        SubmitOutcome::Started(ticket)
    }

    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        result: AtlasResult<FoodReport>,
    ) -> CompleteOutcome {
        if ticket.id != self.last_issued {
            debug!(
                id = ticket.id,
                latest = self.last_issued,
                query = %ticket.query,
                "stale narrative response discarded"
            );
            return CompleteOutcome::Stale;
        }

        let elapsed_ms = (Utc::now() - ticket.requested_at).num_milliseconds();
        match result {
            Ok(report) => {
                debug!(id = ticket.id, elapsed_ms, food = %report.food_name, "query succeeded");
                self.report = Some(report);
                self.error = None;
                self.status = AppStatus::Success;
            }
            Err(err) => {
                warn!(id = ticket.id, elapsed_ms, %err, "query failed");
                self.fail(&err);
            }
        }
        CompleteOutcome::Applied
    }

    /// Leaves `Error` for `Idle`. Returns false in any other state.
    pub fn dismiss_error(&mut self) -> bool {
        if self.status != AppStatus::Error {
            return false;
        }
        self.status = AppStatus::Idle;
        self.error = None;
        true
    }

    /// Submits, fetches and completes in one blocking call.
    pub fn run_query<B>(&mut self, backend: &B, query: &str) -> AppStatus
    where
        B: NarrativeBackend + ?Sized,
    {
        if let SubmitOutcome::Started(ticket) = self.submit(query) {
            let result = fetch_food_history(backend, &ticket.query);
            self.complete(&ticket, result);
        }
        self.status
    }

    fn fail(&mut self, err: &AtlasError) {
        let message = err.to_string();
        self.error = Some(if message.is_empty() {
            FALLBACK_ERROR.to_owned()
        } else {
            message
        });
        self.report = None;
        self.status = AppStatus::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::{AppStatus, CompleteOutcome, PresentationShell, ShellWarning, SubmitOutcome};
    use crate::error::AtlasError;

    fn ticket(shell: &mut PresentationShell, query: &str) -> super::RequestTicket {
        match shell.submit(query) {
            SubmitOutcome::Started(ticket) => ticket,
            other => panic!("expected start, got {other:?}"),
        }
    }

    #[test]
    fn blank_queries_are_ignored() {
        let mut shell = PresentationShell::new(true);
        assert_eq!(shell.submit("   \t"), SubmitOutcome::Ignored);
        assert_eq!(shell.status(), AppStatus::Idle);
        assert_eq!(shell.latest_request_id(), None);
    }

    #[test]
    fn missing_credential_blocks_and_warns() {
        let mut shell = PresentationShell::new(false);
        assert_eq!(shell.warnings(), vec![ShellWarning::MissingCredential]);
        assert_eq!(shell.submit("Paella"), SubmitOutcome::Blocked);
        assert_eq!(shell.status(), AppStatus::Error);
        assert_eq!(shell.error_message(), Some("API key is not configured"));
        assert!(shell.dismiss_error());
        assert_eq!(shell.status(), AppStatus::Idle);
        assert!(!shell.dismiss_error());
    }

    #[test]
    fn ids_increase_and_old_tickets_are_stale() {
        let mut shell = PresentationShell::new(true);
        let first = ticket(&mut shell, "Paella");
        let second = ticket(&mut shell, " Dumplings ");
        assert!(second.id > first.id);
        assert_eq!(second.query, "Dumplings");

        let outcome = shell.complete(&first, Err(AtlasError::EmptyResponse));
        assert_eq!(outcome, CompleteOutcome::Stale);
        assert_eq!(shell.status(), AppStatus::Loading);

        let outcome = shell.complete(&second, Err(AtlasError::EmptyResponse));
        assert_eq!(outcome, CompleteOutcome::Applied);
        assert_eq!(shell.status(), AppStatus::Error);
        assert!(shell.report().is_none());
    }

    #[test]
    fn resubmitting_clears_the_previous_error() {
        let mut shell = PresentationShell::new(true);
        let first = ticket(&mut shell, "Paella");
        shell.complete(&first, Err(AtlasError::Parse("eof".to_owned())));
        assert!(shell.error_message().is_some());

        ticket(&mut shell, "Paella");
        assert_eq!(shell.status(), AppStatus::Loading);
        assert!(shell.error_message().is_none());
    }
}
