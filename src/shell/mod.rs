//! Query status machine and composition of the report into display sections.

mod state;
mod view;

pub use state::{
    AppStatus, CompleteOutcome, PresentationShell, RequestTicket, SUGGESTED_QUERIES, ShellWarning,
    SubmitOutcome,
};
pub use view::{
    HubShare, KeyInsight, ReportView, StatsSection, TimelineEntry, TimelineKind, key_insights,
    timeline,
};
