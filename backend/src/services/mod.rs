//! Service layer.
//!
//! Pure evaluation and view-building functions, plus the async page snapshots
//! that compose them over a [`CourseReader`](crate::chain::CourseReader).

pub mod catalog;
pub mod certificate;
pub mod completion;
pub mod countdown;
pub mod dashboard;
pub mod eligibility;
pub mod milestone_board;
pub mod reward;
pub mod tracker;

pub use catalog::{
    card_action, group_by_status, load_catalog, parse_course_id, CatalogError, CourseAction,
    CourseCard, CourseSection, CourseSummary,
};
pub use certificate::{decode_token_uri, download_file_name, CertificateError, CertificateMetadata};
pub use completion::{check_completion, CompletionError};
pub use countdown::{countdown_label, format_hms, CountdownTicker};
pub use dashboard::{load_dashboard, DashboardSnapshot};
pub use eligibility::{evaluate, evaluate_at};
pub use milestone_board::{build_board, MilestoneBoard};
pub use reward::{format_units, pick_token_address, reward_view, RewardView};
pub use tracker::{load_token_meta, load_tracker, precheck_milestone, TrackerSnapshot};
