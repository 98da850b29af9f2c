//! Per-milestone card state for a course progress page.

use serde::{Deserialize, Serialize};

use crate::models::{CourseSchedule, EligibilityResult, UnixTimestamp, MILESTONE_COUNT};
use crate::services::countdown::countdown_label;

/// Reason shown on milestones past the next one.
pub const LOCKED_BY_ORDER: &str = "Complete earlier milestones first";
/// Reason shown on the next milestone when gating gave none.
pub const NOT_AVAILABLE_YET: &str = "Not available yet";

/// Button label of a milestone card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardAction {
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Locked")]
    Locked,
    #[serde(rename = "Complete Milestone")]
    CompleteMilestone,
}

impl CardAction {
    pub fn label(&self) -> &'static str {
        match self {
            CardAction::Completed => "Completed",
            CardAction::Locked => "Locked",
            CardAction::CompleteMilestone => "Complete Milestone",
        }
    }
}

/// View state of one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneCard {
    pub index: usize,
    pub title: String,
    pub completed: bool,
    pub is_next: bool,
    pub can_click: bool,
    pub action: CardAction,
    /// Lock explanation, with the countdown appended for the next milestone.
    pub locked_reason: Option<String>,
}

/// Banner describing the schedule when one is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBanner {
    /// 1-based number of the milestone to do next, capped at 3.
    pub next_milestone: usize,
    /// Deadline as `YYYY/MM/DD HH:MM UTC`, absent when there is none.
    pub deadline: Option<String>,
    pub message: Option<String>,
}

/// Everything a progress page shows about milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneBoard {
    pub cards: Vec<MilestoneCard>,
    pub banner: Option<ScheduleBanner>,
    pub completed_count: usize,
    pub percent_complete: f64,
    pub countdown: Option<String>,
}

fn with_countdown(reason: &str, countdown: Option<&str>) -> String {
    match countdown {
        Some(c) => format!("{} — Available in {}", reason, c),
        None => reason.to_string(),
    }
}

/// Build the card for milestone `index`.
pub fn build_card(
    index: usize,
    title: &str,
    done: bool,
    gating: &EligibilityResult,
    submitting: bool,
    countdown: Option<&str>,
) -> MilestoneCard {
    let is_next = index == gating.next_index;
    let locked_by_order = index > gating.next_index;
    let can_click = !done && !locked_by_order && gating.can_complete && is_next && !submitting;

    let locked_reason = if done {
        None
    } else if locked_by_order {
        Some(LOCKED_BY_ORDER.to_string())
    } else if is_next && !gating.can_complete {
        let reason = gating
            .locked_reason
            .map(|r| r.message())
            .unwrap_or(NOT_AVAILABLE_YET);
        Some(with_countdown(reason, countdown))
    } else {
        None
    };

    let action = if done {
        CardAction::Completed
    } else if can_click {
        CardAction::CompleteMilestone
    } else {
        CardAction::Locked
    };

    MilestoneCard {
        index,
        title: title.to_string(),
        completed: done,
        is_next,
        can_click,
        action,
        locked_reason,
    }
}

/// Build the whole board at `now`.
pub fn build_board(
    titles: &[String; MILESTONE_COUNT],
    done: &[bool; MILESTONE_COUNT],
    completed_count: usize,
    schedule: Option<&CourseSchedule>,
    gating: &EligibilityResult,
    submitting: bool,
    now: UnixTimestamp,
) -> MilestoneBoard {
    let countdown = countdown_label(gating.next_available_at, now);

    let cards = titles
        .iter()
        .zip(done.iter())
        .enumerate()
        .map(|(i, (title, d))| build_card(i, title, *d, gating, submitting, countdown.as_deref()))
        .collect();

    let banner = schedule.filter(|s| s.is_active()).map(|s| ScheduleBanner {
        next_milestone: (gating.next_index + 1).min(MILESTONE_COUNT),
        deadline: s.has_deadline().then(|| s.deadline.format_utc()),
        message: (!gating.can_complete)
            .then_some(gating.locked_reason)
            .flatten()
            .map(|r| with_countdown(r.message(), countdown.as_deref())),
    });

    let completed_count = completed_count.min(MILESTONE_COUNT);
    MilestoneBoard {
        cards,
        banner,
        completed_count,
        percent_complete: completed_count as f64 / MILESTONE_COUNT as f64 * 100.0,
        countdown,
    }
}
