//! Course progress page snapshot.
//!
//! Gathers every contract read the progress page needs, evaluates eligibility
//! once and returns a single serializable view.

use serde::Serialize;

use super::certificate::{decode_token_uri, download_file_name, CertificateMetadata};
use super::completion::{check_completion, CompletionError};
use super::eligibility::evaluate_at;
use super::milestone_board::{build_board, MilestoneBoard};
use super::reward::{pick_token_address, reward_view, RewardView};
use crate::chain::{ChainResult, CourseReader};
use crate::models::{
    CourseId, CourseInfo, CourseSchedule, EligibilityResult, EnrollmentStatus, TokenId,
    TokenMeta, UnixTimestamp, WalletAddress,
};

/// A decoded certificate ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub token_id: TokenId,
    pub metadata: CertificateMetadata,
    pub completed_at: Option<String>,
    pub download_file_name: String,
}

/// Everything the progress page of one course shows for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub course: CourseInfo,
    pub user: WalletAddress,
    pub status: EnrollmentStatus,
    pub schedule: Option<CourseSchedule>,
    pub eligibility: EligibilityResult,
    pub board: MilestoneBoard,
    pub reward: RewardView,
    pub certificate: Option<CertificateView>,
    pub evaluated_at: UnixTimestamp,
}

/// Load the progress page of `course` for `user` at `now`.
///
/// Course, progress, schedule and timestamp reads must succeed. Reward and
/// certificate reads fall back to defaults and log a warning on failure. The
/// certificate is looked up whatever the status; token id `0` means none.
pub async fn load_tracker(
    reader: &dyn CourseReader,
    user: &WalletAddress,
    course_id: CourseId,
    now: UnixTimestamp,
) -> ChainResult<TrackerSnapshot> {
    let course = reader.get_course(course_id).await?;
    let progress = reader.get_course_progress(user, course_id).await?;
    let schedule = reader.get_course_schedule(course_id).await?;
    let times = reader.get_milestone_times(user, course_id).await?;

    let status = progress.status();
    let eligibility = evaluate_at(schedule.as_ref(), &times, status, now);
    log::debug!(
        "Eligibility for {} on course {}: can_complete={}, next_index={}",
        user,
        course_id,
        eligibility.can_complete,
        eligibility.next_index
    );

    let board = build_board(
        &course.milestones,
        &progress.done,
        usize::from(progress.completed_count),
        schedule.as_ref(),
        &eligibility,
        false,
        now,
    );

    let reward = load_reward(reader, user, course_id, status).await;
    let certificate = load_certificate(reader, user, course_id).await;

    Ok(TrackerSnapshot {
        course,
        user: user.clone(),
        status,
        schedule,
        eligibility,
        board,
        reward,
        certificate,
        evaluated_at: now,
    })
}

/// Pre-check completing milestone `index` for `user` at `now`.
///
/// The outer result carries read failures, the inner one the refusal reason.
pub async fn precheck_milestone(
    reader: &dyn CourseReader,
    user: &WalletAddress,
    course_id: CourseId,
    index: i64,
    now: UnixTimestamp,
) -> ChainResult<Result<u8, CompletionError>> {
    let progress = reader.get_course_progress(user, course_id).await?;
    let schedule = reader.get_course_schedule(course_id).await?;
    let times = reader.get_milestone_times(user, course_id).await?;

    let status = progress.status();
    let gating = evaluate_at(schedule.as_ref(), &times, status, now);
    Ok(check_completion(index, status, &gating))
}

async fn load_reward(
    reader: &dyn CourseReader,
    user: &WalletAddress,
    course_id: CourseId,
    status: EnrollmentStatus,
) -> RewardView {
    let reward = match reader.get_reward_status(user, course_id).await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Reward status unavailable for course {}: {}", course_id, e);
            Default::default()
        }
    };
    let token = load_token_meta(reader).await;
    reward_view(&reward, &token, status)
}

/// Symbol and decimals of the reward token, EDU/18 when unresolvable.
pub async fn load_token_meta(reader: &dyn CourseReader) -> TokenMeta {
    let contract = match reader.reward_token_address().await {
        Ok(address) => Some(address),
        Err(e) => {
            log::warn!("rewardToken() failed: {}", e);
            None
        }
    };
    let picked = pick_token_address(contract.as_ref(), reader.configured_token_address());
    let Some(address) = picked else {
        log::debug!("No reward token address, using defaults");
        return TokenMeta::default();
    };
    match reader.token_meta(&address).await {
        Ok(meta) => meta,
        Err(e) => {
            log::warn!("Token {} lookup failed, using defaults: {}", address, e);
            TokenMeta::default()
        }
    }
}

async fn load_certificate(
    reader: &dyn CourseReader,
    user: &WalletAddress,
    course_id: CourseId,
) -> Option<CertificateView> {
    let token_id = match reader.certificate_token_id(user, course_id).await {
        Ok(t) if !t.is_unset() => t,
        Ok(_) => return None,
        Err(e) => {
            log::warn!("Certificate id lookup failed for course {}: {}", course_id, e);
            return None;
        }
    };
    let uri = match reader.token_uri(token_id).await {
        Ok(uri) => uri,
        Err(e) => {
            log::warn!("tokenURI failed for token {}: {}", token_id, e);
            return None;
        }
    };
    match decode_token_uri(&uri) {
        Ok(Some(metadata)) => Some(CertificateView {
            token_id,
            completed_at: metadata.completed_at().map(|t| t.format_utc()),
            metadata,
            download_file_name: download_file_name(course_id, token_id),
        }),
        Ok(None) => {
            log::debug!("Token {} has a non-inline URI", token_id);
            None
        }
        Err(e) => {
            log::warn!("Certificate metadata for token {} is unreadable: {}", token_id, e);
            None
        }
    }
}
