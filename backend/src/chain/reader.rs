//! Read-only view of the course contracts.
//!
//! Each method mirrors one view function of the course manager or certificate
//! contract, already decoded into crate types. Writes (register, complete a
//! milestone) stay with the wallet and are not part of this trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::error::ChainResult;
use crate::models::{
    CertificateMinted, CourseId, CourseInfo, CourseProgress, CourseSchedule, MilestoneTimes,
    RewardStatus, TokenId, TokenMeta, WalletAddress,
};

/// Contract reads used by the page snapshot services.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CourseReader: Send + Sync {
    /// Check whether the chain endpoint answers.
    async fn health_check(&self) -> ChainResult<bool>;

    /// `getCourse(courseId)`.
    ///
    /// # Returns
    /// * `Err(ChainError::NotFound)` - If no course has this id
    async fn get_course(&self, course: CourseId) -> ChainResult<CourseInfo>;

    /// `getMyCourseProgress(courseId)` as seen by `user`.
    async fn get_course_progress(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<CourseProgress>;

    /// `getCourseSchedule(courseId)`; `None` for a course created without one.
    async fn get_course_schedule(&self, course: CourseId) -> ChainResult<Option<CourseSchedule>>;

    /// `getMyMilestoneTimes(courseId)` as seen by `user`.
    async fn get_milestone_times(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<MilestoneTimes>;

    /// `getMyRewardStatus(courseId)` as seen by `user`.
    async fn get_reward_status(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<RewardStatus>;

    /// `rewardToken()`; the zero address when the manager has none set.
    async fn reward_token_address(&self) -> ChainResult<WalletAddress>;

    /// `symbol()` and `decimals()` of the ERC-20 at `token`.
    async fn token_meta(&self, token: &WalletAddress) -> ChainResult<TokenMeta>;

    /// Token address from the client configuration, used when the manager
    /// reports none. Not validated.
    fn configured_token_address(&self) -> Option<&str> {
        None
    }

    /// `certificateTokenId(user, courseId)`; unset when nothing was minted.
    async fn certificate_token_id(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<TokenId>;

    /// `tokenURI(tokenId)` of the certificate contract.
    async fn token_uri(&self, token: TokenId) -> ChainResult<String>;

    /// `getMyRegisteredCourses()` as seen by `user`.
    async fn registered_courses(&self, user: &WalletAddress) -> ChainResult<Vec<CourseId>>;

    /// `getMyCompletedCourses()` as seen by `user`.
    async fn completed_courses(&self, user: &WalletAddress) -> ChainResult<Vec<CourseId>>;

    /// Every course, ordered by id.
    async fn list_courses(&self) -> ChainResult<Vec<CourseInfo>>;

    /// A receiver of `CertificateMinted` events emitted from now on.
    fn subscribe_certificates(&self) -> broadcast::Receiver<CertificateMinted>;
}
