//! In-memory course reader.
//!
//! Holds courses, schedules and per-user enrollments in memory, providing fast,
//! deterministic reads for tests and local development. It can be seeded from
//! a JSON fixture file so the server can run without a chain endpoint.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::error::{ChainError, ChainResult, ErrorContext};
use super::reader::CourseReader;
use crate::models::{
    CertificateMinted, CourseId, CourseInfo, CourseProgress, CourseSchedule, MilestoneTimes,
    RewardStatus, TokenId, TokenMeta, UnixTimestamp, WalletAddress, MILESTONE_COUNT,
};

/// Buffered `CertificateMinted` events per subscriber.
const EVENT_CAPACITY: usize = 64;

/// One user's record for one course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default)]
    pub progress: CourseProgress,
    #[serde(default)]
    pub milestone_times: MilestoneTimes,
    #[serde(default)]
    pub reward: RewardStatus,
    #[serde(default)]
    pub certificate_token_id: TokenId,
}

/// Fixture file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    /// What `rewardToken()` returns; the zero address when absent.
    #[serde(default)]
    pub reward_token_address: Option<WalletAddress>,
    #[serde(default)]
    pub tokens: Vec<TokenFixture>,
    #[serde(default)]
    pub courses: Vec<CourseFixture>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentFixture>,
    #[serde(default)]
    pub token_uris: Vec<TokenUriFixture>,
}

/// An ERC-20 deployed at `address`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFixture {
    pub address: WalletAddress,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFixture {
    pub course: CourseInfo,
    #[serde(default)]
    pub schedule: Option<CourseSchedule>,
}

/// One enrollment; fields other than the key default to the contract's zero values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFixture {
    pub user: WalletAddress,
    pub course_id: CourseId,
    #[serde(default)]
    pub progress: CourseProgress,
    #[serde(default)]
    pub milestone_times: MilestoneTimes,
    #[serde(default)]
    pub reward: RewardStatus,
    #[serde(default)]
    pub certificate_token_id: TokenId,
}

impl From<EnrollmentFixture> for Enrollment {
    fn from(e: EnrollmentFixture) -> Self {
        Self {
            progress: e.progress,
            milestone_times: e.milestone_times,
            reward: e.reward,
            certificate_token_id: e.certificate_token_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUriFixture {
    pub token_id: TokenId,
    pub uri: String,
}

/// In-memory course reader.
///
/// # Example
/// ```
/// use course_gate::chain::LocalCourseReader;
/// use course_gate::models::{CourseId, CourseInfo, UnixTimestamp};
///
/// let reader = LocalCourseReader::new();
/// reader.insert_course(
///     CourseInfo {
///         id: CourseId::new(1),
///         title: "Blockchain Basics".to_string(),
///         description: String::new(),
///         milestones: ["A".to_string(), "B".to_string(), "C".to_string()],
///         created_at: UnixTimestamp::UNSET,
///     },
///     None,
/// );
/// assert_eq!(reader.course_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalCourseReader {
    data: Arc<RwLock<LocalData>>,
    events: broadcast::Sender<CertificateMinted>,
    token_address: Option<String>,
}

struct LocalData {
    courses: HashMap<CourseId, CourseInfo>,
    schedules: HashMap<CourseId, CourseSchedule>,
    enrollments: HashMap<(WalletAddress, CourseId), Enrollment>,
    token_uris: HashMap<TokenId, String>,
    reward_token_address: WalletAddress,
    tokens: HashMap<WalletAddress, TokenMeta>,
    next_token_id: u64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            courses: HashMap::new(),
            schedules: HashMap::new(),
            enrollments: HashMap::new(),
            token_uris: HashMap::new(),
            reward_token_address: WalletAddress::zero(),
            tokens: HashMap::new(),
            next_token_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalCourseReader {
    /// Create a new empty reader.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            events,
            token_address: None,
        }
    }

    /// Build a reader from parsed fixtures.
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        let reader = Self::new();
        {
            let mut data = reader.data.write();
            if let Some(address) = fixtures.reward_token_address {
                data.reward_token_address = address;
            }
            for t in fixtures.tokens {
                data.tokens.insert(
                    t.address,
                    TokenMeta {
                        symbol: t.symbol,
                        decimals: t.decimals,
                    },
                );
            }
            for CourseFixture { course, schedule } in fixtures.courses {
                if let Some(schedule) = schedule {
                    data.schedules.insert(course.id, schedule);
                }
                data.courses.insert(course.id, course);
            }
            for e in fixtures.enrollments {
                if !e.certificate_token_id.is_unset() {
                    data.next_token_id = data.next_token_id.max(e.certificate_token_id.value() + 1);
                }
                let key = (e.user.clone(), e.course_id);
                data.enrollments.insert(key, e.into());
            }
            for t in fixtures.token_uris {
                data.token_uris.insert(t.token_id, t.uri);
            }
        }
        reader
    }

    /// Load fixtures from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ChainResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ChainError::Configuration {
            message: format!("Failed to read fixtures: {}", e),
            context: ErrorContext::new("load_fixtures").with_details(path.display().to_string()),
        })?;
        let fixtures: Fixtures = serde_json::from_str(&content).map_err(|e| {
            ChainError::Configuration {
                message: format!("Failed to parse fixtures: {}", e),
                context: ErrorContext::new("load_fixtures")
                    .with_details(path.display().to_string()),
            }
        })?;
        log::info!(
            "Loaded {} courses and {} enrollments from {}",
            fixtures.courses.len(),
            fixtures.enrollments.len(),
            path.display()
        );
        Ok(Self::from_fixtures(fixtures))
    }

    /// Set the client-side token address used when `rewardToken()` is zero.
    pub fn with_token_address(mut self, address: Option<String>) -> Self {
        self.token_address = address;
        self
    }

    /// Add or replace a course and its schedule.
    pub fn insert_course(&self, course: CourseInfo, schedule: Option<CourseSchedule>) {
        let mut data = self.data.write();
        match schedule {
            Some(s) => {
                data.schedules.insert(course.id, s);
            }
            None => {
                data.schedules.remove(&course.id);
            }
        }
        data.courses.insert(course.id, course);
    }

    /// Deploy an ERC-20 at `address`.
    pub fn add_token(&self, address: &WalletAddress, meta: TokenMeta) {
        self.data.write().tokens.insert(address.clone(), meta);
    }

    /// Deploy an ERC-20 at `address` and make it the manager's reward token.
    pub fn set_reward_token(&self, address: &WalletAddress, meta: TokenMeta) {
        let mut data = self.data.write();
        data.tokens.insert(address.clone(), meta);
        data.reward_token_address = address.clone();
    }

    /// Add or replace a user's enrollment record.
    pub fn set_enrollment(&self, user: &WalletAddress, course: CourseId, enrollment: Enrollment) {
        self.data
            .write()
            .enrollments
            .insert((user.clone(), course), enrollment);
    }

    /// Register `user` for `course`, the way `registerForCourse` would.
    pub fn register(&self, user: &WalletAddress, course: CourseId) {
        let mut data = self.data.write();
        let entry = data
            .enrollments
            .entry((user.clone(), course))
            .or_default();
        entry.progress.registered = true;
    }

    /// Record milestone `index` as completed at `at`, the way `completeMilestone`
    /// would after its own checks. Completing the last milestone marks the course
    /// completed, mints a certificate token with the given URI and emits
    /// `CertificateMinted`.
    pub fn record_milestone(
        &self,
        user: &WalletAddress,
        course: CourseId,
        index: usize,
        at: UnixTimestamp,
        certificate_uri: Option<String>,
    ) -> ChainResult<()> {
        if index >= MILESTONE_COUNT {
            return Err(ChainError::call(format!("Invalid milestone index {}", index)));
        }
        let minted = {
            let mut guard = self.data.write();
            let data = &mut *guard;
            let entry = data
                .enrollments
                .get_mut(&(user.clone(), course))
                .filter(|e| e.progress.registered)
                .ok_or_else(|| ChainError::call("Not registered").with_operation("completeMilestone"))?;

            let mut times = *entry.milestone_times.as_array();
            times[index] = at;
            entry.milestone_times = MilestoneTimes::new(times);
            entry.progress.done[index] = true;
            entry.progress.completed_count =
                entry.progress.done.iter().filter(|d| **d).count() as u8;

            let mut minted = None;
            if usize::from(entry.progress.completed_count) == MILESTONE_COUNT {
                entry.progress.completed = true;
                if entry.certificate_token_id.is_unset() {
                    let token = TokenId::new(data.next_token_id);
                    data.next_token_id += 1;
                    entry.certificate_token_id = token;
                    if let Some(uri) = certificate_uri {
                        data.token_uris.insert(token, uri);
                    }
                    minted = Some(token);
                }
            }
            minted
        };

        if let Some(token_id) = minted {
            let event = CertificateMinted {
                user: user.clone(),
                course_id: course,
                token_id,
            };
            if self.events.send(event).is_err() {
                log::debug!("CertificateMinted for token {} had no subscribers", token_id);
            }
        }
        Ok(())
    }

    /// Mark the reader unhealthy (or healthy again).
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    pub fn course_count(&self) -> usize {
        self.data.read().courses.len()
    }

    fn ensure_healthy(&self, operation: &str) -> ChainResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(ChainError::connection("Local reader is offline").with_operation(operation))
        }
    }

    fn ensure_course(&self, course: CourseId, operation: &str) -> ChainResult<()> {
        self.ensure_healthy(operation)?;
        if self.data.read().courses.contains_key(&course) {
            Ok(())
        } else {
            Err(ChainError::not_found_with_context(
                format!("Course {} does not exist", course),
                ErrorContext::new(operation)
                    .with_entity("course")
                    .with_entity_id(course),
            ))
        }
    }

    fn enrollment(&self, user: &WalletAddress, course: CourseId) -> Enrollment {
        self.data
            .read()
            .enrollments
            .get(&(user.clone(), course))
            .cloned()
            .unwrap_or_default()
    }

    fn courses_where(&self, user: &WalletAddress, pred: impl Fn(&Enrollment) -> bool) -> Vec<CourseId> {
        let data = self.data.read();
        let mut ids: Vec<CourseId> = data
            .enrollments
            .iter()
            .filter(|((u, _), e)| u == user && pred(e))
            .map(|((_, c), _)| *c)
            .collect();
        ids.sort();
        ids
    }
}

impl Default for LocalCourseReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseReader for LocalCourseReader {
    async fn health_check(&self) -> ChainResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_course(&self, course: CourseId) -> ChainResult<CourseInfo> {
        self.ensure_course(course, "getCourse")?;
        self.data
            .read()
            .courses
            .get(&course)
            .cloned()
            .ok_or_else(|| ChainError::not_found(format!("Course {} does not exist", course)))
    }

    async fn get_course_progress(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<CourseProgress> {
        self.ensure_course(course, "getMyCourseProgress")?;
        Ok(self.enrollment(user, course).progress)
    }

    async fn get_course_schedule(&self, course: CourseId) -> ChainResult<Option<CourseSchedule>> {
        self.ensure_course(course, "getCourseSchedule")?;
        Ok(self.data.read().schedules.get(&course).copied())
    }

    async fn get_milestone_times(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<MilestoneTimes> {
        self.ensure_course(course, "getMyMilestoneTimes")?;
        Ok(self.enrollment(user, course).milestone_times)
    }

    async fn get_reward_status(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<RewardStatus> {
        self.ensure_course(course, "getMyRewardStatus")?;
        Ok(self.enrollment(user, course).reward)
    }

    async fn reward_token_address(&self) -> ChainResult<WalletAddress> {
        self.ensure_healthy("rewardToken")?;
        Ok(self.data.read().reward_token_address.clone())
    }

    async fn token_meta(&self, token: &WalletAddress) -> ChainResult<TokenMeta> {
        self.ensure_healthy("symbol")?;
        self.data.read().tokens.get(token).cloned().ok_or_else(|| {
            ChainError::not_found_with_context(
                format!("No token deployed at {}", token),
                ErrorContext::new("symbol")
                    .with_entity("token")
                    .with_entity_id(token),
            )
        })
    }

    fn configured_token_address(&self) -> Option<&str> {
        self.token_address.as_deref()
    }

    async fn certificate_token_id(
        &self,
        user: &WalletAddress,
        course: CourseId,
    ) -> ChainResult<TokenId> {
        self.ensure_course(course, "certificateTokenId")?;
        Ok(self.enrollment(user, course).certificate_token_id)
    }

    async fn token_uri(&self, token: TokenId) -> ChainResult<String> {
        self.ensure_healthy("tokenURI")?;
        self.data.read().token_uris.get(&token).cloned().ok_or_else(|| {
            ChainError::not_found_with_context(
                format!("Token {} has no URI", token),
                ErrorContext::new("tokenURI")
                    .with_entity("certificate")
                    .with_entity_id(token),
            )
        })
    }

    async fn registered_courses(&self, user: &WalletAddress) -> ChainResult<Vec<CourseId>> {
        self.ensure_healthy("getMyRegisteredCourses")?;
        Ok(self.courses_where(user, |e| e.progress.registered))
    }

    async fn completed_courses(&self, user: &WalletAddress) -> ChainResult<Vec<CourseId>> {
        self.ensure_healthy("getMyCompletedCourses")?;
        Ok(self.courses_where(user, |e| e.progress.completed))
    }

    async fn list_courses(&self) -> ChainResult<Vec<CourseInfo>> {
        self.ensure_healthy("getCourse")?;
        let mut courses: Vec<CourseInfo> = self.data.read().courses.values().cloned().collect();
        courses.sort_by_key(|c| c.id);
        Ok(courses)
    }

    fn subscribe_certificates(&self) -> broadcast::Receiver<CertificateMinted> {
        self.events.subscribe()
    }
}
