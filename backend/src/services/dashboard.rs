//! Dashboard snapshot: enrollment count and earned certificates.

use serde::Serialize;

use super::certificate::decode_token_uri;
use crate::chain::{ChainResult, CourseReader};
use crate::models::{CourseId, CourseInfo, TokenId, WalletAddress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateEntry {
    pub course_id: CourseId,
    pub token_id: TokenId,
    pub course_title: String,
    pub image: Option<String>,
    /// `Completed At` rendered as `YYYY/MM/DD HH:MM UTC`, empty when unknown.
    pub minted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub user: WalletAddress,
    pub registered_count: usize,
    pub certificates: Vec<CertificateEntry>,
}

/// Load the dashboard of `user`.
///
/// The course lists must be readable. Per-certificate reads are best-effort:
/// a missing title falls back to `Course #{id}` and unreadable metadata leaves
/// the image and date empty.
pub async fn load_dashboard(
    reader: &dyn CourseReader,
    user: &WalletAddress,
) -> ChainResult<DashboardSnapshot> {
    let registered = reader.registered_courses(user).await?;
    let completed = reader.completed_courses(user).await?;

    let mut certificates = Vec::new();
    for course_id in completed {
        let token_id = match reader.certificate_token_id(user, course_id).await {
            Ok(t) if !t.is_unset() => t,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("No certificate id for course {}: {}", course_id, e);
                continue;
            }
        };

        let course_title = match reader.get_course(course_id).await {
            Ok(c) if !c.title.is_empty() => c.title,
            Ok(_) => CourseInfo::fallback_title(course_id),
            Err(e) => {
                log::warn!("Course {} unreadable: {}", course_id, e);
                CourseInfo::fallback_title(course_id)
            }
        };

        let metadata = match reader.token_uri(token_id).await {
            Ok(uri) => decode_token_uri(&uri).unwrap_or_else(|e| {
                log::warn!("Bad metadata for token {}: {}", token_id, e);
                None
            }),
            Err(e) => {
                log::warn!("tokenURI failed for token {}: {}", token_id, e);
                None
            }
        };

        certificates.push(CertificateEntry {
            course_id,
            token_id,
            course_title,
            image: metadata.as_ref().and_then(|m| m.image.clone()),
            minted_at: metadata
                .and_then(|m| m.completed_at())
                .map(|t| t.format_utc())
                .unwrap_or_default(),
        });
    }

    log::info!(
        "Dashboard for {}: {} registered, {} certificates",
        user,
        registered.len(),
        certificates.len()
    );

    Ok(DashboardSnapshot {
        user: user.clone(),
        registered_count: registered.len(),
        certificates,
    })
}
