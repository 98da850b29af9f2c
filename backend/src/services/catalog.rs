//! Course listing: id parsing, status sections and card actions.

use serde::{Deserialize, Serialize};

use crate::chain::{ChainResult, CourseReader};
use crate::models::{CourseId, EnrollmentStatus, WalletAddress, MILESTONE_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid course URL (missing course id).")]
    InvalidCourseId(String),
}

/// Parse a course id taken from a URL segment. Ids are positive integers.
pub fn parse_course_id(raw: &str) -> Result<CourseId, CatalogError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(CourseId::new)
        .ok_or_else(|| CatalogError::InvalidCourseId(raw.to_string()))
}

/// One course as listed for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub name: String,
    pub description: String,
    pub status: EnrollmentStatus,
}

impl CourseSummary {
    pub fn milestones(&self) -> usize {
        MILESTONE_COUNT
    }
}

/// A course card: the summary plus what the card offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseCard {
    #[serde(flatten)]
    pub course: CourseSummary,
    pub milestones: usize,
    pub action: CourseAction,
}

impl CourseCard {
    pub fn new(course: CourseSummary) -> Self {
        Self {
            milestones: course.milestones(),
            action: card_action(&course),
            course,
        }
    }
}

/// A titled group of courses sharing one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSection {
    pub title: &'static str,
    pub status: EnrollmentStatus,
    pub courses: Vec<CourseCard>,
}

const SECTIONS: [(&str, EnrollmentStatus); 3] = [
    ("Available Courses", EnrollmentStatus::NotRegistered),
    ("Registered Courses", EnrollmentStatus::Registered),
    ("Completed Courses", EnrollmentStatus::Completed),
];

/// Split courses into the three status sections, dropping empty ones.
pub fn group_by_status(courses: &[CourseSummary]) -> Vec<CourseSection> {
    SECTIONS
        .iter()
        .map(|(title, status)| CourseSection {
            title: *title,
            status: *status,
            courses: courses
                .iter()
                .filter(|c| c.status == *status)
                .cloned()
                .map(CourseCard::new)
                .collect(),
        })
        .filter(|section| !section.courses.is_empty())
        .collect()
}

/// What a course card offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CourseAction {
    /// Go to the milestone page.
    Continue { href: String },
    Register,
    /// Shown disabled.
    Completed,
}

pub fn card_action(course: &CourseSummary) -> CourseAction {
    match course.status {
        EnrollmentStatus::Registered => CourseAction::Continue {
            href: format!("/milestones/{}", course.id),
        },
        EnrollmentStatus::NotRegistered => CourseAction::Register,
        EnrollmentStatus::Completed => CourseAction::Completed,
    }
}

/// Load the course list of `user`, grouped by enrollment status.
pub async fn load_catalog(
    reader: &dyn CourseReader,
    user: &WalletAddress,
) -> ChainResult<Vec<CourseSection>> {
    let mut summaries = Vec::new();
    for course in reader.list_courses().await? {
        let progress = reader.get_course_progress(user, course.id).await?;
        summaries.push(CourseSummary {
            id: course.id,
            name: course.title,
            description: course.description,
            status: progress.status(),
        });
    }
    log::debug!("Catalog for {}: {} courses", user, summaries.len());
    Ok(group_by_status(&summaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: u64, status: EnrollmentStatus) -> CourseSummary {
        CourseSummary {
            id: CourseId::new(id),
            name: format!("Course {}", id),
            description: String::new(),
            status,
        }
    }

    #[test]
    fn test_parse_course_id() {
        assert_eq!(parse_course_id("12"), Ok(CourseId::new(12)));
        assert_eq!(parse_course_id(" 7 "), Ok(CourseId::new(7)));
        for bad in ["", "0", "-3", "abc", "1.5"] {
            let err = parse_course_id(bad).unwrap_err();
            assert_eq!(err.to_string(), "Invalid course URL (missing course id).");
        }
    }

    #[test]
    fn test_group_by_status_order_and_empty_sections() {
        let courses = vec![
            course(2, EnrollmentStatus::Registered),
            course(1, EnrollmentStatus::NotRegistered),
            course(5, EnrollmentStatus::Registered),
        ];
        let sections = group_by_status(&courses);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Available Courses");
        assert_eq!(sections[1].title, "Registered Courses");
        let ids: Vec<u64> = sections[1].courses.iter().map(|c| c.course.id.value()).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(sections[1].courses[0].milestones, 3);
        assert_eq!(
            sections[1].courses[0].action,
            CourseAction::Continue { href: "/milestones/2".to_string() }
        );
    }

    #[test]
    fn test_card_action() {
        assert_eq!(
            card_action(&course(3, EnrollmentStatus::Registered)),
            CourseAction::Continue { href: "/milestones/3".to_string() }
        );
        assert_eq!(card_action(&course(3, EnrollmentStatus::NotRegistered)), CourseAction::Register);
        assert_eq!(card_action(&course(3, EnrollmentStatus::Completed)), CourseAction::Completed);
    }

    #[test]
    fn test_card_json_shape() {
        let card = CourseCard::new(course(4, EnrollmentStatus::NotRegistered));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["status"], "not-registered");
        assert_eq!(json["milestones"], 3);
        assert_eq!(json["action"]["kind"], "register");
    }
}
