use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursehub_core::{CourseId, DomainError, DomainResult, Entity};

/// Course status lifecycle.
///
/// `Draft` and `Published` are non-terminal; `Archived` is terminal and
/// absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

impl CourseStatus {
    /// Wire name, as carried in DTOs and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "DRAFT",
            CourseStatus::Published => "PUBLISHED",
            CourseStatus::Archived => "ARCHIVED",
        }
    }
}

impl core::str::FromStr for CourseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(CourseStatus::Draft),
            "PUBLISHED" => Ok(CourseStatus::Published),
            "ARCHIVED" => Ok(CourseStatus::Archived),
            other => Err(DomainError::validation(format!(
                "unknown course status '{other}'"
            ))),
        }
    }
}

impl core::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated creation data for a course.
///
/// Construction is the creation-time validation gate: a `NewCourse` always
/// carries a non-blank title and a duration of at least one minute. Drafts
/// are free to drift out of eligibility afterwards; that is caught again at
/// publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    title: String,
    description: Option<String>,
    duration: u32,
}

impl NewCourse {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        duration: Option<u32>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }

        let Some(duration) = duration.filter(|d| *d >= 1) else {
            return Err(DomainError::validation(
                "duration must be greater than 0",
            ));
        };

        Ok(Self {
            title,
            description,
            duration,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

/// Partial update to a course's editable fields.
///
/// `None` means "leave unchanged". There is deliberately no way to clear a
/// field through an update; the original API treats absent fields as
/// untouched, and clearing was never expressible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u32>,
}

/// Entity: Course.
///
/// Field mutation happens only through the lifecycle methods below; stores
/// persist whatever state these methods produce and never apply business
/// rules of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    duration: Option<u32>,
    status: CourseStatus,
    published_at: Option<DateTime<Utc>>,
    version: u64,
}

impl Course {
    /// Materialize a freshly inserted draft from validated creation data.
    ///
    /// Called by stores when assigning an id; the record version starts at 1.
    pub fn insert_draft(id: CourseId, new: NewCourse) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            duration: Some(new.duration),
            status: CourseStatus::Draft,
            published_at: None,
            version: 1,
        }
    }

    /// Rehydrate a course from a stored record.
    pub fn from_record(
        id: CourseId,
        title: impl Into<String>,
        description: Option<String>,
        duration: Option<u32>,
        status: CourseStatus,
        published_at: Option<DateTime<Utc>>,
        version: u64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            duration,
            status,
            published_at,
            version,
        }
    }

    /// Record-version bump, applied by stores on successful save.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id_typed(&self) -> CourseId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn status(&self) -> CourseStatus {
        self.status
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Invariant helper: archived courses are immutable.
    pub fn can_be_edited(&self) -> bool {
        self.status != CourseStatus::Archived
    }

    /// The authoritative publish-eligibility check.
    ///
    /// Evaluated fresh on every publish, never cached from creation.
    pub fn publish_eligibility(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation(
                "cannot publish course: title is required",
            ));
        }

        match self.duration {
            Some(d) if d >= 1 => Ok(()),
            _ => Err(DomainError::validation(
                "cannot publish course: duration must be greater than 0",
            )),
        }
    }

    /// Apply a partial update to the editable fields.
    ///
    /// Does not re-check publish eligibility: a draft may be edited into an
    /// ineligible state without error.
    pub fn apply_update(&mut self, update: CourseUpdate) -> DomainResult<()> {
        if !self.can_be_edited() {
            return Err(DomainError::invalid_state("cannot edit archived course"));
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(duration) = update.duration {
            self.duration = Some(duration);
        }

        Ok(())
    }

    /// Transition to `Published`.
    ///
    /// Re-publishing an already published course succeeds and refreshes
    /// `published_at` to `now`.
    pub fn publish(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == CourseStatus::Archived {
            return Err(DomainError::invalid_state("cannot publish archived course"));
        }

        self.publish_eligibility()?;

        self.status = CourseStatus::Published;
        self.published_at = Some(now);
        Ok(())
    }

    /// Transition to `Archived`.
    ///
    /// One-way and unconditional; archiving an archived course is a no-op
    /// success. `published_at` is retained as history.
    pub fn archive(&mut self) -> DomainResult<()> {
        self.status = CourseStatus::Archived;
        Ok(())
    }
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    fn later_time() -> DateTime<Utc> {
        "2024-03-02T09:30:00Z".parse().unwrap()
    }

    fn draft(title: &str, duration: Option<u32>) -> Course {
        Course::from_record(
            CourseId::new(1),
            title,
            Some("A hands-on introduction".to_string()),
            duration,
            CourseStatus::Draft,
            None,
            1,
        )
    }

    #[test]
    fn new_course_carries_validated_fields() {
        let new = NewCourse::new("Intro to X", Some("Basics".to_string()), Some(30)).unwrap();
        assert_eq!(new.title(), "Intro to X");
        assert_eq!(new.description(), Some("Basics"));
        assert_eq!(new.duration(), 30);
    }

    #[test]
    fn new_course_rejects_empty_title() {
        let err = NewCourse::new("", None, Some(10)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_course_rejects_whitespace_title() {
        let err = NewCourse::new("   ", None, Some(10)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_course_rejects_zero_duration() {
        let err = NewCourse::new("Intro", None, Some(0)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("duration")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_course_rejects_missing_duration() {
        let err = NewCourse::new("Intro", None, None).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("duration")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_course_accepts_minimum_duration() {
        let new = NewCourse::new("Intro", None, Some(1)).unwrap();
        assert_eq!(new.duration(), 1);
    }

    #[test]
    fn insert_draft_starts_in_draft_with_version_one() {
        let new = NewCourse::new("Go Basics", None, Some(45)).unwrap();
        let course = Course::insert_draft(CourseId::new(7), new);

        assert_eq!(course.id_typed(), CourseId::new(7));
        assert_eq!(course.status(), CourseStatus::Draft);
        assert_eq!(course.published_at(), None);
        assert_eq!(course.version(), 1);
        assert_eq!(course.duration(), Some(45));
    }

    #[test]
    fn apply_update_overwrites_only_present_fields() {
        let mut course = draft("Original", Some(40));

        course
            .apply_update(CourseUpdate {
                duration: Some(120),
                ..CourseUpdate::default()
            })
            .unwrap();

        assert_eq!(course.title(), "Original");
        assert_eq!(course.description(), Some("A hands-on introduction"));
        assert_eq!(course.duration(), Some(120));
    }

    #[test]
    fn apply_update_may_leave_draft_ineligible() {
        let mut course = draft("Original", Some(40));

        course
            .apply_update(CourseUpdate {
                duration: Some(0),
                ..CourseUpdate::default()
            })
            .unwrap();

        assert_eq!(course.status(), CourseStatus::Draft);
        assert!(course.publish_eligibility().is_err());
    }

    #[test]
    fn apply_update_preserves_status_and_published_at() {
        let mut course = Course::from_record(
            CourseId::new(3),
            "Live course",
            None,
            Some(60),
            CourseStatus::Published,
            Some(test_time()),
            4,
        );

        course
            .apply_update(CourseUpdate {
                title: Some("Renamed".to_string()),
                ..CourseUpdate::default()
            })
            .unwrap();

        assert_eq!(course.status(), CourseStatus::Published);
        assert_eq!(course.published_at(), Some(test_time()));
    }

    #[test]
    fn apply_update_rejects_archived_course() {
        let mut course = draft("Original", Some(40));
        course.archive().unwrap();

        let err = course
            .apply_update(CourseUpdate {
                title: Some("X".to_string()),
                ..CourseUpdate::default()
            })
            .unwrap_err();

        match err {
            DomainError::InvalidState(_) => {}
            other => panic!("expected InvalidState error, got {other:?}"),
        }
        assert_eq!(course.title(), "Original");
    }

    #[test]
    fn publish_sets_status_and_timestamp() {
        let mut course = draft("Intro to X", Some(30));

        course.publish(test_time()).unwrap();

        assert_eq!(course.status(), CourseStatus::Published);
        assert_eq!(course.published_at(), Some(test_time()));
    }

    #[test]
    fn publish_rejects_empty_title() {
        let mut course = draft("", Some(10));
        let err = course.publish(test_time()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("title")),
            other => panic!("expected Validation error, got {other:?}"),
        }
        assert_eq!(course.status(), CourseStatus::Draft);
    }

    #[test]
    fn publish_rejects_whitespace_title() {
        let mut course = draft("  ", Some(5));
        let err = course.publish(test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn publish_rejects_zero_duration() {
        let mut course = draft("Intro", Some(0));
        let err = course.publish(test_time()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("duration")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn publish_rejects_missing_duration() {
        let mut course = draft("Intro", None);
        let err = course.publish(test_time()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("duration")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn publish_accepts_minimum_duration() {
        let mut course = draft("Intro", Some(1));
        course.publish(test_time()).unwrap();
        assert_eq!(course.status(), CourseStatus::Published);
    }

    #[test]
    fn publish_rejects_archived_course() {
        let mut course = draft("Intro", Some(30));
        course.archive().unwrap();

        let err = course.publish(test_time()).unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert!(msg.contains("archived")),
            other => panic!("expected InvalidState error, got {other:?}"),
        }
        assert_eq!(course.status(), CourseStatus::Archived);
    }

    #[test]
    fn republish_refreshes_published_at() {
        let mut course = draft("Intro", Some(30));

        course.publish(test_time()).unwrap();
        course.publish(later_time()).unwrap();

        assert_eq!(course.status(), CourseStatus::Published);
        assert_eq!(course.published_at(), Some(later_time()));
    }

    #[test]
    fn archive_from_draft() {
        let mut course = draft("Intro", Some(30));
        course.archive().unwrap();

        assert_eq!(course.status(), CourseStatus::Archived);
        assert_eq!(course.published_at(), None);
        assert!(!course.can_be_edited());
    }

    #[test]
    fn archive_retains_published_at_and_fields() {
        let mut course = draft("Intro", Some(30));
        course.publish(test_time()).unwrap();

        course.archive().unwrap();

        assert_eq!(course.status(), CourseStatus::Archived);
        assert_eq!(course.published_at(), Some(test_time()));
        assert_eq!(course.title(), "Intro");
        assert_eq!(course.duration(), Some(30));
    }

    #[test]
    fn archive_is_idempotent() {
        let mut course = draft("Intro", Some(30));
        course.publish(test_time()).unwrap();

        course.archive().unwrap();
        let snapshot = course.clone();
        course.archive().unwrap();

        assert_eq!(course, snapshot);
    }

    #[test]
    fn status_wire_names_round_trip() {
        for status in [
            CourseStatus::Draft,
            CourseStatus::Published,
            CourseStatus::Archived,
        ] {
            let parsed: CourseStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }

        assert!("draft".parse::<CourseStatus>().is_err());
        assert!("RETIRED".parse::<CourseStatus>().is_err());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// One lifecycle operation, as sampled for sequence properties.
        #[derive(Debug, Clone)]
        enum Op {
            Update(CourseUpdate),
            Publish,
            Archive,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (
                    proptest::option::of("[a-zA-Z ]{0,20}"),
                    proptest::option::of("[a-zA-Z ]{0,40}"),
                    proptest::option::of(0u32..200),
                )
                    .prop_map(|(title, description, duration)| {
                        Op::Update(CourseUpdate {
                            title,
                            description,
                            duration,
                        })
                    }),
                Just(Op::Publish),
                Just(Op::Archive),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: eligibility accepts exactly non-blank titles with a
            /// duration of at least one minute.
            #[test]
            fn eligibility_matches_field_rules(
                title in "[ a-zA-Z0-9]{0,30}",
                duration in proptest::option::of(0u32..500),
            ) {
                let course = Course::from_record(
                    CourseId::new(1),
                    title.clone(),
                    None,
                    duration,
                    CourseStatus::Draft,
                    None,
                    1,
                );

                let eligible = !title.trim().is_empty() && duration.is_some_and(|d| d >= 1);
                prop_assert_eq!(course.publish_eligibility().is_ok(), eligible);
            }

            /// Property: under arbitrary operation sequences, the status stays
            /// within the three-state machine and `Archived` is absorbing.
            #[test]
            fn archived_is_absorbing(ops in proptest::collection::vec(op_strategy(), 1..24)) {
                let mut course = Course::insert_draft(
                    CourseId::new(1),
                    NewCourse::new("Seed course", None, Some(30)).unwrap(),
                );
                let mut archived = false;

                for op in ops {
                    let result = match op {
                        Op::Update(update) => course.apply_update(update),
                        Op::Publish => course.publish(Utc::now()),
                        Op::Archive => {
                            let r = course.archive();
                            archived = true;
                            r
                        }
                    };

                    if archived {
                        prop_assert_eq!(course.status(), CourseStatus::Archived);
                        if !matches!(result, Ok(())) {
                            // Only update/publish may fail once archived, and
                            // only with InvalidState.
                            prop_assert!(matches!(result, Err(DomainError::InvalidState(_))));
                        }
                    }

                    prop_assert!(matches!(
                        course.status(),
                        CourseStatus::Draft | CourseStatus::Published | CourseStatus::Archived
                    ));
                }
            }

            /// Property: `published_at` is set iff a publish has succeeded,
            /// and never changes except through publish.
            #[test]
            fn published_at_tracks_publishes(ops in proptest::collection::vec(op_strategy(), 1..24)) {
                let mut course = Course::insert_draft(
                    CourseId::new(1),
                    NewCourse::new("Seed course", None, Some(30)).unwrap(),
                );
                let mut publishes = 0u32;

                for op in ops {
                    let before = course.published_at();
                    match op {
                        Op::Update(update) => {
                            let _ = course.apply_update(update);
                            prop_assert_eq!(course.published_at(), before);
                        }
                        Op::Publish => {
                            let now = Utc::now();
                            if course.publish(now).is_ok() {
                                publishes += 1;
                                prop_assert_eq!(course.published_at(), Some(now));
                            } else {
                                prop_assert_eq!(course.published_at(), before);
                            }
                        }
                        Op::Archive => {
                            course.archive().unwrap();
                            prop_assert_eq!(course.published_at(), before);
                        }
                    }
                }

                prop_assert_eq!(course.published_at().is_some(), publishes > 0);
            }
        }
    }
}
