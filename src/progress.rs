use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Minutes credited per completed lesson, regardless of the lesson's length
pub const NOMINAL_MINUTES_PER_COMPLETION: u32 = 1;

/// The viewer's accumulated learning state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    current_lesson: String,
    current_specialization: String,
    completed_lessons: Vec<String>,
    streak_days: u32,
    total_minutes_watched: u32,
}

impl Progress {
    pub fn new(
        current_lesson: impl Into<String>,
        current_specialization: impl Into<String>,
        streak_days: u32,
        total_minutes_watched: u32,
    ) -> Self {
        Self {
            current_lesson: current_lesson.into(),
            current_specialization: current_specialization.into(),
            completed_lessons: Vec::new(),
            streak_days,
            total_minutes_watched,
        }
    }

    /// Mark a lesson completed. The set stays duplicate-free; a repeat moves
    /// the id to the most recent position.
    pub fn record_completion(&mut self, lesson_id: &str) {
        self.completed_lessons.retain(|id| id != lesson_id);
        self.completed_lessons.push(lesson_id.to_string());
        self.total_minutes_watched = self
            .total_minutes_watched
            .saturating_add(NOMINAL_MINUTES_PER_COMPLETION);
        tracing::debug!(
            lesson = lesson_id,
            completed = self.completed_lessons.len(),
            minutes = self.total_minutes_watched,
            "lesson completed"
        );
    }

    /// Accepts any id; membership in the catalog is the caller's concern.
    pub fn select_specialization(&mut self, specialization_id: &str) {
        self.current_specialization = specialization_id.to_string();
        tracing::debug!(specialization = specialization_id, "specialization selected");
    }

    /// Drop repeated ids from a snapshot loaded from outside, keeping the
    /// first occurrence.
    pub fn deduplicated(mut self) -> Self {
        self.completed_lessons = self.completed_lessons.into_iter().unique().collect();
        self
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|id| id == lesson_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    pub fn completed_lessons(&self) -> &[String] {
        &self.completed_lessons
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes_watched
    }

    pub fn current_specialization(&self) -> &str {
        &self.current_specialization
    }

    pub fn current_lesson(&self) -> &str {
        &self.current_lesson
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completion_adds_lesson_and_minutes() {
        let mut progress = Progress::new("lesson-1", "spec-1", 7, 342);

        progress.record_completion("lesson-1");

        assert!(progress.is_completed("lesson-1"));
        assert_eq!(progress.completed_count(), 1);
        assert_eq!(progress.total_minutes(), 343);
    }

    #[test]
    fn test_record_completion_is_idempotent_on_the_set() {
        let mut progress = Progress::default();

        progress.record_completion("lesson-1");
        progress.record_completion("lesson-1");

        assert_eq!(progress.completed_count(), 1);
        // minutes still accrue per completion
        assert_eq!(progress.total_minutes(), 2);
    }

    #[test]
    fn test_repeat_completion_moves_to_most_recent() {
        let mut progress = Progress::default();

        progress.record_completion("a");
        progress.record_completion("b");
        progress.record_completion("a");

        assert_eq!(progress.completed_lessons(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_select_specialization_is_unvalidated() {
        let mut progress = Progress::new("lesson-1", "spec-1", 0, 0);

        progress.select_specialization("spec-does-not-exist");

        assert_eq!(progress.current_specialization(), "spec-does-not-exist");
    }

    #[test]
    fn test_reads_have_no_side_effects() {
        let progress = Progress::new("lesson-1", "spec-2", 4, 10);
        let before = progress.clone();

        let _ = progress.completed_count();
        let _ = progress.streak_days();
        let _ = progress.total_minutes();
        let _ = progress.current_specialization();

        assert_eq!(progress, before);
    }

    #[test]
    fn test_deduplicated_snapshot() {
        let json = r#"{
            "current_lesson": "",
            "current_specialization": "",
            "completed_lessons": ["a", "b", "a"],
            "streak_days": 0,
            "total_minutes_watched": 0
        }"#;
        let progress: Progress = serde_json::from_str(json).unwrap();

        assert_eq!(progress.deduplicated().completed_count(), 2);
    }

    #[test]
    fn test_seed_deserialization() {
        let json = r#"{
            "current_lesson": "lesson-1",
            "current_specialization": "spec-1",
            "completed_lessons": ["lesson-2"],
            "streak_days": 7,
            "total_minutes_watched": 342
        }"#;
        let progress: Progress = serde_json::from_str(json).unwrap();

        assert!(progress.is_completed("lesson-2"));
        assert_eq!(progress.streak_days(), 7);
    }
}
