//! Milestone tracking
//!
//! A stateless evaluator: given a goal and the set of `(goal_id, threshold)`
//! pairs the caller has already notified, it reports every crossed threshold
//! that is still pending. Thresholds are evaluated in ascending order and a
//! single update that jumps past several of them reports all of them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Goal;

/// A percentage-of-target threshold with its notification text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub percentage: u8,
    pub message: String,
}

impl Milestone {
    pub fn new(percentage: u8, message: impl Into<String>) -> Self {
        Self {
            percentage,
            message: message.into(),
        }
    }
}

/// Validated, ascending list of milestones
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneSet {
    milestones: Vec<Milestone>,
}

impl MilestoneSet {
    /// Sorts ascending. Rejects 0, values above 100 and duplicates.
    pub fn new(mut milestones: Vec<Milestone>) -> Result<Self> {
        milestones.sort_by_key(|m| m.percentage);

        for m in &milestones {
            if m.percentage == 0 || m.percentage > 100 {
                return Err(Error::invalid(format!(
                    "milestone percentage must be within 1..=100 (got {})",
                    m.percentage
                )));
            }
        }
        if milestones
            .windows(2)
            .any(|pair| pair[0].percentage == pair[1].percentage)
        {
            return Err(Error::invalid("milestone percentages must be unique"));
        }

        Ok(Self { milestones })
    }

    pub fn as_slice(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }
}

impl Default for MilestoneSet {
    fn default() -> Self {
        Self {
            milestones: vec![
                Milestone::new(25, "Quarter of the way there! Keep going!"),
                Milestone::new(50, "Halfway to your goal! You're making great progress!"),
                Milestone::new(75, "Almost there! Just a little more effort!"),
            ],
        }
    }
}

/// A milestone reached by a goal, ready for the notification layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneEvent {
    pub goal_id: String,
    pub percentage: u8,
    pub message: String,
}

/// One already-notified `(goal, threshold)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotifiedMilestone {
    pub goal_id: String,
    pub percentage: u8,
}

/// Notification state owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NotifiedMilestone>", into = "Vec<NotifiedMilestone>")]
pub struct NotifiedMilestones {
    pairs: HashSet<(String, u8)>,
}

impl NotifiedMilestones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, goal_id: &str, percentage: u8) -> bool {
        self.pairs.contains(&(goal_id.to_string(), percentage))
    }

    pub fn insert(&mut self, goal_id: impl Into<String>, percentage: u8) -> bool {
        self.pairs.insert((goal_id.into(), percentage))
    }

    /// Mark delivered events as notified
    pub fn record(&mut self, events: &[MilestoneEvent]) {
        for event in events {
            self.insert(event.goal_id.clone(), event.percentage);
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<NotifiedMilestone>> for NotifiedMilestones {
    fn from(list: Vec<NotifiedMilestone>) -> Self {
        Self {
            pairs: list
                .into_iter()
                .map(|n| (n.goal_id, n.percentage))
                .collect(),
        }
    }
}

impl From<NotifiedMilestones> for Vec<NotifiedMilestone> {
    fn from(set: NotifiedMilestones) -> Self {
        let mut list: Vec<NotifiedMilestone> = set
            .pairs
            .into_iter()
            .map(|(goal_id, percentage)| NotifiedMilestone {
                goal_id,
                percentage,
            })
            .collect();
        list.sort_by(|a, b| {
            a.goal_id
                .cmp(&b.goal_id)
                .then_with(|| a.percentage.cmp(&b.percentage))
        });
        list
    }
}

/// Evaluates goal progress against a fixed milestone list
#[derive(Debug, Clone, Default)]
pub struct MilestoneTracker {
    milestones: MilestoneSet,
}

impl MilestoneTracker {
    pub fn new(milestones: MilestoneSet) -> Self {
        Self { milestones }
    }

    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    /// Every threshold at or below the goal's progress, ascending
    pub fn crossed<'a>(&'a self, goal: &Goal) -> impl Iterator<Item = &'a Milestone> {
        let progress = goal.progress_pct();
        self.milestones
            .as_slice()
            .iter()
            .take_while(move |m| f64::from(m.percentage) <= progress)
    }

    /// Crossed thresholds not yet present in `notified`
    pub fn evaluate(&self, goal: &Goal, notified: &NotifiedMilestones) -> Vec<MilestoneEvent> {
        let events: Vec<MilestoneEvent> = self
            .crossed(goal)
            .filter(|m| !notified.contains(goal.id(), m.percentage))
            .map(|m| MilestoneEvent {
                goal_id: goal.id().to_string(),
                percentage: m.percentage,
                message: m.message.clone(),
            })
            .collect();

        if !events.is_empty() {
            debug!(
                goal_id = %goal.id(),
                progress = goal.progress_pct(),
                count = events.len(),
                "Milestones reached"
            );
        }

        events
    }

    /// Evaluate several goals against the same notification state
    pub fn evaluate_all(&self, goals: &[Goal], notified: &NotifiedMilestones) -> Vec<MilestoneEvent> {
        goals
            .iter()
            .flat_map(|goal| self.evaluate(goal, notified))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn goal_at(current: f64) -> Goal {
        Goal::new(
            "g1",
            "Emergency fund",
            1000.0,
            current,
            NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_milestones_below_first_threshold() {
        let tracker = MilestoneTracker::default();
        let events = tracker.evaluate(&goal_at(100.0), &NotifiedMilestones::new());
        assert!(events.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let tracker = MilestoneTracker::default();
        let events = tracker.evaluate(&goal_at(250.0), &NotifiedMilestones::new());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].percentage, 25);
        assert_eq!(events[0].goal_id, "g1");
    }

    #[test]
    fn test_jump_reports_every_crossed_threshold() {
        let tracker = MilestoneTracker::default();
        let mut notified = NotifiedMilestones::new();

        // 10% -> nothing yet
        assert!(tracker.evaluate(&goal_at(100.0), &notified).is_empty());

        // 10% -> 80% in one update
        let events = tracker.evaluate(&goal_at(800.0), &notified);
        let pcts: Vec<u8> = events.iter().map(|e| e.percentage).collect();
        assert_eq!(pcts, vec![25, 50, 75]);

        notified.record(&events);
        assert!(tracker.evaluate(&goal_at(800.0), &notified).is_empty());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let tracker = MilestoneTracker::default();
        let notified = NotifiedMilestones::new();
        let first = tracker.evaluate(&goal_at(600.0), &notified);
        let second = tracker.evaluate(&goal_at(600.0), &notified);
        assert_eq!(first, second);
    }

    #[test]
    fn test_notified_pairs_are_per_goal() {
        let tracker = MilestoneTracker::default();
        let mut notified = NotifiedMilestones::new();
        notified.insert("other-goal", 25);

        let events = tracker.evaluate(&goal_at(300.0), &notified);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_milestone_set_sorts_and_validates() {
        let set = MilestoneSet::new(vec![
            Milestone::new(90, "c"),
            Milestone::new(10, "a"),
            Milestone::new(40, "b"),
        ])
        .unwrap();
        let pcts: Vec<u8> = set.as_slice().iter().map(|m| m.percentage).collect();
        assert_eq!(pcts, vec![10, 40, 90]);

        assert!(MilestoneSet::new(vec![Milestone::new(0, "zero")]).is_err());
        assert!(MilestoneSet::new(vec![Milestone::new(101, "over")]).is_err());
        assert!(
            MilestoneSet::new(vec![Milestone::new(50, "a"), Milestone::new(50, "b")]).is_err()
        );
    }

    #[test]
    fn test_notified_serialization() {
        let mut notified = NotifiedMilestones::new();
        notified.insert("b", 50);
        notified.insert("a", 25);
        let json = serde_json::to_value(&notified).unwrap();
        assert_eq!(json[0]["goal_id"], "a");
        assert_eq!(json[1]["percentage"], 50);

        let back: NotifiedMilestones = serde_json::from_value(json).unwrap();
        assert_eq!(back, notified);
    }

    proptest! {
        #[test]
        fn prop_reports_all_crossed_thresholds(current in 0.0f64..2000.0) {
            let tracker = MilestoneTracker::default();
            let goal = goal_at(current);
            let events = tracker.evaluate(&goal, &NotifiedMilestones::new());
            let expected = [25u8, 50, 75]
                .iter()
                .filter(|p| f64::from(**p) <= goal.progress_pct())
                .count();
            prop_assert_eq!(events.len(), expected);
            prop_assert!(events.windows(2).all(|w| w[0].percentage < w[1].percentage));
        }
    }
}
