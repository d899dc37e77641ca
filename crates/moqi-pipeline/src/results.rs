//! Results assembler: ranked summary of one swiping round.

use std::collections::HashMap;

use serde::Serialize;

use moqi_core::entities::Startup;
use moqi_core::enums::FeedbackPreference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub startup: Startup,
    pub liked: bool,
    pub coins: u32,
    pub feedback_preference: FeedbackPreference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Results {
    /// Liked startups, most coins first; ties keep encounter order.
    pub liked: Vec<ResultEntry>,
    /// Disliked startups in encounter order.
    pub disliked: Vec<ResultEntry>,
}

impl Results {
    #[must_use]
    pub fn total_allocated(&self) -> u32 {
        self.liked.iter().map(|e| e.coins).sum()
    }

    /// Liked startup ids in ranked order.
    #[must_use]
    pub fn ranking(&self) -> Vec<&str> {
        self.liked.iter().map(|e| e.startup.id.as_str()).collect()
    }
}

/// Inputs to [`assemble`], borrowed from the session.
pub struct ResultInputs<'a> {
    /// Every candidate decided this round, in encounter order.
    pub candidates: &'a [Startup],
    pub is_liked: &'a dyn Fn(&str) -> bool,
    pub allocations: &'a HashMap<String, u32>,
    pub liked_feedback: &'a HashMap<String, FeedbackPreference>,
    pub disliked_feedback: &'a HashMap<String, FeedbackPreference>,
}

/// Partition candidates into ranked liked entries and disliked entries.
#[must_use]
pub fn assemble(inputs: &ResultInputs<'_>) -> Results {
    let mut results = Results::default();
    for startup in inputs.candidates {
        let liked = (inputs.is_liked)(&startup.id);
        let (feedback, default) = if liked {
            (inputs.liked_feedback, FeedbackPreference::LIKED_DEFAULT)
        } else {
            (inputs.disliked_feedback, FeedbackPreference::DISLIKED_DEFAULT)
        };
        let entry = ResultEntry {
            startup: startup.clone(),
            liked,
            coins: if liked {
                inputs.allocations.get(&startup.id).copied().unwrap_or(0)
            } else {
                0
            },
            feedback_preference: feedback.get(&startup.id).copied().unwrap_or(default),
        };
        if liked {
            results.liked.push(entry);
        } else {
            results.disliked.push(entry);
        }
    }
    // Stable sort keeps encounter order among equal allocations.
    results.liked.sort_by(|a, b| b.coins.cmp(&a.coins));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn startup(id: &str) -> Startup {
        Startup {
            id: id.into(),
            name: id.to_uppercase(),
            tagline: None,
            description: None,
            industry: None,
            founding_year: None,
            employee_band: None,
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    fn run(
        ids: &[&str],
        liked: &[&str],
        allocations: &[(&str, u32)],
    ) -> Results {
        let candidates: Vec<Startup> = ids.iter().map(|id| startup(id)).collect();
        let allocations: HashMap<String, u32> =
            allocations.iter().map(|(id, c)| ((*id).to_string(), *c)).collect();
        let is_liked = |id: &str| liked.contains(&id);
        assemble(&ResultInputs {
            candidates: &candidates,
            is_liked: &is_liked,
            allocations: &allocations,
            liked_feedback: &HashMap::new(),
            disliked_feedback: &HashMap::new(),
        })
    }

    #[test]
    fn ranks_liked_by_allocation_descending() {
        let results = run(&["a", "b", "c", "d"], &["a", "b"], &[("a", 30), ("b", 70)]);
        assert_eq!(results.ranking(), vec!["b", "a"]);
        assert_eq!(results.total_allocated(), 100);
        let disliked: Vec<&str> = results.disliked.iter().map(|e| e.startup.id.as_str()).collect();
        assert_eq!(disliked, vec!["c", "d"]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let results = run(&["a", "b", "c"], &["a", "b", "c"], &[("a", 20), ("b", 60), ("c", 20)]);
        assert_eq!(results.ranking(), vec!["b", "a", "c"]);
    }

    #[test]
    fn default_feedback_by_side() {
        let results = run(&["a", "b"], &["a"], &[("a", 100)]);
        assert_eq!(results.liked[0].feedback_preference, FeedbackPreference::All);
        assert_eq!(results.disliked[0].feedback_preference, FeedbackPreference::No);
        assert_eq!(results.disliked[0].coins, 0);
    }

    #[test]
    fn nothing_liked_gives_empty_ranking() {
        let results = run(&["a", "b"], &[], &[]);
        assert!(results.liked.is_empty());
        assert_eq!(results.disliked.len(), 2);
        assert_eq!(results.total_allocated(), 0);
    }
}
