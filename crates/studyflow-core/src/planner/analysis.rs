//! Keyword-based goal classification.
//!
//! Matching is plain substring search over the lower-cased goal, so a
//! keyword also hits inside longer words ("war" in "software").

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Review,
    Assignment,
}

impl Category {
    /// Scoring order. Earlier categories win ties.
    pub const ALL: [Category; 3] = [Category::Study, Category::Review, Category::Assignment];

    pub fn label(self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Review => "review",
            Category::Assignment => "assignment",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Study => &[
                "study",
                "learn",
                "read",
                "understand",
                "lecture",
                "notes",
                "textbook",
                "research",
            ],
            Category::Review => &[
                "review",
                "revise",
                "recall",
                "exam",
                "test",
                "quiz",
                "practice",
                "memorize",
                "flashcard",
            ],
            Category::Assignment => &[
                "assignment",
                "homework",
                "essay",
                "project",
                "write",
                "report",
                "solve",
                "create",
                "build",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Science,
    Language,
    History,
    Programming,
    General,
}

impl Subject {
    /// Detection order. A later match overwrites an earlier one.
    const TABLE: [(Subject, &'static [&'static str]); 5] = [
        (
            Subject::Math,
            &["math", "calculus", "algebra", "geometry", "statistics", "trigonometry", "equation"],
        ),
        (
            Subject::Science,
            &["physics", "chemistry", "biology", "science", "lab", "experiment"],
        ),
        (
            Subject::Language,
            &["english", "literature", "grammar", "vocabulary", "spanish", "french", "language"],
        ),
        (
            Subject::History,
            &["history", "historical", "civilization", "ancient", "war", "timeline"],
        ),
        (
            Subject::Programming,
            &["code", "coding", "programming", "python", "javascript", "rust", "algorithm", "software"],
        ),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
            Subject::Language => "language",
            Subject::History => "history",
            Subject::Programming => "programming",
            Subject::General => "general",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    const HARD: &'static [&'static str] = &[
        "advanced",
        "complex",
        "difficult",
        "hard",
        "challenging",
        "comprehensive",
    ];
    const EASY: &'static [&'static str] = &[
        "basic",
        "easy",
        "simple",
        "intro",
        "overview",
        "quick",
    ];

    /// Duration scale applied to every work phase.
    pub fn factor(self) -> f64 {
        match self {
            Difficulty::Easy => 0.9,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.1,
        }
    }
}

/// Result of classifying a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalAnalysis {
    pub category: Category,
    pub subject: Subject,
    pub difficulty: Difficulty,
    /// Keyword hits of the winning category.
    pub confidence: u32,
    pub word_count: usize,
}

pub fn analyze_goal(text: &str) -> GoalAnalysis {
    let goal = text.to_lowercase();

    let mut category = Category::Study;
    let mut best = 0;
    for candidate in Category::ALL {
        let score = count_hits(&goal, candidate.keywords());
        if score > best {
            best = score;
            category = candidate;
        }
    }

    let mut subject = Subject::General;
    for (candidate, keywords) in Subject::TABLE {
        if keywords.iter().any(|k| goal.contains(k)) {
            subject = candidate;
        }
    }

    let hard = count_hits(&goal, Difficulty::HARD);
    let easy = count_hits(&goal, Difficulty::EASY);
    let difficulty = if hard > easy {
        Difficulty::Hard
    } else if easy > hard {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };

    GoalAnalysis {
        category,
        subject,
        difficulty,
        confidence: best,
        word_count: goal.split_whitespace().count(),
    }
}

fn count_hits(goal: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|k| goal.contains(*k)).count() as u32
}
