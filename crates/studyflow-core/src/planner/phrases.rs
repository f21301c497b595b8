//! Text tables used when naming generated plan blocks.

use rand::seq::SliceRandom;
use rand::Rng;

use super::analysis::{Category, Subject};
use super::build::Phase;

fn name_template(category: Category, phase: Phase) -> Option<&'static str> {
    use Category as C;
    use Phase as P;
    let template = match (category, phase) {
        (C::Study, P::Warmup) => "Preview and organize {topic}",
        (C::Study, P::Main) => "Read and take notes on {topic}",
        (C::Study, P::Deep) => "Work through the hardest parts of {topic}",
        (C::Study, P::Main2) => "Continue active reading of {topic}",
        (C::Study, P::Deep2) => "Connect and summarize key ideas in {topic}",
        (C::Study, P::Review) => "Summarize what you learned from {topic}",
        (C::Review, P::Warmup) => "Quick recap of {topic}",
        (C::Review, P::Main) => "Active recall practice on {topic}",
        (C::Review, P::Deep) => "Test yourself on {topic}",
        (C::Review, P::Review) => "Revisit mistakes in {topic}",
        (C::Assignment, P::Warmup) => "Plan the structure for {topic}",
        (C::Assignment, P::Main) => "Draft the main content for {topic}",
        (C::Assignment, P::Deep) => "Solve the hardest parts of {topic}",
        (C::Assignment, P::Review) => "Proofread and polish {topic}",
        _ => return None,
    };
    Some(template)
}

fn topic(subject: Subject) -> String {
    match subject {
        Subject::General => "your material".to_string(),
        other => format!("your {} material", other.label()),
    }
}

/// Block name for a work phase, with a generic label for combinations the
/// table does not cover.
pub(crate) fn task_name(category: Category, subject: Subject, phase: Phase) -> String {
    match name_template(category, phase) {
        Some(template) => template.replace("{topic}", &topic(subject)),
        None => format!("Focused work session ({})", phase.label()),
    }
}

const SHORT_BREAK_ACTIVITIES: &[&str] = &[
    "Stretch and hydrate",
    "Rest your eyes and look into the distance",
    "Take a few deep breaths",
    "Tidy up your desk",
];

const MEDIUM_BREAK_ACTIVITIES: &[&str] = &[
    "Walk around the room",
    "Grab a healthy snack",
    "Light stretching routine",
    "Refill your water and step outside",
];

const LONG_BREAK_ACTIVITIES: &[&str] = &[
    "Take a walk outside",
    "Have a proper meal",
    "Brief mindfulness session",
    "Explain what you learned out loud",
];

pub(crate) fn break_activity<R: Rng + ?Sized>(minutes: u32, rng: &mut R) -> String {
    let band = if minutes <= 5 {
        SHORT_BREAK_ACTIVITIES
    } else if minutes <= 10 {
        MEDIUM_BREAK_ACTIVITIES
    } else {
        LONG_BREAK_ACTIVITIES
    };
    band.choose(rng).copied().unwrap_or("Take a break").to_string()
}

fn motivations(category: Category) -> &'static [&'static str] {
    match category {
        Category::Study => &[
            "Focus time! Knowledge awaits.",
            "Learning mode on.",
            "Dive deep today.",
            "One page at a time.",
        ],
        Category::Review => &[
            "Recall power up!",
            "Practice makes permanent.",
            "Test it to know it.",
            "Memory building time.",
        ],
        Category::Assignment => &[
            "Creation mode on!",
            "Progress beats perfection.",
            "Build something great.",
            "Make it happen.",
        ],
    }
}

pub(crate) fn motivation<R: Rng + ?Sized>(category: Category, rng: &mut R) -> String {
    motivations(category)
        .choose(rng)
        .copied()
        .unwrap_or("You can do this.")
        .to_string()
}
