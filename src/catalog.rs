//! Static study content: the mock test catalogue and the leaderboard.

use serde::Serialize;
use std::fmt;

use crate::model::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockTest {
    pub subject: Subject,
    pub title: &'static str,
    pub duration_minutes: u32,
    pub questions: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: &'static str,
    pub score: u32,
    pub subject: Subject,
}

const LEADERBOARD: [LeaderboardEntry; 9] = [
    entry(1, "Alex Johnson", 980, Subject::Physics),
    entry(2, "Sarah Chen", 945, Subject::Mathematics),
    entry(3, "Michael Brown", 920, Subject::Chemistry),
    entry(4, "Emma Wilson", 890, Subject::Physics),
    entry(5, "James Lee", 875, Subject::Mathematics),
    entry(6, "Liam Smith", 860, Subject::Chemistry),
    entry(7, "Sophia Patel", 840, Subject::Physics),
    entry(8, "Daniel Garcia", 820, Subject::Mathematics),
    entry(9, "Olivia Martinez", 810, Subject::Chemistry),
];

const fn entry(rank: u32, name: &'static str, score: u32, subject: Subject) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        name,
        score,
        subject,
    }
}

/// The available mock tests
pub fn mock_tests() -> Vec<MockTest> {
    vec![
        MockTest {
            subject: Subject::Mathematics,
            title: "Calculus Fundamentals",
            duration_minutes: 45,
            questions: 30,
            difficulty: Difficulty::Intermediate,
        },
        MockTest {
            subject: Subject::Physics,
            title: "Classical Mechanics",
            duration_minutes: 60,
            questions: 40,
            difficulty: Difficulty::Advanced,
        },
        MockTest {
            subject: Subject::Chemistry,
            title: "Organic Chemistry Basics",
            duration_minutes: 30,
            questions: 25,
            difficulty: Difficulty::Beginner,
        },
    ]
}

/// Leaderboard entries, optionally for one subject, highest score first
pub fn leaderboard(subject: Option<Subject>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = LEADERBOARD
        .iter()
        .filter(|e| subject.map_or(true, |s| e.subject == s))
        .cloned()
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
