//! Built-in questions used when the generator cannot be reached.

use crate::model::{Difficulty, Question, QuestionDraft, QuestionId};

struct Seed {
    id: &'static str,
    prompt: &'static str,
    options: [&'static str; 4],
    correct_index: usize,
    explanation: &'static str,
    reference: &'static str,
    difficulty: Difficulty,
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: "1",
        prompt: "Who was the first king of Israel?",
        options: ["David", "Saul", "Solomon", "Samuel"],
        correct_index: 1,
        explanation: "Saul was anointed as the first king of Israel by the prophet Samuel, as described in 1 Samuel 10:1.",
        reference: "1 Samuel 10:1",
        difficulty: Difficulty::Easy,
    },
    Seed {
        id: "2",
        prompt: "How many days did God take to create the world?",
        options: ["5 days", "6 days", "7 days", "8 days"],
        correct_index: 1,
        explanation: "God created the world in 6 days and rested on the 7th day, as described in Genesis 1-2.",
        reference: "Genesis 1-2",
        difficulty: Difficulty::Easy,
    },
    Seed {
        id: "3",
        prompt: "What was the name of the garden where Adam and Eve lived?",
        options: [
            "Garden of Gethsemane",
            "Garden of Eden",
            "Garden of Peace",
            "Garden of Paradise",
        ],
        correct_index: 1,
        explanation: "Adam and Eve lived in the Garden of Eden before the fall, as described in Genesis 2:8.",
        reference: "Genesis 2:8",
        difficulty: Difficulty::Easy,
    },
    Seed {
        id: "4",
        prompt: "Who built the ark to survive the flood?",
        options: ["Moses", "Abraham", "Noah", "Joseph"],
        correct_index: 2,
        explanation: "Noah built the ark according to God's instructions to save his family and the animals from the flood.",
        reference: "Genesis 6-9",
        difficulty: Difficulty::Easy,
    },
    Seed {
        id: "5",
        prompt: "What did Jesus turn water into at the wedding in Cana?",
        options: ["Milk", "Wine", "Juice", "Oil"],
        correct_index: 1,
        explanation: "Jesus performed his first miracle by turning water into wine at a wedding in Cana.",
        reference: "John 2:1-11",
        difficulty: Difficulty::Medium,
    },
];

/// The fixed fallback question set, in play order.
#[must_use]
pub fn fallback_questions() -> Vec<Question> {
    SEEDS
        .iter()
        .filter_map(|seed| {
            QuestionDraft {
                id: QuestionId::new(seed.id),
                prompt: seed.prompt.to_owned(),
                options: seed.options.iter().map(|o| (*o).to_owned()).collect(),
                correct_index: seed.correct_index,
                explanation: seed.explanation.to_owned(),
                reference: seed.reference.to_owned(),
                difficulty: seed.difficulty,
            }
            .validate()
            .ok()
        })
        .collect()
}
