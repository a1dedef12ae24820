/// Example questions offered by the form UI and `srq samples`.
pub const SAMPLE_QUESTIONS: &[&str] = &[
    "What are my personal best times for Super Mario 64?",
    "Which game has the most speedrun attempts?",
    "How close am I to the world record for Hollow Knight Any%?",
    "What's my best category in Dark Souls?",
    "When was my last Celeste run?",
    "Which game do I have the most categories for?",
    "What's the average completion time for my Metroid Dread runs?",
    "How many runs did I do in 2023?",
    "What's my fastest speedrun ever?",
    "Which games have I completed in under 30 minutes?",
];

pub fn list_samples() {
    for (i, q) in SAMPLE_QUESTIONS.iter().enumerate() {
        println!("{:>2}. {}", i + 1, q);
    }
}
