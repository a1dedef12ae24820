//! Prompt construction for SQL generation and answer narration.
//!
//! Both builders are pure: the same inputs always produce byte-identical
//! prompts. The schema text and the few-shot examples are process-wide
//! constants.
//!
//! # Layout
//!
//! ```text
//! ZeroShot:  preamble ─ schema ─────────────── rules
//! FewShot:   preamble ─ schema ─ examples ──── rules
//! ```

use anyhow::Result;

use crate::models::{FewShotExample, PromptPair, PromptingMode, Row};

/// Returned verbatim by the model when the schema cannot answer a question.
pub const UNANSWERABLE_SENTINEL: &str = "Cannot answer this query with the available schema";

/// Table, column, and view structure the generated SQL must target.
pub const SCHEMA_DESCRIPTION: &str = r#"-- Games Table
CREATE TABLE games (
    game_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    platform TEXT NOT NULL,
    genre TEXT,
    release_date DATE
);

-- Categories Table
CREATE TABLE categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER REFERENCES games(game_id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    world_record_time NUMERIC(10, 3),  -- Stored in seconds with millisecond precision
    world_record_holder TEXT
);

-- Runs Table
CREATE TABLE runs (
    run_id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER REFERENCES games(game_id) ON DELETE CASCADE,
    category_id INTEGER REFERENCES categories(category_id) ON DELETE CASCADE,
    date DATE NOT NULL DEFAULT CURRENT_DATE,
    completion_time NUMERIC(10, 3) NOT NULL,  -- Stored in seconds with millisecond precision
    is_personal_best BOOLEAN DEFAULT 0,
    notes TEXT
);

-- Personal bests with the gap to the world record
CREATE VIEW personal_bests AS
SELECT
    r.run_id,
    g.title AS game_title,
    g.platform,
    c.name AS category_name,
    r.completion_time,
    r.date,
    r.notes,
    c.world_record_time,
    c.world_record_holder,
    (r.completion_time - c.world_record_time) AS time_difference
FROM runs r
JOIN games g ON r.game_id = g.game_id
JOIN categories c ON r.category_id = c.category_id
WHERE r.is_personal_best = 1;"#;

/// Worked examples for few-shot prompts, in the order they are rendered.
pub const FEW_SHOT_EXAMPLES: &[FewShotExample] = &[
    FewShotExample {
        question: "What are my personal best times for Super Mario 64?",
        sql: "SELECT g.title, c.name AS category, r.completion_time
FROM runs r
JOIN games g ON r.game_id = g.game_id
JOIN categories c ON r.category_id = c.category_id
WHERE g.title = 'Super Mario 64' AND r.is_personal_best = 1",
    },
    FewShotExample {
        question: "How close am I to the world record for Hollow Knight Any%?",
        sql: "SELECT g.title, c.name, r.completion_time, c.world_record_time,
       (r.completion_time - c.world_record_time) AS time_difference
FROM runs r
JOIN games g ON r.game_id = g.game_id
JOIN categories c ON r.category_id = c.category_id
WHERE g.title = 'Hollow Knight' AND c.name = 'Any%' AND r.is_personal_best = 1",
    },
    FewShotExample {
        question: "Which game do I have the most categories for?",
        sql: "SELECT g.title, COUNT(c.category_id) AS category_count
FROM games g
JOIN categories c ON g.game_id = c.game_id
GROUP BY g.title
ORDER BY category_count DESC
LIMIT 1",
    },
];

const TRANSLATION_PREAMBLE: &str =
    "You are an AI assistant that converts natural language questions to SQL queries.";

const EXAMPLES_HEADER: &str =
    "Here are some examples of questions and their corresponding SQL queries:";

/// Rule lines shared by both prompting modes. The sentinel rule is appended
/// separately so it always quotes [`UNANSWERABLE_SENTINEL`].
const RULES: &[&str] = &[
    "Generate ONLY the SQL query without any explanations or markdown formatting",
    "Use standard SQLite syntax",
    "Include appropriate JOINs when needed",
    "Make sure column and table names match exactly with the schema",
    "If times need to be formatted for display, leave that to the application",
    "If the question is ambiguous, make a reasonable assumption",
];

const BOOLEAN_RULE: &str = "Use 1 and 0 for boolean values instead of TRUE and FALSE";

const NARRATION_INSTRUCTION: &str = "You are an AI assistant that converts SQL query results to natural language answers.
Please provide a clear, conversational response that answers the user's question based on the data.
Format any time values in a human-readable format (e.g., 3600 seconds as \"1 hour\").
Keep your response concise but informative.";

/// Build the translation prompt for `question` in the given mode.
///
/// The system instruction always carries [`SCHEMA_DESCRIPTION`] and the
/// rule set; [`PromptingMode::FewShot`] adds every entry of
/// [`FEW_SHOT_EXAMPLES`] between the schema and the rules. The user
/// message is the question text itself.
pub fn build_prompt(question: &str, mode: PromptingMode) -> PromptPair {
    let mut system = String::with_capacity(4096);
    system.push_str(TRANSLATION_PREAMBLE);
    system.push_str("\n\n");
    system.push_str(SCHEMA_DESCRIPTION);
    system.push_str("\n\n");

    if mode == PromptingMode::FewShot {
        system.push_str(EXAMPLES_HEADER);
        system.push_str("\n\n");
        system.push_str(&render_examples(FEW_SHOT_EXAMPLES));
    }

    system.push_str(&render_rules());

    PromptPair {
        system,
        user: question.to_string(),
    }
}

/// Render examples as `Question: …\nSQL: …` blocks separated by blank lines.
pub fn render_examples(examples: &[FewShotExample]) -> String {
    let mut out = String::new();
    for example in examples {
        out.push_str("Question: ");
        out.push_str(example.question);
        out.push_str("\nSQL: ");
        out.push_str(example.sql);
        out.push_str("\n\n");
    }
    out
}

fn render_rules() -> String {
    let sentinel_rule = format!(
        "If the query cannot be answered with the given schema, return \"{}\"",
        UNANSWERABLE_SENTINEL
    );

    let mut out = String::from("Rules:\n");
    let all = RULES
        .iter()
        .copied()
        .chain([sentinel_rule.as_str(), BOOLEAN_RULE]);
    for (i, rule) in all.enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rule));
    }
    out
}

/// Build the narration prompt that turns a result set into prose.
///
/// Rows are serialized to JSON; every scalar keeps its standard text form.
pub fn build_narration_prompt(question: &str, sql: &str, rows: &[Row]) -> Result<PromptPair> {
    let results = serde_json::to_string(rows)?;

    let user = format!(
        "Original question: {}\nSQL query used: {}\nQuery results: {}\n\n\
         Please provide a natural language answer to the original question based on these results.",
        question, sql, results
    );

    Ok(PromptPair {
        system: NARRATION_INSTRUCTION.to_string(),
        user,
    })
}
