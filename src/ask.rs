use anyhow::Result;
use speedrun_query_core::models::{PromptingMode, Question};
use speedrun_query_core::pipeline::Assistant;

use crate::format::render_table;
use crate::response::{answer_question, QueryResponse};

/// Answer `question` and print it, or the JSON envelope when `json` is set.
pub async fn run_ask(
    assistant: &Assistant,
    question: &Question,
    mode: PromptingMode,
    json: bool,
) -> Result<()> {
    let response = answer_question(assistant, question, mode).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_response(&response));
    }
    Ok(())
}

/// Answer first, then the technical details.
pub fn render_response(response: &QueryResponse) -> String {
    let mut out = String::new();
    out.push_str("Answer\n======\n");
    out.push_str(&response.answer);
    out.push_str("\n\n");

    out.push_str(&format!(
        "Processing time: {:.2} seconds ({})\n",
        response.elapsed_ms as f64 / 1000.0,
        response.mode
    ));

    if let Some(sql) = &response.sql {
        out.push_str("\nSQL query:\n");
        out.push_str(sql);
        out.push('\n');
    }

    if let Some(rows) = response.data.as_ref().filter(|rows| !rows.is_empty()) {
        out.push_str("\nResults:\n");
        out.push_str(&render_table(rows));
    }
    out
}
