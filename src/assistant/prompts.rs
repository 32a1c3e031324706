//! Prompt text for the assistant endpoints.

pub const TUTOR_SYSTEM: &str = "You are a teaching assistant for an online course platform. \
Answer the learner's question using the lesson material when it is provided. \
Be concise and concrete. If the material does not cover the question, say so \
and answer from general knowledge.";

pub const QUIZ_DRAFT_SYSTEM: &str = "You generate quiz definitions for an online course platform. \
Respond with a single JSON object and nothing else: no prose, no markdown fences. \
The object has the shape \
{\"passing_score\": <0-100>, \"questions\": [{\"prompt\": string, \
\"kind\": \"single\" | \"multiple\" | \"text\", \"options\": [string], \
\"answer_key\": string | [string], \"points\": number}]}. \
Rules: for \"single\" the answer_key is exactly one of the options; for \
\"multiple\" it is an array of distinct options; for \"text\" it is the exact \
expected answer string and options is []. Points must be positive.";

pub fn quiz_draft_request(topic: &str, question_count: usize, lesson_context: Option<&str>) -> String {
    let mut request = format!(
        "Write a quiz with {} questions about: {}. Mix question kinds where sensible.",
        question_count, topic
    );
    if let Some(body) = lesson_context {
        request.push_str("\n\nBase the questions on this lesson material:\n");
        request.push_str(body);
    }
    request
}
