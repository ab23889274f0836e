use crate::types::QuestionRecord;
use redis::{AsyncCommands, RedisResult};

/// Redis key semantics for the question catalog
/// The catalog owner writes, the judge only reads

pub const QUESTION_PREFIX: &str = "codemode:question";

/// Generate the key a question document is stored under
pub fn question_key(question_id: &str) -> String {
    format!("{}:{}", QUESTION_PREFIX, question_id)
}

/// Store a question document (used by seeding and tests, never by the judge)
pub async fn store_question(
    conn: &mut redis::aio::ConnectionManager,
    question_id: &str,
    question: &QuestionRecord,
) -> RedisResult<()> {
    let payload = serde_json::to_string(question)
        .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "serialization error", e.to_string())))?;

    conn.set(question_key(question_id), payload).await
}

/// Retrieve a question document
pub async fn get_question(
    conn: &mut redis::aio::ConnectionManager,
    question_id: &str,
) -> RedisResult<Option<QuestionRecord>> {
    let payload: Option<String> = conn.get(question_key(question_id)).await?;

    match payload {
        Some(data) => {
            let question: QuestionRecord = serde_json::from_str(&data)
                .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "deserialization error", e.to_string())))?;
            Ok(Some(question))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_key_format() {
        assert_eq!(question_key("abc123"), "codemode:question:abc123");
    }

    #[test]
    fn test_question_key_deterministic() {
        assert_eq!(question_key("652f1c"), question_key("652f1c"));
        assert_ne!(question_key("a"), question_key("b"));
    }
}
