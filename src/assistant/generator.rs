use anyhow::Result;

/// Pluggable response generator: input text in, reply text out.
///
/// Treated as synchronous-with-latency and side-effect free; the assistant
/// pipeline works with any implementation.
#[async_trait::async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, input: &str) -> Result<String>;
}

/// Canned recruiting answers keyed on the query text.
pub struct KeywordResponder;

#[async_trait::async_trait]
impl ResponseGenerator for KeywordResponder {
    async fn generate(&self, input: &str) -> Result<String> {
        let lowered = input.to_lowercase();

        let reply = if lowered.contains("job") {
            "We currently have 12 open positions. Our most active job is for \
             Senior Software Engineer with 42 applicants so far. Would you \
             like me to list more open positions?"
        } else if lowered.contains("candidate") {
            "We have 342 candidates in our pipeline right now. 158 have \
             applied, 84 are in screening, 42 are in the interview stage, \
             and 16 have received offers."
        } else if lowered.contains("interview") {
            "There are 28 interviews scheduled this week, with 12 interviews \
             scheduled for today. Would you like me to provide details about \
             any specific candidate?"
        } else {
            "I can help you with information about job postings, candidates \
             in your pipeline, or recruitment analytics. What would you like \
             to know?"
        };

        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_routing() {
        let responder = KeywordResponder;

        let reply = responder.generate("How many candidates?").await.unwrap();
        assert!(reply.contains("342 candidates"));

        let reply = responder.generate("any open JOBS?").await.unwrap();
        assert!(reply.contains("12 open positions"));

        let reply = responder.generate("what's for lunch").await.unwrap();
        assert!(reply.contains("What would you like to know?"));
    }
}
