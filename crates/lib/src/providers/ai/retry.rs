use crate::{errors::PromptError, providers::ai::AiProvider};
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u8 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Runs one generation call bounded by `timeout`, retrying once on a transient
/// transport failure. API errors and empty answers are returned immediately.
pub async fn generate_with_retry(
    provider: &dyn AiProvider,
    system_prompt: &str,
    user_prompt: &str,
    timeout: Duration,
) -> Result<String, PromptError> {
    let mut attempt: u8 = 0;
    loop {
        attempt += 1;
        let result = match tokio::time::timeout(
            timeout,
            provider.generate(system_prompt, user_prompt),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PromptError::Timeout(timeout)),
        };

        match result {
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!("Generation attempt {attempt}/{MAX_ATTEMPTS} failed, retrying: {e}");
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            other => return other,
        }
    }
}
