use gloo::net::http::Request;
use wordsnake_core::{GameError, QuestionBank};

pub(crate) const BANK_URL: &str = "quiz-data.json";

/// One-shot load of the question bank at startup. Failure is terminal for
/// the app; there is no retry.
pub(crate) async fn fetch_bank() -> Result<QuestionBank, GameError> {
    let response = Request::get(BANK_URL)
        .send()
        .await
        .map_err(|err| GameError::LoadFailure(err.to_string()))?;

    if !response.ok() {
        return Err(GameError::LoadFailure(format!(
            "HTTP {} fetching {}",
            response.status(),
            BANK_URL
        )));
    }

    let text = response
        .text()
        .await
        .map_err(|err| GameError::LoadFailure(err.to_string()))?;

    QuestionBank::from_json(&text)
}
