use crate::domain::quiz::AnswerMap;
use crate::services::ServiceError;
use reqwest::StatusCode;
use serde::Serialize;

/// Fixed mapping from quiz answer keys to the prediction model's feature
/// names. Absent numeric answers default to 0. A pure transformation of the
/// finalized answer map, applied once at quiz completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "Work_Hours_Per_Week")]
    pub work_hours_per_week: f64,
    #[serde(rename = "Social_Media_Hours_Day")]
    pub social_media_hours_day: f64,
    #[serde(rename = "Work_Stress_Level")]
    pub work_stress_level: f64,
    #[serde(rename = "Sleep_Hours_Night")]
    pub sleep_hours_night: f64,
    #[serde(rename = "Screen_Time_Hours_Day")]
    pub screen_time_hours_day: f64,
    #[serde(rename = "Loneliness")]
    pub loneliness: f64,
    #[serde(rename = "Social_Support")]
    pub social_support: f64,
    // Follow-up answers, forwarded raw for backends that accept them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatigue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation: Option<f64>,
}

impl FeatureVector {
    pub fn from_answers(answers: &AnswerMap) -> Self {
        let number = |key: &str| answers.get(key).and_then(|v| v.as_number());
        let or_zero = |key: &str| number(key).unwrap_or(0.0);
        Self {
            work_hours_per_week: or_zero("workHours"),
            social_media_hours_day: or_zero("screen"),
            work_stress_level: or_zero("stress"),
            sleep_hours_night: or_zero("sleep"),
            screen_time_hours_day: or_zero("screen"),
            loneliness: or_zero("loneliness"),
            social_support: or_zero("socialSupport"),
            anxiety: number("anxiety"),
            fatigue: number("fatigue"),
            isolation: number("isolation"),
        }
    }
}

/// Decoded prediction result. `state`/`message` fall back to the generic
/// texts when the backend omits them; the rest is optional enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub state: String,
    pub message: String,
    pub risk_score: Option<i64>,
    pub extra_guidance: Vec<String>,
}

/// Client for the mental-state prediction endpoint.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    url: String,
}

impl PredictionClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn predict(&self, answers: &AnswerMap) -> Result<Prediction, ServiceError> {
        let payload = FeatureVector::from_answers(answers);
        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            ServiceError::server(Some(status), format!("invalid response body: {e}"))
        })?;
        decode_prediction(status, &body)
    }
}

fn decode_prediction(
    status: StatusCode,
    body: &serde_json::Value,
) -> Result<Prediction, ServiceError> {
    // The backend signals failure with an `error` field, usually alongside
    // a non-2xx status; the field text is surfaced verbatim.
    if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
        return Err(ServiceError::server(Some(status), error));
    }
    if !status.is_success() {
        return Err(ServiceError::server(
            Some(status),
            format!("prediction request failed with status {status}"),
        ));
    }

    let text = |key: &str| body.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let extra_guidance = body
        .get("extra_guidance")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Prediction {
        state: text("state").unwrap_or_else(|| "Unknown".to_string()),
        message: text("message").unwrap_or_else(|| "No message returned.".to_string()),
        risk_score: body.get("risk_score").and_then(|v| v.as_i64()),
        extra_guidance,
    })
}
