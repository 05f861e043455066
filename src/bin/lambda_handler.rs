//! AWS Lambda handler for the cash-flow forecast API
//!
//! Routes (Lambda Function URL events):
//! - `POST /api/forecast/` with a farm profile, returns the forecast report
//! - `POST /api/loan/` with loan terms, returns monthly and total repayment

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use farm_cashflow::{FarmProfile, ForecastError, ForecastReport, LoanTerms};
use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub loan_balance: f64,
    pub loan_rate: f64,
    /// Whole years; `10.0` is accepted, `10.5` is rejected
    pub loan_term_years: f64,
}

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub monthly_repayment: f64,
    pub total_repayment: f64,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub farm_name: String,
    #[serde(flatten)]
    pub report: ForecastReport,
    pub execution_time_us: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Status code and JSON body for one request
type Reply = (u16, String);

fn json_reply<T: Serialize>(status: u16, body: &T) -> Reply {
    match serde_json::to_string(body) {
        Ok(text) => (status, text),
        Err(e) => error_reply(500, &format!("Failed to serialize response: {}", e)),
    }
}

fn error_reply(status: u16, message: &str) -> Reply {
    let body = ErrorBody {
        error: message.to_string(),
    };
    // A single string field always serializes
    (status, serde_json::to_string(&body).unwrap_or_default())
}

fn forecast_error_reply(e: &ForecastError) -> Reply {
    let status = if e.is_validation() { 422 } else { 500 };
    error_reply(status, &e.to_string())
}

fn handle_forecast(body: &str) -> Reply {
    let start = std::time::Instant::now();

    let profile: FarmProfile = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => return error_reply(400, &format!("Invalid JSON: {}", e)),
    };

    match profile.forecast() {
        Ok(result) => {
            info!("forecast for {} in {:?}", profile.display_name(), start.elapsed());
            json_reply(
                200,
                &ForecastResponse {
                    farm_name: profile.farm_name.clone(),
                    report: result.report(),
                    execution_time_us: start.elapsed().as_micros() as u64,
                },
            )
        }
        Err(e) => {
            warn!("rejected forecast for {}: {}", profile.display_name(), e);
            forecast_error_reply(&e)
        }
    }
}

fn handle_loan(body: &str) -> Reply {
    let request: LoanRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return error_reply(400, &format!("Invalid JSON: {}", e)),
    };

    let summary = LoanTerms::from_inputs(
        request.loan_balance,
        request.loan_rate,
        request.loan_term_years,
    )
    .and_then(|loan| loan.summary());
    match summary {
        Ok(s) => json_reply(
            200,
            &LoanResponse {
                monthly_repayment: s.monthly_repayment,
                total_repayment: s.total_repayment,
            },
        ),
        Err(e) => forecast_error_reply(&e),
    }
}

/// Dispatch on method and path. Trailing slashes are optional.
fn route(method: &str, path: &str, body: &str) -> Reply {
    if method == "OPTIONS" {
        return (200, String::new());
    }

    match (method, path.trim_end_matches('/')) {
        ("POST", "/api/forecast") => handle_forecast(body),
        ("POST", "/api/loan") => handle_loan(body),
        (_, "/api/forecast") | (_, "/api/loan") => error_reply(405, "Method not allowed"),
        _ => error_reply(404, "Not found"),
    }
}

/// CORS headers on every reply, plus Content-Type when there is a body
fn response_headers(has_body: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn into_response((status, body): Reply) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code: i64::from(status),
        headers: response_headers(!body.is_empty()),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    let method = request
        .request_context
        .http
        .method
        .clone()
        .unwrap_or_else(|| "GET".to_string());
    let path = request.raw_path.clone().unwrap_or_default();

    let reply = if request.is_base64_encoded {
        error_reply(400, "Binary request bodies are not supported")
    } else {
        route(&method, &path, request.body.as_deref().unwrap_or("{}"))
    };

    Ok(into_response(reply))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
