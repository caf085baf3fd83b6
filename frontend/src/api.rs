use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{
    CategoryTotal, CreatedExpense, Expense, Health, MonthlyTotal, NewExpense, Prediction,
    PredictionRequest, TotalSpending,
};

/// The remote expense service, as the dashboard sees it.
#[async_trait(?Send)]
pub trait ExpenseApi {
    async fn create_expense(&self, expense: &NewExpense) -> Result<CreatedExpense, ApiError>;

    async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError>;

    async fn delete_expense(&self, id: i64) -> Result<(), ApiError>;

    async fn predict(&self, description: &str) -> Result<Prediction, ApiError>;

    async fn category_totals(&self) -> Result<Vec<CategoryTotal>, ApiError>;

    async fn total_spending(&self) -> Result<TotalSpending, ApiError>;

    async fn monthly_totals(&self) -> Result<Vec<MonthlyTotal>, ApiError>;

    async fn categories(&self) -> Result<Vec<String>, ApiError>;

    async fn health(&self) -> Result<Health, ApiError>;
}

/// Error body the server sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `ExpenseApi` over `fetch`, rooted at a base such as "/api".
#[derive(Debug, Clone, PartialEq)]
pub struct HttpApi {
    base: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        log::debug!("GET request to: {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| network_error("GET", endpoint, e))?;

        let response = check_status("GET", endpoint, response).await?;
        decode("GET", endpoint, &response).await
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        let url = self.url(endpoint);
        log::debug!("POST request to: {}", url);

        let response = Request::post(&url)
            .json(body)
            .map_err(|e| {
                log::error!("POST {} - failed to serialize request: {}", endpoint, e);
                ApiError::Encode(e.to_string())
            })?
            .send()
            .await
            .map_err(|e| network_error("POST", endpoint, e))?;

        let response = check_status("POST", endpoint, response).await?;
        decode("POST", endpoint, &response).await
    }

    async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        let url = self.url(endpoint);
        log::debug!("DELETE request to: {}", url);

        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| network_error("DELETE", endpoint, e))?;

        check_status("DELETE", endpoint, response).await?;
        log::info!("DELETE {} - Success", endpoint);
        Ok(())
    }
}

fn network_error(method: &str, endpoint: &str, err: gloo_net::Error) -> ApiError {
    log::error!("{} {} - request failed: {}", method, endpoint, err);
    ApiError::Network(err.to_string())
}

async fn check_status(method: &str, endpoint: &str, response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    log::warn!("{} {} - Non-OK response: {}", method, endpoint, status);
    match response.json::<ErrorBody>().await {
        Ok(body) => {
            log::error!("{} {} - API error: {}", method, endpoint, body.error);
            Err(ApiError::Server {
                status,
                message: body.error,
            })
        }
        Err(_) => Err(ApiError::Status(status)),
    }
}

async fn decode<T: DeserializeOwned>(
    method: &str,
    endpoint: &str,
    response: &Response,
) -> Result<T, ApiError> {
    log::trace!("{} {} - Response received, parsing JSON", method, endpoint);
    let parsed = response.json::<T>().await.map_err(|e| {
        log::error!("{} {} - failed to parse response: {}", method, endpoint, e);
        ApiError::Decode(e.to_string())
    })?;
    log::info!("{} {} - Success", method, endpoint);
    Ok(parsed)
}

#[async_trait(?Send)]
impl ExpenseApi for HttpApi {
    async fn create_expense(&self, expense: &NewExpense) -> Result<CreatedExpense, ApiError> {
        self.post("/expenses", expense).await
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError> {
        self.get("/expenses").await
    }

    async fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/expenses/{}", id)).await
    }

    async fn predict(&self, description: &str) -> Result<Prediction, ApiError> {
        self.post("/predict", &PredictionRequest { description }).await
    }

    async fn category_totals(&self) -> Result<Vec<CategoryTotal>, ApiError> {
        self.get("/analytics/categories").await
    }

    async fn total_spending(&self) -> Result<TotalSpending, ApiError> {
        self.get("/analytics/total").await
    }

    async fn monthly_totals(&self) -> Result<Vec<MonthlyTotal>, ApiError> {
        self.get("/analytics/monthly").await
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.get("/categories").await
    }

    async fn health(&self) -> Result<Health, ApiError> {
        self.get("/health").await
    }
}
