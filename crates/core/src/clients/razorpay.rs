use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::clients_dto::{CreateOrderRequest, RazorpayOrder};
use tracing::{error, warn};

#[derive(Clone)]
pub struct RazorpayClient {
    http: Client,
    base_url: Url,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    pub fn new(
        http: Client,
        base_url: &str,
        key_id: String,
        key_secret: SecretString,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::Internal("Invalid Razorpay base URL".into()))?;

        Ok(Self {
            http,
            base_url,
            key_id,
            key_secret,
        })
    }

    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RazorpayOrder, ApiError> {
        let url = self
            .base_url
            .join("/v1/orders")
            .map_err(|_| ApiError::Internal("Invalid Razorpay URL path".into()))?;

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&CreateOrderRequest {
                amount,
                currency,
                receipt,
            })
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Razorpay unreachable");
                ApiError::Upstream("Payment gateway unreachable".into())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Razorpay rejected order");
            return Err(ApiError::Upstream(format!(
                "Payment gateway returned {}",
                status
            )));
        }

        resp.json::<RazorpayOrder>()
            .await
            .map_err(|_| ApiError::Upstream("Invalid Razorpay response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> RazorpayClient {
        RazorpayClient::new(
            Client::new(),
            base,
            "rzp_test_key".into(),
            SecretString::new("rzp_test_secret".into()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn creates_order_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_9A33XWu170gUtm",
                "amount": 50000,
                "currency": "INR",
                "receipt": "order#1",
                "status": "created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let order = client(&server.uri())
            .create_order(50000, "INR", "order#1")
            .await
            .unwrap();

        assert_eq!(order.id, "order_9A33XWu170gUtm");
        assert_eq!(order.amount, 50000);
    }

    #[tokio::test]
    async fn gateway_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .create_order(100, "INR", "order#1")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
