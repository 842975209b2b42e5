// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Results-ready email notifications, sent through an HTTP mail API.

use crate::config::Config;
use crate::error::AppError;
use uuid::Uuid;

/// Mail API client.
#[derive(Clone)]
pub struct MailService {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl MailService {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mail_api_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )
    }

    /// Send the results-ready notification for a request.
    ///
    /// The link is supplied by the dashboard (it knows the portal's
    /// results URL layout); this service only delivers it.
    pub async fn send_results_ready(
        &self,
        to: &str,
        request_id: Uuid,
        link: &str,
    ) -> Result<(), AppError> {
        if self.api_url.is_empty() {
            return Err(AppError::MailApi(
                "Mail delivery is not configured (MAIL_API_URL is empty)".to_string(),
            ));
        }

        let body = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": results_ready_subject(request_id),
            "text": results_ready_body(request_id, link),
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::MailApi(format!("Mail send failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::MailApi(format!(
                "Mail API returned {}: {}",
                status, detail
            )));
        }

        tracing::info!(%request_id, "Results-ready email sent");
        Ok(())
    }
}

fn results_ready_subject(request_id: Uuid) -> String {
    format!("Results Ready for Request ID {}", request_id)
}

fn results_ready_body(request_id: Uuid, link: &str) -> String {
    format!(
        "Hello,\n\n\
         The results for request ID {} are now ready. \
         You can view the results by following this link:\n{}\n\
         Best regards,\nPaveVision",
        request_id, link
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_contains_request_id_and_link() {
        let id = Uuid::new_v4();
        let body = results_ready_body(id, "https://portal.example/results/abc");

        assert!(body.contains(&id.to_string()));
        assert!(body.contains("https://portal.example/results/abc"));
        assert!(body.ends_with("Best regards,\nPaveVision"));
    }

    #[test]
    fn test_subject_names_the_request() {
        let id = Uuid::new_v4();
        assert_eq!(
            results_ready_subject(id),
            format!("Results Ready for Request ID {}", id)
        );
    }

    #[tokio::test]
    async fn test_unconfigured_mail_is_an_error() {
        let service = MailService::new(String::new(), String::new(), "noreply@x".to_string());
        let err = service
            .send_results_ready("user@example.com", Uuid::new_v4(), "https://x")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MailApi(_)));
    }
}
