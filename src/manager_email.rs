use std::time::Duration;
use log::info;
use reqwest::Client;
use serde_json::json;
use crate::errors::DispatchError;

/// Struct for dispatching alert mails through the transactional mail API
pub struct Emailer {
    client: Client,
    api_url: String,
    service_id: String,
    template_id: String,
    user_id: String,
}

impl Emailer {
    /// Returns an Emailer struct ready for dispatching alert mails
    ///
    /// # Arguments
    ///
    /// * 'api_url' - url of the mail API send endpoint
    /// * 'service_id' - mail service identifier
    /// * 'template_id' - mail template identifier
    /// * 'user_id' - API credential
    pub fn new(api_url: &str, service_id: &str, template_id: &str, user_id: &str) -> Result<Emailer, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            service_id: service_id.to_string(),
            template_id: template_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// Sends one alert mail naming the breaching cities.
    ///
    /// This is a single attempt, there is no retry or queueing of failed
    /// sends. The recipient address is validated first, so alert state
    /// already persisted by the caller survives a malformed address.
    ///
    /// # Arguments
    ///
    /// * 'email' - recipient address
    /// * 'breaching' - names of the breaching cities
    pub async fn send(&self, email: &str, breaching: &[String]) -> Result<(), DispatchError> {
        if !valid_email(email) {
            return Err(DispatchError::InvalidEmail(email.to_string()));
        }

        let city_names = breaching
            .iter()
            .map(|city| format!("<li>{}</li>", city))
            .collect::<String>();

        let body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.user_id,
            "template_params": {
                "to_email": email,
                "city_names": city_names,
            },
        });

        let resp = self.client
            .post(&self.api_url)
            .json(&body)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DispatchError::Send(format!("Error while sending alert mail: {}", status)));
        }

        info!("alert mail sent to {}", email);
        Ok(())
    }
}

/// Checks that an address has the local@domain.tld shape
pub fn valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
