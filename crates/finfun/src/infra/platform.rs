use finfun_core::{
    ApiErrorBody, CompleteQuest, Competition, JoinRequest, NotificationSettings, QuestList,
    QuestSummary, ReferralCode, ReferralSource, SubmitReferral, WalletBalance, WithdrawRequest,
};
use hyper::header::{ACCEPT, AUTHORIZATION};
use log::{debug, error, warn};
use mime::APPLICATION_JSON;
use reqwest_middleware::{
    reqwest::{Method, Response, StatusCode, Url},
    ClientWithMiddleware, RequestBuilder,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("problem sending request to platform: {0}")]
    Send(#[from] reqwest_middleware::Error),
    #[error("problem reading platform response: {0}")]
    Response(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem requesting platform: {0}")]
    Request(String),
}

impl Error {
    /// Message safe to show next to the control that triggered the call
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound(msg) | Error::BadRequest(msg) | Error::Unauthorized(msg) => {
                msg.clone()
            }
            Error::Request(msg) => msg.clone(),
            Error::Send(_) | Error::Response(_) => {
                String::from("Unable to reach finfun right now, please try again.")
            }
        }
    }
}

/// Maps a non-2xx platform response onto an error, preferring the `{error}` body
pub fn error_for_status(status: StatusCode, body: &str, not_found_message: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|msg| !msg.trim().is_empty());

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message.unwrap_or(not_found_message.to_string())),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            Error::BadRequest(message.unwrap_or(String::from("bad request to platform")))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(
            message.unwrap_or(String::from("Your session has expired. Please log in again.")),
        ),
        status => Error::Request(
            message.unwrap_or(format!("error response from platform with status {}", status)),
        ),
    }
}

/// Parses a competition list item by item; entries with an unknown kind or
/// malformed timestamps are dropped instead of failing the whole page.
pub fn parse_competitions(values: Vec<serde_json::Value>) -> Vec<Competition> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Competition>(value) {
            Ok(competition) => Some(competition),
            Err(e) => {
                warn!("skipping competition the platform sent in an unknown shape: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    async fn list_competitions(&self, token: &SecretString) -> Result<Vec<Competition>, Error>;
    async fn my_activities(&self, token: &SecretString) -> Result<Vec<Competition>, Error>;
    async fn get_competition(&self, competition_id: &str) -> Result<Competition, Error>;
    async fn join_competition(
        &self,
        token: &SecretString,
        competition_id: &str,
        request: &JoinRequest,
    ) -> Result<(), Error>;
    async fn wallet_balance(&self, token: &SecretString) -> Result<WalletBalance, Error>;
    async fn withdraw(&self, token: &SecretString, request: &WithdrawRequest) -> Result<(), Error>;
    async fn quests(&self, token: &SecretString) -> Result<QuestList, Error>;
    async fn quest_summary(&self, token: &SecretString) -> Result<QuestSummary, Error>;
    async fn complete_quest(
        &self,
        token: &SecretString,
        request: &CompleteQuest,
    ) -> Result<(), Error>;
    async fn referral_code(&self, token: &SecretString) -> Result<ReferralCode, Error>;
    async fn referral_source(&self, token: &SecretString) -> Result<ReferralSource, Error>;
    async fn submit_referral(
        &self,
        token: &SecretString,
        request: &SubmitReferral,
    ) -> Result<(), Error>;
    async fn notification_settings(
        &self,
        token: &SecretString,
    ) -> Result<NotificationSettings, Error>;
    async fn update_notification_settings(
        &self,
        token: &SecretString,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, Error>;
    async fn verify(
        &self,
        token: &SecretString,
        referral_code: Option<String>,
    ) -> Result<serde_json::Value, Error>;
}

#[derive(Clone)]
pub struct PlatformClient {
    pub base_url: Url,
    pub client: ClientWithMiddleware,
}

impl PlatformClient {
    pub fn new(client: ClientWithMiddleware, base_url: &Url) -> Self {
        Self {
            base_url: base_url.to_owned(),
            client,
        }
    }

    /// Builds `<base>/api/<segments..>`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Request(format!("invalid platform url: {}", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&SecretString>) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(ACCEPT, APPLICATION_JSON.to_string());

        match token {
            Some(token) => {
                request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        not_found_message: &str,
    ) -> Result<Response, Error> {
        let response = request.send().await.map_err(|e| {
            error!("error sending to platform: {}", e);
            Error::Send(e)
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!("platform responded {} with body: {}", status, body);
        Err(error_for_status(status, &body, not_found_message))
    }

    async fn get_json<T>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
        not_found_message: &str,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.url(segments)?;
        let response = self
            .send(self.request(Method::GET, url, token), not_found_message)
            .await?;
        response.json::<T>().await.map_err(Into::into)
    }

    async fn get_competition_list(
        &self,
        segments: &[&str],
        token: &SecretString,
    ) -> Result<Vec<Competition>, Error> {
        let values: Vec<serde_json::Value> = self
            .get_json(segments, Some(token), "competitions not found")
            .await?;
        Ok(parse_competitions(values))
    }
}

#[async_trait::async_trait]
impl Platform for PlatformClient {
    async fn list_competitions(&self, token: &SecretString) -> Result<Vec<Competition>, Error> {
        self.get_competition_list(&["competitions"], token).await
    }

    async fn my_activities(&self, token: &SecretString) -> Result<Vec<Competition>, Error> {
        self.get_competition_list(&["competitions", "my-activities"], token)
            .await
    }

    async fn get_competition(&self, competition_id: &str) -> Result<Competition, Error> {
        self.get_json(
            &["competitions", competition_id],
            None,
            &format!("competition with id {} not found", competition_id),
        )
        .await
    }

    async fn join_competition(
        &self,
        token: &SecretString,
        competition_id: &str,
        request: &JoinRequest,
    ) -> Result<(), Error> {
        let url = self.url(&["competitions", competition_id, "join"])?;
        self.send(
            self.request(Method::POST, url, Some(token)).json(request),
            &format!("competition with id {} not found", competition_id),
        )
        .await?;
        Ok(())
    }

    async fn wallet_balance(&self, token: &SecretString) -> Result<WalletBalance, Error> {
        self.get_json(&["wallet", "balance"], Some(token), "wallet not found")
            .await
    }

    async fn withdraw(&self, token: &SecretString, request: &WithdrawRequest) -> Result<(), Error> {
        let url = self.url(&["withdraw"])?;
        self.send(
            self.request(Method::POST, url, Some(token)).json(request),
            "wallet not found",
        )
        .await?;
        Ok(())
    }

    async fn quests(&self, token: &SecretString) -> Result<QuestList, Error> {
        self.get_json(&["quests"], Some(token), "quests not found")
            .await
    }

    async fn quest_summary(&self, token: &SecretString) -> Result<QuestSummary, Error> {
        self.get_json(&["quests", "summary"], Some(token), "quest summary not found")
            .await
    }

    async fn complete_quest(
        &self,
        token: &SecretString,
        request: &CompleteQuest,
    ) -> Result<(), Error> {
        let url = self.url(&["quests", "complete"])?;
        self.send(
            self.request(Method::POST, url, Some(token)).json(request),
            &format!("quest with id {} not found", request.quest_id),
        )
        .await?;
        Ok(())
    }

    async fn referral_code(&self, token: &SecretString) -> Result<ReferralCode, Error> {
        self.get_json(&["referral", "code"], Some(token), "referral code not found")
            .await
    }

    async fn referral_source(&self, token: &SecretString) -> Result<ReferralSource, Error> {
        self.get_json(&["referral", "from"], Some(token), "referral not found")
            .await
    }

    async fn submit_referral(
        &self,
        token: &SecretString,
        request: &SubmitReferral,
    ) -> Result<(), Error> {
        let url = self.url(&["referral"])?;
        self.send(
            self.request(Method::POST, url, Some(token)).json(request),
            "referral code not found",
        )
        .await?;
        Ok(())
    }

    async fn notification_settings(
        &self,
        token: &SecretString,
    ) -> Result<NotificationSettings, Error> {
        self.get_json(&["user", "settings"], Some(token), "settings not found")
            .await
    }

    async fn update_notification_settings(
        &self,
        token: &SecretString,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, Error> {
        let url = self.url(&["user", "settings"])?;
        let response = self
            .send(
                self.request(Method::PUT, url, Some(token)).json(settings),
                "settings not found",
            )
            .await?;
        // Some deployments answer with an empty body, echo what was stored
        Ok(response.json().await.unwrap_or(*settings))
    }

    async fn verify(
        &self,
        token: &SecretString,
        referral_code: Option<String>,
    ) -> Result<serde_json::Value, Error> {
        let mut url = self.url(&["verify"])?;
        if let Some(code) = referral_code.filter(|code| !code.trim().is_empty()) {
            url.query_pairs_mut().append_pair("ref", code.trim());
        }
        let response = self
            .send(self.request(Method::GET, url, Some(token)), "user not found")
            .await?;
        response.json().await.map_err(Into::into)
    }
}
