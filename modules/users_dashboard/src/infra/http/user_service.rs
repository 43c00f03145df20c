use std::time::Duration;

use async_trait::async_trait;
use tracing::{field, instrument, Instrument};
use url::Url;

use crate::config::UsersDashboardConfig;
use crate::contract::client::RemoteUserService;
use crate::contract::error::RemoteError;
use crate::contract::model::{UpdateResponse, UserRecord};
use crate::infra::http::dto::UserDto;

/// REST adapter implementing the RemoteUserService port.
///
/// `base` is the collection URL (e.g. `https://jsonplaceholder.typicode.com/users`);
/// single users live under `base/{id}`.
#[derive(Clone)]
pub struct HttpUserService {
    client: reqwest::Client,
    base: Url,
}

impl HttpUserService {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Build the adapter with its own client honouring the configured timeout
    pub fn from_config(config: &UsersDashboardConfig) -> Result<Self, RemoteError> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| RemoteError::transport(format!("invalid api_url '{}': {e}", config.api_url)))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::transport(e.to_string()))?;
        Ok(Self::new(client, base))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn item_url(&self, id: u64) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::transport("invalid users base URL"))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    /// Send one request inside an `outgoing_http` span and reject non-2xx
    /// statuses.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteError> {
        let request = request
            .build()
            .map_err(|e| RemoteError::transport(e.to_string()))?;

        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %request.method(),
            http.url = %request.url(),
            http.status_code = field::Empty,
            otel.kind = "client",
        );

        let response = self
            .client
            .execute(request)
            .instrument(span.clone())
            .await
            .map_err(|e| RemoteError::transport(e.to_string()))?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if !status.is_success() {
            return Err(RemoteError::status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteUserService for HttpUserService {
    #[instrument(name = "users_dashboard.http.list_users", skip_all, fields(base = %self.base))]
    async fn list_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        let response = self.execute(self.client.get(self.base.clone())).await?;
        let users: Vec<UserDto> = response
            .json()
            .await
            .map_err(|e| RemoteError::decode(e.to_string()))?;
        // Listed users must carry their own id
        users
            .into_iter()
            .map(|u| match u.id {
                Some(id) => Ok(u.into_record(id)),
                None => Err(RemoteError::decode(format!(
                    "listed user '{}' has no id",
                    u.name
                ))),
            })
            .collect()
    }

    #[instrument(name = "users_dashboard.http.create_user", skip_all, fields(base = %self.base))]
    async fn create_user(&self, draft: &UserRecord) -> Result<UserRecord, RemoteError> {
        let body = UserDto::from(draft);
        let response = self
            .execute(self.client.post(self.base.clone()).json(&body))
            .await?;
        let created: UserDto = response
            .json()
            .await
            .map_err(|e| RemoteError::decode(e.to_string()))?;
        Ok(created.into_record(draft.id))
    }

    #[instrument(name = "users_dashboard.http.update_user", skip_all, fields(user_id = id))]
    async fn update_user(
        &self,
        id: u64,
        record: &UserRecord,
    ) -> Result<UpdateResponse, RemoteError> {
        let body = UserDto::from(record);
        let response = self
            .execute(self.client.put(self.item_url(id)?).json(&body))
            .await?;
        let status = response.status().as_u16();
        // The echo is informational; an unreadable body does not fail the call
        let body = response
            .json::<UserDto>()
            .await
            .ok()
            .map(|dto| dto.into_record(id));
        Ok(UpdateResponse { status, body })
    }

    #[instrument(name = "users_dashboard.http.delete_user", skip_all, fields(user_id = id))]
    async fn delete_user(&self, id: u64) -> Result<(), RemoteError> {
        self.execute(self.client.delete(self.item_url(id)?)).await?;
        Ok(())
    }
}
