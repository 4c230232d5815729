//! High-level client composing transport, executor and poller.
//!
//! [`DigitalOceanClient`] is the convenience surface for everyday calls.
//! Mutating droplet calls first wait for the droplet to be idle, so two
//! actions against the same droplet never overlap; a poll time-out is
//! logged and the call proceeds anyway.
//!
//! # Example
//!
//! ```rust,ignore
//! use digitalocean_api::{ApiToken, Credentials, DigitalOceanClient, DigitalOceanConfig};
//!
//! let config = DigitalOceanConfig::builder()
//!     .credentials(Credentials::bearer(ApiToken::new(std::env::var("DO_TOKEN")?)?))
//!     .build()?;
//! let client = DigitalOceanClient::new(config)?;
//!
//! let droplet = client.launch("web-1", "nyc3", "s-1vcpu-1gb", "ubuntu-24-04-x64").await?;
//! client.stop(&droplet.id.to_string(), true).await?;
//! client.resize(&droplet.id.to_string(), "s-2vcpu-4gb", true).await?;
//! client.start(&droplet.id.to_string(), false).await?;
//! ```

use tracing::warn;

use crate::actions::{ActionExecutor, ActionRequest, CompletionPoller, PollOutcome};
use crate::clients::Transport;
use crate::config::DigitalOceanConfig;
use crate::rest::resources::{ActionRecord, Droplet, Entity, Image, Region, Size, SshKey};
use crate::rest::{ResourceError, ResourceKind};

/// Client for the DigitalOcean API.
///
/// # Thread Safety
///
/// `DigitalOceanClient` is `Clone`, `Send` and `Sync`; clones share one
/// connection pool and one concurrency bound.
#[derive(Clone, Debug)]
pub struct DigitalOceanClient {
    config: DigitalOceanConfig,
    transport: Transport,
    executor: ActionExecutor,
    poller: CompletionPoller,
}

// Verify DigitalOceanClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DigitalOceanClient>();
};

impl DigitalOceanClient {
    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the HTTP client cannot be created.
    pub fn new(config: DigitalOceanConfig) -> Result<Self, ResourceError> {
        let transport = Transport::new(&config)?;
        let executor = ActionExecutor::new(transport.clone());
        let poller = CompletionPoller::new(
            transport.clone(),
            config.poll_interval(),
            config.poll_timeout(),
        );

        Ok(Self {
            config,
            transport,
            executor,
            poller,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DigitalOceanConfig {
        &self.config
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the action executor.
    #[must_use]
    pub const fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Returns the completion poller.
    #[must_use]
    pub const fn poller(&self) -> &CompletionPoller {
        &self.poller
    }

    /// Lists every element of a collection kind.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<Entity>, ResourceError> {
        self.transport.list(kind, None, &[]).await
    }

    /// Fetches one object of a singular kind; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// See [`Transport::get`].
    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Option<Entity>, ResourceError> {
        self.transport.get(kind, id).await
    }

    async fn list_typed<T>(&self, kind: ResourceKind) -> Result<Vec<T>, ResourceError>
    where
        T: TryFrom<Entity>,
    {
        Ok(self
            .list(kind)
            .await?
            .into_iter()
            .filter_map(|entity| T::try_from(entity).ok())
            .collect())
    }

    /// Lists all droplets.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn droplets(&self) -> Result<Vec<Droplet>, ResourceError> {
        self.list_typed(ResourceKind::Droplets).await
    }

    /// Fetches one droplet; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// See [`Transport::get`].
    pub async fn droplet(&self, id: &str) -> Result<Option<Droplet>, ResourceError> {
        Ok(self
            .get(ResourceKind::Droplet, id)
            .await?
            .and_then(|entity| Droplet::try_from(entity).ok()))
    }

    /// Lists all regions.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn regions(&self) -> Result<Vec<Region>, ResourceError> {
        self.list_typed(ResourceKind::Regions).await
    }

    /// Lists all sizes.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn sizes(&self) -> Result<Vec<Size>, ResourceError> {
        self.list_typed(ResourceKind::Sizes).await
    }

    /// Lists all images.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn images(&self) -> Result<Vec<Image>, ResourceError> {
        self.list_typed(ResourceKind::Images).await
    }

    /// Lists the SSH keys of the account.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn ssh_keys(&self) -> Result<Vec<SshKey>, ResourceError> {
        self.list_typed(ResourceKind::Keys).await
    }

    /// Lists the action history of a droplet.
    ///
    /// # Errors
    ///
    /// See [`Transport::list`].
    pub async fn droplet_actions(&self, droplet_id: &str) -> Result<Vec<ActionRecord>, ResourceError> {
        Ok(self
            .transport
            .list(ResourceKind::DropletActions, Some(droplet_id), &[])
            .await?
            .into_iter()
            .filter_map(|entity| ActionRecord::try_from(entity).ok())
            .collect())
    }

    /// Creates a droplet.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] if an argument is empty and the
    /// usual provider and transport errors otherwise.
    pub async fn launch(
        &self,
        name: &str,
        region: &str,
        size: &str,
        image: &str,
    ) -> Result<Droplet, ResourceError> {
        let mut action = ActionRequest::create_droplet();
        for (key, value) in [("name", name), ("region", region), ("size", size), ("image", image)] {
            if !value.trim().is_empty() {
                action = action.param(key, value);
            }
        }

        let entity = self.executor.perform(&action, None).await?;
        entity
            .and_then(|e| Droplet::try_from(e).ok())
            .ok_or_else(|| ResourceError::Parse {
                kind: ResourceKind::Droplet,
                reason: "create response did not contain a droplet".to_string(),
            })
    }

    /// Destroys a droplet once it is idle.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the droplet does not exist.
    pub async fn terminate(&self, droplet_id: &str) -> Result<(), ResourceError> {
        self.gate(droplet_id).await;
        self.executor
            .perform(&ActionRequest::delete_droplet(), Some(droplet_id))
            .await?;
        Ok(())
    }

    /// Powers a droplet on.
    ///
    /// With `wait`, returns only after the droplet is idle again.
    ///
    /// # Errors
    ///
    /// See [`ActionExecutor::perform`].
    pub async fn start(&self, droplet_id: &str, wait: bool) -> Result<ActionRecord, ResourceError> {
        self.droplet_action(ActionRequest::power_on(), droplet_id, wait).await
    }

    /// Powers a droplet off.
    ///
    /// # Errors
    ///
    /// See [`ActionExecutor::perform`].
    pub async fn stop(&self, droplet_id: &str, wait: bool) -> Result<ActionRecord, ResourceError> {
        self.droplet_action(ActionRequest::power_off(), droplet_id, wait).await
    }

    /// Reboots a droplet.
    ///
    /// # Errors
    ///
    /// See [`ActionExecutor::perform`].
    pub async fn reboot(&self, droplet_id: &str, wait: bool) -> Result<ActionRecord, ResourceError> {
        self.droplet_action(ActionRequest::reboot(), droplet_id, wait).await
    }

    /// Resizes a droplet to the size slug `size`.
    ///
    /// # Errors
    ///
    /// See [`ActionExecutor::perform`].
    pub async fn resize(
        &self,
        droplet_id: &str,
        size: &str,
        wait: bool,
    ) -> Result<ActionRecord, ResourceError> {
        self.droplet_action(ActionRequest::resize(size), droplet_id, wait).await
    }

    async fn droplet_action(
        &self,
        action: ActionRequest,
        droplet_id: &str,
        wait: bool,
    ) -> Result<ActionRecord, ResourceError> {
        action.validate()?;
        self.gate(droplet_id).await;

        let record = self
            .executor
            .perform(&action, Some(droplet_id))
            .await?
            .and_then(|entity| ActionRecord::try_from(entity).ok())
            .ok_or_else(|| ResourceError::Parse {
                kind: ResourceKind::Action,
                reason: format!("{} did not return an action", action.description()),
            })?;

        if wait {
            self.gate(droplet_id).await;
        }
        Ok(record)
    }

    async fn gate(&self, droplet_id: &str) {
        if let PollOutcome::TimedOut { checks, .. } = self.poller.wait_until_idle(droplet_id).await {
            warn!(droplet_id, checks, "droplet still busy, proceeding");
        }
    }
}
