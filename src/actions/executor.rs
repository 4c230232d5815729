//! Mutating calls and their action records.
//!
//! An [`ActionRequest`] describes one mutation: the HTTP method, the kind
//! whose URL it targets, the kind its response decodes to, its JSON
//! parameters and the parameters that must be present. The
//! [`ActionExecutor`] validates, sends and classifies it.
//!
//! # Example
//!
//! ```rust,ignore
//! use digitalocean_api::actions::{ActionExecutor, ActionRequest};
//!
//! let executor = ActionExecutor::new(transport.clone());
//!
//! let create = ActionRequest::create_droplet()
//!     .param("name", "web-1")
//!     .param("region", "nyc3")
//!     .param("size", "s-1vcpu-1gb")
//!     .param("image", "ubuntu-24-04-x64");
//! let droplet = executor.perform(&create, None).await?;
//!
//! let action = executor.perform(&ActionRequest::reboot(), Some("3164444")).await?;
//! ```

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::clients::{HttpMethod, HttpRequest, RequestTarget, Transport};
use crate::rest::registry::{self, Decoded, ResourceKind};
use crate::rest::resources::{ActionStatus, Entity};
use crate::rest::{ProviderError, ResourceError, ValidationError};

const CREATE_DROPLET_PARAMS: &[&str] = &["name", "region", "size", "image"];
const RESIZE_PARAMS: &[&str] = &["size"];
const DROPLET_ACTION_PARAMS: &[&str] = &["type"];
const CREATE_KEY_PARAMS: &[&str] = &["name", "public_key"];
const UPDATE_KEY_PARAMS: &[&str] = &["name"];

/// A mutating call against one resource kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    description: String,
    method: HttpMethod,
    target_kind: ResourceKind,
    result_kind: Option<ResourceKind>,
    params: Map<String, Value>,
    required: Vec<String>,
    expected_codes: Option<Vec<u16>>,
}

impl ActionRequest {
    /// Creates a request with no parameters and no result kind.
    #[must_use]
    pub fn new(description: impl Into<String>, method: HttpMethod, target_kind: ResourceKind) -> Self {
        Self {
            description: description.into(),
            method,
            target_kind,
            result_kind: None,
            params: Map::new(),
            required: Vec::new(),
            expected_codes: None,
        }
    }

    /// Sets the kind the response body decodes to.
    #[must_use]
    pub const fn result(mut self, kind: ResourceKind) -> Self {
        self.result_kind = Some(kind);
        self
    }

    /// Sets one parameter, replacing any previous value.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Marks parameters as required.
    #[must_use]
    pub fn require(mut self, fields: &[&str]) -> Self {
        self.required.extend(fields.iter().map(|f| (*f).to_string()));
        self
    }

    /// Overrides the success codes derived from the method.
    #[must_use]
    pub fn expect_codes(mut self, codes: &[u16]) -> Self {
        self.expected_codes = Some(codes.to_vec());
        self
    }

    /// Creates a droplet. Requires `name`, `region`, `size` and `image`.
    #[must_use]
    pub fn create_droplet() -> Self {
        Self::new("create droplet", HttpMethod::Post, ResourceKind::Droplets)
            .result(ResourceKind::Droplet)
            .require(CREATE_DROPLET_PARAMS)
    }

    /// Destroys a droplet.
    #[must_use]
    pub fn delete_droplet() -> Self {
        Self::new("delete droplet", HttpMethod::Delete, ResourceKind::Droplet)
    }

    fn droplet_action(description: &str, action_type: &str) -> Self {
        Self::new(description, HttpMethod::Post, ResourceKind::DropletActions)
            .result(ResourceKind::Action)
            .param("type", action_type)
            .require(DROPLET_ACTION_PARAMS)
    }

    /// Powers a droplet on.
    #[must_use]
    pub fn power_on() -> Self {
        Self::droplet_action("power on droplet", "power_on")
    }

    /// Powers a droplet off (hard).
    #[must_use]
    pub fn power_off() -> Self {
        Self::droplet_action("power off droplet", "power_off")
    }

    /// Shuts a droplet down gracefully.
    #[must_use]
    pub fn shutdown() -> Self {
        Self::droplet_action("shut down droplet", "shutdown")
    }

    /// Reboots a droplet.
    #[must_use]
    pub fn reboot() -> Self {
        Self::droplet_action("reboot droplet", "reboot")
    }

    /// Resizes a droplet to `size` (a size slug).
    #[must_use]
    pub fn resize(size: impl Into<String>) -> Self {
        Self::droplet_action("resize droplet", "resize")
            .param("size", size.into())
            .require(RESIZE_PARAMS)
    }

    /// Registers an SSH key. Requires `name` and `public_key`.
    #[must_use]
    pub fn create_ssh_key() -> Self {
        Self::new("create ssh key", HttpMethod::Post, ResourceKind::Keys)
            .result(ResourceKind::Key)
            .require(CREATE_KEY_PARAMS)
    }

    /// Renames an SSH key. Requires `name`; the provider answers 200.
    #[must_use]
    pub fn update_ssh_key() -> Self {
        Self::new("update ssh key", HttpMethod::Put, ResourceKind::Key)
            .result(ResourceKind::Key)
            .require(UPDATE_KEY_PARAMS)
            .expect_codes(&[200])
    }

    /// Removes an SSH key.
    #[must_use]
    pub fn delete_ssh_key() -> Self {
        Self::new("delete ssh key", HttpMethod::Delete, ResourceKind::Key)
    }

    /// Returns the description used in logs and errors.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the kind whose URL template the request targets.
    #[must_use]
    pub const fn target_kind(&self) -> ResourceKind {
        self.target_kind
    }

    /// Returns the kind the response decodes to, if any.
    #[must_use]
    pub const fn result_kind(&self) -> Option<ResourceKind> {
        self.result_kind
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Returns the status codes accepted as success.
    #[must_use]
    pub fn expected_codes(&self) -> &[u16] {
        self.expected_codes
            .as_deref()
            .unwrap_or_else(|| self.method.expected_success_codes())
    }

    /// Checks that every required parameter is present and not null.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingParameter`] for the first missing one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in &self.required {
            if self.params.get(field).map_or(true, Value::is_null) {
                return Err(ValidationError::MissingParameter {
                    action: self.description.clone(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds the HTTP request for `target_id`.
    ///
    /// POST and PUT carry the parameters as a JSON object; DELETE carries no
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if validation fails or the target cannot be
    /// resolved.
    pub fn to_http_request(&self, target_id: Option<&str>) -> Result<HttpRequest, ResourceError> {
        self.validate()?;

        let target = RequestTarget::new(self.target_kind.template()).with_optional_identifier(target_id);
        let mut builder = HttpRequest::builder(self.method, target);
        if self.method.takes_body() {
            builder = builder.body(Value::Object(self.params.clone()));
        }
        Ok(builder.build()?)
    }

    fn params_json(&self) -> String {
        Value::Object(self.params.clone()).to_string()
    }
}

/// Sends [`ActionRequest`]s and classifies their outcome.
#[derive(Clone, Debug)]
pub struct ActionExecutor {
    transport: Transport,
}

impl ActionExecutor {
    /// Creates an executor on top of `transport`.
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Performs `action` against `target_id`.
    ///
    /// Returns the decoded entity of the action's result kind: the created or
    /// updated resource, or the [`ActionRecord`](crate::rest::resources::ActionRecord)
    /// for droplet actions. DELETE and actions without a result kind return
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Validation`] if a required parameter is missing;
    ///   nothing is sent
    /// - [`ResourceError::NotFound`] if the target does not exist
    /// - [`ResourceError::Provider`] for an unexpected status, an embedded
    ///   error body, or an action record in the errored state
    /// - [`ResourceError::Http`] / [`ResourceError::Parse`] for transport and
    ///   decoding failures
    pub async fn perform(
        &self,
        action: &ActionRequest,
        target_id: Option<&str>,
    ) -> Result<Option<Entity>, ResourceError> {
        let request = action.to_http_request(target_id)?;

        debug!(
            action = action.description(),
            method = %action.method(),
            target = target_id.unwrap_or("-"),
            "submitting action"
        );

        let handle = self.transport.submit(request);
        let Some(response) = handle.response().await? else {
            return Err(ResourceError::NotFound {
                kind: action.target_kind(),
                id: target_id.map(str::to_string),
            });
        };

        if !action.expected_codes().contains(&response.code) {
            return Err(ProviderError {
                status: Some(response.code),
                reason: response.reason.clone(),
                message: format!(
                    "{}: unexpected status {} (expected {:?})",
                    action.description(),
                    response.code,
                    action.expected_codes()
                ),
                body: response.text(),
            }
            .into());
        }

        if action.method() == HttpMethod::Delete {
            info!(action = action.description(), target = target_id.unwrap_or("-"), "action accepted");
            return Ok(None);
        }

        let Some(result_kind) = action.result_kind() else {
            return Ok(None);
        };

        let body = response.body.as_ref().ok_or_else(|| ResourceError::Parse {
            kind: result_kind,
            reason: "response body is empty or not JSON".to_string(),
        })?;

        let entity = match registry::deserialize(result_kind, body) {
            Ok(Decoded::Single(entity)) => entity,
            Ok(Decoded::Collection(_)) => {
                return Err(ResourceError::Parse {
                    kind: result_kind,
                    reason: "expected a single object".to_string(),
                });
            }
            Err(ResourceError::Provider(mut error)) => {
                error.status.get_or_insert(response.code);
                return Err(error.into());
            }
            Err(error) => return Err(error),
        };

        if let Some(record) = entity.as_action() {
            if record.status == ActionStatus::Errored {
                return Err(ProviderError {
                    status: Some(response.code),
                    reason: "errored".to_string(),
                    message: format!(
                        "{} failed: action {} errored (params: {})",
                        action.description(),
                        record.id,
                        action.params_json()
                    ),
                    body: response.text(),
                }
                .into());
            }
            info!(
                action = action.description(),
                action_id = record.id,
                status = ?record.status,
                "action accepted"
            );
        } else {
            info!(action = action.description(), "action accepted");
        }

        Ok(Some(entity))
    }
}
