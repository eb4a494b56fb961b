//! API client and resource registry
//!
//! A `Client` owns one transport and hands out a `Resource` per kind. Each
//! resource is created on first access and cached for the life of the client.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpBackend, Transport, TrustStore};
use crate::resources::{Resource, ResourceKind};
use crate::types::{JsonValue, Method};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Content-management API client
pub struct Client {
    config: ClientConfig,
    transport: Arc<Transport>,
    registry: [OnceCell<Resource>; ResourceKind::COUNT],
}

impl Client {
    /// Create a client using reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self::from_transport(config, transport))
    }

    /// Create a client from `DATO_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client with an explicit trust store and HTTP backend
    pub fn with_backend(
        config: ClientConfig,
        trust: Arc<TrustStore>,
        backend: Arc<dyn HttpBackend>,
    ) -> Result<Self> {
        let transport = Transport::with_backend(&config, trust, backend)?;
        Ok(Self::from_transport(config, transport))
    }

    fn from_transport(config: ClientConfig, transport: Transport) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            registry: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Resource facade for `kind`, created on first use
    pub fn resource(&self, kind: ResourceKind) -> &Resource {
        self.registry[kind.index()]
            .get_or_init(|| Resource::new(kind, self.transport.clone(), self.config.page_size))
    }

    /// Resource facade by registry name (`"items"`, `"item_types"`, ...)
    pub fn resource_named(&self, name: &str) -> Result<&Resource> {
        Ok(self.resource(name.parse()?))
    }

    /// Send a raw request through the authenticated transport
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        self.transport.request(method, path, payload).await
    }

    pub fn items(&self) -> &Resource {
        self.resource(ResourceKind::Items)
    }

    pub fn item_types(&self) -> &Resource {
        self.resource(ResourceKind::ItemTypes)
    }

    pub fn menu_items(&self) -> &Resource {
        self.resource(ResourceKind::MenuItems)
    }

    pub fn uploads(&self) -> &Resource {
        self.resource(ResourceKind::Uploads)
    }

    pub fn users(&self) -> &Resource {
        self.resource(ResourceKind::Users)
    }

    pub fn roles(&self) -> &Resource {
        self.resource(ResourceKind::Roles)
    }

    pub fn access_tokens(&self) -> &Resource {
        self.resource(ResourceKind::AccessTokens)
    }

    pub fn site(&self) -> &Resource {
        self.resource(ResourceKind::Site)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
