//! Client SDK for a remote chaos-engineering control plane
//!
//! Authenticates against the control plane's auth server, then drives the
//! GraphQL API for probes, environments, experiments and infrastructure
//! agents, plus the REST endpoints for project management. Probe definitions
//! are validated locally (see the [`domain`] crate) before anything goes on
//! the wire.
//!
//! # Architecture
//!
//! - [`ControlPlaneClient`] is the facade: one login, one resolved project
//!   scope, accessors for each resource service
//! - Resource services ([`Probes`], [`Projects`], [`Environments`],
//!   [`Experiments`], [`Infrastructure`]) own their queries and payload types
//! - [`Transport`] is the seam to the wire; [`HttpTransport`] is the
//!   `reqwest`-backed implementation, tests substitute doubles
//! - Response classification is uniform: completed HTTP exchanges with error
//!   statuses or GraphQL errors become [`ApiError::Remote`], network failures
//!   become [`ApiError::Transport`]
//!
//! # Example
//!
//! ```rust,ignore
//! use control_plane::{ClientOptions, ControlPlaneClient};
//!
//! let options = ClientOptions {
//!     endpoint: "http://localhost:8080".into(),
//!     username: "admin".into(),
//!     password: "secret".into(),
//!     ..ClientOptions::default()
//! };
//! let client = ControlPlaneClient::connect(options).await?;
//!
//! let probes = client.probes().list(client.project_id(), None).await?;
//! for probe in &probes {
//!     println!("{} ({})", probe.name, probe.probe_type);
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod environments;
pub mod error;
pub mod experiments;
mod graphql;
pub mod infrastructure;
pub mod probes;
pub mod projects;
pub mod transport;

pub use auth::AuthResponse;
pub use client::ControlPlaneClient;
pub use config::ClientOptions;
pub use environments::{Environment, EnvironmentRequest, EnvironmentType, Environments};
pub use error::ApiError;
pub use experiments::{Experiment, Experiments, RunExperimentResponse, SaveExperimentRequest};
pub use graphql::GraphqlError;
pub use infrastructure::{
    Infra, InfraScope, Infrastructure, RegisterInfraRequest, RegisterInfraResponse,
};
pub use probes::Probes;
pub use projects::{Project, Projects};
pub use transport::{
    HttpMethod, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
