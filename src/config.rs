/*
Copyright 2018 The Kubernetes Authors.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default port the server listens on
pub const DEFAULT_PORT: u16 = 5001;

/// Default message served by the diagnostic /message endpoint
pub const DEFAULT_MESSAGE: &str = "Hello World!";

/// Default namespace admission refuses to place objects into
pub const DEFAULT_RESERVED_NAMESPACE: &str = "default";

/// Command line and environment options
///
/// Every flag can also be supplied through a WEBHOOK_* environment
/// variable; explicit flags win over the environment, and both win over
/// the optional YAML configuration file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "admission-webhook",
    about = "A mutating admission controller webhook server",
    version
)]
pub struct Options {
    /// A YAML configuration file to start the server from
    #[arg(long, env = "WEBHOOK_CONFIG_FILE_PATH")]
    pub config: Option<PathBuf>,

    /// The path to a valid TLS certificate file
    #[arg(long = "cert-file", env = "WEBHOOK_CERT_FILE_PATH")]
    pub cert_file: Option<PathBuf>,

    /// The path to the TLS key for the provided certificate
    #[arg(long = "key-file", env = "WEBHOOK_KEY_FILE_PATH")]
    pub key_file: Option<PathBuf>,

    /// The port to run the server on
    #[arg(long, env = "WEBHOOK_PORT")]
    pub port: Option<u16>,

    /// A message for the diagnostic /message endpoint
    #[arg(long, env = "WEBHOOK_MESSAGE")]
    pub message: Option<String>,

    /// The cloud provider the cluster runs on (aws, azure or gcp)
    #[arg(long = "cloud-provider", env = "WEBHOOK_CLOUD_PROVIDER")]
    pub cloud_provider: Option<String>,

    /// The namespace admission will refuse to place objects into
    #[arg(long = "reserved-namespace", env = "WEBHOOK_RESERVED_NAMESPACE")]
    pub reserved_namespace: Option<String>,
}

/// The YAML file layer of the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileConfig {
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub port: Option<u16>,
    pub message: Option<String>,
    pub cloud_provider: Option<String>,
    pub reserved_namespace: Option<String>,
}

/// The resolved server configuration
///
/// Built once at startup and read-only afterwards; request handlers
/// never see anything mutable.
#[derive(Debug, Clone)]
pub struct Config {
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub port: u16,
    pub message: String,
    pub cloud_provider: String,
    pub reserved_namespace: String,
}

impl Config {
    /// Resolve the effective configuration from flags, environment and
    /// the optional configuration file
    pub fn resolve(options: Options) -> Result<Self> {
        let file = match &options.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_yaml::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(options, file))
    }

    fn merge(options: Options, file: FileConfig) -> Self {
        Config {
            cert_file: options.cert_file.or(file.cert_file),
            key_file: options.key_file.or(file.key_file),
            port: options.port.or(file.port).unwrap_or(DEFAULT_PORT),
            message: options
                .message
                .or(file.message)
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            cloud_provider: options
                .cloud_provider
                .or(file.cloud_provider)
                .unwrap_or_default(),
            reserved_namespace: options
                .reserved_namespace
                .or(file.reserved_namespace)
                .unwrap_or_else(|| DEFAULT_RESERVED_NAMESPACE.to_string()),
        }
    }

    /// Validate the resolved configuration
    ///
    /// Returns every problem found rather than stopping at the first.
    /// An unknown cloud provider is deliberately not listed here: the
    /// annotation policy reports it per request so a misconfigured
    /// server stays up and visibly denies instead of crash-looping.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.cert_file.is_some() != self.key_file.is_some() {
            errors.push(
                "cert-file and key-file must be provided together".to_string(),
            );
        }
        if self.reserved_namespace.is_empty() {
            errors.push("reserved-namespace must not be empty".to_string());
        }

        errors
    }
}
