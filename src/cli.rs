//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::{HttpMethod, Protocol};

/// REST Lab — catalogue of API testing projects and their endpoints
#[derive(Parser)]
#[command(name = "rest-lab", version, about)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the catalogue file path
    #[arg(long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage a project's endpoints
    Endpoint {
        #[command(subcommand)]
        command: EndpointCommands,
    },

    /// Browse the HTTP header reference table
    Headers {
        /// Show request headers only
        #[arg(long)]
        request: bool,

        /// Show response headers only
        #[arg(long)]
        response: bool,

        /// Filter by header-name substring
        #[arg(long)]
        filter: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a project (the key is derived from the name)
    Add {
        /// Display name, e.g. "User Service"
        name: String,

        /// Base URL protocol (http or https)
        #[arg(long, default_value = "http")]
        protocol: Protocol,

        /// Base URL host
        #[arg(long)]
        host: String,

        /// Base URL port
        #[arg(long, default_value_t = 80)]
        port: u16,
    },

    /// List all projects
    List,

    /// Edit a project, addressed by its key
    Update {
        key: String,

        /// New display name (re-derives the key)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        protocol: Option<Protocol>,

        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Delete a project and all of its endpoints
    Remove { key: String },
}

#[derive(Subcommand)]
pub enum EndpointCommands {
    /// Add an endpoint to a project
    Add {
        /// Project key
        project: String,

        /// URI pattern with bracketed variables, e.g. /users/[id]
        definition: String,

        /// Methods to enable, comma separated (e.g. GET,POST)
        #[arg(long, value_delimiter = ',')]
        enable: Vec<HttpMethod>,
    },

    /// List a project's endpoints
    List {
        /// Project key
        project: String,
    },

    /// Edit an endpoint, addressed by its URI key
    Update {
        /// Project key
        project: String,

        /// The endpoint's URI key
        uri_key: String,

        /// Replacement URI pattern
        #[arg(long)]
        definition: Option<String>,

        /// Methods to enable, comma separated
        #[arg(long, value_delimiter = ',')]
        enable: Vec<HttpMethod>,

        /// Methods to disable, comma separated
        #[arg(long, value_delimiter = ',')]
        disable: Vec<HttpMethod>,
    },

    /// Remove an endpoint, addressed by its URI key
    Remove {
        /// Project key
        project: String,

        /// The endpoint's URI key
        uri_key: String,
    },

    /// Probe the endpoint with an OPTIONS request and fill the method flags
    /// from the Allow header
    Autodetect {
        /// Project key
        project: String,

        /// The endpoint's URI key
        uri_key: String,
    },
}
