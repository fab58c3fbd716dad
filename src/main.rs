//! REST Lab CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!  User command                ┌──────────────────────────────────────────┐
//!  ───────────────────────────┼─▶ cli (clap) ──▶ catalog (validate+mutate)│
//!                             │        │               │                  │
//!                             │        │               ▼                  │
//!                             │        │         storage (JSON file)      │
//!                             │        ▼                                  │
//!                             │  autodetect ──▶ OPTIONS probe ──▶ Allow   │
//!                             │                                          │
//!                             │  Cross-cutting: config, tracing          │
//!                             └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rest_lab::autodetect::AutodetectClient;
use rest_lab::catalog::{
    BaseUrl, Catalog, CatalogError, EndpointPatch, MethodPatch, MethodSet, ProjectPatch,
};
use rest_lab::cli::{Cli, Commands, EndpointCommands, ProjectCommands};
use rest_lab::config::{load_config, LabConfig};
use rest_lab::reference;
use rest_lab::storage::CatalogStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LabConfig::default(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rest_lab={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.path));
    let store = CatalogStore::new(store_path);
    let mut catalog = store.load()?;

    match cli.command {
        Commands::Project { command } => match command {
            ProjectCommands::Add {
                name,
                protocol,
                host,
                port,
            } => {
                let url = BaseUrl {
                    protocol,
                    host,
                    port,
                };
                let project = catalog.add_project(&name, url)?;
                println!("Added project '{}' ({})", project.key, project.url.base());
                store.save(&catalog)?;
            }
            ProjectCommands::List => {
                for project in catalog.projects() {
                    println!(
                        "{:<24} {:<24} {} ({} endpoints)",
                        project.key,
                        project.name,
                        project.url.base(),
                        project.endpoints.len()
                    );
                }
            }
            ProjectCommands::Update {
                key,
                name,
                protocol,
                host,
                port,
            } => {
                let patch = ProjectPatch {
                    name,
                    protocol,
                    host,
                    port,
                };
                let project = catalog.update_project(&key, &patch)?;
                println!("Updated project '{}' ({})", project.key, project.url.base());
                store.save(&catalog)?;
            }
            ProjectCommands::Remove { key } => {
                let removed = catalog.delete_project(&key)?;
                println!(
                    "Deleted project '{}' and {} endpoint(s)",
                    removed.key,
                    removed.endpoints.len()
                );
                store.save(&catalog)?;
            }
        },

        Commands::Endpoint { command } => match command {
            EndpointCommands::Add {
                project,
                definition,
                enable,
            } => {
                let methods = MethodSet::with_enabled(&enable);
                let endpoint = catalog.add_endpoint(&project, &definition, methods)?;
                println!(
                    "Added endpoint '{}' (key '{}')",
                    endpoint.uri.definition, endpoint.uri.key
                );
                store.save(&catalog)?;
            }
            EndpointCommands::List { project } => {
                let project = catalog
                    .project(&project)
                    .ok_or_else(|| CatalogError::ProjectNotFound(project.clone()))?;
                for endpoint in &project.endpoints {
                    let methods: Vec<&str> = endpoint
                        .methods
                        .enabled()
                        .into_iter()
                        .map(|m| m.as_str())
                        .collect();
                    println!(
                        "{:<32} key '{}'  [{}]",
                        endpoint.uri.definition,
                        endpoint.uri.key,
                        methods.join(", ")
                    );
                }
            }
            EndpointCommands::Update {
                project,
                uri_key,
                definition,
                enable,
                disable,
            } => {
                let created = resolve_endpoint(&catalog, &project, &uri_key)?;
                let mut methods = MethodPatch::new();
                for method in enable {
                    methods.insert(method, true);
                }
                for method in disable {
                    methods.insert(method, false);
                }
                let patch = EndpointPatch {
                    definition,
                    methods: if methods.is_empty() {
                        None
                    } else {
                        Some(methods)
                    },
                };
                let endpoint = catalog.update_endpoint(&project, created, &patch)?;
                println!(
                    "Updated endpoint '{}' (key '{}')",
                    endpoint.uri.definition, endpoint.uri.key
                );
                store.save(&catalog)?;
            }
            EndpointCommands::Remove { project, uri_key } => {
                let created = resolve_endpoint(&catalog, &project, &uri_key)?;
                let removed = catalog.delete_endpoint(&project, created)?;
                println!("Deleted endpoint '{}'", removed.uri.definition);
                store.save(&catalog)?;
            }
            EndpointCommands::Autodetect { project, uri_key } => {
                let created = resolve_endpoint(&catalog, &project, &uri_key)?;
                let url = {
                    let p = catalog
                        .project(&project)
                        .ok_or_else(|| CatalogError::ProjectNotFound(project.clone()))?;
                    let endpoint = p.endpoint_by_key(&uri_key).ok_or_else(|| {
                        CatalogError::EndpointKeyNotFound {
                            project: project.clone(),
                            key: uri_key.clone(),
                        }
                    })?;
                    p.url.endpoint_url(&endpoint.uri.definition)
                };

                let client = AutodetectClient::new(&config.autodetect)?;
                let allowed = match client.probe(&url).await {
                    Ok(allowed) => allowed,
                    Err(e) => {
                        eprintln!("Autodetect failed, methods unchanged: {}", e);
                        return Err(e.into());
                    }
                };

                let endpoint = catalog.apply_detected_methods(&project, created, &allowed)?;
                let methods: Vec<&str> = endpoint
                    .methods
                    .enabled()
                    .into_iter()
                    .map(|m| m.as_str())
                    .collect();
                println!(
                    "Detected methods for '{}': [{}]",
                    endpoint.uri.definition,
                    methods.join(", ")
                );
                store.save(&catalog)?;
            }
        },

        Commands::Headers {
            request,
            response,
            filter,
            json,
        } => {
            let show_request = request || !response;
            let show_response = response || !request;
            let needle = filter.unwrap_or_default();

            let mut entries: Vec<&reference::HeaderInfo> = Vec::new();
            if show_request {
                entries.extend(reference::filter(reference::request_headers(), &needle));
            }
            if show_response {
                entries.extend(reference::filter(reference::response_headers(), &needle));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for info in entries {
                    let category = match info.category {
                        reference::HeaderCategory::Standard => "standard",
                        reference::HeaderCategory::NonStandard => "non-standard",
                    };
                    match info.status {
                        Some(status) => println!("{} [{}, {}]", info.header, category, status),
                        None => println!("{} [{}]", info.header, category),
                    }
                    println!("    {}", info.description);
                    println!("    e.g. {}", info.example);
                }
            }
        }
    }

    Ok(())
}

/// Resolve an endpoint's URI key to its stable `created` identity.
fn resolve_endpoint(
    catalog: &Catalog,
    project_key: &str,
    uri_key: &str,
) -> Result<DateTime<Utc>, CatalogError> {
    let project = catalog
        .project(project_key)
        .ok_or_else(|| CatalogError::ProjectNotFound(project_key.to_string()))?;
    let endpoint = project
        .endpoint_by_key(uri_key)
        .ok_or_else(|| CatalogError::EndpointKeyNotFound {
            project: project_key.to_string(),
            key: uri_key.to_string(),
        })?;
    Ok(endpoint.created)
}
