//! The project/endpoint store.
//!
//! # Responsibilities
//! - Own the root object persisted to disk (`{"projects": [...]}`)
//! - Enforce key-uniqueness invariants for projects and endpoint URIs
//! - Locate endpoints by their `created` identity for updates and deletes
//! - Cascade project deletion to owned endpoints
//!
//! # Design Decisions
//! - Validation runs before any mutation; a failed operation leaves the
//!   catalogue untouched
//! - Duplicate checks are pure predicates; surfacing them is the caller's job
//! - A stale identity on update/delete is an error and a logged warning,
//!   never a silent no-op

use chrono::{DateTime, Utc};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::catalog::types::{
    BaseUrl, CatalogError, CatalogResult, Endpoint, EndpointPatch, HttpMethod,
    MethodSet, Project, ProjectPatch, UriTemplate,
};

const MIN_PROJECT_KEY_LEN: usize = 3;

/// Derive a project key from its display name (kebab-case slug).
pub fn derive_project_key(name: &str) -> CatalogResult<String> {
    let key = name.to_case(Case::Kebab);
    if key.chars().count() < MIN_PROJECT_KEY_LEN {
        return Err(CatalogError::KeyTooShort(key));
    }
    Ok(key)
}

/// The catalogue of projects; the root of the persisted object graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All projects, in insertion order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Look up a project by key.
    pub fn project(&self, key: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.key == key)
    }

    fn project_mut(&mut self, key: &str) -> CatalogResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.key == key)
            .ok_or_else(|| CatalogError::ProjectNotFound(key.to_string()))
    }

    /// Duplicate predicate for project keys. In edit mode, pass the
    /// project's own key so it is not reported as its own duplicate.
    pub fn is_duplicate_project_key(&self, candidate: &str, editing: Option<&str>) -> bool {
        self.projects
            .iter()
            .any(|p| p.key == candidate && editing != Some(p.key.as_str()))
    }

    /// Create a project. The key is derived from the name; the base URL is
    /// validated and the key checked for uniqueness before insertion.
    pub fn add_project(&mut self, name: &str, url: BaseUrl) -> CatalogResult<&Project> {
        let key = derive_project_key(name)?;
        url.validate()?;
        if self.is_duplicate_project_key(&key, None) {
            return Err(CatalogError::DuplicateProjectKey(key));
        }

        tracing::info!(project = %key, base = %url.base(), "project added");
        self.projects.push(Project {
            name: name.to_string(),
            key,
            url,
            endpoints: Vec::new(),
        });
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }

    /// Apply a field-list patch to a project. Renames re-derive the key
    /// (keeping its own key is allowed); URL changes are re-validated.
    pub fn update_project(&mut self, key: &str, patch: &ProjectPatch) -> CatalogResult<&Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.key == key)
            .ok_or_else(|| CatalogError::ProjectNotFound(key.to_string()))?;

        let new_key = match &patch.name {
            Some(name) => {
                let candidate = derive_project_key(name)?;
                if self.is_duplicate_project_key(&candidate, Some(key)) {
                    return Err(CatalogError::DuplicateProjectKey(candidate));
                }
                Some(candidate)
            }
            None => None,
        };

        let mut url = self.projects[idx].url.clone();
        if let Some(protocol) = patch.protocol {
            url.protocol = protocol;
        }
        if let Some(host) = &patch.host {
            url.host = host.clone();
        }
        if let Some(port) = patch.port {
            url.port = port;
        }
        url.validate()?;

        let project = &mut self.projects[idx];
        if let Some(name) = &patch.name {
            project.name = name.clone();
        }
        if let Some(new_key) = new_key {
            project.key = new_key;
        }
        project.url = url;
        Ok(&self.projects[idx])
    }

    /// Delete a project, discarding all owned endpoints with it.
    pub fn delete_project(&mut self, key: &str) -> CatalogResult<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.key == key)
            .ok_or_else(|| CatalogError::ProjectNotFound(key.to_string()))?;

        let project = self.projects.remove(idx);
        tracing::info!(
            project = %project.key,
            endpoints = project.endpoints.len(),
            "project deleted"
        );
        Ok(project)
    }

    /// Add an endpoint to a project. The definition is tokenized and its
    /// derived key checked for uniqueness within the project.
    pub fn add_endpoint(
        &mut self,
        project_key: &str,
        definition: &str,
        methods: MethodSet,
    ) -> CatalogResult<&Endpoint> {
        let project = self.project_mut(project_key)?;
        let uri = UriTemplate::parse(definition)?;
        if project.has_duplicate_key(&uri.key, None) {
            return Err(CatalogError::DuplicateEndpointKey {
                project: project.key.clone(),
                key: uri.key,
            });
        }

        tracing::info!(project = %project.key, uri = %uri.definition, "endpoint added");
        project.endpoints.push(Endpoint::new(uri, methods));
        let idx = project.endpoints.len() - 1;
        Ok(&project.endpoints[idx])
    }

    /// Apply a field-list patch to the endpoint with the given `created`
    /// identity. `created` is preserved; `updated` is set to now.
    pub fn update_endpoint(
        &mut self,
        project_key: &str,
        created: DateTime<Utc>,
        patch: &EndpointPatch,
    ) -> CatalogResult<&Endpoint> {
        let project = self.project_mut(project_key)?;
        let idx = match project.endpoints.iter().position(|e| e.created == created) {
            Some(idx) => idx,
            None => {
                tracing::warn!(
                    project = %project.key,
                    %created,
                    "update for an endpoint identity not in the store"
                );
                return Err(CatalogError::EndpointNotFound {
                    project: project.key.clone(),
                    created,
                });
            }
        };

        // Validate the replacement URI (and its uniqueness, excluding the
        // endpoint being edited) before touching anything.
        let new_uri = match &patch.definition {
            Some(definition) => {
                let uri = UriTemplate::parse(definition)?;
                if project.has_duplicate_key(&uri.key, Some(created)) {
                    return Err(CatalogError::DuplicateEndpointKey {
                        project: project.key.clone(),
                        key: uri.key,
                    });
                }
                Some(uri)
            }
            None => None,
        };

        let endpoint = &mut project.endpoints[idx];
        if let Some(uri) = new_uri {
            endpoint.uri = uri;
        }
        if let Some(methods) = &patch.methods {
            endpoint.methods.merge(methods);
        }
        endpoint.updated = Some(Utc::now());
        Ok(&project.endpoints[idx])
    }

    /// Overwrite an endpoint's method flags from an autodetected allow-list.
    pub fn apply_detected_methods(
        &mut self,
        project_key: &str,
        created: DateTime<Utc>,
        allowed: &[HttpMethod],
    ) -> CatalogResult<&Endpoint> {
        let project = self.project_mut(project_key)?;
        let idx = match project.endpoints.iter().position(|e| e.created == created) {
            Some(idx) => idx,
            None => {
                tracing::warn!(
                    project = %project.key,
                    %created,
                    "autodetect result for an endpoint identity not in the store"
                );
                return Err(CatalogError::EndpointNotFound {
                    project: project.key.clone(),
                    created,
                });
            }
        };

        let endpoint = &mut project.endpoints[idx];
        endpoint.methods.apply_allow(allowed);
        endpoint.updated = Some(Utc::now());
        Ok(&project.endpoints[idx])
    }

    /// Remove an endpoint by its `created` identity.
    pub fn delete_endpoint(
        &mut self,
        project_key: &str,
        created: DateTime<Utc>,
    ) -> CatalogResult<Endpoint> {
        let project = self.project_mut(project_key)?;
        let idx = match project.endpoints.iter().position(|e| e.created == created) {
            Some(idx) => idx,
            None => {
                tracing::warn!(
                    project = %project.key,
                    %created,
                    "delete for an endpoint identity not in the store"
                );
                return Err(CatalogError::EndpointNotFound {
                    project: project.key.clone(),
                    created,
                });
            }
        };

        let endpoint = project.endpoints.remove(idx);
        tracing::info!(project = %project.key, uri = %endpoint.uri.definition, "endpoint deleted");
        Ok(endpoint)
    }
}
