// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;

use crate::config::Endpoints;
use crate::episode::DestinationEpisode;
use crate::error::CatalogError;
use crate::http::{BasicAuth, HttpClient};

use super::model::{Project, ProjectDetail};

async fn get_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: &str,
    auth: &BasicAuth,
) -> Result<T, CatalogError> {
    let response = client
        .get(url, auth)
        .await
        .map_err(|e| CatalogError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !response.is_success() {
        let body = response.diagnostic_body();
        tracing::warn!(url, status = response.status, %body, "catalog fetch failed");
        return Err(CatalogError::FetchFailed {
            url: url.to_string(),
            status: response.status,
            body,
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| CatalogError::InvalidCatalogJson {
        url: url.to_string(),
        source: e,
    })
}

/// Look up the configured project and return its hashed ID
pub async fn find_project<C: HttpClient>(
    client: &C,
    endpoints: &Endpoints,
    auth: &BasicAuth,
) -> Result<String, CatalogError> {
    let projects: Vec<Project> = get_json(client, &endpoints.projects_url(), auth).await?;

    let project = projects
        .iter()
        .find(|p| p.name == endpoints.project_name)
        .ok_or_else(|| CatalogError::ProjectNotFound {
            name: endpoints.project_name.clone(),
            available: projects.iter().map(|p| p.name.clone()).collect(),
        })?;

    project
        .hashed_id
        .clone()
        .ok_or_else(|| CatalogError::MissingProjectId {
            name: project.name.clone(),
        })
}

/// List the videos of a project as catalog entries
///
/// Non-video media are ignored.
pub async fn fetch_project_medias<C: HttpClient>(
    client: &C,
    endpoints: &Endpoints,
    project_id: &str,
    auth: &BasicAuth,
) -> Result<Vec<DestinationEpisode>, CatalogError> {
    let detail: ProjectDetail = get_json(client, &endpoints.project_url(project_id), auth).await?;

    detail
        .medias
        .iter()
        .filter(|media| media.is_video())
        .map(|media| media.to_episode())
        .collect()
}

/// Resolve the project and list its videos
///
/// Returns the project's hashed ID alongside the catalog, since uploads need it.
pub async fn fetch_destination_catalog<C: HttpClient>(
    client: &C,
    endpoints: &Endpoints,
    auth: &BasicAuth,
) -> Result<(String, Vec<DestinationEpisode>), CatalogError> {
    let project_id = find_project(client, endpoints, auth).await?;
    let episodes = fetch_project_medias(client, endpoints, &project_id, auth).await?;
    Ok((project_id, episodes))
}
