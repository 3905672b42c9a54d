//! Catalog endpoints: project CRUD and the image upload side channel.

use std::sync::Arc;

use serde::Deserialize;

use devmart_core::draft::ProjectPayload;
use devmart_core::project::{Project, ProjectImage};
use devmart_core::types::EntityId;

use crate::error::ClientResult;
use crate::gateway::ApiGateway;

#[derive(Debug, Deserialize)]
struct ProjectsEnvelope {
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

#[derive(Debug, Deserialize)]
struct ImagesEnvelope {
    images: Vec<ProjectImage>,
}

/// One file handed to the multipart upload endpoint.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Project endpoint wrappers. Create/update/delete are admin-only
/// server-side; the client just forwards the calls.
pub struct ProjectsApi {
    gateway: Arc<ApiGateway>,
}

impl ProjectsApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `GET /projects`.
    pub async fn list(&self) -> ClientResult<Vec<Project>> {
        let envelope: ProjectsEnvelope = self.gateway.get_json("/projects").await?;
        Ok(envelope.projects)
    }

    /// `GET /projects/:id`.
    pub async fn get(&self, id: &EntityId) -> ClientResult<Project> {
        let envelope: ProjectEnvelope = self.gateway.get_json(&format!("/projects/{id}")).await?;
        Ok(envelope.project)
    }

    /// `POST /projects` with a payload built from a validated draft.
    pub async fn create(&self, payload: &ProjectPayload) -> ClientResult<Project> {
        let envelope: ProjectEnvelope = self.gateway.post_json("/projects", payload).await?;
        Ok(envelope.project)
    }

    /// `PUT /projects/:id`.
    pub async fn update(&self, id: &EntityId, payload: &ProjectPayload) -> ClientResult<Project> {
        let envelope: ProjectEnvelope = self
            .gateway
            .put_json(&format!("/projects/{id}"), payload)
            .await?;
        Ok(envelope.project)
    }

    /// `DELETE /projects/:id`.
    pub async fn delete(&self, id: &EntityId) -> ClientResult<()> {
        self.gateway.delete(&format!("/projects/{id}")).await?;
        Ok(())
    }

    /// `POST /upload/project-images` (multipart). Returns the stored
    /// image descriptors to append to the owning draft before the main
    /// entity is submitted.
    pub async fn upload_images(&self, uploads: Vec<ImageUpload>) -> ClientResult<Vec<ProjectImage>> {
        let mut form = reqwest::multipart::Form::new();
        for upload in uploads {
            let part = reqwest::multipart::Part::bytes(upload.bytes)
                .file_name(upload.file_name)
                .mime_str(&upload.content_type)
                .map_err(crate::gateway::ApiError::from)?;
            form = form.part("images", part);
        }

        let envelope: ImagesEnvelope = self
            .gateway
            .post_multipart("/upload/project-images", form)
            .await?;
        Ok(envelope.images)
    }
}
