//! Admin commands: request lifecycle edits and catalog authoring.

use anyhow::{bail, Context, Result};

use devmart_client::projects::ImageUpload;
use devmart_client::requests::RequestPatch;
use devmart_client::session::Screen;
use devmart_core::draft::ProjectDraft;
use devmart_core::request::RequestStatus;
use devmart_core::types::Amount;

use crate::app::App;
use crate::commands::requests::{find_request, print_requests};
use crate::render;

fn require_admin(app: &App) -> Result<()> {
    match app.session.current_user() {
        Some(user) if user.is_admin() => Ok(()),
        Some(_) => bail!("this command requires an admin account"),
        None => bail!("login as an admin first"),
    }
}

pub async fn list_requests(app: &App, query: Option<String>) -> Result<()> {
    require_admin(app)?;
    app.session.set_screen(Screen::Admin);
    let requests = app.requests.list_all().await?;
    print_requests(&requests, query.as_deref());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update_request(
    app: &App,
    id: &str,
    status: Option<RequestStatus>,
    notes: Option<String>,
    module: Option<String>,
    github: Option<String>,
    price: Option<Amount>,
) -> Result<()> {
    require_admin(app)?;
    app.session.set_screen(Screen::Admin);

    let patch = RequestPatch {
        status,
        admin_notes: notes,
        current_module: module,
        github_link: github,
        actual_price: price,
    };

    // Validate a status change against the current lifecycle state
    // before issuing the call.
    let requests = app.requests.list_all().await?;
    let current = find_request(&requests, id)?;

    let updated = app
        .requests
        .update(Some(current), &id.to_string(), &patch)
        .await?;
    render::print_request_detail(&updated);
    Ok(())
}

pub async fn create_project(
    app: &App,
    file: &str,
    images: Vec<String>,
    primary: Option<usize>,
) -> Result<()> {
    require_admin(app)?;
    app.session.set_screen(Screen::Admin);

    let mut draft = load_draft(file)?;
    attach_images(app, &mut draft, images, primary).await?;

    let payload = draft.build()?;
    let project = app.projects.create(&payload).await?;
    println!("Project created: {} ({})", project.name, project.id);
    Ok(())
}

pub async fn update_project(
    app: &App,
    id: &str,
    file: &str,
    images: Vec<String>,
    primary: Option<usize>,
) -> Result<()> {
    require_admin(app)?;
    app.session.set_screen(Screen::Admin);

    let mut draft = load_draft(file)?;
    attach_images(app, &mut draft, images, primary).await?;

    let payload = draft.build()?;
    let project = app.projects.update(&id.to_string(), &payload).await?;
    println!("Project updated: {} ({})", project.name, project.id);
    Ok(())
}

pub async fn delete_project(app: &App, id: &str) -> Result<()> {
    require_admin(app)?;
    app.session.set_screen(Screen::Admin);
    app.projects.delete(&id.to_string()).await?;
    println!("Project {id} deleted");
    Ok(())
}

fn load_draft(file: &str) -> Result<ProjectDraft> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("reading draft file {file}"))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing draft file {file}"))
}

/// Upload image files as the side channel, append the returned
/// descriptors to the draft, then apply the primary flag.
async fn attach_images(
    app: &App,
    draft: &mut ProjectDraft,
    images: Vec<String>,
    primary: Option<usize>,
) -> Result<()> {
    if !images.is_empty() {
        let mut uploads = Vec::with_capacity(images.len());
        for path in &images {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading image file {path}"))?;
            let file_name = std::path::Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            uploads.push(ImageUpload {
                content_type: content_type_for(&file_name).to_string(),
                file_name,
                bytes,
            });
        }
        let descriptors = app.projects.upload_images(uploads).await?;
        println!("Uploaded {} image(s)", descriptors.len());
        draft.add_images(descriptors);
    }

    if let Some(index) = primary {
        draft.set_primary_image(index)?;
    }
    Ok(())
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
