//! Catalog browsing commands.

use anyhow::Result;

use devmart_client::session::Screen;

use crate::app::App;
use crate::render;

pub async fn list(app: &App) -> Result<()> {
    app.session.set_screen(Screen::Projects);
    let projects = app.projects.list().await?;
    if projects.is_empty() {
        println!("No projects available");
        return Ok(());
    }
    for project in &projects {
        render::print_project_row(project);
    }
    println!("{} project(s)", projects.len());
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    app.session.set_screen(Screen::ProjectDetail);
    let project = app.projects.get(&id.to_string()).await?;
    render::print_project_detail(&project);
    Ok(())
}
