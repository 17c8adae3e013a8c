//! Project catalog endpoints
//!
//! Pure reads over the compiled-in catalog. An unrecognized category
//! answers 404, never a crash.

use atelier_common::catalog::{self, Category, Project};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Query parameters for project listing
#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    /// Optional category filter; omitted = whole catalog
    pub category: Option<String>,
}

/// Listing response with the applied filter echoed back
#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub category: Option<Category>,
    pub count: usize,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: [Category; 3],
}

/// GET /api/categories
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: catalog::all_categories(),
    })
}

/// GET /api/projects?category=interiors
pub async fn list_projects(
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<ProjectsResponse>, ProjectsError> {
    let category = match query.category.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|_| ProjectsError::UnknownCategory(raw.to_string()))?,
        ),
    };
    let projects: Vec<Project> = catalog::projects_by_category(category)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ProjectsResponse {
        category,
        count: projects.len(),
        projects,
    }))
}

/// GET /api/projects/:id
pub async fn get_project(Path(id): Path<String>) -> Result<Json<Project>, ProjectsError> {
    catalog::project_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or(ProjectsError::ProjectNotFound(id))
}

/// Catalog lookup errors
#[derive(Debug)]
pub enum ProjectsError {
    UnknownCategory(String),
    ProjectNotFound(String),
}

impl IntoResponse for ProjectsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProjectsError::UnknownCategory(raw) => {
                (StatusCode::NOT_FOUND, format!("Unknown category: {raw}"))
            }
            ProjectsError::ProjectNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Project not found: {id}"))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
