use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Operation names the mock treats as long-running: applying one of them
/// answers `pending` instead of `ok`.
pub const PENDING_OPERATIONS: &[&str] = &["core/recon", "core/extend-reconciled-data"];

/// What the mock server knows about a project.
#[derive(Clone, Debug)]
pub struct Project {
    pub name: String,
    pub format: Option<String>,
    pub options_form: Option<String>,
    pub options_query: Option<String>,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub operations: Vec<Value>,
}

impl Project {
    /// Non-empty lines after the header line.
    pub fn row_count(&self) -> usize {
        String::from_utf8_lossy(&self.content)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
            .saturating_sub(1)
    }
}

/// Metadata as the server reports it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: String,
    pub created: String,
    pub modified: String,
    pub row_count: usize,
    pub tags: Vec<String>,
    pub creator: String,
    pub custom_metadata: Value,
}

#[derive(Clone)]
pub struct Store {
    projects: Arc<RwLock<HashMap<u64, Project>>>,
    next_id: Arc<AtomicU64>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            projects: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1_000_000_000_001)),
        }
    }

    pub async fn get(&self, id: u64) -> Option<Project> {
        self.projects.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert(&self, project: Project) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.projects.write().await.insert(id, project);
        id
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

pub fn app() -> Router {
    app_with_store(Store::new())
}

pub fn app_with_store(store: Store) -> Router {
    Router::new()
        .route(
            "/command/core/create-project-from-upload",
            post(create_project_from_upload),
        )
        .route("/command/core/delete-project", post(delete_project))
        .route("/command/core/apply-operations", post(apply_operations))
        .route("/command/core/get-project-metadata", get(get_project_metadata))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_store(listener, Store::new()).await
}

pub async fn run_with_store(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

fn code_ok() -> Json<Value> {
    Json(json!({"code": "ok"}))
}

fn code_error(message: impl Into<String>) -> Json<Value> {
    Json(json!({"code": "error", "message": message.into()}))
}

fn parse_id(project: Option<&str>) -> Option<u64> {
    project.and_then(|p| p.trim().parse().ok())
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub options: Option<String>,
}

/// The real server answers import failures with an HTML page and status 200,
/// and a successful import with a redirect to the project page.
async fn create_project_from_upload(
    State(store): State<Store>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut name = None;
    let mut format = None;
    let mut options_form = None;
    let mut file = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        };
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        };
        match field_name.as_str() {
            "project-name" => name = Some(String::from_utf8_lossy(&data).into_owned()),
            "format" => format = Some(String::from_utf8_lossy(&data).into_owned()),
            "options" => options_form = Some(String::from_utf8_lossy(&data).into_owned()),
            "project-file" => file = Some((file_name, data.to_vec())),
            _ => {}
        }
    }

    let (Some(name), Some((file_name, content))) = (name, file) else {
        return Html("<html><body><h1>Error</h1><p>No data uploaded</p></body></html>")
            .into_response();
    };
    if let Some(options) = &query.options {
        if serde_json::from_str::<Value>(options).is_err() {
            return Html("<html><body><h1>Error</h1><p>Invalid options</p></body></html>")
                .into_response();
        }
    }

    let now = Utc::now();
    let id = store
        .insert(Project {
            name,
            format,
            options_form,
            options_query: query.options,
            file_name,
            content,
            created: now,
            modified: now,
            operations: Vec::new(),
        })
        .await;
    tracing::info!(id, "project created");

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:3333");
    let location = format!("http://{host}/project?project={id}");
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[derive(Deserialize)]
pub struct ProjectForm {
    pub project: Option<String>,
}

async fn delete_project(State(store): State<Store>, Form(form): Form<ProjectForm>) -> Json<Value> {
    let Some(id) = parse_id(form.project.as_deref()) else {
        return code_error("Missing or invalid project parameter");
    };
    match store.projects.write().await.remove(&id) {
        Some(_) => {
            tracing::info!(id, "project deleted");
            code_ok()
        }
        None => code_error(format!("Failed to find project id #{id}")),
    }
}

#[derive(Deserialize)]
pub struct ApplyOperationsForm {
    pub project: Option<String>,
    pub operations: Option<String>,
}

async fn apply_operations(
    State(store): State<Store>,
    Form(form): Form<ApplyOperationsForm>,
) -> Json<Value> {
    let Some(id) = parse_id(form.project.as_deref()) else {
        return code_error("Missing or invalid project parameter");
    };
    let operations = match form.operations.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Array(operations))) => operations,
        Some(Ok(_)) => return code_error("operations must be a JSON array"),
        Some(Err(err)) => return code_error(format!("Invalid operations: {err}")),
        None => return code_error("Missing operations parameter"),
    };

    let mut projects = store.projects.write().await;
    let Some(project) = projects.get_mut(&id) else {
        return code_error(format!("Failed to find project id #{id}"));
    };
    let pending = operations.iter().any(|op| {
        op.get("op")
            .and_then(Value::as_str)
            .is_some_and(|name| PENDING_OPERATIONS.contains(&name))
    });
    tracing::info!(id, count = operations.len(), pending, "operations applied");
    project.operations.extend(operations);
    project.modified = Utc::now();

    if pending {
        Json(json!({"code": "pending"}))
    } else {
        code_ok()
    }
}

async fn get_project_metadata(
    State(store): State<Store>,
    Query(query): Query<ProjectForm>,
) -> Response {
    let Some(id) = parse_id(query.project.as_deref()) else {
        return code_error("Missing or invalid project parameter").into_response();
    };
    let Some(project) = store.get(id).await else {
        return code_error(format!("Failed to find project id #{id}")).into_response();
    };
    let metadata = ProjectMetadata {
        row_count: project.row_count(),
        name: project.name,
        created: timestamp(&project.created),
        modified: timestamp(&project.modified),
        tags: Vec::new(),
        creator: String::new(),
        custom_metadata: json!({}),
    };
    Json(metadata).into_response()
}
