//! HTTP API Client
//!
//! Functions for communicating with the GridScope REST API.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::state::global::{ChartInstance, DashboardView, FilterSelection, Layout};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8090/api/v1";

const API_URL_KEY: &str = "gridscope_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten());

    // Normalize: remove trailing slash
    stored
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

// ============ Request / Response Types ============

/// A file as the browser reports it; contents never leave the page
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, serde::Serialize)]
struct UploadRequest<'a> {
    files: &'a [FileDescriptor],
}

#[derive(Debug, serde::Serialize)]
struct ResizeRequest {
    width: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct UploadReceipt {
    pub accepted: Vec<AcceptedUpload>,
    pub rejected: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AcceptedUpload {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, serde::Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ============ API Functions ============

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let status = response.status();
        return Err(match response.json::<ApiError>().await {
            Ok(err) => err.error.message,
            Err(_) => format!("Request failed with status {}", status),
        });
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Fetch the full dashboard view
pub async fn fetch_view() -> Result<DashboardView, String> {
    let response = Request::get(&format!("{}/view", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

/// Activate a panel by id
pub async fn show_section(id: &str) -> Result<(), String> {
    let response = Request::post(&format!("{}/sections/{}", get_api_base(), id))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json::<serde_json::Value>(response).await.map(|_| ())
}

/// Fetch a constructed chart by mount id
pub async fn fetch_chart(mount: &str) -> Result<ChartInstance, String> {
    let response = Request::get(&format!("{}/charts/{}", get_api_base(), mount))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

/// Files are being dragged over the drop zone
pub async fn drag_over() -> Result<Layout, String> {
    let response = Request::post(&format!("{}/uploads/drag-over", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

/// Submit dropped or picked files to the upload simulator
pub async fn submit_files(files: &[FileDescriptor]) -> Result<UploadReceipt, String> {
    let response = Request::post(&format!("{}/uploads", get_api_base()))
        .json(&UploadRequest { files })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

/// Dismiss a notification
pub async fn dismiss_notification(id: u64) -> Result<(), String> {
    let response = Request::delete(&format!("{}/notifications/{}", get_api_base(), id))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    // 404 means the expiry timer got there first
    if response.ok() || response.status() == 404 {
        Ok(())
    } else {
        Err(format!("Dismiss failed with status {}", response.status()))
    }
}

/// Apply the log table dropdown selection
pub async fn set_log_filter(selection: &FilterSelection) -> Result<(), String> {
    let response = Request::put(&format!("{}/logs/filter", get_api_base()))
        .json(selection)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json::<serde_json::Value>(response).await.map(|_| ())
}

/// Report a new viewport width
pub async fn resize(width: u32) -> Result<Layout, String> {
    let response = Request::post(&format!("{}/layout/resize", get_api_base()))
        .json(&ResizeRequest { width })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

/// Mobile menu button pressed
pub async fn toggle_sidebar() -> Result<Layout, String> {
    let response = Request::post(&format!("{}/layout/sidebar/toggle", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}
