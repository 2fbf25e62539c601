//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that have no direct
//! dashboard counterpart. Views, receipts and layouts are returned as-is.

use serde::{Deserialize, Serialize};

use crate::dashboard::{
    ChartInstance, FileDescriptor, FilterSelection, MetricSample, Notification, Readout, Severity,
    UploadedFile,
};

// ============================================
// UPLOAD DTOs
// ============================================

/// Files submitted by a drop or a file-input change
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<FileDescriptor>,
}

/// Uploaded-files table
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadListResponse {
    pub total: usize,
    pub files: Vec<UploadedFile>,
}

// ============================================
// NOTIFICATION DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub total: usize,
    pub notifications: Vec<Notification>,
}

// ============================================
// METRICS / LOGS / CHARTS DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub sample: MetricSample,
    pub readouts: Vec<Readout>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogFilterResponse {
    pub selection: FilterSelection,
    /// Rows left visible by the filter
    pub visible: usize,
}

#[derive(Debug, Serialize)]
pub struct ChartListResponse {
    pub total: usize,
    pub charts: Vec<ChartInstance>,
}

// ============================================
// LAYOUT DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ResizeRequest {
    /// New viewport width in CSS pixels
    pub width: u32,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "stopped"
    pub status: String,
    /// Dashboard engine status: "running" or "shut_down"
    pub dashboard: String,
    /// Scheduled timers currently alive
    pub scheduled_tasks: usize,
    /// Connected WebSocket clients
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// API version
    pub version: String,
}
