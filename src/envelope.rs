/**
 * Response Envelope and Pagination
 *
 * This module defines the uniform success wrapper every handler returns
 * and the shared pagination types used by list operations.
 *
 * # Envelope Format
 *
 * ```json
 * {
 *   "code": 200,
 *   "data": { ... },
 *   "msg": "success",
 *   "timestamp": 1756250000000
 * }
 * ```
 *
 * The matching error shape (with `data: null`) is produced by the error
 * conversion module.
 */

use serde::{Deserialize, Serialize};

/// Maximum page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Uniform success wrapper returned by every handler
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Status code, mirrors the HTTP status
    pub code: u16,
    /// Payload
    pub data: T,
    /// Human-readable message
    pub msg: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the standard success envelope
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            data,
            msg: "success".to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Raw pagination query parameters, before normalization
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Requested page number (1-based)
    pub page: Option<u32>,
    /// Requested page size
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Normalize into a [`Pagination`] with the given default limit
    pub fn normalize(self, default_limit: u32) -> Pagination {
        Pagination::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(default_limit),
        )
    }
}

/// Normalized pagination: page >= 1, limit in [1, MAX_PAGE_LIMIT]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Clamp raw values into range. Out-of-range limits are clamped,
    /// not rejected.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset for the current page
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Pagination metadata attached to every list response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Compute metadata from the normalized pagination and a total row count
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + i64::from(pagination.limit) - 1) / i64::from(pagination.limit)
        };
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages,
            has_next_page: i64::from(pagination.page) < total_pages,
            has_previous_page: pagination.page > 1,
        }
    }
}

/// A page of results plus its metadata
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub meta: PageMeta,
}
