//! Notion API constants

/// Base URL for all API requests
pub const BASE_URL: &str = "https://api.notion.com/v1";

/// Value of the `Notion-Version` header sent with every request
pub const NOTION_VERSION: &str = "2025-09-03";

/// Pages requested per query round-trip
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
