//! Shared constants

/// Default page size for image listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Default offset for image listings.
pub const DEFAULT_PAGE_OFFSET: u32 = 0;

/// Version id S3 reports for objects written to a bucket without versioning.
pub const NULL_VERSION_ID: &str = "null";

/// Default PostgreSQL sslmode.
pub const DEFAULT_SSLMODE: &str = "disable";
