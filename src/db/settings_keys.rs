/// Canonical settings key constants for `app_settings` table.
///
/// Use these instead of raw string literals to prevent typo-based key mismatches.

/// Hosted backend base URL (e.g., `https://<project>.supabase.co`).
pub const BACKEND_ENDPOINT: &str = "backend_endpoint";

/// Hosted backend client credential (anon key or access token).
pub const BACKEND_CREDENTIAL: &str = "backend_credential";
