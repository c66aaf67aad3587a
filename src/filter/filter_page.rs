use std::collections::HashMap;

use super::types::Page;

pub struct FilterPage;

impl FilterPage {
    /// Resolve `limit`/`offset` from query parameters.
    ///
    /// Absent or non-numeric limits fall back to `default_limit`; everything is
    /// clamped to `[1, max_limit]`. Offsets are only read when `allow_offset`
    /// is set, ignored when non-numeric and floored at zero.
    pub fn resolve(
        params: &HashMap<String, String>,
        default_limit: i64,
        max_limit: i64,
        allow_offset: bool,
        debug_logging: bool,
    ) -> Page {
        let max_limit = max_limit.max(1);
        let requested = params
            .get("limit")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default_limit);

        let limit = if requested > max_limit {
            if debug_logging {
                tracing::warn!("Limit {} exceeds max {}, capping to max", requested, max_limit);
            }
            max_limit
        } else {
            requested.max(1)
        };

        let offset = if allow_offset {
            params
                .get("offset")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .map(|o| o.max(0))
        } else {
            None
        };

        Page { limit, offset }
    }
}
