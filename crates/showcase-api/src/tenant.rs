//! Tenant resolution: the externally-visible opaque profile id maps to the
//! internal numeric user id. When no id is supplied — or an unknown one —
//! legacy compatibility mode falls back to the default tenant; deployments
//! that disable the mode get a 404 instead.

use crate::AppStateInner;
use crate::error::ApiError;

pub fn resolve(state: &AppStateInner, profile_id: Option<&str>) -> Result<i64, ApiError> {
    if let Some(pid) = profile_id {
        if let Some(id) = state.db.user_id_for_profile(pid)? {
            return Ok(id);
        }
    }
    state
        .legacy_tenant
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))
}

/// Variant for the section endpoints, which historically accepted a raw
/// `userId` when no profile id was given.
pub fn resolve_or_user(
    state: &AppStateInner,
    profile_id: Option<&str>,
    user_id: Option<i64>,
) -> Result<i64, ApiError> {
    if profile_id.is_some() {
        return resolve(state, profile_id);
    }
    if let Some(id) = user_id {
        return Ok(id);
    }
    state
        .legacy_tenant
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))
}
