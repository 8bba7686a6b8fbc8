use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::profile_repo;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub is_provider: bool,
    // Provider-only fields, absent for regular customers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

/// Merged profile: the `user_profiles` row, plus the `service_providers`
/// row when the account is a provider.
pub async fn load_profile_view(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<ProfileView>> {
    let Some(row) = profile_repo::load_user_profile(pool, user_id).await? else {
        return Ok(None);
    };

    let is_provider = row.is_provider.unwrap_or(0) == 1;
    let email = row.email.unwrap_or_default();
    let name = row
        .name
        .clone()
        .or_else(|| email.split('@').next().map(|s| s.to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "User".to_string());
    let avatar_url = row
        .avatar_url
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fallback_avatar_url(&name));

    let mut view = ProfileView {
        user_id: row.user_id,
        name,
        email,
        avatar_url,
        is_provider,
        business_name: None,
        category: None,
        experience: None,
    };

    if is_provider {
        if let Some(provider) = profile_repo::load_provider_profile(pool, user_id).await? {
            view.business_name = provider.business_name;
            view.category = provider.category;
            view.experience = provider.experience;
        }
    }

    Ok(Some(view))
}

fn fallback_avatar_url(name: &str) -> String {
    let encoded: String = name
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    format!(
        "https://ui-avatars.com/api/?name={}&background=4A80F0&color=fff",
        encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_avatar_encodes_spaces() {
        let url = fallback_avatar_url("Jane Doe");
        assert!(url.contains("name=Jane+Doe"));
    }
}
