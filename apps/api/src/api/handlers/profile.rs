use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::Payload;
use crate::api::middleware::auth::AuthUser;
use crate::domain::profile::{
    Education, Experience, PopulatedProfile, Profile, ProfileDetails, SkillsInput, Social,
};
use crate::domain::validation::{parse_date, FieldError, Validator};
use crate::infrastructure::github::{is_valid_username, GithubError};
use crate::state::AppState;

const NO_PROFILE: &str = "There is no profile for this user";
const PROFILE_NOT_FOUND: &str = "Profile not found";

/// Request body for creating or updating a profile
///
/// Social handles arrive as top-level fields.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub status: Option<String>,
    pub skills: Option<SkillsInput>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    fn into_details(self) -> Result<ProfileDetails, Vec<FieldError>> {
        let skills = self.skills.map(SkillsInput::into_skills).unwrap_or_default();

        Validator::new()
            .required("status", self.status.as_deref(), "Status is required")
            .check(!skills.is_empty(), "skills", "Skills is required")
            .finish()?;

        Ok(ProfileDetails {
            status: self.status.unwrap_or_default(),
            skills,
            company: self.company,
            website: self.website,
            location: self.location,
            bio: self.bio,
            githubusername: self.githubusername,
            social: Social {
                youtube: self.youtube,
                twitter: self.twitter,
                facebook: self.facebook,
                linkedin: self.linkedin,
                instagram: self.instagram,
            },
        })
    }
}

/// Request body for adding an experience entry
#[derive(Debug, Default, Deserialize)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl ExperienceRequest {
    fn into_experience(self) -> Result<Experience, Vec<FieldError>> {
        Validator::new()
            .required("title", self.title.as_deref(), "Title is required")
            .required("company", self.company.as_deref(), "Company is required")
            .required("from", self.from.as_deref(), "From date is required")
            .date("from", self.from.as_deref(), "From date is invalid")
            .date("to", self.to.as_deref(), "To date is invalid")
            .finish()?;

        let (from, to) = parse_range(self.from.as_deref(), self.to.as_deref())?;

        Ok(Experience {
            id: Uuid::new_v4(),
            title: self.title.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            location: self.location,
            from,
            to,
            current: self.current.unwrap_or(false),
            description: self.description,
        })
    }
}

/// Request body for adding an education entry
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl EducationRequest {
    fn into_education(self) -> Result<Education, Vec<FieldError>> {
        Validator::new()
            .required("school", self.school.as_deref(), "School is required")
            .required("degree", self.degree.as_deref(), "Degree is required")
            .required(
                "fieldOfStudy",
                self.field_of_study.as_deref(),
                "Field of Study is required",
            )
            .required("from", self.from.as_deref(), "From date is required")
            .date("from", self.from.as_deref(), "From date is invalid")
            .date("to", self.to.as_deref(), "To date is invalid")
            .finish()?;

        let (from, to) = parse_range(self.from.as_deref(), self.to.as_deref())?;

        Ok(Education {
            id: Uuid::new_v4(),
            school: self.school.unwrap_or_default(),
            degree: self.degree.unwrap_or_default(),
            field_of_study: self.field_of_study.unwrap_or_default(),
            from,
            to,
            current: self.current.unwrap_or(false),
            description: self.description,
        })
    }
}

type DateRange = (chrono::DateTime<chrono::Utc>, Option<chrono::DateTime<chrono::Utc>>);

/// `from` is required, `to` optional (blank counts as absent)
fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, Vec<FieldError>> {
    let from = from
        .and_then(parse_date)
        .ok_or_else(|| vec![FieldError::body("from", "From date is invalid")])?;
    let to = match to.filter(|t| !t.trim().is_empty()) {
        Some(raw) => Some(
            parse_date(raw).ok_or_else(|| vec![FieldError::body("to", "To date is invalid")])?,
        ),
        None => None,
    };
    Ok((from, to))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

async fn populate(state: &AppState, profile: Profile) -> Result<PopulatedProfile, ApiError> {
    let owner = state.users.find_by_id(profile.user).await?;
    Ok(profile.populate(owner.as_ref()))
}

async fn own_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::rejected(NO_PROFILE))
}

/// Current user's profile
///
/// GET /api/profile/me
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PopulatedProfile>, ApiError> {
    let profile = own_profile(&state, user_id).await?;
    Ok(Json(populate(&state, profile).await?))
}

/// All profiles
///
/// GET /api/profile
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopulatedProfile>>, ApiError> {
    let profiles = state.profiles.find_all().await?;

    let owner_ids: Vec<Uuid> = profiles.iter().map(|p| p.user).collect();
    let owners: HashMap<Uuid, _> = state
        .users
        .find_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let populated = profiles
        .into_iter()
        .map(|p| {
            let owner = owners.get(&p.user);
            p.populate(owner)
        })
        .collect();

    Ok(Json(populated))
}

/// Profile by owner id
///
/// GET /api/profile/user/:user_id
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PopulatedProfile>, ApiError> {
    // An unparsable id cannot match any profile
    let user_id =
        Uuid::parse_str(&user_id).map_err(|_| ApiError::not_found(PROFILE_NOT_FOUND))?;

    let profile = state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    Ok(Json(populate(&state, profile).await?))
}

/// Create or update the caller's profile
///
/// POST /api/profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Payload(req): Payload<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let details = req.into_details()?;

    // A token can outlive its account
    if state.users.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let profile = match state.profiles.find_by_user(user_id).await? {
        Some(mut existing) => {
            existing.apply(details);
            tracing::info!(%user_id, profile_id = %existing.id, "profile updated");
            existing
        }
        None => {
            let created = Profile::new(user_id, details);
            tracing::info!(%user_id, profile_id = %created.id, "profile created");
            created
        }
    };

    state.profiles.save(&profile).await?;

    Ok(Json(profile))
}

/// Delete the caller's posts, profile and user
///
/// DELETE /api/profile
///
/// The three removals are independent; a failure part way leaves the
/// earlier ones applied.
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let posts = state.posts.delete_by_user(user_id).await?;
    let had_profile = state.profiles.delete_by_user(user_id).await?;
    let had_user = state.users.delete(user_id).await?;

    tracing::info!(%user_id, posts, had_profile, had_user, "account deleted");

    Ok(Json(MessageResponse {
        msg: "User deleted".to_string(),
    }))
}

/// Add an experience entry to the caller's profile
///
/// PUT /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Payload(req): Payload<ExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    let experience = req.into_experience()?;

    let mut profile = own_profile(&state, user_id).await?;
    profile.add_experience(experience);
    state.profiles.save(&profile).await?;

    Ok(Json(profile))
}

/// Remove an experience entry from the caller's profile
///
/// DELETE /api/profile/experience/:experience_id
pub async fn delete_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(experience_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = own_profile(&state, user_id).await?;

    let removed = Uuid::parse_str(&experience_id)
        .map(|id| profile.remove_experience(id))
        .unwrap_or(false);
    if !removed {
        return Err(ApiError::not_found("Experience not found"));
    }

    state.profiles.save(&profile).await?;

    Ok(Json(profile))
}

/// Add an education entry to the caller's profile
///
/// PUT /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Payload(req): Payload<EducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    let education = req.into_education()?;

    let mut profile = own_profile(&state, user_id).await?;
    profile.add_education(education);
    state.profiles.save(&profile).await?;

    Ok(Json(profile))
}

/// Remove an education entry from the caller's profile
///
/// DELETE /api/profile/education/:education_id
pub async fn delete_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(education_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = own_profile(&state, user_id).await?;

    let removed = Uuid::parse_str(&education_id)
        .map(|id| profile.remove_education(id))
        .unwrap_or(false);
    if !removed {
        return Err(ApiError::not_found("Education not found"));
    }

    state.profiles.save(&profile).await?;

    Ok(Json(profile))
}

/// A user's latest public repositories from GitHub
///
/// GET /api/profile/github/:username
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !is_valid_username(&username) {
        return Err(GithubError::NotFound.into());
    }

    let repos = state.github.user_repos(&username).await?;

    Ok(Json(repos))
}
