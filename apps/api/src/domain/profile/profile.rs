use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Social;
use crate::domain::user::{User, UserSummary};

/// Developer profile, one per user
///
/// `U` is the representation of the owning user: a bare id when stored,
/// an [`Owner`] once populated for a response.
///
/// # Invariants
/// - At most one profile per `user`
/// - `experience` and `education` are newest-first; entries are added at
///   the front and removed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile<U = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: U,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

/// Owner reference as rendered in responses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Owner {
    Populated(UserSummary),
    /// The user document is gone; only the id remains
    Dangling(Uuid),
}

pub type PopulatedProfile = Profile<Owner>;

/// Validated top-level profile fields from an upsert request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDetails {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Social,
}

/// Work history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Schooling entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Embedded record addressable by its own id
pub trait SubDocument {
    fn id(&self) -> Uuid;
}

impl SubDocument for Experience {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl SubDocument for Education {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Removes the single entry with `id`, keeping the order of the rest.
/// Returns false and leaves `items` untouched when no entry matches.
fn remove_by_id<T: SubDocument>(items: &mut Vec<T>, id: Uuid) -> bool {
    match items.iter().position(|item| item.id() == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

impl Profile {
    /// Creates a fresh profile for `user_id` with empty history
    pub fn new(user_id: Uuid, details: ProfileDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user_id,
            company: details.company,
            website: details.website,
            location: details.location,
            status: details.status,
            skills: details.skills,
            bio: details.bio,
            githubusername: details.githubusername,
            social: details.social,
            experience: Vec::new(),
            education: Vec::new(),
            date: Utc::now(),
        }
    }

    /// Shallow merge: required fields and the social block are replaced,
    /// optional fields only when supplied. History is never touched.
    pub fn apply(&mut self, details: ProfileDetails) {
        self.status = details.status;
        self.skills = details.skills;
        self.social = details.social;

        let optional = [
            (&mut self.company, details.company),
            (&mut self.website, details.website),
            (&mut self.location, details.location),
            (&mut self.bio, details.bio),
            (&mut self.githubusername, details.githubusername),
        ];
        for (slot, value) in optional {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    pub fn add_experience(&mut self, experience: Experience) {
        self.experience.insert(0, experience);
    }

    pub fn remove_experience(&mut self, id: Uuid) -> bool {
        remove_by_id(&mut self.experience, id)
    }

    pub fn add_education(&mut self, education: Education) {
        self.education.insert(0, education);
    }

    pub fn remove_education(&mut self, id: Uuid) -> bool {
        remove_by_id(&mut self.education, id)
    }

    /// Replaces the owner id with the owner's public summary
    pub fn populate(self, owner: Option<&User>) -> PopulatedProfile {
        let user = match owner {
            Some(user) => Owner::Populated(user.summary()),
            None => Owner::Dangling(self.user),
        };

        Profile {
            id: self.id,
            user,
            company: self.company,
            website: self.website,
            location: self.location,
            status: self.status,
            skills: self.skills,
            bio: self.bio,
            githubusername: self.githubusername,
            social: self.social,
            experience: self.experience,
            education: self.education,
            date: self.date,
        }
    }
}
