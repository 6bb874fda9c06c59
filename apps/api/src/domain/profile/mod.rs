// Profile domain module
// Profile document with embedded experience and education history

#![allow(clippy::module_inception)]

pub mod profile;
pub mod value_objects;

pub use profile::{
    Education, Experience, Owner, PopulatedProfile, Profile, ProfileDetails, SubDocument,
};
pub use value_objects::{SkillsInput, Social};
