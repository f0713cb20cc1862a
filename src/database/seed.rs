use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::database::activity_directory::Activities;
use crate::models::Activity;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("activity {activity:?} lists {email:?} more than once")]
    DuplicateParticipant { activity: String, email: String },
    #[error("activity {activity:?} has {count} participants but room for {max}")]
    OverCapacity {
        activity: String,
        count: usize,
        max: usize,
    },
}

// (name, description, schedule, max_participants, participants)
const BUILTIN: &[(&str, &str, &str, usize, &[&str])] = &[
    (
        "Chess Club",
        "Learn strategies and compete in chess tournaments",
        "Fridays, 3:30 PM - 5:00 PM",
        12,
        &["michael@mergington.edu", "daniel@mergington.edu"],
    ),
    (
        "Programming Class",
        "Learn programming fundamentals and build software projects",
        "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        20,
        &["emma@mergington.edu", "sophia@mergington.edu"],
    ),
    (
        "Gym Class",
        "Physical education and sports activities",
        "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        30,
        &["john@mergington.edu", "olivia@mergington.edu"],
    ),
    (
        "Soccer Team",
        "Train together and play matches against other schools",
        "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
        22,
        &["liam@mergington.edu", "noah@mergington.edu"],
    ),
    (
        "Art Club",
        "Explore painting, drawing and sculpture",
        "Wednesdays, 3:30 PM - 5:00 PM",
        15,
        &["ava@mergington.edu", "mia@mergington.edu"],
    ),
    (
        "Debate Team",
        "Practice public speaking and argue current topics",
        "Thursdays, 3:30 PM - 5:00 PM",
        16,
        &["lucas@mergington.edu", "amelia@mergington.edu"],
    ),
];

/// The activities a fresh process starts with.
pub fn builtin_activities() -> Activities {
    BUILTIN
        .iter()
        .map(|(name, description, schedule, max, participants)| {
            (
                name.to_string(),
                Activity {
                    description: description.to_string(),
                    schedule: schedule.to_string(),
                    max_participants: *max,
                    participants: participants.iter().map(|p| p.to_string()).collect(),
                },
            )
        })
        .collect()
}

/// Loads activities from a JSON file shaped like the `GET /activities` body.
pub fn load_seed_file(path: &Path) -> Result<Activities, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let activities: Activities =
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&activities)?;
    Ok(activities)
}

/// Builtin seed unless a seed file is configured.
pub fn initial_activities(seed_file: Option<&Path>) -> Result<Activities, SeedError> {
    match seed_file {
        Some(path) => load_seed_file(path),
        None => Ok(builtin_activities()),
    }
}

fn validate(activities: &Activities) -> Result<(), SeedError> {
    for (name, activity) in activities {
        let mut seen = HashSet::new();
        for email in &activity.participants {
            if !seen.insert(email.as_str()) {
                return Err(SeedError::DuplicateParticipant {
                    activity: name.clone(),
                    email: email.clone(),
                });
            }
        }
        if activity.participants.len() > activity.max_participants {
            return Err(SeedError::OverCapacity {
                activity: name.clone(),
                count: activity.participants.len(),
                max: activity.max_participants,
            });
        }
    }
    Ok(())
}
