//! Application state container with independently persisted partitions.
//!
//! Built once at startup from a state directory and passed by reference to
//! whatever needs it. Each persisted partition lives in its own TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::notification::NotificationBus;
use crate::prelude::*;

const AUTH_FILE: &str = "auth.toml";
const LAST_VISITED_FILE: &str = "last_visited.toml";

/// Authentication partition. Cleared on sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub username: Option<String>,
}

/// Last course, session and exercise the user looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastVisited {
    pub course_id: Option<i64>,
    pub session_id: Option<i64>,
    pub exercise_id: Option<i64>,
}

#[derive(Debug)]
pub struct AppState {
    dir: PathBuf,
    pub auth: AuthState,
    pub last_visited: LastVisited,
    /// Not persisted.
    pub notifications: NotificationBus,
}

impl AppState {
    /// Loads every persisted partition from `dir`. Missing files yield defaults.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let auth = load_partition(&dir.join(AUTH_FILE))?;
        let last_visited = load_partition(&dir.join(LAST_VISITED_FILE))?;
        debug!("Loaded application state from {}", dir.display());

        Ok(Self {
            dir,
            auth,
            last_visited,
            notifications: NotificationBus::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn access_token(&self) -> Option<&str> {
        self.auth.access_token.as_deref()
    }

    pub fn save_auth(&self) -> Result<()> {
        save_partition(&self.dir, AUTH_FILE, &self.auth)
    }

    pub fn save_last_visited(&self) -> Result<()> {
        save_partition(&self.dir, LAST_VISITED_FILE, &self.last_visited)
    }

    /// Records a visit to an exercise and persists it.
    pub fn visit_exercise(&mut self, exercise_id: i64) -> Result<()> {
        self.last_visited.exercise_id = Some(exercise_id);
        self.save_last_visited()
    }

    /// Clears the auth partition and its persisted copy. Other partitions stay.
    pub fn sign_out(&mut self) -> Result<()> {
        self.auth = AuthState::default();
        match std::fs::remove_file(self.dir.join(AUTH_FILE)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        info!("Signed out");
        Ok(())
    }
}

fn load_partition<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err.into()),
    }
}

fn save_partition<T: Serialize>(dir: &Path, file: &str, partition: &T) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let contents = toml::to_string(partition)?;
    std::fs::write(dir.join(file), contents)?;
    Ok(())
}
