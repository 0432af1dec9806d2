//! Navigation targets and the post-login route decision.

use std::sync::Mutex;
use tracing::info;

use crate::models::{Role, UserProfile};

pub const LOGIN_ROUTE: &str = "/login";

/// Receives route changes requested by the client core
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default navigator: remembers the current route
#[derive(Debug)]
pub struct Router {
    current: Mutex<String>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(LOGIN_ROUTE.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.current
            .lock()
            .map(|path| path.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        info!("Navigating to {}", path);
        match self.current.lock() {
            Ok(mut current) => *current = path.to_string(),
            Err(poisoned) => *poisoned.into_inner() = path.to_string(),
        }
    }
}

/// Where a freshly logged-in user lands, based on role and wizard step
pub fn route_after_login(user: &UserProfile) -> &'static str {
    let step = user.step_name.as_deref().unwrap_or("");
    match user.role() {
        Role::Tutor => match step {
            "PERSONAL_INFO" => "/personal-info",
            "EDUCATION" => "/education",
            "EXPERIENCE" => "/experience",
            "TEACHING_DETAILS" => "/teaching-details",
            _ => "/tutor-dashboard",
        },
        Role::Student => match step {
            "PERSONAL_INFO" => "/student-profile",
            "REQUIREMENT" => "/post-requirement",
            _ => "/student-dashboard",
        },
        Role::Other => "/dashboard",
    }
}
