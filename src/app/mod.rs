//! Application state shared by every screen. Navigation is an explicit,
//! serializable value mutated only through the closed [`nav::NavAction`]
//! set, never through ad hoc callbacks.

pub mod nav;

use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Administrador,
    Investigador,
    Tecnico,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrador, Role::Investigador, Role::Tecnico];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrador => "Administrador",
            Role::Investigador => "Investigador",
            Role::Tecnico => "Técnico",
        }
    }
}

/// The "logged in" user. Client-side only; nothing is verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Login derives the display name from the email's local part and
    /// grants Administrador, as the mocked flow always has.
    pub fn from_login(email: &str) -> Self {
        Self {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role: Role::Administrador,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
    Sensors,
    SensorDetail,
    Reports,
    Operations,
    Executive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<Session>,
    pub selected_sensor: Option<String>,
    pub alerts_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Login,
            session: None,
            selected_sensor: None,
            alerts_open: false,
        }
    }
}

impl AppState {
    pub fn logged_in(&self) -> bool {
        self.session.is_some()
    }
}
