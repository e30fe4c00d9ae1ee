use serde_derive::{Deserialize, Serialize};

use super::{AppState, Role, Screen, Session};

/// The complete set of navigation transitions. Screens emit these; only
/// [`AppState::apply`] mutates state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavAction {
    Login { email: String },
    Register { name: String, email: String, role: Role },
    Logout,
    GoRegister,
    GoLogin,
    GoDashboard,
    GoSensors,
    GoSensorDetail { sensor_id: String },
    GoReports,
    GoOperations,
    GoExecutive,
    OpenAlerts,
    CloseAlerts,
}

impl AppState {
    pub fn apply(&mut self, action: NavAction) {
        match action {
            NavAction::Login { email } => {
                self.session = Some(Session::from_login(&email));
                self.screen = Screen::Dashboard;
            }
            NavAction::Register { name, email, role } => {
                self.session = Some(Session { name, email, role });
                self.screen = Screen::Dashboard;
            }
            NavAction::Logout => {
                self.session = None;
                self.selected_sensor = None;
                self.alerts_open = false;
                self.screen = Screen::Login;
            }
            NavAction::GoRegister if !self.logged_in() => self.screen = Screen::Register,
            NavAction::GoLogin if !self.logged_in() => self.screen = Screen::Login,
            NavAction::GoRegister | NavAction::GoLogin => {}
            NavAction::GoDashboard if self.logged_in() => self.screen = Screen::Dashboard,
            NavAction::GoSensors if self.logged_in() => self.screen = Screen::Sensors,
            NavAction::GoSensorDetail { sensor_id } if self.logged_in() => {
                self.selected_sensor = Some(sensor_id);
                self.screen = Screen::SensorDetail;
            }
            NavAction::GoReports if self.logged_in() => {
                // The alerts panel's shortcut closes the panel as it leaves.
                self.alerts_open = false;
                self.screen = Screen::Reports;
            }
            NavAction::GoOperations if self.logged_in() => self.screen = Screen::Operations,
            NavAction::GoExecutive if self.logged_in() => self.screen = Screen::Executive,
            NavAction::OpenAlerts if self.logged_in() => self.alerts_open = true,
            NavAction::CloseAlerts => self.alerts_open = false,
            // Logged-out navigation other than login/register is ignored.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_opens_the_dashboard_with_a_derived_session() {
        let mut state = AppState::default();
        state.apply(NavAction::Login {
            email: "maria@gamc.bo".to_string(),
        });
        assert_eq!(state.screen, Screen::Dashboard);
        let session = state.session.unwrap();
        assert_eq!(session.name, "maria");
        assert_eq!(session.role, Role::Administrador);
    }

    #[test]
    fn register_carries_name_and_role_through() {
        let mut state = AppState::default();
        state.apply(NavAction::GoRegister);
        assert_eq!(state.screen, Screen::Register);
        state.apply(NavAction::Register {
            name: "Juan Pérez".to_string(),
            email: "juan@gamc.bo".to_string(),
            role: Role::Tecnico,
        });
        assert_eq!(state.screen, Screen::Dashboard);
        assert_eq!(state.session.unwrap().role, Role::Tecnico);
    }

    #[test]
    fn logout_clears_everything_back_to_login() {
        let mut state = AppState::default();
        state.apply(NavAction::Login {
            email: "a@b.c".to_string(),
        });
        state.apply(NavAction::GoSensorDetail {
            sensor_id: "3".to_string(),
        });
        state.apply(NavAction::OpenAlerts);
        state.apply(NavAction::Logout);
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.selected_sensor.is_none());
        assert!(!state.alerts_open);
    }

    #[test]
    fn logged_out_users_cannot_reach_inner_screens() {
        let mut state = AppState::default();
        for action in [
            NavAction::GoDashboard,
            NavAction::GoSensors,
            NavAction::GoReports,
            NavAction::GoOperations,
            NavAction::GoExecutive,
            NavAction::OpenAlerts,
        ] {
            state.apply(action);
            assert_eq!(state.screen, Screen::Login);
            assert!(!state.alerts_open);
        }
    }

    #[test]
    fn sensor_detail_remembers_the_selection() {
        let mut state = AppState::default();
        state.apply(NavAction::Login {
            email: "a@b.c".to_string(),
        });
        state.apply(NavAction::GoSensorDetail {
            sensor_id: "5".to_string(),
        });
        assert_eq!(state.screen, Screen::SensorDetail);
        assert_eq!(state.selected_sensor.as_deref(), Some("5"));
    }

    #[test]
    fn alerts_shortcut_to_reports_closes_the_panel() {
        let mut state = AppState::default();
        state.apply(NavAction::Login {
            email: "a@b.c".to_string(),
        });
        state.apply(NavAction::OpenAlerts);
        assert!(state.alerts_open);
        state.apply(NavAction::GoReports);
        assert_eq!(state.screen, Screen::Reports);
        assert!(!state.alerts_open);
    }

    #[test]
    fn app_state_serializes_round_trip() {
        let mut state = AppState::default();
        state.apply(NavAction::Login {
            email: "ana@gamc.bo".to_string(),
        });
        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: AppState = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, state);
    }
}
