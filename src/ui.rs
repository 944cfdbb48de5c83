//! Main menu and tutorial flow
//!
//! Scene loading, panel visibility and quitting belong to the host. These
//! types only decide *what* to ask the host for and keep the flow state.

use std::collections::HashMap;

use crate::sim::{GameManager, GamePhase, SimEvent, TimeControl};

/// Scene the main menu's Play action loads
pub const GAME_SCENE: &str = "GAME";

/// Host-side scene and UI control
pub trait SceneHost {
    fn load_scene(&mut self, name: &str);
    fn set_panel_visible(&mut self, panel: &str, visible: bool);
    fn quit(&mut self);
}

/// Collaborator that actually starts the game once the tutorial is dismissed
pub trait GameStarter {
    fn start_game(&mut self, time: &mut TimeControl);
}

impl GameStarter for GameManager {
    fn start_game(&mut self, time: &mut TimeControl) {
        self.phase = GamePhase::Playing;
        time.resume();
        log::info!("Game started");
    }
}

/// Title screen actions
#[derive(Debug, Clone, Default)]
pub struct MainMenu;

impl MainMenu {
    pub fn play(&self, host: &mut dyn SceneHost) {
        log::info!("Loading scene '{}'", GAME_SCENE);
        host.load_scene(GAME_SCENE);
    }

    pub fn settings(&self) {
        log::info!("Settings button clicked");
    }

    pub fn exit(&self, host: &mut dyn SceneHost) {
        log::info!("Exiting game");
        host.quit();
    }
}

/// Which tutorial panel is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TutorialStep {
    /// Not shown (never begun, or missing UI)
    #[default]
    Inactive,
    First,
    Second,
    Done,
}

/// Names of the host UI elements the tutorial drives
#[derive(Debug, Clone, Default)]
pub struct TutorialUi {
    pub first_panel: Option<String>,
    pub second_panel: Option<String>,
    pub next_button: Option<String>,
    pub start_button: Option<String>,
}

/// Two-panel tutorial shown with the simulation paused
#[derive(Debug, Clone)]
pub struct Tutorial {
    ui: TutorialUi,
    step: TutorialStep,
}

impl Tutorial {
    pub fn new(ui: TutorialUi) -> Self {
        Self {
            ui,
            step: TutorialStep::Inactive,
        }
    }

    pub fn step(&self) -> TutorialStep {
        self.step
    }

    /// Show the first panel and pause the simulation.
    ///
    /// With any UI element missing the tutorial stays inactive and time keeps
    /// running.
    pub fn begin(&mut self, host: &mut dyn SceneHost, time: &mut TimeControl) {
        let ui = &self.ui;
        let (Some(first), Some(second), Some(_), Some(_)) = (
            &ui.first_panel,
            &ui.second_panel,
            &ui.next_button,
            &ui.start_button,
        ) else {
            log::warn!("Tutorial: missing UI references");
            return;
        };

        host.set_panel_visible(first, true);
        host.set_panel_visible(second, false);
        time.pause();
        self.step = TutorialStep::First;
    }

    /// Next button: swap to the second panel and hide the Next button
    pub fn next(&mut self, host: &mut dyn SceneHost) {
        if self.step != TutorialStep::First {
            return;
        }
        if let (Some(first), Some(second), Some(next)) =
            (&self.ui.first_panel, &self.ui.second_panel, &self.ui.next_button)
        {
            host.set_panel_visible(first, false);
            host.set_panel_visible(second, true);
            host.set_panel_visible(next, false);
            self.step = TutorialStep::Second;
        }
    }

    /// Start button: hide the tutorial and hand over to `starter`.
    ///
    /// Without a starter the simulation is simply unpaused. Returns
    /// `GameStarted` for listeners, or `None` if the tutorial was not showing.
    pub fn start(
        &mut self,
        host: &mut dyn SceneHost,
        time: &mut TimeControl,
        starter: Option<&mut dyn GameStarter>,
    ) -> Option<SimEvent> {
        if !matches!(self.step, TutorialStep::First | TutorialStep::Second) {
            return None;
        }
        log::info!("Tutorial start clicked");

        for panel in [&self.ui.first_panel, &self.ui.second_panel]
            .into_iter()
            .flatten()
        {
            host.set_panel_visible(panel, false);
        }
        self.step = TutorialStep::Done;

        match starter {
            Some(starter) => starter.start_game(time),
            None => {
                log::warn!("Tutorial: no game starter injected, unpausing manually");
                time.resume();
            }
        }
        Some(SimEvent::GameStarted)
    }
}

/// Host that records every request; used by the demo and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub loaded_scenes: Vec<String>,
    pub panels: HashMap<String, bool>,
    pub quit_requested: bool,
}

impl RecordingHost {
    pub fn is_visible(&self, panel: &str) -> bool {
        self.panels.get(panel).copied().unwrap_or(false)
    }
}

impl SceneHost for RecordingHost {
    fn load_scene(&mut self, name: &str) {
        self.loaded_scenes.push(name.to_string());
    }

    fn set_panel_visible(&mut self, panel: &str, visible: bool) {
        self.panels.insert(panel.to_string(), visible);
    }

    fn quit(&mut self) {
        self.quit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_ui() -> TutorialUi {
        TutorialUi {
            first_panel: Some("first".into()),
            second_panel: Some("second".into()),
            next_button: Some("next".into()),
            start_button: Some("start".into()),
        }
    }

    #[test]
    fn test_main_menu() {
        let mut host = RecordingHost::default();
        let menu = MainMenu;
        menu.play(&mut host);
        menu.settings();
        menu.exit(&mut host);
        assert_eq!(host.loaded_scenes, vec!["GAME".to_string()]);
        assert!(host.quit_requested);
    }

    #[test]
    fn test_tutorial_flow_with_manager() {
        let mut host = RecordingHost::default();
        let mut time = TimeControl::default();
        let mut game = GameManager::default();
        let mut tutorial = Tutorial::new(full_ui());

        tutorial.begin(&mut host, &mut time);
        assert!(time.is_paused());
        assert!(host.is_visible("first"));
        assert!(!host.is_visible("second"));

        tutorial.next(&mut host);
        assert_eq!(tutorial.step(), TutorialStep::Second);
        assert!(host.is_visible("second"));
        assert!(!host.is_visible("next"));

        let event = tutorial.start(&mut host, &mut time, Some(&mut game));
        assert_eq!(event, Some(SimEvent::GameStarted));
        assert!(!host.is_visible("second"));
        assert!(!time.is_paused());
        assert_eq!(game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_start_without_manager_unpauses() {
        let mut host = RecordingHost::default();
        let mut time = TimeControl::default();
        let mut tutorial = Tutorial::new(full_ui());
        tutorial.begin(&mut host, &mut time);
        assert_eq!(
            tutorial.start(&mut host, &mut time, None),
            Some(SimEvent::GameStarted)
        );
        assert_eq!(time.scale, 1.0);
        // A second click does nothing
        assert_eq!(tutorial.start(&mut host, &mut time, None), None);
    }

    #[test]
    fn test_missing_ui_keeps_running() {
        let mut host = RecordingHost::default();
        let mut time = TimeControl::default();
        let mut tutorial = Tutorial::new(TutorialUi {
            start_button: None,
            ..full_ui()
        });
        tutorial.begin(&mut host, &mut time);
        assert_eq!(tutorial.step(), TutorialStep::Inactive);
        assert!(!time.is_paused());
        assert!(host.panels.is_empty());
        assert_eq!(tutorial.start(&mut host, &mut time, None), None);
    }

    #[test]
    fn test_simulation_game_manager_starts_game() {
        use crate::Settings;
        use crate::sim::Simulation;

        let mut host = RecordingHost::default();
        let mut sim = Simulation::new(Settings::default());
        let mut tutorial = Tutorial::new(full_ui());

        tutorial.begin(&mut host, &mut sim.time);
        tutorial.next(&mut host);
        let event = tutorial.start(&mut host, &mut sim.time, Some(&mut sim.game));

        assert_eq!(event, Some(SimEvent::GameStarted));
        assert_eq!(sim.game.phase, GamePhase::Playing);
        assert!(!sim.time.is_paused());
    }
}
