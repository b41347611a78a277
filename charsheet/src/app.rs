//! Main application state and logic

use charsheet_core::check::{party_skill_check_with_rng, skill_check_with_rng};
use charsheet_core::dice::Advantage;
use charsheet_core::headless::HeadlessConfig;
use charsheet_core::{
    Ability, Character, CharacterStore, Delta, RulesEngine, Skill, SkillCheck, SkillCheckResult,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ui::theme::GameTheme;
use crate::ui::{FocusedPanel, Overlay};

/// Skill check DCs offered by `d`/`D`.
const DC_MIN: i32 = 5;
const DC_MAX: i32 = 30;

/// Main application state
pub struct App {
    pub engine: RulesEngine,
    pub store: CharacterStore,
    /// Index of the character being edited. Meaningless when the store is empty.
    pub selected: usize,

    // UI state
    pub theme: GameTheme,
    pub focused_panel: FocusedPanel,
    pub attribute_cursor: usize,
    pub skill_cursor: usize,
    overlay: Option<Overlay>,

    // Skill checks
    pub dc: i32,
    pub advantage: Advantage,
    pub last_check: Option<SkillCheckResult>,
    rng: ChaCha8Rng,

    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: HeadlessConfig) -> Self {
        let engine = RulesEngine::with_config(config.rules);
        let characters = (0..config.characters)
            .map(|_| engine.new_character())
            .collect();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            engine,
            store: CharacterStore::with_characters(characters),
            selected: 0,
            theme: GameTheme::default(),
            focused_panel: FocusedPanel::default(),
            attribute_cursor: 0,
            skill_cursor: 0,
            overlay: None,
            dc: 10,
            advantage: Advantage::Normal,
            last_check: None,
            rng,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn character(&self) -> Option<&Character> {
        self.store.characters().get(self.selected)
    }

    pub fn selected_ability(&self) -> Ability {
        Ability::all()[self.attribute_cursor]
    }

    pub fn selected_skill(&self) -> Skill {
        Skill::all()[self.skill_cursor]
    }

    // =========================================================================
    // Overlays and status
    // =========================================================================

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            _ => Some(Overlay::Help),
        };
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Attributes => FocusedPanel::Skills,
            FocusedPanel::Skills => FocusedPanel::Attributes,
        };
    }

    pub fn cursor_down(&mut self) {
        match self.focused_panel {
            FocusedPanel::Attributes => {
                self.attribute_cursor = (self.attribute_cursor + 1) % Ability::all().len();
            }
            FocusedPanel::Skills => {
                self.skill_cursor = (self.skill_cursor + 1) % Skill::all().len();
            }
        }
    }

    pub fn cursor_up(&mut self) {
        match self.focused_panel {
            FocusedPanel::Attributes => {
                let len = Ability::all().len();
                self.attribute_cursor = (self.attribute_cursor + len - 1) % len;
            }
            FocusedPanel::Skills => {
                let len = Skill::all().len();
                self.skill_cursor = (self.skill_cursor + len - 1) % len;
            }
        }
    }

    pub fn next_character(&mut self) {
        if !self.store.is_empty() {
            self.selected = (self.selected + 1) % self.store.len();
        }
    }

    pub fn previous_character(&mut self) {
        if !self.store.is_empty() {
            let len = self.store.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    // =========================================================================
    // Changes
    // =========================================================================

    /// Apply `delta` to whatever the cursor points at.
    ///
    /// A capacity notice opens as a modal; every other outcome is silent.
    pub fn change_focused(&mut self, delta: Delta) {
        if self.store.is_empty() {
            self.set_status("No characters; press n to add one");
            return;
        }

        let index = self.selected;
        let notice = match self.focused_panel {
            FocusedPanel::Attributes => {
                let ability = self.selected_ability();
                self.store
                    .on_change_attribute(&self.engine, index, ability, delta)
            }
            FocusedPanel::Skills => {
                let skill = self.selected_skill();
                self.store.on_change_skill(&self.engine, index, skill, delta)
            }
        };

        if let Some(notice) = notice {
            self.overlay = Some(Overlay::Notice(notice.to_string()));
        }
    }

    pub fn add_character(&mut self) {
        self.selected = self.store.add_character(&self.engine);
        self.set_status(format!("Added character {}", self.selected + 1));
    }

    pub fn remove_character(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let index = self.selected;
        self.store.remove_character(index);
        self.selected = index.min(self.store.len().saturating_sub(1));
        self.last_check = None;
        self.set_status(format!("Removed character {}", index + 1));
    }

    // =========================================================================
    // Skill checks
    // =========================================================================

    pub fn raise_dc(&mut self) {
        self.dc = (self.dc + 1).min(DC_MAX);
    }

    pub fn lower_dc(&mut self) {
        self.dc = (self.dc - 1).max(DC_MIN);
    }

    pub fn cycle_advantage(&mut self) {
        self.advantage = self.advantage.cycle();
    }

    fn pending_check(&self) -> SkillCheck {
        SkillCheck::new(self.selected_skill(), self.dc).with_advantage(self.advantage)
    }

    /// Roll the skill under the cursor for the selected character.
    pub fn roll_check(&mut self) {
        let check = self.pending_check();
        let Some(character) = self.store.characters().get(self.selected) else {
            self.set_status("No characters to roll for");
            return;
        };
        let result = skill_check_with_rng(character, self.selected, &check, &mut self.rng);
        self.set_status(result.to_string());
        self.last_check = Some(result);
    }

    /// Roll the skill under the cursor for whoever in the party is best at it.
    pub fn roll_party_check(&mut self) {
        let check = self.pending_check();
        match party_skill_check_with_rng(&self.store, &check, &mut self.rng) {
            Some(result) => {
                self.set_status(format!("Party check: {result}"));
                self.last_check = Some(result);
            }
            None => self.set_status("No characters to roll for"),
        }
    }
}
