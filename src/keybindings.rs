//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so users can remap any action from
//! config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    NextReel,
    PrevReel,
    Top,
    Bottom,
    Like,
    ToggleMute,
    Share,
    OpenSource,
    ShowHelp,
    CloseHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::NextReel => "Next reel",
            Self::PrevReel => "Previous reel",
            Self::Top => "Jump to first reel",
            Self::Bottom => "Jump to last loaded reel",
            Self::Like => "Like / unlike current reel",
            Self::ToggleMute => "Mute / unmute all reels",
            Self::Share => "Share current reel",
            Self::OpenSource => "Open video in system player",
            Self::ShowHelp => "Show help",
            Self::CloseHelp => "Close help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Help,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "?"
/// - Named keys: "Enter", "Esc", "Space", "PageDown", "Home", ...
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let rest = rest.trim();
        if rest.chars().count() == 1 {
            let c = rest.chars().next()?;
            return Some(KeySpec::ctrl(c));
        }
        return None;
    }

    // Named keys (case-insensitive)
    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            if (1..=12).contains(&n) {
                return Some(KeySpec::plain(KeyCode::F(n)));
            }
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to [`Context::Global`].
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings, in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use KeyCode::*;

        let global = [
            (Char('q'), Action::Quit),
            (Char('j'), Action::ScrollDown),
            (Down, Action::ScrollDown),
            (Char('k'), Action::ScrollUp),
            (Up, Action::ScrollUp),
            (Char(' '), Action::NextReel),
            (PageDown, Action::NextReel),
            (Char('b'), Action::PrevReel),
            (PageUp, Action::PrevReel),
            (Char('g'), Action::Top),
            (Char('G'), Action::Bottom),
            (Char('l'), Action::Like),
            (Char('m'), Action::ToggleMute),
            (Char('s'), Action::Share),
            (Char('o'), Action::OpenSource),
            (Char('?'), Action::ShowHelp),
        ];
        for (code, action) in global {
            self.bind(Context::Global, KeySpec::plain(code), action);
        }

        // Help overlay: j/k scroll the table, everything else is swallowed
        self.bind(Context::Help, KeySpec::plain(Esc), Action::CloseHelp);
        self.bind(Context::Help, KeySpec::plain(Char('?')), Action::CloseHelp);
        self.bind(Context::Help, KeySpec::plain(Char('j')), Action::ScrollDown);
        self.bind(Context::Help, KeySpec::plain(Down), Action::ScrollDown);
        self.bind(Context::Help, KeySpec::plain(Char('k')), Action::ScrollUp);
        self.bind(Context::Help, KeySpec::plain(Up), Action::ScrollUp);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "like").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (c, _, a) in &self.bindings {
                if *a == action && !contexts.contains(c) {
                    contexts.push(*c);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first, then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// First key bound to `action` in `context`, formatted for display.
    pub fn key_hint(&self, context: Context, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "scroll_down" | "scrolldown" | "down" => Some(Action::ScrollDown),
        "scroll_up" | "scrollup" | "up" => Some(Action::ScrollUp),
        "next_reel" | "nextreel" | "next" => Some(Action::NextReel),
        "prev_reel" | "prevreel" | "prev" | "previous" => Some(Action::PrevReel),
        "top" | "first" => Some(Action::Top),
        "bottom" | "last" => Some(Action::Bottom),
        "like" | "toggle_like" => Some(Action::Like),
        "toggle_mute" | "togglemute" | "mute" => Some(Action::ToggleMute),
        "share" => Some(Action::Share),
        "open_source" | "opensource" | "open" => Some(Action::OpenSource),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "close_help" | "closehelp" => Some(Action::CloseHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_default_feed_keys() {
        let reg = KeybindingRegistry::new();
        let at = |code| reg.action_for_key(code, KeyModifiers::NONE, Context::Global);
        assert_eq!(at(KeyCode::Char('j')), Some(Action::ScrollDown));
        assert_eq!(at(KeyCode::Down), Some(Action::ScrollDown));
        assert_eq!(at(KeyCode::Char('k')), Some(Action::ScrollUp));
        assert_eq!(at(KeyCode::Char(' ')), Some(Action::NextReel));
        assert_eq!(at(KeyCode::PageDown), Some(Action::NextReel));
        assert_eq!(at(KeyCode::PageUp), Some(Action::PrevReel));
        assert_eq!(at(KeyCode::Char('G')), Some(Action::Bottom));
        assert_eq!(at(KeyCode::Char('l')), Some(Action::Like));
        assert_eq!(at(KeyCode::Char('m')), Some(Action::ToggleMute));
        assert_eq!(at(KeyCode::Char('s')), Some(Action::Share));
        assert_eq!(at(KeyCode::Char('o')), Some(Action::OpenSource));
    }

    #[test]
    fn test_help_context_overrides_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('?'), KeyModifiers::NONE, Context::Help),
            Some(Action::CloseHelp)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Help),
            Some(Action::CloseHelp)
        );
        // Falls back to Global
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Help),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_esc_unbound_outside_help() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("like".to_string(), "f".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('l'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('f'), KeyModifiers::NONE, Context::Global),
            Some(Action::Like)
        );
    }

    #[test]
    fn test_override_rebinds_every_context_once() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("scroll_down".to_string(), "n".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::Help),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::Global),
            None
        );
        let count = reg
            .all_bindings()
            .iter()
            .filter(|(_, _, a, _)| *a == Action::ScrollDown)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("refresh".to_string(), "r".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
        assert_eq!(
            parse_key_string("PageDown"),
            Some(KeySpec::plain(KeyCode::PageDown))
        );
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+l"), Some(KeySpec::ctrl('l')));
        assert_eq!(
            parse_key_string("G"),
            Some(KeySpec::plain(KeyCode::Char('G')))
        );
        assert_eq!(parse_key_string("xy"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Space");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::PageUp)), "PageUp");
    }

    #[test]
    fn test_key_hint() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.key_hint(Context::Global, Action::Like).as_deref(),
            Some("l")
        );
        assert_eq!(reg.key_hint(Context::Global, Action::CloseHelp), None);
    }

    #[test]
    fn test_every_action_has_a_description() {
        let reg = KeybindingRegistry::new();
        for (_, _, action, desc) in reg.all_bindings() {
            assert!(!desc.is_empty(), "{:?} has no description", action);
        }
    }
}
