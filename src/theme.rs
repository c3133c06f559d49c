use codee::string::FromToStringCodec;
use leptos::logging::log;
use leptos::prelude::*;
use leptos_use::storage::use_local_storage;
use std::fmt;
use std::str::FromStr;

pub const THEME_STORAGE_KEY: &str = "theme";
const DARK_CLASS: &str = "dark";
const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// A stored choice wins over the OS hint. Anything unrecognised counts as unset.
pub fn resolve_theme(stored: &str, prefers_dark: bool) -> Theme {
    stored.parse().unwrap_or(if prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    })
}

#[derive(Clone, Copy)]
pub struct ThemeControl {
    pub theme: Signal<Theme>,
    pub toggle: Callback<()>,
}

/// The only app-wide setting. Mirrors the theme onto the document root and
/// persists every toggle immediately. The OS hint is read once at startup, later
/// OS changes don't repaint a running session.
pub fn use_theme() -> ThemeControl {
    let (stored, set_stored, _) =
        use_local_storage::<String, FromToStringCodec>(THEME_STORAGE_KEY);
    let prefers_dark = os_prefers_dark();
    log!("[DEBUG] [Theme] OS prefers dark at startup: {}.", prefers_dark);

    let theme = Signal::derive(move || resolve_theme(&stored.get(), prefers_dark));

    Effect::new(move |_| apply_to_document(theme.get()));

    let toggle = Callback::new(move |_| {
        let next = theme.get_untracked().toggled();
        log!("[DEBUG] [Theme] Switching to {}.", next);
        set_stored.set(next.to_string());
    });

    ThemeControl { theme, toggle }
}

fn os_prefers_dark() -> bool {
    match window().match_media(PREFERS_DARK_QUERY) {
        Ok(Some(query)) => query.matches(),
        Ok(None) => false,
        Err(e) => {
            log!("[WARN] [Theme] Color scheme query failed: {:?}", e);
            false
        }
    }
}

fn apply_to_document(theme: Theme) {
    let Some(root) = document().document_element() else {
        log!("[WARN] [Theme] No document element to style.");
        return;
    };
    let classes = root.class_list();
    let result = if theme.is_dark() {
        classes.add_1(DARK_CLASS)
    } else {
        classes.remove_1(DARK_CLASS)
    };
    if let Err(e) = result {
        log!("[ERROR] [Theme] Failed to update root class list: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_choice_wins_over_os_hint() {
        assert_eq!(resolve_theme("light", true), Theme::Light);
        assert_eq!(resolve_theme("dark", false), Theme::Dark);
    }

    #[test]
    fn os_hint_applies_when_nothing_is_stored() {
        assert_eq!(resolve_theme("", true), Theme::Dark);
        assert_eq!(resolve_theme("", false), Theme::Light);
        assert_eq!(resolve_theme("sepia", true), Theme::Dark);
    }

    #[test]
    fn toggle_from_os_default_is_stored_and_sticks() {
        let initial = resolve_theme("", true);
        let stored = initial.toggled().to_string();
        assert_eq!(stored, "light");
        // A later dark hint no longer matters once a choice is stored.
        assert_eq!(resolve_theme(&stored, true), Theme::Light);
    }

    #[test]
    fn storage_strings_round_trip() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
            assert_eq!(theme.toggled().toggled(), theme);
        }
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
