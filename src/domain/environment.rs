use std::fmt;

use clap::ValueEnum;

/// Deployment stage a run uploads tickets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Dev,
    Qa,
    Staging,
    Prod,
}

impl Environment {
    /// Menu order used by the interactive selection.
    pub const ALL: [Environment; 4] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Staging,
        Environment::Prod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Qa => "QA",
            Environment::Staging => "STAGING",
            Environment::Prod => "PROD",
        }
    }

    /// Resolves a 1-based menu choice. Only the bare digits `1`-`4` count.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Environment::Dev),
            "2" => Some(Environment::Qa),
            "3" => Some(Environment::Staging),
            "4" => Some(Environment::Prod),
            _ => None,
        }
    }

    /// Text the source sheet carries in its upload column once a row has
    /// been pushed to this environment.
    pub fn uploaded_marker(&self) -> String {
        format!("Yes: {}", self.as_str())
    }

    pub fn is_marked_uploaded(&self, upload_cell: Option<&str>) -> bool {
        upload_cell.is_some_and(|cell| cell.contains(&self.uploaded_marker()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_in_order() {
        assert_eq!(Environment::from_menu_choice("1"), Some(Environment::Dev));
        assert_eq!(Environment::from_menu_choice(" 4\n"), Some(Environment::Prod));
        assert_eq!(Environment::from_menu_choice("0"), None);
        assert_eq!(Environment::from_menu_choice("5"), None);
        assert_eq!(Environment::from_menu_choice("qa"), None);
    }

    #[test]
    fn menu_rejects_signed_or_padded_numbers() {
        assert_eq!(Environment::from_menu_choice("+2"), None);
        assert_eq!(Environment::from_menu_choice("01"), None);
        assert_eq!(Environment::from_menu_choice("-1"), None);
        assert_eq!(Environment::from_menu_choice("2.0"), None);
    }

    #[test]
    fn upload_marker_is_environment_specific() {
        let cell = Some("Yes: DEV, Yes: QA");
        assert!(Environment::Dev.is_marked_uploaded(cell));
        assert!(Environment::Qa.is_marked_uploaded(cell));
        assert!(!Environment::Prod.is_marked_uploaded(cell));
        assert!(!Environment::Dev.is_marked_uploaded(None));
    }
}
