//! Colour palette for terminal output.

use owo_colors::Style;

/// One style per kind of output line. Every field is plain when colour is off.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Keys of key/value rows.
    pub dim: Style,
    pub header: Style,
    /// Public URLs of deployed apps.
    pub url: Style,
}

impl Styles {
    /// Palette for a colour-capable terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
            url: Style::new().underline().cyan(),
        }
    }

    /// Colour only on a TTY, and never when the user opted out.
    #[must_use]
    pub fn for_terminal(no_color: bool, is_tty: bool) -> Self {
        if no_color || !is_tty {
            Self::default()
        } else {
            Self::colored()
        }
    }
}
