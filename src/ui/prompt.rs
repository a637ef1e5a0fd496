//! Interactive choices for extraction mode and liveness checking.
//!
//! Prompts only appear when stdin is a terminal; otherwise the defaults
//! (URL mode, no checking) apply so scripted runs never block.

use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use crate::core::error::Result;
use crate::core::types::ExtractionMode;
use crate::ui::color::{Colors, colorize};

pub struct Prompter {
    theme: ColorfulTheme,
    interactive: bool,
}

impl Prompter {
    pub fn new(interactive: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            interactive,
        }
    }

    /// Interactive only when stdin is a terminal that is not also carrying
    /// the input text.
    pub fn detect(input_is_stdin: bool) -> Self {
        Self::new(!input_is_stdin && atty::is(atty::Stream::Stdin))
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Use `given` if set, else ask, else fall back to URL mode.
    pub fn choose_mode(&self, given: Option<ExtractionMode>) -> Result<ExtractionMode> {
        if let Some(mode) = given {
            return Ok(mode);
        }
        if !self.interactive {
            return Ok(ExtractionMode::default());
        }

        let choices = [ExtractionMode::Url, ExtractionMode::Ip];
        let labels = ["URLs (http/https, IP:port, bare domains)", "IPv4 addresses"];

        let selection = Select::with_theme(&self.theme)
            .with_prompt(colorize("What should be extracted?", Colors::BOLD))
            .items(&labels)
            .default(0)
            .interact()?;

        Ok(choices[selection])
    }

    /// Use `given` if set, else ask, else skip checking.
    pub fn confirm_check(&self, given: Option<bool>, url_count: usize) -> Result<bool> {
        if let Some(check) = given {
            return Ok(check);
        }
        if !self.interactive {
            return Ok(false);
        }

        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(format!("Check liveness of {url_count} URL(s)?"))
            .default(false)
            .interact()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_choices_skip_prompts() {
        let prompter = Prompter::new(true);

        assert_eq!(
            prompter.choose_mode(Some(ExtractionMode::Ip)).unwrap(),
            ExtractionMode::Ip
        );
        assert!(prompter.confirm_check(Some(true), 3).unwrap());
        assert!(!prompter.confirm_check(Some(false), 3).unwrap());
    }

    #[test]
    fn test_non_interactive_defaults() {
        let prompter = Prompter::new(false);

        assert!(!prompter.is_interactive());
        assert_eq!(prompter.choose_mode(None).unwrap(), ExtractionMode::Url);
        assert!(!prompter.confirm_check(None, 10).unwrap());
    }

    #[test]
    fn test_detect_never_prompts_when_input_is_stdin() {
        assert!(!Prompter::detect(true).is_interactive());
    }
}
