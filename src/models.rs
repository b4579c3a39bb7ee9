//! Data models and structures
//!
//! Defines the narrative inputs collected from the user, the parsed story
//! pages handed to the assembler, and the runtime configuration.

use crate::{Error, Result};

pub const DEFAULT_STORY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_STORY_PAGES: usize = 5;
pub const MAX_STORY_PAGES: usize = 20;

/// Narrative parameters gathered before the pipeline starts.
///
/// Every field has a default (see [`StoryInputs::default`]) so a user can
/// accept all prompts and still get a complete book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryInputs {
    pub memory: String,
    pub protagonist: String,
    pub character_description: String,
    pub tone: String,
    pub details: String,
    pub style: String,
    pub complexity: String,
    pub title: String,
    pub end_message: String,
    pub other_characters: String,
    pub cover_theme: String,
    pub theme_color: String,
}

impl Default for StoryInputs {
    fn default() -> Self {
        Self {
            memory: "I had my daughter ask as I was going to the bathroom when she was three: \
                     what do you know about armadillos?"
                .to_string(),
            protagonist: "Maya".to_string(),
            character_description: "a 3-year-old girl with brown curly hair and big brown eyes"
                .to_string(),
            tone: "Funny".to_string(),
            details: "The setting is our family home. The story scenes take place in a hallway \
                      and a bathroom."
                .to_string(),
            style: "Rhyming".to_string(),
            complexity: "Standard".to_string(),
            title: "Silly Maya \"Muffin\" Elwer".to_string(),
            end_message: "Merry Christmas! Love, Mom!".to_string(),
            other_characters: "The narrator, 'mom', is a woman with blonde hair.".to_string(),
            cover_theme: "armadillos and flowers".to_string(),
            theme_color: "light blue".to_string(),
        }
    }
}

impl StoryInputs {
    /// File name for the finished book, derived from the protagonist.
    pub fn output_filename(&self) -> String {
        let stem: String = self
            .protagonist
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();

        if stem.is_empty() {
            "storybook.pdf".to_string()
        } else {
            format!("{}_storybook.pdf", stem)
        }
    }
}

/// One page of verse, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPage {
    pub lines: Vec<String>,
}

impl StoryPage {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Page text joined the way it is sent to the illustrator.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub story_model: String,
    pub image_model: String,
    pub story_pages: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "GEMINI_API_KEY not set. Export it or add a line like \
                     GEMINI_API_KEY=your-key to a .env file in the working directory"
                        .to_string(),
                )
            })?;

        let story_pages = match lookup("STORY_PAGES") {
            Some(raw) => {
                let pages: usize = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("STORY_PAGES must be a number, got '{}'", raw))
                })?;
                if !(1..=MAX_STORY_PAGES).contains(&pages) {
                    return Err(Error::Config(format!(
                        "STORY_PAGES must be between 1 and {}, got {}",
                        MAX_STORY_PAGES, pages
                    )));
                }
                pages
            }
            None => DEFAULT_STORY_PAGES,
        };

        Ok(Self {
            gemini_api_key,
            story_model: lookup("STORY_MODEL").unwrap_or_else(|| DEFAULT_STORY_MODEL.to_string()),
            image_model: lookup("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            story_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_config_rejects_blank_api_key() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "key")])).unwrap();
        assert_eq!(config.gemini_api_key, "key");
        assert_eq!(config.story_model, DEFAULT_STORY_MODEL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.story_pages, DEFAULT_STORY_PAGES);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("STORY_MODEL", "gemini-pro"),
            ("IMAGE_MODEL", "imagen"),
            ("STORY_PAGES", "3"),
        ]))
        .unwrap();
        assert_eq!(config.story_model, "gemini-pro");
        assert_eq!(config.image_model, "imagen");
        assert_eq!(config.story_pages, 3);
    }

    #[test]
    fn test_config_rejects_bad_page_count() {
        for raw in ["zero", "0", "21"] {
            let err = Config::from_lookup(lookup_from(&[
                ("GEMINI_API_KEY", "key"),
                ("STORY_PAGES", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "accepted {}", raw);
        }
    }

    #[test]
    fn test_output_filename_from_protagonist() {
        let inputs = StoryInputs {
            protagonist: "Silly Maya".to_string(),
            ..StoryInputs::default()
        };
        assert_eq!(inputs.output_filename(), "silly_maya_storybook.pdf");
    }

    #[test]
    fn test_output_filename_strips_path_characters() {
        let inputs = StoryInputs {
            protagonist: "../Zoë".to_string(),
            ..StoryInputs::default()
        };
        assert_eq!(inputs.output_filename(), "zo_storybook.pdf");

        let empty = StoryInputs {
            protagonist: "  ".to_string(),
            ..StoryInputs::default()
        };
        assert_eq!(empty.output_filename(), "storybook.pdf");
    }

    #[test]
    fn test_story_page_text_joins_lines() {
        let page = StoryPage::new(vec!["One".to_string(), "Two".to_string()]);
        assert_eq!(page.text(), "One\nTwo");
    }
}
