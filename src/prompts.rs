use crate::models::{StoryInputs, StoryPage};

pub const STORY: &str = include_str!("../data/prompts/story.txt");
pub const STYLE_GUIDE: &str = include_str!("../data/prompts/style_guide.txt");
pub const NEGATIVE: &str = include_str!("../data/prompts/negative.txt");
pub const SCENE: &str = include_str!("../data/prompts/scene.txt");
pub const COVER_PATTERN: &str = include_str!("../data/prompts/cover_pattern.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single pass over the template, so placeholder syntax
/// inside a value is left as typed. Unknown keys are kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    result.push_str(rest);
    result
}

pub fn story_prompt(inputs: &StoryInputs, pages: usize) -> String {
    let pages = pages.to_string();
    render(
        STORY,
        &[
            ("pages", &pages),
            ("memory", &inputs.memory),
            ("protagonist", &inputs.protagonist),
            ("other_characters", &inputs.other_characters),
            ("details", &inputs.details),
            ("tone", &inputs.tone),
            ("style", &inputs.style),
            ("complexity", &inputs.complexity),
        ],
    )
    .trim()
    .to_string()
}

pub fn style_guide_prompt(inputs: &StoryInputs) -> String {
    render(
        STYLE_GUIDE,
        &[
            ("protagonist", &inputs.protagonist),
            ("character_description", &inputs.character_description),
            ("other_characters", &inputs.other_characters),
            ("details", &inputs.details),
        ],
    )
    .trim()
    .to_string()
}

pub fn negative_prompt() -> String {
    NEGATIVE.trim().to_string()
}

pub fn scene_prompt(page: &StoryPage) -> String {
    render(SCENE, &[("scene", &page.text())]).trim().to_string()
}

pub fn cover_pattern_prompt(theme: &str) -> String {
    render(COVER_PATTERN, &[("theme", theme)]).trim().to_string()
}
