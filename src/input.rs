//! Interactive collection of story parameters.
//!
//! Each prompt shows its default in brackets; an empty answer or end of input
//! keeps the default.

use crate::models::StoryInputs;
use crate::Result;
use std::io::{BufRead, Write};

/// Print `prompt [default]: ` and read one answer.
pub fn ask<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    default: &str,
) -> Result<String> {
    write!(writer, "{} [{}]: ", prompt, default)?;
    writer.flush()?;

    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    let answer = line.trim();

    if read == 0 || answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Prompt for every field of [`StoryInputs`] in order.
pub fn collect_inputs<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<StoryInputs> {
    let defaults = StoryInputs::default();

    writeln!(writer, "--- Memory-to-Storybook Generator ---")?;
    writeln!(
        writer,
        "Please provide the following details. Press Enter to accept the default shown in brackets."
    )?;

    let mut field =
        |prompt: &str, default: &str| ask(&mut *reader, &mut *writer, prompt, default);

    Ok(StoryInputs {
        memory: field("Memory (briefly describe the event)", &defaults.memory)?,
        protagonist: field("Protagonist name", &defaults.protagonist)?,
        character_description: field(
            "Protagonist description",
            &defaults.character_description,
        )?,
        tone: field("Tone (e.g., Funny, Serious, Tender)", &defaults.tone)?,
        details: field("Additional details / setting", &defaults.details)?,
        style: field("Style (e.g., Rhyming, Narrative)", &defaults.style)?,
        complexity: field("Complexity (Short/Standard/Advanced)", &defaults.complexity)?,
        title: field("Story title", &defaults.title)?,
        end_message: field("End message to include", &defaults.end_message)?,
        other_characters: field("Other characters (brief)", &defaults.other_characters)?,
        cover_theme: field("Cover theme", &defaults.cover_theme)?,
        theme_color: field(
            "Theme color (light blue, light pink, light green, light yellow, light gray, white)",
            &defaults.theme_color,
        )?,
    })
}
