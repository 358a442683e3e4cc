//! Prompt templates for the story generation calls.
//!
//! Each template embeds the whole context the model will see; no
//! conversation history is carried between calls.

/// Prompt for the vision model's image description.
#[must_use]
pub fn image_analysis() -> &'static str {
    "You have been provided with an image submitted by a user. Your task is to \
     analyze and describe the image, providing as much detail as possible about \
     its content, composition, and overall aesthetic.\n\n\
     Image Description: Provide a brief summary of the image's content, \
     including any notable objects, scenes, or figures.\n\n\
     Composition Analysis: Analyze the image's composition, discussing the use of:\n\
     Color palette and color harmony\n\
     Lighting and shadows\n\
     Negative space and composition balance\n\n\
     Aesthetic Analysis: Discuss the image's overall aesthetic, including:\n\
     Mood and atmosphere\n\
     Emotional resonance\n\
     Style and genre (e.g., realistic, abstract, surreal)"
}

/// Prompt for a story segment seeded by `context` (an image description or
/// the player's latest decision).
#[must_use]
pub fn narration(context: &str) -> String {
    format!(
        "Create an interactive, branching narrative based on this story: {context}.\n\n\
         Requirements:\n\
         - Generate a story segment of 3-4 paragraphs\n\
         - Make sure it is engaging, descriptive, and immersive, using vivid \
         language and sensory details to bring it to life.\n\
         - Use a narrative voice that is engaging, with a tone that is exciting \
         and suspenseful.\n\n\
         Output Format:\n\
         [Story Segment]"
    )
}

/// Prompt for the rewrite pass that appends exactly three enumerated choices
/// to a draft segment.
#[must_use]
pub fn rewrite(context: &str) -> String {
    format!(
        "Rewrite this with the given requirements: {context}.\n\n\
         Requirements:\n\
         - Make sure it is engaging, descriptive, and immersive, using vivid \
         language and sensory details to bring it to life.\n\
         - Use a narrative voice that is engaging, with a tone that is exciting \
         and suspenseful.\n\
         - Provide exactly 3 distinct choices for the user to progress the story\n\
         - Each choice should lead to a different potential narrative path\n\
         - Maintain narrative coherence with previous choices if provided\n\n\
         Output Format:\n\
         [Story Segment]\n\n\
         CHOICES:\n\
         1. [First Choice Description]\n\
         2. [Second Choice Description]\n\
         3. [Third Choice Description]"
    )
}

/// Prompt for the story's conclusion.
#[must_use]
pub fn conclusion(context: &str) -> String {
    format!(
        "Create a satisfactory conclusion to the story based on the context.\n\
         Make sure it is engaging, descriptive, and immersive, using vivid \
         language and sensory details to bring it to life.\n\
         Use a narrative voice that is engaging, with a tone that is exciting \
         and suspenseful.\n\
         At the end thank the user for engaging with the story.\n\
         Context: {context}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narration_embeds_context() {
        let prompt = narration("a foggy harbor at dawn");
        assert!(prompt.contains("a foggy harbor at dawn"));
        assert!(prompt.contains("3-4 paragraphs"));
    }

    #[test]
    fn test_rewrite_demands_exactly_three_choices() {
        let prompt = rewrite("The fog parts...");
        assert!(prompt.contains("The fog parts..."));
        assert!(prompt.contains("exactly 3 distinct choices"));
        assert!(prompt.contains("CHOICES:"));
        assert!(prompt.contains("3. [Third Choice Description]"));
    }

    #[test]
    fn test_conclusion_thanks_the_player() {
        let prompt = conclusion("open the door");
        assert!(prompt.contains("open the door"));
        assert!(prompt.contains("thank the user"));
    }
}
