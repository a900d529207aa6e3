/// Instruction sent verbatim with every uploaded photo.
pub const HEADSHOT: &str = include_str!("../data/prompts/headshot.txt");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headshot_prompt_is_non_empty() {
        assert!(!HEADSHOT.trim().is_empty());
    }

    #[test]
    fn test_headshot_prompt_covers_each_section() {
        for section in [
            "Subject & Composition:",
            "Professional Attire:",
            "Studio Lighting:",
            "Background:",
            "Photographic Specifications:",
        ] {
            assert!(HEADSHOT.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn test_headshot_prompt_has_no_placeholders() {
        assert!(!HEADSHOT.contains("{{"));
    }
}
