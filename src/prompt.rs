use crate::models::DEFAULT_STYLE;

/// Builds the prompt text sent upstream.
///
/// A non-default style appends `", <style> style"`. Any dimensions value
/// appends `", high quality, detailed"`, whatever the style and whatever the
/// dimensions are. Empty strings count as absent.
pub fn enhance_prompt(prompt: &str, style: Option<&str>, dimensions: Option<&str>) -> String {
    let mut enhanced = prompt.to_string();

    if let Some(style) = style.filter(|s| !s.is_empty() && *s != DEFAULT_STYLE) {
        enhanced.push_str(&format!(", {} style", style));
    }
    if dimensions.is_some_and(|d| !d.is_empty()) {
        enhanced.push_str(", high quality, detailed");
    }

    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_then_quality_suffix() {
        assert_eq!(
            enhance_prompt("a castle", Some("fantasy"), Some("1024x768")),
            "a castle, fantasy style, high quality, detailed"
        );
    }

    #[test]
    fn test_default_style_adds_no_style_suffix() {
        assert_eq!(
            enhance_prompt("a castle", Some("realistic"), Some("1024x1024")),
            "a castle, high quality, detailed"
        );
        assert_eq!(enhance_prompt("a castle", Some("realistic"), None), "a castle");
    }

    #[test]
    fn test_missing_options() {
        assert_eq!(enhance_prompt("a castle", None, None), "a castle");
        assert_eq!(
            enhance_prompt("a castle", Some("cartoon"), None),
            "a castle, cartoon style"
        );
        assert_eq!(enhance_prompt("a castle", Some(""), Some("")), "a castle");
    }
}
