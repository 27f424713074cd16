use owo_colors::{OwoColorize, Style};

use crate::scoring::PriorityTier;

/// Traffic-light style for a priority tier
pub fn tier_style(tier: PriorityTier) -> Style {
    match tier {
        PriorityTier::High => Style::new().red().bold(),
        PriorityTier::Medium => Style::new().yellow().bold(),
        PriorityTier::Low => Style::new().blue(),
    }
}

/// Paint `text` in the tier's colour when colours are on
pub fn paint_tier(text: &str, tier: PriorityTier, use_colors: bool) -> String {
    if use_colors {
        text.style(tier_style(tier)).to_string()
    } else {
        text.to_string()
    }
}

pub fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_when_colors_off() {
        assert_eq!(paint_tier("45", PriorityTier::High, false), "45");
        assert_eq!(dim("1.", false), "1.");
        assert_eq!(bold("Total", false), "Total");
    }

    #[test]
    fn test_colored_output_wraps_text() {
        let painted = paint_tier("45", PriorityTier::High, true);
        assert!(painted.contains("45"));
        assert_ne!(painted, "45");
    }
}
