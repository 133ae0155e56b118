//! Scroll-driven header and navigation state.

/// Header switches to its compact padding past this many pixels.
pub const COMPACT_AFTER: f64 = 50.0;

/// A section counts as reached this many pixels before its top.
pub const SECTION_LEAD: f64 = 60.0;

pub const DEFAULT_HASH: &str = "#home";

pub fn header_compact(scroll_y: f64) -> bool {
    scroll_y > COMPACT_AFTER
}

/// Hash of the last section whose top has been reached, in document order.
pub fn active_hash<'a, I>(sections: I, scroll_y: f64) -> String
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut current = None;
    for (id, top) in sections {
        // anonymous sections cannot be linked to
        if !id.is_empty() && scroll_y >= top - SECTION_LEAD {
            current = Some(id);
        }
    }
    current.map_or_else(|| DEFAULT_HASH.to_string(), |id| format!("#{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: [(&str, f64); 4] = [("home", 0.0), ("research", 800.0), ("projects", 1600.0), ("contact", 2400.0)];

    #[test]
    fn header_threshold() {
        assert!(!header_compact(0.0));
        assert!(!header_compact(50.0));
        assert!(header_compact(50.5));
    }

    #[test]
    fn picks_last_reached_section() {
        assert_eq!(active_hash(PAGE, 0.0), "#home");
        assert_eq!(active_hash(PAGE, 739.0), "#home");
        assert_eq!(active_hash(PAGE, 740.0), "#research");
        assert_eq!(active_hash(PAGE, 5000.0), "#contact");
    }

    #[test]
    fn falls_back_to_home() {
        assert_eq!(active_hash([("about", 500.0)], 0.0), "#home");
        assert_eq!(active_hash(std::iter::empty(), 100.0), "#home");
    }

    #[test]
    fn unnamed_section_keeps_previous_match() {
        let page = [("home", 0.0), ("research", 800.0), ("", 1600.0)];
        assert_eq!(active_hash(page, 2000.0), "#research");
        assert_eq!(active_hash([("", 0.0)], 10.0), "#home");
    }
}
