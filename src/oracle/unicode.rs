use super::WidthOracle;
use unicode_width::UnicodeWidthChar;

/// Oracle backed by the `unicode-width` crate's UAX #11 tables.
///
/// Surrogates and characters the tables leave unsized (control characters)
/// report `-1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeOracle {
    cjk: bool,
}

impl UnicodeOracle {
    pub fn new(cjk: bool) -> Self {
        Self { cjk }
    }
}

impl WidthOracle for UnicodeOracle {
    fn width(&self, codepoint: u32) -> i32 {
        let Some(c) = char::from_u32(codepoint) else {
            return -1;
        };
        let width = if self.cjk { c.width_cjk() } else { c.width() };
        width.map_or(-1, |w| w as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_widths() {
        let oracle = UnicodeOracle::new(false);
        assert_eq!(oracle.width('A' as u32), 1);
        assert_eq!(oracle.width(0x4E2D), 2); // 中
        assert_eq!(oracle.width(0x0301), 0); // combining acute accent
    }

    #[test]
    fn test_surrogates_are_invalid() {
        let oracle = UnicodeOracle::new(false);
        assert_eq!(oracle.width(0xD800), -1);
        assert_eq!(oracle.width(0xDFFF), -1);
    }

    #[test]
    fn test_answers_stay_in_domain() {
        let oracle = UnicodeOracle::new(true);
        for cp in (0..=0x10FFFFu32).step_by(97) {
            let w = oracle.width(cp);
            assert!((-1..=2).contains(&w), "U+{:04X} -> {}", cp, w);
        }
    }
}
