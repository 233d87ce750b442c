//! Configuration surface (spec.md §6). Actual CLI/file parsing stays out
//! of scope per spec.md §1; `Config` is a plain struct a caller builds
//! directly (or accepts the `Default` impl for), not the product of an
//! argument parser.

use crate::bindings::DefaultModifier;

#[derive(Debug, Clone)]
pub struct Config {
    pub terminal_program: String,
    pub launcher_program: String,
    pub outer_gap: i32,
    pub inner_gap: i32,
    pub border_width: i32,
    pub modifier: DefaultModifier,
    pub tab_height: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal_program: "alacritty".to_string(),
            launcher_program: "wmenu-run".to_string(),
            outer_gap: 0,
            inner_gap: 0,
            border_width: 2,
            modifier: DefaultModifier::Super,
            tab_height: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_non_negative() {
        let config = Config::default();
        assert!(config.outer_gap >= 0);
        assert!(config.inner_gap >= 0);
        assert!(config.border_width >= 0);
    }
}
