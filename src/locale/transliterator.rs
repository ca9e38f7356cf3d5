//! Script conversion backends

use zhconv::{zhconv, Variant};

/// Converts text from one script variant to another
pub trait Transliterator {
    fn convert(&self, text: &str) -> String;
}

/// Simplified Chinese to Traditional Chinese (Taiwan), including Taiwanese
/// vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct TaiwanTraditional;

impl Transliterator for TaiwanTraditional {
    fn convert(&self, text: &str) -> String {
        zhconv(text, Variant::ZhTW)
    }
}
