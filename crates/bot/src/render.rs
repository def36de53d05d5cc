use crate::BotError;
use pinzu_core::Hand;

/// Turns a hand into the opaque reference posted as the reply content
/// (an image URL in a hosted deployment, plain text here).
pub trait HandRenderer: Send + Sync {
    fn render(&self, hand: &Hand) -> Result<String, BotError>;
}

/// Tile glyphs on the first line, `position:tile` pairs on the second so
/// players can read off the number for `drop`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl HandRenderer for TextRenderer {
    fn render(&self, hand: &Hand) -> Result<String, BotError> {
        let glyphs: String = hand.tiles().iter().map(|tile| tile.glyph()).collect();
        let positions = hand
            .tiles()
            .iter()
            .enumerate()
            .map(|(index, tile)| format!("{}:{}", index + 1, tile))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(format!("{glyphs}\n{positions}"))
    }
}
