//! The currently shown card and its host scene.

use super::TexturedCard;
use crate::error::{CardError, Result};

/// The scene graph a card is shown in.
///
/// Implementations create render objects on `attach` and free them on
/// `detach`; the card's own resources are released right after `detach`.
pub trait CardHost {
    fn attach(&mut self, card: &TexturedCard);
    fn detach(&mut self, card: &TexturedCard);
}

/// Holds at most one card, releasing the previous one before showing the next.
#[derive(Debug)]
pub struct CardSlot<H: CardHost> {
    host: H,
    current: Option<TexturedCard>,
}

impl<H: CardHost> CardSlot<H> {
    pub fn new(host: H) -> Self {
        Self { host, current: None }
    }

    /// Replace the shown card. The old card is detached and released first.
    pub fn show(&mut self, mut card: TexturedCard) -> Result<()> {
        if card.is_disposed() {
            return Err(CardError::CardDisposed);
        }
        self.clear();
        card.attach()?;
        self.host.attach(&card);
        self.current = Some(card);
        Ok(())
    }

    /// Detach and release the shown card, if any.
    pub fn clear(&mut self) {
        if let Some(mut old) = self.current.take() {
            self.host.detach(&old);
            old.release();
        }
    }

    pub fn current(&self) -> Option<&TexturedCard> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut TexturedCard> {
        self.current.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: CardHost> Drop for CardSlot<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardBuilder, CardState};
    use crate::texture::ImageAsset;
    use crate::types::Extent;

    #[derive(Debug, Default)]
    struct RecordingHost {
        events: Vec<String>,
        live_planes: usize,
    }

    impl CardHost for RecordingHost {
        fn attach(&mut self, card: &TexturedCard) {
            self.live_planes += card.planes().count();
            self.events.push(format!("attach {}", card.extent().width));
        }

        fn detach(&mut self, card: &TexturedCard) {
            self.live_planes -= card.planes().count();
            self.events.push(format!("detach {}", card.extent().width));
        }
    }

    fn card(builder: &mut CardBuilder, width: f32) -> TexturedCard {
        let front = ImageAsset::new(1, 1, vec![255; 4]);
        builder
            .build_from_extent(Extent::new(width, 2.0, 0.1), front, None)
            .unwrap()
    }

    #[test]
    fn test_show_replaces_and_releases() {
        let mut builder = CardBuilder::new();
        let mut slot = CardSlot::new(RecordingHost::default());

        slot.show(card(&mut builder, 1.0)).unwrap();
        assert_eq!(slot.current().unwrap().state(), CardState::Attached);
        assert_eq!(slot.host().live_planes, 2);

        // Repeated uploads never accumulate planes.
        for _ in 0..3 {
            slot.show(card(&mut builder, 3.0)).unwrap();
            assert_eq!(slot.host().live_planes, 2);
        }
        assert_eq!(slot.host().events[0..3], ["attach 1", "detach 1", "attach 3"]);
    }

    #[test]
    fn test_clear() {
        let mut builder = CardBuilder::new();
        let mut slot = CardSlot::new(RecordingHost::default());
        slot.show(card(&mut builder, 1.0)).unwrap();
        slot.clear();
        assert!(slot.current().is_none());
        assert_eq!(slot.host().live_planes, 0);
        slot.clear();
        assert_eq!(slot.host().events.len(), 2);
    }

    #[test]
    fn test_disposed_card_rejected() {
        let mut builder = CardBuilder::new();
        let mut slot = CardSlot::new(RecordingHost::default());
        let mut disposed = card(&mut builder, 1.0);
        disposed.release();
        assert!(matches!(slot.show(disposed), Err(CardError::CardDisposed)));
        assert!(slot.host().events.is_empty());
    }

    #[test]
    fn test_rotate_current() {
        let mut builder = CardBuilder::new();
        let mut slot = CardSlot::new(RecordingHost::default());
        slot.show(card(&mut builder, 1.0)).unwrap();
        slot.current_mut().unwrap().rotate(0.1);
        assert_eq!(slot.current().unwrap().rotation_y(), 0.1);
        slot.host_mut().events.clear();
        assert!(slot.host().events.is_empty());
    }
}
