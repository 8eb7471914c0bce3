use std::fmt;

/// Identifies a message on a pull or push channel.
///
/// Subscribers register for one id; a push or pull only reaches the
/// subscribers registered for the id it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// End of frame: mediate every batch kind now.
    pub const BATCH_END: Self = Self(0x0100);
    /// Every batch kind has been mediated and its accumulator may be emptied.
    pub const BATCHES_EMPTIED: Self = Self(0x0101);
    /// One accumulator filled mid-frame; the payload names its kind.
    pub const BATCH_FILLED: Self = Self(0x0102);
    /// Raised by an accumulator on the add that fills it.
    pub const ACCUMULATOR_FILLED: Self = Self(0x0103);

    pub const TEXTURE_ITEMS: Self = Self(0x0200);
    pub const GLYPH_ITEMS: Self = Self(0x0201);
    pub const SHAPE_ITEMS: Self = Self(0x0202);
    pub const LINE_ITEMS: Self = Self(0x0203);

    pub const TEXTURES_READY: Self = Self(0x0300);
    pub const GLYPHS_READY: Self = Self(0x0301);
    pub const SHAPES_READY: Self = Self(0x0302);
    pub const LINES_READY: Self = Self(0x0303);

    /// Create an application-defined id. Values below `0x1_0000` are reserved.
    pub const fn custom(value: u64) -> Self {
        Self(value | 0x1_0000)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_ids_never_collide_with_builtin() {
        assert_ne!(MessageId::custom(0x0100), MessageId::BATCH_END);
        assert!(MessageId::custom(0).get() >= 0x1_0000);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(MessageId::BATCH_END.to_string(), "0x0100");
    }
}
