use crate::error::EngineError;

/// Horizontal placement used by [`Rectangle::position`](super::Rectangle::position).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement used by [`Rectangle::position`](super::Rectangle::position).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Accepts the C-style constants `0 = left, 1 = center, 2 = right`.
impl TryFrom<i32> for HAlign {
    type Error = EngineError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(HAlign::Left),
            1 => Ok(HAlign::Center),
            2 => Ok(HAlign::Right),
            other => Err(EngineError::InvalidAlignment(other)),
        }
    }
}

/// Accepts the C-style constants `0 = top, 1 = middle, 2 = bottom`.
impl TryFrom<i32> for VAlign {
    type Error = EngineError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(VAlign::Top),
            1 => Ok(VAlign::Middle),
            2 => Ok(VAlign::Bottom),
            other => Err(EngineError::InvalidAlignment(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_constants_map_in_order() {
        assert_eq!(HAlign::try_from(0).unwrap(), HAlign::Left);
        assert_eq!(HAlign::try_from(2).unwrap(), HAlign::Right);
        assert_eq!(VAlign::try_from(1).unwrap(), VAlign::Middle);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(HAlign::try_from(3), Err(EngineError::InvalidAlignment(3))));
        assert!(matches!(VAlign::try_from(-1), Err(EngineError::InvalidAlignment(-1))));
    }
}
