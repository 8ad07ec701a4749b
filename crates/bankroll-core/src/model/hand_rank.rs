use core::fmt;
use serde::{Deserialize, Serialize};

/// Hand category as reported by the external evaluator, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HandRank {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandRank {
    pub const ORDERED: [HandRank; 10] = [
        HandRank::HighCard,
        HandRank::OnePair,
        HandRank::TwoPair,
        HandRank::ThreeOfAKind,
        HandRank::Straight,
        HandRank::Flush,
        HandRank::FullHouse,
        HandRank::FourOfAKind,
        HandRank::StraightFlush,
        HandRank::RoyalFlush,
    ];

    pub const MAX_VALUE: u8 = HandRank::RoyalFlush as u8;

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(HandRank::HighCard),
            2 => Some(HandRank::OnePair),
            3 => Some(HandRank::TwoPair),
            4 => Some(HandRank::ThreeOfAKind),
            5 => Some(HandRank::Straight),
            6 => Some(HandRank::Flush),
            7 => Some(HandRank::FullHouse),
            8 => Some(HandRank::FourOfAKind),
            9 => Some(HandRank::StraightFlush),
            10 => Some(HandRank::RoyalFlush),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Rank magnitude scaled into `[0, 1]` against the strongest category.
    pub fn strength(self) -> f64 {
        f64::from(self.value()) / f64::from(Self::MAX_VALUE)
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HandRank::HighCard => "high card",
            HandRank::OnePair => "one pair",
            HandRank::TwoPair => "two pair",
            HandRank::ThreeOfAKind => "three of a kind",
            HandRank::Straight => "straight",
            HandRank::Flush => "flush",
            HandRank::FullHouse => "full house",
            HandRank::FourOfAKind => "four of a kind",
            HandRank::StraightFlush => "straight flush",
            HandRank::RoyalFlush => "royal flush",
        };
        f.write_str(text)
    }
}
