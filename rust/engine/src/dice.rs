//! Dice rules: craps pass-line resolution and cee-lo roll reading.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ComeOut {
    /// 7 or 11
    Natural(u8),
    /// 2, 3 or 12
    Craps(u8),
    Point(u8),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRoll {
    Made,
    SevenOut,
    Again,
}

pub fn come_out(total: u8) -> ComeOut {
    match total {
        7 | 11 => ComeOut::Natural(total),
        2 | 3 | 12 => ComeOut::Craps(total),
        other => ComeOut::Point(other),
    }
}

pub fn point_roll(total: u8, point: u8) -> PointRoll {
    if total == point {
        PointRoll::Made
    } else if total == 7 {
        PointRoll::SevenOut
    } else {
        PointRoll::Again
    }
}

/// Reading of a three-die cee-lo throw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CeeLoRoll {
    /// 4-5-6
    AutoWin,
    /// 1-2-3
    AutoLoss,
    Trips(u8),
    /// A pair plus the odd die, which becomes the point.
    Point(u8),
    /// Nothing readable; the thrower rolls again.
    NoScore,
}

impl CeeLoRoll {
    pub fn read(dice: [u8; 3]) -> Result<Self, GameError> {
        if dice.iter().any(|d| !(1..=6).contains(d)) {
            return Err(GameError::InvalidDice(dice.to_vec()));
        }
        let mut d = dice;
        d.sort_unstable();
        Ok(match d {
            [4, 5, 6] => CeeLoRoll::AutoWin,
            [1, 2, 3] => CeeLoRoll::AutoLoss,
            [a, b, c] if a == b && b == c => CeeLoRoll::Trips(a),
            [a, b, c] if a == b => CeeLoRoll::Point(c),
            [a, b, c] if b == c => CeeLoRoll::Point(a),
            _ => CeeLoRoll::NoScore,
        })
    }

    pub fn is_scoring(self) -> bool {
        self != CeeLoRoll::NoScore
    }

    // AutoLoss and NoScore share the bottom rung
    fn strength(self) -> u8 {
        match self {
            CeeLoRoll::AutoLoss | CeeLoRoll::NoScore => 0,
            CeeLoRoll::Point(n) => n,
            CeeLoRoll::Trips(n) => 10 + n,
            CeeLoRoll::AutoWin => 20,
        }
    }

    pub fn label(self) -> String {
        match self {
            CeeLoRoll::AutoWin => "4-5-6".to_string(),
            CeeLoRoll::AutoLoss => "1-2-3".to_string(),
            CeeLoRoll::Trips(n) => format!("trip {n}s"),
            CeeLoRoll::Point(n) => format!("point {n}"),
            CeeLoRoll::NoScore => "no score".to_string(),
        }
    }
}

/// Orders two scoring cee-lo rolls.
pub fn compare_cee_lo(a: CeeLoRoll, b: CeeLoRoll) -> Ordering {
    a.strength().cmp(&b.strength())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn come_out_classes() {
        assert_eq!(come_out(7), ComeOut::Natural(7));
        assert_eq!(come_out(11), ComeOut::Natural(11));
        assert_eq!(come_out(12), ComeOut::Craps(12));
        assert_eq!(come_out(6), ComeOut::Point(6));
    }

    #[test]
    fn point_phase() {
        assert_eq!(point_roll(6, 6), PointRoll::Made);
        assert_eq!(point_roll(7, 6), PointRoll::SevenOut);
        assert_eq!(point_roll(9, 6), PointRoll::Again);
    }

    #[test]
    fn cee_lo_reading_is_order_free() {
        assert_eq!(CeeLoRoll::read([6, 4, 5]).unwrap(), CeeLoRoll::AutoWin);
        assert_eq!(CeeLoRoll::read([3, 1, 2]).unwrap(), CeeLoRoll::AutoLoss);
        assert_eq!(CeeLoRoll::read([2, 5, 2]).unwrap(), CeeLoRoll::Point(5));
        assert_eq!(CeeLoRoll::read([6, 1, 1]).unwrap(), CeeLoRoll::Point(6));
        assert_eq!(CeeLoRoll::read([3, 3, 3]).unwrap(), CeeLoRoll::Trips(3));
        assert_eq!(CeeLoRoll::read([1, 3, 5]).unwrap(), CeeLoRoll::NoScore);
        assert!(CeeLoRoll::read([0, 3, 5]).is_err());
    }

    #[test]
    fn cee_lo_ladder() {
        use CeeLoRoll::*;
        assert!(compare_cee_lo(AutoWin, Trips(6)).is_gt());
        assert!(compare_cee_lo(Trips(1), Point(6)).is_gt());
        assert!(compare_cee_lo(Point(2), Point(1)).is_gt());
        assert!(compare_cee_lo(Point(1), AutoLoss).is_gt());
        assert!(compare_cee_lo(Point(4), Point(4)).is_eq());
    }
}
