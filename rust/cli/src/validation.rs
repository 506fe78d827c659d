//! Parsing of the action lines typed during `arcade play`.
//!
//! Positions are 1-based on the command line (`hold 1 3`, `press 2`,
//! `uncover 7`) and converted to the floor's 0-based indices here. A bare
//! number answers the open quiz question.

use arcade_floor::Action;

#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Actions(Vec<Action>),
    /// Empty line: fire the round's pending timer input.
    Fire,
    Quit,
    Invalid(String),
}

const VALID_ACTIONS: &str = "hit, stand, hold <n..>, draw, reveal, roll, hop, cashout, uncover <n>, tap, press <n>, answer <n>, shoot <x> <y>, cheer, q";

pub fn parse_play_input(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&head) = parts.first() else {
        return ParseResult::Fire;
    };

    if head == "q" || head == "quit" {
        return ParseResult::Quit;
    }

    let single = |action: Action| ParseResult::Actions(vec![action]);
    if let Ok(value) = head.parse::<i64>() {
        return match parts.len() {
            1 => single(Action::Answer { value }),
            _ => ParseResult::Invalid("Answer with a single number".to_string()),
        };
    }
    match head {
        "hit" | "h" => single(Action::Hit),
        "stand" | "s" => single(Action::Stand),
        "draw" | "d" => single(Action::Draw),
        "reveal" => single(Action::Reveal),
        "roll" | "r" => single(Action::Roll),
        "hop" => single(Action::Hop),
        "cashout" | "cash" | "bail" => single(Action::CashOut),
        "hold" => {
            if parts.len() < 2 {
                return ParseResult::Invalid(
                    "Hold requires card positions (e.g., 'hold 1 3')".to_string(),
                );
            }
            let mut actions = Vec::with_capacity(parts.len() - 1);
            for raw in &parts[1..] {
                match parse_position(raw, "card") {
                    Ok(index) => actions.push(Action::Hold { index }),
                    Err(msg) => return ParseResult::Invalid(msg),
                }
            }
            ParseResult::Actions(actions)
        }
        "uncover" | "u" => match parts.get(1) {
            Some(raw) => match parse_position(raw, "tile") {
                Ok(tile) => single(Action::Uncover { tile }),
                Err(msg) => ParseResult::Invalid(msg),
            },
            None => ParseResult::Invalid("Uncover requires a tile (e.g., 'uncover 7')".to_string()),
        },
        "press" | "p" => match parts.get(1) {
            Some(raw) => match parse_position(raw, "pad") {
                Ok(pad) => match u8::try_from(pad) {
                    Ok(pad) => single(Action::Press { pad }),
                    Err(_) => ParseResult::Invalid(format!("Unknown pad '{}'", raw)),
                },
                Err(msg) => ParseResult::Invalid(msg),
            },
            None => ParseResult::Invalid("Press requires a pad (e.g., 'press 2')".to_string()),
        },
        "tap" | "t" => match parts.len() {
            1 => single(Action::Tap),
            _ => ParseResult::Invalid(
                "Tap takes no arguments; the floor times your reaction".to_string(),
            ),
        },
        "cheer" | "c" => single(Action::Cheer),
        "answer" | "a" => match parts.get(1).map(|raw| raw.parse::<i64>()) {
            Some(Ok(value)) => single(Action::Answer { value }),
            Some(Err(_)) => ParseResult::Invalid(format!("Invalid answer '{}'", parts[1])),
            None => ParseResult::Invalid("Answer requires a number (e.g., 'answer 42')".to_string()),
        },
        "shoot" | "fire" => match (parts.get(1), parts.get(2)) {
            (Some(x), Some(y)) => match (parse_coordinate(x), parse_coordinate(y)) {
                (Ok(x), Ok(y)) => single(Action::Shoot { x, y }),
                (Err(msg), _) | (_, Err(msg)) => ParseResult::Invalid(msg),
            },
            _ => ParseResult::Invalid("Shoot requires coordinates (e.g., 'shoot 40 60')".to_string()),
        },
        _ => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: {}",
            head, VALID_ACTIONS
        )),
    }
}

fn parse_position(raw: &str, what: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        Ok(_) => Err(format!("{} positions start at 1", capitalize(what))),
        Err(_) => Err(format!("Invalid {} position '{}'", what, raw)),
    }
}

fn parse_coordinate(raw: &str) -> Result<u8, String> {
    match raw.parse::<u8>() {
        Ok(n) if n <= 100 => Ok(n),
        _ => Err(format!("Coordinates run from 0 to 100, got '{}'", raw)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_actions_parse() {
        assert_eq!(parse_play_input("hit"), ParseResult::Actions(vec![Action::Hit]));
        assert_eq!(parse_play_input(" STAND "), ParseResult::Actions(vec![Action::Stand]));
        assert_eq!(
            parse_play_input("cashout"),
            ParseResult::Actions(vec![Action::CashOut])
        );
        assert_eq!(parse_play_input("q"), ParseResult::Quit);
        assert_eq!(parse_play_input(""), ParseResult::Fire);
        assert_eq!(parse_play_input("   "), ParseResult::Fire);
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(
            parse_play_input("hold 1 3"),
            ParseResult::Actions(vec![Action::Hold { index: 0 }, Action::Hold { index: 2 }])
        );
        assert_eq!(
            parse_play_input("uncover 7"),
            ParseResult::Actions(vec![Action::Uncover { tile: 6 }])
        );
        assert_eq!(
            parse_play_input("press 2"),
            ParseResult::Actions(vec![Action::Press { pad: 1 }])
        );
    }

    #[test]
    fn tap_carries_no_time() {
        assert_eq!(parse_play_input("tap"), ParseResult::Actions(vec![Action::Tap]));
        assert_eq!(parse_play_input("T"), ParseResult::Actions(vec![Action::Tap]));
        assert!(matches!(parse_play_input("tap 1"), ParseResult::Invalid(_)));
    }

    #[test]
    fn answers_shots_and_cheers() {
        assert_eq!(
            parse_play_input("42"),
            ParseResult::Actions(vec![Action::Answer { value: 42 }])
        );
        assert_eq!(
            parse_play_input("answer -4"),
            ParseResult::Actions(vec![Action::Answer { value: -4 }])
        );
        assert_eq!(
            parse_play_input("shoot 40 60"),
            ParseResult::Actions(vec![Action::Shoot { x: 40, y: 60 }])
        );
        assert_eq!(parse_play_input("cheer"), ParseResult::Actions(vec![Action::Cheer]));
    }

    #[test]
    fn bad_input_is_explained() {
        for line in [
            "hold", "hold 0", "uncover x", "press", "press 999", "tap soon", "tap 240", "fold",
            "answer", "answer x", "4 2", "shoot 40", "shoot 40 101",
        ] {
            assert!(
                matches!(parse_play_input(line), ParseResult::Invalid(_)),
                "{line} should be rejected"
            );
        }
        let ParseResult::Invalid(msg) = parse_play_input("hold 0") else {
            unreachable!()
        };
        assert_eq!(msg, "Card positions start at 1");
    }
}
