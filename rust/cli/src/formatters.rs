//! Pure text renderers for round views, settlements and stats.

use chrono::Local;

use arcade_floor::{
    CardFace, LaneState, RoundView, RunnerView, SeatView, SettlementEntry, StatsSnapshot, TileState,
    Tone,
};

pub fn format_card(face: &CardFace) -> String {
    match face {
        CardFace::Up(card) => card.to_string(),
        CardFace::Down => "??".to_string(),
    }
}

pub fn format_cards(cards: &[CardFace]) -> String {
    let shown: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", shown.join(" "))
}

/// One-character marker printed before status lines.
pub fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "+",
        Tone::Neutral => "=",
        Tone::Negative => "-",
    }
}

pub fn format_multiplier(m: f64) -> String {
    format!("{:.2}x", m)
}

fn format_seat(seat: &SeatView) -> String {
    let mut line = format!("{}: {}", seat.name, format_cards(&seat.cards));
    if !seat.held.is_empty() {
        let held: Vec<String> = seat.held.iter().map(|i| (i + 1).to_string()).collect();
        line.push_str(&format!(" held {}", held.join(",")));
    }
    if let Some(label) = &seat.label {
        line.push_str(&format!(" ({})", label));
    }
    line
}

fn format_dice(dice: &[u8]) -> String {
    let faces: Vec<String> = dice.iter().map(|d| d.to_string()).collect();
    faces.join(" ")
}

fn tile_glyph(tile: &TileState) -> char {
    match tile {
        TileState::Hidden => '.',
        TileState::Safe { adjacent: 0 } => ' ',
        TileState::Safe { adjacent } => char::from(b'0' + (*adjacent).min(9)),
        TileState::Bomb => '*',
        TileState::Hit => 'X',
    }
}

fn format_seconds(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

const TRACK_WIDTH: usize = 20;

fn format_runner(runner: &RunnerView, backed: bool) -> String {
    let filled = ((runner.progress / 100.0 * TRACK_WIDTH as f64) as usize).min(TRACK_WIDTH);
    format!(
        "{} {:<8}|{}{}| {:.1}",
        if backed { '>' } else { ' ' },
        runner.name,
        "=".repeat(filled),
        " ".repeat(TRACK_WIDTH - filled),
        runner.progress
    )
}

fn board_width(tiles: usize) -> usize {
    let mut width = 1;
    while width * width < tiles {
        width += 1;
    }
    width
}

/// Renders a board view as indented text lines, one per visual row.
pub fn render_view(view: &RoundView) -> Vec<String> {
    match view {
        RoundView::Idle => Vec::new(),
        RoundView::Reels { symbols } => vec![format!("Reels: {}", symbols.join(" | "))],
        RoundView::Wheel {
            pocket,
            colour,
            pick,
        } => vec![format!(
            "Pocket {} ({}), you picked {}",
            pocket,
            colour.label(),
            pick.label()
        )],
        RoundView::Table { seats } => seats.iter().map(format_seat).collect(),
        RoundView::Dice { dice, point, house } => {
            let total: u32 = dice.iter().map(|d| u32::from(*d)).sum();
            let mut lines = vec![format!("Dice: {} (total {})", format_dice(dice), total)];
            if !house.is_empty() {
                lines.push(format!("House: {}", format_dice(house)));
            }
            if let Some(point) = point {
                lines.push(format!("Point: {}", point));
            }
            lines
        }
        RoundView::Meter {
            multiplier,
            target,
            crashed_at,
        } => {
            let mut line = format!("Multiplier: {}", format_multiplier(*multiplier));
            if let Some(target) = target {
                line.push_str(&format!(" (auto at {})", format_multiplier(*target)));
            }
            if let Some(at) = crashed_at {
                line.push_str(&format!(" crashed at {}", format_multiplier(*at)));
            }
            vec![line]
        }
        RoundView::Drop {
            path,
            slot,
            multiplier,
        } => {
            let steps: Vec<String> = path.iter().map(|p| p.to_string()).collect();
            vec![
                format!("Path: {}", steps.join(" > ")),
                format!("Slot {} pays {}", slot, format_multiplier(*multiplier)),
            ]
        }
        RoundView::Board {
            tiles,
            bombs,
            multiplier,
        } => {
            let width = board_width(tiles.len());
            let mut lines: Vec<String> = tiles
                .chunks(width)
                .map(|row| {
                    let glyphs: Vec<String> = row.iter().map(|t| tile_glyph(t).to_string()).collect();
                    format!("|{}|", glyphs.join(" "))
                })
                .collect();
            lines.push(format!(
                "{} bomb{} | multiplier {}",
                bombs,
                if *bombs == 1 { "" } else { "s" },
                format_multiplier(*multiplier)
            ));
            lines
        }
        RoundView::Lanes {
            themes,
            lanes,
            multiplier,
        } => {
            let cells: Vec<String> = themes
                .iter()
                .zip(lanes)
                .map(|(theme, lane)| {
                    let mark = match lane {
                        LaneState::Pending => "..",
                        LaneState::Safe => "ok",
                        LaneState::Fail => "XX",
                    };
                    format!("{}[{}]", theme, mark)
                })
                .collect();
            vec![
                cells.join(" "),
                format!("Multiplier: {}", format_multiplier(*multiplier)),
            ]
        }
        RoundView::Reflex { lit, reaction_ms } => {
            let mut lines = vec![if *lit {
                "Reactor: GREEN".to_string()
            } else {
                "Reactor: dark".to_string()
            }];
            if let Some(ms) = reaction_ms {
                lines.push(format!("Reaction: {}ms", ms));
            }
            lines
        }
        RoundView::Sequence {
            shown,
            length,
            entered,
        } => {
            let pads = |seq: &[u8]| -> String {
                let labels: Vec<String> = seq.iter().map(|p| (p + 1).to_string()).collect();
                labels.join(" ")
            };
            match shown {
                Some(sequence) => vec![format!("Pattern: {}", pads(sequence))],
                None => vec![format!(
                    "Entered {}/{}: {}",
                    entered.len(),
                    length,
                    pads(entered)
                )],
            }
        }
        RoundView::Quiz {
            prompt,
            answered,
            total,
            time_left_ms,
        } => match prompt {
            Some(prompt) => vec![
                format!("Question {}/{}: {} = ?", answered + 1, total, prompt),
                format!("Time left: {}", format_seconds(*time_left_ms)),
            ],
            None => vec![format!("Answered {}/{}", answered, total)],
        },
        RoundView::Drone {
            x,
            y,
            hits,
            goal,
            time_left_ms,
        } => vec![format!(
            "Drone at ({}, {}) | hits {}/{} | {} left",
            x,
            y,
            hits,
            goal,
            format_seconds(*time_left_ms)
        )],
        RoundView::Race {
            runners,
            pick,
            cheered,
        } => {
            let mut lines: Vec<String> = runners
                .iter()
                .map(|r| format_runner(r, r.name == pick.label()))
                .collect();
            lines.push(if *cheered {
                "Cheer used".to_string()
            } else {
                "Cheer available".to_string()
            });
            lines
        }
    }
}

pub fn format_settlement(entry: &SettlementEntry) -> String {
    format!(
        "{} | {} | bet {} | payout {} | {} | {}",
        entry.at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        entry.game.title(),
        entry.bet,
        entry.payout,
        entry.net_label(),
        entry.message
    )
}

pub fn format_stats(stats: &StatsSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Rounds:        {}", stats.rounds_label),
        format!("Wins:          {}", stats.wins_label),
        format!("Losses:        {}", stats.losses),
        format!("Pushes:        {}", stats.pushes),
        format!("Win rate:      {}", stats.win_rate_label),
        format!("Total won:     {}", stats.total_won_label),
        format!("Net:           {}", stats.net_label),
        format!("Biggest win:   {}", stats.biggest_win_label),
        format!("Streak:        {}", stats.current_streak_label),
        format!(
            "Best / worst:  +{} / {}",
            stats.longest_win_streak, stats.longest_loss_streak
        ),
    ];
    if let Some(game) = stats.last_game {
        lines.push(format!("Last game:     {}", game.title()));
    }
    lines
}
