//! Five-card draw against house seats.

use std::collections::BTreeSet;

use arcade_engine::cards::{Card, Rank, Suit};
use arcade_engine::deck::Deck;
use arcade_engine::hand::{evaluate, winners, HandStrength};
use arcade_engine::rng::GameRng;
use arcade_engine::GameError;

use crate::errors::FloorError;
use crate::games::comparison::take_deck;
use crate::round::{pay, Action, CardFace, GameId, RoundController, RoundView, SeatView, Step};
use crate::tables::PokerTable;

const HAND_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Dealt,
    Drawn,
    Revealed,
}

#[derive(Debug)]
pub struct PokerRound {
    table: PokerTable,
    bet: u64,
    deck: Option<Deck>,
    shoe: Deck,
    player: [Card; HAND_SIZE],
    opponents: Vec<[Card; HAND_SIZE]>,
    holds: BTreeSet<usize>,
    phase: Phase,
}

fn deal_five(deck: &mut Deck) -> Result<[Card; HAND_SIZE], GameError> {
    Ok([
        deck.draw()?,
        deck.draw()?,
        deck.draw()?,
        deck.draw()?,
        deck.draw()?,
    ])
}

impl PokerRound {
    pub fn new(table: PokerTable, bet: u64, deck: Option<Deck>) -> Self {
        // replaced by the deal in `open`
        let placeholder = [Card::new(Rank::Two, Suit::Clubs); HAND_SIZE];
        Self {
            table,
            bet,
            deck,
            shoe: Deck::stacked(Vec::new()),
            player: placeholder,
            opponents: Vec::new(),
            holds: BTreeSet::new(),
            phase: Phase::Dealt,
        }
    }

    fn toggle_hold(&mut self, index: usize) -> Result<Step, FloorError> {
        if self.phase != Phase::Dealt {
            return Err(FloorError::illegal(GameId::Poker, "holds lock once you draw"));
        }
        if index >= HAND_SIZE {
            return Err(GameError::InvalidHold {
                index,
                size: HAND_SIZE,
            }
            .into());
        }
        if !self.holds.remove(&index) {
            self.holds.insert(index);
        }
        Ok(Step::status(format!(
            "Holding {} card{}.",
            self.holds.len(),
            if self.holds.len() == 1 { "" } else { "s" }
        )))
    }

    fn draw(&mut self) -> Result<Step, FloorError> {
        if self.phase != Phase::Dealt {
            return Err(FloorError::illegal(GameId::Poker, "you only get one draw"));
        }
        let unheld: Vec<usize> = (0..HAND_SIZE).filter(|i| !self.holds.contains(i)).collect();
        // all or nothing, so a short shoe leaves the hand as dealt
        let fresh = self.shoe.draw_many(unheld.len())?;
        for (i, card) in unheld.into_iter().zip(fresh) {
            self.player[i] = card;
        }
        self.phase = Phase::Drawn;
        Ok(Step::status("Ready to reveal. Reveal to see the showdown."))
    }

    fn reveal(&mut self) -> Step {
        self.phase = Phase::Revealed;
        let mut hands: Vec<HandStrength> = vec![evaluate(&self.player)];
        hands.extend(self.opponents.iter().map(evaluate));
        let best = winners(&hands);
        let player_wins = best.contains(&0);

        if player_wins && best.len() == 1 {
            Step::settle(
                pay(self.bet, self.table.win),
                format!("You win with {}!", hands[0].describe()),
            )
        } else if player_wins {
            let partners: Vec<&str> = best
                .iter()
                .filter(|&&i| i != 0)
                .map(|&i| self.seat_name(i))
                .collect();
            Step::settle(
                pay(self.bet, self.table.split),
                format!(
                    "Split pot with {} on {}.",
                    partners.join(" & "),
                    hands[0].describe()
                ),
            )
        } else {
            let top = best[0];
            Step::settle(
                0,
                format!("{} wins with {}.", self.seat_name(top), hands[top].describe()),
            )
        }
    }

    fn seat_name(&self, seat: usize) -> &str {
        match seat {
            0 => "You",
            n => self
                .table
                .opponents
                .get(n - 1)
                .map(String::as_str)
                .unwrap_or("House"),
        }
    }
}

impl RoundController for PokerRound {
    fn game(&self) -> GameId {
        GameId::Poker
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        self.shoe = take_deck(&mut self.deck, rng);
        self.player = deal_five(&mut self.shoe)?;
        self.opponents = (0..self.table.opponents.len())
            .map(|_| deal_five(&mut self.shoe))
            .collect::<Result<_, _>>()?;
        Ok(Step::status("Hold favourites, draw once, then reveal."))
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Hold { index } => self.toggle_hold(index),
            Action::Draw => self.draw(),
            Action::Reveal => Ok(self.reveal()),
            other => Err(FloorError::illegal(
                GameId::Poker,
                format!("{} is not a poker move, hold, draw or reveal", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        let revealed = self.phase == Phase::Revealed;
        let mut seats = vec![SeatView {
            name: "You".into(),
            cards: CardFace::shown(&self.player),
            label: Some(evaluate(&self.player).describe()),
            held: self.holds.iter().copied().collect(),
        }];
        for (i, hand) in self.opponents.iter().enumerate() {
            seats.push(SeatView {
                name: self.seat_name(i + 1).to_string(),
                cards: if revealed {
                    CardFace::shown(hand)
                } else {
                    CardFace::hidden(HAND_SIZE)
                },
                label: revealed.then(|| evaluate(hand).describe()),
                held: Vec::new(),
            });
        }
        RoundView::Table { seats }
    }
}
