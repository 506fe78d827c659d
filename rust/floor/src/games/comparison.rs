//! Games where the player's hand or throw is set against the house once.

use std::cmp::Ordering;

use arcade_engine::baccarat::{self, Coup};
use arcade_engine::cards::Card;
use arcade_engine::deck::Deck;
use arcade_engine::dice::{compare_cee_lo, CeeLoRoll};
use arcade_engine::rng::GameRng;
use arcade_engine::triad::{dealer_qualifies, evaluate_three, TriadHand, TriadRank};

use crate::errors::FloorError;
use crate::games::chance::Resolver;
use crate::round::{pay, CardFace, GameId, Outcome, Pick, RoundView, SeatView};
use crate::tables::{BaccaratTable, CeeLoTable, DuelTable, TriadTable};

/// Shuffles a fresh deck unless one was arranged in advance.
pub(crate) fn take_deck(slot: &mut Option<Deck>, rng: &mut GameRng) -> Deck {
    slot.take().unwrap_or_else(|| Deck::shuffled(rng))
}

fn seat(name: &str, cards: &[Card], label: impl Into<String>) -> SeatView {
    SeatView {
        name: name.to_string(),
        cards: CardFace::shown(cards),
        label: Some(label.into()),
        held: Vec::new(),
    }
}

#[derive(Debug)]
pub struct Duel {
    table: DuelTable,
    deck: Option<Deck>,
}

impl Duel {
    pub fn new(table: DuelTable, deck: Option<Deck>) -> Self {
        Self { table, deck }
    }
}

impl Resolver for Duel {
    fn game(&self) -> GameId {
        GameId::Duel
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let mut deck = take_deck(&mut self.deck, rng);
        let player = deck.draw()?;
        let dealer = deck.draw()?;
        let (payout, message) = match player.rank.value().cmp(&dealer.rank.value()) {
            Ordering::Greater => (
                pay(bet, self.table.win),
                "You pull the high card! Bet doubled.".to_string(),
            ),
            Ordering::Less => (0, "Dealer wins the duel.".to_string()),
            Ordering::Equal => (bet, "Tie round. Stake returned.".to_string()),
        };
        let view = RoundView::Table {
            seats: vec![
                seat("You", &[player], player.rank.label()),
                seat("Dealer", &[dealer], dealer.rank.label()),
            ],
        };
        Ok((view, Outcome { payout, message }))
    }
}

#[derive(Debug)]
pub struct Baccarat {
    table: BaccaratTable,
    pick: Pick,
    deck: Option<Deck>,
}

impl Baccarat {
    pub fn new(table: BaccaratTable, pick: Pick, deck: Option<Deck>) -> Self {
        Self { table, pick, deck }
    }

    /// Payout for a finished coup.
    pub fn settle(&self, bet: u64, outcome: baccarat::Outcome) -> (u64, &'static str) {
        use baccarat::Outcome as O;
        match (self.pick, outcome) {
            (Pick::Tie, O::Tie) => (pay(bet, self.table.tie), "Tie called! The shoe pays out."),
            (Pick::Tie, _) => (0, "No tie this coup."),
            (_, O::Tie) => (bet, "Tie coup. Your bet is pushed."),
            (Pick::Player, O::Player) => (pay(bet, self.table.player), "Player wins. Even money."),
            (Pick::Banker, O::Banker) => (
                pay(bet, self.table.banker),
                "Banker wins. Paid less commission.",
            ),
            _ => (0, "The other side takes the coup."),
        }
    }
}

impl Resolver for Baccarat {
    fn game(&self) -> GameId {
        GameId::Baccarat
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let mut deck = take_deck(&mut self.deck, rng);
        let coup = Coup::deal(&mut deck)?;
        let (payout, verdict) = self.settle(bet, coup.outcome);
        let message = format!(
            "Player {} vs Banker {}. {verdict}",
            coup.player_total, coup.banker_total
        );
        let view = RoundView::Table {
            seats: vec![
                seat("Player", &coup.player, coup.player_total.to_string()),
                seat("Banker", &coup.banker, coup.banker_total.to_string()),
            ],
        };
        Ok((view, Outcome { payout, message }))
    }
}

#[derive(Debug)]
pub struct Triad {
    table: TriadTable,
    deck: Option<Deck>,
}

impl Triad {
    pub fn new(table: TriadTable, deck: Option<Deck>) -> Self {
        Self { table, deck }
    }

    fn bonus(&self, hand: &TriadHand) -> f64 {
        match hand.rank {
            TriadRank::Straight => self.table.straight_bonus,
            TriadRank::ThreeOfAKind => self.table.trips_bonus,
            TriadRank::StraightFlush => self.table.straight_flush_bonus,
            _ => 0.0,
        }
    }

    pub fn settle(&self, bet: u64, player: &TriadHand, dealer: &TriadHand) -> (u64, String) {
        let (base, verdict) = if !dealer_qualifies(dealer) {
            (
                pay(bet, self.table.no_qualify),
                "Dealer does not qualify, ante pays.".to_string(),
            )
        } else {
            match player.cmp(dealer) {
                Ordering::Greater => (
                    pay(bet, self.table.win),
                    format!("{} beats the dealer's {}.", player.rank.label(), dealer.rank.label()),
                ),
                Ordering::Equal => (bet, "Dead even with the dealer. Stake returned.".to_string()),
                Ordering::Less => (
                    0,
                    format!("Dealer's {} takes it.", dealer.rank.label()),
                ),
            }
        };
        let bonus = pay(bet, self.bonus(player));
        if bonus > 0 {
            (
                base + bonus,
                format!("{verdict} {} bonus +{bonus}.", player.rank.label()),
            )
        } else {
            (base, verdict)
        }
    }
}

impl Resolver for Triad {
    fn game(&self) -> GameId {
        GameId::Triad
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let mut deck = take_deck(&mut self.deck, rng);
        let player: [Card; 3] = [deck.draw()?, deck.draw()?, deck.draw()?];
        let dealer: [Card; 3] = [deck.draw()?, deck.draw()?, deck.draw()?];
        let player_hand = evaluate_three(&player);
        let dealer_hand = evaluate_three(&dealer);
        let (payout, message) = self.settle(bet, &player_hand, &dealer_hand);
        let view = RoundView::Table {
            seats: vec![
                seat("You", &player, player_hand.rank.label()),
                seat("Dealer", &dealer, dealer_hand.rank.label()),
            ],
        };
        Ok((view, Outcome { payout, message }))
    }
}

#[derive(Debug)]
pub struct CeeLo {
    table: CeeLoTable,
}

impl CeeLo {
    pub fn new(table: CeeLoTable) -> Self {
        Self { table }
    }

    /// Throws until something scores or the re-rolls run out. A throw that
    /// never scores reads as 1-2-3.
    fn throw(&self, rng: &mut GameRng) -> Result<([u8; 3], CeeLoRoll), FloorError> {
        let mut last = [1, 2, 3];
        for _ in 0..=self.table.max_rerolls {
            let dice = [rng.roll_die(), rng.roll_die(), rng.roll_die()];
            let roll = CeeLoRoll::read(dice)?;
            if roll.is_scoring() {
                return Ok((dice, roll));
            }
            last = dice;
        }
        Ok((last, CeeLoRoll::AutoLoss))
    }
}

impl Resolver for CeeLo {
    fn game(&self) -> GameId {
        GameId::CeeLo
    }

    fn resolve(&mut self, bet: u64, rng: &mut GameRng) -> Result<(RoundView, Outcome), FloorError> {
        let (player_dice, player) = self.throw(rng)?;
        let (house_dice, house) = self.throw(rng)?;
        let (payout, verdict) = match compare_cee_lo(player, house) {
            Ordering::Greater => (pay(bet, self.table.win), "You take the house"),
            Ordering::Equal => (bet, "Stand-off, stake returned"),
            Ordering::Less => (0, "House takes it"),
        };
        let message = format!(
            "You rolled {}, house rolled {}. {verdict}.",
            player.label(),
            house.label()
        );
        let view = RoundView::Dice {
            dice: player_dice.to_vec(),
            point: None,
            house: house_dice.to_vec(),
        };
        Ok((view, Outcome { payout, message }))
    }
}
