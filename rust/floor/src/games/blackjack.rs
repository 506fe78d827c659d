use arcade_engine::blackjack::{self as rules, Outcome as Hand};
use arcade_engine::cards::Card;
use arcade_engine::deck::Deck;
use arcade_engine::rng::GameRng;

use crate::errors::FloorError;
use crate::games::comparison::take_deck;
use crate::round::{pay, Action, CardFace, GameId, RoundController, RoundView, SeatView, Step};
use crate::tables::BlackjackTable;

#[derive(Debug)]
pub struct BlackjackRound {
    table: BlackjackTable,
    bet: u64,
    deck: Option<Deck>,
    shoe: Deck,
    player: Vec<Card>,
    dealer: Vec<Card>,
    reveal_dealer: bool,
}

impl BlackjackRound {
    pub fn new(table: BlackjackTable, bet: u64, deck: Option<Deck>) -> Self {
        Self {
            table,
            bet,
            deck,
            shoe: Deck::stacked(Vec::new()),
            player: Vec::new(),
            dealer: Vec::new(),
            reveal_dealer: false,
        }
    }

    fn finish(&mut self, hand: Hand, message: String) -> Step {
        self.reveal_dealer = true;
        let payout = match hand {
            Hand::Blackjack => pay(self.bet, self.table.natural),
            Hand::Win => pay(self.bet, self.table.win),
            Hand::Push => self.bet,
            Hand::Loss => 0,
        };
        Step::settle(payout, message)
    }

    fn stand(&mut self) -> Result<Step, FloorError> {
        // the dealer plays on copies; a short shoe leaves the hand as it was
        let mut dealer = self.dealer.clone();
        let mut shoe = self.shoe.clone();
        rules::play_dealer(&mut dealer, &mut shoe)?;
        self.dealer = dealer;
        self.shoe = shoe;
        let player = rules::hand_total(&self.player).value;
        let dealer = rules::hand_total(&self.dealer).value;
        let outcome = rules::settle(&self.player, &self.dealer);
        let message = match outcome {
            Hand::Win if dealer > rules::BLACKJACK => {
                format!("Dealer busts with {dealer}. You win.")
            }
            Hand::Win => format!("You win with {player} against dealer's {dealer}."),
            Hand::Loss => format!("Dealer wins {dealer} to {player}."),
            _ => format!("Push. Both at {player}."),
        };
        Ok(self.finish(outcome, message))
    }
}

impl RoundController for BlackjackRound {
    fn game(&self) -> GameId {
        GameId::Blackjack
    }

    fn bet(&self) -> u64 {
        self.bet
    }

    fn open(&mut self, rng: &mut GameRng) -> Result<Step, FloorError> {
        self.shoe = take_deck(&mut self.deck, rng);
        self.player = self.shoe.draw_many(2)?;
        self.dealer = self.shoe.draw_many(2)?;

        Ok(match rules::natural_outcome(&self.player, &self.dealer) {
            Some(Hand::Push) => self.finish(
                Hand::Push,
                "Both you and the dealer hit blackjack. Push.".into(),
            ),
            Some(Hand::Blackjack) => self.finish(Hand::Blackjack, "Blackjack! Paid 3:2.".into()),
            Some(other) => self.finish(other, "Dealer has blackjack. You lose the hand.".into()),
            None => Step::status("Hit or stand to play the hand."),
        })
    }

    fn act(&mut self, action: Action, _rng: &mut GameRng) -> Result<Step, FloorError> {
        match action {
            Action::Hit => {
                self.player.push(self.shoe.draw()?);
                let total = rules::hand_total(&self.player).value;
                if rules::is_bust(&self.player) {
                    Ok(self.finish(Hand::Loss, "You bust. Dealer wins the hand.".into()))
                } else {
                    Ok(Step::status(format!("You have {total}.")))
                }
            }
            Action::Stand => self.stand(),
            other => Err(FloorError::illegal(
                GameId::Blackjack,
                format!("{} is not a blackjack move, hit or stand", other.name()),
            )),
        }
    }

    fn view(&self) -> RoundView {
        let player_total = rules::hand_total(&self.player);
        let player = SeatView {
            name: "You".into(),
            cards: CardFace::shown(&self.player),
            label: Some(total_label(player_total)),
            held: Vec::new(),
        };
        let dealer = if self.reveal_dealer {
            SeatView {
                name: "Dealer".into(),
                cards: CardFace::shown(&self.dealer),
                label: Some(total_label(rules::hand_total(&self.dealer))),
                held: Vec::new(),
            }
        } else {
            let mut cards = CardFace::shown(&self.dealer[..self.dealer.len().min(1)]);
            cards.extend(CardFace::hidden(self.dealer.len().saturating_sub(1)));
            SeatView {
                name: "Dealer".into(),
                cards,
                label: None,
                held: Vec::new(),
            }
        };
        RoundView::Table {
            seats: vec![player, dealer],
        }
    }
}

fn total_label(total: rules::Total) -> String {
    if total.soft {
        format!("soft {}", total.value)
    } else {
        total.value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_engine::cards::{Rank as R, Suit as S};
    use arcade_engine::GameError;

    fn cards(ranks: &[R]) -> Vec<Card> {
        ranks.iter().map(|&r| Card::new(r, S::Hearts)).collect()
    }

    fn round(ranks: &[R]) -> BlackjackRound {
        BlackjackRound::new(
            BlackjackTable::default(),
            100,
            Some(Deck::stacked(cards(ranks))),
        )
    }

    #[test]
    fn player_natural_pays_three_to_two() {
        let mut rng = GameRng::seeded(0);
        let mut bj = round(&[R::Ace, R::King, R::Nine, R::Seven]);
        assert_eq!(bj.open(&mut rng).unwrap(), Step::settle(250, "Blackjack! Paid 3:2."));
    }

    #[test]
    fn dealer_natural_beats_player() {
        let mut rng = GameRng::seeded(0);
        let mut bj = round(&[R::Ten, R::Nine, R::Ace, R::Queen]);
        match bj.open(&mut rng).unwrap() {
            Step::Settle(o) => assert_eq!(o.payout, 0),
            other => panic!("expected settlement, got {other:?}"),
        }
    }

    #[test]
    fn hole_card_hidden_until_settled() {
        let mut rng = GameRng::seeded(0);
        let mut bj = round(&[R::Ten, R::Six, R::Nine, R::Seven, R::Ten]);
        assert!(matches!(bj.open(&mut rng).unwrap(), Step::Continue { .. }));
        let RoundView::Table { seats } = bj.view() else {
            panic!("expected table view");
        };
        assert_eq!(seats[1].cards[1], CardFace::Down);
        assert_eq!(seats[1].label, None);

        // player 16 hits a ten and busts
        match bj.act(Action::Hit, &mut rng).unwrap() {
            Step::Settle(o) => assert_eq!(o.payout, 0),
            other => panic!("expected bust, got {other:?}"),
        }
        let RoundView::Table { seats } = bj.view() else {
            panic!("expected table view");
        };
        assert!(seats[1].cards.iter().all(|c| matches!(c, CardFace::Up(_))));
    }

    #[test]
    fn stand_plays_out_dealer() {
        let mut rng = GameRng::seeded(0);
        // player 19; dealer 11 draws a four, then a ten, and busts on 25
        let mut bj = round(&[R::Ten, R::Nine, R::Six, R::Five, R::Four, R::Ten]);
        bj.open(&mut rng).unwrap();
        match bj.act(Action::Stand, &mut rng).unwrap() {
            Step::Settle(o) => {
                assert_eq!(o.payout, 200);
                assert_eq!(o.message, "Dealer busts with 25. You win.");
            }
            other => panic!("expected settlement, got {other:?}"),
        }
    }

    #[test]
    fn short_shoe_leaves_the_dealer_hand_untouched() {
        let mut rng = GameRng::seeded(0);
        // dealer 12 draws a two, then needs another card the shoe lacks
        let mut bj = round(&[R::Ten, R::Six, R::Nine, R::Three, R::Two]);
        bj.open(&mut rng).unwrap();
        assert!(matches!(
            bj.act(Action::Stand, &mut rng),
            Err(FloorError::Game(GameError::DeckExhausted { .. }))
        ));
        assert_eq!(bj.dealer.len(), 2);
        assert_eq!(bj.shoe.remaining(), 1);
        assert!(!bj.reveal_dealer);
        let RoundView::Table { seats } = bj.view() else {
            panic!("expected table view");
        };
        assert_eq!(seats[1].cards[1], CardFace::Down);
    }

    #[test]
    fn equal_totals_push() {
        let mut rng = GameRng::seeded(0);
        let mut bj = round(&[R::Ten, R::Eight, R::Nine, R::Nine]);
        bj.open(&mut rng).unwrap();
        assert_eq!(
            bj.act(Action::Stand, &mut rng).unwrap(),
            Step::settle(100, "Push. Both at 18.")
        );
    }

    #[test]
    fn other_actions_are_illegal() {
        let mut rng = GameRng::seeded(0);
        let mut bj = round(&[R::Ten, R::Six, R::Nine, R::Seven]);
        bj.open(&mut rng).unwrap();
        assert!(matches!(
            bj.act(Action::Draw, &mut rng),
            Err(FloorError::IllegalAction { .. })
        ));
    }
}
