use arcade_engine::blackjack::{
    hand_total, is_bust, natural_outcome, play_dealer, settle, Outcome,
};
use arcade_engine::cards::{Card, Rank as R, Suit as S};
use arcade_engine::deck::Deck;

fn hand(ranks: &[R]) -> Vec<Card> {
    ranks.iter().map(|&r| Card::new(r, S::Spades)).collect()
}

#[test]
fn two_aces_and_nine_make_twenty_one() {
    assert_eq!(hand_total(&hand(&[R::Ace, R::Ace, R::Nine])).value, 21);
}

#[test]
fn three_aces_and_eight_make_twenty_one() {
    assert_eq!(hand_total(&hand(&[R::Ace, R::Ace, R::Ace, R::Eight])).value, 21);
}

#[test]
fn faces_count_ten() {
    assert_eq!(hand_total(&hand(&[R::King, R::Queen])).value, 20);
    assert!(is_bust(&hand(&[R::King, R::Queen, R::Two])));
}

#[test]
fn naturals_resolve_the_deal() {
    let natural = hand(&[R::Ace, R::Jack]);
    let twenty = hand(&[R::Ten, R::King]);
    assert_eq!(natural_outcome(&natural, &natural), Some(Outcome::Push));
    assert_eq!(natural_outcome(&natural, &twenty), Some(Outcome::Blackjack));
    assert_eq!(natural_outcome(&twenty, &natural), Some(Outcome::Loss));
    assert_eq!(natural_outcome(&twenty, &twenty), None);
}

#[test]
fn dealer_draws_to_seventeen() {
    let mut dealer = hand(&[R::Six, R::Five]);
    let mut shoe = Deck::stacked(hand(&[R::Two, R::Four, R::Nine]));
    let total = play_dealer(&mut dealer, &mut shoe).unwrap();
    // 11 -> 13 -> 17, stands before the nine
    assert_eq!(total.value, 17);
    assert_eq!(dealer.len(), 4);
    assert_eq!(shoe.remaining(), 1);
}

#[test]
fn settle_compares_after_dealer_plays() {
    let nineteen = hand(&[R::Ten, R::Nine]);
    let eighteen = hand(&[R::Ten, R::Eight]);
    let dealer_bust = hand(&[R::Ten, R::Six, R::Nine]);
    let player_bust = hand(&[R::Ten, R::Six, R::Nine]);
    assert_eq!(settle(&nineteen, &eighteen), Outcome::Win);
    assert_eq!(settle(&eighteen, &nineteen), Outcome::Loss);
    assert_eq!(settle(&nineteen, &nineteen), Outcome::Push);
    assert_eq!(settle(&eighteen, &dealer_bust), Outcome::Win);
    assert_eq!(settle(&player_bust, &dealer_bust), Outcome::Loss);
}
