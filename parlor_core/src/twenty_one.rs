use rand::Rng;
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Diamond,
    Club,
    Heart,
    Spade,
}

/// 点数 (Rank)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }
}

pub const SUITS: [Suit; 4] = [Suit::Diamond, Suit::Club, Suit::Heart, Suit::Spade];

pub const RANKS: [Rank; 13] = [
    Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
    Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
];

pub const MAX_HAND_VALUE: u32 = 21;
pub const DEALER_STAY_VALUE: u32 = 17;
const MAX_ACE_VALUE: u32 = 11;

impl Rank {
    /// 非 A 牌的点数，A 的点数取决于整手牌
    fn value(self) -> u32 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 1,
        }
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Diamond => "Diamonds",
            Suit::Club => "Clubs",
            Suit::Heart => "Hearts",
            Suit::Spade => "Spades",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

// --- 牌堆 ---

/// 牌堆，从末尾发牌
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 创建一副洗好的 52 张牌
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut cards = Vec::with_capacity(52);
        for &suit in &SUITS {
            for &rank in &RANKS {
                cards.push(Card { rank, suit });
            }
        }
        cards.shuffle(rng);
        Deck { cards }
    }

    /// 用指定顺序的牌组成牌堆，最后一张最先发出
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// # Panics
    /// 牌堆为空时会 panic。
    pub fn deal(&mut self) -> Card {
        match self.cards.pop() {
            Some(card) => card,
            None => panic!("牌堆已经空了"),
        }
    }
}

// --- 手牌与计分 ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand::default()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// 手牌总点数
    /// 所有 A 先按一张 11 点、其余 1 点计算，超过 21 点时全部按 1 点计算。
    pub fn score(&self) -> u32 {
        let aces = self.cards.iter().filter(|c| c.rank == Rank::Ace).count() as u32;
        let rest: u32 = self
            .cards
            .iter()
            .filter(|c| c.rank != Rank::Ace)
            .map(|c| c.rank.value())
            .sum();

        let max_ace_score = if aces == 0 { 0 } else { MAX_ACE_VALUE + aces - 1 };
        if rest + max_ace_score > MAX_HAND_VALUE {
            rest + aces
        } else {
            rest + max_ace_score
        }
    }

    pub fn is_busted(&self) -> bool {
        self.score() > MAX_HAND_VALUE
    }

    /// 庄家只亮出第一张牌
    pub fn hidden_display(&self) -> String {
        match self.cards.first() {
            Some(card) => format!("{}, one other card", card),
            None => String::new(),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", cards.join(", "))
    }
}

// --- 游戏流程 ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PlayerTurn,
    DealerTurn,
    Finished,
}

/// 一局结束后的结果，站在玩家视角
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableResult {
    PlayerBusted,
    DealerBusted,
    PlayerWins,
    DealerWins,
    Push,
}

/// 一局二十一点
pub struct TwentyOneGame {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    phase: Phase,
}

impl TwentyOneGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> TwentyOneGame {
        TwentyOneGame::with_deck(Deck::shuffled(rng))
    }

    /// 用给定的牌堆开局，先给玩家发两张，再给庄家发两张
    pub fn with_deck(mut deck: Deck) -> TwentyOneGame {
        let mut player = Hand::new();
        let mut dealer = Hand::new();
        player.add_card(deck.deal());
        player.add_card(deck.deal());
        dealer.add_card(deck.deal());
        dealer.add_card(deck.deal());

        TwentyOneGame { deck, player, dealer, phase: Phase::PlayerTurn }
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 玩家要牌，爆牌时直接结束本局
    pub fn player_hit(&mut self) -> Card {
        assert_eq!(self.phase, Phase::PlayerTurn, "现在不是玩家的回合");
        let card = self.deck.deal();
        self.player.add_card(card);
        if self.player.is_busted() {
            self.phase = Phase::Finished;
        }
        card
    }

    pub fn player_stay(&mut self) {
        assert_eq!(self.phase, Phase::PlayerTurn, "现在不是玩家的回合");
        self.phase = Phase::DealerTurn;
    }

    /// 庄家点数小于 17 时一直要牌，返回庄家新拿到的牌
    pub fn play_dealer(&mut self) -> Vec<Card> {
        assert_eq!(self.phase, Phase::DealerTurn, "现在不是庄家的回合");
        let mut drawn = Vec::new();
        while self.dealer.score() < DEALER_STAY_VALUE {
            let card = self.deck.deal();
            self.dealer.add_card(card);
            drawn.push(card);
        }
        self.phase = Phase::Finished;
        drawn
    }

    pub fn result(&self) -> Option<TableResult> {
        if self.phase != Phase::Finished {
            return None;
        }

        let player = self.player.score();
        let dealer = self.dealer.score();
        Some(if self.player.is_busted() {
            TableResult::PlayerBusted
        } else if self.dealer.is_busted() {
            TableResult::DealerBusted
        } else if player > dealer {
            TableResult::PlayerWins
        } else if dealer > player {
            TableResult::DealerWins
        } else {
            TableResult::Push
        })
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;
    use Suit::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    fn hand(cards: &[Card]) -> Hand {
        let mut h = Hand::new();
        for &c in cards {
            h.add_card(c);
        }
        h
    }

    // 牌堆从末尾发牌，这里按发牌顺序书写后再反转
    fn stacked(deal_order: &[Card]) -> Deck {
        let mut cards = deal_order.to_vec();
        cards.reverse();
        Deck::from_cards(cards)
    }

    #[test]
    fn test_shuffled_deck_has_52_unique_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = Deck::shuffled(&mut rng);
        assert_eq!(deck.len(), 52);
        let cards: HashSet<Card> = (0..52).map(|_| deck.deal()).collect();
        assert_eq!(cards.len(), 52);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_card_display() {
        assert_eq!(card(Ten, Heart).to_string(), "10 of Hearts");
        assert_eq!(card(Queen, Spade).to_string(), "Q of Spades");
        assert_eq!(hand(&[card(Two, Club), card(Ace, Diamond)]).to_string(), "2 of Clubs, A of Diamonds");
    }

    #[test]
    fn test_score_face_cards() {
        assert_eq!(hand(&[card(King, Heart), card(Queen, Club)]).score(), 20);
        assert_eq!(hand(&[card(Jack, Heart), card(Five, Club), card(Nine, Spade)]).score(), 24);
    }

    #[test]
    fn test_score_aces() {
        assert_eq!(hand(&[card(Ace, Heart), card(King, Club)]).score(), 21);
        assert_eq!(hand(&[card(Ace, Heart), card(Ace, Club)]).score(), 12);
        assert_eq!(hand(&[card(Ace, Heart), card(Ace, Club), card(Nine, Spade)]).score(), 21);
        // 11 + 1 + 10 超过 21，全部 A 按 1 点
        assert_eq!(hand(&[card(Ace, Heart), card(Ace, Club), card(Ten, Spade)]).score(), 12);
    }

    #[test]
    fn test_dealer_hidden_display() {
        let h = hand(&[card(Seven, Diamond), card(Ace, Spade)]);
        assert_eq!(h.hidden_display(), "7 of Diamonds, one other card");
    }

    #[test]
    fn test_player_bust_ends_game() {
        let deck = stacked(&[
            card(Ten, Heart), card(Six, Club),   // 玩家
            card(Nine, Spade), card(Eight, Club), // 庄家
            card(King, Diamond),                  // 玩家要牌
        ]);
        let mut game = TwentyOneGame::with_deck(deck);
        assert_eq!(game.player().score(), 16);
        game.player_hit();
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.result(), Some(TableResult::PlayerBusted));
        assert_eq!(game.dealer().cards().len(), 2);
    }

    #[test]
    fn test_dealer_draws_to_seventeen() {
        let deck = stacked(&[
            card(Ten, Heart), card(Nine, Club),  // 玩家 19
            card(Two, Spade), card(Four, Club),  // 庄家 6
            card(Five, Diamond), card(Three, Heart), card(Two, Club), card(King, Club),
        ]);
        let mut game = TwentyOneGame::with_deck(deck);
        assert_eq!(game.result(), None);
        game.player_stay();
        let drawn = game.play_dealer();
        // 6 -> 11 -> 14 -> 16 -> 26
        assert_eq!(drawn.len(), 4);
        assert_eq!(game.result(), Some(TableResult::DealerBusted));
    }

    #[test]
    fn test_dealer_stays_and_compares() {
        let deck = stacked(&[
            card(Ten, Heart), card(Seven, Club), // 玩家 17
            card(Ten, Spade), card(Eight, Club), // 庄家 18
        ]);
        let mut game = TwentyOneGame::with_deck(deck);
        game.player_stay();
        assert!(game.play_dealer().is_empty());
        assert_eq!(game.result(), Some(TableResult::DealerWins));

        let deck = stacked(&[
            card(Ten, Heart), card(Ace, Club),   // 玩家 21
            card(Ten, Spade), card(Seven, Club), // 庄家 17
        ]);
        let mut game = TwentyOneGame::with_deck(deck);
        game.player_stay();
        game.play_dealer();
        assert_eq!(game.result(), Some(TableResult::PlayerWins));

        let deck = stacked(&[
            card(Ten, Heart), card(Eight, Club),
            card(King, Spade), card(Eight, Diamond),
        ]);
        let mut game = TwentyOneGame::with_deck(deck);
        game.player_stay();
        game.play_dealer();
        assert_eq!(game.result(), Some(TableResult::Push));
    }

    #[test]
    #[should_panic]
    fn test_dealer_cannot_play_during_player_turn() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut game = TwentyOneGame::new(&mut rng);
        game.play_dealer();
    }
}
