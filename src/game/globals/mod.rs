mod details;
pub use details::*;

use lazy_static::lazy_static;
use std::collections::HashMap;

/// The number of cells around the board.
pub const BOARD_SIZE: u8 = 40;

/// Position of the crisis zone ("jail").
pub const CRISIS_POSITION: u8 = 10;

/// The balance every player starts with.
pub const STARTING_BALANCE: i64 = 15_000;

/// The efficiency every player starts with.
pub const STARTING_EFFICIENCY: u8 = 2;

/// The highest efficiency score a player can have.
pub const MAX_EFFICIENCY: u8 = 5;

/// The fixed part of the bonus paid for passing 'Start'.
pub const START_BONUS: i64 = 2_000;

/// The extra bonus paid for passing 'Start' per point of efficiency.
pub const START_BONUS_PER_EFFICIENCY: i64 = 200;

/// The fee charged to leave the crisis zone after the last failed attempt.
pub const CRISIS_RELEASE_FEE: i64 = 1_000;

/// The number of failed rolls allowed before the release fee is due.
pub const CRISIS_FREE_ATTEMPTS: u8 = 2;

/// The highest upgrade level of a channel.
pub const MAX_LEVEL: u8 = 5;

/// The number of log entries kept, newest first.
pub const LOG_CAPACITY: usize = 50;

/// Net worth credited per point of efficiency when the time limit is reached.
pub const EFFICIENCY_SCORE_WEIGHT: i64 = 500;

/// The minimum and maximum number of seats.
pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 5;

/// Build a cell at `position`.
fn cell(position: u8, name: &'static str, kind: CellKind) -> Cell {
    Cell {
        position,
        name,
        kind,
    }
}

/// Build a channel cell at `position`.
fn channel(
    position: u8,
    name: &'static str,
    group: ChannelGroup,
    price: i64,
    base_rent: i64,
    upgrade_cost: i64,
) -> Cell {
    cell(
        position,
        name,
        CellKind::Channel(ChannelData::new(group, price, base_rent, upgrade_cost)),
    )
}

/// Shorthand for a card effect that announces `message` and then applies `effects`.
fn announce(message: &'static str, effects: Vec<CardEffect>) -> CardEffect {
    let mut sequence = vec![CardEffect::Announce(message)];
    sequence.extend(effects);
    CardEffect::Sequence(sequence)
}

lazy_static! {
    /// All the cells on the board, indexed by position.
    pub static ref CELLS: Vec<Cell> = {
        use ChannelGroup::*;

        vec![
            cell(0, "Start", CellKind::Start),
            channel(1, "Yandex Direct", Search, 600, 20, 500),
            cell(2, "Market", CellKind::Market),
            channel(3, "Google Ads", Search, 600, 40, 500),
            cell(4, "VAT", CellKind::Tax { amount: 2_000 }),
            channel(5, "Programmatic", Search, 1_000, 50, 500),
            channel(6, "VK Ads", Social, 1_000, 60, 500),
            cell(7, "Brief", CellKind::Brief),
            channel(8, "Telegram Ads", Social, 1_000, 60, 500),
            channel(9, "Ok.ru", Social, 1_200, 80, 500),
            cell(10, "Crisis", CellKind::Crisis),
            channel(11, "YouTube", Video, 1_400, 100, 1_000),
            channel(12, "RuTube", Video, 1_400, 100, 1_000),
            channel(13, "Online Cinema", Video, 1_600, 120, 1_000),
            channel(14, "Instagram Bloggers", Influencers, 1_800, 140, 1_000),
            cell(15, "Market", CellKind::Market),
            channel(16, "Twitch Streamers", Influencers, 1_800, 140, 1_000),
            cell(17, "Brief", CellKind::Brief),
            channel(18, "TikTok Stars", Influencers, 2_000, 160, 1_000),
            channel(19, "Podcasters", Influencers, 2_000, 160, 1_000),
            cell(20, "Research", CellKind::Bonus),
            channel(21, "Billboards", Ooh, 2_200, 180, 1_500),
            cell(22, "Brief", CellKind::Brief),
            channel(23, "City Formats", Ooh, 2_200, 180, 1_500),
            channel(24, "Digital OOH", Ooh, 2_400, 200, 1_500),
            channel(25, "Radio Energy", Audio, 2_600, 220, 1_500),
            channel(26, "Spotify Ads", Audio, 2_600, 220, 1_500),
            channel(27, "Yandex Music", Audio, 2_800, 240, 1_500),
            cell(28, "Market", CellKind::Market),
            channel(29, "Podcasts Network", Audio, 2_800, 240, 1_500),
            cell(30, "Go to Crisis", CellKind::SendToCrisis),
            channel(31, "Federal TV", Tv, 3_000, 260, 2_000),
            channel(32, "Cable TV", Tv, 3_000, 260, 2_000),
            cell(33, "Brief", CellKind::Brief),
            channel(34, "Smart TV Ads", Tv, 3_200, 280, 2_000),
            channel(35, "Industry Events", Pr, 3_500, 350, 2_000),
            cell(36, "Brief", CellKind::Brief),
            channel(37, "PR Articles", Pr, 3_500, 350, 2_000),
            cell(38, "Agency Fee", CellKind::Tax { amount: 1_000 }),
            channel(39, "Special Projects", Pr, 4_000, 500, 2_000),
        ]
    };

    /// Positions of the channels on the board, sorted by their group.
    pub static ref CELLS_BY_GROUP: HashMap<ChannelGroup, Vec<u8>> = {
        let mut groups: HashMap<ChannelGroup, Vec<u8>> = HashMap::new();

        for cell in CELLS.iter() {
            if let Some(data) = cell.channel() {
                groups.entry(data.group).or_default().push(cell.position);
            }
        }

        groups
    };

    /// The brief deck, drawn on brief cells.
    pub static ref BRIEFS: Vec<Card> = vec![
        Card {
            id: 1,
            deck: Deck::Brief,
            title: "Launch in two weeks",
            text: "Rush start! With a Video or Influencers channel: +1200 and +1E. Otherwise -600.",
            effect: CardEffect::Conditional {
                predicate: Predicate::OwnsInGroups(&[ChannelGroup::Video, ChannelGroup::Influencers]),
                on_true: Box::new(announce(
                    "Rush launch succeeded! +1200, +1E",
                    vec![CardEffect::GrantFunds(1_200), CardEffect::AdjustEfficiency(1)],
                )),
                on_false: Box::new(announce(
                    "Missed the launch. -600",
                    vec![CardEffect::GrantFunds(-600)],
                )),
            },
        },
        Card {
            id: 2,
            deck: Deck::Brief,
            title: "Leads wanted",
            text: "The client wants performance. With a Search channel: +1000. Otherwise -1E.",
            effect: CardEffect::Conditional {
                predicate: Predicate::OwnsInGroups(&[ChannelGroup::Search]),
                on_true: Box::new(announce("Leads delivered! +1000", vec![CardEffect::GrantFunds(1_000)])),
                on_false: Box::new(announce(
                    "No leads, the client is unhappy. -1E",
                    vec![CardEffect::AdjustEfficiency(-1)],
                )),
            },
        },
        Card {
            id: 3,
            deck: Deck::Brief,
            title: "Creative went viral",
            text: "Viral effect! +600 and +1E.",
            effect: announce(
                "The creative went viral!",
                vec![CardEffect::GrantFunds(600), CardEffect::AdjustEfficiency(1)],
            ),
        },
        Card {
            id: 4,
            deck: Deck::Brief,
            title: "Missed deadline",
            text: "Production let you down. Penalty -700.",
            effect: announce("Deadline missed. Penalty.", vec![CardEffect::GrantFunds(-700)]),
        },
        Card {
            id: 5,
            deck: Deck::Brief,
            title: "Client doubled the budget",
            text: "Payout +1500!",
            effect: announce("Budget doubled!", vec![CardEffect::GrantFunds(1_500)]),
        },
    ];

    /// The market deck, drawn on market cells.
    pub static ref MARKETS: Vec<Card> = vec![
        Card {
            id: 101,
            deck: Deck::Market,
            title: "Sales season",
            text: "The market grows. Receive +800.",
            effect: announce("Sales season brings income.", vec![CardEffect::GrantFunds(800)]),
        },
        Card {
            id: 102,
            deck: Deck::Market,
            title: "Ad labelling audit",
            text: "Fines for unlabelled ads. -600.",
            effect: announce("Fined for unlabelled ads.", vec![CardEffect::GrantFunds(-600)]),
        },
        Card {
            id: 103,
            deck: Deck::Market,
            title: "Holidays",
            text: "Everyone +500.",
            effect: announce("Holiday bonus for everyone.", vec![CardEffect::GrantFundsToAll(500)]),
        },
        Card {
            id: 104,
            deck: Deck::Market,
            title: "Algorithms changed",
            text: "Reach dropped. -1E, but +500 compensation.",
            effect: announce(
                "Algorithms changed.",
                vec![CardEffect::GrantFunds(500), CardEffect::AdjustEfficiency(-1)],
            ),
        },
        Card {
            id: 105,
            deck: Deck::Market,
            title: "Anti-crisis",
            text: "Use this card to leave the crisis zone.",
            effect: announce(
                "You received an Anti-crisis card!",
                vec![CardEffect::GrantFlag(PlayerFlag::AntiCrisis)],
            ),
        },
    ];
}

/// The cell at `position`.
pub fn cell_at(position: u8) -> &'static Cell {
    &CELLS[usize::from(position % BOARD_SIZE)]
}

/// The cards of `deck`.
pub fn deck_cards(deck: Deck) -> &'static [Card] {
    match deck {
        Deck::Brief => BRIEFS.as_slice(),
        Deck::Market => MARKETS.as_slice(),
    }
}

/// Find a card by its id in either deck.
pub fn find_card(id: u16) -> Option<&'static Card> {
    BRIEFS.iter().chain(MARKETS.iter()).find(|card| card.id == id)
}
