use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
/// The outcome of rolling both dice.
pub struct DiceRoll {
    /// The value of the first die, from 1 to 6.
    pub first: u8,
    /// The value of the second die, from 1 to 6.
    pub second: u8,
}

impl DiceRoll {
    /// Create a dice roll from two die values.
    pub fn new(first: u8, second: u8) -> DiceRoll {
        DiceRoll { first, second }
    }

    /// Whether both dice show a face from 1 to 6.
    pub fn is_valid(&self) -> bool {
        (1..=6).contains(&self.first) && (1..=6).contains(&self.second)
    }

    /// The sum of the two dice.
    pub fn sum(&self) -> u8 {
        self.first + self.second
    }

    /// Whether both the dice resulted in the same number.
    pub fn is_double(&self) -> bool {
        self.first == self.second
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
/// The ownership groups of channels. Owning every channel of a
/// group is a monopoly.
pub enum ChannelGroup {
    Search,
    Social,
    Video,
    Influencers,
    Ooh,
    Audio,
    Tv,
    Pr,
}

impl ChannelGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelGroup::Search => "Search",
            ChannelGroup::Social => "Social",
            ChannelGroup::Video => "Video",
            ChannelGroup::Influencers => "Influencers",
            ChannelGroup::Ooh => "OOH",
            ChannelGroup::Audio => "Audio",
            ChannelGroup::Tv => "TV",
            ChannelGroup::Pr => "PR",
        }
    }
}

impl fmt::Display for ChannelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The economics of a purchasable channel cell.
pub struct ChannelData {
    /// The ownership group that the channel belongs to.
    pub group: ChannelGroup,
    /// The purchase price of the channel.
    pub price: i64,
    /// The rent charged at level 0, before any multiplier.
    pub base_rent: i64,
    /// The cost of raising the channel by one level.
    pub upgrade_cost: i64,
    /// Rent multipliers indexed by upgrade level. `rent_multipliers[0]`
    /// applies at level 0 and `rent_multipliers[4]` at level 4. Levels
    /// outside the table fall back to a multiplier of 1.
    pub rent_multipliers: [i64; 5],
}

impl ChannelData {
    /// Creates a new channel with the standard multiplier table.
    pub fn new(group: ChannelGroup, price: i64, base_rent: i64, upgrade_cost: i64) -> ChannelData {
        ChannelData {
            group,
            price,
            base_rent,
            upgrade_cost,
            rent_multipliers: [1, 2, 3, 4, 6],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a cell does when a player lands on it.
pub enum CellKind {
    /// The starting cell. Passing it pays the lap bonus.
    Start,
    /// A purchasable channel.
    Channel(ChannelData),
    /// Draws a card from the brief deck.
    Brief,
    /// Draws a card from the market deck.
    Market,
    /// A mandatory payment of a fixed amount.
    Tax { amount: i64 },
    /// The crisis zone. Landing here is only a visit.
    Crisis,
    /// Sends the player into the crisis zone.
    SendToCrisis,
    /// The research bonus corner. Nothing happens here.
    Bonus,
}

/// A cell on the board.
#[derive(Clone, Debug)]
pub struct Cell {
    /// The cell's position around the board, from 0 to 39.
    pub position: u8,
    pub name: &'static str,
    pub kind: CellKind,
}

impl Cell {
    /// The channel economics of this cell, if it's a channel.
    pub fn channel(&self) -> Option<&ChannelData> {
        match &self.kind {
            CellKind::Channel(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
/// The two event card decks.
pub enum Deck {
    Brief,
    Market,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
/// One-time flags that cards can grant to a player.
pub enum PlayerFlag {
    /// Can be spent to leave the crisis zone without rolling.
    AntiCrisis,
    /// One-time synergy bonus. No card in the current decks grants it,
    /// and the engine never reads it.
    Synergy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A condition on the drawing player that a card branches on.
pub enum Predicate {
    /// The player owns at least one channel in any of these groups.
    OwnsInGroups(&'static [ChannelGroup]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The effect of a card, interpreted by `cards::resolve`.
pub enum CardEffect {
    /// Add `amount` (which may be negative) to the drawing player's balance.
    GrantFunds(i64),
    /// Add `amount` to the balance of every player still in the game.
    GrantFundsToAll(i64),
    /// Shift the drawing player's efficiency, clamped to its range.
    AdjustEfficiency(i8),
    /// Set a one-time flag on the drawing player.
    GrantFlag(PlayerFlag),
    /// Emit a log line.
    Announce(&'static str),
    /// Apply each effect in order.
    Sequence(Vec<CardEffect>),
    /// Apply `on_true` if the predicate holds for the drawing player and `on_false` otherwise.
    Conditional {
        predicate: Predicate,
        on_true: Box<CardEffect>,
        on_false: Box<CardEffect>,
    },
}

/// An event card.
#[derive(Clone, Debug)]
pub struct Card {
    pub id: u16,
    pub deck: Deck,
    pub title: &'static str,
    pub text: &'static str,
    pub effect: CardEffect,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Information about a channel related to its ownership.
pub struct Holding {
    /// The upgrade level of this channel, from 0 to 5.
    pub level: u8,
    /// Whether the channel is mortgaged. Mortgaged channels charge no rent.
    pub mortgaged: bool,
}

impl Holding {
    /// Raise the upgrade level by one, if possible. Return whether this had any effect.
    pub fn raise_level(&mut self, max_level: u8) -> bool {
        if self.level < max_level {
            self.level += 1;
            return true;
        }

        false
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A player playing the game.
pub struct Player {
    /// The player's seat index. This never changes during a game.
    pub id: usize,
    pub name: String,
    /// The amount of money the player has. Only negative
    /// transiently, before an elimination is resolved.
    pub balance: i64,
    /// The player's position around the board. 'Start' is at 0.
    pub position: u8,
    /// Efficiency score, from 0 to 5.
    pub efficiency: u8,
    /// Whether the player is currently in the crisis zone.
    pub is_jailed: bool,
    /// The number of failed attempts to roll out of the crisis zone.
    pub jail_attempts: u8,
    /// The channels the player owns, keyed by cell position.
    pub holdings: BTreeMap<u8, Holding>,
    /// Whether the player has been eliminated. Never reset once set.
    pub is_bankrupt: bool,
    /// Set by `PlayerFlag::Synergy`. Reserved for future cards.
    pub has_synergy: bool,
    pub has_anti_crisis: bool,
}

impl Player {
    /// Create a player in seat `id` with the starting balance and efficiency.
    pub fn new(id: usize, name: impl Into<String>, balance: i64, efficiency: u8) -> Player {
        Player {
            id,
            name: name.into(),
            balance,
            position: 0,
            efficiency,
            is_jailed: false,
            jail_attempts: 0,
            holdings: BTreeMap::new(),
            is_bankrupt: false,
            has_synergy: false,
            has_anti_crisis: false,
        }
    }

    /// Whether the player owns the channel at `cell`.
    pub fn owns(&self, cell: u8) -> bool {
        self.holdings.contains_key(&cell)
    }

    /// The upgrade level of an owned channel, or 0 if the player doesn't own it.
    pub fn level(&self, cell: u8) -> u8 {
        self.holdings.get(&cell).map_or(0, |h| h.level)
    }

    pub fn is_mortgaged(&self, cell: u8) -> bool {
        self.holdings.get(&cell).map_or(false, |h| h.mortgaged)
    }

    /// Positions of the channels the player owns, in board order.
    pub fn owned_cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.holdings.keys().copied()
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos_color = if self.is_jailed { "\x1b[31m" } else { "\x1b[36m" };

        write!(
            f,
            "[{}{:02}\x1b[0m] {} \x1b[33m{}\x1b[0mE \x1b[32m{}\x1b[0m ({} channels)",
            pos_color,
            self.position,
            self.name,
            self.efficiency,
            self.balance,
            self.holdings.len()
        )?;

        if self.is_bankrupt {
            write!(f, " \x1b[31mbankrupt\x1b[0m")?;
        }

        Ok(())
    }
}
