//! Interpretation of card effects.
//!
//! Cards never touch the game state directly. `resolve` works out what a card
//! would do to the drawing player and everyone else, and the turn engine
//! decides whether to apply it.

use rand::Rng;

use super::globals::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A partial update of a player. Fields left as `None` are unchanged.
pub struct PlayerPatch {
    pub balance: Option<i64>,
    pub efficiency: Option<u8>,
    pub has_anti_crisis: Option<bool>,
    pub has_synergy: Option<bool>,
}

impl PlayerPatch {
    /// Copy every set field into `player`.
    pub fn merge_into(&self, player: &mut Player) {
        if let Some(balance) = self.balance {
            player.balance = balance;
        }
        if let Some(efficiency) = self.efficiency {
            player.efficiency = efficiency;
        }
        if let Some(flag) = self.has_anti_crisis {
            player.has_anti_crisis = flag;
        }
        if let Some(flag) = self.has_synergy {
            player.has_synergy = flag;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Everything a card does when it's applied.
pub struct CardOutcome {
    /// The update to the drawing player.
    pub patch: PlayerPatch,
    /// Balance changes for other players, as `(player id, amount)`.
    pub grants: Vec<(usize, i64)>,
    /// Log lines emitted by the card, oldest first.
    pub log: Vec<String>,
}

impl Predicate {
    /// Whether the predicate holds for `player`.
    pub fn holds_for(&self, player: &Player) -> bool {
        match self {
            Predicate::OwnsInGroups(groups) => player.owned_cells().any(|position| {
                cell_at(position)
                    .channel()
                    .map_or(false, |data| groups.contains(&data.group))
            }),
        }
    }
}

/// Draw a card uniformly at random from `deck`. Cards are drawn with replacement.
pub fn draw<R: Rng>(deck: Deck, rng: &mut R) -> &'static Card {
    let cards = deck_cards(deck);
    &cards[rng.gen_range(0..cards.len())]
}

/// Work out the outcome of `card` for `player`, with `players` being every seat.
pub fn resolve(card: &Card, player: &Player, players: &[Player]) -> CardOutcome {
    let mut outcome = CardOutcome::default();
    interpret(&card.effect, player, players, &mut outcome);
    outcome
}

fn interpret(effect: &CardEffect, player: &Player, players: &[Player], outcome: &mut CardOutcome) {
    match effect {
        CardEffect::GrantFunds(amount) => {
            let balance = outcome.patch.balance.unwrap_or(player.balance);
            outcome.patch.balance = Some(balance + amount);
        }
        CardEffect::GrantFundsToAll(amount) => {
            interpret(&CardEffect::GrantFunds(*amount), player, players, outcome);

            for other in players {
                if other.id != player.id && !other.is_bankrupt {
                    outcome.grants.push((other.id, *amount));
                }
            }
        }
        CardEffect::AdjustEfficiency(delta) => {
            let efficiency = outcome.patch.efficiency.unwrap_or(player.efficiency);
            outcome.patch.efficiency = Some(clamp_efficiency(efficiency, *delta));
        }
        CardEffect::GrantFlag(PlayerFlag::AntiCrisis) => outcome.patch.has_anti_crisis = Some(true),
        CardEffect::GrantFlag(PlayerFlag::Synergy) => outcome.patch.has_synergy = Some(true),
        CardEffect::Announce(message) => outcome.log.push((*message).to_owned()),
        CardEffect::Sequence(effects) => {
            for effect in effects {
                interpret(effect, player, players, outcome);
            }
        }
        CardEffect::Conditional {
            predicate,
            on_true,
            on_false,
        } => {
            let branch = if predicate.holds_for(player) { on_true } else { on_false };
            interpret(branch, player, players, outcome);
        }
    }
}

/// Shift an efficiency score by `delta`, keeping it within 0..=MAX_EFFICIENCY.
pub fn clamp_efficiency(current: u8, delta: i8) -> u8 {
    let shifted = i16::from(current) + i16::from(delta);
    shifted.clamp(0, i16::from(MAX_EFFICIENCY)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn players() -> Vec<Player> {
        (0..3)
            .map(|id| Player::new(id, format!("P{}", id), 1_000, 2))
            .collect()
    }

    #[test]
    fn conditional_card_takes_the_false_branch_without_assets() {
        let players = players();
        let card = find_card(1).unwrap();
        let outcome = resolve(card, &players[0], &players);

        assert_eq!(outcome.patch.balance, Some(400));
        assert_eq!(outcome.patch.efficiency, None);
        assert_eq!(outcome.log, vec!["Missed the launch. -600".to_owned()]);
    }

    #[test]
    fn conditional_card_takes_the_true_branch_with_assets() {
        let mut players = players();
        players[0].holdings.insert(11, Holding::default());

        let outcome = resolve(find_card(1).unwrap(), &players[0], &players);

        assert_eq!(outcome.patch.balance, Some(2_200));
        assert_eq!(outcome.patch.efficiency, Some(3));
    }

    #[test]
    fn efficiency_is_clamped() {
        assert_eq!(clamp_efficiency(5, 1), 5);
        assert_eq!(clamp_efficiency(0, -1), 0);
        assert_eq!(clamp_efficiency(2, -1), 1);
    }

    #[test]
    fn holiday_card_pays_every_solvent_seat() {
        let mut players = players();
        players[2].is_bankrupt = true;

        let outcome = resolve(find_card(103).unwrap(), &players[1], &players);

        assert_eq!(outcome.patch.balance, Some(1_500));
        assert_eq!(outcome.grants, vec![(0, 500)]);
    }

    #[test]
    fn anti_crisis_card_sets_the_flag() {
        let players = players();
        let outcome = resolve(find_card(105).unwrap(), &players[0], &players);

        let mut player = players[0].clone();
        outcome.patch.merge_into(&mut player);

        assert!(player.has_anti_crisis);
        assert_eq!(player.balance, 1_000);
    }

    #[test]
    fn synergy_flag_is_granted_inside_a_sequence() {
        let players = players();
        let card = Card {
            id: 900,
            deck: Deck::Brief,
            title: "Cross-channel campaign",
            text: "Synergy!",
            effect: CardEffect::Sequence(vec![
                CardEffect::GrantFlag(PlayerFlag::Synergy),
                CardEffect::GrantFunds(-100),
            ]),
        };

        let outcome = resolve(&card, &players[0], &players);

        assert_eq!(outcome.patch.has_synergy, Some(true));
        assert_eq!(outcome.patch.has_anti_crisis, None);
        assert_eq!(outcome.patch.balance, Some(900));
    }

    #[test]
    fn draw_stays_within_the_deck() {
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            assert_eq!(draw(Deck::Market, &mut rng).deck, Deck::Market);
            assert_eq!(draw(Deck::Brief, &mut rng).deck, Deck::Brief);
        }
    }
}
