//! Rent, monopoly detection and net worth. Everything here is a pure
//! function of the board catalog and player data.

use super::globals::*;

/// The rent charged for a channel at `level`.
///
/// Levels 0 to 4 index into the channel's multiplier table. Any
/// other level uses a multiplier of 1.
pub fn rent(data: &ChannelData, level: u8) -> i64 {
    let multiplier = data
        .rent_multipliers
        .get(usize::from(level))
        .copied()
        .unwrap_or(1);

    data.base_rent * multiplier
}

/// Whether `player` owns every channel in `group`.
pub fn has_monopoly(player: &Player, group: ChannelGroup) -> bool {
    CELLS_BY_GROUP
        .get(&group)
        .map_or(false, |cells| cells.iter().all(|&position| player.owns(position)))
}

/// The amount a player receives for passing 'Start'.
pub fn start_bonus(efficiency: u8) -> i64 {
    START_BONUS + i64::from(efficiency) * START_BONUS_PER_EFFICIENCY
}

/// The amount a player receives for selling a channel: half its price,
/// regardless of its upgrade level.
pub fn sale_value(data: &ChannelData) -> i64 {
    data.price / 2
}

/// The score used to decide the winner when the time limit runs out: balance,
/// the catalog price of every owned channel, the upgrade cost of every built
/// level, and a bonus per point of efficiency.
pub fn net_worth(player: &Player) -> i64 {
    let mut asset_value = 0;
    let mut build_value = 0;

    for (&position, holding) in &player.holdings {
        if let Some(data) = cell_at(position).channel() {
            asset_value += data.price;
            build_value += i64::from(holding.level) * data.upgrade_cost;
        }
    }

    player.balance
        + asset_value
        + build_value
        + i64::from(player.efficiency) * EFFICIENCY_SCORE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_owning(cells: &[(u8, u8)]) -> Player {
        let mut player = Player::new(0, "Alpha", 1_000, 2);

        for &(position, level) in cells {
            player.holdings.insert(
                position,
                Holding {
                    level,
                    mortgaged: false,
                },
            );
        }

        player
    }

    #[test]
    fn rent_follows_multiplier_table() {
        let data = cell_at(3).channel().cloned().unwrap();

        assert_eq!(rent(&data, 0), 40);
        assert_eq!(rent(&data, 1), 80);
        assert_eq!(rent(&data, 4), 240);
    }

    #[test]
    fn rent_falls_back_to_base_past_the_table() {
        let data = cell_at(39).channel().cloned().unwrap();

        assert_eq!(rent(&data, 5), 500);
        assert_eq!(rent(&data, 200), 500);
    }

    #[test]
    fn every_group_can_be_monopolised() {
        for (&group, cells) in CELLS_BY_GROUP.iter() {
            let owned: Vec<(u8, u8)> = cells.iter().map(|&position| (position, 0)).collect();
            assert!(has_monopoly(&player_owning(&owned), group));
            assert!(!has_monopoly(&player_owning(&owned[1..]), group));
        }
    }

    #[test]
    fn monopoly_needs_every_channel_of_the_group() {
        let partial = player_owning(&[(1, 0), (3, 0)]);
        assert!(!has_monopoly(&partial, ChannelGroup::Search));

        let full = player_owning(&[(1, 0), (3, 0), (5, 0), (6, 0)]);
        assert!(has_monopoly(&full, ChannelGroup::Search));
        assert!(!has_monopoly(&full, ChannelGroup::Social));
    }

    #[test]
    fn start_bonus_scales_with_efficiency() {
        assert_eq!(start_bonus(0), 2_000);
        assert_eq!(start_bonus(2), 2_400);
        assert_eq!(start_bonus(5), 3_000);
    }

    #[test]
    fn net_worth_counts_assets_levels_and_efficiency() {
        // 1_000 balance + 600 + 1_000 price + 2 * 500 levels + 2 * 500 efficiency
        let player = player_owning(&[(1, 0), (5, 2)]);
        assert_eq!(net_worth(&player), 1_000 + 1_600 + 1_000 + 1_000);
    }
}
