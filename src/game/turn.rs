//! The turn engine. Every intent a seat can issue is a method on `GameState`.
//!
//! Intents validate first and mutate second, so a rejected intent leaves the
//! state as it was apart from one log entry. Turns that end on their own
//! (entering the crisis zone, a failed crisis roll, an elimination) move on
//! to the next seat inside the same intent.

use std::time::Instant;

use rand::Rng;

use super::cards;
use super::economy;
use super::error::GameError;
use super::globals::*;
use super::state::{GameState, Phase};

impl GameState {
    /*********        SETUP        *********/

    /// Create the players and start the first turn. `names` beyond
    /// `player_count` are ignored, and missing names get a default.
    pub fn configure_and_start<S: AsRef<str>>(
        &mut self,
        player_count: usize,
        names: &[S],
    ) -> Result<(), GameError> {
        self.check_configure(player_count)
            .map_err(|err| self.rejected(err))?;

        self.players = (0..player_count)
            .map(|id| {
                let name = names
                    .get(id)
                    .map(|name| name.as_ref().to_owned())
                    .unwrap_or_else(|| format!("Player {}", id + 1));
                Player::new(id, name, STARTING_BALANCE, STARTING_EFFICIENCY)
            })
            .collect();
        self.current_player_index = 0;
        self.turn = 1;
        self.phase = Phase::TurnStart;
        self.started_at = Instant::now();

        tracing::info!(
            target: "media_monopoly::turn",
            players = player_count,
            time_limit_minutes = self.settings.time_limit_minutes,
            uniform_build = self.settings.uniform_build,
            "turn.game_started"
        );
        self.push_log(format!("Game started with {} players", player_count));

        Ok(())
    }

    fn check_configure(&self, player_count: usize) -> Result<(), GameError> {
        self.expect_phase("configure", &[Phase::Setup])?;

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount(player_count));
        }

        Ok(())
    }

    /*********        ROLLING        *********/

    /// Roll both dice and play out the result.
    pub fn roll<R: Rng>(&mut self, rng: &mut R) -> Result<DiceRoll, GameError> {
        self.expect_phase("roll", &[Phase::TurnStart])
            .map_err(|err| self.rejected(err))?;

        let dice = DiceRoll::new(rng.gen_range(1..=6), rng.gen_range(1..=6));
        self.roll_dice(dice, rng)?;

        Ok(dice)
    }

    /// Play out a specific roll of the dice. `rng` is only used to draw cards.
    pub fn roll_dice<R: Rng>(&mut self, dice: DiceRoll, rng: &mut R) -> Result<(), GameError> {
        self.check_roll(dice).map_err(|err| self.rejected(err))?;

        self.dice = dice;

        tracing::info!(
            target: "media_monopoly::turn",
            turn = self.turn,
            player = self.current_player_index,
            first = dice.first,
            second = dice.second,
            jailed = self.current_player().is_jailed,
            "turn.rolled"
        );

        if self.current_player().is_jailed {
            self.roll_in_crisis(dice, rng);
        } else {
            self.advance(dice.sum(), rng);
        }

        self.after_intent();
        Ok(())
    }

    fn check_roll(&self, dice: DiceRoll) -> Result<(), GameError> {
        self.expect_phase("roll", &[Phase::TurnStart])?;

        if !dice.is_valid() {
            return Err(GameError::InvalidDice {
                first: dice.first,
                second: dice.second,
            });
        }

        Ok(())
    }

    /// Try to roll out of the crisis zone.
    fn roll_in_crisis<R: Rng>(&mut self, dice: DiceRoll, rng: &mut R) {
        let name = self.current_player().name.clone();

        if dice.is_double() {
            self.push_log(format!("{} rolled a double and leaves the crisis zone!", name));
            self.release_current();
            self.advance(dice.sum(), rng);
        } else if self.current_player().jail_attempts >= CRISIS_FREE_ATTEMPTS {
            self.push_log(format!(
                "{} pays {} to leave the crisis zone.",
                name, CRISIS_RELEASE_FEE
            ));

            if self.charge_current(CRISIS_RELEASE_FEE, "Couldn't afford to leave the crisis zone") {
                self.release_current();
                self.advance(dice.sum(), rng);
            } else {
                self.setup_next_player();
            }
        } else {
            let player = self.current_player_mut();
            player.jail_attempts += 1;
            let attempt = player.jail_attempts;

            self.push_log(format!(
                "{} stays in the crisis zone (attempt {}).",
                name, attempt
            ));
            self.setup_next_player();
        }
    }

    fn release_current(&mut self) {
        let player = self.current_player_mut();
        player.is_jailed = false;
        player.jail_attempts = 0;
    }

    /// Move the current player and resolve the cell they land on.
    fn advance<R: Rng>(&mut self, steps: u8, rng: &mut R) {
        self.move_by(steps);
        self.resolve_cell(rng);
    }

    /*********        CELL RESOLUTION        *********/

    fn resolve_cell<R: Rng>(&mut self, rng: &mut R) {
        let cell = self.current_cell();
        let name = self.current_player().name.clone();

        self.phase = Phase::Action;

        match &cell.kind {
            CellKind::Start | CellKind::Crisis | CellKind::Bonus => {}
            CellKind::SendToCrisis => {
                self.push_log(format!("{} is sent to the crisis zone!", name));
                self.send_current_to_jail();
                self.setup_next_player();
            }
            CellKind::Tax { amount } => {
                self.push_log(format!("{} pays {} ({}).", name, amount, cell.name));

                let reason = format!("Couldn't pay {} of {}", amount, cell.name);
                if !self.charge_current(*amount, &reason) {
                    self.setup_next_player();
                }
            }
            CellKind::Brief => self.present_card(cards::draw(Deck::Brief, rng)),
            CellKind::Market => self.present_card(cards::draw(Deck::Market, rng)),
            CellKind::Channel(data) => self.visit_channel(cell, data),
        }
    }

    fn present_card(&mut self, card: &'static Card) {
        self.pending_card = Some(card.id);

        tracing::debug!(
            target: "media_monopoly::cards",
            player = self.current_player_index,
            card = card.id,
            "cards.drawn"
        );

        let name = self.current_player().name.clone();
        self.push_log(format!("{} drew \"{}\": {}", name, card.title, card.text));
    }

    fn visit_channel(&mut self, cell: &'static Cell, data: &ChannelData) {
        let owner_index = match self.owner_of(cell.position) {
            Some(i) => i,
            // Free channel, the player may buy it
            None => return,
        };

        if owner_index == self.current_player_index {
            return;
        }

        let owner = &self.players[owner_index];
        let owner_name = owner.name.clone();
        let visitor_name = self.current_player().name.clone();

        if owner.is_jailed || owner.is_mortgaged(cell.position) {
            self.push_log(format!(
                "{} pays no rent on {}: {} can't collect right now.",
                visitor_name, cell.name, owner_name
            ));
            return;
        }

        let rent = economy::rent(data, owner.level(cell.position));
        self.push_log(format!(
            "{} landed on {}'s {}. Pays {}.",
            visitor_name, owner_name, cell.name, rent
        ));

        if self.current_player().can_afford(rent) {
            self.current_player_mut().balance -= rent;
            self.players[owner_index].balance += rent;

            tracing::info!(
                target: "media_monopoly::economy",
                payer = self.current_player_index,
                owner = owner_index,
                cell = cell.position,
                rent,
                "economy.rent_paid"
            );
        } else {
            // The owner only recovers whatever the visitor has left
            let remaining = self.current_player().balance.max(0);
            self.players[owner_index].balance += remaining;

            let reason = format!("Couldn't pay {} rent to {}", rent, owner_name);
            self.eliminate(self.current_player_index, &reason);
            self.setup_next_player();
        }
    }

    /// Apply the card the current player drew.
    pub fn apply_card(&mut self) -> Result<(), GameError> {
        let card = self.check_apply_card().map_err(|err| self.rejected(err))?;
        let outcome = cards::resolve(card, self.current_player(), &self.players);

        self.pending_card = None;
        for line in &outcome.log {
            self.push_log(line.clone());
        }

        // A card can't leave a negative balance behind, it eliminates instead
        if outcome.patch.balance.map_or(false, |balance| balance < 0) {
            let reason = format!("Bankrupted by \"{}\"", card.title);
            self.eliminate(self.current_player_index, &reason);
            self.setup_next_player();
        } else {
            outcome.patch.merge_into(self.current_player_mut());

            for (id, amount) in outcome.grants {
                self.players[id].balance += amount;

                if self.players[id].balance < 0 {
                    let reason = format!("Bankrupted by \"{}\"", card.title);
                    self.eliminate(id, &reason);
                }
            }
        }

        tracing::info!(
            target: "media_monopoly::cards",
            player = self.current_player_index,
            card = card.id,
            "cards.applied"
        );

        self.after_intent();
        Ok(())
    }

    fn check_apply_card(&self) -> Result<&'static Card, GameError> {
        self.expect_phase("apply card", &[Phase::Action])?;
        self.pending_card().ok_or(GameError::NoPendingCard)
    }

    /*********        CHANNEL MANAGEMENT        *********/

    /// Buy the free channel the current player is standing on.
    pub fn buy(&mut self, position: u8) -> Result<(), GameError> {
        let price = self.check_buy(position).map_err(|err| self.rejected(err))?;

        let player = self.current_player_mut();
        player.balance -= price;
        player.holdings.insert(position, Holding::default());
        let name = player.name.clone();

        tracing::info!(
            target: "media_monopoly::economy",
            player = self.current_player_index,
            cell = position,
            price,
            "economy.purchased"
        );
        self.push_log(format!(
            "{} bought {} for {}.",
            name,
            cell_at(position).name,
            price
        ));

        self.after_intent();
        Ok(())
    }

    fn check_buy(&self, position: u8) -> Result<i64, GameError> {
        self.expect_phase("buy", &[Phase::Action])?;

        let player = self.current_player();
        if position != player.position || self.owner_of(position).is_some() {
            return Err(GameError::InvalidTarget(position));
        }

        let data = cell_at(position)
            .channel()
            .ok_or(GameError::InvalidTarget(position))?;
        check_funds(player, data.price)?;

        Ok(data.price)
    }

    /// Raise one of the current player's channels by one level.
    pub fn upgrade(&mut self, position: u8) -> Result<(), GameError> {
        let cost = self.check_upgrade(position).map_err(|err| self.rejected(err))?;

        let player = self.current_player_mut();
        player.balance -= cost;
        let level = player.holdings.get_mut(&position).map_or(0, |holding| {
            holding.raise_level(MAX_LEVEL);
            holding.level
        });
        let name = player.name.clone();

        tracing::info!(
            target: "media_monopoly::economy",
            player = self.current_player_index,
            cell = position,
            level,
            cost,
            "economy.upgraded"
        );
        self.push_log(format!(
            "{} upgraded {} to level {}.",
            name,
            cell_at(position).name,
            level
        ));

        self.after_intent();
        Ok(())
    }

    fn check_upgrade(&self, position: u8) -> Result<i64, GameError> {
        self.expect_phase("upgrade", &[Phase::TurnStart, Phase::Action])?;

        let player = self.current_player();
        let data = cell_at(position)
            .channel()
            .ok_or(GameError::InvalidTarget(position))?;

        if !player.owns(position) {
            return Err(GameError::InvalidTarget(position));
        }
        if player.level(position) >= MAX_LEVEL {
            return Err(GameError::MaxLevel(position));
        }
        if self.settings.uniform_build && !economy::has_monopoly(player, data.group) {
            return Err(GameError::MonopolyRequired(data.group));
        }
        check_funds(player, data.upgrade_cost)?;

        Ok(data.upgrade_cost)
    }

    /// Sell one of the current player's channels back to the free pool for
    /// half its price. Built levels are lost.
    pub fn sell(&mut self, position: u8) -> Result<(), GameError> {
        let refund = self.check_sell(position).map_err(|err| self.rejected(err))?;

        let player = self.current_player_mut();
        player.balance += refund;
        player.holdings.remove(&position);
        let name = player.name.clone();

        tracing::info!(
            target: "media_monopoly::economy",
            player = self.current_player_index,
            cell = position,
            refund,
            "economy.sold"
        );
        self.push_log(format!(
            "{} sold {} for {}.",
            name,
            cell_at(position).name,
            refund
        ));

        self.after_intent();
        Ok(())
    }

    fn check_sell(&self, position: u8) -> Result<i64, GameError> {
        self.expect_phase("sell", &[Phase::TurnStart, Phase::Action])?;

        let data = cell_at(position)
            .channel()
            .ok_or(GameError::InvalidTarget(position))?;

        if !self.current_player().owns(position) {
            return Err(GameError::InvalidTarget(position));
        }

        Ok(economy::sale_value(data))
    }

    /*********        ENDING TURNS        *********/

    /// Finish the current player's turn and start the next one.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.check_end_turn().map_err(|err| self.rejected(err))?;

        self.setup_next_player();
        self.after_intent();
        Ok(())
    }

    fn check_end_turn(&self) -> Result<(), GameError> {
        self.expect_phase("end turn", &[Phase::Action])?;

        if self.pending_card.is_some() {
            return Err(GameError::CardPending);
        }

        Ok(())
    }

    /// Spend an anti-crisis card to leave the crisis zone before rolling.
    pub fn use_anti_crisis(&mut self) -> Result<(), GameError> {
        self.check_use_anti_crisis()
            .map_err(|err| self.rejected(err))?;

        let player = self.current_player_mut();
        player.has_anti_crisis = false;
        player.is_jailed = false;
        player.jail_attempts = 0;
        let name = player.name.clone();

        self.push_log(format!("{} used an Anti-crisis card.", name));

        self.after_intent();
        Ok(())
    }

    fn check_use_anti_crisis(&self) -> Result<(), GameError> {
        self.expect_phase("use anti-crisis", &[Phase::TurnStart])?;

        let player = self.current_player();
        if !player.is_jailed {
            return Err(GameError::NotJailed);
        }
        if !player.has_anti_crisis {
            return Err(GameError::NoAntiCrisis);
        }

        Ok(())
    }

    /// Eliminate the current player at their own request.
    pub fn concede(&mut self) -> Result<(), GameError> {
        self.expect_phase("concede", &[Phase::TurnStart, Phase::Action])
            .map_err(|err| self.rejected(err))?;

        self.eliminate(self.current_player_index, "Conceded");
        self.setup_next_player();
        self.after_intent();
        Ok(())
    }

    /*********        HELPERS        *********/

    fn expect_phase(&self, intent: &'static str, allowed: &[Phase]) -> Result<(), GameError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                intent,
                phase: self.phase,
            })
        }
    }

    /// Record a rejected intent and hand the error back.
    fn rejected(&mut self, err: GameError) -> GameError {
        tracing::warn!(
            target: "media_monopoly::turn",
            turn = self.turn,
            error = %err,
            "turn.intent_rejected"
        );
        self.push_log(format!("Rejected: {}", err));
        err
    }

    /// Run the win evaluator after a successful intent.
    fn after_intent(&mut self) {
        self.evaluate_victory(Instant::now());
    }
}

fn check_funds(player: &Player, required: i64) -> Result<(), GameError> {
    if player.can_afford(required) {
        Ok(())
    } else {
        Err(GameError::InsufficientFunds {
            required,
            available: player.balance,
        })
    }
}
