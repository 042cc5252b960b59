use super::{fraction_of_max, ListenerContext, Trigger, TriggerKind, TriggerListener};
use crate::battle::action_stack::{BattleAction, DamageSource};
use crate::battle::state::BattleEvent;
use crate::battle::stats::current_types;
use crate::creature::StatusCondition;
use crate::side::SlotRef;
use schema::{Ability, CreatureType, StatType, Weather};

fn announce(ability: Ability, owner: SlotRef, ctx: &ListenerContext) -> BattleAction {
    BattleAction::Message(BattleEvent::AbilityActivated {
        slot: owner,
        name: ctx.state.name_at(owner),
        ability,
    })
}

fn boost(owner: SlotRef, stat: StatType, delta: i8) -> BattleAction {
    BattleAction::StatStage {
        target: owner,
        stat,
        delta,
        source: Some(owner),
    }
}

fn forecast_type(weather: Weather) -> CreatureType {
    match weather {
        Weather::Sun => CreatureType::Fire,
        Weather::Rain => CreatureType::Water,
        Weather::Hail => CreatureType::Ice,
        Weather::Sandstorm | Weather::None => CreatureType::Normal,
    }
}

fn forecast(owner: SlotRef, ctx: &ListenerContext) -> Vec<BattleAction> {
    let form = vec![forecast_type(ctx.state.weather.kind)];
    if current_types(ctx.state, owner) == form {
        return Vec::new();
    }
    vec![
        announce(Ability::Forecast, owner, ctx),
        BattleAction::ChangeType {
            target: owner,
            types: form,
        },
    ]
}

fn heal_if_hurt(owner: SlotRef, divisor: u16, ctx: &ListenerContext) -> Vec<BattleAction> {
    match ctx.state.active_battler(owner) {
        Some(creature) if !creature.is_at_full_hp() => vec![BattleAction::Heal {
            target: owner,
            amount: fraction_of_max(ctx.state, owner, divisor),
        }],
        _ => Vec::new(),
    }
}

impl TriggerListener for Ability {
    type Owner = SlotRef;

    fn listens_to(&self, kind: TriggerKind) -> bool {
        use TriggerKind::*;
        match self {
            Ability::Intimidate
            | Ability::Drizzle
            | Ability::Drought
            | Ability::SandStream
            | Ability::SnowWarning
            | Ability::ElectricSurge
            | Ability::GrassySurge => kind == OnSwitchIn,
            Ability::Forecast => matches!(kind, OnSwitchIn | OnWeatherChange),
            Ability::Protean => kind == OnBeforeMove,
            Ability::Static | Ability::RoughSkin => kind == OnContactReceived,
            Ability::Stamina => kind == OnDamageTaken,
            Ability::Sturdy => kind == OnWouldFaint,
            Ability::SpeedBoost | Ability::RainDish | Ability::IceBody => kind == OnTurnEnd,
            Ability::Berserk => kind == OnLowHp,
            Ability::Moxie => kind == OnFaint,
            // Passive modifiers read directly by speed, damage and immunity checks
            Ability::SwiftSwim
            | Ability::Chlorophyll
            | Ability::SandRush
            | Ability::Levitate
            | Ability::Blaze
            | Ability::Torrent
            | Ability::Overgrow => false,
        }
    }

    fn react(&self, owner: SlotRef, trigger: &Trigger, ctx: &ListenerContext) -> Vec<BattleAction> {
        let state = ctx.state;
        match (self, trigger) {
            // --- Switch-in ---
            (Ability::Intimidate, Trigger::SwitchIn { slot }) if *slot == owner => {
                let mut actions = vec![announce(*self, owner, ctx)];
                actions.extend(state.opponents_of(owner).into_iter().map(|foe| {
                    BattleAction::StatStage {
                        target: foe,
                        stat: StatType::Attack,
                        delta: -1,
                        source: Some(owner),
                    }
                }));
                actions
            }
            (ability, Trigger::SwitchIn { slot }) if *slot == owner => {
                if let Some(weather) = ability.summoned_weather() {
                    if state.weather.is(weather) {
                        return Vec::new();
                    }
                    return vec![
                        announce(*ability, owner, ctx),
                        BattleAction::SetWeather {
                            weather,
                            turns: state.rules.weather_turns,
                            source: Some(owner),
                        },
                    ];
                }
                if let Some(terrain) = ability.summoned_terrain() {
                    if state.terrain.is(terrain) {
                        return Vec::new();
                    }
                    return vec![
                        announce(*ability, owner, ctx),
                        BattleAction::SetTerrain {
                            terrain,
                            turns: state.rules.terrain_turns,
                            source: Some(owner),
                        },
                    ];
                }
                if *ability == Ability::Forecast {
                    return forecast(owner, ctx);
                }
                Vec::new()
            }
            (Ability::Forecast, Trigger::WeatherChange { .. }) => forecast(owner, ctx),

            // --- Before move ---
            (Ability::Protean, Trigger::BeforeMove { slot, move_used }) if *slot == owner => {
                let Ok(data) = ctx.catalog.move_data(*move_used) else {
                    return Vec::new();
                };
                let new_types = vec![data.move_type];
                if data.move_type == CreatureType::Typeless || current_types(state, owner) == new_types {
                    return Vec::new();
                }
                vec![
                    announce(*self, owner, ctx),
                    BattleAction::ChangeType {
                        target: owner,
                        types: new_types,
                    },
                ]
            }

            // --- Contact ---
            (Ability::Static, Trigger::ContactReceived { attacker, defender }) if *defender == owner => {
                if state.active_battler(*attacker).is_none() {
                    return Vec::new();
                }
                vec![BattleAction::Chance {
                    percent: 30,
                    reason: "static",
                    actions: vec![
                        announce(*self, owner, ctx),
                        BattleAction::ApplyStatus {
                            target: *attacker,
                            status: StatusCondition::Paralysis,
                            source: Some(owner),
                        },
                    ],
                }]
            }
            (Ability::RoughSkin, Trigger::ContactReceived { attacker, defender }) if *defender == owner => {
                if state.active_battler(*attacker).is_none() {
                    return Vec::new();
                }
                vec![
                    announce(*self, owner, ctx),
                    BattleAction::Damage {
                        target: *attacker,
                        amount: fraction_of_max(state, *attacker, 8),
                        source: DamageSource::Ability(*self),
                    },
                ]
            }

            // --- Damage taken ---
            (Ability::Stamina, Trigger::DamageTaken { target, source, .. })
                if *target == owner && source.is_move() =>
            {
                vec![announce(*self, owner, ctx), boost(owner, StatType::Defense, 1)]
            }

            // --- Would faint ---
            (Ability::Sturdy, Trigger::WouldFaint { target, source, .. }) if *target == owner => {
                match state.active_battler(owner) {
                    Some(creature) if creature.is_at_full_hp() && source.is_move() => vec![
                        announce(*self, owner, ctx),
                        BattleAction::Damage {
                            target: owner,
                            amount: creature.current_hp() - 1,
                            source: source.clone(),
                        },
                        BattleAction::Message(BattleEvent::Endured {
                            target: owner,
                            name: creature.name.clone(),
                        }),
                    ],
                    _ => Vec::new(),
                }
            }

            // --- Turn end ---
            (Ability::SpeedBoost, Trigger::TurnEnd) => {
                vec![announce(*self, owner, ctx), boost(owner, StatType::Speed, 1)]
            }
            (Ability::RainDish, Trigger::TurnEnd) if state.weather.is(Weather::Rain) => {
                heal_if_hurt(owner, 16, ctx)
            }
            (Ability::IceBody, Trigger::TurnEnd) if state.weather.is(Weather::Hail) => {
                heal_if_hurt(owner, 16, ctx)
            }

            // --- Low HP ---
            (Ability::Berserk, Trigger::LowHp { target, previous_hp }) if *target == owner => {
                match state.active_battler(owner) {
                    Some(creature) if *previous_hp as u32 * 2 > creature.max_hp() as u32 => {
                        vec![announce(*self, owner, ctx), boost(owner, StatType::SpecialAttack, 1)]
                    }
                    _ => Vec::new(),
                }
            }

            // --- Faint ---
            (Ability::Moxie, Trigger::Faint { target, by: Some(by) })
                if *by == owner && *target != owner =>
            {
                vec![announce(*self, owner, ctx), boost(owner, StatType::Attack, 1)]
            }

            _ => Vec::new(),
        }
    }
}
