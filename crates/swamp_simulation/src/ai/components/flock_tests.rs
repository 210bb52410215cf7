//! Tests for fly FSM and per-tick behavior selection.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::super::flock::*;
    use crate::controller::{ContactResponse, Controller};
    use crate::error::ConfigError;
    use crate::physics::EntityTag;
    use crate::player::HunterSnapshot;

    const DT: f32 = 1.0 / 64.0;

    const ALL_STATES: [FlyState; 4] = [FlyState::Flocking, FlyState::Alone, FlyState::Fleeing, FlyState::Dead];

    fn me() -> Entity {
        Entity::from_raw(1)
    }

    fn fly(state: FlyState) -> Fly {
        Fly::new(FlyParams::default(), Entity::from_raw(100))
            .expect("default params are valid")
            .with_state(state)
    }

    fn member(index: u32, position: Vec2, alive: bool) -> FlockMemberSnapshot {
        FlockMemberSnapshot { entity: Entity::from_raw(index), position, velocity: Vec2::ZERO, alive }
    }

    /// Один tick с заданным окружением; возвращает (desired, новая позиция)
    fn tick(
        fly: &mut Fly,
        position: Vec2,
        settings: &FlockSettings,
        others: &[FlockMemberSnapshot],
        hunter: Option<HunterSnapshot>,
        threats: &[Vec2],
    ) -> (Option<Vec2>, Vec2) {
        let mut members = vec![member(1, position, fly.state().is_alive())];
        members.extend_from_slice(others);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pos = position;
        let desired = fly.tick(
            FlyInput {
                me: me(),
                position: &mut pos,
                velocity: Vec2::ZERO,
                settings,
                members: &members,
                hunter,
                threats,
                rng: &mut rng,
            },
            DT,
        );
        (desired, pos)
    }

    #[test]
    fn test_caught_by_frog_always_kills() {
        for state in ALL_STATES {
            assert_eq!(state.transition(FlyEvent::CaughtByFrog), Some(FlyState::Dead));
        }
    }

    #[test]
    fn test_dead_only_accepts_respawn() {
        use FlyEvent::*;
        for event in [JoinedFlock, LostFlock, ScaredByFrog, ScaredByBubble, EscapedFrog] {
            assert_eq!(FlyState::Dead.transition(event), None, "{:?} must be a no-op while Dead", event);
        }
        assert_eq!(FlyState::Dead.transition(RespawnTimeElapsed), Some(FlyState::Flocking));
    }

    #[test]
    fn test_transition_table() {
        use FlyEvent::*;
        use FlyState::*;

        assert_eq!(Flocking.transition(LostFlock), Some(Alone));
        assert_eq!(Flocking.transition(ScaredByFrog), Some(Fleeing));
        assert_eq!(Flocking.transition(ScaredByBubble), Some(Fleeing));
        assert_eq!(Alone.transition(JoinedFlock), Some(Flocking));
        assert_eq!(Alone.transition(ScaredByBubble), Some(Fleeing));
        assert_eq!(Fleeing.transition(EscapedFrog), Some(Flocking));

        // Уже выполненные условия — no-op
        assert_eq!(Flocking.transition(JoinedFlock), None);
        assert_eq!(Alone.transition(LostFlock), None);
        assert_eq!(Fleeing.transition(ScaredByFrog), None);
        assert_eq!(Fleeing.transition(LostFlock), None);
        assert_eq!(Flocking.transition(RespawnTimeElapsed), None);
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let mut f = fly(FlyState::Flocking);
        for _ in 0..10 {
            assert!(f.handle_event(FlyEvent::JoinedFlock).is_none());
        }
        assert_eq!(f.state(), FlyState::Flocking);

        assert!(f.handle_event(FlyEvent::LostFlock).is_some());
        for _ in 0..10 {
            f.handle_event(FlyEvent::LostFlock);
        }
        assert_eq!(f.state(), FlyState::Alone);
    }

    #[test]
    fn test_neighbor_beyond_radius_makes_fly_alone() {
        let settings = FlockSettings { flock_radius: 10.0, ..default() };
        let mut f = fly(FlyState::Flocking);

        let (desired, _) = tick(&mut f, Vec2::ZERO, &settings, &[member(2, Vec2::new(50.0, 0.0), true)], None, &[]);

        assert_eq!(f.state(), FlyState::Alone);
        // Alone → seek к ближайшему (даже далёкому) члену стаи
        let desired = desired.expect("alone fly steers");
        assert_abs_diff_eq!(desired.x, settings.max_speed, epsilon = 1e-5);
    }

    #[test]
    fn test_neighbors_exclude_dead_and_self() {
        let members = [
            member(1, Vec2::ZERO, true),
            member(2, Vec2::new(1.0, 0.0), false),
            member(3, Vec2::new(3.0, 0.0), true),
            member(4, Vec2::new(4.0, 0.0), true),
        ];

        let neighbors = neighbors_of(me(), Vec2::ZERO, &members, 4.0);
        let ids: Vec<Entity> = neighbors.iter().map(|n| n.entity).collect();

        // Строго меньше радиуса: сосед на 4.0 не считается
        assert_eq!(ids, vec![Entity::from_raw(3)]);
    }

    #[test]
    fn test_alone_fly_rejoins_flock() {
        let settings = FlockSettings::default();
        let mut f = fly(FlyState::Alone);

        let (desired, _) = tick(&mut f, Vec2::ZERO, &settings, &[member(2, Vec2::new(1.0, 1.0), true)], None, &[]);

        assert_eq!(f.state(), FlyState::Flocking);
        let desired = desired.expect("flocking fly steers");
        assert_abs_diff_eq!(desired.length(), settings.max_speed, epsilon = 1e-4);
    }

    #[test]
    fn test_moving_frog_scares_within_moving_range() {
        let settings = FlockSettings::default();
        let params = FlyParams::default();
        let neighbor = [member(2, Vec2::new(0.5, 0.0), true)];
        let frog = HunterSnapshot {
            position: Vec2::new(0.0, params.frog_moving_flee_range - 0.5),
            velocity: Vec2::new(params.frog_alert_speed, 0.0),
        };

        let mut f = fly(FlyState::Flocking);
        let (desired, _) = tick(&mut f, Vec2::ZERO, &settings, &neighbor, Some(frog), &[]);

        assert_eq!(f.state(), FlyState::Fleeing);
        let desired = desired.expect("fleeing fly steers");
        assert!(desired.y < 0.0, "flee away from the frog, got {:?}", desired);
        assert_abs_diff_eq!(desired.length(), settings.max_speed, epsilon = 1e-4);
    }

    #[test]
    fn test_still_frog_only_scares_up_close() {
        let settings = FlockSettings::default();
        let params = FlyParams::default();
        let neighbor = [member(2, Vec2::new(0.5, 0.0), true)];

        // Стоит в пределах moving range, но дальше still range → не страшно
        let frog = HunterSnapshot { position: Vec2::new(0.0, 3.0), velocity: Vec2::ZERO };
        let mut f = fly(FlyState::Flocking);
        tick(&mut f, Vec2::ZERO, &settings, &neighbor, Some(frog), &[]);
        assert_eq!(f.state(), FlyState::Flocking);

        let frog = HunterSnapshot {
            position: Vec2::new(0.0, params.frog_still_flee_range - 0.5),
            velocity: Vec2::new(0.5, 0.0),
        };
        tick(&mut f, Vec2::ZERO, &settings, &neighbor, Some(frog), &[]);
        assert_eq!(f.state(), FlyState::Fleeing);
    }

    #[test]
    fn test_escape_requires_no_nearby_bubbles() {
        let settings = FlockSettings::default();
        let neighbor = [member(2, Vec2::new(0.5, 0.0), true)];
        let far_frog = HunterSnapshot { position: Vec2::new(20.0, 0.0), velocity: Vec2::ZERO };

        // Пузырь дальше bubble range, но ближе stop-fleeing range
        let bubble = [Vec2::new(0.0, 5.0)];
        let mut f = fly(FlyState::Fleeing);
        tick(&mut f, Vec2::ZERO, &settings, &neighbor, Some(far_frog), &bubble);
        assert_eq!(f.state(), FlyState::Fleeing);

        tick(&mut f, Vec2::ZERO, &settings, &neighbor, Some(far_frog), &[]);
        assert_eq!(f.state(), FlyState::Flocking);
    }

    #[test]
    fn test_bubble_in_range_scares() {
        let settings = FlockSettings::default();
        let neighbor = [member(2, Vec2::new(0.5, 0.0), true)];

        let mut f = fly(FlyState::Flocking);
        tick(&mut f, Vec2::ZERO, &settings, &neighbor, None, &[Vec2::new(2.0, 0.0)]);

        assert_eq!(f.state(), FlyState::Fleeing);
    }

    #[test]
    fn test_missing_hunter_escape_checks_bubbles_only() {
        let settings = FlockSettings::default();
        let mut f = fly(FlyState::Fleeing);

        // Пузырь рядом: убегаем от него (лягушки нет)
        let (desired, _) = tick(&mut f, Vec2::ZERO, &settings, &[], None, &[Vec2::new(1.0, 0.0)]);
        assert_eq!(f.state(), FlyState::Fleeing);
        assert!(desired.expect("flee bubble").x < 0.0);

        let (_, _) = tick(&mut f, Vec2::ZERO, &settings, &[], None, &[]);
        assert_eq!(f.state(), FlyState::Flocking);
    }

    #[test]
    fn test_flocking_without_neighbors_uses_anchor_only() {
        let settings = FlockSettings::default();
        let mut f = fly(FlyState::Fleeing);

        // Fleeing игнорирует LostFlock, потом EscapedFrog → Flocking без соседей
        let (desired, _) = tick(&mut f, Vec2::new(20.0, 0.0), &settings, &[], None, &[]);

        assert_eq!(f.state(), FlyState::Flocking);
        let desired = desired.expect("flocking fly steers");
        assert!(!desired.is_nan());
        assert_abs_diff_eq!(desired.x, -settings.max_speed, epsilon = 1e-5);
        assert_abs_diff_eq!(desired.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_dead_fly_respawns_after_timer() {
        let settings = FlockSettings::default();
        let params = FlyParams { respawn_time: 0.05, ..default() };
        let mut f = Fly::new(params, Entity::from_raw(100)).expect("valid").with_state(FlyState::Dead);
        let neighbor = [member(2, Vec2::new(0.5, 0.0), true)];

        // 3 тика × DT < 0.05
        for _ in 0..3 {
            let (desired, pos) = tick(&mut f, Vec2::ZERO, &settings, &neighbor, None, &[]);
            assert_eq!(f.state(), FlyState::Dead);
            assert!(desired.is_none());
            assert_eq!(pos, Vec2::ZERO);
        }
        assert_abs_diff_eq!(f.time_dead(), 3.0 * DT, epsilon = 1e-6);

        // 4-й тик → time_dead > respawn_time
        let (_, pos) = tick(&mut f, Vec2::ZERO, &settings, &neighbor, None, &[]);
        assert_ne!(f.state(), FlyState::Dead);
        assert_eq!(f.time_dead(), 0.0);
        assert_abs_diff_eq!(pos.length(), params.respawn_distance, epsilon = 1e-3);
    }

    #[test]
    fn test_respawn_position_on_circle() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            let p = respawn_position(20.0, &mut rng);
            assert_abs_diff_eq!(p.length(), 20.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_trigger_with_hunter_counts_only_live_fly() {
        let mut f = fly(FlyState::Alone);

        let first = f.on_trigger(EntityTag::Hunter);
        assert_eq!(first, ContactResponse { prey_caught: 1, ..ContactResponse::NONE });
        assert_eq!(f.state(), FlyState::Dead);

        let second = f.on_trigger(EntityTag::Hunter);
        assert_eq!(second, ContactResponse::NONE);
        assert_eq!(f.state(), FlyState::Dead);

        // Пузырь мух не ловит
        let mut g = fly(FlyState::Flocking);
        assert_eq!(g.on_trigger(EntityTag::Threat), ContactResponse::NONE);
        assert_eq!(g.state(), FlyState::Flocking);
    }

    #[test]
    fn test_appearance_by_state() {
        let mut appearance = FlyAppearance::default();

        appearance.update(FlyState::Alone, Vec2::new(1.0, 0.0));
        assert!(appearance.visible);
        assert_eq!(appearance.color, Color::srgb(0.6, 0.6, 1.0));
        assert!(appearance.flip_x);

        appearance.update(FlyState::Fleeing, Vec2::new(-1.0, 0.0));
        assert_eq!(appearance.color, Color::srgb(1.0, 1.0, 0.0));
        assert!(!appearance.flip_x);

        // Dead: скрыт, цвет не меняется
        appearance.update(FlyState::Dead, Vec2::ZERO);
        assert!(!appearance.visible);
        assert_eq!(appearance.color, Color::srgb(1.0, 1.0, 0.0));

        appearance.update(FlyState::Flocking, Vec2::ZERO);
        assert!(appearance.visible);
        assert_eq!(appearance.color, Color::srgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_settings_validation() {
        assert!(FlockSettings::default().validate().is_ok());
        assert!(Flock::new(FlockSettings::default()).is_ok());

        let bad = FlockSettings { accel_time: 0.0, ..default() };
        assert!(matches!(bad.validate(), Err(ConfigError::NonPositive { name: "flock.accel_time", .. })));

        let inverted = FlockSettings { init_speed_min: 3.0, init_speed_max: 1.0, ..default() };
        assert!(matches!(Flock::new(inverted), Err(ConfigError::InvertedRange { .. })));

        let negative = FlyParams { respawn_time: -1.0, ..default() };
        assert!(Fly::new(negative, Entity::from_raw(0)).is_err());
    }
}
