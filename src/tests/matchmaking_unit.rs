use std::collections::HashSet;
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;
use super::super::error::Rejection;
use super::super::game::{Fixture, FixtureProvider, Game, LeagueTeam};
use super::super::matchmaking::{Dropout, MatchmakingEngine};
use super::super::member::MemberId;
use super::super::session::{ChallengeSession, SessionState};

struct FixedFixture;

impl FixtureProvider for FixedFixture {
    fn random_fixture(&self, _rng: &mut dyn RngCore) -> Fixture {
        Fixture {
            home: LeagueTeam { league: "Serie A".to_string(), team: "Napoli".to_string() },
            away: LeagueTeam { league: "La Liga".to_string(), team: "Sevilla".to_string() },
        }
    }
}

fn ids(names: &[&str]) -> Vec<MemberId> {
    names.iter().map(|n| MemberId::new(n)).collect()
}

fn engine(capacity: usize) -> MatchmakingEngine {
    MatchmakingEngine::new(capacity, MemberId::new("kartbot")).unwrap()
}

fn channel() -> Vec<MemberId> {
    ids(&["mario", "luigi", "peach", "toad", "yoshi", "wario", "kartbot"])
}

fn explicit_session(engine: &MatchmakingEngine, actor: &str, targets: &[&str]) -> ChallengeSession {
    let mut rng = StdRng::seed_from_u64(0);
    engine
        .challenge(Some(&channel()), &MemberId::new(actor), Game::Kart, &ids(targets), &FixedFixture, &mut rng)
        .unwrap()
        .value
}

#[test]
fn test_random_challenge_size_and_shape() {
    let members = channel();
    for capacity in 2..=9 {
        let engine = engine(capacity);
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = engine
                .challenge(Some(&members), &MemberId::new("mario"), Game::Smash, &[], &FixedFixture, &mut rng)
                .unwrap()
                .value;

            // Everyone but the actor and the bot is eligible.
            let pool = members.len() - 2;
            assert_eq!(session.len(), pool.min(capacity - 1) + 1);
            assert_eq!(session.participants().last(), Some(&MemberId::new("mario")));
            assert!(!session.contains(&MemberId::new("kartbot")));

            let unique: HashSet<_> = session.participants().iter().collect();
            assert_eq!(unique.len(), session.len());
            assert!(session.len() <= capacity);
        }
    }
}

#[test]
fn test_random_challenge_varies_with_seed() {
    let engine = engine(3);
    let members = channel();
    let picks: HashSet<Vec<MemberId>> = (0..40)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            engine
                .challenge(Some(&members), &MemberId::new("mario"), Game::Kart, &[], &FixedFixture, &mut rng)
                .unwrap()
                .value
                .participants()
                .to_vec()
        })
        .collect();
    assert!(picks.len() > 1);
}

#[test]
fn test_explicit_challenge_keeps_target_order() {
    let engine = engine(4);
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = engine
        .challenge(
            Some(&channel()),
            &MemberId::new("mario"),
            Game::Kart,
            &ids(&["Peach", "luigi", "peach", "mario"]),
            &FixedFixture,
            &mut rng,
        )
        .unwrap();

    assert_eq!(outcome.value.participants(), ids(&["peach", "luigi", "mario"]).as_slice());
    assert_eq!(outcome.value.challenger(), &MemberId::new("mario"));
    assert_eq!(
        outcome.notifications,
        vec!["Kart time! Mario has challenged Peach, Luigi to a game of Kart! Room for 1 more!".to_string()]
    );
}

#[test]
fn test_full_challenge_has_no_room_suffix() {
    let engine = engine(2);
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = engine
        .challenge(Some(&channel()), &MemberId::new("mario"), Game::Smash, &ids(&["toad"]), &FixedFixture, &mut rng)
        .unwrap();
    assert_eq!(outcome.value.state(), SessionState::Full);
    assert_eq!(
        outcome.notifications,
        vec!["Smash time! Mario has challenged Toad to a game of Smash!".to_string()]
    );
}

#[test]
fn test_lonely_challenge_announces_without_roster() {
    let engine = engine(4);
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = engine
        .challenge(Some(&ids(&["mario", "kartbot"])), &MemberId::new("mario"), Game::Kart, &[], &FixedFixture, &mut rng)
        .unwrap();
    assert_eq!(outcome.value.participants(), ids(&["mario"]).as_slice());
    assert_eq!(
        outcome.notifications,
        vec!["Kart time! Mario wants a game of Kart! Room for 3 more!".to_string()]
    );
}

#[test]
fn test_fifa_challenge_announces_fixture() {
    let engine = engine(4);
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = engine
        .challenge(Some(&channel()), &MemberId::new("mario"), Game::Fifa, &ids(&["luigi"]), &FixedFixture, &mut rng)
        .unwrap();

    assert!(outcome.value.fixture().is_some());
    assert_eq!(outcome.notifications.len(), 3);
    assert_eq!(outcome.notifications[1], "The leagues are: Serie A and La Liga");
    assert_eq!(outcome.notifications[2], "The teams are: Napoli vs. Sevilla");
}

#[test]
fn test_challenge_rejections() {
    let engine = engine(4);
    let mut rng = StdRng::seed_from_u64(3);
    let mario = MemberId::new("mario");

    let dm = engine.challenge(None, &mario, Game::Kart, &[], &FixedFixture, &mut rng);
    assert_eq!(dm.unwrap_err(), Rejection::DirectMessage);

    let empty = engine.challenge(Some(&[]), &mario, Game::Kart, &[], &FixedFixture, &mut rng);
    assert_eq!(empty.unwrap_err(), Rejection::DirectMessage);

    let bot = engine.challenge(Some(&channel()), &mario, Game::Kart, &ids(&["luigi", "KartBot"]), &FixedFixture, &mut rng);
    assert_eq!(bot.unwrap_err(), Rejection::TargetedBot);

    let missing = engine
        .challenge(Some(&channel()), &mario, Game::Fifa, &ids(&["luigi", "bowser"]), &FixedFixture, &mut rng)
        .unwrap_err();
    assert_eq!(
        missing.notification(),
        "Mario wants a game of Fifa, but I can't find 'bowser' in this channel!"
    );

    let crowd = engine
        .challenge(Some(&channel()), &mario, Game::Kart, &ids(&["luigi", "peach", "toad", "yoshi"]), &FixedFixture, &mut rng)
        .unwrap_err();
    assert_eq!(crowd, Rejection::TooManyTargets { actor: mario.clone(), game: Game::Kart, capacity: 4 });
}

#[test]
fn test_join_flow_never_exceeds_capacity() {
    let engine = engine(4);
    let mut session = explicit_session(&engine, "mario", &["luigi"]);

    let outcome = engine.join(Some(&mut session), &MemberId::new("peach")).unwrap();
    assert_eq!(
        outcome.notifications,
        vec![
            "Peach has joined the game of Kart!".to_string(),
            "Current players: Luigi, Mario, Peach".to_string(),
        ]
    );

    let again = engine.join(Some(&mut session), &MemberId::new("peach")).unwrap_err();
    assert_eq!(again, Rejection::AlreadyJoined { actor: MemberId::new("peach") });
    assert_eq!(session.len(), 3);

    engine.join(Some(&mut session), &MemberId::new("toad")).unwrap();
    assert_eq!(session.state(), SessionState::Full);

    let late = engine.join(Some(&mut session), &MemberId::new("yoshi")).unwrap_err();
    assert_eq!(
        late.notification(),
        "Sorry Yoshi, the game is full! Ask one of Luigi, Mario, Peach, Toad to drop out."
    );
    assert_eq!(session.len(), 4);

    // A participant re-joining a full game is told it is full first.
    let dup = engine.join(Some(&mut session), &MemberId::new("luigi")).unwrap_err();
    assert!(matches!(dup, Rejection::GameFull { .. }));
}

#[test]
fn test_join_without_session() {
    let engine = engine(4);
    let result = engine.join(None, &MemberId::new("peach")).unwrap_err();
    assert_eq!(result.notification(), "Sorry Peach, nobody has been challenged yet!");
}

#[test]
fn test_list_reports_participants() {
    let engine = engine(4);
    let session = explicit_session(&engine, "mario", &["luigi", "peach"]);
    assert_eq!(engine.list(Some(&session)), vec!["Luigi, Peach, Mario are currently challenged!".to_string()]);
    assert_eq!(
        engine.list(None),
        vec!["No challengers have challenged challengees! This makes kartbot sad :(".to_string()]
    );
}

#[test]
fn test_challenger_drop_out_cancels() {
    let engine = engine(4);
    let mut session = Some(explicit_session(&engine, "mario", &["luigi", "peach"]));
    let mut rng = StdRng::seed_from_u64(9);

    let outcome = engine.reject(&mut session, Some(&channel()), &MemberId::new("mario"), &mut rng).unwrap();
    assert_eq!(outcome.value, Dropout::Cancelled { challenger: MemberId::new("mario") });
    assert_eq!(outcome.notifications, vec!["Mario dropped out, challenge has been cancelled!".to_string()]);
    assert!(session.is_none());
}

#[test]
fn test_challenger_found_anywhere_in_session() {
    let engine = engine(4);
    let mut session = Some(explicit_session(&engine, "mario", &["luigi"]));
    engine.join(session.as_mut(), &MemberId::new("peach")).unwrap();
    let mut rng = StdRng::seed_from_u64(9);

    // Peach sits after the challenger; she is still swapped, not cancelling.
    let outcome = engine.reject(&mut session, Some(&channel()), &MemberId::new("peach"), &mut rng).unwrap();
    assert!(matches!(outcome.value, Dropout::Substituted { .. }));
    assert!(session.is_some());
}

#[test]
fn test_substitute_keeps_length_and_position() {
    let engine = engine(4);
    let members = channel();
    for seed in 0..20 {
        let mut session = Some(explicit_session(&engine, "mario", &["luigi", "peach"]));
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = engine.reject(&mut session, Some(&members), &MemberId::new("luigi"), &mut rng).unwrap();

        let current = session.as_ref().unwrap();
        assert_eq!(current.len(), 3);
        assert!(!current.contains(&MemberId::new("luigi")));

        let replacement = match outcome.value {
            Dropout::Substituted { replacement, .. } => replacement,
            other => panic!("unexpected drop out {:?}", other),
        };
        assert_eq!(current.participants()[0], replacement);
        assert_ne!(replacement, MemberId::new("kartbot"));
        assert!(!["mario", "peach", "luigi"].contains(&replacement.as_str()));
        assert_eq!(
            outcome.notifications[0],
            format!("Luigi has dropped out! {} has been challenged in their place!", replacement.display_name())
        );
    }
}

#[test]
fn test_drop_out_without_invite() {
    let engine = engine(4);
    let mut rng = StdRng::seed_from_u64(9);
    let mut session = Some(explicit_session(&engine, "mario", &["luigi"]));

    let outsider = engine.reject(&mut session, Some(&channel()), &MemberId::new("toad"), &mut rng).unwrap_err();
    assert_eq!(outsider.notification(), "Toad has tried to drop out, but they weren't invited to play! Jerk!");
    assert_eq!(session.as_ref().unwrap().len(), 2);

    let mut empty = None;
    let nothing = engine.reject(&mut empty, Some(&channel()), &MemberId::new("toad"), &mut rng).unwrap_err();
    assert_eq!(nothing, Rejection::NotInvited { actor: MemberId::new("toad") });
}

#[test]
#[ntest::timeout(2000)]
fn test_drop_out_with_nobody_left() {
    let engine = engine(4);
    let members = ids(&["mario", "luigi", "peach", "kartbot"]);
    let mut rng = StdRng::seed_from_u64(9);
    let mut session = Some(
        engine
            .challenge(Some(&members), &MemberId::new("mario"), Game::Kart, &ids(&["luigi", "peach"]), &FixedFixture, &mut rng)
            .unwrap()
            .value,
    );

    let result = engine.reject(&mut session, Some(&members), &MemberId::new("peach"), &mut rng).unwrap_err();
    assert_eq!(result, Rejection::NoSubstitute { actor: MemberId::new("peach") });
    assert_eq!(session.unwrap().participants(), ids(&["luigi", "peach", "mario"]).as_slice());
}
