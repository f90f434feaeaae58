//! Integration tests for model validation: players, tournaments, rankings, errors.

use darts_bracket_engine::{
    ErrorKind, Player, PointsMode, Pool, Ranking, RankingUpdate, Tournament, TournamentError,
    TournamentStatus, TournamentUpdate,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn names_are_trimmed_and_required() {
    assert_eq!(Player::new("  Phil ").unwrap().name, "Phil");
    assert_eq!(Player::new("   "), Err(TournamentError::EmptyName));
    assert!(matches!(Tournament::new(""), Err(TournamentError::EmptyName)));
    assert!(matches!(Ranking::new(" "), Err(TournamentError::EmptyName)));

    let mut p = Player::new("Phil").unwrap().with_nickname("The Power");
    assert_eq!(p.rename(""), Err(TournamentError::EmptyName));
    assert_eq!(p.name, "Phil");
    assert_eq!(p.nickname.as_deref(), Some("The Power"));
}

#[test]
fn new_tournament_defaults() {
    let t = Tournament::new("Friday Darts").unwrap();
    assert_eq!(t.status, TournamentStatus::NotStarted);
    assert_eq!(t.game_format, "501");
    assert_eq!(t.group_size, 4);
    assert_eq!((t.best_of_legs_pool, t.best_of_legs_knockout), (5, 7));
    assert!(!t.is_published);
    assert!(t.players.is_empty() && t.bracket.is_none());
}

#[test]
fn invalid_update_changes_nothing() {
    let mut t = Tournament::new("Friday Darts").unwrap();
    let result = t.update(TournamentUpdate {
        name: Some("Saturday Darts".to_string()),
        group_size: Some(1),
        ..Default::default()
    });
    assert_eq!(result, Err(TournamentError::InvalidGroupSize(1)));
    assert_eq!(t.name, "Friday Darts");

    t.update(TournamentUpdate {
        location: Some("The Red Lion".to_string()),
        group_size: Some(5),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(t.location.as_deref(), Some("The Red Lion"));
    assert_eq!(t.group_size, 5);
    assert_eq!(t.name, "Friday Darts");
}

#[test]
fn null_ranking_unlinks_the_tournament() {
    let mut t = Tournament::new("Friday Darts").unwrap();
    let ranking = Uuid::new_v4();
    let link: TournamentUpdate = serde_json::from_value(json!({ "ranking_id": ranking })).unwrap();
    t.update(link).unwrap();
    assert_eq!(t.ranking_id, Some(ranking));

    let untouched: TournamentUpdate = serde_json::from_value(json!({ "location": "The Red Lion" })).unwrap();
    assert_eq!(untouched.ranking_id, None);
    t.update(untouched).unwrap();
    assert_eq!(t.ranking_id, Some(ranking));

    let unlink: TournamentUpdate = serde_json::from_value(json!({ "ranking_id": null })).unwrap();
    assert_eq!(unlink.ranking_id, Some(None));
    t.update(unlink).unwrap();
    assert_eq!(t.ranking_id, None);
}

#[test]
fn assigning_twice_is_a_no_op() {
    let mut t = Tournament::new("Friday Darts").unwrap();
    let p = Uuid::new_v4();
    assert_eq!(t.assign_player(p), Ok(true));
    assert_eq!(t.assign_player(p), Ok(false));
    assert_eq!(t.players, [p]);

    t.remove_player(p).unwrap();
    assert_eq!(t.remove_player(p), Err(TournamentError::PlayerNotFound(p)));
}

#[test]
fn publishing_toggles() {
    let mut t = Tournament::new("Friday Darts").unwrap();
    assert!(t.toggle_published());
    assert!(!t.toggle_published());
}

#[test]
fn pool_names_run_through_the_alphabet() {
    assert_eq!(Pool::name_for_index(0), "Pool A");
    assert_eq!(Pool::name_for_index(25), "Pool Z");
    assert_eq!(Pool::name_for_index(26), "Pool 27");
}

#[test]
fn ranking_points_table() {
    let mut r = Ranking::new("League").unwrap();
    assert_eq!(r.points_mode, PointsMode::Fixed);
    assert_eq!(r.points_for_placement(Some(1)), 10);
    assert_eq!(r.points_for_placement(Some(8)), 1);
    assert_eq!(r.points_for_placement(Some(9)), 0);
    assert_eq!(r.points_for_placement(None), 0);

    r.update(RankingUpdate {
        points_first: Some(25),
        points_participation: Some(2),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(r.points_for_placement(Some(1)), 25);
    assert_eq!(r.points_for_placement(Some(12)), 2);
    assert_eq!(r.points_for_placement(Some(2)), 8);
}

#[test]
fn error_kinds_map_to_response_classes() {
    assert_eq!(TournamentError::DrawNotAllowed.kind(), ErrorKind::Validation);
    assert_eq!(TournamentError::InvalidBoardCount(0).kind(), ErrorKind::Validation);
    assert_eq!(TournamentError::BracketExists.kind(), ErrorKind::Conflict);
    assert_eq!(TournamentError::DownstreamPlayed(Uuid::new_v4()).kind(), ErrorKind::Conflict);
    assert_eq!(TournamentError::MatchNotFound(Uuid::new_v4()).kind(), ErrorKind::NotFound);
    assert_eq!(
        TournamentError::NotEnoughPlayers { required: 2, found: 1 }.to_string(),
        "Need at least 2 players (found 1)"
    );
}
