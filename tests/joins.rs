// tests/joins.rs
use anyhow::Result;
use rowflow::testing::assert_rows_equal;
use rowflow::*;

fn players() -> Vec<Row> {
    vec![
        row! { "player_id" => 0, "username" => "root" },
        row! { "player_id" => 1, "username" => "XeroX" },
        row! { "player_id" => 2, "username" => "jay" },
    ]
}

fn join_rows(
    joiner: impl Joiner + 'static,
    keys: &[&str],
    games: Vec<Row>,
    players: Vec<Row>,
) -> Result<Vec<Row>> {
    let left = Graph::new().read_from_iter("games");
    let right = Graph::new().read_from_iter("players");
    left.join(joiner, &right, keys)
        .run(Bindings::new().rows("games", games).rows("players", players))
}

// Rows missing the column sort first, like the reference scenarios expect.
fn by_game_id(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by_key(|r| r.try_get("game_id").cloned().unwrap_or(Value::Int(-1)));
    rows
}

#[test]
fn inner_join_merges_matching_groups() -> Result<()> {
    let players = vec![
        row! { "player_id" => 1, "username" => "XeroX" },
        row! { "player_id" => 2, "username" => "jay" },
        row! { "player_id" => 3, "username" => "Destroyer" },
    ];
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 99 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 1, "score" => 22 },
    ];
    let out = by_game_id(join_rows(InnerJoiner::new(), &["player_id"], games, players)?);
    assert_rows_equal(
        &out,
        &[
            row! { "game_id" => 1, "player_id" => 3, "score" => 99, "username" => "Destroyer" },
            row! { "game_id" => 2, "player_id" => 1, "score" => 17, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 1, "score" => 22, "username" => "XeroX" },
        ],
    );
    Ok(())
}

#[test]
fn inner_join_drops_one_sided_keys() -> Result<()> {
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 9999999 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 2, "score" => 22 },
    ];
    let out = by_game_id(join_rows(InnerJoiner::new(), &["player_id"], games, players())?);
    assert_rows_equal(
        &out,
        &[
            // player 3 is unknown; no games for player 0
            row! { "game_id" => 2, "player_id" => 1, "score" => 17, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 2, "score" => 22, "username" => "jay" },
        ],
    );
    Ok(())
}

#[test]
fn outer_join_passes_both_sides_through() -> Result<()> {
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 9999999 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 2, "score" => 22 },
    ];
    let out = by_game_id(join_rows(OuterJoiner::new(), &["player_id"], games, players())?);
    assert_rows_equal(
        &out,
        &[
            row! { "player_id" => 0, "username" => "root" },
            row! { "game_id" => 1, "player_id" => 3, "score" => 9999999 },
            row! { "game_id" => 2, "player_id" => 1, "score" => 17, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 2, "score" => 22, "username" => "jay" },
        ],
    );
    Ok(())
}

#[test]
fn left_join_passes_left_only_keys() -> Result<()> {
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 0 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 2, "score" => 22 },
        row! { "game_id" => 4, "player_id" => 2, "score" => 41 },
    ];
    let out = by_game_id(join_rows(LeftJoiner::new(), &["player_id"], games, players())?);
    assert_rows_equal(
        &out,
        &[
            // player 0 with no games is dropped; unknown player 3 passes through
            row! { "game_id" => 1, "player_id" => 3, "score" => 0 },
            row! { "game_id" => 2, "player_id" => 1, "score" => 17, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 2, "score" => 22, "username" => "jay" },
            row! { "game_id" => 4, "player_id" => 2, "score" => 41, "username" => "jay" },
        ],
    );
    Ok(())
}

#[test]
fn right_join_passes_right_only_keys() -> Result<()> {
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 0 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 2, "score" => 22 },
        row! { "game_id" => 4, "player_id" => 2, "score" => 41 },
        row! { "game_id" => 5, "player_id" => 1, "score" => 34 },
    ];
    let out = by_game_id(join_rows(RightJoiner::new(), &["player_id"], games, players())?);
    assert_rows_equal(
        &out,
        &[
            // the game with unknown player 3 is dropped; root has no games
            row! { "player_id" => 0, "username" => "root" },
            row! { "game_id" => 2, "player_id" => 1, "score" => 17, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 2, "score" => 22, "username" => "jay" },
            row! { "game_id" => 4, "player_id" => 2, "score" => 41, "username" => "jay" },
            row! { "game_id" => 5, "player_id" => 1, "score" => 34, "username" => "XeroX" },
        ],
    );
    Ok(())
}

#[test]
fn colliding_columns_get_suffixed_names() -> Result<()> {
    let players = vec![
        row! { "player_id" => 1, "username" => "XeroX", "score" => 400 },
        row! { "player_id" => 2, "username" => "jay", "score" => 451 },
        row! { "player_id" => 3, "username" => "Destroyer", "score" => 999 },
    ];
    let games = vec![
        row! { "game_id" => 1, "player_id" => 3, "score" => 99 },
        row! { "game_id" => 2, "player_id" => 1, "score" => 17 },
        row! { "game_id" => 3, "player_id" => 1, "score" => 22 },
    ];
    let joiner = InnerJoiner::with_suffixes(Suffixes::new("_game", "_max"));
    let out = by_game_id(join_rows(joiner, &["player_id"], games, players)?);
    assert_rows_equal(
        &out,
        &[
            row! { "game_id" => 1, "player_id" => 3, "score_game" => 99, "score_max" => 999, "username" => "Destroyer" },
            row! { "game_id" => 2, "player_id" => 1, "score_game" => 17, "score_max" => 400, "username" => "XeroX" },
            row! { "game_id" => 3, "player_id" => 1, "score_game" => 22, "score_max" => 400, "username" => "XeroX" },
        ],
    );
    Ok(())
}

#[test]
fn join_emits_cartesian_product_per_key() -> Result<()> {
    let left = vec![
        row! { "k" => "a", "l" => 1 },
        row! { "k" => "a", "l" => 2 },
        row! { "k" => "b", "l" => 3 },
    ];
    let right = vec![
        row! { "k" => "a", "r" => 10 },
        row! { "k" => "a", "r" => 20 },
    ];
    let out = join_rows(InnerJoiner::new(), &["k"], left, right)?;
    // outer loop left rows, inner loop right rows
    assert_rows_equal(
        &out,
        &[
            row! { "k" => "a", "l" => 1, "r" => 10 },
            row! { "k" => "a", "l" => 1, "r" => 20 },
            row! { "k" => "a", "l" => 2, "r" => 10 },
            row! { "k" => "a", "l" => 2, "r" => 20 },
        ],
    );
    Ok(())
}

#[test]
fn join_with_empty_side_behaves_per_strategy() -> Result<()> {
    let left = vec![row! { "k" => "a", "l" => 1 }];

    let out = join_rows(InnerJoiner::new(), &["k"], left.clone(), Vec::new())?;
    assert!(out.is_empty());

    let out = join_rows(LeftJoiner::new(), &["k"], left.clone(), Vec::new())?;
    assert_rows_equal(&out, &left);

    let out = join_rows(RightJoiner::new(), &["k"], left.clone(), Vec::new())?;
    assert!(out.is_empty());

    let out = join_rows(OuterJoiner::new(), &["k"], left.clone(), Vec::new())?;
    assert_rows_equal(&out, &left);
    Ok(())
}
