use itertools::Itertools;
use serde_json as json;

/// One completed game with the team's record after it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub game: u32,
    pub runs: u32,
    pub runs_allowed: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Completed regular-season games of one team-season, in order.
#[derive(Debug, Clone)]
pub struct GameLog {
    pub team: String,
    pub season: i32,
    rows: Vec<GameRow>,
}

struct Played {
    game_pk: i64,
    date: String,
    game_number: i64,
    runs: u32,
    runs_allowed: u32,
}

/// Postponed and cancelled games are reported as final too.
const NOT_PLAYED: [&str; 3] = ["Postponed", "Cancelled", "Suspended"];

impl GameLog {
    /// Build a log from (runs scored, runs allowed) per game, in order.
    pub fn from_results(team: &str, season: i32, results: &[(u32, u32)]) -> GameLog {
        let mut wins = 0;
        let mut losses = 0;
        let rows = results
            .iter()
            .enumerate()
            .map(|(i, &(runs, runs_allowed))| {
                if runs > runs_allowed {
                    wins += 1;
                } else if runs < runs_allowed {
                    losses += 1;
                }
                GameRow {
                    game: i as u32 + 1,
                    runs,
                    runs_allowed,
                    wins,
                    losses,
                }
            })
            .collect();
        GameLog {
            team: team.to_string(),
            season,
            rows,
        }
    }

    /// Build a log from a stats API `schedule` response for `team_id`.
    pub fn from_schedule(team: &str, season: i32, team_id: i64, data: &json::Value) -> Result<GameLog, String> {
        let dates = data["dates"]
            .as_array()
            .ok_or_else(|| format!("No schedule data for {} {}", team, season))?;

        let played: Vec<Played> = dates
            .iter()
            .filter_map(|d| d["games"].as_array())
            .flatten()
            .filter_map(|g| played_game(g, team_id))
            .collect();

        // A suspended game shows up again on the day it is finished; the
        // last sighting carries the final score.
        let results: Vec<(u32, u32)> = played
            .into_iter()
            .rev()
            .unique_by(|p| p.game_pk)
            .sorted_by(|a, b| a.date.cmp(&b.date).then(a.game_number.cmp(&b.game_number)))
            .map(|p| (p.runs, p.runs_allowed))
            .collect();

        Ok(GameLog::from_results(team, season, &results))
    }

    pub fn rows(&self) -> &[GameRow] {
        &self.rows
    }

    pub fn games_played(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Wins after game `n`; 0 outside `1..=games_played()`.
    pub fn wins_after(&self, n: u32) -> u32 {
        match n {
            0 => 0,
            n => self.rows.get(n as usize - 1).map_or(0, |r| r.wins),
        }
    }

    /// Wins after each of the games `1..=n`.
    pub fn wins_series(&self, n: u32) -> Vec<u32> {
        (1..=n).map(|i| self.wins_after(i)).collect()
    }

    /// Runs scored and allowed over the first `n` games.
    pub fn runs_through(&self, n: u32) -> (u32, u32) {
        self.rows
            .iter()
            .take(n as usize)
            .fold((0, 0), |(rs, ra), r| (rs + r.runs, ra + r.runs_allowed))
    }
}

fn is_final(status: &json::Value) -> bool {
    match status["codedGameState"].as_str() {
        Some(code) => code == "F" || code == "O",
        None => status["abstractGameState"].as_str() == Some("Final"),
    }
}

fn played_game(game: &json::Value, team_id: i64) -> Option<Played> {
    let status = &game["status"];
    let state = status["detailedState"].as_str().unwrap_or("");
    if !is_final(status) || NOT_PLAYED.iter().any(|s| state.starts_with(s)) {
        return None;
    }

    let (us, them) = if game["teams"]["away"]["team"]["id"].as_i64() == Some(team_id) {
        ("away", "home")
    } else if game["teams"]["home"]["team"]["id"].as_i64() == Some(team_id) {
        ("home", "away")
    } else {
        return None;
    };

    Some(Played {
        game_pk: game["gamePk"].as_i64()?,
        date: game["gameDate"].as_str().unwrap_or("").to_string(),
        game_number: game["gameNumber"].as_i64().unwrap_or(1),
        runs: game["teams"][us]["score"].as_u64()? as u32,
        runs_allowed: game["teams"][them]["score"].as_u64()? as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(pk: i64, date: &str, number: i64, state: &str, away: (i64, Option<u64>), home: (i64, Option<u64>)) -> json::Value {
        let side = |(id, score): (i64, Option<u64>)| match score {
            Some(s) => json!({"team": {"id": id}, "score": s}),
            None => json!({"team": {"id": id}}),
        };
        let abstract_state = match state {
            "Scheduled" | "Pre-Game" | "Warmup" => "Preview",
            "In Progress" | "Delayed" | "Manager challenge" => "Live",
            _ => "Final",
        };
        json!({
            "gamePk": pk,
            "gameDate": date,
            "gameNumber": number,
            "status": {"abstractGameState": abstract_state, "detailedState": state},
            "teams": {"away": side(away), "home": side(home)},
        })
    }

    #[test]
    fn cumulative_record() {
        let log = GameLog::from_results("OAK", 2023, &[(3, 1), (2, 2), (0, 5), (7, 6)]);
        assert_eq!(log.games_played(), 4);
        let last = &log.rows()[3];
        assert_eq!((last.game, last.wins, last.losses), (4, 2, 1));
        assert_eq!(log.wins_series(4), vec![1, 1, 1, 2]);
        assert_eq!(log.runs_through(2), (5, 3));
        assert_eq!(log.runs_through(10), (12, 14));
    }

    #[test]
    fn wins_after_bounds() {
        let log = GameLog::from_results("OAK", 2023, &[(3, 1), (4, 1)]);
        assert_eq!(log.wins_after(0), 0);
        assert_eq!(log.wins_after(1), 1);
        assert_eq!(log.wins_after(2), 2);
        assert_eq!(log.wins_after(3), 0);
    }

    #[test]
    fn schedule_parsing() {
        let data = json!({
            "dates": [
                {"games": [
                    // postponed, ignored
                    game(10, "2024-04-01T23:05:00Z", 1, "Postponed", (145, None), (133, None)),
                    // someone else's game, ignored
                    game(11, "2024-04-01T23:05:00Z", 1, "Final", (1, Some(1)), (2, Some(0))),
                ]},
                {"games": [
                    // doubleheader listed out of order
                    game(13, "2024-04-02T17:05:00Z", 2, "Final", (133, Some(4)), (145, Some(4))),
                    game(12, "2024-04-02T17:05:00Z", 1, "Final", (145, Some(2)), (133, Some(5))),
                    // suspended, finished later
                    game(14, "2024-04-03T23:05:00Z", 1, "Suspended: Rain", (145, Some(1)), (133, Some(1))),
                    // not played yet
                    game(15, "2024-09-29T20:05:00Z", 1, "Scheduled", (145, None), (133, None)),
                ]},
                {"games": [
                    game(14, "2024-04-03T23:05:00Z", 1, "Final", (145, Some(6)), (133, Some(3))),
                ]},
            ]
        });
        let log = GameLog::from_schedule("CHW", 2024, 145, &data).unwrap();
        assert_eq!(log.games_played(), 3);
        let rows = log.rows();
        // game 12: CHW away, lost 2-5
        assert_eq!((rows[0].runs, rows[0].runs_allowed, rows[0].wins, rows[0].losses), (2, 5, 0, 1));
        // game 13: CHW home, tied 4-4
        assert_eq!((rows[1].runs, rows[1].runs_allowed, rows[1].wins, rows[1].losses), (4, 4, 0, 1));
        // game 14: resumed, won 6-3
        assert_eq!((rows[2].runs, rows[2].runs_allowed, rows[2].wins, rows[2].losses), (6, 3, 1, 1));
    }

    #[test]
    fn live_game_is_not_counted() {
        let data = json!({
            "dates": [
                {"games": [game(20, "2024-03-20T10:05:00Z", 1, "Final", (145, Some(5)), (133, Some(1)))]},
                {"games": [game(21, "2024-03-21T10:05:00Z", 1, "In Progress", (145, Some(2)), (133, Some(0)))]},
            ]
        });
        let log = GameLog::from_schedule("CHW", 2024, 145, &data).unwrap();
        assert_eq!(log.games_played(), 1);
        assert_eq!(log.wins_after(1), 1);
        assert_eq!(log.wins_after(2), 0);
    }

    #[test]
    fn coded_state_wins_over_abstract() {
        let mut over = game(30, "2024-04-05T23:05:00Z", 1, "Game Over", (145, Some(3)), (133, Some(2)));
        over["status"]["codedGameState"] = json!("O");
        let mut delayed = game(31, "2024-04-06T23:05:00Z", 1, "Delayed", (145, Some(1)), (133, Some(0)));
        delayed["status"]["abstractGameState"] = json!("Final");
        delayed["status"]["codedGameState"] = json!("I");
        let data = json!({"dates": [{"games": [over, delayed]}]});

        let log = GameLog::from_schedule("CHW", 2024, 145, &data).unwrap();
        assert_eq!(log.games_played(), 1);
        assert_eq!(log.rows()[0].runs, 3);
    }

    #[test]
    fn schedule_without_dates() {
        assert!(GameLog::from_schedule("CHW", 2024, 145, &json!({})).is_err());
        let log = GameLog::from_schedule("CHW", 2024, 145, &json!({"dates": []})).unwrap();
        assert_eq!(log.games_played(), 0);
    }
}
