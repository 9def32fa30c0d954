use std::collections::BTreeMap;

use log;
use serde_json as json;

use crate::cache::Cache;
use crate::curl;
use crate::gamelog::GameLog;

/// Where season game logs come from.
pub trait SeasonSource {
    fn game_log(&self, team: &str, season: i32) -> Result<GameLog, String>;
}

pub struct StatsApi {
    url: String,
    params: BTreeMap<&'static str, String>,
}

impl StatsApi {
    pub fn teams(season: i32) -> StatsApi {
	StatsApi {
	    url: "v1/teams".to_string(),
	    params: BTreeMap::from([
		("sportId", "1".to_string()),
		("season", season.to_string()),
	    ])
	}
    }

    pub fn schedule(season: i32, team_id: i64) -> StatsApi {
	StatsApi {
	    url: "v1/schedule".to_string(),
	    params: BTreeMap::from([
		("sportId", "1".to_string()),
		("gameType", "R".to_string()),
		("season", season.to_string()),
		("teamId", team_id.to_string()),
	    ])
	}
    }

    pub fn param(mut self, k: &'static str, v: &str) -> Self {
	self.params.insert(k, v.to_string());
	self
    }

    pub fn build_url(&self) -> String {
	let mut url = format!("https://statsapi.mlb.com/api/{}", self.url);

	for (i, (k, v)) in self.params.iter().enumerate() {
	    url = format!(
		"{}{}{}={}",
		url,
		if i == 0 { "?" } else { "&" },
		k,
		v
	    )
	}

	url
    }

    /// Fetch and parse the response, going through `cache` first.
    pub fn json(self, cache: &Cache, season: i32) -> Result<json::Value, String> {
	let url = self.build_url();
	log::debug!(target: "StatsApi.json", "url={:?}", url);
	if let Some(data) = cache.get(season, &url) {
	    if let Ok(v) = json::from_slice(&data) {
		return Ok(v);
	    }
	    log::warn!("Ignoring unreadable cache entry for {}", url);
	}
	let data = curl::get(&url)?;
	let value = json::from_slice(&data).map_err(|err| format!("Bad response from {}: {}", url, err))?;
	cache.put(season, &url, &data);
	Ok(value)
    }
}

/// Baseball-Reference team codes that differ from the stats API's.
const ALIASES: [(&str, &str); 9] = [
    ("CHW", "CWS"),
    ("KCR", "KC"),
    ("SDP", "SD"),
    ("SFG", "SF"),
    ("TBR", "TB"),
    ("TBD", "TB"),
    ("WSN", "WSH"),
    ("ANA", "LAA"),
    ("FLA", "MIA"),
];

fn alias(team: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(team))
        .map(|(_, to)| *to)
}

/// Find the stats API id of `team` in a `teams` response.
pub fn find_team_id(data: &json::Value, team: &str) -> Option<i64> {
    let teams = data["teams"].as_array()?;
    let lookup = |code: &str| {
        teams
            .iter()
            .find(|t| t["abbreviation"].as_str().is_some_and(|a| a.eq_ignore_ascii_case(code)))
            .and_then(|t| t["id"].as_i64())
    };
    lookup(team).or_else(|| alias(team).and_then(lookup))
}

pub struct MlbStats {
    cache: Cache,
}

impl MlbStats {
    pub fn new(cache: Cache) -> MlbStats {
        MlbStats { cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn team_id(&self, team: &str, season: i32) -> Result<i64, String> {
        let data = StatsApi::teams(season).json(&self.cache, season)?;
        find_team_id(&data, team).ok_or_else(|| format!("Unknown team {} in {}", team, season))
    }
}

impl SeasonSource for MlbStats {
    fn game_log(&self, team: &str, season: i32) -> Result<GameLog, String> {
        let team_id = self.team_id(team, season)?;
        log::debug!("{} {} is team {}", team, season, team_id);
        let data = StatsApi::schedule(season, team_id)
            .param("fields", "dates,games,gamePk,gameDate,gameNumber,status,abstractGameState,codedGameState,detailedState,teams,away,home,team,id,score")
            .json(&self.cache, season)?;
        GameLog::from_schedule(team, season, team_id, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_are_stable() {
        let url = StatsApi::schedule(2024, 145).build_url();
        assert_eq!(
            url,
            "https://statsapi.mlb.com/api/v1/schedule?gameType=R&season=2024&sportId=1&teamId=145"
        );
        let url = StatsApi::teams(1962).param("fields", "teams,id").build_url();
        assert_eq!(
            url,
            "https://statsapi.mlb.com/api/v1/teams?fields=teams,id&season=1962&sportId=1"
        );
    }

    #[test]
    fn team_lookup() {
        let data = json!({"teams": [
            {"id": 145, "abbreviation": "CWS"},
            {"id": 121, "abbreviation": "NYM"},
            {"id": 133, "abbreviation": "OAK"},
        ]});
        assert_eq!(find_team_id(&data, "NYM"), Some(121));
        assert_eq!(find_team_id(&data, "oak"), Some(133));
        assert_eq!(find_team_id(&data, "CHW"), Some(145));
        assert_eq!(find_team_id(&data, "CWS"), Some(145));
        assert_eq!(find_team_id(&data, "XYZ"), None);
        assert_eq!(find_team_id(&json!({}), "NYM"), None);
    }

    #[test]
    fn cached_response_skips_network() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = Cache::new(dir.path());
        let api = StatsApi::teams(1932);
        cache.put(1932, &api.build_url(), br#"{"teams":[{"id":111,"abbreviation":"BOS"}]}"#);

        let stats = MlbStats::new(cache);
        assert_eq!(stats.team_id("BOS", 1932).unwrap(), 111);
        assert!(stats.team_id("NYY", 1932).unwrap_err().contains("NYY"));
    }
}
