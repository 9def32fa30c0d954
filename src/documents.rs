//! The YAML documents shared with the user: `config.yaml` holds what to
//! post and how far along each series is, `secrets.yaml` the credentials.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub diffs: Vec<DiffRecord>,
    #[serde(default)]
    pub pairs: Vec<PairRecord>,
    /// Keys we don't know about, written back untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub team: String,
    pub year: Season,
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    #[serde(rename = "teamA")]
    pub team_a: String,
    #[serde(rename = "yearA")]
    pub year_a: Season,
    #[serde(rename = "colorA", default = "default_color_a")]
    pub color_a: String,
    #[serde(rename = "teamB")]
    pub team_b: String,
    #[serde(rename = "yearB")]
    pub year_b: Season,
    #[serde(rename = "colorB", default = "default_color_b")]
    pub color_b: String,
    pub games_played: u32,
}

fn default_color_a() -> String {
    "red".to_string()
}

fn default_color_b() -> String {
    "blue".to_string()
}

/// A season year as written by the user: either `2024` or `"2024"`.
/// It is written back in the same form it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SeasonRepr", into = "SeasonRepr")]
pub struct Season {
    year: i32,
    quoted: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SeasonRepr {
    Number(i32),
    Text(String),
}

impl Season {
    pub fn new(year: i32) -> Season {
        Season { year, quoted: false }
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl TryFrom<SeasonRepr> for Season {
    type Error = String;

    fn try_from(repr: SeasonRepr) -> Result<Self, Self::Error> {
        match repr {
            SeasonRepr::Number(year) => Ok(Season { year, quoted: false }),
            SeasonRepr::Text(s) => s
                .trim()
                .parse()
                .map(|year| Season { year, quoted: true })
                .map_err(|_| format!("Invalid season year: {:?}", s)),
        }
    }
}

impl From<Season> for SeasonRepr {
    fn from(season: Season) -> Self {
        if season.quoted {
            SeasonRepr::Text(season.year.to_string())
        } else {
            SeasonRepr::Number(season.year)
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)
    }
}

#[derive(Debug, Deserialize)]
pub struct SecretsDocument {
    pub bluesky: BlueskyCredentials,
}

#[derive(Clone, Deserialize)]
pub struct BlueskyCredentials {
    pub username: String,
    pub password: String,
    /// PDS to log in to. Defaults to bsky.social.
    #[serde(default)]
    pub service: Option<String>,
}

impl fmt::Debug for BlueskyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueskyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("service", &self.service)
            .finish()
    }
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| format!("Invalid YAML in {}: {}", path.display(), e))
}

/// Write the config document through a temporary file so a crash never
/// leaves a half-written config behind.
pub fn save(doc: &ConfigDocument, path: &Path) -> Result<(), String> {
    let text = serde_yaml::to_string(doc).map_err(|e| format!("Cannot serialize config: {}", e))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, text).map_err(|e| format!("Cannot write {:?}: {}", tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| format!("Cannot replace {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn season_forms() {
        let doc: ConfigDocument = serde_yaml::from_str(
            "pairs:\n  - {teamA: NYM, yearA: 1962, colorA: orange, teamB: CHW, yearB: '2024', colorB: black, games_played: 4}\n",
        )
        .unwrap();
        let pair = &doc.pairs[0];
        assert_eq!(pair.year_a.year(), 1962);
        assert_eq!(pair.year_b.year(), 2024);
        assert_eq!(pair.year_b.to_string(), "2024");
        assert!(doc.diffs.is_empty());

        let out = serde_yaml::to_string(&doc).unwrap();
        assert!(out.contains("yearA: 1962"));
        assert!(out.contains("yearB: '2024'"));
    }

    #[test]
    fn season_rejects_garbage() {
        let v: Result<DiffRecord, _> =
            serde_yaml::from_str("{team: OAK, year: next, games_played: 0}");
        assert!(v.is_err());
    }

    #[test]
    fn colors_default() {
        let pair: PairRecord = serde_yaml::from_str(
            "{teamA: OAK, yearA: 2023, teamB: OAK, yearB: 2024, games_played: 0}",
        )
        .unwrap();
        assert_eq!(pair.color_a, "red");
        assert_eq!(pair.color_b, "blue");
    }

    #[test]
    fn empty_document() {
        let doc: ConfigDocument = serde_yaml::from_str("diffs: []").unwrap();
        assert!(doc.diffs.is_empty());
        assert!(doc.pairs.is_empty());
    }

    #[test]
    fn save_keeps_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "note: keep me\ndiffs:\n  - team: OAK\n    year: 2024\n    games_played: 3\n",
        )
        .unwrap();

        let mut doc: ConfigDocument = load(&path).unwrap();
        doc.diffs[0].games_played += 1;
        save(&doc, &path).unwrap();

        let again: ConfigDocument = load(&path).unwrap();
        assert_eq!(again.diffs[0].games_played, 4);
        assert_eq!(
            again.extra.get("note"),
            Some(&serde_yaml::Value::String("keep me".to_string()))
        );
        assert!(!dir.path().join("config.yaml.tmp").exists());
    }

    #[test]
    fn load_missing_file() {
        let v: Result<ConfigDocument, String> = load(Path::new("/nonexistent/config.yaml"));
        assert!(v.unwrap_err().contains("/nonexistent/config.yaml"));
    }

    #[test]
    fn secrets_hide_password() {
        let secrets: SecretsDocument =
            serde_yaml::from_str("bluesky: {username: me.bsky.social, password: hunter2}").unwrap();
        assert!(secrets.bluesky.service.is_none());
        let dbg = format!("{:?}", secrets);
        assert!(dbg.contains("me.bsky.social"));
        assert!(!dbg.contains("hunter2"));
    }
}
