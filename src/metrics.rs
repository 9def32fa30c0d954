use crate::gamelog::GameLog;
use crate::utils::fmt4;

pub const TOTAL_GAMES_MODERN: u32 = 162;
pub const TOTAL_GAMES_OLDEN: u32 = 154;
/// Run differential of the 2023 Oakland Athletics.
pub const OAK_2023_DIFF: i64 = -339;
/// Run differential of the 1932 Boston Red Sox.
pub const BOS_1932_DIFF: i64 = -349;

/// Baseball-Reference's Pythagorean exponent.
const BREF_EXPONENT: f64 = 1.83;

#[derive(Debug, Clone, PartialEq)]
pub struct RunDiffMetrics {
    pub games_played: u32,
    pub runs_scored: u32,
    pub runs_allowed: u32,
    pub run_diff: i64,
    pub run_diff_per_game: f64,
    pub remaining_modern: u32,
    pub remaining_olden: u32,
    /// RD/G needed over the rest of a 162 game season to reach 2023 OAK.
    pub pace_oak_2023: Option<f64>,
    /// RD/G needed over the rest of a 154 game season to reach 1932 BOS.
    pub pace_bos_1932: Option<f64>,
    /// Same, but with a 162 game season.
    pub pace_bos_1932_modern: Option<f64>,
    pub wins: u32,
    pub win_pct: f64,
    pub pythag_pct: f64,
    pub pythag_wins: f64,
    pub pythag_pct_bref: f64,
    pub pythag_wins_bref: f64,
}

fn pythagorean(rs: u32, ra: u32, exponent: f64) -> f64 {
    let rs = (rs as f64).powf(exponent);
    let ra = (ra as f64).powf(exponent);
    if rs + ra == 0.0 {
        0.5
    } else {
        rs / (rs + ra)
    }
}

fn pace(target: i64, run_diff: i64, remaining: u32) -> Option<f64> {
    if remaining == 0 {
        None
    } else {
        Some((target - run_diff) as f64 / remaining as f64)
    }
}

impl RunDiffMetrics {
    /// Metrics after the first `n` games of `log`. `n` must be at least 1.
    pub fn compute(log: &GameLog, n: u32) -> RunDiffMetrics {
        let n = n.max(1);
        let (rs, ra) = log.runs_through(n);
        let run_diff = rs as i64 - ra as i64;
        let remaining_modern = TOTAL_GAMES_MODERN.saturating_sub(n);
        let remaining_olden = TOTAL_GAMES_OLDEN.saturating_sub(n);
        let wins = log.wins_after(n);
        let pythag_pct = pythagorean(rs, ra, 2.0);
        let pythag_pct_bref = pythagorean(rs, ra, BREF_EXPONENT);

        RunDiffMetrics {
            games_played: n,
            runs_scored: rs,
            runs_allowed: ra,
            run_diff,
            run_diff_per_game: run_diff as f64 / n as f64,
            remaining_modern,
            remaining_olden,
            pace_oak_2023: pace(OAK_2023_DIFF, run_diff, remaining_modern),
            pace_bos_1932: pace(BOS_1932_DIFF, run_diff, remaining_olden),
            pace_bos_1932_modern: pace(BOS_1932_DIFF, run_diff, remaining_modern),
            wins,
            win_pct: wins as f64 / n as f64,
            pythag_pct,
            pythag_wins: pythag_pct * n as f64,
            pythag_pct_bref,
            pythag_wins_bref: pythag_pct_bref * n as f64,
        }
    }

    /// The (Metric, Value, Total) rows of the published table.
    pub fn table(&self) -> Vec<[String; 3]> {
        let num = fmt4;
        let opt = |x: Option<f64>| x.map_or("---".to_string(), num);
        let row = |m: &str, v: String, t: String| [m.to_string(), v, t];
        vec![
            row("RD/G", num(self.run_diff_per_game), self.run_diff.to_string()),
            row("RD/G, match 2023OAK", opt(self.pace_oak_2023), OAK_2023_DIFF.to_string()),
            row("RD/G, match 1932BOS", opt(self.pace_bos_1932), BOS_1932_DIFF.to_string()),
            row("(154) RD/G, match 1932BOS", opt(self.pace_bos_1932_modern), String::new()),
            row("G Remaining 162", self.remaining_modern.to_string(), String::new()),
            row("G Remaining 154", self.remaining_olden.to_string(), String::new()),
            row("", String::new(), String::new()),
            row("Actual W%", num(self.win_pct), String::new()),
            row("Actual W", self.wins.to_string(), String::new()),
            row("Pythag W%", num(self.pythag_pct), String::new()),
            row("Pythag W", num(self.pythag_wins), String::new()),
            row("Pythag W% (BR)", num(self.pythag_pct_bref), String::new()),
            row("Pythag W (BR)", num(self.pythag_wins_bref), String::new()),
        ]
    }
}
