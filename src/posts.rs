use crate::documents::Season;
use crate::metrics::RunDiffMetrics;

/// What gets published: text, an image and its alt text.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub text: String,
    pub alt: String,
    pub svg: String,
}

pub struct Side<'a> {
    pub team: &'a str,
    pub season: Season,
    pub color: &'a str,
    pub wins: u32,
}

impl Side<'_> {
    fn name(&self) -> String {
        format!("{} {}", self.team, self.season)
    }
}

pub fn comparison_text(games: u32, a: &Side, b: &Side) -> String {
    let (ya, yb) = (a.wins, b.wins);
    if ya > yb {
        format!(
            "With {games} game(s) in the books, the {} season is somehow worse at {yb} wins, \
             behind the {} season by {} win(s).\n\n\
             No 'could always be' worse here. It *is* worse at this point.",
            b.name(),
            a.name(),
            ya - yb
        )
    } else if ya < yb {
        format!(
            "Through {games} game(s) played, the {} season is ahead with {yb} wins, \
             above the {} season by {} win(s).\n\n\
             The grass, for now, is greener here. It could always be worse.",
            b.name(),
            a.name(),
            yb - ya
        )
    } else {
        format!(
            "After {games} game(s), the {} season isn't better than the {} season at {ya} win(s) each.\n\n\
             But it also isn't worse.",
            b.name(),
            a.name()
        )
    }
}

pub fn comparison_alt(games: u32, a: &Side, b: &Side) -> String {
    let (na, nb) = (a.name(), b.name());
    format!(
        "A step line plot comparing the wins of the {na} season and the {nb} season. \
         The x-axis represents the number of games played (1 to {games}), and the y-axis represents the number of wins. \
         The {na} season is shown in {}, and the {nb} season is shown in {}. \
         After {games} games, the {na} season has {} wins, while the {nb} season has {} wins.",
        a.color, b.color, a.wins, b.wins
    )
}

pub fn comparison_title(a: &Side, b: &Side) -> String {
    format!("Wins Comparison: {} vs {} Seasons", a.name(), b.name())
}

pub fn run_diff_text(team: &str, season: Season, m: &RunDiffMetrics) -> String {
    format!(
        "After {} game(s), the {team} {season} season has a run differential of {}.\n\n\
         The current W% is {:.4},\n\
         Pythagorean W% is {:.4}, and\n\
         Pythagorean W% (BRef) is {:.4}.",
        m.games_played, m.run_diff, m.win_pct, m.pythag_pct, m.pythag_pct_bref
    )
}

pub fn run_diff_alt(team: &str, season: Season) -> String {
    format!(
        "A table showing various metrics for the {team} {season} season.\n\
         The table includes run differential, games remaining, and Pythagorean win percentage \
         using regular (2) & baseball-reference.com's (1.83) exponent values)."
    )
}

pub fn run_diff_title(team: &str, season: Season) -> String {
    format!("{season} {team} RunDiff Metrics")
}
