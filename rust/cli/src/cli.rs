use arcade_floor::{GameId, Pick};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "arcade", version, about = "Arcade floor: casino and skill games on one bankroll")]
pub struct ArcadeCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play one round, reading actions from stdin
    Play {
        /// Game slug, see `arcade games`
        #[arg(value_parser = parse_game)]
        game: GameId,
        #[arg(long)]
        stake: f64,
        /// red/black/green for roulette, player/banker/tie for baccarat,
        /// nova/comet/eclipse for the derby
        #[arg(long, value_parser = parse_pick)]
        pick: Option<Pick>,
        /// Limbo target or auto cash-out multiplier
        #[arg(long)]
        target: Option<f64>,
        /// Mines on the board
        #[arg(long)]
        bombs: Option<u8>,
        /// Plinko entry lane
        #[arg(long)]
        lane: Option<usize>,
    },
    /// Show the bankroll
    Balance,
    /// Restore the starting credits
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Clear the stats record as well
        #[arg(long)]
        stats: bool,
    },
    /// Aggregate results across sessions
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Recent settlements, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show or set the display alias; an empty name clears it
    Alias { name: Option<String> },
    /// Display resolved configuration and where each value came from
    Cfg,
    /// List games with their stake limits
    Games,
}

fn parse_game(s: &str) -> Result<GameId, String> {
    s.parse()
}

fn parse_pick(s: &str) -> Result<Pick, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        ArcadeCli::command().debug_assert();
    }

    #[test]
    fn play_parses_options() {
        let cli = ArcadeCli::try_parse_from([
            "arcade", "play", "roulette", "--stake", "25", "--pick", "black",
        ])
        .unwrap();
        let Commands::Play {
            game, stake, pick, ..
        } = cli.cmd
        else {
            panic!("expected play");
        };
        assert_eq!(game, GameId::Roulette);
        assert_eq!(stake, 25.0);
        assert_eq!(pick, Some(Pick::Black));
    }

    #[test]
    fn unknown_game_is_rejected() {
        assert!(ArcadeCli::try_parse_from(["arcade", "play", "keno", "--stake", "10"]).is_err());
    }
}
