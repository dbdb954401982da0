use std::env;

use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use capbot::sim::GridGame;
use capbot::{Agent, GameView, RolloutPlanner, Side, create_team};

// 20x9 demo board: red owns the left half, blue the right. One potion and
// a handful of food cells per side.
const DEMO_LAYOUT: &str = "%%%%%%%%%%%%%%%%%%%%\n\
                           %0 . %    %%   % .1%\n\
                           %2 % . %     o %  3%\n\
                           %  % %  . .  % %%  %\n\
                           % .    %%  %%    . %\n\
                           %  %% %  . .  % %  %\n\
                           %  % o     % .  %  %\n\
                           %.  %   %%    % . %%\n\
                           %%%%%%%%%%%%%%%%%%%%";

const SENSOR_RANGE: i32 = 5;

fn get_env_var_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.parse::<u64>().ok())
}

fn get_env_var_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|val| val.parse::<u32>().ok())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("capbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let seed = get_env_var_u64("CAPBOT_SEED");
    let turns = get_env_var_u32("CAPBOT_TURNS").unwrap_or(300);
    let repetitions = get_env_var_u32("CAPBOT_ROLLOUTS").unwrap_or(RolloutPlanner::default().repetitions);
    let depth = get_env_var_u32("CAPBOT_DEPTH").unwrap_or(RolloutPlanner::default().depth);
    let planner = RolloutPlanner::new(repetitions, depth);

    let mut game = GridGame::parse(DEMO_LAYOUT, Some(SENSOR_RANGE));
    tracing::info!(turns, repetitions, depth, ?seed, "starting self-play match");

    // Standard seating: red holds the even indices, blue the odd ones.
    let (red_offense, red_defense) = create_team(0, 2, Side::Red, seed);
    let (blue_offense, blue_defense) = create_team(1, 3, Side::Blue, seed.map(|s| s.wrapping_add(100)));
    let mut agents = vec![red_offense, blue_offense, red_defense, blue_defense];
    agents.sort_by_key(|agent| agent.index());

    for agent in &mut agents {
        if let Agent::Offense(offense) = agent {
            offense.planner = planner;
        }
        let side = game.side_of(agent.index());
        agent.on_game_start(&game.as_seen_by(side));
    }

    for turn in 0..turns {
        for agent in &mut agents {
            let index = agent.index();
            let side = game.side_of(index);
            let view = game.as_seen_by(side);
            let mv = agent.choose_move(&view);
            tracing::debug!(turn, index, ?side, ?mv, "move");
            game = game.apply_move(index, mv);
        }
        if game.resources_for(Side::Red).is_empty() || game.resources_for(Side::Blue).is_empty() {
            tracing::info!(turn, "one side is out of resources");
            break;
        }
    }

    tracing::info!(
        red = game.score(Side::Red),
        blue = game.score(Side::Blue),
        "final score"
    );
    Ok(())
}
