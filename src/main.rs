use clap::Parser;
use cooling_rank::{
    args::{Args, Command},
    database::{
        db::{DbClient, DbError},
        db_structs::RankColumns
    },
    model::{RankConfig, RankUpdater, TimeRule},
    utils::time_utils::parse_timestamp
};
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = RankConfig::new(args.initial, args.default_boost, args.cooling_rate);
    let columns = RankColumns::new(&args.table, &args.rank_column, &args.rank_time_column, &args.boost_column)?;

    let mut db = match DbClient::connect(&args.connection_string, columns).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            error!("Application cannot start without a valid database connection");
            return Err(e.into());
        }
    };

    match args.command {
        Command::Migrate => db.create_table().await?,
        Command::Create { boost, at } => {
            let updater = updater(config, at.as_deref())?;
            let state = updater.initialize_on_create(None);
            let id = db.insert_record(state, boost).await?;

            info!(record_id = id, score = state.score, "Record created");
            println!("{}", id);
        }
        Command::Heat { id, increment } => {
            let state = RankUpdater::new(config)?.heat(&db, id, increment).await?;
            println!("{}", serde_json::to_string(&state)?);
        }
        Command::Boost { id, increment } => {
            let state = RankUpdater::new(config)?.boost(&db, id, increment).await?;
            println!("{}", serde_json::to_string(&state)?);
        }
        Command::Show { id } => {
            let updater = RankUpdater::new(config)?;
            let record = db
                .get_record(id, |state| updater.current_score(state))
                .await?
                .ok_or(DbError::RecordNotFound(id))?;

            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// An updater whose records are stamped with `at` instead of the current time.
fn updater(config: RankConfig, at: Option<&str>) -> Result<RankUpdater, Box<dyn Error>> {
    let config = match at {
        Some(value) => config.with_time_rule(TimeRule::Constant(parse_timestamp(value)?)),
        None => config
    };

    Ok(RankUpdater::new(config)?)
}
