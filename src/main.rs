use anyhow::{Context, Result};
use iive_map::{
    cli::{Cli, Commands, ViewArgs},
    config::Settings,
    logging,
    pipeline::{Selection, Session},
    report::{format_table, map_title, to_feature_collection, NO_DATA_MESSAGE},
    stat::{StatClient, StatQuery},
    error::IiveError,
    types::RegionFilter,
    ui::{Dashboard, SilentUi},
};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let settings = Settings::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            logging::init(Some(&settings.dashboard_log_file()?))?;
            run_dashboard(&settings)?;
        }

        Commands::Table { view } => {
            logging::init(settings.log_file.as_deref())?;
            let session = load_session(&settings)?;
            let selection = selection_from(&view);
            let snapshot = session.render(&selection)?;

            println!("{}\n", map_title(selection.year, &selection.region));
            if snapshot.records.is_empty() {
                println!("{}", NO_DATA_MESSAGE);
            } else {
                print!("{}", format_table(&snapshot.records));
            }
            if let Some(scale) = snapshot.scale {
                println!("\nScale: {} .. {}", scale.min, scale.max);
            }
        }

        Commands::Export { view, output } => {
            logging::init(settings.log_file.as_deref())?;
            let session = load_session(&settings)?;
            let snapshot = session.render(&selection_from(&view))?;

            let collection = to_feature_collection(&snapshot.records);
            let json = serde_json::to_string_pretty(&collection)
                .context("Failed to serialize GeoJSON")?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write {:?}", output))?;
            println!("Wrote {} counties to {:?}", snapshot.records.len(), output);
        }

        Commands::Years => {
            logging::init(settings.log_file.as_deref())?;
            let client = StatClient::new(&settings.api_url)?;
            let table = client.fetch_observations(&StatQuery::default())?;
            for year in &table.years {
                println!("{}", year);
            }
        }
    }

    Ok(())
}

fn load_session(settings: &Settings) -> Result<Session> {
    let start = Instant::now();
    let client = StatClient::new(&settings.api_url)?;
    let session = Session::load(
        &client,
        &StatQuery::default(),
        &settings.geojson,
        &settings.name_property,
        &mut SilentUi::new(),
    )?;
    tracing::info!("Loaded session in {:.1}s", start.elapsed().as_secs_f64());
    Ok(session)
}

fn run_dashboard(settings: &Settings) -> Result<()> {
    let mut app = Dashboard::new()?;
    let client = StatClient::new(&settings.api_url)?;

    let loaded = Session::load(
        &client,
        &StatQuery::default(),
        &settings.geojson,
        &settings.name_property,
        &mut app,
    );

    match loaded {
        Ok(session) => {
            app.run(&session)?;
            app.restore()
        }
        Err(err) => {
            tracing::error!("{}", err);
            let shown = app.fail(&err.to_string());
            load_failure(err, shown)
        }
    }
}

/// Outcome of a dashboard whose session failed to load: the load error,
/// unless restoring the terminal failed first
fn load_failure(err: IiveError, shown: Result<()>) -> Result<()> {
    shown?;
    Err(anyhow::Error::new(err).context("Failed to load data"))
}

fn selection_from(view: &ViewArgs) -> Selection {
    Selection {
        year: view.year,
        gender: view.gender,
        region: RegionFilter::from_selection(view.region.as_deref()),
    }
}
