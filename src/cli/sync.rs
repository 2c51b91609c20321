use std::path::Path;

use tabled::Table;

use crate::{
    config::Config,
    error, info,
    itunes::ItunesClient,
    resolver::TrackResolver,
    spotify::SpotifyClient,
    success,
    sync::{self, SyncOptions},
    utils, warning,
};

pub async fn sync(file: &Path, dry_run: bool) {
    // configuration problems must surface before any request is made
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    let path = utils::resolve_reference_path(file);
    info!("Reading track file {}...", path.display());
    let lines = match sync::read_reference_lines(&path).await {
        Ok(lines) => lines,
        Err(e) => error!("{}", e),
    };

    let spotify = match SpotifyClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };
    let resolver = TrackResolver::new(spotify.clone(), ItunesClient::from_env());

    let options = SyncOptions {
        playlist_id: config.playlist_id.clone(),
        dry_run,
    };

    let (summary, report) = match sync::run(&options, &spotify, &resolver, &lines).await {
        Ok(outcome) => outcome,
        Err(e) => error!("{}", e),
    };

    let unresolved = utils::unresolved_table_rows(&report);
    if !unresolved.is_empty() {
        warning!("{} reference(s) could not be resolved:", unresolved.len());
        let table = Table::new(unresolved);
        println!("{}", table);
    }

    let table = Table::new(vec![utils::summary_table_row(&summary)]);
    println!("{}", table);

    success!("Done.");
}
