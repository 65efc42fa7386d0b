use tabled::Table;

use crate::{
    cli::{connect, spinner},
    config::Config,
    error, info,
    resolve::{PlaylistResolver, ResolverSettings},
    success,
    types::{CandidateTableRow, PlaylistTableRow},
    warning,
};

pub async fn list_playlists(config: &Config) {
    let client = connect(config).await;
    let resolver = PlaylistResolver::new(client, ResolverSettings::from(config));

    let pb = spinner("Fetching playlists...");
    let playlists = match resolver.all_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot fetch playlists. Err: {}", e)
        }
    };
    pb.finish_and_clear();

    if playlists.is_empty() {
        warning!("No playlists found");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            owner: p
                .owner
                .and_then(|o| o.display_name)
                .unwrap_or_default(),
            tracks: p.tracks.map(|t| t.total).unwrap_or_default(),
            name: p.name,
            id: p.id,
        })
        .collect();

    let count = rows.len();
    println!("{}", Table::new(rows));
    success!("{} playlists", count);
}

/// Resolves `name` like the MCP tool does; with `candidates > 0` also prints
/// the closest names regardless of threshold.
pub async fn find_playlist(
    config: &Config,
    name: &str,
    threshold: Option<f64>,
    candidates: usize,
) {
    let client = connect(config).await;
    let resolver = PlaylistResolver::new(client, ResolverSettings::from(config));

    let pb = spinner(format!("Looking for playlist '{}'...", name));
    let resolved = resolver.resolve_with_candidates(name, threshold, candidates).await;
    pb.finish_and_clear();

    let (found, ranked) = match resolved {
        Ok(resolved) => resolved,
        Err(e) => error!("Cannot resolve playlist. Err: {}", e),
    };

    match found {
        Some(m) => {
            success!("{} ({:.2})", m.name, m.similarity);
            println!("{}", m.id);
        }
        None => warning!("No playlist matches '{}'", name),
    }

    if ranked.is_empty() {
        return;
    }

    info!("Closest playlist names:");
    let rows: Vec<CandidateTableRow> = ranked
        .into_iter()
        .map(|c| CandidateTableRow {
            name: c.name,
            similarity: format!("{:.2}", c.similarity),
            id: c.id,
        })
        .collect();
    println!("{}", Table::new(rows));
}
