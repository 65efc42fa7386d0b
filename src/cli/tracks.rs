use crate::{
    cli::{connect, spinner},
    config::Config,
    error,
    resolve::TrackResolver,
    success, warning,
};

pub async fn track_uri(config: &Config, artist: &str, song: &str) {
    let resolver = TrackResolver::new(connect(config).await);

    let pb = spinner(format!("Searching for '{}' by {}...", song, artist));
    let found = resolver.resolve(artist, song).await;
    pb.finish_and_clear();

    match found {
        Ok(Some(track)) => match &track.uri {
            Some(uri) => {
                success!("{} - {}", track.artist_names(), track.name);
                println!("{}", uri);
            }
            None => warning!("Track '{}' has no URI", track.name),
        },
        Ok(None) => warning!("No track found for '{}' by {}", song, artist),
        Err(e) => error!("Search failed. Err: {}", e),
    }
}
