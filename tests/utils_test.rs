use spotmcp::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());

    // Deterministic for the same verifier
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // URL-safe base64 without padding
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_code_challenge_matches_rfc7636_example() {
    assert_eq!(
        generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_strip_track_uri() {
    assert_eq!(strip_track_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC"), "4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(strip_track_uri("4uLU6hMCjMI75M1A2tKUQC"), "4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(
        strip_track_uri("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc"),
        "4uLU6hMCjMI75M1A2tKUQC"
    );
    assert_eq!(strip_track_uri("  spotify:track:xyz  "), "xyz");
}

#[test]
fn test_strip_playlist_uri() {
    assert_eq!(strip_playlist_uri("spotify:playlist:37i9dQZF1DX"), "37i9dQZF1DX");
    assert_eq!(
        strip_playlist_uri("https://open.spotify.com/playlist/37i9dQZF1DX#top"),
        "37i9dQZF1DX"
    );
    // Other kinds are left alone
    assert_eq!(strip_playlist_uri("spotify:track:abc"), "spotify:track:abc");
}

#[test]
fn test_expect_id_checks_the_kind() {
    assert_eq!(expect_id("spotify:track:abc", "track").unwrap(), "abc");
    assert_eq!(expect_id("https://open.spotify.com/track/abc?si=1", "track").unwrap(), "abc");
    assert_eq!(expect_id("abc", "playlist").unwrap(), "abc");
    assert!(expect_id("spotify:album:abc", "track").is_err());
    assert!(expect_id("https://open.spotify.com/album/abc", "track").is_err());
    assert!(expect_id(" ", "track").is_err());
}

#[test]
fn test_uri_builders_are_idempotent() {
    assert_eq!(track_uri("abc"), "spotify:track:abc");
    assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
    assert_eq!(playlist_uri("p1"), "spotify:playlist:p1");
    assert_eq!(playlist_uri("spotify:playlist:p1"), "spotify:playlist:p1");
}

#[test]
fn test_true_shuffle_is_a_permutation() {
    let items: Vec<u32> = (0..100).collect();

    let mut shuffled = true_shuffle(items.clone());
    assert_eq!(shuffled.len(), items.len());

    shuffled.sort_unstable();
    assert_eq!(shuffled, items);
}

#[test]
fn test_true_shuffle_handles_tiny_inputs() {
    assert!(true_shuffle(Vec::<u32>::new()).is_empty());
    assert_eq!(true_shuffle(vec![7]), vec![7]);
}

#[test]
fn test_clamp_limit() {
    assert_eq!(clamp_limit(None, 20), 20);
    assert_eq!(clamp_limit(Some(0), 20), 1);
    assert_eq!(clamp_limit(Some(10), 20), 10);
    assert_eq!(clamp_limit(Some(500), 20), MAX_PAGE_LIMIT);
}
