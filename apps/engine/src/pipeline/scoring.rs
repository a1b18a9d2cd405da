//! Track scoring against audio-feature targets

use std::cmp::Ordering;

use crate::models::{CandidateTrack, MusicParameters};

/// Best possible match score
pub const MAX_SCORE: f64 = 100.0;

/// Tempo distances are normalized by the full supported BPM span
const TEMPO_SPAN: f64 = 200.0;

/// Score how well a track matches the feature targets
///
/// Starts from [`MAX_SCORE`] and subtracts weighted absolute distances:
/// energy and valence weigh 25 each, tempo 20 (normalized by
/// [`TEMPO_SPAN`]), and danceability, acousticness and instrumentalness
/// 10 each. The result is floored at 0. A fully enriched exact match
/// scores 100; a neutral unenriched track lands mid-range.
pub fn match_score(track: &CandidateTrack, params: &MusicParameters) -> f64 {
    let penalty = 25.0 * (track.energy - params.target_energy).abs()
        + 25.0 * (track.valence - params.target_valence).abs()
        + 20.0 * ((track.tempo - params.target_tempo).abs() / TEMPO_SPAN)
        + 10.0 * (track.danceability - params.target_danceability).abs()
        + 10.0 * (track.acousticness - params.target_acousticness).abs()
        + 10.0 * (track.instrumentalness - params.target_instrumentalness).abs();

    (MAX_SCORE - penalty).max(0.0)
}

/// Sort tracks by descending match score
///
/// The sort is stable, so tracks with equal scores keep their catalog
/// ranking order.
pub fn rank_tracks(tracks: &mut [CandidateTrack], params: &MusicParameters) {
    let mut scored: Vec<(f64, usize)> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| (match_score(t, params), i))
        .collect();

    // Descending by score; equal scores fall back to original index
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let reordered: Vec<CandidateTrack> = scored
        .iter()
        .map(|&(_, i)| tracks[i].clone())
        .collect();
    tracks.clone_from_slice(&reordered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawMusicPayload, NEUTRAL_FEATURE, NEUTRAL_TEMPO};

    fn candidate(id: &str, energy: f64, valence: f64, tempo: f64) -> CandidateTrack {
        CandidateTrack {
            id: id.to_string(),
            name: format!("Track {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            uri: format!("spotify:track:{}", id),
            energy,
            valence,
            tempo,
            danceability: NEUTRAL_FEATURE,
            acousticness: NEUTRAL_FEATURE,
            instrumentalness: NEUTRAL_FEATURE,
        }
    }

    fn params(energy: f64, valence: f64, tempo: f64) -> MusicParameters {
        MusicParameters::from_raw(RawMusicPayload {
            target_energy: Some(energy),
            target_valence: Some(valence),
            target_tempo: Some(tempo),
            target_danceability: Some(NEUTRAL_FEATURE),
            target_acousticness: Some(NEUTRAL_FEATURE),
            target_instrumentalness: Some(NEUTRAL_FEATURE),
            ..Default::default()
        })
    }

    #[test]
    fn test_exact_match_scores_max() {
        let p = params(0.8, 0.9, 128.0);
        let t = CandidateTrack {
            danceability: p.target_danceability,
            acousticness: p.target_acousticness,
            instrumentalness: p.target_instrumentalness,
            ..candidate("t1", 0.8, 0.9, 128.0)
        };
        assert!((match_score(&t, &p) - MAX_SCORE).abs() < 1e-9);
    }

    #[test]
    fn test_closer_track_scores_higher() {
        let p = params(0.9, 0.9, 140.0);
        let close = candidate("close", 0.85, 0.88, 138.0);
        let far = candidate("far", 0.2, 0.3, 70.0);
        assert!(match_score(&close, &p) > match_score(&far, &p));
    }

    #[test]
    fn test_score_floors_at_zero() {
        // Maximal distance on every dimension pushes the penalty past 100
        let p = params(1.0, 1.0, 200.0);
        let t = CandidateTrack {
            danceability: 1.0,
            acousticness: 1.0,
            instrumentalness: 1.0,
            ..candidate("t1", 0.0, 0.0, 60.0)
        };
        let p = MusicParameters {
            target_danceability: 0.0,
            target_acousticness: 0.0,
            target_instrumentalness: 0.0,
            ..p
        };
        assert!(match_score(&t, &p) >= 0.0);
        assert!(match_score(&t, &p) < 1e-9);
    }

    #[test]
    fn test_rank_descending() {
        let p = params(0.9, 0.9, 140.0);
        let mut tracks = vec![
            candidate("far", 0.1, 0.2, 70.0),
            candidate("close", 0.9, 0.9, 140.0),
            candidate("mid", 0.6, 0.6, 110.0),
        ];
        rank_tracks(&mut tracks, &p);
        assert_eq!(tracks[0].id, "close");
        assert_eq!(tracks[1].id, "mid");
        assert_eq!(tracks[2].id, "far");
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let p = params(NEUTRAL_FEATURE, NEUTRAL_FEATURE, NEUTRAL_TEMPO);
        // All neutral, so all scores are identical
        let mut tracks = vec![
            candidate("a", NEUTRAL_FEATURE, NEUTRAL_FEATURE, NEUTRAL_TEMPO),
            candidate("b", NEUTRAL_FEATURE, NEUTRAL_FEATURE, NEUTRAL_TEMPO),
            candidate("c", NEUTRAL_FEATURE, NEUTRAL_FEATURE, NEUTRAL_TEMPO),
        ];
        rank_tracks(&mut tracks, &p);
        let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
