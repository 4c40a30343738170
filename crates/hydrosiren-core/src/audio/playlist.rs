//! Shuffled hydration track rotation.
//!
//! A plain periodic reshuffle: every track is used exactly once per shuffle
//! epoch, and the permutation is redrawn when the cursor wraps. No
//! no-immediate-repeat guarantee across epoch boundaries.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<String>,
    order: Vec<usize>,
    cursor: usize,
    rng: Mcg128Xsl64,
}

impl Playlist {
    /// `seed` fixes the permutation sequence for reproducible runs.
    pub fn new(tracks: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let mut playlist = Self {
            order: (0..tracks.len()).collect(),
            tracks,
            cursor: 0,
            rng,
        };
        playlist.reshuffle();
        playlist
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn reshuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
    }

    /// The next track in the current epoch; reshuffles on wrap.
    pub fn next_track(&mut self) -> Option<String> {
        let index = *self.order.get(self.cursor)?;
        self.cursor += 1;
        if self.cursor >= self.order.len() {
            self.reshuffle();
        }
        self.tracks.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tracks() -> Vec<String> {
        vec!["a.mp3".into(), "b.mp3".into(), "c.mp3".into()]
    }

    #[test]
    fn each_track_once_per_epoch() {
        let mut playlist = Playlist::new(tracks(), Some(7));
        for _ in 0..4 {
            let epoch: HashSet<String> = (0..3).filter_map(|_| playlist.next_track()).collect();
            assert_eq!(epoch.len(), 3);
        }
    }

    #[test]
    fn seed_makes_rotation_reproducible() {
        let mut a = Playlist::new(tracks(), Some(42));
        let mut b = Playlist::new(tracks(), Some(42));
        for _ in 0..9 {
            assert_eq!(a.next_track(), b.next_track());
        }
    }

    #[test]
    fn single_track_always_yields_it() {
        let mut playlist = Playlist::new(vec!["only.mp3".into()], Some(1));
        for _ in 0..5 {
            assert_eq!(playlist.next_track().as_deref(), Some("only.mp3"));
        }
    }

    #[test]
    fn empty_playlist_yields_none() {
        let mut playlist = Playlist::new(Vec::new(), Some(1));
        assert_eq!(playlist.next_track(), None);
    }
}
