//! Frame-counted sprite animation.
//!
//! Frames are generic so the kernel stays free of any image type; the demo
//! and games use `Arc<Image>` handles from the asset registry.

/// Default number of updates each frame stays on screen.
pub const DEFAULT_FRAMES_BETWEEN: u32 = 4;

/// A looping sequence of frames advanced once every `frames_between` updates.
#[derive(Debug, Clone)]
pub struct Track<F> {
    frames: Vec<F>,
    frames_between: u32,
    wait: u32,
    index: usize,
}

impl<F> Track<F> {
    pub fn new(frames: Vec<F>) -> Self {
        Self {
            frames,
            frames_between: DEFAULT_FRAMES_BETWEEN,
            wait: 0,
            index: 0,
        }
    }

    /// Zero is treated as one: the frame changes on every update.
    pub fn with_frames_between(mut self, frames_between: u32) -> Self {
        self.frames_between = frames_between.max(1);
        self
    }

    pub fn frames_between(&self) -> u32 {
        self.frames_between
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn update(&mut self) {
        self.wait += 1;
        if self.wait >= self.frames_between {
            self.wait = 0;
            self.index += 1;
            if self.index >= self.frames.len() {
                self.index = 0;
            }
        }
    }

    /// Current frame; `None` only for an empty track.
    pub fn current(&self) -> Option<&F> {
        self.frames.get(self.index)
    }

    pub fn rewind(&mut self) {
        self.wait = 0;
        self.index = 0;
    }
}

/// A set of tracks with one selected for display.
///
/// Every track advances on `update`, selected or not, so switching tracks
/// does not restart them.
#[derive(Debug, Clone)]
pub struct Animation<F> {
    tracks: Vec<Track<F>>,
    current: Option<usize>,
}

impl<F> Default for Animation<F> {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
        }
    }
}

impl<F> Animation<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track and return its index.
    pub fn add_track(&mut self, track: Track<F>) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Select the track at `index`. Returns `false` and keeps the current
    /// selection if there is no such track.
    pub fn set_track(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            tracing::debug!(index, tracks = self.tracks.len(), "no such animation track");
            return false;
        }
        self.current = Some(index);
        true
    }

    pub fn current_track(&self) -> Option<usize> {
        self.current
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn update(&mut self) {
        for track in &mut self.tracks {
            track.update();
        }
    }

    pub fn current(&self) -> Option<&F> {
        self.current.and_then(|i| self.tracks[i].current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_holds_each_frame_for_frames_between_updates() {
        let mut t = Track::new(vec!['a', 'b', 'c']);
        let mut seen = Vec::new();
        for _ in 0..12 {
            seen.push(*t.current().unwrap());
            t.update();
        }
        assert_eq!(seen.iter().collect::<String>(), "aaaabbbbcccc");
        assert_eq!(t.current(), Some(&'a'));
    }

    #[test]
    fn zero_frames_between_advances_every_update() {
        let mut t = Track::new(vec![1, 2]).with_frames_between(0);
        assert_eq!(t.frames_between(), 1);
        t.update();
        assert_eq!(t.current(), Some(&2));
        t.update();
        assert_eq!(t.current(), Some(&1));
    }

    #[test]
    fn empty_track_has_no_frame() {
        let mut t: Track<u8> = Track::new(Vec::new());
        for _ in 0..10 {
            t.update();
        }
        assert!(t.is_empty());
        assert_eq!(t.current(), None);
    }

    #[test]
    fn animation_without_selection_shows_nothing() {
        let mut anim = Animation::new();
        anim.add_track(Track::new(vec!["idle"]));
        assert_eq!(anim.current(), None);
        assert!(!anim.set_track(3));
        assert_eq!(anim.current_track(), None);
    }

    #[test]
    fn all_tracks_advance_while_one_is_shown() {
        let mut anim = Animation::new();
        let idle = anim.add_track(Track::new(vec!["idle0", "idle1"]).with_frames_between(1));
        let run = anim.add_track(Track::new(vec!["run0", "run1", "run2"]).with_frames_between(1));
        assert_eq!((idle, run), (0, 1));

        assert!(anim.set_track(idle));
        anim.update();
        assert_eq!(anim.current(), Some(&"idle1"));

        assert!(anim.set_track(run));
        assert_eq!(anim.current(), Some(&"run1"));
    }
}
