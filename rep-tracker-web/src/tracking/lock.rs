//! Person lock - keep counting one individual in a multi-person frame
//!
//! Lifecycle:
//!
//! ```text
//! UNLOCKED --lock()--> LOCKED --patience misses--> LOST
//!     ^                  ^  <------ match -----------'
//!     '----unlock()------+--------------------------'
//! ```
//!
//! While locked, every detected person is compared with the target
//! descriptor; the closest one within the match threshold is forwarded and
//! becomes the new target, so slow drift is followed.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::pose::{LandmarkFrame, Person, PersonDescriptor};

/// Whether tracking is free, attached, or has lost its target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LockState {
    Unlocked,
    Locked,
    Lost,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Unlocked => "UNLOCKED",
            LockState::Locked => "LOCKED",
            LockState::Lost => "LOST",
        }
    }
}

impl Default for LockState {
    fn default() -> Self {
        LockState::Unlocked
    }
}

/// One-shot lock changes, reported on the frame they happen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockEvent {
    Lost,
    Reacquired,
}

/// Matching parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LockConfig {
    /// Largest descriptor distance still treated as the same person
    pub match_threshold: f32,
    /// Consecutive unmatched frames before LOCKED becomes LOST
    pub patience: u32,
    pub centroid_weight: f32,
    pub size_weight: f32,
    /// Landmarks below this confidence are left out of descriptors
    pub confidence_floor: f32,
}

impl Default for LockConfig {
    fn default() -> Self {
        EngineConfig::default().lock_config()
    }
}

/// Outcome of filtering one frame
#[derive(Clone, Debug)]
pub struct LockVerdict<'a> {
    /// Landmarks to forward downstream, if any
    pub person: Option<&'a Person>,
    /// Distance of the best candidate while locked
    pub distance: Option<f32>,
    pub event: Option<LockEvent>,
}

/// Filters frames down to the locked individual
#[derive(Clone, Debug)]
pub struct PersonLockTracker {
    config: LockConfig,
    state: LockState,
    target: Option<PersonDescriptor>,
    /// Consecutive frames without a match while locked
    lost_frames: u32,
    /// Most prominent person of the latest non-empty frame
    last_descriptor: Option<PersonDescriptor>,
}

impl PersonLockTracker {
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            state: LockState::Unlocked,
            target: None,
            lost_frames: 0,
            last_descriptor: None,
        }
    }

    /// Attach to `descriptor`
    pub fn lock(&mut self, descriptor: PersonDescriptor) {
        log::info!(
            "person locked at ({:.2}, {:.2}) size {:.2}x{:.2}",
            descriptor.centroid_x,
            descriptor.centroid_y,
            descriptor.width,
            descriptor.height
        );
        self.target = Some(descriptor);
        self.state = LockState::Locked;
        self.lost_frames = 0;
    }

    /// Lock onto whoever was most prominent in the latest frame
    pub fn lock_current(&mut self) -> bool {
        match self.last_descriptor {
            Some(descriptor) => {
                self.lock(descriptor);
                true
            }
            None => false,
        }
    }

    /// Release the lock; every person is accepted again
    pub fn unlock(&mut self) {
        if self.state != LockState::Unlocked {
            log::info!("person lock released");
        }
        self.target = None;
        self.state = LockState::Unlocked;
        self.lost_frames = 0;
    }

    /// Decide which person's landmarks, if any, this frame forwards
    pub fn filter<'a>(&mut self, frame: &'a LandmarkFrame) -> LockVerdict<'a> {
        let candidates: Vec<(&'a Person, PersonDescriptor)> = frame
            .persons
            .iter()
            .filter_map(|p| PersonDescriptor::from_person(p, self.config.confidence_floor).map(|d| (p, d)))
            .filter(|(_, d)| d.is_finite())
            .collect();

        let prominent = candidates
            .iter()
            .fold(None::<&(&'a Person, PersonDescriptor)>, |best, c| match best {
                Some(b) if b.1.area() >= c.1.area() => Some(b),
                _ => Some(c),
            });
        if let Some((_, descriptor)) = prominent {
            self.last_descriptor = Some(*descriptor);
        }

        let target = match (self.state, self.target) {
            (LockState::Unlocked, _) | (_, None) => {
                return LockVerdict {
                    person: prominent.map(|(p, _)| *p),
                    distance: None,
                    event: None,
                };
            }
            (_, Some(target)) => target,
        };

        let best = candidates
            .iter()
            .map(|(p, d)| {
                let dist = target.distance(d, self.config.centroid_weight, self.config.size_weight);
                (*p, *d, dist)
            })
            .filter(|(_, _, dist)| dist.is_finite())
            .fold(None::<(&'a Person, PersonDescriptor, f32)>, |best, c| match best {
                Some(b) if b.2 <= c.2 => Some(b),
                _ => Some(c),
            });

        match best {
            Some((person, descriptor, dist)) if dist <= self.config.match_threshold => {
                let event = if self.state == LockState::Lost {
                    log::info!("locked person reacquired (distance {:.3})", dist);
                    Some(LockEvent::Reacquired)
                } else {
                    None
                };
                self.target = Some(descriptor);
                self.state = LockState::Locked;
                self.lost_frames = 0;
                LockVerdict { person: Some(person), distance: Some(dist), event }
            }
            _ => {
                self.lost_frames = self.lost_frames.saturating_add(1);
                let mut event = None;
                if self.state == LockState::Locked && self.lost_frames >= self.config.patience {
                    log::warn!("locked person lost after {} frames", self.lost_frames);
                    self.state = LockState::Lost;
                    event = Some(LockEvent::Lost);
                }
                LockVerdict {
                    person: None,
                    distance: best.map(|(_, _, dist)| dist),
                    event,
                }
            }
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn target(&self) -> Option<PersonDescriptor> {
        self.target
    }

    pub fn lost_frames(&self) -> u32 {
        self.lost_frames
    }

    pub fn last_descriptor(&self) -> Option<PersonDescriptor> {
        self.last_descriptor
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    /// A person as a 0.2 x 0.4 box of four confident corners around `center`
    fn person_at(center: (f32, f32)) -> Person {
        sized_person(center, 0.2, 0.4)
    }

    fn sized_person(center: (f32, f32), w: f32, h: f32) -> Person {
        let (cx, cy) = center;
        Person::new(vec![
            Landmark::new(cx - w / 2.0, cy - h / 2.0, 0.0, 0.9),
            Landmark::new(cx + w / 2.0, cy - h / 2.0, 0.0, 0.9),
            Landmark::new(cx - w / 2.0, cy + h / 2.0, 0.0, 0.9),
            Landmark::new(cx + w / 2.0, cy + h / 2.0, 0.0, 0.9),
        ])
    }

    fn frame(persons: Vec<Person>) -> LandmarkFrame {
        LandmarkFrame::new(0.0, persons)
    }

    fn descriptor_at(center: (f32, f32)) -> PersonDescriptor {
        PersonDescriptor::new(center, 0.2, 0.4)
    }

    #[test]
    fn test_unlocked_forwards_most_prominent() {
        let mut tracker = PersonLockTracker::new(LockConfig::default());
        let small = sized_person((0.2, 0.5), 0.1, 0.2);
        let large = sized_person((0.7, 0.5), 0.3, 0.6);
        let f = frame(vec![small, large.clone()]);

        let verdict = tracker.filter(&f);
        assert_eq!(verdict.person, Some(&large));
        let last = tracker.last_descriptor().unwrap();
        assert!((last.centroid_x - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_locked_follows_target_among_others() {
        let mut tracker = PersonLockTracker::new(LockConfig::default());
        tracker.lock(descriptor_at((0.5, 0.5)));

        let target = person_at((0.52, 0.5));
        let bystander = sized_person((0.1, 0.5), 0.4, 0.8);
        let f = frame(vec![bystander, target.clone()]);

        let verdict = tracker.filter(&f);
        assert_eq!(verdict.person, Some(&target));
        assert_eq!(tracker.state(), LockState::Locked);
        // Target drifts with the match
        assert!((tracker.target().unwrap().centroid_x - 0.52).abs() < 1e-5);
    }

    #[test]
    fn test_far_candidate_is_withheld_until_lost() {
        let config = LockConfig { patience: 3, ..LockConfig::default() };
        let mut tracker = PersonLockTracker::new(config);
        tracker.lock(descriptor_at((0.5, 0.5)));

        let f = frame(vec![person_at((0.9, 0.9))]);
        for _ in 0..2 {
            let v = tracker.filter(&f);
            assert!(v.person.is_none());
            assert!(v.event.is_none());
            assert_eq!(tracker.state(), LockState::Locked);
        }

        let v = tracker.filter(&f);
        assert_eq!(v.event, Some(LockEvent::Lost));
        assert_eq!(tracker.state(), LockState::Lost);

        // Idempotent: no second Lost event
        for _ in 0..5 {
            let v = tracker.filter(&f);
            assert!(v.event.is_none());
            assert!(v.person.is_none());
        }
        assert_eq!(tracker.state(), LockState::Lost);
    }

    #[test]
    fn test_lost_reacquires_on_match() {
        let config = LockConfig { patience: 1, ..LockConfig::default() };
        let mut tracker = PersonLockTracker::new(config);
        tracker.lock(descriptor_at((0.5, 0.5)));

        tracker.filter(&LandmarkFrame::empty(0.0));
        assert_eq!(tracker.state(), LockState::Lost);

        let back = person_at((0.5, 0.5));
        let f = frame(vec![back.clone()]);
        let v = tracker.filter(&f);
        assert_eq!(v.person, Some(&back));
        assert_eq!(v.event, Some(LockEvent::Reacquired));
        assert_eq!(tracker.state(), LockState::Locked);
        assert_eq!(tracker.lost_frames(), 0);
    }

    #[test]
    fn test_unlock_accepts_everyone() {
        let config = LockConfig { patience: 1, ..LockConfig::default() };
        let mut tracker = PersonLockTracker::new(config);
        tracker.lock(descriptor_at((0.5, 0.5)));
        tracker.filter(&LandmarkFrame::empty(0.0));
        assert_eq!(tracker.state(), LockState::Lost);

        tracker.unlock();
        let stranger = person_at((0.9, 0.9));
        let f = frame(vec![stranger.clone()]);
        assert_eq!(tracker.filter(&f).person, Some(&stranger));
        assert_eq!(tracker.state(), LockState::Unlocked);
    }

    #[test]
    fn test_lock_current_uses_last_descriptor() {
        let mut tracker = PersonLockTracker::new(LockConfig::default());
        assert!(!tracker.lock_current());

        tracker.filter(&frame(vec![person_at((0.3, 0.4))]));
        // Empty frames keep the last seen person available
        tracker.filter(&LandmarkFrame::empty(0.0));
        assert!(tracker.lock_current());
        assert_eq!(tracker.state(), LockState::Locked);
        assert!((tracker.target().unwrap().centroid_y - 0.4).abs() < 1e-5);
    }
}
