//! Single owner of the published activity bundle.
//!
//! Imports replace the bundle wholesale; fusion rewrites positions in place.
//! Observers are notified once after every successful change and never after
//! a failed one, which leaves the previous bundle untouched.

use super::alignment::{align_waypoints, AlignmentStats};
use super::types::{ActivityBundle, DecodedLog, Waypoint};
use crate::import::{self, ImportError};

/// A consumer of the published bundle (chart, map, summary panel).
///
/// `None` means "nothing loaded, hide the view".
pub trait ActivityObserver {
    fn update(&mut self, bundle: Option<&ActivityBundle>);
}

impl<F> ActivityObserver for F
where
    F: FnMut(Option<&ActivityBundle>),
{
    fn update(&mut self, bundle: Option<&ActivityBundle>) {
        self(bundle)
    }
}

/// Holds the current bundle and the observers that render it.
#[derive(Default)]
pub struct ActivityStore {
    bundle: Option<ActivityBundle>,
    observers: Vec<Box<dyn ActivityObserver>>,
}

impl ActivityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently published bundle.
    pub fn bundle(&self) -> Option<&ActivityBundle> {
        self.bundle.as_ref()
    }

    /// Register an observer. It is immediately told about the current state.
    pub fn subscribe<O>(&mut self, mut observer: O)
    where
        O: ActivityObserver + 'static,
    {
        observer.update(self.bundle.as_ref());
        self.observers.push(Box::new(observer));
    }

    /// Replace the bundle and notify observers.
    pub fn publish(&mut self, bundle: ActivityBundle) {
        self.bundle = Some(bundle);
        self.notify();
    }

    /// Drop the bundle and notify observers.
    pub fn clear(&mut self) {
        self.bundle = None;
        self.notify();
    }

    /// Decode FIT content and publish the resulting bundle.
    pub fn import_fit(&mut self, content: &[u8]) -> Result<&ActivityBundle, ImportError> {
        let bundle = import::import_fit(content)?;
        Ok(self.commit(bundle))
    }

    /// Publish a bundle built from an already decoded log.
    pub fn import_decoded(&mut self, log: DecodedLog) -> Result<&ActivityBundle, ImportError> {
        let bundle = import::build_bundle(log)?;
        Ok(self.commit(bundle))
    }

    /// Decode GPX content and fuse its track into the current bundle.
    pub fn fuse_gpx(&mut self, content: &[u8]) -> Result<AlignmentStats, ImportError> {
        if self.bundle.is_none() {
            return Err(ImportError::NoActivity);
        }
        let waypoints = import::gpx::parse_gpx(content)?;
        self.fuse_waypoints(&waypoints)
    }

    /// Fuse already decoded waypoints into the current bundle.
    pub fn fuse_waypoints(
        &mut self,
        waypoints: &[Waypoint],
    ) -> Result<AlignmentStats, ImportError> {
        let bundle = self.bundle.as_mut().ok_or(ImportError::NoActivity)?;
        let stats = align_waypoints(&mut bundle.samples, waypoints)?;

        tracing::info!(
            "Fused {} waypoints into {} samples",
            stats.waypoints,
            stats.samples
        );

        self.notify();
        Ok(stats)
    }

    fn commit(&mut self, bundle: ActivityBundle) -> &ActivityBundle {
        notify_all(&mut self.observers, Some(&bundle));
        self.bundle.insert(bundle)
    }

    fn notify(&mut self) {
        notify_all(&mut self.observers, self.bundle.as_ref());
    }
}

fn notify_all(observers: &mut [Box<dyn ActivityObserver>], bundle: Option<&ActivityBundle>) {
    for observer in observers {
        observer.update(bundle);
    }
}

impl std::fmt::Debug for ActivityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityStore")
            .field("bundle", &self.bundle.as_ref().map(|b| b.samples.len()))
            .field("observers", &self.observers.len())
            .finish()
    }
}
