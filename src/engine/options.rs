//! Runtime configuration changes.

use web_time::Duration;

use super::EngineInstance;
use crate::error::DockError;
use crate::input::EngineEvent;
use crate::options::{DockEdge, Options};

/// Partial option update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    /// Dock edge override.
    pub edge: Option<DockEdge>,
    /// Display scale override.
    pub scale_factor: Option<f32>,
    /// Unscaled icon size.
    pub base_icon_size: Option<f32>,
    /// Magnification strength.
    pub magnify_factor: Option<f32>,
    /// Inter-icon spread.
    pub spread_factor: Option<f32>,
    /// Lift of the nearest icon.
    pub rise_factor: Option<f32>,
    /// Hit radius in icon sizes.
    pub hit_radius_multiplier: Option<f32>,
    /// Frame-rate tier; changing it re-arms the tick interval.
    pub animation_fps: Option<u32>,
    /// Show-apps pseudo-icon inclusion.
    pub show_apps_icon: Option<bool>,
}

impl ConfigPatch {
    /// Write the set fields into `options`.
    pub fn apply_to(&self, options: &mut Options) {
        if let Some(edge) = self.edge {
            options.dock.edge = Some(edge);
        }
        if let Some(sf) = self.scale_factor {
            options.dock.scale_factor = Some(sf);
        }
        if let Some(size) = self.base_icon_size {
            options.dock.base_icon_size = size;
        }
        if let Some(show) = self.show_apps_icon {
            options.dock.show_apps_icon = show;
        }
        let m = &mut options.magnification;
        if let Some(v) = self.magnify_factor {
            m.magnify_factor = v;
        }
        if let Some(v) = self.spread_factor {
            m.spread_factor = v;
        }
        if let Some(v) = self.rise_factor {
            m.rise_factor = v;
        }
        if let Some(v) = self.hit_radius_multiplier {
            m.hit_radius_multiplier = v;
        }
        if let Some(fps) = self.animation_fps {
            options.smoothing.animation_fps = fps;
        }
    }
}

impl EngineInstance {
    /// Merge `patch` into the current options.
    pub fn on_config_change(
        &mut self,
        patch: &ConfigPatch,
    ) -> Result<(), DockError> {
        let mut options = self.options.clone();
        patch.apply_to(&mut options);
        self.set_options(options)
    }

    /// Replace the options wholesale. Values are sanitized first; the
    /// running tick loop picks them up on its next tick.
    pub fn set_options(&mut self, options: Options) -> Result<(), DockError> {
        if !self.is_attached() {
            return Err(DockError::NotAttached);
        }
        let options = options.sanitized();
        let old_interval = self.options.smoothing.tick_interval();
        let old_watch = self.options.throttle.position_watch_interval();
        self.options = options.clone();
        *self.pending_options.borrow_mut() = Some(options);
        self.apply_timers(old_interval, old_watch);
        self.events.push(EngineEvent::ConfigChanged);
        Ok(())
    }

    /// Push timer-related option changes to the scheduler.
    fn apply_timers(&self, old_interval: Duration, old_watch: Duration) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let interval = self.options.smoothing.tick_interval();
        if interval != old_interval {
            log::debug!(
                "animation interval {}ms -> {}ms",
                old_interval.as_millis(),
                interval.as_millis()
            );
            scheduler.rearm_loop(self.timers.animation, Some(interval));
        }
        let watch = self.options.throttle.position_watch_interval();
        if watch != old_watch {
            scheduler.rearm_loop(self.timers.position_watch, Some(watch));
        }
        if let Some(settle) = &self.settle {
            settle.set_delay(self.options.throttle.settle_delay());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_touches_only_set_fields() {
        let mut opts = Options::default();
        let patch = ConfigPatch {
            magnify_factor: Some(1.5),
            animation_fps: Some(3),
            ..ConfigPatch::default()
        };
        patch.apply_to(&mut opts);
        assert_eq!(opts.magnification.magnify_factor, 1.5);
        assert_eq!(opts.smoothing.animation_fps, 3);
        assert_eq!(opts.magnification.spread_factor, 0.5);
        assert_eq!(opts.dock.edge, None);
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut opts = Options::default();
        ConfigPatch::default().apply_to(&mut opts);
        assert_eq!(opts, Options::default());
    }
}
