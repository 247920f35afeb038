use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::IconEntry;
use crate::host::{DockChild, DockHost, IconId, IconProvider, Subscription};
use crate::input::{EngineEvent, EventQueue, InteractionKind};

/// Cached icon discovery.
///
/// Walking the host's children is the expensive part of a tick, so the
/// discovered list is reused for up to `cache_frames` ticks. Discovery is
/// forced when the cache is empty, while dragging (drags reorder icons),
/// after an explicit [`invalidate`](Self::invalidate), and lazily after a
/// host removal notification.
///
/// Animation state survives rediscovery: entries are matched by
/// [`IconId`] and carry their current/target values over.
pub struct IconRegistry {
    cache: Vec<IconEntry>,
    valid: bool,
    /// Snapshot calls since the last discovery.
    age: u32,
    cache_frames: u32,
    include_show_apps: bool,
    invalidated: bool,
    /// Set from host callbacks; read at the next snapshot.
    stale: Rc<Cell<bool>>,
    subscriptions: FxHashMap<IconId, Vec<Subscription>>,
    events: Option<EventQueue>,
    discoveries: usize,
    last_discovered: bool,
}

impl IconRegistry {
    /// Empty registry reusing a discovery for up to `cache_frames` ticks.
    pub fn new(cache_frames: u32, include_show_apps: bool) -> Self {
        Self {
            cache: Vec::new(),
            valid: false,
            age: 0,
            cache_frames,
            include_show_apps,
            invalidated: false,
            stale: Rc::new(Cell::new(false)),
            subscriptions: FxHashMap::default(),
            events: None,
            discoveries: 0,
            last_discovered: false,
        }
    }

    /// Forward icon removals and drags to `queue`.
    #[must_use]
    pub fn with_events(mut self, queue: EventQueue) -> Self {
        self.events = Some(queue);
        self
    }

    /// Current icon list, rediscovering when the cache may not be
    /// trusted. `spacing` seeds the slot length of new icons.
    pub fn snapshot(
        &mut self,
        dock: &dyn DockHost,
        spacing: f32,
        dragging: bool,
    ) -> &mut [IconEntry] {
        self.age = self.age.saturating_add(1);
        let rediscover = !self.valid
            || self.cache.is_empty()
            || dragging
            || self.invalidated
            || self.stale.get()
            || self.age > self.cache_frames;
        self.last_discovered = rediscover;
        if rediscover {
            self.discover(dock, spacing);
        }
        &mut self.cache
    }

    fn discover(&mut self, dock: &dyn DockHost, spacing: f32) {
        self.stale.set(false);
        self.invalidated = false;
        self.age = 0;
        self.valid = true;
        self.discoveries += 1;

        let mut skipped = 0usize;
        let mut providers: Vec<Rc<dyn IconProvider>> = Vec::new();
        for child in dock.children() {
            match child {
                DockChild::Icon(icon) => providers.push(icon),
                DockChild::Separator | DockChild::Other => skipped += 1,
            }
        }
        if self.include_show_apps {
            match dock.show_apps_icon() {
                Ok(Some(icon)) if icon.bounding_box().has_area() => {
                    providers.push(icon);
                }
                Ok(_) => {}
                Err(e) => log::trace!("show-apps icon unavailable: {e}"),
            }
        }

        let previous: FxHashMap<IconId, IconEntry> =
            self.cache.drain(..).map(|e| (e.id, e)).collect();
        let mut seen = FxHashSet::default();
        for provider in providers {
            let mut entry = IconEntry::new(provider, spacing);
            if !seen.insert(entry.id) {
                continue;
            }
            match previous.get(&entry.id) {
                Some(prev) => entry.carry_over(prev),
                None => self.subscribe(&entry),
            }
            self.cache.push(entry);
        }
        // Icons that vanished without a removal notification
        self.subscriptions.retain(|id, _| seen.contains(id));

        log::debug!(
            "discovered {} icon(s), skipped {skipped} non-icon child(ren)",
            self.cache.len()
        );
    }

    fn subscribe(&mut self, entry: &IconEntry) {
        if self.subscriptions.contains_key(&entry.id) {
            return;
        }
        let provider = &entry.provider;
        let mut subs = Vec::with_capacity(3);

        let stale = Rc::clone(&self.stale);
        let events = self.events.clone();
        subs.push(provider.on_destroy(Box::new(move || {
            stale.set(true);
            if let Some(q) = &events {
                q.push(EngineEvent::IconsChanged);
            }
        })));

        let stale = Rc::clone(&self.stale);
        let events = self.events.clone();
        subs.extend(provider.on_drag_begin(Box::new(move || {
            stale.set(true);
            if let Some(q) = &events {
                q.push(EngineEvent::Interaction(InteractionKind::DragBegin));
            }
        })));

        let events = self.events.clone();
        subs.extend(provider.on_drag_end(Box::new(move || {
            if let Some(q) = &events {
                q.push(EngineEvent::Interaction(InteractionKind::DragEnd));
            }
        })));

        self.subscriptions.insert(entry.id, subs);
    }

    /// Force rediscovery at the next snapshot.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Drop the cache and every host subscription.
    pub fn release(&mut self) {
        self.cache.clear();
        self.valid = false;
        self.events = None;
        for (_, subs) in self.subscriptions.drain() {
            for sub in subs {
                sub.dispose();
            }
        }
    }

    /// Cached entries without triggering discovery.
    pub fn entries(&self) -> &[IconEntry] {
        &self.cache
    }

    /// Total discoveries so far.
    pub const fn discoveries(&self) -> usize {
        self.discoveries
    }

    /// Whether the last snapshot rediscovered.
    pub const fn last_discovered(&self) -> bool {
        self.last_discovered
    }

    /// Snapshot calls since the last discovery.
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Number of icons with live host subscriptions.
    pub fn subscribed(&self) -> usize {
        self.subscriptions.len()
    }

    /// Change the reuse budget.
    pub fn set_cache_frames(&mut self, cache_frames: u32) {
        self.cache_frames = cache_frames;
    }

    /// Include or exclude the show-apps pseudo-icon from now on.
    pub fn set_include_show_apps(&mut self, include: bool) {
        if include != self.include_show_apps {
            self.include_show_apps = include;
            self.invalidated = true;
        }
    }
}

impl std::fmt::Debug for IconRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconRegistry")
            .field("icons", &self.cache.len())
            .field("age", &self.age)
            .field("cache_frames", &self.cache_frames)
            .field("discoveries", &self.discoveries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::host::sim::SimDock;
    use crate::options::DockEdge;

    const SPACING: f32 = 63.6;

    fn dock(count: usize) -> Rc<SimDock> {
        SimDock::with_icons(DockEdge::Bottom, Vec2::new(0.0, 1000.0), 48.0, count)
    }

    #[test]
    fn seventeen_ticks_with_budget_sixteen_rediscover_once() {
        let dock = dock(5);
        let mut registry = IconRegistry::new(16, true);
        registry.snapshot(&*dock, SPACING, false);
        let warm = registry.discoveries();
        for _ in 0..17 {
            registry.snapshot(&*dock, SPACING, false);
        }
        assert_eq!(registry.discoveries() - warm, 1);
    }

    #[test]
    fn cached_list_never_older_than_budget() {
        let dock = dock(3);
        let mut registry = IconRegistry::new(4, true);
        for _ in 0..50 {
            registry.snapshot(&*dock, SPACING, false);
            assert!(registry.age() <= 4);
        }
    }

    #[test]
    fn separators_are_filtered() {
        let dock = dock(2);
        dock.add_separator();
        dock.add_icon();
        let mut registry = IconRegistry::new(16, true);
        assert_eq!(registry.snapshot(&*dock, SPACING, false).len(), 3);
    }

    #[test]
    fn dragging_forces_discovery_every_tick() {
        let dock = dock(3);
        let mut registry = IconRegistry::new(16, true);
        registry.snapshot(&*dock, SPACING, false);
        for _ in 0..3 {
            registry.snapshot(&*dock, SPACING, true);
            assert!(registry.last_discovered());
        }
        assert_eq!(registry.discoveries(), 4);
    }

    #[test]
    fn drag_begin_forces_next_discovery() {
        let dock = dock(3);
        let mut registry = IconRegistry::new(16, true);
        registry.snapshot(&*dock, SPACING, false);
        registry.snapshot(&*dock, SPACING, false);
        assert!(!registry.last_discovered());

        dock.icon(1).unwrap().begin_drag();
        registry.snapshot(&*dock, SPACING, false);
        assert!(registry.last_discovered());
    }

    #[test]
    fn removal_invalidates_lazily() {
        let dock = dock(4);
        let queue = EventQueue::new();
        let mut registry = IconRegistry::new(16, true).with_events(queue.clone());
        registry.snapshot(&*dock, SPACING, false);
        assert_eq!(registry.subscribed(), 4);

        let gone = dock.icon(2).unwrap().id();
        dock.remove_icon(gone);
        // The live list is untouched until the next snapshot
        assert_eq!(registry.entries().len(), 4);
        assert_eq!(queue.drain(), vec![EngineEvent::IconsChanged]);

        let icons = registry.snapshot(&*dock, SPACING, false);
        assert_eq!(icons.len(), 3);
        assert!(icons.iter().all(|e| e.id != gone));
        assert_eq!(registry.subscribed(), 3);
    }

    #[test]
    fn state_carries_over_by_identity() {
        let dock = dock(2);
        let mut registry = IconRegistry::new(16, true);
        let icons = registry.snapshot(&*dock, SPACING, false);
        icons[1].current_scale = 1.4;
        let id = icons[1].id;
        registry.invalidate();
        let icons = registry.snapshot(&*dock, SPACING, false);
        let entry = icons.iter().find(|e| e.id == id).unwrap();
        assert_eq!(entry.current_scale, 1.4);
        assert!(registry.last_discovered());
    }

    #[test]
    fn show_apps_failure_is_swallowed() {
        let dock = dock(2);
        dock.set_show_apps(true);
        let mut registry = IconRegistry::new(16, true);
        assert_eq!(registry.snapshot(&*dock, SPACING, false).len(), 3);

        dock.fail_show_apps(true);
        registry.invalidate();
        assert_eq!(registry.snapshot(&*dock, SPACING, false).len(), 2);

        let mut without = IconRegistry::new(16, false);
        dock.fail_show_apps(false);
        assert_eq!(without.snapshot(&*dock, SPACING, false).len(), 2);
    }

    #[test]
    fn release_disposes_subscriptions() {
        let dock = dock(3);
        let queue = EventQueue::new();
        let mut registry = IconRegistry::new(16, true).with_events(queue.clone());
        registry.snapshot(&*dock, SPACING, false);
        registry.release();
        assert_eq!(registry.subscribed(), 0);
        assert!(registry.entries().is_empty());

        dock.icon(0).unwrap().destroy();
        assert!(queue.is_empty());
    }
}
