use crate::bodies::{Body, LoadState, Pose};
use crate::core::config::ProximityConfig;
use crate::core::storage::Storage;
use crate::core::{
    BodyHandle, BodyLoader, BodyStorage, Notification, NotificationSink, ObserverHandle,
    ObserverSnapshot,
};
use crate::math::{within_distance_xz, Real, Vector3};
use crate::Result;

use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

type WatchMap = HashMap<BodyHandle, HashSet<ObserverHandle>>;

/// Decides which bodies are resident and which observers watch them.
///
/// Owned by a single world and driven once per tick from the tick thread:
/// [`determine_load_and_unload`](Self::determine_load_and_unload) first, then
/// [`update_watchers_and_notify`](Self::update_watchers_and_notify).
#[derive(Debug)]
pub struct ProximityController {
    config: ProximityConfig,
    watching: WatchMap,
}

impl ProximityController {
    pub fn new(config: ProximityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            watching: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Observers currently watching `body`, as of the last update
    pub fn watchers(&self, body: BodyHandle) -> Option<&HashSet<ObserverHandle>> {
        self.watching.get(&body)
    }

    /// Queues load, background-load and unload intents for every known body.
    ///
    /// Resident bodies are placed by their tick pose and the others by their
    /// persisted placement. A resident body is only released once no
    /// observer is within `unload_distance`, leaving a band between the load
    /// and unload thresholds where nothing changes.
    pub fn determine_load_and_unload(
        &self,
        bodies: &BodyStorage<Body>,
        observers: &[ObserverSnapshot],
        loader: &mut impl BodyLoader,
    ) {
        let config = &self.config;
        for handle in bodies.handles() {
            let Some(body) = bodies.get(handle) else {
                continue;
            };
            let position = body.position();
            let near = |distance: Real| any_within(observers, position, distance);

            match body.load_state() {
                LoadState::Unloaded => {
                    if near(config.load_distance) {
                        debug!("queueing load of {:?}", handle);
                        loader.queue_load(handle);
                    } else if near(config.background_load_distance) {
                        debug!("queueing background load of {:?}", handle);
                        loader.queue_load_background(handle);
                    }
                }
                LoadState::BackgroundLoaded => {
                    if near(config.load_distance) {
                        debug!("promoting {:?} to full load", handle);
                        loader.queue_load(handle);
                    } else if !near(config.unload_distance) {
                        debug!("queueing unload of background body {:?}", handle);
                        loader.queue_unload(handle);
                    }
                }
                LoadState::Loaded => {
                    if !near(config.unload_distance) {
                        debug!("queueing unload of {:?}", handle);
                        loader.queue_unload(handle);
                    }
                }
            }
        }
    }

    /// Recomputes watcher sets for loaded bodies and sends the difference.
    ///
    /// Per observer, messages go out in this order: state transfer and spawn
    /// for new watches, unloads for dropped watches, then a single batched
    /// index update covering every body it kept watching. Observers missing
    /// from `observers` receive nothing and are dropped from every set.
    pub fn update_watchers_and_notify(
        &mut self,
        bodies: &mut BodyStorage<Body>,
        observers: &[ObserverSnapshot],
        tick: u64,
        sink: &mut impl NotificationSink,
    ) {
        let new_watching = self.compute_watching(bodies, observers);
        let connected: HashSet<ObserverHandle> = observers.iter().map(|o| o.handle).collect();

        self.send_spawns(bodies, &new_watching, tick, sink);
        self.send_unloads(&new_watching, &connected, tick, sink);
        self.send_index_updates(bodies, &new_watching, sink);

        self.watching = new_watching;

        for handle in bodies.handles() {
            let Some(body) = bodies.get_mut(handle) else {
                continue;
            };
            let watchers = self
                .watching
                .get(&handle)
                .map(sorted)
                .unwrap_or_default();
            body.set_watchers(watchers);
        }
    }

    fn compute_watching(&self, bodies: &BodyStorage<Body>, observers: &[ObserverSnapshot]) -> WatchMap {
        let positions: HashMap<ObserverHandle, Vector3> =
            observers.iter().map(|o| (o.handle, o.position)).collect();

        let mut new_watching = WatchMap::new();
        for (handle, body) in bodies.iter() {
            if body.load_state() != LoadState::Loaded {
                continue;
            }
            let body_position = body.transform().position();

            // Keep previous watchers that are still connected and inside the unwatch band.
            let mut watchers: HashSet<ObserverHandle> = self
                .watching
                .get(&handle)
                .into_iter()
                .flatten()
                .filter(|observer| {
                    positions.get(*observer).is_some_and(|&p| {
                        within_distance_xz(p, body_position, self.config.unwatch_distance)
                    })
                })
                .copied()
                .collect();

            watchers.extend(
                observers
                    .iter()
                    .filter(|o| within_distance_xz(o.position, body_position, self.config.watch_distance))
                    .map(|o| o.handle),
            );

            new_watching.insert(handle, watchers);
        }
        new_watching
    }

    fn send_spawns(
        &self,
        bodies: &BodyStorage<Body>,
        new_watching: &WatchMap,
        tick: u64,
        sink: &mut impl NotificationSink,
    ) {
        for (handle, watchers) in ordered(new_watching) {
            let Some(body) = bodies.get(handle) else {
                continue;
            };
            let previous = self.watching.get(&handle);
            let newcomers: BTreeSet<ObserverHandle> = watchers
                .iter()
                .filter(|o| previous.map_or(true, |p| !p.contains(*o)))
                .copied()
                .collect();
            if newcomers.is_empty() {
                continue;
            }

            debug!("{:?} gained watchers {:?}", handle, newcomers);
            let pose = body.transform().current_tick().as_ref().clone();
            for observer in newcomers {
                sink.send(
                    observer,
                    Notification::StateTransfer {
                        body: handle,
                        cells: body.cells().clone(),
                    },
                );
                sink.send(
                    observer,
                    Notification::Spawn {
                        body: handle,
                        pose: pose.clone(),
                        tick,
                    },
                );
            }
        }
    }

    fn send_unloads(
        &self,
        new_watching: &WatchMap,
        connected: &HashSet<ObserverHandle>,
        tick: u64,
        sink: &mut impl NotificationSink,
    ) {
        for (handle, old_watchers) in ordered(&self.watching) {
            let current = new_watching.get(&handle);
            let leavers: BTreeSet<ObserverHandle> = old_watchers
                .iter()
                .filter(|o| connected.contains(*o))
                .filter(|o| current.map_or(true, |c| !c.contains(*o)))
                .copied()
                .collect();
            if leavers.is_empty() {
                continue;
            }

            debug!("{:?} lost watchers {:?}", handle, leavers);
            for observer in leavers {
                sink.send(observer, Notification::Unload { body: handle, tick });
            }
        }
    }

    fn send_index_updates(
        &self,
        bodies: &BodyStorage<Body>,
        new_watching: &WatchMap,
        sink: &mut impl NotificationSink,
    ) {
        let mut batches: BTreeMap<ObserverHandle, Vec<(BodyHandle, Pose)>> = BTreeMap::new();
        for (handle, watchers) in ordered(new_watching) {
            let (Some(body), Some(previous)) = (bodies.get(handle), self.watching.get(&handle)) else {
                continue;
            };
            for observer in watchers.intersection(previous) {
                batches
                    .entry(*observer)
                    .or_default()
                    .push((handle, body.transform().current_tick().as_ref().clone()));
            }
        }

        for (observer, entries) in batches {
            if !entries.is_empty() {
                sink.send(observer, Notification::IndexUpdate { entries });
            }
        }
    }
}

fn any_within(observers: &[ObserverSnapshot], position: Vector3, distance: Real) -> bool {
    observers
        .iter()
        .any(|o| within_distance_xz(o.position, position, distance))
}

fn sorted(set: &HashSet<ObserverHandle>) -> Vec<ObserverHandle> {
    let mut v: Vec<_> = set.iter().copied().collect();
    v.sort_unstable();
    v
}

fn ordered(map: &WatchMap) -> BTreeMap<BodyHandle, &HashSet<ObserverHandle>> {
    map.iter().map(|(h, s)| (*h, s)).collect()
}
