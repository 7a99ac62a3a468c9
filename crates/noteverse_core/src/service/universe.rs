//! Notes universe use-case service.
//!
//! # Responsibility
//! - Own the note store, camera and derived scene (instances + edges).
//! - Translate pointer, click and resize input into scene state changes.
//! - Advance per-frame state: group rotation, rebuild on store changes, hover.
//!
//! # Invariants
//! - Scene caches are rebuilt only from store change events, never by
//!   mutating notes through the scene.
//! - Deleting a note clears any selection or hover pointing at it.

use crate::config::{ConfigError, UniverseConfig};
use crate::graph::proximity::{build_edges, Edge};
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::runtime::frame_loop::FrameTick;
use crate::scene::hit::rotate_y;
use crate::scene::{
    build_instances, hit_test, pointer_to_ndc, Camera, HoverChange, HoverTracker, SceneError,
    SphereInstance,
};
use crate::store::backend::SnapshotBackend;
use crate::store::note_store::NoteStore;
use crate::store::StoreError;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum UniverseError {
    Config(ConfigError),
    Store(StoreError),
    Scene(SceneError),
}

impl Display for UniverseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Scene(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UniverseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Scene(err) => Some(err),
        }
    }
}

impl From<ConfigError> for UniverseError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for UniverseError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SceneError> for UniverseError {
    fn from(value: SceneError) -> Self {
        Self::Scene(value)
    }
}

/// Result of a click in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A note was hit; the camera now focuses it and its panel opens.
    Focused(NoteId),
    /// Empty space was hit; any open panel closes.
    Closed,
}

/// What changed during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Instances and edges were rebuilt from store changes.
    pub rebuilt: bool,
    pub hover: Option<HoverChange>,
    pub rotation_y: f64,
}

pub struct Universe<B: SnapshotBackend, R: Rng = StdRng> {
    config: UniverseConfig,
    store: NoteStore<B, R>,
    camera: Camera,
    viewport: (u32, u32),
    pointer_ndc: Option<(f64, f64)>,
    hover: HoverTracker,
    selected: Option<NoteId>,
    rotation_y: f64,
    instances: Vec<SphereInstance>,
    edges: Vec<Edge>,
}

impl<B: SnapshotBackend> Universe<B, StdRng> {
    /// Opens a universe over `backend`, loading or seeding the notes.
    ///
    /// Uses `config.seed` for reproducible placement when present.
    pub fn open(
        backend: B,
        config: UniverseConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, UniverseError> {
        config.validate()?;
        let store = match config.seed {
            Some(seed) => NoteStore::seeded(backend, config.storage_key.clone(), seed),
            None => NoteStore::new(backend, config.storage_key.clone()),
        };
        Self::with_store(store, config, width, height)
    }
}

impl<B: SnapshotBackend, R: Rng> Universe<B, R> {
    /// Builds a universe around an existing, not yet loaded store.
    pub fn with_store(
        mut store: NoteStore<B, R>,
        config: UniverseConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, UniverseError> {
        config.validate()?;
        let camera = Camera::new(config.camera_distance, width, height)?;
        store.load()?;

        let mut universe = Self {
            config,
            store,
            camera,
            viewport: (width, height),
            pointer_ndc: None,
            hover: HoverTracker::new(),
            selected: None,
            rotation_y: 0.0,
            instances: Vec::new(),
            edges: Vec::new(),
        };
        universe.store.take_changes();
        universe.rebuild_scene();
        info!(
            "event=universe_open module=service status=ok notes={} edges={}",
            universe.instances.len(),
            universe.edges.len()
        );
        Ok(universe)
    }

    pub fn create_note(&mut self, draft: NoteDraft) -> Result<Note, UniverseError> {
        let note = self.store.create(draft)?;
        info!(
            "event=note_create module=service status=ok id={} count={}",
            note.id,
            self.store.len()
        );
        Ok(note)
    }

    pub fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> Result<Note, UniverseError> {
        Ok(self.store.update(id, patch)?)
    }

    /// Deletes a note; unknown ids are a silent no-op.
    pub fn delete_note(&mut self, id: NoteId) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.hover.forget(id);
            if self.selected == Some(id) {
                self.selected = None;
                self.camera.reset();
            }
            info!("event=note_delete module=service status=ok id={id}");
        }
        removed
    }

    /// Records the pointer position in viewport pixels.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> Result<(), UniverseError> {
        let (width, height) = self.viewport;
        self.pointer_ndc = Some(pointer_to_ndc(x, y, width, height)?);
        Ok(())
    }

    pub fn pointer_left(&mut self) {
        self.pointer_ndc = None;
    }

    /// Selects and focuses the note under the pointer, or closes the panel.
    pub fn clicked(&mut self, x: f64, y: f64) -> Result<ClickOutcome, UniverseError> {
        let (width, height) = self.viewport;
        let (ndc_x, ndc_y) = pointer_to_ndc(x, y, width, height)?;
        let ray = self.camera.ray_from_ndc(ndc_x, ndc_y);

        match hit_test(&ray, &self.instances, self.rotation_y) {
            Some(hit) => {
                if let Some(instance) = self.instances.iter().find(|item| item.id == hit.id) {
                    self.camera
                        .focus_on(rotate_y(instance.center, self.rotation_y));
                }
                self.selected = Some(hit.id);
                debug!("event=note_focus module=service status=ok id={}", hit.id);
                Ok(ClickOutcome::Focused(hit.id))
            }
            None => {
                self.selected = None;
                self.camera.reset();
                Ok(ClickOutcome::Closed)
            }
        }
    }

    pub fn resized(&mut self, width: u32, height: u32) -> Result<(), UniverseError> {
        self.camera.resize(width, height)?;
        self.viewport = (width, height);
        Ok(())
    }

    /// Advances one frame: rotate, rebuild on store changes, refresh hover.
    pub fn tick(&mut self, tick: FrameTick) -> FrameReport {
        self.rotation_y += self.config.rotation_per_frame;

        let rebuilt = !self.store.take_changes().is_empty();
        if rebuilt {
            self.rebuild_scene();
        }

        let hovered = self.pointer_ndc.and_then(|(ndc_x, ndc_y)| {
            let ray = self.camera.ray_from_ndc(ndc_x, ndc_y);
            hit_test(&ray, &self.instances, self.rotation_y).map(|hit| hit.id)
        });
        let hover = self.hover.observe(hovered);

        FrameReport {
            frame: tick.frame,
            rebuilt,
            hover,
            rotation_y: self.rotation_y,
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.store.list()
    }

    pub fn store(&self) -> &NoteStore<B, R> {
        &self.store
    }

    pub fn instances(&self) -> &[SphereInstance] {
        &self.instances
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.and_then(|id| self.store.get(id))
    }

    pub fn hovered(&self) -> Option<NoteId> {
        self.hover.current()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    fn rebuild_scene(&mut self) {
        self.instances = build_instances(self.store.list(), self.config.sphere_style());
        self.edges = build_edges(&self.store.positions(), self.config.edge_threshold);
    }
}
